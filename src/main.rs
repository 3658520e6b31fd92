//! # Caixa CLI
//!
//! Interactive console for Elgin E1 thermal receipt printers.
//!
//! ## Usage
//!
//! ```bash
//! # Run with the driver library in the working directory
//! caixa
//!
//! # Point at the vendor library explicitly
//! caixa --driver /opt/elgin/libE1_Impressora01.so
//!
//! # Or through the environment
//! CAIXA_DRIVER=/opt/elgin/libE1_Impressora01.so caixa
//! ```
//!
//! The console then presents a numbered menu: configure the connection,
//! open it, and issue print jobs. Diagnostics go to stderr via `tracing`
//! (`RUST_LOG` controls the filter); the menu itself stays on stdout.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use caixa::driver::native::DEFAULT_LIBRARY;
use caixa::{CaixaError, Console, NativeDriver, Session};

/// Caixa - Elgin E1 thermal printer console
#[derive(Parser, Debug)]
#[command(name = "caixa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the vendor E1 driver shared library
    #[arg(long, env = "CAIXA_DRIVER", default_value = DEFAULT_LIBRARY)]
    driver: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CaixaError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let driver = NativeDriver::load(&cli.driver)?;

    let stdin = io::stdin();
    let mut console = Console::new(Session::new(driver), stdin.lock(), io::stdout());
    console.run()
}
