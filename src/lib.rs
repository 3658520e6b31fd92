//! # Caixa - Elgin E1 Printer Console
//!
//! Caixa is an interactive console for Elgin E1-family thermal receipt
//! printers. Everything the printer does (text, QR codes, barcodes, SAT
//! fiscal extracts, cash-drawer pulses, beeps) happens inside the vendor's
//! native driver library; caixa loads that library, keeps track of the
//! connection, and forwards operator input to the driver's exported
//! function table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use caixa::{Console, NativeDriver, Session};
//! use std::io;
//!
//! // Load the vendor driver library
//! let driver = NativeDriver::load("libE1_Impressora01.so")?;
//!
//! // Run the interactive menu on stdin/stdout
//! let stdin = io::stdin();
//! let mut console = Console::new(Session::new(driver), stdin.lock(), io::stdout());
//! console.run()?;
//!
//! # Ok::<(), caixa::CaixaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`driver`] | The consumed driver contract and its native binding |
//! | [`session`] | Connection configuration and state machine |
//! | [`console`] | Interactive menu loop |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Any printer handled by the E1 driver library (i7, i8, i9, MP-4200 and
//! friends) over USB, RS-232, TCP/IP, Bluetooth, or as a host-coupled
//! device. Driver error codes are vendor-defined and passed through
//! untouched.

pub mod console;
pub mod driver;
pub mod error;
pub mod session;

// Re-exports for convenience
pub use console::Console;
pub use driver::{ConnectionKind, Driver, NativeDriver};
pub use error::CaixaError;
pub use session::{ConnectionConfig, Session};
