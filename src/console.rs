//! # Interactive Console
//!
//! The operator-facing read-print loop: a numbered menu, prompts for the
//! parameters of each print job, and human-readable outcomes. All state
//! questions are delegated to the [`Session`]; the console never talks to
//! the driver directly.
//!
//! The loop is generic over its input and output streams so tests can run
//! it against scripted input and inspect what was printed. Driver and
//! precondition failures are reported and the menu re-displays; only I/O
//! failures on the console's own streams abort the loop.
//!
//! End of input is treated like the exit option: any open connection is
//! closed exactly once before the loop returns.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::driver::{ConnectionKind, Driver};
use crate::error::CaixaError;
use crate::session::{ConnectionConfig, Session};

const MENU: &str = "\n\
    ========================================\n\
    \x20             PRINTER MENU\n\
    ========================================\n\
    1  - Configure connection\n\
    2  - Open connection\n\
    3  - Print text\n\
    4  - Print QR code\n\
    5  - Print barcode\n\
    6  - Print fiscal receipt XML\n\
    7  - Print cancellation XML\n\
    8  - Open drawer (Elgin)\n\
    9  - Open drawer (pulse)\n\
    10 - Beep\n\
    0  - Close connection and exit\n\
    ----------------------------------------";

/// # Console
///
/// Owns the session for the duration of the run.
pub struct Console<D, R, W> {
    session: Session<D>,
    input: R,
    output: W,
}

impl<D: Driver, R: BufRead, W: Write> Console<D, R, W> {
    pub fn new(session: Session<D>, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
        }
    }

    pub fn session(&self) -> &Session<D> {
        &self.session
    }

    /// Give the session back, releasing the streams.
    pub fn into_session(self) -> Session<D> {
        self.session
    }

    /// Run the menu loop until the operator exits or input ends.
    pub fn run(&mut self) -> Result<(), CaixaError> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.read_line("Option: ")? else {
                break;
            };

            match choice.as_str() {
                "0" => break,
                "1" => self.configure()?,
                "2" => {
                    let result = self.session.connect();
                    self.report("Connection opened.", result)?;
                }
                "3" => self.print_text()?,
                "4" => self.print_qr_code()?,
                "5" => self.print_barcode()?,
                "6" => self.print_fiscal()?,
                "7" => self.print_cancellation()?,
                "8" => {
                    if self.connection_open()? {
                        let result = self.session.open_drawer();
                        self.report("Drawer opened.", result)?;
                    }
                }
                "9" => self.pulse_drawer()?,
                "10" => self.beep()?,
                _ => writeln!(self.output, "Invalid option. Enter a number from 0 to 10.")?,
            }
        }

        self.close_on_exit()
    }

    // ========================================================================
    // MENU ACTIONS
    // ========================================================================

    fn configure(&mut self) -> Result<(), CaixaError> {
        if self.session.is_connected() {
            writeln!(
                self.output,
                "A connection is already open! Close it before configuring a new one."
            )?;
            return Ok(());
        }

        writeln!(
            self.output,
            "Connection types: 1 - USB, 2 - RS-232, 3 - TCP/IP, 4 - Bluetooth, 5 - Paired device (Android)"
        )?;
        let kind = loop {
            let current = self.session.config().kind as i32;
            let Some(n) = self.prompt_i32("Connection type", current)? else {
                return Ok(());
            };
            match ConnectionKind::from_menu(n) {
                Some(kind) => break kind,
                None => writeln!(self.output, "Enter a number from 1 to 5.")?,
            }
        };

        let config = if kind == ConnectionKind::PairedDevice {
            writeln!(
                self.output,
                "Paired device selected; model, address and parameter are not used."
            )?;
            ConnectionConfig::paired_device()
        } else {
            let current = self.session.config().clone();
            let Some(model) =
                self.prompt_text_default("Printer model (ex: i9, MP-4200)", &current.model)?
            else {
                return Ok(());
            };
            let Some(address) = self.prompt_text_default(
                "Connection value (ex: USB, COM2, 192.168.0.20, AA:BB:CC:DD:EE:FF)",
                &current.address,
            )?
            else {
                return Ok(());
            };
            let Some(parameter) =
                self.prompt_i32("Parameter (ex: 0, 9100, 9600)", current.parameter)?
            else {
                return Ok(());
            };
            ConnectionConfig {
                kind,
                model,
                address,
                parameter,
            }
        };

        match self.session.configure(config) {
            Ok(()) => {
                let config = self.session.config();
                writeln!(self.output, "\nConfiguration saved.")?;
                writeln!(self.output, "  Type:      {}", config.kind.label())?;
                writeln!(self.output, "  Model:     {}", config.model)?;
                writeln!(self.output, "  Address:   {}", config.address)?;
                writeln!(self.output, "  Parameter: {}", config.parameter)?;
            }
            Err(err) => writeln!(self.output, "Error: {}", err)?,
        }
        Ok(())
    }

    fn print_text(&mut self) -> Result<(), CaixaError> {
        if !self.connection_open()? {
            return Ok(());
        }
        let Some(text) = self.prompt_text("Text to print")? else {
            return Ok(());
        };
        let Some(alignment) = self.prompt_i32("Alignment (0 = left, 1 = center, 2 = right)", 0)?
        else {
            return Ok(());
        };
        let Some(style) = self.prompt_i32("Style (0 = normal, 1 = bold, 2 = italic)", 0)? else {
            return Ok(());
        };
        let Some(size) = self.prompt_i32("Size (0 = normal, 1 = large)", 0)? else {
            return Ok(());
        };
        let Some(feed_lines) = self.prompt_i32("Lines to feed before the cut", 2)? else {
            return Ok(());
        };
        let Some(cut_mode) = self.prompt_i32("Cut mode (1 to 3)", 1)? else {
            return Ok(());
        };

        let result = self
            .session
            .print_text(&text, alignment, style, size, feed_lines, cut_mode);
        self.report("Printed.", result)
    }

    fn print_qr_code(&mut self) -> Result<(), CaixaError> {
        if !self.connection_open()? {
            return Ok(());
        }
        let Some(data) = self.prompt_text("QR code data")? else {
            return Ok(());
        };
        let Some(size) = self.prompt_i32("Module size (1 to 6)", 6)? else {
            return Ok(());
        };
        let Some(level) = self.prompt_i32("Error correction level (1 to 4)", 4)? else {
            return Ok(());
        };

        let result = self.session.print_qr_code(&data, size, level);
        self.report("Printed.", result)
    }

    fn print_barcode(&mut self) -> Result<(), CaixaError> {
        if !self.connection_open()? {
            return Ok(());
        }
        let Some(symbology) = self.prompt_i32("Symbology (ex: 8 = CODE 128)", 8)? else {
            return Ok(());
        };
        let Some(data) = self.prompt_text_default("Barcode data", "{A012345678912")? else {
            return Ok(());
        };
        let Some(height) = self.prompt_i32("Height in dots", 100)? else {
            return Ok(());
        };
        let Some(width) = self.prompt_i32("Bar width (1 to 6)", 2)? else {
            return Ok(());
        };
        let Some(text_position) =
            self.prompt_i32("HRI position (0 = none, 1 = above, 2 = below, 3 = both)", 3)?
        else {
            return Ok(());
        };

        let result = self
            .session
            .print_barcode(symbology, &data, height, width, text_position);
        self.report("Printed.", result)
    }

    fn print_fiscal(&mut self) -> Result<(), CaixaError> {
        if !self.connection_open()? {
            return Ok(());
        }
        let Some(path) = self.prompt_text("Path to the SAT XML file")? else {
            return Ok(());
        };
        let payload = match read_payload(Path::new(&path)) {
            Ok(payload) => payload,
            Err(err) => {
                writeln!(self.output, "Error: {}", err)?;
                return Ok(());
            }
        };

        let result = self.session.print_fiscal_xml(&payload, 0);
        self.report("Fiscal receipt printed.", result)
    }

    fn print_cancellation(&mut self) -> Result<(), CaixaError> {
        if !self.connection_open()? {
            return Ok(());
        }
        let Some(path) = self.prompt_text("Path to the cancellation XML file")? else {
            return Ok(());
        };
        let Some(signature) = self.prompt_text("QR-code signature")? else {
            return Ok(());
        };
        let payload = match read_payload(Path::new(&path)) {
            Ok(payload) => payload,
            Err(err) => {
                writeln!(self.output, "Error: {}", err)?;
                return Ok(());
            }
        };

        let result = self.session.print_cancellation_xml(&payload, &signature, 0);
        self.report("Cancellation extract printed.", result)
    }

    fn pulse_drawer(&mut self) -> Result<(), CaixaError> {
        if !self.connection_open()? {
            return Ok(());
        }
        let Some(pin) = self.prompt_i32("Drawer pin", 1)? else {
            return Ok(());
        };
        let Some(on_ms) = self.prompt_i32("Pulse on time (ms)", 5)? else {
            return Ok(());
        };
        let Some(off_ms) = self.prompt_i32("Pulse off time (ms)", 10)? else {
            return Ok(());
        };

        let result = self.session.pulse_drawer(pin, on_ms, off_ms);
        self.report("Drawer opened.", result)
    }

    fn beep(&mut self) -> Result<(), CaixaError> {
        if !self.connection_open()? {
            return Ok(());
        }
        let Some(count) = self.prompt_i32("Number of beeps", 1)? else {
            return Ok(());
        };
        let Some(on_ms) = self.prompt_i32("Beep on time (ms)", 100)? else {
            return Ok(());
        };
        let Some(off_ms) = self.prompt_i32("Beep off time (ms)", 100)? else {
            return Ok(());
        };

        let result = self.session.beep(count, on_ms, off_ms);
        self.report("Beep sent.", result)
    }

    /// The exit path: close an open connection exactly once. A failed close
    /// is reported but the process is leaving either way.
    fn close_on_exit(&mut self) -> Result<(), CaixaError> {
        if self.session.is_connected() {
            let result = self.session.disconnect();
            self.report("Connection closed.", result)?;
        }
        writeln!(self.output, "Leaving.")?;
        Ok(())
    }

    // ========================================================================
    // PROMPT HELPERS
    // ========================================================================

    /// Whether a connection is open, reporting when it is not. Checked
    /// before prompting so the operator is not asked for parameters that
    /// cannot be used.
    fn connection_open(&mut self) -> Result<bool, CaixaError> {
        if self.session.is_connected() {
            Ok(true)
        } else {
            writeln!(self.output, "Open the connection first!")?;
            Ok(false)
        }
    }

    fn report(&mut self, success: &str, result: Result<(), CaixaError>) -> Result<(), CaixaError> {
        match result {
            Ok(()) => writeln!(self.output, "{}", success)?,
            Err(CaixaError::NotConnected) => writeln!(self.output, "Open the connection first!")?,
            Err(err) => writeln!(self.output, "Error: {}", err)?,
        }
        Ok(())
    }

    /// Read one trimmed line. `None` means input ended.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CaixaError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_text(&mut self, prompt: &str) -> Result<Option<String>, CaixaError> {
        self.read_line(&format!("{}: ", prompt))
    }

    /// Prompt for text; empty input takes the default.
    fn prompt_text_default(
        &mut self,
        prompt: &str,
        default: &str,
    ) -> Result<Option<String>, CaixaError> {
        let Some(text) = self.read_line(&format!("{} [{}]: ", prompt, default))? else {
            return Ok(None);
        };
        if text.is_empty() {
            Ok(Some(default.to_string()))
        } else {
            Ok(Some(text))
        }
    }

    /// Prompt until the operator enters a valid integer. Empty input takes
    /// the default.
    fn prompt_i32(&mut self, prompt: &str, default: i32) -> Result<Option<i32>, CaixaError> {
        loop {
            let Some(text) = self.read_line(&format!("{} [{}]: ", prompt, default))? else {
                return Ok(None);
            };
            if text.is_empty() {
                return Ok(Some(default));
            }
            match text.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.output, "Not a number, try again.")?,
            }
        }
    }
}

/// Read a fiscal XML payload as UTF-8, keeping the path in the error.
fn read_payload(path: &Path) -> Result<String, CaixaError> {
    fs::read_to_string(path).map_err(|source| CaixaError::Payload {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// TESTS
// ============================================================================
