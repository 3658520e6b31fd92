//! # Printer Session
//!
//! A session owns the connection configuration, the connected/disconnected
//! flag and the driver itself. The flag is the single source of truth: every
//! print, drawer, beep, feed, cut, status and page-mode operation is gated
//! on it, and a gated operation never reaches the driver while disconnected.
//!
//! ## States
//!
//! ```text
//! Disconnected ──connect()──▶ Connected
//!      ▲                          │
//!      └──────disconnect()────────┘
//! ```
//!
//! `configure()` is allowed only while disconnected and does not change
//! state. A failed `connect()` stays disconnected and surfaces the driver
//! code; a failed `disconnect()` stays connected.
//!
//! ## Finishing Policy
//!
//! Print jobs end with a paper feed and a cut so the printout clears the
//! tear bar. For QR, barcode and fiscal jobs the follow-up is fixed
//! (feed 3 lines, cut mode 3); plain text takes operator-supplied values.
//! The follow-ups run even when the primary call fails, and the primary's
//! error is the one reported.

use tracing::{debug, info};

use crate::driver::{ConnectionKind, Driver};
use crate::error::CaixaError;

/// Lines fed after a non-text print job, before the cut.
const FINISH_FEED_LINES: i32 = 3;

/// Cut mode used to finalize non-text print jobs.
const FINISH_CUT_MODE: i32 = 3;

/// Parameters for the driver's open call.
///
/// Mutable only while no connection is open; lives in process memory for
/// the duration of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub kind: ConnectionKind,
    /// Printer model (ex: "i9", "MP-4200").
    pub model: String,
    /// Connection value: "USB", a COM port, an IP address or a Bluetooth MAC.
    pub address: String,
    /// Extra parameter: 0 for USB, TCP port, or serial baud rate.
    pub parameter: i32,
}

impl ConnectionConfig {
    /// Configuration for a host-coupled (Android) printer. The driver
    /// ignores model, address and parameter for this kind.
    pub fn paired_device() -> Self {
        Self {
            kind: ConnectionKind::PairedDevice,
            model: String::new(),
            address: String::new(),
            parameter: 0,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            kind: ConnectionKind::Usb,
            model: "i9".to_string(),
            address: "USB".to_string(),
            parameter: 0,
        }
    }
}

/// # Printer Session
///
/// Generic over the [`Driver`] so tests can inject a recording fake.
pub struct Session<D> {
    driver: D,
    config: ConnectionConfig,
    connected: bool,
}

impl<D: Driver> Session<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            config: ConnectionConfig::default(),
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Replace the connection configuration.
    ///
    /// Rejected with [`CaixaError::AlreadyConnected`] while a connection is
    /// open; the stored configuration is left untouched in that case.
    pub fn configure(&mut self, config: ConnectionConfig) -> Result<(), CaixaError> {
        if self.connected {
            return Err(CaixaError::AlreadyConnected);
        }
        debug!(kind = config.kind.label(), model = %config.model, "Configuration replaced");
        self.config = config;
        Ok(())
    }

    /// Open the connection with the stored configuration.
    ///
    /// On driver failure the session stays disconnected and the driver code
    /// is surfaced.
    pub fn connect(&mut self) -> Result<(), CaixaError> {
        if self.connected {
            return Err(CaixaError::AlreadyConnected);
        }
        self.driver.open(
            self.config.kind,
            &self.config.model,
            &self.config.address,
            self.config.parameter,
        )?;
        self.connected = true;
        info!(kind = self.config.kind.label(), "Connection opened");
        Ok(())
    }

    /// Close the connection.
    pub fn disconnect(&mut self) -> Result<(), CaixaError> {
        if !self.connected {
            return Err(CaixaError::NotConnected);
        }
        self.driver.close()?;
        self.connected = false;
        info!("Connection closed");
        Ok(())
    }

    fn ensure_connected(&self) -> Result<(), CaixaError> {
        if self.connected {
            Ok(())
        } else {
            Err(CaixaError::NotConnected)
        }
    }

    /// Issue the fixed follow-ups after a print job. The primary result
    /// wins over follow-up failures.
    fn finish(
        &self,
        primary: Result<(), CaixaError>,
        feed_lines: i32,
        cut_mode: i32,
    ) -> Result<(), CaixaError> {
        let feed = self.driver.feed(feed_lines);
        let cut = self.driver.cut(cut_mode);
        primary.and(feed).and(cut)
    }

    /// Print formatted text, then feed and cut with the supplied values.
    pub fn print_text(
        &self,
        text: &str,
        alignment: i32,
        style: i32,
        size: i32,
        feed_lines: i32,
        cut_mode: i32,
    ) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        let primary = self.driver.print_text(text, alignment, style, size);
        self.finish(primary, feed_lines, cut_mode)
    }

    pub fn print_qr_code(&self, data: &str, size: i32, level: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        let primary = self.driver.print_qr_code(data, size, level);
        self.finish(primary, FINISH_FEED_LINES, FINISH_CUT_MODE)
    }

    pub fn print_barcode(
        &self,
        symbology: i32,
        data: &str,
        height: i32,
        width: i32,
        text_position: i32,
    ) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        let primary = self
            .driver
            .print_barcode(symbology, data, height, width, text_position);
        self.finish(primary, FINISH_FEED_LINES, FINISH_CUT_MODE)
    }

    /// Print a SAT fiscal receipt from its XML content.
    pub fn print_fiscal_xml(&self, payload: &str, param: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        let primary = self.driver.print_fiscal_xml(payload, param);
        self.finish(primary, FINISH_FEED_LINES, FINISH_CUT_MODE)
    }

    /// Print a SAT cancellation extract from its XML content and signature.
    pub fn print_cancellation_xml(
        &self,
        payload: &str,
        signature: &str,
        param: i32,
    ) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        let primary = self.driver.print_cancellation_xml(payload, signature, param);
        self.finish(primary, FINISH_FEED_LINES, FINISH_CUT_MODE)
    }

    pub fn open_drawer(&self) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.open_drawer()
    }

    pub fn pulse_drawer(&self, pin: i32, on_ms: i32, off_ms: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.pulse_drawer(pin, on_ms, off_ms)
    }

    pub fn beep(&self, count: i32, on_ms: i32, off_ms: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.beep(count, on_ms, off_ms)
    }

    pub fn feed(&self, lines: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.feed(lines)
    }

    pub fn cut(&self, mode: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.cut(mode)
    }

    pub fn query_status(&self, param: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.query_status(param)
    }

    // ========== Page mode ==========

    pub fn enter_page_mode(&self) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.enter_page_mode()
    }

    pub fn clear_page_buffer(&self) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.clear_page_buffer()
    }

    pub fn set_horizontal_position(&self, pos: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.set_horizontal_position(pos)
    }

    pub fn set_vertical_position(&self, pos: i32) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.set_vertical_position(pos)
    }

    pub fn commit_page_mode(&self) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.commit_page_mode()
    }

    pub fn enter_standard_mode(&self) -> Result<(), CaixaError> {
        self.ensure_connected()?;
        self.driver.enter_standard_mode()
    }
}

// ============================================================================
// TESTS
// ============================================================================
