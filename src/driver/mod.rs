//! # Driver Binding
//!
//! The consumed contract of the Elgin E1 printer driver. The driver is a
//! vendor-supplied native library that owns all hardware communication
//! (USB, RS-232, TCP/IP, Bluetooth framing, fiscal-document encoding);
//! caixa only calls its exported function table and looks at the returned
//! status code.
//!
//! ## Status Codes
//!
//! Every export answers with a single `int`: `0` means success, anything
//! else is a vendor-defined error. The codes are undocumented and treated
//! as opaque; they travel untouched inside
//! [`CaixaError::Driver`](crate::error::CaixaError::Driver).
//!
//! ## Implementations
//!
//! - [`native::NativeDriver`]: loads the vendor shared library with
//!   `libloading` and forwards each method over the C ABI.
//! - `mock::MockDriver` (test only): records calls and returns scripted
//!   codes, so the session and console can be exercised without hardware.

pub mod native;

#[cfg(test)]
pub(crate) mod mock;

pub use native::NativeDriver;

use crate::error::CaixaError;

/// Connection transports understood by the driver's open call.
///
/// The discriminants are the integers the native library expects, and the
/// numbers the configuration menu reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ConnectionKind {
    Usb = 1,
    Rs232 = 2,
    TcpIp = 3,
    Bluetooth = 4,
    /// Printers coupled to the host (Android); model, address and
    /// parameter are ignored by the driver.
    PairedDevice = 5,
}

impl ConnectionKind {
    /// Parse a menu selection (1-5).
    pub fn from_menu(n: i32) -> Option<Self> {
        match n {
            1 => Some(Self::Usb),
            2 => Some(Self::Rs232),
            3 => Some(Self::TcpIp),
            4 => Some(Self::Bluetooth),
            5 => Some(Self::PairedDevice),
            _ => None,
        }
    }

    /// Human-readable name for configuration summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Usb => "USB",
            Self::Rs232 => "RS-232",
            Self::TcpIp => "TCP/IP",
            Self::Bluetooth => "Bluetooth",
            Self::PairedDevice => "Paired device",
        }
    }
}

/// Convert a raw driver status code into a result.
///
/// Zero is success; any other value becomes [`CaixaError::Driver`] carrying
/// the code verbatim.
pub(crate) fn status(call: &'static str, code: i32) -> Result<(), CaixaError> {
    if code == 0 {
        Ok(())
    } else {
        Err(CaixaError::Driver { call, code })
    }
}

/// The E1 driver function table, one method per vendor export.
///
/// Any call may fail for reasons internal to the driver (hardware
/// unreachable, paper out, malformed payload); the only observable signal
/// is the status code.
pub trait Driver {
    /// Open the printer connection (`AbreConexaoImpressora`).
    fn open(
        &self,
        kind: ConnectionKind,
        model: &str,
        address: &str,
        parameter: i32,
    ) -> Result<(), CaixaError>;

    /// Close the connection and release the port (`FechaConexaoImpressora`).
    fn close(&self) -> Result<(), CaixaError>;

    /// Print formatted text (`ImpressaoTexto`). Alignment 0-2, style 0-2,
    /// size 0-7 per the vendor manual.
    fn print_text(
        &self,
        text: &str,
        alignment: i32,
        style: i32,
        size: i32,
    ) -> Result<(), CaixaError>;

    /// Cut the paper (`Corte`), partial or full depending on mode.
    fn cut(&self, mode: i32) -> Result<(), CaixaError>;

    /// Print a QR code (`ImpressaoQRCode`).
    fn print_qr_code(&self, data: &str, size: i32, level: i32) -> Result<(), CaixaError>;

    /// Print a 1D barcode (`ImpressaoCodigoBarras`). `text_position`
    /// controls where the human-readable interpretation is printed.
    fn print_barcode(
        &self,
        symbology: i32,
        data: &str,
        height: i32,
        width: i32,
        text_position: i32,
    ) -> Result<(), CaixaError>;

    /// Feed the paper a number of lines (`AvancaPapel`).
    fn feed(&self, lines: i32) -> Result<(), CaixaError>;

    /// Query printer status (`StatusImpressora`).
    fn query_status(&self, param: i32) -> Result<(), CaixaError>;

    /// Pulse the cash drawer with Elgin's fixed timings (`AbreGavetaElgin`).
    fn open_drawer(&self) -> Result<(), CaixaError>;

    /// Pulse the cash drawer on an arbitrary pin (`AbreGaveta`).
    fn pulse_drawer(&self, pin: i32, on_ms: i32, off_ms: i32) -> Result<(), CaixaError>;

    /// Sound the printer buzzer (`SinalSonoro`).
    fn beep(&self, count: i32, on_ms: i32, off_ms: i32) -> Result<(), CaixaError>;

    /// Enter page mode (`ModoPagina`): content accumulates for absolute
    /// X/Y placement instead of printing line by line.
    fn enter_page_mode(&self) -> Result<(), CaixaError>;

    /// Discard accumulated page-mode content (`LimpaBufferModoPagina`).
    fn clear_page_buffer(&self) -> Result<(), CaixaError>;

    /// Print the accumulated page (`ImprimeModoPagina`).
    fn commit_page_mode(&self) -> Result<(), CaixaError>;

    /// Return to sequential line printing (`ModoPadrao`).
    fn enter_standard_mode(&self) -> Result<(), CaixaError>;

    /// Set the page-mode X position (`PosicaoImpressaoHorizontal`).
    fn set_horizontal_position(&self, pos: i32) -> Result<(), CaixaError>;

    /// Set the page-mode Y position (`PosicaoImpressaoVertical`).
    fn set_vertical_position(&self, pos: i32) -> Result<(), CaixaError>;

    /// Print a SAT fiscal receipt from its XML (`ImprimeXMLSAT`).
    fn print_fiscal_xml(&self, payload: &str, param: i32) -> Result<(), CaixaError>;

    /// Print a SAT cancellation extract (`ImprimeXMLCancelamentoSAT`).
    /// `signature` is the QR-code signature supplied by the authorizer.
    fn print_cancellation_xml(
        &self,
        payload: &str,
        signature: &str,
        param: i32,
    ) -> Result<(), CaixaError>;
}

// ============================================================================
// TESTS
// ============================================================================
