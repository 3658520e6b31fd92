//! # Native Driver Binding
//!
//! Loads the vendor's `E1_Impressora` shared library at runtime and
//! forwards every [`Driver`] method to the corresponding exported symbol
//! over the C ABI.
//!
//! ## Library Resolution
//!
//! The library path comes from the `--driver` flag or the `CAIXA_DRIVER`
//! environment variable, falling back to [`DEFAULT_LIBRARY`] in the working
//! directory. A missing file or export is reported as a descriptive error
//! instead of a crash at call time.
//!
//! ## Crossing the Boundary
//!
//! - Strings are converted to [`CString`] before the call; interior NUL
//!   bytes are rejected up front ([`CaixaError::InvalidText`]).
//! - Every export returns a single `int` status code. Zero is success;
//!   anything else is wrapped untouched in [`CaixaError::Driver`].
//! - Exports are resolved per call with [`Library::get`]. Calls are
//!   operator-paced, so the repeated lookup is irrelevant, and it keeps the
//!   struct free of self-referential symbol storage.

use std::ffi::{CString, c_char, c_int};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::{debug, info};

use crate::driver::{ConnectionKind, Driver, status};
use crate::error::CaixaError;

/// Default driver library file name, resolved relative to the working
/// directory when neither `--driver` nor `CAIXA_DRIVER` is given.
#[cfg(windows)]
pub const DEFAULT_LIBRARY: &str = "E1_Impressora01.dll";

/// Default driver library file name, resolved relative to the working
/// directory when neither `--driver` nor `CAIXA_DRIVER` is given.
#[cfg(not(windows))]
pub const DEFAULT_LIBRARY: &str = "libE1_Impressora01.so";

/// # Native E1 Driver
///
/// Owns the loaded vendor library for the process lifetime. The connection
/// itself lives inside the driver; caixa only tracks whether it asked for
/// one to be open.
pub struct NativeDriver {
    library: Library,
    path: PathBuf,
}

impl NativeDriver {
    /// Load the vendor library from `path`.
    ///
    /// ## Errors
    ///
    /// [`CaixaError::Library`] if the file does not exist, is not a loadable
    /// shared library, or has unresolvable dependencies of its own.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CaixaError> {
        let path = path.as_ref().to_path_buf();

        // Safety: loading a library runs its initializers; the E1 driver's
        // initializer only sets up internal state.
        let library = unsafe { Library::new(&path) }.map_err(|source| CaixaError::Library {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "Loaded printer driver");
        Ok(Self { library, path })
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn symbol<T>(&self, name: &'static str) -> Result<Symbol<'_, T>, CaixaError> {
        // libloading appends the terminating NUL when it is missing.
        unsafe { self.library.get(name.as_bytes()) }
            .map_err(|source| CaixaError::MissingSymbol { name, source })
    }

    fn text(value: &str) -> Result<CString, CaixaError> {
        CString::new(value).map_err(|_| CaixaError::InvalidText)
    }

    /// Call a `() -> int` export.
    fn call0(&self, name: &'static str) -> Result<(), CaixaError> {
        let f: Symbol<'_, unsafe extern "C" fn() -> c_int> = self.symbol(name)?;
        debug!(call = name, "Driver call");
        status(name, unsafe { f() })
    }

    /// Call an `(int) -> int` export.
    fn call1(&self, name: &'static str, a: i32) -> Result<(), CaixaError> {
        let f: Symbol<'_, unsafe extern "C" fn(c_int) -> c_int> = self.symbol(name)?;
        debug!(call = name, a, "Driver call");
        status(name, unsafe { f(a) })
    }

    /// Call an `(int, int, int) -> int` export.
    fn call3(&self, name: &'static str, a: i32, b: i32, c: i32) -> Result<(), CaixaError> {
        let f: Symbol<'_, unsafe extern "C" fn(c_int, c_int, c_int) -> c_int> = self.symbol(name)?;
        debug!(call = name, a, b, c, "Driver call");
        status(name, unsafe { f(a, b, c) })
    }
}

impl Driver for NativeDriver {
    fn open(
        &self,
        kind: ConnectionKind,
        model: &str,
        address: &str,
        parameter: i32,
    ) -> Result<(), CaixaError> {
        let model = Self::text(model)?;
        let address = Self::text(address)?;
        let f: Symbol<'_, unsafe extern "C" fn(c_int, *const c_char, *const c_char, c_int) -> c_int> =
            self.symbol("AbreConexaoImpressora")?;
        debug!(kind = kind.label(), parameter, "Driver call: AbreConexaoImpressora");
        status("AbreConexaoImpressora", unsafe {
            f(kind as c_int, model.as_ptr(), address.as_ptr(), parameter)
        })
    }

    fn close(&self) -> Result<(), CaixaError> {
        self.call0("FechaConexaoImpressora")
    }

    fn print_text(
        &self,
        text: &str,
        alignment: i32,
        style: i32,
        size: i32,
    ) -> Result<(), CaixaError> {
        let text = Self::text(text)?;
        let f: Symbol<'_, unsafe extern "C" fn(*const c_char, c_int, c_int, c_int) -> c_int> =
            self.symbol("ImpressaoTexto")?;
        debug!(alignment, style, size, "Driver call: ImpressaoTexto");
        status("ImpressaoTexto", unsafe {
            f(text.as_ptr(), alignment, style, size)
        })
    }

    fn cut(&self, mode: i32) -> Result<(), CaixaError> {
        self.call1("Corte", mode)
    }

    fn print_qr_code(&self, data: &str, size: i32, level: i32) -> Result<(), CaixaError> {
        let data = Self::text(data)?;
        let f: Symbol<'_, unsafe extern "C" fn(*const c_char, c_int, c_int) -> c_int> =
            self.symbol("ImpressaoQRCode")?;
        debug!(size, level, "Driver call: ImpressaoQRCode");
        status("ImpressaoQRCode", unsafe { f(data.as_ptr(), size, level) })
    }

    fn print_barcode(
        &self,
        symbology: i32,
        data: &str,
        height: i32,
        width: i32,
        text_position: i32,
    ) -> Result<(), CaixaError> {
        let data = Self::text(data)?;
        let f: Symbol<'_, unsafe extern "C" fn(c_int, *const c_char, c_int, c_int, c_int) -> c_int> =
            self.symbol("ImpressaoCodigoBarras")?;
        debug!(symbology, height, width, text_position, "Driver call: ImpressaoCodigoBarras");
        status("ImpressaoCodigoBarras", unsafe {
            f(symbology, data.as_ptr(), height, width, text_position)
        })
    }

    fn feed(&self, lines: i32) -> Result<(), CaixaError> {
        self.call1("AvancaPapel", lines)
    }

    fn query_status(&self, param: i32) -> Result<(), CaixaError> {
        self.call1("StatusImpressora", param)
    }

    fn open_drawer(&self) -> Result<(), CaixaError> {
        self.call0("AbreGavetaElgin")
    }

    fn pulse_drawer(&self, pin: i32, on_ms: i32, off_ms: i32) -> Result<(), CaixaError> {
        self.call3("AbreGaveta", pin, on_ms, off_ms)
    }

    fn beep(&self, count: i32, on_ms: i32, off_ms: i32) -> Result<(), CaixaError> {
        self.call3("SinalSonoro", count, on_ms, off_ms)
    }

    fn enter_page_mode(&self) -> Result<(), CaixaError> {
        self.call0("ModoPagina")
    }

    fn clear_page_buffer(&self) -> Result<(), CaixaError> {
        self.call0("LimpaBufferModoPagina")
    }

    fn commit_page_mode(&self) -> Result<(), CaixaError> {
        self.call0("ImprimeModoPagina")
    }

    fn enter_standard_mode(&self) -> Result<(), CaixaError> {
        self.call0("ModoPadrao")
    }

    fn set_horizontal_position(&self, pos: i32) -> Result<(), CaixaError> {
        self.call1("PosicaoImpressaoHorizontal", pos)
    }

    fn set_vertical_position(&self, pos: i32) -> Result<(), CaixaError> {
        self.call1("PosicaoImpressaoVertical", pos)
    }

    fn print_fiscal_xml(&self, payload: &str, param: i32) -> Result<(), CaixaError> {
        let payload = Self::text(payload)?;
        let f: Symbol<'_, unsafe extern "C" fn(*const c_char, c_int) -> c_int> =
            self.symbol("ImprimeXMLSAT")?;
        debug!(param, "Driver call: ImprimeXMLSAT");
        status("ImprimeXMLSAT", unsafe { f(payload.as_ptr(), param) })
    }

    fn print_cancellation_xml(
        &self,
        payload: &str,
        signature: &str,
        param: i32,
    ) -> Result<(), CaixaError> {
        let payload = Self::text(payload)?;
        let signature = Self::text(signature)?;
        let f: Symbol<'_, unsafe extern "C" fn(*const c_char, *const c_char, c_int) -> c_int> =
            self.symbol("ImprimeXMLCancelamentoSAT")?;
        debug!(param, "Driver call: ImprimeXMLCancelamentoSAT");
        status("ImprimeXMLCancelamentoSAT", unsafe {
            f(payload.as_ptr(), signature.as_ptr(), param)
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
