//! Recording test double for the driver contract.
//!
//! Records every call in arrival order and answers with scripted status
//! codes (zero unless told otherwise), so session and console behavior can
//! be verified without the vendor library or a printer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::driver::{ConnectionKind, Driver, status};
use crate::error::CaixaError;

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Open {
        kind: ConnectionKind,
        model: String,
        address: String,
        parameter: i32,
    },
    Close,
    PrintText {
        text: String,
        alignment: i32,
        style: i32,
        size: i32,
    },
    Cut(i32),
    PrintQrCode {
        data: String,
        size: i32,
        level: i32,
    },
    PrintBarcode {
        symbology: i32,
        data: String,
        height: i32,
        width: i32,
        text_position: i32,
    },
    Feed(i32),
    QueryStatus(i32),
    OpenDrawer,
    PulseDrawer {
        pin: i32,
        on_ms: i32,
        off_ms: i32,
    },
    Beep {
        count: i32,
        on_ms: i32,
        off_ms: i32,
    },
    EnterPageMode,
    ClearPageBuffer,
    CommitPageMode,
    EnterStandardMode,
    SetHorizontalPosition(i32),
    SetVerticalPosition(i32),
    PrintFiscalXml {
        payload: String,
        param: i32,
    },
    PrintCancellationXml {
        payload: String,
        signature: String,
        param: i32,
    },
}

/// Clones share the same call log and failure script.
#[derive(Clone, Default)]
pub(crate) struct MockDriver {
    calls: Rc<RefCell<Vec<Call>>>,
    failures: Rc<RefCell<HashMap<&'static str, i32>>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a status code for a call name; unscripted calls return 0.
    pub fn fail(&self, call: &'static str, code: i32) {
        self.failures.borrow_mut().insert(call, code);
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, name: &'static str, call: Call) -> Result<(), CaixaError> {
        self.calls.borrow_mut().push(call);
        let code = self.failures.borrow().get(name).copied().unwrap_or(0);
        status(name, code)
    }
}

impl Driver for MockDriver {
    fn open(
        &self,
        kind: ConnectionKind,
        model: &str,
        address: &str,
        parameter: i32,
    ) -> Result<(), CaixaError> {
        self.record(
            "open",
            Call::Open {
                kind,
                model: model.to_string(),
                address: address.to_string(),
                parameter,
            },
        )
    }

    fn close(&self) -> Result<(), CaixaError> {
        self.record("close", Call::Close)
    }

    fn print_text(
        &self,
        text: &str,
        alignment: i32,
        style: i32,
        size: i32,
    ) -> Result<(), CaixaError> {
        self.record(
            "print_text",
            Call::PrintText {
                text: text.to_string(),
                alignment,
                style,
                size,
            },
        )
    }

    fn cut(&self, mode: i32) -> Result<(), CaixaError> {
        self.record("cut", Call::Cut(mode))
    }

    fn print_qr_code(&self, data: &str, size: i32, level: i32) -> Result<(), CaixaError> {
        self.record(
            "print_qr_code",
            Call::PrintQrCode {
                data: data.to_string(),
                size,
                level,
            },
        )
    }

    fn print_barcode(
        &self,
        symbology: i32,
        data: &str,
        height: i32,
        width: i32,
        text_position: i32,
    ) -> Result<(), CaixaError> {
        self.record(
            "print_barcode",
            Call::PrintBarcode {
                symbology,
                data: data.to_string(),
                height,
                width,
                text_position,
            },
        )
    }

    fn feed(&self, lines: i32) -> Result<(), CaixaError> {
        self.record("feed", Call::Feed(lines))
    }

    fn query_status(&self, param: i32) -> Result<(), CaixaError> {
        self.record("query_status", Call::QueryStatus(param))
    }

    fn open_drawer(&self) -> Result<(), CaixaError> {
        self.record("open_drawer", Call::OpenDrawer)
    }

    fn pulse_drawer(&self, pin: i32, on_ms: i32, off_ms: i32) -> Result<(), CaixaError> {
        self.record("pulse_drawer", Call::PulseDrawer { pin, on_ms, off_ms })
    }

    fn beep(&self, count: i32, on_ms: i32, off_ms: i32) -> Result<(), CaixaError> {
        self.record("beep", Call::Beep { count, on_ms, off_ms })
    }

    fn enter_page_mode(&self) -> Result<(), CaixaError> {
        self.record("enter_page_mode", Call::EnterPageMode)
    }

    fn clear_page_buffer(&self) -> Result<(), CaixaError> {
        self.record("clear_page_buffer", Call::ClearPageBuffer)
    }

    fn commit_page_mode(&self) -> Result<(), CaixaError> {
        self.record("commit_page_mode", Call::CommitPageMode)
    }

    fn enter_standard_mode(&self) -> Result<(), CaixaError> {
        self.record("enter_standard_mode", Call::EnterStandardMode)
    }

    fn set_horizontal_position(&self, pos: i32) -> Result<(), CaixaError> {
        self.record("set_horizontal_position", Call::SetHorizontalPosition(pos))
    }

    fn set_vertical_position(&self, pos: i32) -> Result<(), CaixaError> {
        self.record("set_vertical_position", Call::SetVerticalPosition(pos))
    }

    fn print_fiscal_xml(&self, payload: &str, param: i32) -> Result<(), CaixaError> {
        self.record(
            "print_fiscal_xml",
            Call::PrintFiscalXml {
                payload: payload.to_string(),
                param,
            },
        )
    }

    fn print_cancellation_xml(
        &self,
        payload: &str,
        signature: &str,
        param: i32,
    ) -> Result<(), CaixaError> {
        self.record(
            "print_cancellation_xml",
            Call::PrintCancellationXml {
                payload: payload.to_string(),
                signature: signature.to_string(),
                param,
            },
        )
    }
}
