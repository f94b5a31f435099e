//! Where `print` output goes.
//!
//! Programs write to stdout; tests install a buffer and read it back.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Output sink used by `print` and the model host messages.
pub enum PrintHandler {
    Stdout,
    Buffer(Mutex<String>),
}

impl PrintHandler {
    /// Write `line` followed by a newline.
    pub fn println(&self, line: &str) {
        match self {
            PrintHandler::Stdout => {
                let mut out = std::io::stdout().lock();
                // A closed stdout is not a program error.
                let _ = writeln!(out, "{line}");
            }
            PrintHandler::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
    }

    /// Everything captured so far. Empty for stdout.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Stdout => String::new(),
            PrintHandler::Buffer(buffer) => buffer.lock().clone(),
        }
    }

    pub fn clear(&self) {
        if let PrintHandler::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}
