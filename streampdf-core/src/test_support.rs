//! Helpers shared by the unit tests.

use crate::error::{ErrorHandler, FatalContext, PdfError};
use crate::Document;

/// A document writing into memory.
pub(crate) fn document() -> Document<Vec<u8>> {
    Document::with_writer(Vec::new()).unwrap()
}

/// Close `doc` and return its output as text.
pub(crate) fn output<H: ErrorHandler>(doc: Document<Vec<u8>, H>) -> String {
    String::from_utf8_lossy(&doc.close().unwrap()).into_owned()
}

/// Close `doc` and return the body of its first content stream.
pub(crate) fn page_content<H: ErrorHandler>(doc: Document<Vec<u8>, H>) -> String {
    let out = output(doc);
    let start = out.find("stream\n").unwrap() + "stream\n".len();
    let end = start + out[start..].find("endstream\n").unwrap();
    out[start..end].to_string()
}

/// Error handler that remembers what it was told.
#[derive(Debug, Default)]
pub(crate) struct RecordingHandler {
    pub warnings: Vec<String>,
    pub fatal: Vec<&'static str>,
}

impl ErrorHandler for RecordingHandler {
    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn fatal(&mut self, error: &PdfError, _context: FatalContext<'_>) {
        self.fatal.push(error.category());
    }
}
