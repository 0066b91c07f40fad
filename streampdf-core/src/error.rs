use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::DebugFlags;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Wrong order of function calls ({0})")]
    InvalidState(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Resource error: {0}")]
    ResourceError(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Document aborted after a fatal error")]
    Aborted,
}

impl PdfError {
    /// Short category name used when reporting the error.
    pub fn category(&self) -> &'static str {
        match self {
            PdfError::Io(_) => "IOError",
            PdfError::InvalidState(_) => "RuntimeError",
            PdfError::InvalidValue(_) => "ValueError",
            PdfError::InvalidStructure(_) => "SystemError",
            PdfError::FontError(_) => "FontError",
            PdfError::InvalidImage(_) => "ImageError",
            PdfError::ResourceError(_) => "ResourceError",
            PdfError::CompressionError(_) => "CompressionError",
            PdfError::ParseError(_) => "ParseError",
            PdfError::Aborted => "Aborted",
        }
    }

    pub(crate) fn state(function: &str) -> Self {
        PdfError::InvalidState(function.to_string())
    }

    pub(crate) fn value(message: impl Into<String>) -> Self {
        PdfError::InvalidValue(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Context handed to [`ErrorHandler::fatal`] so it can clean up after
/// the document it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct FatalContext<'a> {
    /// Path of the output file, if the document writes to a named file.
    pub output: Option<&'a Path>,
    pub debug: DebugFlags,
}

/// Receives the two severities of problems a document can run into.
///
/// Warnings never stop the document. After `fatal` returns, the document
/// is marked aborted and every later call fails with [`PdfError::Aborted`].
pub trait ErrorHandler {
    fn warning(&mut self, message: &str);

    fn fatal(&mut self, error: &PdfError, context: FatalContext<'_>);
}

/// Logs through `tracing` and removes partial output on fatal errors.
#[derive(Debug, Default, Clone)]
pub struct DefaultErrorHandler {
    removed: Option<PathBuf>,
}

impl DefaultErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The output file removed by the last fatal error, if any.
    pub fn removed_output(&self) -> Option<&Path> {
        self.removed.as_deref()
    }
}

impl ErrorHandler for DefaultErrorHandler {
    fn warning(&mut self, message: &str) {
        tracing::warn!("PDF warning: {}", message);
    }

    fn fatal(&mut self, error: &PdfError, context: FatalContext<'_>) {
        tracing::error!(category = error.category(), "PDF fatal error: {}", error);

        if context.debug.contains(DebugFlags::KEEP_OUTPUT) {
            return;
        }
        if let Some(path) = context.output {
            match std::fs::remove_file(path) {
                Ok(()) => self.removed = Some(path.to_path_buf()),
                Err(e) => tracing::debug!("could not remove {}: {}", path.display(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_state_error_display() {
        let error = PdfError::state("begin_page");
        assert_eq!(
            error.to_string(),
            "Wrong order of function calls (begin_page)"
        );
        assert_eq!(error.category(), "RuntimeError");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = IoError::new(ErrorKind::NotFound, "missing.afm");
        let error: PdfError = io_error.into();
        assert!(matches!(error, PdfError::Io(_)));
        assert_eq!(error.category(), "IOError");
    }

    #[test]
    fn test_default_handler_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.pdf");
        std::fs::write(&path, b"%PDF-1.3\n").unwrap();

        let mut handler = DefaultErrorHandler::new();
        let ctx = FatalContext {
            output: Some(&path),
            debug: DebugFlags::default(),
        };
        handler.fatal(&PdfError::value("bad"), ctx);

        assert!(!path.exists());
        assert_eq!(handler.removed_output(), Some(path.as_path()));
    }

    #[test]
    fn test_default_handler_keeps_output_with_debug_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.pdf");
        std::fs::write(&path, b"%PDF-1.3\n").unwrap();

        let mut handler = DefaultErrorHandler::new();
        let ctx = FatalContext {
            output: Some(&path),
            debug: DebugFlags::default() | DebugFlags::KEEP_OUTPUT,
        };
        handler.fatal(&PdfError::Aborted, ctx);

        assert!(path.exists());
        assert!(handler.removed_output().is_none());
    }
}
