//! The document being written.
//!
//! A [`Document`] owns the output sink and every piece of state needed to
//! keep writing it front to back: the object table, the page being
//! described, and the registries of fonts, images and bookmarks. Its
//! methods are spread over the modules that implement each concern.
//!
//! # Example
//!
//! ```rust
//! use streampdf::Document;
//!
//! # fn main() -> streampdf::Result<()> {
//! let mut doc = Document::with_writer(Vec::new())?;
//! doc.set_info("Title", "Circles")?;
//!
//! doc.begin_page(200.0, 200.0)?;
//! doc.circle(100.0, 100.0, 50.0)?;
//! doc.fill()?;
//! doc.end_page()?;
//!
//! let bytes = doc.close()?;
//! assert!(bytes.starts_with(b"%PDF-1.3\n"));
//! # Ok(())
//! # }
//! ```

mod hyper;
mod info;
mod page;

pub use info::DocumentInfo;
pub use page::{ProcSet, Transition};

pub(crate) use page::PageState;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::annotations::BorderStyle;
use crate::config::Settings;
use crate::error::{DefaultErrorHandler, ErrorHandler, FatalContext, PdfError, Result};
use crate::fonts::FontRegistry;
use crate::images::ImageRegistry;
use crate::objects::ObjectId;
use crate::resources::ResourceIndex;
use crate::structure::{OutlineTree, PageTable};
use crate::text::TextState;
use crate::writer::PdfWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocState {
    /// Between pages.
    Open,
    /// Inside `begin_page` / `end_page`.
    Page,
}

/// A PDF document written in a single pass.
///
/// Every fatal problem is returned as an `Err` after it has been reported
/// to the error handler; from then on the document refuses further work
/// with [`PdfError::Aborted`]. Non-fatal problems are collected in
/// [`warnings`](Document::warnings).
pub struct Document<W: Write, H: ErrorHandler = DefaultErrorHandler> {
    pub(crate) writer: PdfWriter<W>,
    pub(crate) handler: H,
    pub(crate) settings: Settings,
    /// Path of the output file, for cleanup after a fatal error.
    output: Option<PathBuf>,
    pub(crate) state: DocState,
    aborted: bool,
    warnings: Vec<String>,

    pub(crate) pages_id: ObjectId,
    catalog_id: ObjectId,
    info_id: ObjectId,
    pub(crate) pages: PageTable,
    pub(crate) page: PageState,

    pub(crate) info: DocumentInfo,
    pub(crate) fonts: FontRegistry,
    pub(crate) text: TextState,
    pub(crate) images: ImageRegistry,
    pub(crate) outlines: OutlineTree,
    pub(crate) resources: ResourceIndex,

    pub(crate) transition: Transition,
    pub(crate) duration: f64,
    pub(crate) border: BorderStyle,
}

impl Document<BufWriter<File>> {
    /// Create `path` and start writing a document to it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        DocumentBuilder::new().open_file(path)
    }
}

impl<W: Write> Document<W> {
    /// Start writing a document to `writer`.
    pub fn with_writer(writer: W) -> Result<Self> {
        DocumentBuilder::new().open_writer(writer)
    }
}

impl<W: Write, H: ErrorHandler> Document<W, H> {
    fn open(writer: W, handler: H, settings: Settings, output: Option<PathBuf>) -> Result<Self> {
        let mut writer = PdfWriter::new_with_writer(writer);
        let pages_id = writer.alloc_id();
        let catalog_id = writer.alloc_id();
        let info_id = writer.alloc_id();

        let mut doc = Self {
            writer,
            handler,
            settings,
            output,
            state: DocState::Open,
            aborted: false,
            warnings: Vec::new(),
            pages_id,
            catalog_id,
            info_id,
            pages: PageTable::new(),
            page: PageState::default(),
            info: DocumentInfo::new(),
            fonts: FontRegistry::new(),
            text: TextState::default(),
            images: ImageRegistry::new(),
            outlines: OutlineTree::new(),
            resources: ResourceIndex::new(),
            transition: Transition::None,
            duration: 0.0,
            border: BorderStyle::default(),
        };
        doc.guard(|doc| doc.writer.write_header())?;

        match &doc.output {
            Some(path) => tracing::debug!("Opened PDF output {}", path.display()),
            None => tracing::debug!("Opened PDF output stream"),
        }
        Ok(doc)
    }

    /// Run `f` unless the document has aborted. A failure is reported to
    /// the error handler and aborts the document.
    pub(crate) fn guard<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.aborted {
            return Err(PdfError::Aborted);
        }
        f(self).map_err(|error| {
            self.abort(&error);
            error
        })
    }

    fn abort(&mut self, error: &PdfError) {
        self.aborted = true;
        let context = FatalContext {
            output: self.output.as_deref(),
            debug: self.settings.debug,
        };
        self.handler.fatal(error, context);
    }

    /// Record a non-fatal problem.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.settings.debug.contains(crate::config::DebugFlags::WARNINGS) {
            self.handler.warning(&message);
        }
        self.warnings.push(message);
    }

    pub(crate) fn in_page(&self) -> bool {
        self.state == DocState::Page
    }

    pub(crate) fn require_page(&self, function: &str) -> Result<()> {
        if self.in_page() {
            Ok(())
        } else {
            Err(PdfError::state(function))
        }
    }

    /// Non-fatal problems reported so far.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn error_handler(&self) -> &H {
        &self.handler
    }

    /// Number of pages begun so far.
    pub fn page_count(&self) -> usize {
        self.pages.current()
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.writer.position()
    }

    /// Set a document parameter.
    ///
    /// | key | value |
    /// |-----|-------|
    /// | `resourcefile` | path of the resource configuration file |
    /// | `FontAFM`, `FontPFM`, `FontOutline`, `FontTT` | `name=file` |
    /// | `debug`, `nodebug` | debug flag characters |
    ///
    /// Unknown keys are reported as a warning.
    pub fn set_parameter(&mut self, key: &str, value: &str) -> Result<()> {
        self.guard(|doc| {
            if key.is_empty() {
                return Err(PdfError::value("Tried to set empty parameter"));
            }
            match key {
                "resourcefile" => doc.settings.resource_file = Some(PathBuf::from(value)),
                "FontAFM" | "FontPFM" | "FontOutline" | "FontTT" => {
                    doc.resources.add_line(key, value)?
                }
                "debug" => doc.settings.enable_debug(value),
                "nodebug" => doc.settings.disable_debug(value),
                _ => doc.warn(format!("Tried to set unknown parameter '{}'", key)),
            }
            Ok(())
        })
    }

    /// Register one resource file under `category`, one of `FontAFM`,
    /// `FontPFM`, `FontOutline` or `FontTT`.
    pub fn add_resource(&mut self, category: &str, name: &str, filename: &str) -> Result<()> {
        self.guard(|doc| doc.resources.add(category, name, filename, None))
    }

    /// Set an entry of the document information dictionary.
    pub fn set_info(&mut self, key: &str, value: &str) -> Result<()> {
        self.guard(|doc| {
            if key.is_empty() {
                doc.warn("Empty key in set_info");
            } else {
                doc.info.set(key, value);
            }
            Ok(())
        })
    }

    /// Set the transition used for this and later pages: `none`, `split`,
    /// `blinds`, `box`, `wipe`, `dissolve`, `glitter` or `replace`.
    pub fn set_transition(&mut self, style: &str) -> Result<()> {
        self.guard(|doc| {
            doc.transition = style.parse()?;
            Ok(())
        })
    }

    /// Set how many seconds this and later pages are shown in
    /// presentation mode. Zero or less leaves it to the viewer.
    pub fn set_duration(&mut self, seconds: f64) -> Result<()> {
        self.guard(|doc| {
            doc.duration = seconds;
            Ok(())
        })
    }

    /// Finish the document and hand back the output sink.
    ///
    /// A page still open is ended with a warning, and a document without
    /// pages gets an empty one.
    pub fn close(mut self) -> Result<W> {
        self.guard(|doc| doc.wrapup())?;
        Ok(self.writer.into_inner())
    }

    fn wrapup(&mut self) -> Result<()> {
        if self.state == DocState::Page {
            self.finish_page()?;
            self.warn("Didn't close last page");
        }
        if self.pages.current() == 0 {
            self.start_page(100.0, 100.0)?;
            self.finish_page()?;
            self.warn("Empty document");
        }

        self.info.write(&mut self.writer, self.info_id)?;

        let first_page = self
            .pages
            .id(1)
            .ok_or_else(|| PdfError::InvalidStructure("first page has no id".to_string()))?;
        let open_action = self.writer.begin_obj(None)?;
        write!(self.writer, "[ {} /Fit ]\n", first_page)?;
        self.writer.end_obj()?;

        let ascii_hex = self.settings.ascii_hex();
        self.fonts.write_fonts(&mut self.writer, ascii_hex)?;

        self.pages.write_root(&mut self.writer, self.pages_id)?;

        let writer = &mut self.writer;
        writer.begin_obj(Some(self.catalog_id))?;
        writer.begin_dict()?;
        writer.write_str("/Type /Catalog\n")?;
        write!(writer, "/OpenAction {}\n", open_action)?;
        if !self.outlines.is_empty() {
            writer.write_str("/PageMode /UseOutlines\n")?;
        }
        write!(writer, "/Pages {}\n", self.pages_id)?;
        if let Some(root) = self.outlines.root_id() {
            write!(writer, "/Outlines {}\n", root)?;
        }
        writer.end_dict()?;
        writer.end_obj()?;

        self.outlines.write(&mut self.writer, &self.pages)?;

        // nothing may be written after this point except the xref and trailer
        for id in self.writer.patch_unwritten()? {
            self.warn(format!("Object {} allocated but not used", id.number()));
        }

        let xref_position = self.writer.write_xref()?;
        self.writer
            .write_trailer(self.info_id, self.catalog_id, xref_position)?;
        self.writer.flush()?;

        tracing::debug!(
            "Closed document: {} pages, {} fonts, {} objects, {} bytes",
            self.pages.current(),
            self.fonts.len(),
            self.writer.objects().last_id(),
            self.writer.position()
        );
        Ok(())
    }
}

/// Configures a [`Document`] before it is opened.
///
/// ```rust
/// use streampdf::DocumentBuilder;
///
/// # fn main() -> streampdf::Result<()> {
/// let doc = DocumentBuilder::new()
///     .compress(false)
///     .debug("a")
///     .open_writer(Vec::new())?;
/// assert!(doc.settings().ascii_hex());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder<H: ErrorHandler = DefaultErrorHandler> {
    settings: Settings,
    handler: H,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            handler: DefaultErrorHandler::new(),
        }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ErrorHandler> DocumentBuilder<H> {
    /// Use another error handler.
    pub fn error_handler<H2: ErrorHandler>(self, handler: H2) -> DocumentBuilder<H2> {
        DocumentBuilder {
            settings: self.settings,
            handler,
        }
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Deflate stream data. Has no effect without the `compression`
    /// feature.
    pub fn compress(mut self, compress: bool) -> Self {
        self.settings.compress = compress;
        self
    }

    /// Turn on debug flags, as the `debug` parameter does.
    pub fn debug(mut self, flags: &str) -> Self {
        self.settings.enable_debug(flags);
        self
    }

    pub fn resource_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.resource_file = Some(path.into());
        self
    }

    pub fn open_file(self, path: impl AsRef<Path>) -> Result<Document<BufWriter<File>, H>> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Document::open(
            BufWriter::new(file),
            self.handler,
            self.settings,
            Some(path.to_path_buf()),
        )
    }

    pub fn open_writer<W: Write>(self, writer: W) -> Result<Document<W, H>> {
        Document::open(writer, self.handler, self.settings, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{document, output, RecordingHandler};

    #[test]
    fn test_fixed_object_ids() {
        let doc = document();
        assert_eq!(doc.pages_id.number(), 1);
        assert_eq!(doc.catalog_id.number(), 2);
        assert_eq!(doc.info_id.number(), 3);
        assert_eq!(doc.position(), 15);
    }

    #[test]
    fn test_empty_document_gets_a_page() {
        let mut doc = document();
        doc.set_info("Creator", "tests").unwrap();
        let out = output(doc);

        assert!(out.starts_with("%PDF-1.3\n"));
        assert!(out.contains("/MediaBox [0 0 100 100]\n"));
        assert!(out.contains("/Type /Pages\n/Count 1\n/Kids [4 0 R ]\n"));
        assert!(out.contains("/Creator (tests)\n"));
        assert!(out.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_close_ends_dangling_page() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.guard(|d| d.wrapup()).unwrap();
        assert_eq!(doc.warnings(), ["Didn't close last page"]);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_open_action_and_catalog() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.end_page().unwrap();
        let out = output(doc);

        // info 3 is written first, then the open action takes the next id
        assert!(out.contains("8 0 obj\n[ 4 0 R /Fit ]\nendobj\n"));
        assert!(out.contains("2 0 obj\n<</Type /Catalog\n/OpenAction 8 0 R\n/Pages 1 0 R\n>>\n"));
        assert!(out.contains("trailer\n<</Size 9\n/Info 3 0 R\n/Root 2 0 R\n>>\nstartxref\n"));
    }

    #[test]
    fn test_unused_object_is_patched_with_warning() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.end_page().unwrap();
        let stray = doc.writer.alloc_id();
        let mut warnings = Vec::new();
        let out = {
            let mut doc = doc;
            doc.guard(|d| d.wrapup()).unwrap();
            warnings.extend(doc.warnings().iter().cloned());
            String::from_utf8_lossy(&doc.writer.into_inner()).into_owned()
        };
        assert!(out.contains(&format!("{} 0 obj\nendobj\n", stray.number())));
        assert_eq!(
            warnings,
            [format!("Object {} allocated but not used", stray.number())]
        );
    }

    #[test]
    fn test_parameters() {
        let mut doc = document();
        doc.set_parameter("debug", "ca").unwrap();
        assert!(!doc.settings().compress);
        assert!(doc.settings().ascii_hex());
        doc.set_parameter("nodebug", "a").unwrap();
        assert!(!doc.settings().ascii_hex());

        doc.set_parameter("resourcefile", "fonts.upr").unwrap();
        assert_eq!(
            doc.settings().resource_file.as_deref(),
            Some(Path::new("fonts.upr"))
        );

        doc.set_parameter("colour", "blue").unwrap();
        assert_eq!(doc.warnings(), ["Tried to set unknown parameter 'colour'"]);

        doc.set_parameter("FontAFM", "Foo=foo.afm").unwrap();
        let err = doc.set_parameter("FontAFM", "no separator").unwrap_err();
        assert_eq!(err.category(), "ValueError");
        assert!(doc.is_aborted());
    }

    #[test]
    fn test_fatal_error_reaches_handler_once() {
        let mut doc = DocumentBuilder::new()
            .error_handler(RecordingHandler::default())
            .open_writer(Vec::new())
            .unwrap();
        assert!(doc.end_page().is_err());
        assert!(matches!(doc.begin_page(100.0, 100.0), Err(PdfError::Aborted)));
        assert_eq!(doc.error_handler().fatal, ["RuntimeError"]);
        assert!(matches!(doc.close(), Err(PdfError::Aborted)));
    }

    #[test]
    fn test_create_removes_file_on_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        let mut doc = Document::create(&path).unwrap();
        assert!(path.exists());

        assert!(doc.set_transition("spin").is_err());
        assert!(!path.exists());
        assert_eq!(doc.error_handler().removed_output(), Some(path.as_path()));
    }

    #[test]
    fn test_warnings_are_silent_without_flag() {
        let mut doc = DocumentBuilder::new()
            .error_handler(RecordingHandler::default())
            .open_writer(Vec::new())
            .unwrap();
        doc.warn("reported");
        doc.set_parameter("nodebug", "e").unwrap();
        doc.warn("kept only");
        assert_eq!(doc.error_handler().warnings, ["reported"]);
        assert_eq!(doc.warnings(), ["reported", "kept only"]);
    }
}
