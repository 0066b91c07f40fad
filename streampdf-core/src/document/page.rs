//! Page lifecycle and content stream segments.
//!
//! A page's contents are written as one or more stream objects. Opening
//! an image mid-page closes the running segment so the image XObject can
//! be written, and a new segment starts right after it. Every segment
//! gets a deferred `/Length`.

use std::io::Write;
use std::str::FromStr;

use bitflags::bitflags;

use super::{DocState, Document};
use crate::annotations::PageAnnotations;
use crate::error::{ErrorHandler, PdfError, Result};
use crate::graphics::FillRule;
use crate::objects::ObjectId;
use crate::text::TextState;
use crate::writer::{Real, StreamLength};

/// Acrobat 4 accepts pages between a quarter inch and 200 inches.
const ACRO4_MIN_PAGE: f64 = 18.0;
const ACRO4_MAX_PAGE: f64 = 14400.0;
/// Acrobat 3 accepts pages between one and 45 inches.
const ACRO3_MIN_PAGE: f64 = 72.0;
const ACRO3_MAX_PAGE: f64 = 3240.0;

bitflags! {
    /// Procedure sets a page uses, for its `/ProcSet` resource.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcSet: u8 {
        const PDF = 1 << 0;
        const IMAGE_B = 1 << 1;
        const IMAGE_C = 1 << 2;
        const IMAGE_I = 1 << 3;
        const TEXT = 1 << 4;
    }
}

impl ProcSet {
    fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            (ProcSet::IMAGE_B, "/ImageB"),
            (ProcSet::IMAGE_C, "/ImageC"),
            (ProcSet::IMAGE_I, "/ImageI"),
            (ProcSet::TEXT, "/Text"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

/// Effect used when a viewer moves to a page in presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    None,
    Split,
    Blinds,
    Box,
    Wipe,
    Dissolve,
    Glitter,
    Replace,
}

impl FromStr for Transition {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Transition::None),
            "split" => Ok(Transition::Split),
            "blinds" => Ok(Transition::Blinds),
            "box" => Ok(Transition::Box),
            "wipe" => Ok(Transition::Wipe),
            "dissolve" => Ok(Transition::Dissolve),
            "glitter" => Ok(Transition::Glitter),
            "replace" => Ok(Transition::Replace),
            other => Err(PdfError::value(format!(
                "Unknown page transition type '{}'",
                other
            ))),
        }
    }
}

impl Transition {
    /// Value of `/S` in the `/Trans` dictionary.
    pub fn pdf_name(&self) -> Option<&'static str> {
        match self {
            Transition::None => None,
            Transition::Split => Some("Split"),
            Transition::Blinds => Some("Blinds"),
            Transition::Box => Some("Box"),
            Transition::Wipe => Some("Wipe"),
            Transition::Dissolve => Some("Dissolve"),
            Transition::Glitter => Some("Glitter"),
            Transition::Replace => Some("R"),
        }
    }
}

/// State of the page being described. Reset by every `begin_page`.
#[derive(Debug, Default)]
pub(crate) struct PageState {
    pub(crate) width: f64,
    pub(crate) height: f64,
    /// Content segments written so far, in order.
    pub(crate) contents: Vec<ObjectId>,
    /// The segment currently open, if any.
    pub(crate) segment: Option<StreamLength>,
    pub(crate) in_text: bool,
    pub(crate) procset: ProcSet,
    pub(crate) thumb: Option<ObjectId>,
    pub(crate) annotations: PageAnnotations,
    pub(crate) fill_rule: FillRule,
}

impl PageState {
    fn reset(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.contents.clear();
        self.segment = None;
        self.in_text = false;
        self.procset = ProcSet::empty();
        self.thumb = None;
        self.annotations = PageAnnotations::new();
        self.fill_rule = FillRule::default();
    }
}

fn page_size_warning(width: f64, height: f64) -> Option<&'static str> {
    let outside = |min: f64, max: f64| {
        [width, height].iter().any(|&side| side < min || side > max)
    };
    if outside(ACRO4_MIN_PAGE, ACRO4_MAX_PAGE) {
        Some("Page size incompatible with Acrobat 4")
    } else if outside(ACRO3_MIN_PAGE, ACRO3_MAX_PAGE) {
        Some("Page size incompatible with Acrobat 3")
    } else {
        None
    }
}

impl<W: Write, H: ErrorHandler> Document<W, H> {
    /// Start a new page of `width` x `height` points.
    pub fn begin_page(&mut self, width: f64, height: f64) -> Result<()> {
        self.guard(|doc| doc.start_page(width, height))
    }

    /// Finish the current page and write its page and resource objects.
    pub fn end_page(&mut self) -> Result<()> {
        self.guard(|doc| doc.finish_page())
    }

    pub(crate) fn start_page(&mut self, width: f64, height: f64) -> Result<()> {
        if self.state != DocState::Open {
            return Err(PdfError::state("begin_page"));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(PdfError::value(format!(
                "Bogus page size {} x {}",
                Real(width),
                Real(height)
            )));
        }
        if let Some(warning) = page_size_warning(width, height) {
            self.warn(warning);
        }

        let id = self.pages.begin_next(&mut self.writer);
        self.page.reset(width, height);
        // font resources are per page, so each page sets its own font
        self.text = TextState::default();
        self.state = DocState::Page;
        tracing::debug!(
            "Begin page {} ({}) {} x {}",
            self.pages.current(),
            id,
            Real(width),
            Real(height)
        );

        self.begin_contents_section()
    }

    pub(crate) fn finish_page(&mut self) -> Result<()> {
        self.require_page("end_page")?;
        self.end_contents_section()?;

        let page_id = self
            .pages
            .id(self.pages.current())
            .ok_or_else(|| PdfError::InvalidStructure("current page has no id".to_string()))?;

        let writer = &mut self.writer;
        writer.begin_obj(Some(page_id))?;
        writer.begin_dict()?;
        writer.write_str("/Type /Page\n")?;
        write!(writer, "/Parent {}\n", self.pages_id)?;
        let resources_id = writer.alloc_id();
        write!(writer, "/Resources {}\n", resources_id)?;
        write!(
            writer,
            "/MediaBox [0 0 {} {}]\n",
            Real(self.page.width),
            Real(self.page.height)
        )?;

        if self.duration > 0.0 {
            write!(writer, "/D {}\n", Real(self.duration))?;
        }
        if let Some(style) = self.transition.pdf_name() {
            writer.write_str("/Trans ")?;
            writer.begin_dict()?;
            write!(writer, "/S /{}", style)?;
            writer.end_dict()?;
        }

        writer.write_str("/Contents [")?;
        for id in &self.page.contents {
            write!(writer, "{} ", id)?;
        }
        writer.write_str("]\n")?;

        if let Some(thumb) = self.page.thumb {
            write!(writer, "/Thumb {}\n", thumb)?;
        }
        let annotation_ids = self.page.annotations.write_refs(writer)?;
        writer.end_dict()?;
        writer.end_obj()?;

        let compress = self.settings.compressing();
        self.page
            .annotations
            .write_objects(&mut self.writer, &annotation_ids, &mut self.pages, compress)?;

        let writer = &mut self.writer;
        writer.begin_obj(Some(resources_id))?;
        writer.begin_dict()?;
        writer.write_str("/ProcSet [/PDF")?;
        for name in self.page.procset.names() {
            write!(writer, " {}", name)?;
        }
        writer.write_str("]\n")?;
        self.fonts.write_page_fonts(writer)?;
        self.images.write_page_xobjects(writer)?;
        writer.end_dict()?;
        writer.end_obj()?;

        self.state = DocState::Open;
        tracing::debug!(
            "End page {} with {} content segments",
            self.pages.current(),
            self.page.contents.len()
        );
        Ok(())
    }

    /// Open a content segment unless one is already open.
    pub(crate) fn begin_contents_section(&mut self) -> Result<()> {
        if self.state != DocState::Page {
            return Err(PdfError::InvalidStructure(
                "Tried to start contents section outside page description".to_string(),
            ));
        }
        if self.page.segment.is_some() {
            return Ok(());
        }

        let id = self.writer.begin_obj(None)?;
        self.page.contents.push(id);
        self.writer.begin_dict()?;
        let length = self.writer.promise_length()?;
        self.writer.end_dict()?;
        self.page.segment = Some(self.writer.begin_stream(length)?);
        Ok(())
    }

    /// Close the open content segment and write its length.
    pub(crate) fn end_contents_section(&mut self) -> Result<()> {
        if self.state != DocState::Page {
            return Err(PdfError::InvalidStructure(
                "Tried to end contents section outside page description".to_string(),
            ));
        }
        if self.page.segment.is_none() {
            return Ok(());
        }

        self.end_text()?;
        if let Some(segment) = self.page.segment.take() {
            let length = self.writer.end_stream(segment)?;
            self.writer.end_obj()?;
            self.writer.write_length(length)?;
        }
        Ok(())
    }

    /// Enter text mode, writing `BT` if not already in it.
    pub(crate) fn begin_text(&mut self) -> Result<()> {
        if self.page.in_text {
            return Ok(());
        }
        self.page.procset |= ProcSet::TEXT;
        self.page.in_text = true;
        self.writer.write_str("BT\n")
    }

    /// Leave text mode, writing `ET` if in it.
    pub(crate) fn end_text(&mut self) -> Result<()> {
        if !self.page.in_text {
            return Ok(());
        }
        self.page.in_text = false;
        self.writer.write_str("ET\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{document, output};

    #[test]
    fn test_page_size_policy() {
        assert_eq!(page_size_warning(595.0, 842.0), None);
        assert_eq!(
            page_size_warning(50.0, 842.0),
            Some("Page size incompatible with Acrobat 3")
        );
        assert_eq!(
            page_size_warning(10.0, 842.0),
            Some("Page size incompatible with Acrobat 4")
        );
        assert_eq!(
            page_size_warning(595.0, 20000.0),
            Some("Page size incompatible with Acrobat 4")
        );
    }

    #[test]
    fn test_transition_names() {
        assert_eq!("replace".parse::<Transition>().unwrap().pdf_name(), Some("R"));
        assert_eq!("none".parse::<Transition>().unwrap().pdf_name(), None);
        assert!("fade".parse::<Transition>().is_err());
    }

    #[test]
    fn test_empty_page_objects() {
        let mut doc = document();
        doc.begin_page(200.0, 300.0).unwrap();
        doc.end_page().unwrap();
        let out = output(doc);

        // pages 1, catalog 2, info 3, page 4, contents 5, length 6, resources 7
        assert!(out.contains("5 0 obj\n<</Length 6 0 R\n>>\nstream\nendstream\nendobj\n"));
        assert!(out.contains("6 0 obj\n0\nendobj\n"));
        assert!(out.contains(
            "4 0 obj\n<</Type /Page\n/Parent 1 0 R\n/Resources 7 0 R\n\
             /MediaBox [0 0 200 300]\n/Contents [5 0 R ]\n>>\nendobj\n"
        ));
        assert!(out.contains("7 0 obj\n<</ProcSet [/PDF]\n>>\nendobj\n"));
    }

    #[test]
    fn test_text_mode_closes_with_segment() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.begin_text().unwrap();
        doc.begin_text().unwrap();
        doc.end_page().unwrap();
        let out = output(doc);

        assert!(out.contains("stream\nBT\nET\nendstream\n"));
        assert!(out.contains("6 0 obj\n6\nendobj\n"));
        assert!(out.contains("/ProcSet [/PDF /Text]\n"));
    }

    #[test]
    fn test_transition_and_duration_on_page() {
        let mut doc = document();
        doc.set_transition("wipe").unwrap();
        doc.set_duration(2.5).unwrap();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.end_page().unwrap();
        let out = output(doc);

        assert!(out.contains("/D 2.5\n/Trans <</S /Wipe>>\n/Contents ["));
    }

    #[test]
    fn test_bad_page_size_is_fatal() {
        let mut doc = document();
        let err = doc.begin_page(0.0, 100.0).unwrap_err();
        assert!(matches!(err, PdfError::InvalidValue(_)));
        assert!(matches!(doc.end_page(), Err(PdfError::Aborted)));
    }

    #[test]
    fn test_nested_begin_page_is_state_error() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        let err = doc.begin_page(200.0, 200.0).unwrap_err();
        assert_eq!(err.category(), "RuntimeError");
    }

    #[test]
    fn test_font_does_not_carry_over_to_next_page() {
        let mut doc = document();
        let font = doc.find_font("Helvetica", "winansi", false).unwrap().unwrap();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.set_font(font, 12.0).unwrap();
        doc.show("one").unwrap();
        doc.end_page().unwrap();

        doc.begin_page(200.0, 200.0).unwrap();
        let err = doc.show("two").unwrap_err();
        assert!(matches!(err, PdfError::InvalidState(_)));
    }

    #[test]
    fn test_small_page_warns() {
        let mut doc = document();
        doc.begin_page(50.0, 50.0).unwrap();
        assert_eq!(doc.warnings(), ["Page size incompatible with Acrobat 3"]);
    }
}
