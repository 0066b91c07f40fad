//! Bookmarks, annotations and their border settings.

use std::io::Write;
use std::path::Path;

use super::Document;
use crate::annotations::{
    Annotation, AnnotationKind, BorderStyleType, DestinationFit, FileIcon, NoteIcon,
};
use crate::error::{ErrorHandler, PdfError, Result};
use crate::geometry::Rectangle;
use crate::structure::OutlineHandle;

impl<W: Write, H: ErrorHandler> Document<W, H> {
    /// Add a bookmark for the current page, below `parent` or at the top
    /// level. Before the first page it points to page 1.
    pub fn add_bookmark(
        &mut self,
        text: &str,
        parent: Option<OutlineHandle>,
        open: bool,
    ) -> Result<OutlineHandle> {
        self.guard(|doc| {
            let page = doc.pages.current().max(1);
            // reserve the target's id so the outline can refer to it
            doc.pages.id_for(&mut doc.writer, page);
            doc.outlines
                .add(&mut doc.writer, text, parent, open, page)
        })
    }

    fn add_annotation(&mut self, rect: Rectangle, kind: AnnotationKind) {
        let annotation = Annotation::new(rect, self.border, kind);
        self.page.annotations.push(annotation);
    }

    /// Add a text note. Either text may be absent.
    pub fn add_note(
        &mut self,
        rect: Rectangle,
        contents: Option<&str>,
        title: Option<&str>,
        icon: NoteIcon,
        open: bool,
    ) -> Result<()> {
        self.guard(|doc| {
            doc.require_page("add_note")?;
            doc.add_annotation(
                rect,
                AnnotationKind::Note {
                    contents: contents.map(str::to_string),
                    title: title.map(str::to_string),
                    icon,
                    open,
                },
            );
            Ok(())
        })
    }

    /// Link to `page` of this document. The page need not exist yet.
    pub fn add_locallink(&mut self, rect: Rectangle, page: usize, fit: DestinationFit) -> Result<()> {
        self.guard(|doc| {
            doc.require_page("add_locallink")?;
            if page == 0 {
                return Err(PdfError::value("Bad page number 0 in add_locallink"));
            }
            doc.add_annotation(rect, AnnotationKind::LocalLink { page, fit });
            Ok(())
        })
    }

    /// Link to `page` of another PDF file.
    pub fn add_pdflink(
        &mut self,
        rect: Rectangle,
        filename: &str,
        page: i64,
        fit: DestinationFit,
    ) -> Result<()> {
        self.guard(|doc| {
            doc.require_page("add_pdflink")?;
            if filename.is_empty() {
                return Err(PdfError::value("Empty filename in add_pdflink"));
            }
            doc.add_annotation(
                rect,
                AnnotationKind::PdfLink {
                    file: filename.to_string(),
                    page,
                    fit,
                },
            );
            Ok(())
        })
    }

    /// Link that opens a file of any type.
    pub fn add_launchlink(&mut self, rect: Rectangle, filename: &str) -> Result<()> {
        self.guard(|doc| {
            doc.require_page("add_launchlink")?;
            if filename.is_empty() {
                return Err(PdfError::value("Empty filename in add_launchlink"));
            }
            doc.add_annotation(
                rect,
                AnnotationKind::LaunchLink {
                    file: filename.to_string(),
                },
            );
            Ok(())
        })
    }

    pub fn add_weblink(&mut self, rect: Rectangle, url: &str) -> Result<()> {
        self.guard(|doc| {
            doc.require_page("add_weblink")?;
            if url.is_empty() {
                return Err(PdfError::value("Empty URL in add_weblink"));
            }
            doc.add_annotation(
                rect,
                AnnotationKind::WebLink {
                    url: url.to_string(),
                },
            );
            Ok(())
        })
    }

    /// Attach a file to the current page. The file is read and embedded
    /// when the page ends.
    #[allow(clippy::too_many_arguments)]
    pub fn attach_file(
        &mut self,
        rect: Rectangle,
        filename: impl AsRef<Path>,
        description: Option<&str>,
        author: Option<&str>,
        mime_type: Option<&str>,
        icon: FileIcon,
    ) -> Result<()> {
        let filename = filename.as_ref();
        self.guard(|doc| {
            doc.require_page("attach_file")?;
            if filename.as_os_str().is_empty() {
                return Err(PdfError::value("Empty file name for file attachment"));
            }
            doc.add_annotation(
                rect,
                AnnotationKind::FileAttachment {
                    file: filename.to_path_buf(),
                    description: description.map(str::to_string),
                    author: author.map(str::to_string),
                    mime_type: mime_type.map(str::to_string),
                    icon,
                },
            );
            Ok(())
        })
    }

    /// Border style of annotations added from now on.
    pub fn set_border_style(&mut self, style: BorderStyleType, width: f64) -> Result<()> {
        self.guard(|doc| doc.border.set_style(style, width))
    }

    pub fn set_border_color(&mut self, red: f64, green: f64, blue: f64) -> Result<()> {
        self.guard(|doc| doc.border.set_color(red, green, blue))
    }

    pub fn set_border_dash(&mut self, d1: f64, d2: f64) -> Result<()> {
        self.guard(|doc| doc.border.set_dash(d1, d2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{document, output};

    fn rect() -> Rectangle {
        Rectangle::new(10.0, 10.0, 60.0, 30.0)
    }

    #[test]
    fn test_bookmark_before_first_page() {
        let mut doc = document();
        let chapter = doc.add_bookmark("Chapter", None, true).unwrap();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.add_bookmark("Section", Some(chapter), false).unwrap();
        doc.end_page().unwrap();
        let out = output(doc);

        // page 1 reserved as 4, outline root 5, first entry 6; the page's
        // contents take 7 and 8 before the second entry
        assert!(out.contains("/PageMode /UseOutlines\n/Pages 1 0 R\n/Outlines 5 0 R\n"));
        assert!(out.contains("6 0 obj\n<</Parent 5 0 R\n/Dest [4 0 R /XYZ 0 0 0]\n/Title (Chapter)\n"));
        assert!(out.contains("9 0 obj\n<</Parent 6 0 R\n/Dest [4 0 R /XYZ 0 0 0]\n/Title (Section)\n"));
    }

    #[test]
    fn test_annotations_need_a_page() {
        let mut doc = document();
        let err = doc
            .add_note(rect(), Some("x"), None, NoteIcon::Note, false)
            .unwrap_err();
        assert_eq!(err.to_string(), "Wrong order of function calls (add_note)");
    }

    #[test]
    fn test_empty_url_is_value_error() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        assert!(matches!(
            doc.add_weblink(rect(), ""),
            Err(PdfError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_border_captured_at_creation() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.set_border_color(1.0, 0.0, 0.0).unwrap();
        doc.add_weblink(rect(), "http://example.com/").unwrap();
        doc.set_border_color(0.0, 0.0, 0.0).unwrap();
        doc.add_launchlink(rect(), "readme.txt").unwrap();

        let borders: Vec<_> = doc.page.annotations.iter().map(|a| a.border.color).collect();
        assert_eq!(borders, vec![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_page_lists_annotations() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.add_locallink(rect(), 2, DestinationFit::FitPage).unwrap();
        doc.end_page().unwrap();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.end_page().unwrap();
        let out = output(doc);

        // annotation 8 is allocated after resources 7 and reserves page 2 as 9
        assert!(out.contains("/Contents [5 0 R ]\n/Annots [ 8 0 R ]\n>>\n"));
        assert!(out.contains("/Dest [9 0 R /Fit]"));
        assert!(out.contains("/Kids [4 0 R 9 0 R ]\n"));
    }

    #[test]
    fn test_bad_border_values() {
        let mut doc = document();
        assert!(doc.set_border_dash(-1.0, 2.0).is_err());
        let mut doc = document();
        assert!(doc.set_border_style(BorderStyleType::Dashed, -0.5).is_err());
    }
}
