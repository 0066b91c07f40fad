//! Page annotations: notes, links and file attachments.
//!
//! Annotations are collected while a page is open and written when it
//! ends, right after the page object that lists them in `/Annots`.

mod border;

pub use border::{BorderStyle, BorderStyleType};

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::objects::ObjectId;
use crate::source::{self, FileSource};
use crate::structure::PageTable;
use crate::writer::PdfWriter;

/// `/F` flags of a file attachment: print, no zoom, no rotate.
const ATTACHMENT_FLAGS: u32 = 4 | 8 | 16;

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident, $what:literal { $($variant:ident => $key:literal, $pdf:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl FromStr for $name {
            type Err = PdfError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($key => Ok($name::$variant),)+
                    other => Err(PdfError::value(format!(
                        concat!("Unknown ", $what, " '{}'"),
                        other
                    ))),
                }
            }
        }

        impl $name {
            pub fn pdf_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $pdf),+
                }
            }
        }
    };
}

named_enum!(
    /// Icon of a text note.
    NoteIcon, "icon type for text note" {
        Comment => "comment", "Comment",
        Insert => "insert", "Insert",
        Note => "note", "Note",
        Paragraph => "paragraph", "Paragraph",
        NewParagraph => "newparagraph", "NewParagraph",
        Key => "key", "Key",
        Help => "help", "Help",
    }
);

named_enum!(
    /// Icon of a file attachment.
    FileIcon, "icon type for embedded file" {
        Graph => "graph", "Graph",
        Paperclip => "paperclip", "Paperclip",
        Pushpin => "pushpin", "Pushpin",
        Tag => "tag", "Tag",
    }
);

named_enum!(
    /// How a link destination is displayed.
    DestinationFit, "destination type" {
        Retain => "retain", "XYZ",
        FitPage => "fitpage", "Fit",
        FitWidth => "fitwidth", "FitH",
        FitHeight => "fitheight", "FitV",
        FitBBox => "fitbbox", "FitB",
    }
);

impl Default for NoteIcon {
    fn default() -> Self {
        NoteIcon::Note
    }
}

impl Default for FileIcon {
    fn default() -> Self {
        FileIcon::Pushpin
    }
}

impl Default for DestinationFit {
    fn default() -> Self {
        DestinationFit::FitPage
    }
}

impl DestinationFit {
    /// Operands after the page reference in a destination array.
    /// `FitH` in another file uses a top large enough for most pages,
    /// since that page's height isn't known here.
    fn operands(&self, remote: bool) -> &'static str {
        match self {
            DestinationFit::Retain => "/XYZ null null 0",
            DestinationFit::FitPage => "/Fit",
            DestinationFit::FitWidth if remote => "/FitH 2000",
            DestinationFit::FitWidth => "/FitH 0",
            DestinationFit::FitHeight => "/FitV 0",
            DestinationFit::FitBBox => "/FitB",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    Note {
        contents: Option<String>,
        title: Option<String>,
        icon: NoteIcon,
        open: bool,
    },
    /// Link to a page of this document, numbered from 1.
    LocalLink { page: usize, fit: DestinationFit },
    /// Link to a page of another PDF file.
    PdfLink {
        file: String,
        page: i64,
        fit: DestinationFit,
    },
    LaunchLink { file: String },
    WebLink { url: String },
    FileAttachment {
        file: PathBuf,
        description: Option<String>,
        author: Option<String>,
        mime_type: Option<String>,
        icon: FileIcon,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub rect: Rectangle,
    pub border: BorderStyle,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(rect: Rectangle, border: BorderStyle, kind: AnnotationKind) -> Self {
        Self { rect, border, kind }
    }
}

/// The annotations of the page being described.
#[derive(Debug, Default)]
pub struct PageAnnotations {
    items: Vec<Annotation>,
}

impl PageAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.items.push(annotation);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter()
    }

    /// Allocate an id per annotation and write the page's `/Annots`.
    pub fn write_refs<W: Write>(&self, writer: &mut PdfWriter<W>) -> Result<Vec<ObjectId>> {
        if self.items.is_empty() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::with_capacity(self.items.len());
        writer.write_str("/Annots [ ")?;
        for _ in &self.items {
            let id = writer.alloc_id();
            write!(writer, "{} ", id)?;
            ids.push(id);
        }
        writer.write_str("]\n")?;
        Ok(ids)
    }

    /// Write the annotation objects under the ids from
    /// [`write_refs`](Self::write_refs), followed by any attached files.
    /// The list is emptied for the next page.
    pub fn write_objects<W: Write>(
        &mut self,
        writer: &mut PdfWriter<W>,
        ids: &[ObjectId],
        pages: &mut PageTable,
        compress: bool,
    ) -> Result<()> {
        let mut embedded = Vec::new();
        for (annotation, &id) in self.items.iter().zip(ids) {
            if let Some(file_id) = write_annotation(writer, id, annotation, pages)? {
                embedded.push(file_id);
            }
        }

        let attachments = self.items.iter().filter_map(|a| match &a.kind {
            AnnotationKind::FileAttachment {
                file, mime_type, ..
            } => Some((file, mime_type)),
            _ => None,
        });
        for ((file, mime_type), id) in attachments.zip(embedded) {
            write_embedded_file(writer, id, file, mime_type.as_deref(), compress)?;
        }

        self.items.clear();
        Ok(())
    }
}

fn write_text_entry<W: Write>(writer: &mut PdfWriter<W>, key: &str, text: &str) -> Result<()> {
    write!(writer, "/{} ", key)?;
    writer.write_text(text)?;
    writer.write_str("\n")
}

fn write_file_spec<W: Write>(writer: &mut PdfWriter<W>, file: &str) -> Result<()> {
    writer.write_str("/F ")?;
    writer.begin_dict()?;
    writer.write_str("/Type /FileSpec\n")?;
    write_text_entry(writer, "F", file)?;
    writer.end_dict()
}

/// Write one annotation object. Returns the id allocated for the embedded
/// file stream of an attachment.
fn write_annotation<W: Write>(
    writer: &mut PdfWriter<W>,
    id: ObjectId,
    annotation: &Annotation,
    pages: &mut PageTable,
) -> Result<Option<ObjectId>> {
    let mut embedded = None;

    writer.begin_obj(Some(id))?;
    writer.begin_dict()?;
    writer.write_str("/Type /Annot\n")?;

    let subtype = match annotation.kind {
        AnnotationKind::Note { .. } => "Text",
        AnnotationKind::FileAttachment { .. } => "FileAttachment",
        _ => "Link",
    };
    write!(writer, "/Subtype /{}\n", subtype)?;
    write!(writer, "/Rect {}\n", annotation.rect)?;

    if !matches!(annotation.kind, AnnotationKind::FileAttachment { .. }) {
        annotation.border.write(writer)?;
    }

    match &annotation.kind {
        AnnotationKind::Note {
            contents,
            title,
            icon,
            open,
        } => {
            if *open {
                writer.write_str("/Open true\n")?;
            }
            if *icon != NoteIcon::default() {
                write!(writer, "/Name /{}\n", icon.pdf_name())?;
            }
            // required, but may be empty
            write_text_entry(writer, "Contents", contents.as_deref().unwrap_or(""))?;
            if let Some(title) = title {
                write_text_entry(writer, "T", title)?;
            }
        }
        AnnotationKind::LocalLink { page, fit } => {
            let target = pages.id_for(writer, *page);
            write!(writer, "/Dest [{} {}]\n", target, fit.operands(false))?;
        }
        AnnotationKind::PdfLink { file, page, fit } => {
            writer.write_str("/A ")?;
            writer.begin_dict()?;
            writer.write_str("/Type /Action /S /GoToR\n")?;
            // page numbers in the remote file are zero-based
            write!(writer, "/D [{} 0 R {}]\n", page - 1, fit.operands(true))?;
            write_file_spec(writer, file)?;
            writer.end_dict()?;
        }
        AnnotationKind::LaunchLink { file } => {
            writer.write_str("/A ")?;
            writer.begin_dict()?;
            writer.write_str("/Type /Action /S /Launch\n")?;
            write_file_spec(writer, file)?;
            writer.end_dict()?;
        }
        AnnotationKind::WebLink { url } => {
            writer.write_str("/A <</S /URI /URI ")?;
            writer.write_quoted(url.as_bytes())?;
            writer.write_str(">>\n")?;
        }
        AnnotationKind::FileAttachment {
            file,
            description,
            author,
            icon,
            ..
        } => {
            if *icon != FileIcon::default() {
                write!(writer, "/Name /{}\n", icon.pdf_name())?;
            }
            if let Some(author) = author {
                write_text_entry(writer, "T", author)?;
            }
            if let Some(description) = description {
                write_text_entry(writer, "Contents", description)?;
            }
            write!(writer, "/F {}\n", ATTACHMENT_FLAGS)?;

            writer.write_str("/FS ")?;
            writer.begin_dict()?;
            writer.write_str("/Type /FileSpec\n")?;
            write_text_entry(writer, "F", &file.to_string_lossy())?;
            let file_id = writer.alloc_id();
            write!(writer, "/EF << /F {}>>\n", file_id)?;
            writer.end_dict()?;
            embedded = Some(file_id);
        }
    }

    writer.end_dict()?;
    writer.end_obj()?;
    Ok(embedded)
}

fn write_embedded_file<W: Write>(
    writer: &mut PdfWriter<W>,
    id: ObjectId,
    file: &Path,
    mime_type: Option<&str>,
    compress: bool,
) -> Result<()> {
    writer.begin_obj(Some(id))?;
    writer.write_str("<</Type /EmbeddedFile\n")?;
    if let Some(mime_type) = mime_type {
        writer.write_str("/Subtype ")?;
        writer.write_quoted(mime_type.as_bytes())?;
        writer.write_str("\n")?;
    }
    if compress {
        writer.write_str("/Filter /FlateDecode\n")?;
    }
    let length = writer.promise_length()?;
    writer.end_dict()?;

    let stream = writer.begin_stream(length)?;
    let mut src = FileSource::new(file);
    if compress {
        crate::compression::compress(writer, &mut src)?;
    } else {
        source::copy(writer, &mut src)?;
    }
    let measured = writer.end_stream(stream)?;
    writer.end_obj()?;
    writer.write_length(measured)?;

    tracing::debug!("Embedded file {}", file.display());
    Ok(())
}
