//! Font registry and font object output.
//!
//! Fonts are resolved when the caller asks for them, but their objects
//! are only written when the document closes. Each slot gets its object
//! id at resolution time so pages can reference it right away.

pub mod afm;
pub mod core_metrics;
pub mod encoding;
pub mod metrics;
pub mod type1;

pub use afm::{AfmFile, AfmFont};
pub use core_metrics::{is_base14, CoreMetrics, BASE14_FONTS};
pub use encoding::Encoding;
pub use metrics::{FontFlags, FontMetrics, MetricsProvider, Resolved, DEFAULT_WIDTH};
pub use type1::{PortionLengths, Type1Source};

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::objects::ObjectId;
use crate::source;
use crate::writer::PdfWriter;

/// Handle of a resolved font. Displays as its resource name, `F<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(usize);

impl FontHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct FontSlot {
    metrics: FontMetrics,
    obj_id: ObjectId,
    font_file: Option<PathBuf>,
    used_on_current_page: bool,
}

impl FontSlot {
    pub fn name(&self) -> &str {
        &self.metrics.name
    }

    pub fn encoding(&self) -> Encoding {
        self.metrics.encoding
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn obj_id(&self) -> ObjectId {
        self.obj_id
    }

    /// Font program to embed, if any.
    pub fn font_file(&self) -> Option<&Path> {
        self.font_file.as_deref()
    }

    pub fn is_embedded(&self) -> bool {
        self.font_file.is_some()
    }
}

#[derive(Debug, Default)]
pub struct FontRegistry {
    slots: Vec<FontSlot>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, handle: FontHandle) -> Option<&FontSlot> {
        self.slots.get(handle.0)
    }

    /// Look a handle up by its index, as callers holding plain integers do.
    pub fn handle(&self, index: usize) -> Option<FontHandle> {
        (index < self.slots.len()).then_some(FontHandle(index))
    }

    /// An existing slot for `name` in `encoding`. The embedding policy is
    /// not part of the key; whichever request came first decides it.
    pub fn find_cached(&self, name: &str, encoding: Encoding) -> Option<FontHandle> {
        self.slots
            .iter()
            .position(|slot| slot.metrics.name == name && slot.metrics.encoding == encoding)
            .map(FontHandle)
    }

    pub fn insert(
        &mut self,
        metrics: FontMetrics,
        obj_id: ObjectId,
        font_file: Option<PathBuf>,
    ) -> FontHandle {
        self.slots.push(FontSlot {
            metrics,
            obj_id,
            font_file,
            used_on_current_page: false,
        });
        FontHandle(self.slots.len() - 1)
    }

    pub fn mark_used(&mut self, handle: FontHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            slot.used_on_current_page = true;
        }
    }

    pub fn used_on_page(&self) -> bool {
        self.slots.iter().any(|slot| slot.used_on_current_page)
    }

    /// Write the `/Font` entry of a page's resource dictionary and reset
    /// the usage flags for the next page.
    pub fn write_page_fonts<W: Write>(&mut self, writer: &mut PdfWriter<W>) -> Result<()> {
        if !self.used_on_page() {
            return Ok(());
        }

        writer.write_str("/Font ")?;
        writer.begin_dict()?;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.used_on_current_page {
                slot.used_on_current_page = false;
                write!(writer, "/{} {}\n", FontHandle(index), slot.obj_id)?;
            }
        }
        writer.end_dict()
    }

    /// Write every font object. Called once at close.
    pub fn write_fonts<W: Write>(
        &self,
        writer: &mut PdfWriter<W>,
        ascii_hex: bool,
    ) -> Result<()> {
        for (index, slot) in self.slots.iter().enumerate() {
            write_font(writer, FontHandle(index), slot, ascii_hex)?;
        }
        tracing::debug!("Wrote {} font objects", self.slots.len());
        Ok(())
    }
}

fn write_encoding<W: Write>(writer: &mut PdfWriter<W>, encoding: Encoding) -> Result<()> {
    match encoding.pdf_name() {
        Some(name) => write!(writer, "/Encoding /{}\n", name),
        None => Ok(()),
    }
}

fn write_font<W: Write>(
    writer: &mut PdfWriter<W>,
    handle: FontHandle,
    slot: &FontSlot,
    ascii_hex: bool,
) -> Result<()> {
    let metrics = &slot.metrics;

    if is_base14(&metrics.name) {
        writer.begin_obj(Some(slot.obj_id))?;
        writer.begin_dict()?;
        writer.write_str("/Type /Font\n/Subtype /Type1\n")?;
        write!(writer, "/Name /{}\n", handle)?;
        write_encoding(writer, metrics.encoding)?;
        write!(writer, "/BaseFont /{}\n", metrics.name)?;
        writer.end_dict()?;
        return writer.end_obj();
    }

    // open the program first so a missing file leaves no partial object
    let mut program = match &slot.font_file {
        Some(path) => Some(Type1Source::open(path)?),
        None => None,
    };

    writer.begin_obj(Some(slot.obj_id))?;
    writer.begin_dict()?;
    writer.write_str("/Type /Font\n/Subtype /Type1\n")?;
    write!(writer, "/Name /{}\n", handle)?;
    writer.write_str("/FirstChar 0\n/LastChar 255\n")?;
    writer.write_str("/Widths [\n")?;
    for row in metrics.widths.chunks(16) {
        for width in row {
            write!(writer, " {}", width)?;
        }
        writer.write_str("\n")?;
    }
    writer.write_str("]\n")?;
    write_encoding(writer, metrics.encoding)?;
    write!(writer, "/BaseFont /{}\n", metrics.name)?;
    let descriptor_id = writer.alloc_id();
    write!(writer, "/FontDescriptor {}\n", descriptor_id)?;
    writer.end_dict()?;
    writer.end_obj()?;

    writer.begin_obj(Some(descriptor_id))?;
    writer.begin_dict()?;
    writer.write_str("/Type /FontDescriptor\n")?;
    write!(writer, "/Ascent {}\n", metrics.ascender)?;
    write!(writer, "/CapHeight {}\n", metrics.cap_height)?;
    write!(writer, "/Descent {}\n", metrics.descender)?;
    write!(writer, "/Flags {}\n", metrics.flags.bits())?;
    let [llx, lly, urx, ury] = metrics.bbox;
    write!(writer, "/FontBBox [{} {} {} {} ]\n", llx, lly, urx, ury)?;
    write!(writer, "/FontName /{}\n", metrics.name)?;
    write!(writer, "/ItalicAngle {}\n", metrics.italic_angle as i32)?;
    write!(writer, "/StemV {}\n", metrics.stem_v)?;
    let font_file_id = match program {
        Some(_) => {
            let id = writer.alloc_id();
            write!(writer, "/FontFile {}\n", id)?;
            Some(id)
        }
        None => None,
    };
    writer.end_dict()?;
    writer.end_obj()?;

    if let (Some(program), Some(font_file_id)) = (program.as_mut(), font_file_id) {
        write_font_file(writer, font_file_id, program, ascii_hex)?;
    }
    Ok(())
}

fn write_font_file<W: Write>(
    writer: &mut PdfWriter<W>,
    id: ObjectId,
    program: &mut Type1Source,
    ascii_hex: bool,
) -> Result<()> {
    writer.begin_obj(Some(id))?;
    writer.begin_dict()?;
    if ascii_hex {
        writer.write_str("/Filter /ASCIIHexDecode\n")?;
    }
    let length = writer.promise_length()?;
    let length1 = writer.promise_length_key("Length1")?;
    let length2 = writer.promise_length_key("Length2")?;
    let length3 = writer.promise_length_key("Length3")?;
    // trailing zeros are kept; more data may follow them
    writer.end_dict()?;

    let stream = writer.begin_stream(length)?;
    if ascii_hex {
        source::ascii_hex_encode(writer, program)?;
    } else {
        source::copy(writer, program)?;
    }
    let measured = writer.end_stream(stream)?;
    writer.end_obj()?;

    let portions = program.lengths();
    writer.write_length(measured)?;
    let length1 = writer.settle(length1, portions.ascii);
    writer.write_length(length1)?;
    let length2 = writer.settle(length2, portions.encrypted);
    writer.write_length(length2)?;
    let length3 = writer.settle(length3, portions.zeros);
    writer.write_length(length3)?;

    tracing::debug!("Embedded font program {}", program.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn resolve(name: &str, encoding: Encoding) -> FontMetrics {
        CoreMetrics.resolve(name, encoding).unwrap().unwrap().metrics
    }

    fn output(writer: PdfWriter<Vec<u8>>) -> String {
        String::from_utf8_lossy(&writer.into_inner()).into_owned()
    }

    #[test]
    fn test_cache_key_is_name_and_encoding() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut registry = FontRegistry::new();
        let id = writer.alloc_id();
        let handle = registry.insert(resolve("Helvetica", Encoding::WinAnsi), id, None);

        assert_eq!(registry.find_cached("Helvetica", Encoding::WinAnsi), Some(handle));
        assert_eq!(registry.find_cached("Helvetica", Encoding::MacRoman), None);
        assert_eq!(registry.find_cached("Times-Roman", Encoding::WinAnsi), None);
        assert_eq!(handle.to_string(), "F0");
    }

    #[test]
    fn test_page_fonts_lists_used_and_resets() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut registry = FontRegistry::new();
        let a = writer.alloc_id();
        let b = writer.alloc_id();
        registry.insert(resolve("Helvetica", Encoding::WinAnsi), a, None);
        let times = registry.insert(resolve("Times-Roman", Encoding::WinAnsi), b, None);

        registry.mark_used(times);
        registry.write_page_fonts(&mut writer).unwrap();
        assert!(!registry.used_on_page());
        // nothing used, nothing written
        registry.write_page_fonts(&mut writer).unwrap();

        assert_eq!(output(writer), "/Font <</F1 2 0 R\n>>\n");
    }

    #[test]
    fn test_base14_font_object() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut registry = FontRegistry::new();
        let id = writer.alloc_id();
        registry.insert(resolve("Courier", Encoding::WinAnsi), id, None);
        registry.write_fonts(&mut writer, false).unwrap();

        assert_eq!(
            output(writer),
            "1 0 obj\n<</Type /Font\n/Subtype /Type1\n/Name /F0\n\
             /Encoding /WinAnsiEncoding\n/BaseFont /Courier\n>>\nendobj\n"
        );
    }

    #[test]
    fn test_afm_font_writes_widths_and_descriptor() {
        let afm = AfmFont::parse(
            "StartFontMetrics 4.1\nFontName Sample-Roman\nEncodingScheme AdobeStandardEncoding\n\
             ItalicAngle -9.5\nFontBBox -10 -20 900 800\nStartCharMetrics 1\n\
             C 65 ; WX 700 ; N A ;\nEndCharMetrics\nEndFontMetrics\n",
        )
        .unwrap();
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut registry = FontRegistry::new();
        let id = writer.alloc_id();
        registry.insert(afm.metrics(Encoding::Builtin).metrics, id, None);
        registry.write_fonts(&mut writer, false).unwrap();

        let out = output(writer);
        assert!(out.contains("/FirstChar 0\n/LastChar 255\n/Widths [\n 250"));
        assert_eq!(out.matches(" 700").count(), 1);
        assert!(out.contains("/FontDescriptor 2 0 R\n"));
        assert!(out.contains("2 0 obj\n<</Type /FontDescriptor\n"));
        assert!(out.contains("/FontBBox [-10 -20 900 800 ]\n"));
        assert!(out.contains("/ItalicAngle -9\n"));
        assert!(!out.contains("/Encoding"));
        assert!(!out.contains("/FontFile"));
    }

    #[test]
    fn test_embedded_font_file_lengths() {
        let mut pfa = tempfile::NamedTempFile::new().unwrap();
        pfa.write_all(b"%!PS\ncurrentfile eexec\nABCD\n0000\ncleartomark\n")
            .unwrap();

        let mut metrics = resolve("Helvetica", Encoding::Builtin);
        metrics.name = "Sample-Roman".to_string();

        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let mut registry = FontRegistry::new();
        let id = writer.alloc_id();
        registry.insert(metrics, id, Some(pfa.path().to_path_buf()));
        registry.write_fonts(&mut writer, false).unwrap();

        assert!(writer.objects().unwritten().is_empty());
        let out = writer.into_inner();
        let text = String::from_utf8_lossy(&out);
        // font 1, descriptor 2, font file 3, lengths 4..=7
        assert!(text.contains("/FontFile 3 0 R\n"));
        assert!(text.contains("/Length 4 0 R\n/Length1 5 0 R\n/Length2 6 0 R\n/Length3 7 0 R\n"));
        assert!(text.contains("4 0 obj\n42\nendobj\n"));
        assert!(text.contains("5 0 obj\n23\nendobj\n"));
        assert!(text.contains("6 0 obj\n2\nendobj\n"));
        assert!(text.contains("7 0 obj\n17\nendobj\n"));
    }
}
