//! Font resolution through the resource index, AFM metrics and Type 1
//! embedding, seen from the finished file.

mod common;

use std::fs;
use std::path::Path;

use common::PdfFile;
use streampdf::{Document, DocumentBuilder, Result};
use tempfile::TempDir;

const TEST_AFM: &str = "StartFontMetrics 4.1
Comment a small font for tests
FontName TestSans
EncodingScheme AdobeStandardEncoding
Weight Bold
ItalicAngle 0
IsFixedPitch false
FontBBox -100 -200 1000 900
CapHeight 700
Ascender 750
Descender -250
StdVW 90
StartCharMetrics 3
C 32 ; WX 300 ; N space ;
C 65 ; WX 650 ; N A ;
C 66 ; WX 600 ; N B ;
EndCharMetrics
EndFontMetrics
";

const TEST_PFA: &str = "%!PS-AdobeFont-1.0: TestSans 001.000
/FontName /TestSans def
currentfile eexec
d9d66f633b846a98
9B4A
0000000000000000
0000000000000000
cleartomark
";

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_afm_font_widths_and_descriptor() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let afm = write_file(dir.path(), "testsans.afm", TEST_AFM);

    let mut doc = Document::with_writer(Vec::new())?;
    doc.add_resource("FontAFM", "TestSans", &afm)?;
    let font = doc.find_font("TestSans", "winansi", false)?.unwrap();
    assert_eq!(doc.stringwidth("AB", font, 10.0)?, 12.5);
    // unknown glyphs get the default width
    assert_eq!(doc.stringwidth("C", font, 1.0)?, 0.25);

    doc.begin_page(200.0, 200.0)?;
    doc.set_font(font, 10.0)?;
    doc.show("AB A")?;
    doc.end_page()?;

    let pdf = PdfFile::from_document(doc)?;
    pdf.assert_well_formed();
    let text = pdf.text();
    assert!(text.contains("/FirstChar 0\n/LastChar 255\n/Widths [\n"));
    assert!(text.contains(" 300 250 250"));
    assert!(text.contains("/Type /FontDescriptor\n/Ascent 750\n/CapHeight 700\n/Descent -250\n"));
    assert!(text.contains("/Flags 262176\n"));
    assert!(text.contains("/FontBBox [-100 -200 1000 900 ]\n"));
    assert!(!text.contains("/FontFile"));
    Ok(())
}

#[test]
fn test_embedded_type1_lengths() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let afm = write_file(dir.path(), "testsans.afm", TEST_AFM);
    let pfa = write_file(dir.path(), "testsans.pfa", TEST_PFA);

    let mut doc = DocumentBuilder::new().compress(false).open_writer(Vec::new())?;
    doc.set_parameter("FontAFM", &format!("TestSans={}", afm))?;
    doc.set_parameter("FontOutline", &format!("TestSans={}", pfa))?;
    let font = doc.find_font("TestSans", "builtin", true)?.unwrap();
    doc.begin_page(200.0, 200.0)?;
    doc.set_font(font, 10.0)?;
    doc.show("AB")?;
    doc.end_page()?;

    let pdf = PdfFile::from_document(doc)?;
    pdf.assert_well_formed();

    let font_file = pdf
        .streams()
        .into_iter()
        .find(|&n| pdf.object(n).contains("/Length1 "))
        .expect("no font file stream");
    let dict = pdf.object(font_file);
    let length_of = |key: &str| -> u64 {
        let at = dict.find(key).unwrap() + key.len();
        let id: usize = dict[at..].split(' ').next().unwrap().parse().unwrap();
        pdf.integer(id)
    };
    let (l1, l2, l3) = (length_of("/Length1 "), length_of("/Length2 "), length_of("/Length3 "));

    // the hex lines arrive as binary: 8 + 2 bytes
    assert_eq!(l2, 10);
    assert_eq!(
        l1,
        "%!PS-AdobeFont-1.0: TestSans 001.000\n/FontName /TestSans def\ncurrentfile eexec\n".len()
            as u64
    );
    assert_eq!(l3, "0000000000000000\n0000000000000000\ncleartomark\n".len() as u64);
    assert_eq!(pdf.stream_body(font_file).len() as u64, l1 + l2 + l3);
    assert!(pdf.text().contains("/FontFile "));
    Ok(())
}

#[test]
fn test_embedding_without_outline_warns() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let afm = write_file(dir.path(), "testsans.afm", TEST_AFM);
    let upr = write_file(dir.path(), "empty.upr", "PS-Resources-1.0\n.\n");

    let mut doc = DocumentBuilder::new()
        .resource_file(&upr)
        .open_writer(Vec::new())?;
    doc.add_resource("FontAFM", "TestSans", &afm)?;
    assert_eq!(doc.find_font("TestSans", "winansi", true)?, None);
    assert_eq!(doc.warnings(), ["No font outline file for font 'TestSans'"]);
    Ok(())
}

#[test]
fn test_fonts_resolved_from_resource_file() -> Result<()> {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "testsans.afm", TEST_AFM);
    let upr = format!(
        "PS-Resources-1.0\nFontAFM\n.\n/{}\nFontAFM\nTestSans=testsans.afm\n.\n",
        dir.path().display()
    );
    let upr = write_file(dir.path(), "fonts.upr", &upr);

    let mut doc = DocumentBuilder::new()
        .resource_file(&upr)
        .open_writer(Vec::new())?;
    let font = doc.find_font("TestSans", "winansi", false)?;
    assert!(font.is_some());
    assert!(doc.warnings().is_empty());
    Ok(())
}

#[test]
fn test_font_lookup_is_cached() -> Result<()> {
    let mut doc = Document::with_writer(Vec::new())?;
    let first = doc.find_font("Times-Bold", "winansi", false)?;
    for _ in 0..5 {
        assert_eq!(doc.find_font("Times-Bold", "winansi", false)?, first);
    }
    let other = doc.find_font("Times-Bold", "macroman", false)?;
    assert_ne!(other, first);

    let pdf = PdfFile::from_document(doc)?;
    assert_eq!(pdf.count("/BaseFont /Times-Bold\n"), 2);
    assert_eq!(pdf.count("/Encoding /MacRomanEncoding\n"), 1);
    Ok(())
}

#[test]
fn test_text_escaping_in_content() -> Result<()> {
    let mut doc = Document::with_writer(Vec::new())?;
    doc.begin_page(200.0, 200.0)?;
    assert!(doc.set_font_by_name("Courier", "winansi", 9.0)?);
    doc.show("(x)\\y")?;
    doc.end_page()?;

    let pdf = PdfFile::from_document(doc)?;
    let content = pdf.streams()[0];
    let body = String::from_utf8_lossy(pdf.stream_body(content)).into_owned();
    assert!(body.contains("(\\(x\\)\\\\y) Tj\n"));
    Ok(())
}
