//! Reading back the files the writer produced.
//!
//! Just enough of a PDF reader to check the structure: the trailer, the
//! cross-reference table, object bodies, references and stream lengths.

#![allow(dead_code)]

use streampdf::{Document, Result};

/// Route the writer's log output to the test harness, filtered by
/// `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

fn parse_number(bytes: &[u8], at: usize) -> (u64, usize) {
    let digits = bytes[at..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let text = std::str::from_utf8(&bytes[at..at + digits]).unwrap();
    (text.parse().unwrap(), at + digits)
}

/// A written document, indexed through its cross-reference table.
pub struct PdfFile {
    pub bytes: Vec<u8>,
    /// Offsets by object number; entry 0 is the free-list head.
    pub offsets: Vec<usize>,
    pub xref_offset: usize,
}

impl PdfFile {
    /// Parse the trailer and cross-reference table, panicking on anything
    /// malformed.
    pub fn parse(bytes: Vec<u8>) -> PdfFile {
        assert!(bytes.starts_with(b"%PDF-1.3\n%"), "bad header");
        assert!(bytes.ends_with(b"%%EOF\n"), "bad end marker");

        let startxref = rfind(&bytes, b"startxref\n").expect("no startxref");
        let (xref_offset, _) = parse_number(&bytes, startxref + b"startxref\n".len());
        let xref_offset = xref_offset as usize;
        assert!(bytes[xref_offset..].starts_with(b"xref\n0 "), "startxref is off");

        let (size, end) = parse_number(&bytes, xref_offset + b"xref\n0 ".len());
        let mut at = end + 1;
        assert_eq!(&bytes[at..at + 20], b"0000000000 65535 f \n");

        let mut offsets = vec![0];
        for _ in 1..size {
            at += 20;
            let entry = &bytes[at..at + 20];
            assert_eq!(&entry[10..], b" 00000 n \n", "bad xref entry");
            let (offset, _) = parse_number(entry, 0);
            offsets.push(offset as usize);
        }

        let file = PdfFile {
            bytes,
            offsets,
            xref_offset,
        };
        assert!(file
            .trailer()
            .contains(&format!("/Size {}\n", file.size())));
        file
    }

    pub fn from_document<H: streampdf::ErrorHandler>(doc: Document<Vec<u8>, H>) -> Result<PdfFile> {
        Ok(PdfFile::parse(doc.close()?))
    }

    pub fn size(&self) -> usize {
        self.offsets.len()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn trailer(&self) -> String {
        let start = rfind(&self.bytes, b"trailer\n").expect("no trailer");
        String::from_utf8_lossy(&self.bytes[start..]).into_owned()
    }

    /// Raw bytes of object `n`, from its header to the next object or the
    /// cross-reference table.
    pub fn object_bytes(&self, n: usize) -> &[u8] {
        let start = self.offsets[n];
        let end = self
            .offsets
            .iter()
            .copied()
            .filter(|&o| o > start)
            .min()
            .unwrap_or(self.xref_offset)
            .min(self.xref_offset);
        &self.bytes[start..end]
    }

    pub fn object(&self, n: usize) -> String {
        String::from_utf8_lossy(self.object_bytes(n)).into_owned()
    }

    /// Value of a length object.
    pub fn integer(&self, n: usize) -> u64 {
        let body = self.object_bytes(n);
        let header = format!("{} 0 obj\n", n);
        assert!(body.starts_with(header.as_bytes()));
        let (value, end) = parse_number(body, header.len());
        assert_eq!(&body[end..end + 8], b"\nendobj\n");
        value
    }

    /// Every object number used in an `N 0 R` reference outside stream
    /// bodies.
    pub fn references(&self) -> Vec<usize> {
        let mut refs = Vec::new();
        for n in 1..self.size() {
            let body = self.object_bytes(n);
            let dict_end = find(body, b"stream\n", 0).unwrap_or(body.len());
            let dict = &body[..dict_end];
            let mut at = 0;
            while let Some(pos) = find(dict, b" 0 R", at) {
                at = pos + 4;
                let digits = dict[..pos]
                    .iter()
                    .rev()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                if digits == 0 {
                    continue;
                }
                let (value, _) = parse_number(dict, pos - digits);
                refs.push(value as usize);
            }
        }
        refs
    }

    /// Object numbers of every stream object.
    pub fn streams(&self) -> Vec<usize> {
        (1..self.size())
            .filter(|&n| find(self.object_bytes(n), b"\nstream\n", 0).is_some())
            .collect()
    }

    /// Body of stream object `n`, as long as its `/Length` object says.
    pub fn stream_body(&self, n: usize) -> &[u8] {
        let body = self.object_bytes(n);
        let start = find(body, b"\nstream\n", 0).expect("not a stream") + b"\nstream\n".len();
        let key = find(&body[..start], b"/Length ", 0).expect("no /Length");
        let (value, end) = parse_number(body, key + b"/Length ".len());
        let length = if body[end..].starts_with(b" 0 R") {
            self.integer(value as usize)
        } else {
            value
        };
        &body[start..start + length as usize]
    }

    /// Check that every stream ends exactly where its length says.
    pub fn assert_stream_lengths(&self) {
        for n in self.streams() {
            let body = self.object_bytes(n);
            let start = find(body, b"\nstream\n", 0).unwrap() + b"\nstream\n".len();
            let length = self.stream_body(n).len();
            let rest = &body[start + length..];
            assert!(
                rest.starts_with(b"endstream\n") || rest.starts_with(b"\nendstream\n"),
                "stream {} does not end at its length",
                n
            );
        }
    }

    /// Check that every reference names an object in the table.
    pub fn assert_references_resolve(&self) {
        for r in self.references() {
            assert!(r >= 1 && r < self.size(), "dangling reference {} 0 R", r);
            let header = format!("{} 0 obj\n", r);
            assert!(self.object_bytes(r).starts_with(header.as_bytes()));
        }
    }

    /// Structure checks every document must pass.
    pub fn assert_well_formed(&self) {
        for n in 1..self.size() {
            let header = format!("{} 0 obj\n", n);
            assert!(
                self.object_bytes(n).starts_with(header.as_bytes()),
                "xref entry {} points elsewhere",
                n
            );
        }
        self.assert_references_resolve();
        self.assert_stream_lengths();
    }

    pub fn count(&self, needle: &str) -> usize {
        let mut count = 0;
        let mut at = 0;
        while let Some(pos) = find(&self.bytes, needle.as_bytes(), at) {
            count += 1;
            at = pos + needle.len();
        }
        count
    }
}
