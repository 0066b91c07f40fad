//! Forward-only PDF serializer.
//!
//! [`PdfWriter`] appends bytes to a sink and tracks the current position so
//! every object's offset can be recorded as it is written. Streams use a
//! deferred `/Length`: the length is written as a reference to an object
//! that is only emitted once the stream body is complete.

pub mod format;

use std::fmt;
use std::io::Write;

use crate::error::Result;
use crate::objects::{ObjectId, ObjectTable};

pub use format::{format_real, quote_bytes, quote_text, text_string_bytes, Real};

/// First two lines of every file: the version and a binary marker.
pub const HEADER: &[u8] = b"%PDF-1.3\n%\xE2\xE3\xCF\xD3\n";

/// A `/Length` entry that has been promised but whose stream has not
/// started yet.
#[must_use = "a pending length must be passed to begin_stream"]
#[derive(Debug)]
pub struct PendingLength {
    id: ObjectId,
}

/// A stream body in progress.
#[must_use = "an open stream must be closed with end_stream"]
#[derive(Debug)]
pub struct StreamLength {
    id: ObjectId,
    start: u64,
}

/// The measured length of a finished stream body, to be written as its
/// own object after the stream's `endobj`.
#[must_use = "a measured length must be written with write_length"]
#[derive(Debug, PartialEq, Eq)]
pub struct MeasuredLength {
    id: ObjectId,
    len: u64,
}

impl MeasuredLength {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct PdfWriter<W: Write> {
    writer: W,
    current_position: u64,
    objects: ObjectTable,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            current_position: 0,
            objects: ObjectTable::new(),
        }
    }

    pub fn position(&self) -> u64 {
        self.current_position
    }

    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    pub fn alloc_id(&mut self) -> ObjectId {
        self.objects.allocate()
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Lets `write!` target the writer directly.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        match args.as_str() {
            Some(s) => self.write_str(s),
            None => self.write_str(&args.to_string()),
        }
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_bytes(HEADER)
    }

    /// Start an object, allocating a fresh id when `id` is `None`.
    pub fn begin_obj(&mut self, id: Option<ObjectId>) -> Result<ObjectId> {
        let id = match id {
            Some(id) => id,
            None => self.objects.allocate(),
        };
        self.objects.record(id, self.current_position)?;
        write!(self, "{} 0 obj\n", id.number())?;
        Ok(id)
    }

    pub fn end_obj(&mut self) -> Result<()> {
        self.write_bytes(b"endobj\n")
    }

    pub fn begin_dict(&mut self) -> Result<()> {
        self.write_bytes(b"<<")
    }

    pub fn end_dict(&mut self) -> Result<()> {
        self.write_bytes(b">>\n")
    }

    /// Write a quoted literal string.
    pub fn write_quoted(&mut self, bytes: &[u8]) -> Result<()> {
        let quoted = quote_bytes(bytes);
        self.write_bytes(&quoted)
    }

    /// Write a text string, choosing between Latin-1 and UTF-16BE.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        let quoted = quote_text(text);
        self.write_bytes(&quoted)
    }

    /// Allocate the length object and write `/Length n 0 R` into the
    /// current stream dictionary.
    pub fn promise_length(&mut self) -> Result<PendingLength> {
        self.promise_length_key("Length")
    }

    /// Like [`promise_length`](Self::promise_length) for any length key,
    /// e.g. `/Length1` of an embedded font program.
    pub fn promise_length_key(&mut self, key: &str) -> Result<PendingLength> {
        let id = self.objects.allocate();
        write!(self, "/{} {}\n", key, id)?;
        Ok(PendingLength { id })
    }

    /// Write the `stream` keyword and remember where the body starts.
    pub fn begin_stream(&mut self, pending: PendingLength) -> Result<StreamLength> {
        self.write_bytes(b"stream\n")?;
        Ok(StreamLength {
            id: pending.id,
            start: self.current_position,
        })
    }

    /// Measure the body without closing the stream.
    pub fn measure(&self, stream: StreamLength) -> MeasuredLength {
        MeasuredLength {
            id: stream.id,
            len: self.current_position - stream.start,
        }
    }

    /// Start measuring an arbitrary part of a stream body against a
    /// promised length.
    pub fn mark(&self, pending: PendingLength) -> StreamLength {
        StreamLength {
            id: pending.id,
            start: self.current_position,
        }
    }

    /// Resolve a promised length with a value counted by the caller, e.g.
    /// one portion of an embedded font program.
    pub fn settle(&self, pending: PendingLength, len: u64) -> MeasuredLength {
        MeasuredLength {
            id: pending.id,
            len,
        }
    }

    /// Measure the body and write `endstream`.
    pub fn end_stream(&mut self, stream: StreamLength) -> Result<MeasuredLength> {
        let measured = self.measure(stream);
        self.write_bytes(b"endstream\n")?;
        Ok(measured)
    }

    /// Emit the promised length object.
    pub fn write_length(&mut self, length: MeasuredLength) -> Result<()> {
        self.begin_obj(Some(length.id))?;
        write!(self, "{}\n", length.len)?;
        self.end_obj()
    }

    /// Write an empty object for every id that was allocated but never
    /// used, returning the ids patched.
    pub fn patch_unwritten(&mut self) -> Result<Vec<ObjectId>> {
        let missing = self.objects.unwritten();
        for &id in &missing {
            self.begin_obj(Some(id))?;
            self.end_obj()?;
        }
        Ok(missing)
    }

    /// Write the cross-reference table and return its offset.
    pub fn write_xref(&mut self) -> Result<u64> {
        let entries = self.objects.xref_entries()?;
        let xref_position = self.current_position;

        write!(self, "xref\n0 {}\n", self.objects.size())?;
        self.write_bytes(b"0000000000 65535 f \n")?;
        for offset in entries {
            write!(self, "{:010} 00000 n \n", offset)?;
        }
        Ok(xref_position)
    }

    pub fn write_trailer(
        &mut self,
        info: ObjectId,
        root: ObjectId,
        xref_position: u64,
    ) -> Result<()> {
        self.write_bytes(b"trailer\n")?;
        self.begin_dict()?;
        write!(self, "/Size {}\n", self.objects.size())?;
        write!(self, "/Info {}\n", info)?;
        write!(self, "/Root {}\n", root)?;
        self.end_dict()?;
        write!(self, "startxref\n{}\n", xref_position)?;
        self.write_bytes(b"%%EOF\n")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> fmt::Debug for PdfWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfWriter")
            .field("current_position", &self.current_position)
            .field("objects", &self.objects.last_id())
            .finish()
    }
}

/// Adapter that lets byte-oriented encoders write through a [`PdfWriter`]
/// while keeping its position accurate.
pub(crate) struct Sink<'a, W: Write>(pub(crate) &'a mut PdfWriter<W>);

impl<W: Write> Write for Sink<'_, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.writer.write_all(buf)?;
        self.0.current_position += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> PdfWriter<Vec<u8>> {
        PdfWriter::new_with_writer(Vec::new())
    }

    #[test]
    fn test_header() {
        let mut w = writer();
        w.write_header().unwrap();
        assert_eq!(w.position(), 15);
        assert!(w.get_ref().starts_with(b"%PDF-1.3\n%"));
    }

    #[test]
    fn test_begin_obj_records_offset() {
        let mut w = writer();
        w.write_header().unwrap();
        let id = w.begin_obj(None).unwrap();
        w.end_obj().unwrap();

        assert_eq!(id.number(), 1);
        assert_eq!(w.objects().offset(id), Some(15));
        assert_eq!(&w.get_ref()[15..], b"1 0 obj\nendobj\n");
    }

    #[test]
    fn test_writing_same_object_twice_fails() {
        let mut w = writer();
        let id = w.begin_obj(None).unwrap();
        w.end_obj().unwrap();
        assert!(w.begin_obj(Some(id)).is_err());
    }

    #[test]
    fn test_deferred_length() {
        let mut w = writer();
        w.begin_obj(None).unwrap();
        w.begin_dict().unwrap();
        let pending = w.promise_length().unwrap();
        w.end_dict().unwrap();
        let stream = w.begin_stream(pending).unwrap();
        w.write_bytes(b"0 0 m\n10 10 l\n").unwrap();
        let length = w.end_stream(stream).unwrap();
        w.end_obj().unwrap();

        assert_eq!(length.len(), 14);
        assert_eq!(length.id().number(), 2);
        w.write_length(length).unwrap();

        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(
            out,
            "1 0 obj\n<</Length 2 0 R\n>>\nstream\n0 0 m\n10 10 l\nendstream\nendobj\n2 0 obj\n14\nendobj\n"
        );
    }

    #[test]
    fn test_xref_and_trailer() {
        let mut w = writer();
        w.write_header().unwrap();
        let info = w.alloc_id();
        let root = w.begin_obj(None).unwrap();
        w.end_obj().unwrap();

        let patched = w.patch_unwritten().unwrap();
        assert_eq!(patched, vec![info]);

        let xref = w.write_xref().unwrap();
        w.write_trailer(info, root, xref).unwrap();
        let out = String::from_utf8_lossy(w.get_ref()).into_owned();

        assert!(out.contains("xref\n0 3\n0000000000 65535 f \n"));
        assert!(out.contains("0000000015 00000 n \n"));
        assert!(out.contains("/Size 3\n/Info 1 0 R\n/Root 2 0 R\n"));
        assert!(out.ends_with(&format!("startxref\n{}\n%%EOF\n", xref)));
    }

    #[test]
    fn test_sink_tracks_position() {
        let mut w = writer();
        {
            let mut sink = Sink(&mut w);
            sink.write_all(b"abc").unwrap();
        }
        assert_eq!(w.position(), 3);
    }
}
