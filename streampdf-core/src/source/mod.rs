//! Pull-based data sources for stream bodies.
//!
//! Image pixels, font programs and attached files are streamed into the
//! output chunk by chunk through the [`DataSource`] trait, so none of them
//! has to be held in memory as a whole. The consumers in this module
//! ([`copy`], [`ascii_hex_encode`]) and [`crate::compression::compress`]
//! only rely on the trait.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{PdfError, Result};
use crate::writer::PdfWriter;

/// Chunk size used by file-backed sources.
pub const FILE_BUFSIZE: usize = 1024;

/// A producer of stream data.
///
/// `init` is called once before the first `fill`, `terminate` once after
/// the last. `fill` returns the next chunk, or `None` when exhausted.
pub trait DataSource {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn fill(&mut self) -> Result<Option<&[u8]>>;

    fn terminate(&mut self) {}
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn fill(&mut self) -> Result<Option<&[u8]>> {
        (**self).fill()
    }

    fn terminate(&mut self) {
        (**self).terminate()
    }
}

/// Serves an in-memory buffer as a single chunk.
#[derive(Debug, Clone)]
pub struct MemorySource<B: AsRef<[u8]>> {
    data: B,
    done: bool,
}

impl<B: AsRef<[u8]>> MemorySource<B> {
    pub fn new(data: B) -> Self {
        Self { data, done: false }
    }

    pub fn len(&self) -> usize {
        self.data.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: AsRef<[u8]>> DataSource for MemorySource<B> {
    fn init(&mut self) -> Result<()> {
        self.done = false;
        Ok(())
    }

    fn fill(&mut self) -> Result<Option<&[u8]>> {
        if self.done || self.data.as_ref().is_empty() {
            return Ok(None);
        }
        self.done = true;
        Ok(Some(self.data.as_ref()))
    }
}

/// Reads a file in fixed-size chunks, optionally starting at an offset.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    start: u64,
    file: Option<File>,
    buffer: Vec<u8>,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_offset(path, 0)
    }

    pub fn with_offset(path: impl AsRef<Path>, start: u64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            start,
            file: None,
            buffer: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for FileSource {
    fn init(&mut self) -> Result<()> {
        let mut file = File::open(&self.path).map_err(|e| {
            PdfError::Io(std::io::Error::new(
                e.kind(),
                format!("Couldn't open embedded file '{}': {}", self.path.display(), e),
            ))
        })?;
        if self.start > 0 {
            file.seek(SeekFrom::Start(self.start))?;
        }
        self.file = Some(file);
        self.buffer = vec![0; FILE_BUFSIZE];
        Ok(())
    }

    fn fill(&mut self) -> Result<Option<&[u8]>> {
        let file = match self.file.as_mut() {
            Some(file) => file,
            None => return Ok(None),
        };
        let n = file.read(&mut self.buffer)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(&self.buffer[..n]))
    }

    fn terminate(&mut self) {
        self.file = None;
        self.buffer = Vec::new();
    }
}

/// Reverses the bit order of every byte produced by the inner source.
#[derive(Debug)]
pub struct BitReverse<S> {
    inner: S,
    buffer: Vec<u8>,
}

impl<S: DataSource> BitReverse<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }
}

impl<S: DataSource> DataSource for BitReverse<S> {
    fn init(&mut self) -> Result<()> {
        self.inner.init()
    }

    fn fill(&mut self) -> Result<Option<&[u8]>> {
        match self.inner.fill()? {
            Some(chunk) => {
                self.buffer.clear();
                self.buffer.extend(chunk.iter().map(|b| b.reverse_bits()));
                Ok(Some(&self.buffer))
            }
            None => Ok(None),
        }
    }

    fn terminate(&mut self) {
        self.inner.terminate()
    }
}

/// Copy the complete contents of `src` to the output.
pub fn copy<W: Write, S: DataSource + ?Sized>(
    writer: &mut PdfWriter<W>,
    src: &mut S,
) -> Result<()> {
    src.init()?;
    let result = (|| -> Result<()> {
        while let Some(chunk) = src.fill()? {
            writer.write_bytes(chunk)?;
        }
        Ok(())
    })();
    src.terminate();
    result
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Hex-encode `src` into the output, 64 characters per line, followed by
/// the `>` end-of-data marker.
pub fn ascii_hex_encode<W: Write, S: DataSource + ?Sized>(
    writer: &mut PdfWriter<W>,
    src: &mut S,
) -> Result<()> {
    src.init()?;
    let result = (|| -> Result<()> {
        let mut chars_per_line = 0;
        let mut line = Vec::with_capacity(FILE_BUFSIZE * 2 + 32);
        while let Some(chunk) = src.fill()? {
            line.clear();
            for &byte in chunk {
                line.push(HEX_DIGITS[(byte >> 4) as usize]);
                line.push(HEX_DIGITS[(byte & 0x0F) as usize]);
                chars_per_line += 2;
                if chars_per_line >= 64 {
                    line.push(b'\n');
                    chars_per_line = 0;
                }
            }
            writer.write_bytes(&line)?;
        }
        writer.write_bytes(b">\n")
    })();
    src.terminate();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn drain<S: DataSource>(src: &mut S) -> Vec<u8> {
        let mut out = Vec::new();
        src.init().unwrap();
        while let Some(chunk) = src.fill().unwrap() {
            out.extend_from_slice(chunk);
        }
        src.terminate();
        out
    }

    #[test]
    fn test_memory_source_single_chunk() {
        let mut src = MemorySource::new(b"hello".as_slice());
        assert_eq!(drain(&mut src), b"hello");
        // re-initialising serves the data again
        assert_eq!(drain(&mut src), b"hello");
    }

    #[test]
    fn test_empty_memory_source() {
        let mut src = MemorySource::new(Vec::<u8>::new());
        assert!(src.is_empty());
        assert!(drain(&mut src).is_empty());
    }

    #[test]
    fn test_file_source_chunks_and_offset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
        file.write_all(&data).unwrap();

        let mut src = FileSource::new(file.path());
        assert_eq!(drain(&mut src), data);

        let mut src = FileSource::with_offset(file.path(), 100);
        assert_eq!(drain(&mut src), &data[100..]);
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut src = FileSource::new("/nonexistent/streampdf/file.bin");
        assert!(matches!(src.init(), Err(PdfError::Io(_))));
    }

    #[test]
    fn test_bit_reverse() {
        let mut src = BitReverse::new(MemorySource::new(vec![0b0000_0001, 0b1100_0000]));
        assert_eq!(drain(&mut src), vec![0b1000_0000, 0b0000_0011]);
    }

    #[test]
    fn test_copy() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        copy(&mut writer, &mut MemorySource::new(b"abc".as_slice())).unwrap();
        assert_eq!(writer.position(), 3);
        assert_eq!(writer.into_inner(), b"abc");
    }

    #[test]
    fn test_ascii_hex_line_breaks() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        let data = vec![0xABu8; 33];
        ascii_hex_encode(&mut writer, &mut MemorySource::new(data)).unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();

        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[0].len(), 64);
        assert!(lines[0].chars().all(|c| c == 'A' || c == 'B'));
        assert_eq!(lines[1], "AB>");
    }
}
