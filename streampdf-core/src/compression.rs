//! Streaming Flate compression of stream bodies

use std::io::Write;

use crate::error::Result;
use crate::source::DataSource;
use crate::writer::PdfWriter;

/// Deflate everything `src` produces straight into the output.
///
/// The encoder is drained with an explicit `finish` after the last chunk
/// so the zlib trailer lands inside the stream body. Without the
/// `compression` feature the data is copied unchanged.
#[cfg(feature = "compression")]
pub fn compress<W: Write, S: DataSource + ?Sized>(
    writer: &mut PdfWriter<W>,
    src: &mut S,
) -> Result<()> {
    use crate::error::PdfError;
    use crate::writer::Sink;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    src.init()?;
    let result = (|| -> Result<()> {
        let mut encoder = ZlibEncoder::new(Sink(writer), Compression::default());
        while let Some(chunk) = src.fill()? {
            encoder
                .write_all(chunk)
                .map_err(|e| PdfError::CompressionError(format!("Compression error: {}", e)))?;
        }
        encoder
            .finish()
            .map_err(|e| PdfError::CompressionError(format!("Compression error (finish): {}", e)))?;
        Ok(())
    })();
    src.terminate();
    result
}

#[cfg(not(feature = "compression"))]
pub fn compress<W: Write, S: DataSource + ?Sized>(
    writer: &mut PdfWriter<W>,
    src: &mut S,
) -> Result<()> {
    crate::source::copy(writer, src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[cfg(feature = "compression")]
    fn inflate(data: &[u8]) -> Vec<u8> {
        use flate2::read::ZlibDecoder;
        use std::io::Read;

        let mut decoder = ZlibDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    #[cfg(feature = "compression")]
    fn test_compress_roundtrip_through_writer() {
        let original: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        writer.write_bytes(b"stream\n").unwrap();
        let start = writer.position();

        compress(&mut writer, &mut MemorySource::new(&original)).unwrap();

        let written = writer.position() - start;
        let out = writer.into_inner();
        assert_eq!(written as usize, out.len() - 7);
        assert_eq!(inflate(&out[7..]), original);
    }

    #[test]
    #[cfg(feature = "compression")]
    fn test_compress_empty_source_still_has_trailer() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        compress(&mut writer, &mut MemorySource::new(Vec::<u8>::new())).unwrap();
        let out = writer.into_inner();
        assert!(!out.is_empty());
        assert!(inflate(&out).is_empty());
    }

    #[test]
    #[cfg(not(feature = "compression"))]
    fn test_compress_passes_through() {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        compress(&mut writer, &mut MemorySource::new(b"plain".as_slice())).unwrap();
        assert_eq!(writer.into_inner(), b"plain");
    }
}
