//! JPEG marker scanning.
//!
//! Only the header is read; the compressed data is later streamed from
//! the start-of-image marker to the end of the file and tagged with
//! `/DCTDecode`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{ColorSpace, Compression, ImageDescriptor, OpenedImage};
use crate::error::{PdfError, Result};
use crate::source::FileSource;

const M_SOF0: u8 = 0xC0;
const M_SOF1: u8 = 0xC1;
const M_SOF2: u8 = 0xC2;
const M_SOF3: u8 = 0xC3;
const M_SOF5: u8 = 0xC5;
const M_SOF6: u8 = 0xC6;
const M_SOF7: u8 = 0xC7;
const M_SOF9: u8 = 0xC9;
const M_SOF10: u8 = 0xCA;
const M_SOF11: u8 = 0xCB;
const M_SOF13: u8 = 0xCD;
const M_SOF14: u8 = 0xCE;
const M_SOF15: u8 = 0xCF;
const M_RST0: u8 = 0xD0;
const M_RST7: u8 = 0xD7;
const M_SOI: u8 = 0xD8;
const M_EOI: u8 = 0xD9;
const M_APP0: u8 = 0xE0;
const M_APP14: u8 = 0xEE;
const M_TEM: u8 = 0x01;

/// A start marker further into the file than this usually means JPEG
/// data wrapped in another format.
const MAX_START_OFFSET: u64 = 768;

/// Bytes of an APPn segment kept for inspection.
const APP_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq)]
struct JpegHeader {
    start: u64,
    width: u32,
    height: u32,
    components: u8,
    bits_per_component: u8,
    adobe: bool,
    progressive: bool,
    dpi: f64,
}

struct MarkerReader<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> MarkerReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    fn byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf)? {
            0 => Err(PdfError::InvalidImage(
                "unexpected end of JPEG data".to_string(),
            )),
            _ => {
                self.pos += 1;
                Ok(buf[0])
            }
        }
    }

    fn u16(&mut self) -> Result<u16> {
        let hi = self.byte()?;
        let lo = self.byte()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Read a segment body of `length - 2` bytes, keeping its head.
    fn segment(&mut self, length: u16) -> Result<Vec<u8>> {
        let body = length.saturating_sub(2) as usize;
        let mut kept = Vec::with_capacity(body.min(APP_MAX));
        for i in 0..body {
            let b = self.byte()?;
            if i < APP_MAX {
                kept.push(b);
            }
        }
        Ok(kept)
    }

    /// Skip to the next marker code, passing over fill bytes and
    /// stuffed `FF 00` pairs.
    fn next_marker(&mut self) -> Result<u8> {
        loop {
            while self.byte()? != 0xFF {}
            let mut c = self.byte()?;
            while c == 0xFF {
                c = self.byte()?;
            }
            if c != 0 {
                return Ok(c);
            }
        }
    }
}

fn scan<R: Read>(input: R) -> Result<JpegHeader> {
    let mut reader = MarkerReader::new(input);

    // some files carry a preamble before the SOI marker
    let start = loop {
        let marker = reader.next_marker()?;
        let start = reader.pos - 2;
        if start > MAX_START_OFFSET {
            return Err(PdfError::InvalidImage(
                "no JPEG start marker near the beginning of the file".to_string(),
            ));
        }
        if marker == M_SOI {
            break start;
        }
    };

    let mut header = JpegHeader {
        start,
        width: 0,
        height: 0,
        components: 0,
        bits_per_component: 0,
        adobe: false,
        progressive: false,
        dpi: 0.0,
    };

    loop {
        let marker = reader.next_marker()?;
        match marker {
            M_EOI => break,
            M_SOF3 | M_SOF5 | M_SOF6 | M_SOF7 | M_SOF9 | M_SOF11 | M_SOF13 | M_SOF14
            | M_SOF15 => {
                return Err(PdfError::InvalidImage(format!(
                    "unsupported JPEG process (marker 0x{:02X})",
                    marker
                )))
            }
            M_SOF0 | M_SOF1 | M_SOF2 | M_SOF10 => {
                header.progressive = matches!(marker, M_SOF2 | M_SOF10);
                let _length = reader.u16()?;
                header.bits_per_component = reader.byte()?;
                header.height = reader.u16()? as u32;
                header.width = reader.u16()? as u32;
                header.components = reader.byte()?;
                break;
            }
            M_APP0 => {
                let length = reader.u16()?;
                let app = reader.segment(length)?;
                if length >= 14 && app.starts_with(b"JFIF") {
                    header.dpi = jfif_dpi(app[7], u16::from_be_bytes([app[8], app[9]]));
                }
            }
            M_APP14 => {
                let length = reader.u16()?;
                let app = reader.segment(length)?;
                if length >= 12 && app.starts_with(b"Adobe") {
                    header.adobe = true;
                }
            }
            M_SOI | M_TEM | M_RST0..=M_RST7 => {}
            _ => {
                let length = reader.u16()?;
                reader.segment(length)?;
            }
        }
    }

    if header.width == 0 || header.height == 0 || header.components == 0 {
        return Err(PdfError::InvalidImage(
            "no usable JPEG frame header".to_string(),
        ));
    }
    if header.bits_per_component != 8 {
        return Err(PdfError::InvalidImage(format!(
            "{} bits per component in JPEG",
            header.bits_per_component
        )));
    }
    Ok(header)
}

/// Resolution from the JFIF density fields, 0 when only an aspect ratio
/// is given.
fn jfif_dpi(unit: u8, density: u16) -> f64 {
    match unit {
        1 => density as f64,
        2 => density as f64 * 2.54,
        _ => 0.0,
    }
}

pub(crate) fn open(path: &Path) -> Option<OpenedImage<'static>> {
    let header = match File::open(path)
        .map_err(PdfError::from)
        .and_then(|file| scan(BufReader::new(file)))
    {
        Ok(header) => header,
        Err(e) => {
            tracing::debug!("Not using JPEG file {}: {}", path.display(), e);
            return None;
        }
    };

    let color_space = match ColorSpace::from_components(header.components) {
        Some(color_space) => color_space,
        None => {
            tracing::debug!(
                "JPEG file {} has {} components",
                path.display(),
                header.components
            );
            return None;
        }
    };

    let mut descriptor = ImageDescriptor::new(header.width, header.height, color_space);
    descriptor.compression = Compression::Dct;
    descriptor.adobe = header.adobe;
    descriptor.dpi = header.dpi;

    let mut opened = OpenedImage::new(
        descriptor,
        Box::new(FileSource::with_offset(path, header.start)),
    );
    if header.progressive {
        opened
            .warnings
            .push("Progressive JPEG only supported in Acrobat 4".to_string());
    }
    Some(opened)
}
