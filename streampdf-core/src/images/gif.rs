//! GIF87a/GIF89a reading.
//!
//! Only the first image of a file is used. Its pixels are decoded with
//! `weezl`, put back in row order when interlaced, and written as an
//! indexed RGB image.

use std::fs;
use std::path::Path;

use weezl::decode::Decoder;
use weezl::BitOrder;

use super::{ColorSpace, ImageDescriptor, OpenedImage};
use crate::error::{PdfError, Result};
use crate::source::MemorySource;

const COLORMAP_FLAG: u8 = 0x80;
const INTERLACE_FLAG: u8 = 0x40;

const IMAGE_SEPARATOR: u8 = b',';
const EXTENSION_INTRODUCER: u8 = b'!';
const TRAILER: u8 = b';';

/// Range of initial LZW code sizes GIF allows.
const MIN_LZW_BITS: u8 = 2;
const MAX_LZW_BITS: u8 = 12;

fn truncated() -> PdfError {
    PdfError::InvalidImage("truncated GIF data".to_string())
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or_else(truncated)?;
        let bytes = self.data.get(self.pos..end).ok_or_else(truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn colormap(&mut self, flags: u8) -> Result<Vec<[u8; 3]>> {
        let entries = 2usize << (flags & 0x07);
        Ok(self
            .take(entries * 3)?
            .chunks_exact(3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
            .collect())
    }

    /// Concatenate data sub-blocks up to the zero-length terminator.
    fn sub_blocks(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let count = self.byte()? as usize;
            if count == 0 {
                return Ok(out);
            }
            out.extend_from_slice(self.take(count)?);
        }
    }
}

#[derive(Debug)]
struct GifImage {
    width: u32,
    height: u32,
    colormap: Vec<[u8; 3]>,
    pixels: Vec<u8>,
    extra_data: bool,
}

/// Row order of an interlaced image: every 8th row from 0, every 8th
/// from 4, every 4th from 2, every 2nd from 1.
fn interlaced_rows(height: usize) -> impl Iterator<Item = usize> {
    (0..height)
        .step_by(8)
        .chain((4..height).step_by(8))
        .chain((2..height).step_by(4))
        .chain((1..height).step_by(2))
}

fn decode(data: &[u8]) -> Result<GifImage> {
    let mut cursor = Cursor { data, pos: 0 };

    let signature = cursor.take(6)?;
    if &signature[..3] != b"GIF" {
        return Err(PdfError::InvalidImage("not a GIF file".to_string()));
    }
    if &signature[3..] != b"87a" && &signature[3..] != b"89a" {
        return Err(PdfError::InvalidImage(format!(
            "bad GIF version '{}'",
            String::from_utf8_lossy(&signature[3..])
        )));
    }

    let screen = cursor.take(7)?;
    let global = if screen[4] & COLORMAP_FLAG != 0 {
        Some(cursor.colormap(screen[4])?)
    } else {
        None
    };

    loop {
        match cursor.byte()? {
            TRAILER => {
                return Err(PdfError::InvalidImage("no image in GIF file".to_string()))
            }
            EXTENSION_INTRODUCER => {
                let _label = cursor.byte()?;
                cursor.sub_blocks()?;
            }
            IMAGE_SEPARATOR => break,
            // stray bytes between blocks are ignored
            _ => {}
        }
    }

    let descriptor = cursor.take(9)?;
    let width = u16::from_le_bytes([descriptor[4], descriptor[5]]) as usize;
    let height = u16::from_le_bytes([descriptor[6], descriptor[7]]) as usize;
    let flags = descriptor[8];

    let colormap = if flags & COLORMAP_FLAG != 0 {
        cursor.colormap(flags)?
    } else {
        global.ok_or_else(|| PdfError::InvalidImage("GIF image without colormap".to_string()))?
    };

    let code_size = cursor.byte()?;
    if !(MIN_LZW_BITS..=MAX_LZW_BITS).contains(&code_size) {
        return Err(PdfError::InvalidImage(format!(
            "bad LZW code size {} in GIF",
            code_size
        )));
    }
    let compressed = cursor.sub_blocks()?;
    let mut decoded = Decoder::new(BitOrder::Lsb, code_size)
        .decode(&compressed)
        .map_err(|e| PdfError::InvalidImage(format!("GIF LZW data: {:?}", e)))?;

    let npixels = width * height;
    let extra_data = decoded.len() > npixels;
    decoded.resize(npixels, 0);

    let pixels = if flags & INTERLACE_FLAG != 0 && width > 0 {
        let mut pixels = vec![0u8; npixels];
        for (row, target) in decoded.chunks_exact(width).zip(interlaced_rows(height)) {
            pixels[target * width..(target + 1) * width].copy_from_slice(row);
        }
        pixels
    } else {
        decoded
    };

    Ok(GifImage {
        width: width as u32,
        height: height as u32,
        colormap,
        pixels,
        extra_data,
    })
}

pub(crate) fn open(path: &Path) -> Option<OpenedImage<'static>> {
    let image = match fs::read(path).map_err(PdfError::from).and_then(|data| decode(&data)) {
        Ok(image) if image.width > 0 && image.height > 0 => image,
        Ok(_) => {
            tracing::debug!("GIF file {} has an empty image", path.display());
            return None;
        }
        Err(e) => {
            tracing::debug!("Not using GIF file {}: {}", path.display(), e);
            return None;
        }
    };

    let mut descriptor = ImageDescriptor::new(image.width, image.height, ColorSpace::DeviceRGB);
    descriptor.colormap = Some(image.colormap);

    let mut opened = OpenedImage::new(descriptor, Box::new(MemorySource::new(image.pixels)));
    if image.extra_data {
        opened.warnings.push(format!(
            "Too much input data in GIF file '{}', ignoring extra.",
            path.display()
        ));
    }
    Some(opened)
}
