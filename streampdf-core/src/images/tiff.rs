//! TIFF reading through the `tiff` crate.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ::tiff::decoder::{Decoder, DecodingResult};
use ::tiff::ColorType;

use super::{ColorSpace, ImageDescriptor, OpenedImage};
use crate::error::{PdfError, Result};
use crate::source::MemorySource;

fn tiff_error(e: ::tiff::TiffError) -> PdfError {
    PdfError::InvalidImage(format!("TIFF: {}", e))
}

fn decode(path: &Path) -> Result<(ImageDescriptor, Vec<u8>)> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file)).map_err(tiff_error)?;

    let (width, height) = decoder.dimensions().map_err(tiff_error)?;
    let color_space = match decoder.colortype().map_err(tiff_error)? {
        ColorType::Gray(8) => ColorSpace::DeviceGray,
        ColorType::RGB(8) => ColorSpace::DeviceRGB,
        ColorType::CMYK(8) => ColorSpace::DeviceCMYK,
        other => {
            return Err(PdfError::InvalidImage(format!(
                "unsupported TIFF color type {:?}",
                other
            )))
        }
    };

    let pixels = match decoder.read_image().map_err(tiff_error)? {
        DecodingResult::U8(pixels) => pixels,
        _ => {
            return Err(PdfError::InvalidImage(
                "TIFF samples are not 8 bit".to_string(),
            ))
        }
    };

    let expected = width as usize * height as usize * color_space.components() as usize;
    if pixels.len() != expected {
        return Err(PdfError::InvalidImage(format!(
            "TIFF data has {} bytes, expected {}",
            pixels.len(),
            expected
        )));
    }

    Ok((ImageDescriptor::new(width, height, color_space), pixels))
}

pub(crate) fn open(path: &Path) -> Option<OpenedImage<'static>> {
    match decode(path) {
        Ok((descriptor, pixels)) => Some(OpenedImage::new(
            descriptor,
            Box::new(MemorySource::new(pixels)),
        )),
        Err(e) => {
            tracing::debug!("Not using TIFF file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_non_tiff_is_not_an_image() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"GIF89a not a tiff").unwrap();
        assert!(open(file.path()).is_none());
        assert!(open(Path::new("/nonexistent/streampdf/image.tif")).is_none());
    }
}
