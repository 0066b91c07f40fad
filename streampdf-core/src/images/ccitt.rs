//! Raw G3/G4 fax data.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::{ColorSpace, Compression, ImageDescriptor, OpenedImage};
use crate::error::Result;
use crate::source::{BitReverse, DataSource, FileSource};
use crate::writer::PdfWriter;

/// Decoding parameters of CCITT encoded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CcittParams {
    /// Negative for pure 2D (G4), 0 for 1D (G3), positive for mixed.
    pub k: i32,
    pub black_is_1: bool,
    /// The data has its bits stored least significant first.
    pub bit_reverse: bool,
}

impl CcittParams {
    pub fn is_default(&self) -> bool {
        *self == CcittParams::default()
    }

    /// Write the `/K` and `/BlackIs1` entries that differ from the
    /// filter defaults.
    pub(crate) fn write<W: Write>(&self, writer: &mut PdfWriter<W>) -> Result<()> {
        if self.k != 0 {
            write!(writer, "/K {} ", self.k)?;
        }
        if self.black_is_1 {
            writer.write_str("/BlackIs1 true ")?;
        }
        Ok(())
    }
}

pub(crate) fn open(
    path: &Path,
    width: u32,
    height: u32,
    params: CcittParams,
) -> Option<OpenedImage<'static>> {
    if let Err(e) = File::open(path) {
        tracing::debug!("Couldn't open CCITT file {}: {}", path.display(), e);
        return None;
    }

    let mut descriptor = ImageDescriptor::new(width, height, ColorSpace::DeviceGray);
    descriptor.bits_per_component = 1;
    descriptor.compression = Compression::Ccitt;
    descriptor.ccitt = Some(params);

    let file = FileSource::new(path);
    let source: Box<dyn DataSource> = if params.bit_reverse {
        Box::new(BitReverse::new(file))
    } else {
        Box::new(file)
    };
    Some(OpenedImage::new(descriptor, source))
}
