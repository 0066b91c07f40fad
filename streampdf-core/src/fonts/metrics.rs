//! Resolved font metrics and the providers that produce them.

use bitflags::bitflags;

use super::encoding::Encoding;
use crate::error::Result;

/// Width used for codes the encoding leaves empty.
pub const DEFAULT_WIDTH: u16 = 250;

bitflags! {
    /// Font descriptor `/Flags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontFlags: u32 {
        const FIXED_WIDTH = 1 << 0;
        const SERIF = 1 << 1;
        const SYMBOLIC = 1 << 2;
        const SCRIPT = 1 << 3;
        const ADOBE_STANDARD = 1 << 5;
        const ITALIC = 1 << 6;
        const SMALL_CAP = 1 << 17;
        const FORCE_BOLD = 1 << 18;
    }
}

impl FontFlags {
    /// Derive descriptor flags from what a metrics file says about a font.
    pub fn derive(
        name: &str,
        encoding_scheme: &str,
        weight: Option<&str>,
        italic_angle: f64,
        fixed_pitch: bool,
    ) -> FontFlags {
        let mut flags = FontFlags::empty();
        if fixed_pitch {
            flags |= FontFlags::FIXED_WIDTH;
        }
        if encoding_scheme == "AdobeStandardEncoding" {
            flags |= FontFlags::ADOBE_STANDARD;
        } else {
            flags |= FontFlags::SYMBOLIC;
        }
        if italic_angle < 0.0 {
            flags |= FontFlags::ITALIC;
        }
        // small caps heuristic
        if name.contains("Caps") || name.ends_with("SC") {
            flags |= FontFlags::SMALL_CAP;
        }
        if weight == Some("Bold") {
            flags |= FontFlags::FORCE_BOLD;
        }
        flags
    }
}

/// Everything needed to measure text in a font and to write its
/// descriptor, already laid out for one encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    pub name: String,
    /// Encoding the widths are laid out for. May differ from the one
    /// requested when the font cannot be re-encoded.
    pub encoding: Encoding,
    pub encoding_scheme: String,
    pub flags: FontFlags,
    pub bbox: [i32; 4],
    pub ascender: i32,
    pub descender: i32,
    pub cap_height: i32,
    pub italic_angle: f64,
    pub stem_v: i32,
    pub widths: [u16; 256],
}

impl FontMetrics {
    pub fn width(&self, code: u8) -> u16 {
        self.widths[code as usize]
    }

    /// Width of already-encoded text at `size`.
    pub fn string_width(&self, bytes: &[u8], size: f64) -> f64 {
        bytes
            .iter()
            .map(|&b| size * self.width(b) as f64 / 1000.0)
            .sum()
    }
}

/// Metrics obtained from a provider, together with any problem that
/// forced a fallback.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub metrics: FontMetrics,
    pub warning: Option<String>,
}

/// A source of font metrics.
///
/// `Ok(None)` means the provider doesn't know the font. Errors are
/// problems reading a font the provider was pointed at.
pub trait MetricsProvider {
    fn resolve(&self, font_name: &str, encoding: Encoding) -> Result<Option<Resolved>>;
}
