//! Adobe Font Metrics (AFM) parsing.
//!
//! Only the global keys that end up in a font descriptor and the
//! per-character `C`/`WX`/`N` entries are read. Kerning, ligatures and
//! composites are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use super::encoding::Encoding;
use super::metrics::{FontFlags, FontMetrics, MetricsProvider, Resolved, DEFAULT_WIDTH};
use crate::error::{PdfError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct CharMetric {
    /// Default code, -1 for unencoded glyphs.
    pub code: i32,
    pub wx: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AfmFont {
    pub font_name: String,
    pub encoding_scheme: String,
    pub weight: Option<String>,
    pub italic_angle: f64,
    pub is_fixed_pitch: bool,
    pub bbox: [i32; 4],
    pub cap_height: i32,
    pub ascender: i32,
    pub descender: i32,
    pub std_vw: i32,
    pub chars: Vec<CharMetric>,
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PdfError::ParseError(format!("bad {} value '{}' in AFM file", key, value)))
}

fn parse_char_metric(line: &str) -> Result<CharMetric> {
    let mut code = -1;
    let mut wx = 0;
    let mut name = String::new();

    for part in line.split(';') {
        let mut tokens = part.split_whitespace();
        match tokens.next() {
            Some("C") => code = parse_number(tokens.next().unwrap_or(""), "C")?,
            Some("CH") => {
                let hex = tokens.next().unwrap_or("").trim_matches(['<', '>']);
                code = i32::from_str_radix(hex, 16).map_err(|_| {
                    PdfError::ParseError(format!("bad CH value '{}' in AFM file", hex))
                })?;
            }
            Some("WX") | Some("W0X") => wx = parse_number(tokens.next().unwrap_or(""), "WX")?,
            Some("W") | Some("W0") => wx = parse_number(tokens.next().unwrap_or(""), "W")?,
            Some("N") => name = tokens.next().unwrap_or("").to_string(),
            _ => {}
        }
    }

    Ok(CharMetric { code, wx, name })
}

impl AfmFont {
    pub fn parse(content: &str) -> Result<AfmFont> {
        let mut font = AfmFont {
            encoding_scheme: "AdobeStandardEncoding".to_string(),
            ..AfmFont::default()
        };
        let mut seen_start = false;
        let mut in_char_metrics = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (line, ""),
            };

            if in_char_metrics {
                if key == "EndCharMetrics" {
                    in_char_metrics = false;
                } else {
                    font.chars.push(parse_char_metric(line)?);
                }
                continue;
            }

            match key {
                "StartFontMetrics" => seen_start = true,
                "FontName" => font.font_name = value.to_string(),
                "EncodingScheme" => font.encoding_scheme = value.to_string(),
                "Weight" => font.weight = Some(value.to_string()),
                "ItalicAngle" => font.italic_angle = parse_number(value, key)?,
                "IsFixedPitch" => font.is_fixed_pitch = value == "true",
                "CapHeight" => font.cap_height = parse_number(value, key)?,
                "Ascender" => font.ascender = parse_number(value, key)?,
                "Descender" => font.descender = parse_number(value, key)?,
                "StdVW" => font.std_vw = parse_number(value, key)?,
                "FontBBox" => {
                    let parts: Vec<&str> = value.split_whitespace().collect();
                    if parts.len() != 4 {
                        return Err(PdfError::ParseError(format!(
                            "bad FontBBox '{}' in AFM file",
                            value
                        )));
                    }
                    for (slot, part) in font.bbox.iter_mut().zip(parts) {
                        *slot = parse_number(part, key)?;
                    }
                }
                "StartCharMetrics" => in_char_metrics = true,
                "EndFontMetrics" => break,
                _ => {}
            }
        }

        if !seen_start {
            return Err(PdfError::ParseError(
                "missing StartFontMetrics in AFM file".to_string(),
            ));
        }
        Ok(font)
    }

    pub fn is_standard_encoded(&self) -> bool {
        self.encoding_scheme == "AdobeStandardEncoding"
    }

    /// Lay the widths out for `encoding`. Fonts with their own encoding
    /// scheme can't be re-encoded; they fall back to builtin and the
    /// returned warning says so.
    pub fn metrics(&self, encoding: Encoding) -> Resolved {
        let mut warning = None;
        let mut encoding = encoding;
        if encoding != Encoding::Builtin && !self.is_standard_encoded() {
            warning = Some(format!(
                "Can't reencode Symbol font '{}' (using builtin)",
                self.font_name
            ));
            encoding = Encoding::Builtin;
        }

        let mut widths = [DEFAULT_WIDTH; 256];
        if encoding.has_vector() {
            for (code, width) in widths.iter_mut().enumerate() {
                let glyph = match encoding.glyph_name(code as u8) {
                    Some(glyph) => glyph,
                    None => continue,
                };
                if let Some(cm) = self.chars.iter().find(|cm| cm.name == glyph) {
                    *width = cm.wx.clamp(0, u16::MAX as i32) as u16;
                }
            }
        } else {
            for cm in &self.chars {
                if (0..256).contains(&cm.code) {
                    widths[cm.code as usize] = cm.wx.clamp(0, u16::MAX as i32) as u16;
                }
            }
        }

        let flags = FontFlags::derive(
            &self.font_name,
            &self.encoding_scheme,
            self.weight.as_deref(),
            self.italic_angle,
            self.is_fixed_pitch,
        );

        Resolved {
            metrics: FontMetrics {
                name: self.font_name.clone(),
                encoding,
                encoding_scheme: self.encoding_scheme.clone(),
                flags,
                bbox: self.bbox,
                ascender: self.ascender,
                descender: self.descender,
                cap_height: self.cap_height,
                italic_angle: self.italic_angle,
                stem_v: self.std_vw,
                widths,
            },
            warning,
        }
    }
}

/// Provider reading one AFM file.
#[derive(Debug, Clone)]
pub struct AfmFile {
    path: PathBuf,
}

impl AfmFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MetricsProvider for AfmFile {
    fn resolve(&self, font_name: &str, encoding: Encoding) -> Result<Option<Resolved>> {
        let content = fs::read(&self.path).map_err(|e| {
            PdfError::FontError(format!(
                "Couldn't open AFM file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let font = AfmFont::parse(&String::from_utf8_lossy(&content)).map_err(|e| {
            PdfError::FontError(format!(
                "Error parsing AFM file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if font.chars.is_empty() {
            return Err(PdfError::FontError(format!(
                "Couldn't parse char metrics in AFM file {}",
                self.path.display()
            )));
        }
        if font.font_name != font_name {
            return Err(PdfError::FontError(format!(
                "Font name mismatch in AFM file {}",
                self.path.display()
            )));
        }

        Ok(Some(font.metrics(encoding)))
    }
}
