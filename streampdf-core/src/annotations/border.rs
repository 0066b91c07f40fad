//! Annotation border appearance.

use std::io::Write;
use std::str::FromStr;

use crate::error::{PdfError, Result};
use crate::writer::{PdfWriter, Real};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyleType {
    #[default]
    Solid,
    Dashed,
}

impl FromStr for BorderStyleType {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "solid" => Ok(BorderStyleType::Solid),
            "dashed" => Ok(BorderStyleType::Dashed),
            other => Err(PdfError::value(format!(
                "Unknown annotation border style '{}'",
                other
            ))),
        }
    }
}

impl BorderStyleType {
    fn pdf_name(&self) -> &'static str {
        match self {
            BorderStyleType::Solid => "S",
            BorderStyleType::Dashed => "D",
        }
    }
}

/// Border settings captured by an annotation when it is created. Later
/// changes to the document defaults don't reach annotations already added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStyle {
    pub style: BorderStyleType,
    pub width: f64,
    pub color: [f64; 3],
    pub dash: [f64; 2],
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            style: BorderStyleType::Solid,
            width: 1.0,
            color: [0.0; 3],
            dash: [3.0, 3.0],
        }
    }
}

impl BorderStyle {
    pub fn is_default(&self) -> bool {
        *self == BorderStyle::default()
    }

    pub fn set_style(&mut self, style: BorderStyleType, width: f64) -> Result<()> {
        if width < 0.0 {
            return Err(PdfError::value(format!(
                "Negative annotation border width {}",
                width
            )));
        }
        self.style = style;
        self.width = width;
        Ok(())
    }

    pub fn set_color(&mut self, red: f64, green: f64, blue: f64) -> Result<()> {
        for (name, value) in [("red", red), ("green", green), ("blue", blue)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PdfError::value(format!(
                    "Bogus {} color value {} for annotation border",
                    name, value
                )));
            }
        }
        self.color = [red, green, blue];
        Ok(())
    }

    pub fn set_dash(&mut self, d1: f64, d2: f64) -> Result<()> {
        if d1 < 0.0 || d2 < 0.0 {
            return Err(PdfError::value(format!(
                "Negative annotation border dash value {} {}",
                d1, d2
            )));
        }
        self.dash = [d1, d2];
        Ok(())
    }

    /// Write `/BS`, `/Border` and `/C`. Nothing is written for the
    /// default border.
    pub(crate) fn write<W: Write>(&self, writer: &mut PdfWriter<W>) -> Result<()> {
        if self.is_default() {
            return Ok(());
        }

        let dashed = self.style == BorderStyleType::Dashed;
        let [d1, d2] = self.dash;

        writer.write_str("/BS ")?;
        writer.begin_dict()?;
        writer.write_str("/Type /Border\n")?;
        if self.style != BorderStyleType::Solid {
            write!(writer, "/S /{}\n", self.style.pdf_name())?;
        }
        if dashed {
            write!(writer, "/D [{} {}]\n", Real(d1), Real(d2))?;
        }
        writer.end_dict()?;

        // PDF 1.1 form for older viewers
        write!(writer, "/Border [0 0 {}", Real(self.width))?;
        if dashed && (d1 != 0.0 || d2 != 0.0) {
            write!(writer, "[{} {}]", Real(d1), Real(d2))?;
        }
        writer.write_str("]\n")?;

        let [r, g, b] = self.color;
        write!(writer, "/C [{} {} {}]\n", Real(r), Real(g), Real(b))
    }
}
