use std::io::Write;

use crate::document::Document;
use crate::error::{ErrorHandler, Result};
use crate::writer::{PdfWriter, Real};

/// Components slightly above 1 pass, to allow for rounding in the
/// caller's arithmetic. Output has five decimals at most anyway.
const COLOR_TOLERANCE: f64 = 1.00001;

/// A device color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Gray level from 0.0 (black) to 1.0 (white).
    Gray(f64),
    Rgb(f64, f64, f64),
}

impl Color {
    pub fn gray(value: f64) -> Self {
        Color::Gray(value)
    }

    /// An RGB color; equal components give the same gray.
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        if red == green && green == blue {
            Color::Gray(red)
        } else {
            Color::Rgb(red, green, blue)
        }
    }

    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    pub fn white() -> Self {
        Color::Gray(1.0)
    }

    /// Whether every component is within 0..=1.
    pub fn is_valid(&self) -> bool {
        let valid = |c: f64| (0.0..=COLOR_TOLERANCE).contains(&c);
        match *self {
            Color::Gray(g) => valid(g),
            Color::Rgb(r, g, b) => valid(r) && valid(g) && valid(b),
        }
    }

    fn write<W: Write>(&self, writer: &mut PdfWriter<W>, stroke: bool) -> Result<()> {
        match *self {
            Color::Gray(g) => write!(writer, "{} {}\n", Real(g), if stroke { "G" } else { "g" }),
            Color::Rgb(r, g, b) => write!(
                writer,
                "{} {} {} {}\n",
                Real(r),
                Real(g),
                Real(b),
                if stroke { "RG" } else { "rg" }
            ),
        }
    }

    fn describe(&self) -> String {
        match *self {
            Color::Gray(g) => format!("gray value ({})", g),
            Color::Rgb(r, g, b) => format!("color value ({}/{}/{})", r, g, b),
        }
    }
}

impl<W: Write, H: ErrorHandler> Document<W, H> {
    fn set_color(
        &mut self,
        function: &str,
        color: Color,
        fill: bool,
        stroke: bool,
    ) -> Result<()> {
        self.guard(|doc| {
            doc.require_page(function)?;
            if !color.is_valid() {
                doc.warn(format!("Bogus {} in {}", color.describe(), function));
                return Ok(());
            }
            if stroke {
                color.write(&mut doc.writer, true)?;
            }
            if fill {
                color.write(&mut doc.writer, false)?;
            }
            Ok(())
        })
    }

    /// Color used to fill paths and text.
    pub fn set_fill_color(&mut self, color: Color) -> Result<()> {
        self.set_color("set_fill_color", color, true, false)
    }

    /// Color used to stroke paths.
    pub fn set_stroke_color(&mut self, color: Color) -> Result<()> {
        self.set_color("set_stroke_color", color, false, true)
    }

    pub fn set_gray_fill(&mut self, gray: f64) -> Result<()> {
        self.set_color("set_gray_fill", Color::gray(gray), true, false)
    }

    pub fn set_gray_stroke(&mut self, gray: f64) -> Result<()> {
        self.set_color("set_gray_stroke", Color::gray(gray), false, true)
    }

    /// Set both the stroke and the fill gray.
    pub fn set_gray(&mut self, gray: f64) -> Result<()> {
        self.set_color("set_gray", Color::gray(gray), true, true)
    }

    pub fn set_rgb_color_fill(&mut self, red: f64, green: f64, blue: f64) -> Result<()> {
        self.set_color("set_rgb_color_fill", Color::rgb(red, green, blue), true, false)
    }

    pub fn set_rgb_color_stroke(&mut self, red: f64, green: f64, blue: f64) -> Result<()> {
        self.set_color("set_rgb_color_stroke", Color::rgb(red, green, blue), false, true)
    }

    /// Set both the stroke and the fill color.
    pub fn set_rgb_color(&mut self, red: f64, green: f64, blue: f64) -> Result<()> {
        self.set_color("set_rgb_color", Color::rgb(red, green, blue), true, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{document, page_content};

    #[test]
    fn test_equal_components_collapse_to_gray() {
        assert_eq!(Color::rgb(0.5, 0.5, 0.5), Color::Gray(0.5));
        assert_eq!(Color::rgb(1.0, 0.0, 0.0), Color::Rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_tolerance() {
        assert!(Color::gray(1.000005).is_valid());
        assert!(!Color::gray(1.01).is_valid());
        assert!(!Color::rgb(0.2, -0.1, 0.3).is_valid());
    }

    #[test]
    fn test_color_operators() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.set_rgb_color(1.0, 0.0, 0.25).unwrap();
        doc.set_rgb_color_fill(0.3, 0.3, 0.3).unwrap();
        doc.set_gray_stroke(0.75).unwrap();
        assert_eq!(
            page_content(doc),
            "1 0 0.25 RG\n1 0 0.25 rg\n0.3 g\n0.75 G\n"
        );
    }

    #[test]
    fn test_bad_color_is_skipped_with_warning() {
        let mut doc = document();
        doc.begin_page(200.0, 200.0).unwrap();
        doc.set_gray(1.5).unwrap();
        doc.set_rgb_color_stroke(0.0, 2.0, 0.0).unwrap();
        assert_eq!(
            doc.warnings(),
            [
                "Bogus gray value (1.5) in set_gray",
                "Bogus color value (0/2/0) in set_rgb_color_stroke"
            ]
        );
        assert_eq!(page_content(doc), "");
    }

    #[test]
    fn test_color_outside_page_is_fatal() {
        let mut doc = document();
        assert!(doc.set_gray(0.5).is_err());
        assert!(doc.is_aborted());
    }
}
