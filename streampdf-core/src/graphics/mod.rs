//! Path construction, painting and the graphics state.
//!
//! Every operator requires an open page. Path and transformation
//! operators leave text mode first; state setters do not.

mod color;

pub use color::Color;

use std::f64::consts::PI;
use std::io::Write;
use std::str::FromStr;

use crate::document::Document;
use crate::error::{ErrorHandler, PdfError, Result};
use crate::writer::Real;

/// Bézier control distance for a quarter circle of radius 1.
const ARC_MAGIC: f64 = 0.5523;

/// Rule deciding which areas a fill or clip covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    Winding,
    EvenOdd,
}

impl FillRule {
    /// Suffix appended to painting operators.
    fn suffix(self) -> &'static str {
        match self {
            FillRule::Winding => "",
            FillRule::EvenOdd => "*",
        }
    }
}

impl FromStr for FillRule {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "winding" => Ok(FillRule::Winding),
            "evenodd" => Ok(FillRule::EvenOdd),
            _ => Err(PdfError::value(format!("Bogus fill rule '{}'", s))),
        }
    }
}

/// Line cap style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt = 0,
    Round = 1,
    ProjectingSquare = 2,
}

impl From<LineCap> for i32 {
    fn from(cap: LineCap) -> i32 {
        cap as i32
    }
}

/// Line join style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

impl From<LineJoin> for i32 {
    fn from(join: LineJoin) -> i32 {
        join as i32
    }
}

impl<W: Write, H: ErrorHandler> Document<W, H> {
    /// Run a path or transformation operator: needs a page, leaves text mode.
    fn path_op(&mut self, function: &str, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        self.guard(|doc| {
            doc.require_page(function)?;
            doc.end_text()?;
            f(doc)
        })
    }

    /// Run a graphics state setter: needs a page, text mode is kept.
    fn state_op(&mut self, function: &str, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        self.guard(|doc| {
            doc.require_page(function)?;
            f(doc)
        })
    }

    fn write_curve(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<()> {
        if x2 == x3 && y2 == y3 {
            write!(
                self.writer,
                "{} {} {} {} y\n",
                Real(x1),
                Real(y1),
                Real(x3),
                Real(y3)
            )
        } else {
            write!(
                self.writer,
                "{} {} {} {} {} {} c\n",
                Real(x1),
                Real(y1),
                Real(x2),
                Real(y2),
                Real(x3),
                Real(y3)
            )
        }
    }

    /// One arc segment of at most 90 degrees.
    fn write_arc_segment(&mut self, x: f64, y: f64, r: f64, alpha: f64, beta: f64) -> Result<()> {
        if alpha == beta {
            return Ok(());
        }

        // quarter circles starting on an axis
        if beta - alpha == 90.0 && alpha % 90.0 == 0.0 {
            let m = ARC_MAGIC * r;
            return match alpha.rem_euclid(360.0) as i32 {
                0 => self.write_curve(x + r, y + m, x + m, y + r, x, y + r),
                90 => self.write_curve(x - m, y + r, x - r, y + m, x - r, y),
                180 => self.write_curve(x - r, y - m, x - m, y - r, x, y - r),
                _ => self.write_curve(x + m, y - r, x + r, y - m, x + r, y),
            };
        }

        let (a, b) = (alpha * PI / 180.0, beta * PI / 180.0);
        let half = (b - a) / 2.0;
        let bcp = 4.0 / 3.0 * (1.0 - half.cos()) / half.sin();
        let (sin_a, cos_a) = a.sin_cos();
        let (sin_b, cos_b) = b.sin_cos();

        self.write_curve(
            x + r * (cos_a - bcp * sin_a),
            y + r * (sin_a + bcp * cos_a),
            x + r * (cos_b + bcp * sin_b),
            y + r * (sin_b - bcp * cos_b),
            x + r * cos_b,
            y + r * sin_b,
        )
    }

    fn painting(&mut self, function: &str, operator: &str) -> Result<()> {
        self.path_op(function, |doc| {
            let suffix = doc.page.fill_rule.suffix();
            write!(doc.writer, "{}{}\n", operator, suffix)
        })
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.path_op("move_to", |doc| {
            write!(doc.writer, "{} {} m\n", Real(x), Real(y))
        })
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.path_op("line_to", |doc| {
            write!(doc.writer, "{} {} l\n", Real(x), Real(y))
        })
    }

    /// Append a cubic Bézier curve to the current path.
    pub fn curve_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<()> {
        self.path_op("curve_to", |doc| doc.write_curve(x1, y1, x2, y2, x3, y3))
    }

    /// Append a counterclockwise arc from `alpha` to `beta` degrees.
    /// The current point must already be at the arc's start.
    pub fn arc(&mut self, x: f64, y: f64, r: f64, alpha: f64, beta: f64) -> Result<()> {
        self.path_op("arc", |doc| {
            if r < 0.0 {
                return Err(PdfError::value(format!("Negative arc radius {}", r)));
            }
            let mut start = alpha;
            while beta - start > 90.0 {
                doc.write_arc_segment(x, y, r, start, start + 90.0)?;
                start += 90.0;
            }
            doc.write_arc_segment(x, y, r, start, beta)
        })
    }

    /// Append a full circle as a new subpath.
    pub fn circle(&mut self, x: f64, y: f64, r: f64) -> Result<()> {
        self.path_op("circle", |doc| {
            if r < 0.0 {
                return Err(PdfError::value(format!("Negative circle radius {}", r)));
            }
            write!(doc.writer, "{} {} m\n", Real(x + r), Real(y))?;
            for quadrant in 0..4 {
                let alpha = f64::from(quadrant * 90);
                doc.write_arc_segment(x, y, r, alpha, alpha + 90.0)?;
            }
            Ok(())
        })
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.path_op("rect", |doc| {
            write!(
                doc.writer,
                "{} {} {} {} re\n",
                Real(x),
                Real(y),
                Real(width),
                Real(height)
            )
        })
    }

    pub fn close_path(&mut self) -> Result<()> {
        self.path_op("close_path", |doc| doc.writer.write_str("h\n"))
    }

    /// End the path without painting it.
    pub fn end_path(&mut self) -> Result<()> {
        self.path_op("end_path", |doc| doc.writer.write_str("n\n"))
    }

    pub fn stroke(&mut self) -> Result<()> {
        self.path_op("stroke", |doc| doc.writer.write_str("S\n"))
    }

    pub fn close_path_stroke(&mut self) -> Result<()> {
        self.path_op("close_path_stroke", |doc| doc.writer.write_str("s\n"))
    }

    pub fn fill(&mut self) -> Result<()> {
        self.painting("fill", "f")
    }

    pub fn fill_stroke(&mut self) -> Result<()> {
        self.painting("fill_stroke", "B")
    }

    pub fn close_path_fill_stroke(&mut self) -> Result<()> {
        self.painting("close_path_fill_stroke", "b")
    }

    /// Intersect the clipping area with the current path, then end it.
    pub fn clip(&mut self) -> Result<()> {
        self.path_op("clip", |doc| {
            let suffix = doc.page.fill_rule.suffix();
            write!(doc.writer, "W{}\nn\n", suffix)
        })
    }

    pub fn save(&mut self) -> Result<()> {
        self.path_op("save", |doc| doc.writer.write_str("q\n"))
    }

    pub fn restore(&mut self) -> Result<()> {
        self.path_op("restore", |doc| doc.writer.write_str("Q\n"))
    }

    /// Write a `cm` operator. Used by image placement as well.
    pub(crate) fn write_concat(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<()> {
        self.end_text()?;
        write!(
            self.writer,
            "{} {} {} {} {} {} cm\n",
            Real(a),
            Real(b),
            Real(c),
            Real(d),
            Real(e),
            Real(f)
        )
    }

    /// Concatenate a matrix to the current transformation.
    pub fn concat(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.path_op("concat", |doc| doc.write_concat(a, b, c, d, e, f))
    }

    pub fn translate(&mut self, tx: f64, ty: f64) -> Result<()> {
        self.path_op("translate", |doc| {
            doc.write_concat(1.0, 0.0, 0.0, 1.0, tx, ty)
        })
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> Result<()> {
        self.path_op("scale", |doc| doc.write_concat(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Rotate the coordinate system by `phi` degrees.
    pub fn rotate(&mut self, phi: f64) -> Result<()> {
        self.path_op("rotate", |doc| {
            if phi == 0.0 {
                return Ok(());
            }
            let (s, c) = (phi * PI / 180.0).sin_cos();
            doc.write_concat(c, s, -s, c, 0.0, 0.0)
        })
    }

    /// Dash pattern of `black` on and `white` off; both zero is solid.
    pub fn set_dash(&mut self, black: f64, white: f64) -> Result<()> {
        self.state_op("set_dash", |doc| {
            if black < 0.0 || white < 0.0 {
                doc.warn(format!("Negative dash value {}/{}", black, white));
                return Ok(());
            }
            if black == 0.0 && white == 0.0 {
                doc.writer.write_str("[] 0 d\n")
            } else {
                write!(doc.writer, "[{} {}] 0 d\n", Real(black), Real(white))
            }
        })
    }

    /// Arbitrary dash pattern; fewer than two entries is solid.
    pub fn set_polydash(&mut self, pattern: &[f64]) -> Result<()> {
        self.state_op("set_polydash", |doc| {
            if pattern.len() < 2 {
                return doc.writer.write_str("[] 0 d\n");
            }
            if let Some(bad) = pattern.iter().find(|v| **v < 0.0) {
                doc.warn(format!("Negative dash value {}", bad));
                return Ok(());
            }
            doc.writer.write_str("[")?;
            for value in pattern {
                write!(doc.writer, "{} ", Real(*value))?;
            }
            doc.writer.write_str("] 0 d\n")
        })
    }

    pub fn set_flat(&mut self, flatness: f64) -> Result<()> {
        self.state_op("set_flat", |doc| {
            if !(0.0..=100.0).contains(&flatness) {
                doc.warn(format!("Illegal flat value {}", flatness));
                return Ok(());
            }
            write!(doc.writer, "{} i\n", Real(flatness))
        })
    }

    pub fn set_linejoin(&mut self, join: impl Into<i32>) -> Result<()> {
        let join = join.into();
        self.state_op("set_linejoin", |doc| {
            if !(0..=2).contains(&join) {
                doc.warn(format!("Bogus line join value {}", join));
                return Ok(());
            }
            write!(doc.writer, "{} j\n", join)
        })
    }

    pub fn set_linecap(&mut self, cap: impl Into<i32>) -> Result<()> {
        let cap = cap.into();
        self.state_op("set_linecap", |doc| {
            if !(0..=2).contains(&cap) {
                doc.warn(format!("Bogus line cap value {}", cap));
                return Ok(());
            }
            write!(doc.writer, "{} J\n", cap)
        })
    }

    pub fn set_miterlimit(&mut self, miter: f64) -> Result<()> {
        self.state_op("set_miterlimit", |doc| {
            if miter < 1.0 {
                doc.warn(format!("Bogus miter limit {}", miter));
                return Ok(());
            }
            write!(doc.writer, "{} M\n", Real(miter))
        })
    }

    pub fn set_linewidth(&mut self, width: f64) -> Result<()> {
        self.state_op("set_linewidth", |doc| {
            if width <= 0.0 {
                doc.warn(format!("Bogus line width {}", width));
                return Ok(());
            }
            write!(doc.writer, "{} w\n", Real(width))
        })
    }

    /// Select `winding` or `evenodd` for the rest of the page.
    pub fn set_fillrule(&mut self, rule: &str) -> Result<()> {
        self.state_op("set_fillrule", |doc| {
            doc.page.fill_rule = rule.parse()?;
            Ok(())
        })
    }
}
