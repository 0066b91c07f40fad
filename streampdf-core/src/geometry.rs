//! Points and rectangles in default user space.

use std::fmt;

use crate::writer::Real;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// A rectangle given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub lower_left: Point,
    pub upper_right: Point,
}

impl Rectangle {
    pub fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self {
            lower_left: Point::new(llx, lly),
            upper_right: Point::new(urx, ury),
        }
    }

    pub fn from_position_and_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.upper_right.x - self.lower_left.x
    }

    pub fn height(&self) -> f64 {
        self.upper_right.y - self.lower_left.y
    }
}

/// Writes the rectangle as a PDF array, `[llx lly urx ury]`.
impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {}]",
            Real(self.lower_left.x),
            Real(self.lower_left.y),
            Real(self.upper_right.x),
            Real(self.upper_right.y)
        )
    }
}
