//! # streampdf
//!
//! A single-pass PDF writer. Objects go to the output as soon as they are
//! complete; nothing is buffered except the page currently being described.
//!
//! ## Features
//!
//! - **Forward-only output**: stream lengths are written as separate
//!   objects after the stream, so any `Write` sink works, including pipes
//! - **Pages and graphics**: paths, arcs, transformations, gray and RGB color
//! - **Text**: the fourteen standard fonts, AFM metrics and Type 1 embedding
//! - **Images**: JPEG, GIF, TIFF, CCITT and raw data, written once and
//!   placed any number of times
//! - **Navigation**: bookmarks, notes, links and file attachments
//!
//! ## Quick Start
//!
//! ```rust
//! use streampdf::{Document, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::with_writer(Vec::new())?;
//! doc.set_info("Title", "Hello")?;
//!
//! let font = doc.find_font("Helvetica", "default", false)?.unwrap();
//! doc.begin_page(595.0, 842.0)?;
//! doc.set_font(font, 24.0)?;
//! doc.show_xy("Hello, PDF!", 50.0, 700.0)?;
//! doc.set_rgb_color(0.0, 0.5, 1.0)?;
//! doc.circle(300.0, 400.0, 50.0)?;
//! doc.fill()?;
//! doc.end_page()?;
//!
//! let bytes = doc.close()?;
//! assert!(bytes.starts_with(b"%PDF-1.3"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`document`] - the document context and page lifecycle
//! - [`graphics`] - paths, graphics state and color
//! - [`text`] - font lookup and text operators
//! - [`images`] - image formats and placement
//! - [`annotations`] - notes, links and attachments
//! - [`writer`] - low-level object and stream output

pub mod annotations;
pub mod compression;
pub mod config;
pub mod document;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod resources;
pub mod source;
pub mod structure;
pub mod text;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Once;

pub use annotations::{BorderStyleType, DestinationFit, FileIcon, NoteIcon};
pub use config::{DebugFlags, Settings};
pub use document::{Document, DocumentBuilder, DocumentInfo, Transition};
pub use error::{DefaultErrorHandler, ErrorHandler, FatalContext, PdfError, Result};
pub use fonts::{Encoding, FontHandle};
pub use geometry::Rectangle;
pub use graphics::{Color, FillRule, LineCap, LineJoin};
pub use images::{CcittParams, ImageHandle};
pub use structure::OutlineHandle;

/// Current version of streampdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn major_version() -> u32 {
    env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0)
}

pub fn minor_version() -> u32 {
    env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0)
}

static BOOT: Once = Once::new();

/// Process-wide setup. Safe to call any number of times.
///
/// Number formatting does not depend on the locale, so there is nothing
/// to fix up; the call only logs once.
pub fn boot() {
    BOOT.call_once(|| {
        tracing::debug!("streampdf {} booted", VERSION);
    });
}

/// Counterpart of [`boot`]. Does nothing.
pub fn shutdown() {}
