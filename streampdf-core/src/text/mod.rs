//! Font lookup and the text operators.
//!
//! Text operators enter text mode on demand. Strings pass through the
//! current font's encoding before they are quoted into the content stream.

use std::io::Write;

use crate::document::Document;
use crate::error::{ErrorHandler, PdfError, Result};
use crate::fonts::{
    is_base14, AfmFile, CoreMetrics, Encoding, FontHandle, MetricsProvider, Resolved,
};
use crate::resources::ResourceCategory;
use crate::writer::{quote_bytes, Real};

/// Font and size selected with [`Document::set_font`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextState {
    pub font: Option<FontHandle>,
    pub size: f64,
}

impl<W: Write, H: ErrorHandler> Document<W, H> {
    /// Run a text operator: needs a page, enters text mode.
    fn text_op(&mut self, function: &str, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        self.guard(|doc| {
            doc.require_page(function)?;
            doc.begin_text()?;
            f(doc)
        })
    }

    fn current_handle(&self, function: &str) -> Result<FontHandle> {
        self.text.font.ok_or_else(|| PdfError::state(function))
    }

    /// Find or load a font in `encoding`.
    ///
    /// Returns `None` with a warning when no metrics can be found, or when
    /// embedding is requested and no font program is registered. The
    /// standard fonts are never embedded.
    pub fn find_font(
        &mut self,
        name: &str,
        encoding: &str,
        embed: bool,
    ) -> Result<Option<FontHandle>> {
        self.guard(|doc| {
            if name.is_empty() {
                return Err(PdfError::value("Empty font name"));
            }
            let encoding: Encoding = encoding.parse()?;
            let embed = embed && !is_base14(name);

            if let Some(handle) = doc.fonts.find_cached(name, encoding) {
                return Ok(Some(handle));
            }

            let resolved = match doc.resolve_metrics(name, encoding)? {
                Some(resolved) => resolved,
                None => return Ok(None),
            };
            if let Some(warning) = resolved.warning {
                doc.warn(warning);
            }
            // a font that can't be re-encoded may already be loaded
            if let Some(handle) = doc.fonts.find_cached(name, resolved.metrics.encoding) {
                return Ok(Some(handle));
            }

            let font_file = if embed {
                let upr = doc.settings.resolve_resource_file();
                match doc.resources.find(ResourceCategory::FontOutline, name, &upr)? {
                    Some(path) => Some(path),
                    None => {
                        doc.warn(format!("No font outline file for font '{}'", name));
                        return Ok(None);
                    }
                }
            } else {
                None
            };

            let obj_id = doc.writer.alloc_id();
            let handle = doc.fonts.insert(resolved.metrics, obj_id, font_file);
            tracing::debug!("Font '{}' ({}) loaded as {}", name, encoding, handle);
            Ok(Some(handle))
        })
    }

    fn resolve_metrics(&mut self, name: &str, encoding: Encoding) -> Result<Option<Resolved>> {
        if let Some(resolved) = CoreMetrics.resolve(name, encoding)? {
            return Ok(Some(resolved));
        }

        let upr = self.settings.resolve_resource_file();
        if let Some(path) = self.resources.find(ResourceCategory::FontAfm, name, &upr)? {
            return match AfmFile::new(&path).resolve(name, encoding) {
                Ok(resolved) => Ok(resolved),
                Err(e) => {
                    self.warn(e.to_string());
                    Ok(None)
                }
            };
        }

        if self.resources.find(ResourceCategory::FontPfm, name, &upr)?.is_some() {
            self.warn(format!("PFM metrics for font '{}' not implemented", name));
        } else {
            self.warn(format!("Metrics data for font '{}' not found", name));
        }
        Ok(None)
    }

    /// Select `font` at `size` and set the leading to the size.
    pub fn set_font(&mut self, font: FontHandle, size: f64) -> Result<()> {
        self.text_op("set_font", |doc| {
            if doc.fonts.get(font).is_none() {
                return Err(PdfError::value(format!("Bad font handle {}", font.index())));
            }
            if size <= 0.0 {
                return Err(PdfError::value(format!("Bad font size {}", size)));
            }
            write!(doc.writer, "/{} {} Tf\n", font, Real(size))?;
            write!(doc.writer, "{} TL\n", Real(size))?;
            doc.fonts.mark_used(font);
            doc.text = TextState {
                font: Some(font),
                size,
            };
            Ok(())
        })
    }

    /// [`find_font`](Self::find_font) followed by [`set_font`](Self::set_font).
    pub fn set_font_by_name(&mut self, name: &str, encoding: &str, size: f64) -> Result<bool> {
        match self.find_font(name, encoding, false)? {
            Some(font) => self.set_font(font, size).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn current_font(&mut self) -> Result<FontHandle> {
        self.guard(|doc| doc.current_handle("current_font"))
    }

    pub fn current_font_name(&mut self) -> Result<String> {
        self.guard(|doc| {
            let handle = doc.current_handle("current_font_name")?;
            doc.fonts
                .get(handle)
                .map(|slot| slot.name().to_string())
                .ok_or_else(|| PdfError::state("current_font_name"))
        })
    }

    pub fn current_font_size(&mut self) -> Result<f64> {
        self.guard(|doc| {
            doc.current_handle("current_font_size")?;
            Ok(doc.text.size)
        })
    }

    /// Width of `text` in `font` at `size`, in text space units.
    pub fn stringwidth(&mut self, text: &str, font: FontHandle, size: f64) -> Result<f64> {
        self.guard(|doc| {
            let slot = doc
                .fonts
                .get(font)
                .ok_or_else(|| PdfError::value(format!("Bad font handle {}", font.index())))?;
            let bytes = slot.encoding().encode(text);
            Ok(slot.metrics().string_width(&bytes, size))
        })
    }

    pub fn set_leading(&mut self, leading: f64) -> Result<()> {
        self.text_op("set_leading", |doc| {
            write!(doc.writer, "{} TL\n", Real(leading))
        })
    }

    /// Text rendering mode, 0 (fill) to 7 (clip).
    pub fn set_text_rendering(&mut self, mode: i32) -> Result<()> {
        self.text_op("set_text_rendering", |doc| {
            if !(0..=7).contains(&mode) {
                doc.warn(format!("Bogus text rendering mode {}", mode));
                return Ok(());
            }
            write!(doc.writer, "{} Tr\n", mode)
        })
    }

    pub fn set_text_rise(&mut self, rise: f64) -> Result<()> {
        self.text_op("set_text_rise", |doc| {
            write!(doc.writer, "{} Ts\n", Real(rise))
        })
    }

    /// Horizontal scaling in percent.
    pub fn set_horiz_scaling(&mut self, scale: f64) -> Result<()> {
        self.text_op("set_horiz_scaling", |doc| {
            write!(doc.writer, "{} Tz\n", Real(scale))
        })
    }

    pub fn set_text_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.text_op("set_text_matrix", |doc| {
            write!(
                doc.writer,
                "{} {} {} {} {} {} Tm\n",
                Real(a),
                Real(b),
                Real(c),
                Real(d),
                Real(e),
                Real(f)
            )
        })
    }

    pub fn set_text_pos(&mut self, x: f64, y: f64) -> Result<()> {
        self.text_op("set_text_pos", |doc| {
            write!(doc.writer, "1 0 0 1 {} {} Tm\n", Real(x), Real(y))
        })
    }

    fn write_string(&mut self, function: &str, text: &str, operator: &str) -> Result<()> {
        let handle = self.current_handle(function)?;
        let encoding = self
            .fonts
            .get(handle)
            .map(|slot| slot.encoding())
            .ok_or_else(|| PdfError::state(function))?;
        self.writer.write_bytes(&quote_bytes(&encoding.encode(text)))?;
        write!(self.writer, " {}\n", operator)
    }

    /// Show `text` at the current text position.
    pub fn show(&mut self, text: &str) -> Result<()> {
        self.text_op("show", |doc| doc.write_string("show", text, "Tj"))
    }

    pub fn show_xy(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.text_op("show_xy", |doc| {
            write!(doc.writer, "1 0 0 1 {} {} Tm\n", Real(x), Real(y))?;
            doc.write_string("show_xy", text, "Tj")
        })
    }

    /// Show `text` on the next line.
    pub fn continue_text(&mut self, text: &str) -> Result<()> {
        self.text_op("continue_text", |doc| {
            doc.write_string("continue_text", text, "'")
        })
    }

    pub fn set_char_spacing(&mut self, spacing: f64) -> Result<()> {
        self.text_op("set_char_spacing", |doc| {
            write!(doc.writer, "{} Tc\n", Real(spacing))
        })
    }

    pub fn set_word_spacing(&mut self, spacing: f64) -> Result<()> {
        self.text_op("set_word_spacing", |doc| {
            write!(doc.writer, "{} Tw\n", Real(spacing))
        })
    }
}
