//! In-core metrics for the standard fonts.
//!
//! These fonts are always available to a viewer, so they are never
//! embedded and only their widths matter for measuring text. The
//! descriptor values are kept so the core table can serve any request
//! an external metrics file could.
//!
//! Text fonts are keyed by glyph name, like an AFM file, so every
//! encoding with a glyph vector gets correct widths for its upper half.
//! Symbol and ZapfDingbats only have their builtin encoding and are
//! keyed by code.

use std::collections::HashMap;

use super::encoding::Encoding;
use super::metrics::{FontFlags, FontMetrics, MetricsProvider, Resolved, DEFAULT_WIDTH};
use crate::error::Result;

/// Names of the fonts every viewer must provide.
pub const BASE14_FONTS: [&str; 14] = [
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Symbol",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "ZapfDingbats",
];

pub fn is_base14(name: &str) -> bool {
    BASE14_FONTS.contains(&name)
}

/// Accents whose composites take the width of their base letter.
const ACCENTS: [&str; 8] = [
    "acute",
    "grave",
    "circumflex",
    "dieresis",
    "tilde",
    "ring",
    "cedilla",
    "caron",
];

/// Base glyph of an accented letter. Accented `i` is built on `dotlessi`.
fn base_glyph(name: &str) -> Option<&'static str> {
    ACCENTS.iter().find_map(|accent| {
        let base = name.strip_suffix(accent)?;
        let mut chars = base.chars();
        match (chars.next(), chars.next()) {
            (Some('i'), None) => Some("dotlessi"),
            (Some(ch), None) if ch.is_ascii_alphabetic() => super::encoding::glyph_name(ch),
            _ => None,
        }
    })
}

#[derive(Debug, Clone)]
enum CoreWidths {
    /// Widths by glyph name.
    Glyphs(HashMap<&'static str, u16>),
    /// Widths by code in the font's builtin encoding.
    Codes(&'static [(u8, u16)]),
    /// Every glyph has the same width.
    Fixed(u16),
}

/// Character widths in 1/1000 text space units, plus descriptor data.
#[derive(Debug, Clone)]
struct CoreFont {
    widths: CoreWidths,
    bbox: [i32; 4],
    cap_height: i32,
    ascender: i32,
    descender: i32,
    italic_angle: f64,
    stem_v: i32,
    weight: &'static str,
    fixed_pitch: bool,
    symbolic: bool,
}

impl CoreFont {
    fn new(widths: CoreWidths) -> Self {
        Self {
            widths,
            bbox: [0, 0, 1000, 1000],
            cap_height: 0,
            ascender: 0,
            descender: 0,
            italic_angle: 0.0,
            stem_v: 0,
            weight: "Medium",
            fixed_pitch: false,
            symbolic: false,
        }
    }

    fn glyphs(table: &'static [(&'static str, u16)]) -> Self {
        Self::new(CoreWidths::Glyphs(table.iter().copied().collect()))
    }

    fn codes(table: &'static [(u8, u16)]) -> Self {
        let mut font = Self::new(CoreWidths::Codes(table));
        font.symbolic = true;
        font
    }

    fn fixed(width: u16) -> Self {
        let mut font = Self::new(CoreWidths::Fixed(width));
        font.fixed_pitch = true;
        font
    }

    fn with_descriptor(
        mut self,
        bbox: [i32; 4],
        cap_height: i32,
        ascender: i32,
        descender: i32,
        stem_v: i32,
    ) -> Self {
        self.bbox = bbox;
        self.cap_height = cap_height;
        self.ascender = ascender;
        self.descender = descender;
        self.stem_v = stem_v;
        self
    }

    fn styled(&self, bbox: [i32; 4], italic_angle: f64, weight: &'static str, stem_v: i32) -> Self {
        let mut font = self.clone();
        font.bbox = bbox;
        font.italic_angle = italic_angle;
        font.weight = weight;
        font.stem_v = stem_v;
        font
    }

    fn with_style(mut self, italic_angle: f64, weight: &'static str) -> Self {
        self.italic_angle = italic_angle;
        self.weight = weight;
        self
    }

    fn glyph_width(glyphs: &HashMap<&'static str, u16>, name: &str) -> Option<u16> {
        glyphs
            .get(name)
            .or_else(|| base_glyph(name).and_then(|base| glyphs.get(base)))
            .copied()
    }

    fn widths(&self, encoding: Encoding) -> [u16; 256] {
        let mut widths = [DEFAULT_WIDTH; 256];
        match &self.widths {
            CoreWidths::Glyphs(glyphs) => {
                for (code, width) in widths.iter_mut().enumerate() {
                    if let Some(w) = encoding
                        .glyph_name(code as u8)
                        .and_then(|name| Self::glyph_width(glyphs, name))
                    {
                        *width = w;
                    }
                }
            }
            CoreWidths::Codes(table) => {
                for &(code, w) in table.iter() {
                    widths[code as usize] = w;
                }
            }
            CoreWidths::Fixed(w) => {
                for (code, width) in widths.iter_mut().enumerate() {
                    if encoding.glyph_name(code as u8).is_some() {
                        *width = *w;
                    }
                }
            }
        }
        widths
    }

    fn metrics(&self, name: &str, encoding: Encoding) -> FontMetrics {
        let encoding_scheme = if self.symbolic {
            "FontSpecific"
        } else {
            "AdobeStandardEncoding"
        };

        FontMetrics {
            name: name.to_string(),
            encoding,
            encoding_scheme: encoding_scheme.to_string(),
            flags: FontFlags::derive(
                name,
                encoding_scheme,
                Some(self.weight),
                self.italic_angle,
                self.fixed_pitch,
            ),
            bbox: self.bbox,
            ascender: self.ascender,
            descender: self.descender,
            cap_height: self.cap_height,
            italic_angle: self.italic_angle,
            stem_v: self.stem_v,
            widths: self.widths(encoding),
        }
    }
}

#[rustfmt::skip]
const HELVETICA: &[(&str, u16)] = &[
    ("space", 278), ("exclam", 278), ("quotedbl", 355), ("numbersign", 556), ("dollar", 556),
    ("percent", 889), ("ampersand", 667), ("quoteright", 222), ("parenleft", 333),
    ("parenright", 333), ("asterisk", 389), ("plus", 584), ("comma", 278), ("hyphen", 333),
    ("period", 278), ("slash", 278), ("zero", 556), ("one", 556), ("two", 556), ("three", 556),
    ("four", 556), ("five", 556), ("six", 556), ("seven", 556), ("eight", 556), ("nine", 556),
    ("colon", 278), ("semicolon", 278), ("less", 584), ("equal", 584), ("greater", 584),
    ("question", 556), ("at", 1015), ("A", 667), ("B", 667), ("C", 722), ("D", 722), ("E", 667),
    ("F", 611), ("G", 778), ("H", 722), ("I", 278), ("J", 500), ("K", 667), ("L", 556), ("M", 833),
    ("N", 722), ("O", 778), ("P", 667), ("Q", 778), ("R", 722), ("S", 667), ("T", 611), ("U", 722),
    ("V", 667), ("W", 944), ("X", 667), ("Y", 667), ("Z", 611), ("bracketleft", 278),
    ("backslash", 278), ("bracketright", 278), ("asciicircum", 469), ("underscore", 556),
    ("quoteleft", 222), ("a", 556), ("b", 556), ("c", 500), ("d", 556), ("e", 556), ("f", 278),
    ("g", 556), ("h", 556), ("i", 222), ("j", 222), ("k", 500), ("l", 222), ("m", 833), ("n", 556),
    ("o", 556), ("p", 556), ("q", 556), ("r", 333), ("s", 500), ("t", 278), ("u", 556), ("v", 500),
    ("w", 722), ("x", 500), ("y", 500), ("z", 500), ("braceleft", 334), ("bar", 260),
    ("braceright", 334), ("asciitilde", 584), ("exclamdown", 333), ("cent", 556),
    ("sterling", 556), ("fraction", 167), ("yen", 556), ("florin", 556), ("section", 556),
    ("currency", 556), ("quotesingle", 191), ("quotedblleft", 333), ("guillemotleft", 556),
    ("guilsinglleft", 333), ("guilsinglright", 333), ("fi", 500), ("fl", 500), ("endash", 556),
    ("dagger", 556), ("daggerdbl", 556), ("periodcentered", 278), ("paragraph", 537),
    ("bullet", 350), ("quotesinglbase", 222), ("quotedblbase", 333), ("quotedblright", 333),
    ("guillemotright", 556), ("ellipsis", 1000), ("perthousand", 1000), ("questiondown", 611),
    ("grave", 333), ("acute", 333), ("circumflex", 333), ("tilde", 333), ("macron", 333),
    ("breve", 333), ("dotaccent", 333), ("dieresis", 333), ("ring", 333), ("cedilla", 333),
    ("hungarumlaut", 333), ("ogonek", 333), ("caron", 333), ("emdash", 1000), ("AE", 1000),
    ("ordfeminine", 370), ("Lslash", 556), ("Oslash", 778), ("OE", 1000), ("ordmasculine", 365),
    ("ae", 889), ("dotlessi", 278), ("lslash", 222), ("oslash", 611), ("oe", 944),
    ("germandbls", 611), ("brokenbar", 260), ("copyright", 737), ("logicalnot", 584),
    ("registered", 737), ("degree", 400), ("plusminus", 584), ("twosuperior", 333),
    ("threesuperior", 333), ("mu", 556), ("onesuperior", 333), ("onequarter", 834),
    ("onehalf", 834), ("threequarters", 834), ("Eth", 722), ("multiply", 584), ("Thorn", 667),
    ("eth", 556), ("divide", 584), ("thorn", 556), ("trademark", 1000), ("minus", 584),
    ("partialdiff", 476), ("Delta", 612), ("summation", 600), ("radical", 453),
    ("notequal", 549), ("lessequal", 549), ("greaterequal", 549), ("lozenge", 471),
];

#[rustfmt::skip]
const HELVETICA_BOLD: &[(&str, u16)] = &[
    ("space", 278), ("exclam", 333), ("quotedbl", 474), ("numbersign", 556), ("dollar", 556),
    ("percent", 889), ("ampersand", 722), ("quoteright", 278), ("parenleft", 333),
    ("parenright", 333), ("asterisk", 389), ("plus", 584), ("comma", 278), ("hyphen", 333),
    ("period", 278), ("slash", 278), ("zero", 556), ("one", 556), ("two", 556), ("three", 556),
    ("four", 556), ("five", 556), ("six", 556), ("seven", 556), ("eight", 556), ("nine", 556),
    ("colon", 333), ("semicolon", 333), ("less", 584), ("equal", 584), ("greater", 584),
    ("question", 611), ("at", 975), ("A", 722), ("B", 722), ("C", 722), ("D", 722), ("E", 667),
    ("F", 611), ("G", 778), ("H", 722), ("I", 278), ("J", 556), ("K", 722), ("L", 611), ("M", 833),
    ("N", 722), ("O", 778), ("P", 667), ("Q", 778), ("R", 722), ("S", 667), ("T", 611), ("U", 722),
    ("V", 667), ("W", 944), ("X", 667), ("Y", 667), ("Z", 611), ("bracketleft", 333),
    ("backslash", 278), ("bracketright", 333), ("asciicircum", 584), ("underscore", 556),
    ("quoteleft", 278), ("a", 556), ("b", 611), ("c", 556), ("d", 611), ("e", 556), ("f", 333),
    ("g", 611), ("h", 611), ("i", 278), ("j", 278), ("k", 556), ("l", 278), ("m", 889), ("n", 611),
    ("o", 611), ("p", 611), ("q", 611), ("r", 389), ("s", 556), ("t", 333), ("u", 611), ("v", 556),
    ("w", 778), ("x", 556), ("y", 556), ("z", 500), ("braceleft", 389), ("bar", 280),
    ("braceright", 389), ("asciitilde", 584), ("exclamdown", 333), ("cent", 556),
    ("sterling", 556), ("fraction", 167), ("yen", 556), ("florin", 556), ("section", 556),
    ("currency", 556), ("quotesingle", 238), ("quotedblleft", 500), ("guillemotleft", 556),
    ("guilsinglleft", 333), ("guilsinglright", 333), ("fi", 611), ("fl", 611), ("endash", 556),
    ("dagger", 556), ("daggerdbl", 556), ("periodcentered", 278), ("paragraph", 556),
    ("bullet", 350), ("quotesinglbase", 278), ("quotedblbase", 500), ("quotedblright", 500),
    ("guillemotright", 556), ("ellipsis", 1000), ("perthousand", 1000), ("questiondown", 611),
    ("grave", 333), ("acute", 333), ("circumflex", 333), ("tilde", 333), ("macron", 333),
    ("breve", 333), ("dotaccent", 333), ("dieresis", 333), ("ring", 333), ("cedilla", 333),
    ("hungarumlaut", 333), ("ogonek", 333), ("caron", 333), ("emdash", 1000), ("AE", 1000),
    ("ordfeminine", 370), ("Lslash", 611), ("Oslash", 778), ("OE", 1000), ("ordmasculine", 365),
    ("ae", 889), ("dotlessi", 278), ("lslash", 278), ("oslash", 611), ("oe", 944),
    ("germandbls", 611), ("brokenbar", 280), ("copyright", 737), ("logicalnot", 584),
    ("registered", 737), ("degree", 400), ("plusminus", 584), ("twosuperior", 333),
    ("threesuperior", 333), ("mu", 611), ("onesuperior", 333), ("onequarter", 834),
    ("onehalf", 834), ("threequarters", 834), ("Eth", 722), ("multiply", 584), ("Thorn", 667),
    ("eth", 611), ("divide", 584), ("thorn", 611), ("trademark", 1000), ("minus", 584),
    ("partialdiff", 494), ("Delta", 612), ("summation", 600), ("radical", 549),
    ("notequal", 549), ("lessequal", 549), ("greaterequal", 549), ("lozenge", 494),
];

#[rustfmt::skip]
const TIMES_ROMAN: &[(&str, u16)] = &[
    ("space", 250), ("exclam", 333), ("quotedbl", 408), ("numbersign", 500), ("dollar", 500),
    ("percent", 833), ("ampersand", 778), ("quoteright", 333), ("parenleft", 333),
    ("parenright", 333), ("asterisk", 500), ("plus", 564), ("comma", 250), ("hyphen", 333),
    ("period", 250), ("slash", 278), ("zero", 500), ("one", 500), ("two", 500), ("three", 500),
    ("four", 500), ("five", 500), ("six", 500), ("seven", 500), ("eight", 500), ("nine", 500),
    ("colon", 278), ("semicolon", 278), ("less", 564), ("equal", 564), ("greater", 564),
    ("question", 444), ("at", 921), ("A", 722), ("B", 667), ("C", 667), ("D", 722), ("E", 611),
    ("F", 556), ("G", 722), ("H", 722), ("I", 333), ("J", 389), ("K", 722), ("L", 611), ("M", 889),
    ("N", 722), ("O", 722), ("P", 556), ("Q", 722), ("R", 667), ("S", 556), ("T", 611), ("U", 722),
    ("V", 722), ("W", 944), ("X", 722), ("Y", 722), ("Z", 611), ("bracketleft", 333),
    ("backslash", 278), ("bracketright", 333), ("asciicircum", 469), ("underscore", 500),
    ("quoteleft", 333), ("a", 444), ("b", 500), ("c", 444), ("d", 500), ("e", 444), ("f", 333),
    ("g", 500), ("h", 500), ("i", 278), ("j", 278), ("k", 500), ("l", 278), ("m", 778), ("n", 500),
    ("o", 500), ("p", 500), ("q", 500), ("r", 333), ("s", 389), ("t", 278), ("u", 500), ("v", 500),
    ("w", 722), ("x", 500), ("y", 500), ("z", 444), ("braceleft", 480), ("bar", 200),
    ("braceright", 480), ("asciitilde", 541), ("exclamdown", 333), ("cent", 500),
    ("sterling", 500), ("fraction", 167), ("yen", 500), ("florin", 500), ("section", 500),
    ("currency", 500), ("quotesingle", 180), ("quotedblleft", 444), ("guillemotleft", 500),
    ("guilsinglleft", 333), ("guilsinglright", 333), ("fi", 556), ("fl", 556), ("endash", 500),
    ("dagger", 500), ("daggerdbl", 500), ("periodcentered", 250), ("paragraph", 453),
    ("bullet", 350), ("quotesinglbase", 333), ("quotedblbase", 444), ("quotedblright", 444),
    ("guillemotright", 500), ("ellipsis", 1000), ("perthousand", 1000), ("questiondown", 444),
    ("grave", 333), ("acute", 333), ("circumflex", 333), ("tilde", 333), ("macron", 333),
    ("breve", 333), ("dotaccent", 333), ("dieresis", 333), ("ring", 333), ("cedilla", 333),
    ("hungarumlaut", 333), ("ogonek", 333), ("caron", 333), ("emdash", 1000), ("AE", 889),
    ("ordfeminine", 276), ("Lslash", 611), ("Oslash", 722), ("OE", 889), ("ordmasculine", 310),
    ("ae", 667), ("dotlessi", 278), ("lslash", 278), ("oslash", 500), ("oe", 722),
    ("germandbls", 500), ("brokenbar", 200), ("copyright", 760), ("logicalnot", 564),
    ("registered", 760), ("degree", 400), ("plusminus", 564), ("twosuperior", 300),
    ("threesuperior", 300), ("mu", 500), ("onesuperior", 300), ("onequarter", 750),
    ("onehalf", 750), ("threequarters", 750), ("Eth", 722), ("multiply", 564), ("Thorn", 556),
    ("eth", 500), ("divide", 564), ("thorn", 500), ("trademark", 980), ("minus", 564),
    ("partialdiff", 476), ("Delta", 612), ("summation", 600), ("radical", 453),
    ("notequal", 549), ("lessequal", 549), ("greaterequal", 549), ("lozenge", 471),
];

#[rustfmt::skip]
const TIMES_BOLD: &[(&str, u16)] = &[
    ("space", 250), ("exclam", 333), ("quotedbl", 555), ("numbersign", 500), ("dollar", 500),
    ("percent", 1000), ("ampersand", 833), ("quoteright", 333), ("parenleft", 333),
    ("parenright", 333), ("asterisk", 500), ("plus", 570), ("comma", 250), ("hyphen", 333),
    ("period", 250), ("slash", 278), ("zero", 500), ("one", 500), ("two", 500), ("three", 500),
    ("four", 500), ("five", 500), ("six", 500), ("seven", 500), ("eight", 500), ("nine", 500),
    ("colon", 333), ("semicolon", 333), ("less", 570), ("equal", 570), ("greater", 570),
    ("question", 500), ("at", 930), ("A", 722), ("B", 667), ("C", 722), ("D", 722), ("E", 667),
    ("F", 611), ("G", 778), ("H", 778), ("I", 389), ("J", 500), ("K", 778), ("L", 667), ("M", 944),
    ("N", 722), ("O", 778), ("P", 611), ("Q", 778), ("R", 722), ("S", 556), ("T", 667), ("U", 722),
    ("V", 722), ("W", 1000), ("X", 722), ("Y", 722), ("Z", 667), ("bracketleft", 333),
    ("backslash", 278), ("bracketright", 333), ("asciicircum", 581), ("underscore", 500),
    ("quoteleft", 333), ("a", 500), ("b", 556), ("c", 444), ("d", 556), ("e", 444), ("f", 333),
    ("g", 500), ("h", 556), ("i", 278), ("j", 333), ("k", 556), ("l", 278), ("m", 833), ("n", 556),
    ("o", 500), ("p", 556), ("q", 556), ("r", 444), ("s", 389), ("t", 333), ("u", 556), ("v", 500),
    ("w", 722), ("x", 500), ("y", 500), ("z", 444), ("braceleft", 394), ("bar", 220),
    ("braceright", 394), ("asciitilde", 520), ("exclamdown", 333), ("cent", 500),
    ("sterling", 500), ("fraction", 167), ("yen", 500), ("florin", 500), ("section", 500),
    ("currency", 500), ("quotesingle", 278), ("quotedblleft", 500), ("guillemotleft", 500),
    ("guilsinglleft", 333), ("guilsinglright", 333), ("fi", 556), ("fl", 556), ("endash", 500),
    ("dagger", 500), ("daggerdbl", 500), ("periodcentered", 250), ("paragraph", 540),
    ("bullet", 350), ("quotesinglbase", 333), ("quotedblbase", 500), ("quotedblright", 500),
    ("guillemotright", 500), ("ellipsis", 1000), ("perthousand", 1000), ("questiondown", 500),
    ("grave", 333), ("acute", 333), ("circumflex", 333), ("tilde", 333), ("macron", 333),
    ("breve", 333), ("dotaccent", 333), ("dieresis", 333), ("ring", 333), ("cedilla", 333),
    ("hungarumlaut", 333), ("ogonek", 333), ("caron", 333), ("emdash", 1000), ("AE", 1000),
    ("ordfeminine", 300), ("Lslash", 667), ("Oslash", 778), ("OE", 1000), ("ordmasculine", 330),
    ("ae", 722), ("dotlessi", 278), ("lslash", 278), ("oslash", 500), ("oe", 722),
    ("germandbls", 556), ("brokenbar", 220), ("copyright", 747), ("logicalnot", 570),
    ("registered", 747), ("degree", 400), ("plusminus", 570), ("twosuperior", 300),
    ("threesuperior", 300), ("mu", 556), ("onesuperior", 300), ("onequarter", 750),
    ("onehalf", 750), ("threequarters", 750), ("Eth", 722), ("multiply", 570), ("Thorn", 611),
    ("eth", 500), ("divide", 570), ("thorn", 556), ("trademark", 1000), ("minus", 570),
    ("partialdiff", 494), ("Delta", 612), ("summation", 600), ("radical", 549),
    ("notequal", 549), ("lessequal", 549), ("greaterequal", 549), ("lozenge", 494),
];

#[rustfmt::skip]
const TIMES_ITALIC: &[(&str, u16)] = &[
    ("space", 250), ("exclam", 333), ("quotedbl", 420), ("numbersign", 500), ("dollar", 500),
    ("percent", 833), ("ampersand", 778), ("quoteright", 333), ("parenleft", 333),
    ("parenright", 333), ("asterisk", 500), ("plus", 675), ("comma", 250), ("hyphen", 333),
    ("period", 250), ("slash", 278), ("zero", 500), ("one", 500), ("two", 500), ("three", 500),
    ("four", 500), ("five", 500), ("six", 500), ("seven", 500), ("eight", 500), ("nine", 500),
    ("colon", 333), ("semicolon", 333), ("less", 675), ("equal", 675), ("greater", 675),
    ("question", 500), ("at", 920), ("A", 611), ("B", 611), ("C", 667), ("D", 722), ("E", 611),
    ("F", 611), ("G", 722), ("H", 722), ("I", 333), ("J", 444), ("K", 667), ("L", 556), ("M", 833),
    ("N", 667), ("O", 722), ("P", 611), ("Q", 722), ("R", 611), ("S", 500), ("T", 556), ("U", 722),
    ("V", 611), ("W", 833), ("X", 611), ("Y", 556), ("Z", 556), ("bracketleft", 389),
    ("backslash", 278), ("bracketright", 389), ("asciicircum", 422), ("underscore", 500),
    ("quoteleft", 333), ("a", 500), ("b", 500), ("c", 444), ("d", 500), ("e", 444), ("f", 278),
    ("g", 500), ("h", 500), ("i", 278), ("j", 278), ("k", 444), ("l", 278), ("m", 722), ("n", 500),
    ("o", 500), ("p", 500), ("q", 500), ("r", 389), ("s", 389), ("t", 278), ("u", 500), ("v", 444),
    ("w", 667), ("x", 444), ("y", 444), ("z", 389), ("braceleft", 400), ("bar", 275),
    ("braceright", 400), ("asciitilde", 541), ("exclamdown", 389), ("cent", 500),
    ("sterling", 500), ("fraction", 167), ("yen", 500), ("florin", 500), ("section", 500),
    ("currency", 500), ("quotesingle", 214), ("quotedblleft", 556), ("guillemotleft", 500),
    ("guilsinglleft", 333), ("guilsinglright", 333), ("fi", 500), ("fl", 500), ("endash", 500),
    ("dagger", 500), ("daggerdbl", 500), ("periodcentered", 250), ("paragraph", 523),
    ("bullet", 350), ("quotesinglbase", 333), ("quotedblbase", 556), ("quotedblright", 556),
    ("guillemotright", 500), ("ellipsis", 889), ("perthousand", 1000), ("questiondown", 500),
    ("grave", 333), ("acute", 333), ("circumflex", 333), ("tilde", 333), ("macron", 333),
    ("breve", 333), ("dotaccent", 333), ("dieresis", 333), ("ring", 333), ("cedilla", 333),
    ("hungarumlaut", 333), ("ogonek", 333), ("caron", 333), ("emdash", 889), ("AE", 889),
    ("ordfeminine", 276), ("Lslash", 556), ("Oslash", 722), ("OE", 944), ("ordmasculine", 310),
    ("ae", 667), ("dotlessi", 278), ("lslash", 278), ("oslash", 500), ("oe", 667),
    ("germandbls", 500), ("brokenbar", 275), ("copyright", 760), ("logicalnot", 675),
    ("registered", 760), ("degree", 400), ("plusminus", 675), ("twosuperior", 300),
    ("threesuperior", 300), ("mu", 500), ("onesuperior", 300), ("onequarter", 750),
    ("onehalf", 750), ("threequarters", 750), ("Eth", 722), ("multiply", 675), ("Thorn", 611),
    ("eth", 500), ("divide", 675), ("thorn", 500), ("trademark", 980), ("minus", 675),
    ("partialdiff", 476), ("Delta", 612), ("summation", 600), ("radical", 453),
    ("notequal", 549), ("lessequal", 549), ("greaterequal", 549), ("lozenge", 471),
];

#[rustfmt::skip]
const TIMES_BOLD_ITALIC: &[(&str, u16)] = &[
    ("space", 250), ("exclam", 389), ("quotedbl", 555), ("numbersign", 500), ("dollar", 500),
    ("percent", 833), ("ampersand", 778), ("quoteright", 333), ("parenleft", 333),
    ("parenright", 333), ("asterisk", 500), ("plus", 570), ("comma", 250), ("hyphen", 333),
    ("period", 250), ("slash", 278), ("zero", 500), ("one", 500), ("two", 500), ("three", 500),
    ("four", 500), ("five", 500), ("six", 500), ("seven", 500), ("eight", 500), ("nine", 500),
    ("colon", 333), ("semicolon", 333), ("less", 570), ("equal", 570), ("greater", 570),
    ("question", 500), ("at", 832), ("A", 667), ("B", 667), ("C", 667), ("D", 722), ("E", 667),
    ("F", 667), ("G", 722), ("H", 778), ("I", 389), ("J", 500), ("K", 667), ("L", 611), ("M", 889),
    ("N", 722), ("O", 722), ("P", 611), ("Q", 722), ("R", 667), ("S", 556), ("T", 611), ("U", 722),
    ("V", 667), ("W", 889), ("X", 667), ("Y", 611), ("Z", 611), ("bracketleft", 333),
    ("backslash", 278), ("bracketright", 333), ("asciicircum", 570), ("underscore", 500),
    ("quoteleft", 333), ("a", 500), ("b", 500), ("c", 444), ("d", 500), ("e", 444), ("f", 333),
    ("g", 500), ("h", 556), ("i", 278), ("j", 278), ("k", 500), ("l", 278), ("m", 778), ("n", 556),
    ("o", 500), ("p", 500), ("q", 500), ("r", 389), ("s", 389), ("t", 278), ("u", 556), ("v", 444),
    ("w", 667), ("x", 500), ("y", 444), ("z", 389), ("braceleft", 348), ("bar", 220),
    ("braceright", 348), ("asciitilde", 570), ("exclamdown", 389), ("cent", 500),
    ("sterling", 500), ("fraction", 167), ("yen", 500), ("florin", 500), ("section", 500),
    ("currency", 500), ("quotesingle", 278), ("quotedblleft", 500), ("guillemotleft", 500),
    ("guilsinglleft", 333), ("guilsinglright", 333), ("fi", 556), ("fl", 556), ("endash", 500),
    ("dagger", 500), ("daggerdbl", 500), ("periodcentered", 250), ("paragraph", 500),
    ("bullet", 350), ("quotesinglbase", 333), ("quotedblbase", 500), ("quotedblright", 500),
    ("guillemotright", 500), ("ellipsis", 1000), ("perthousand", 1000), ("questiondown", 500),
    ("grave", 333), ("acute", 333), ("circumflex", 333), ("tilde", 333), ("macron", 333),
    ("breve", 333), ("dotaccent", 333), ("dieresis", 333), ("ring", 333), ("cedilla", 333),
    ("hungarumlaut", 333), ("ogonek", 333), ("caron", 333), ("emdash", 1000), ("AE", 944),
    ("ordfeminine", 266), ("Lslash", 611), ("Oslash", 722), ("OE", 944), ("ordmasculine", 300),
    ("ae", 722), ("dotlessi", 278), ("lslash", 278), ("oslash", 500), ("oe", 722),
    ("germandbls", 500), ("brokenbar", 220), ("copyright", 747), ("logicalnot", 606),
    ("registered", 747), ("degree", 400), ("plusminus", 570), ("twosuperior", 300),
    ("threesuperior", 300), ("mu", 576), ("onesuperior", 300), ("onequarter", 750),
    ("onehalf", 750), ("threequarters", 750), ("Eth", 722), ("multiply", 570), ("Thorn", 611),
    ("eth", 500), ("divide", 570), ("thorn", 500), ("trademark", 1000), ("minus", 606),
    ("partialdiff", 494), ("Delta", 612), ("summation", 600), ("radical", 549),
    ("notequal", 549), ("lessequal", 549), ("greaterequal", 549), ("lozenge", 494),
];

#[rustfmt::skip]
const SYMBOL: &[(u8, u16)] = &[
    (32, 250), (33, 333), (34, 713), (35, 500), (36, 549), (37, 833), (38, 778), (39, 439),
    (40, 333), (41, 333), (42, 500), (43, 549), (44, 250), (45, 549), (46, 250), (47, 278),
    (48, 500), (49, 500), (50, 500), (51, 500), (52, 500), (53, 500), (54, 500), (55, 500),
    (56, 500), (57, 500), (58, 278), (59, 278), (60, 549), (61, 549), (62, 549), (63, 444),
    (64, 549), (65, 722), (66, 667), (67, 722), (68, 612), (69, 611), (70, 763), (71, 603),
    (72, 722), (73, 333), (74, 631), (75, 722), (76, 686), (77, 889), (78, 722), (79, 722),
    (80, 768), (81, 741), (82, 556), (83, 592), (84, 611), (85, 690), (86, 439), (87, 768),
    (88, 645), (89, 795), (90, 611), (91, 333), (92, 863), (93, 333), (94, 658), (95, 500),
    (96, 500), (97, 631), (98, 549), (99, 549), (100, 494), (101, 439), (102, 521), (103, 411),
    (104, 603), (105, 329), (106, 603), (107, 549), (108, 549), (109, 576), (110, 521), (111, 549),
    (112, 549), (113, 521), (114, 549), (115, 603), (116, 439), (117, 576), (118, 713), (119, 686),
    (120, 493), (121, 686), (122, 494), (123, 480), (124, 200), (125, 480), (126, 549),
    (160, 750), (161, 620), (162, 247), (163, 549), (164, 167), (165, 713), (166, 500), (167, 753),
    (168, 753), (169, 753), (170, 753), (171, 1042), (172, 987), (173, 603), (174, 987), (175, 603),
    (176, 400), (177, 549), (178, 411), (179, 549), (180, 549), (181, 713), (182, 494), (183, 460),
    (184, 549), (185, 549), (186, 549), (187, 549), (188, 1000), (189, 603), (190, 1000), (191, 658),
    (192, 823), (193, 686), (194, 795), (195, 987), (196, 768), (197, 768), (198, 823), (199, 768),
    (200, 768), (201, 713), (202, 713), (203, 713), (204, 713), (205, 713), (206, 713), (207, 713),
    (208, 768), (209, 713), (210, 790), (211, 790), (212, 890), (213, 823), (214, 549), (215, 250),
    (216, 713), (217, 603), (218, 603), (219, 1042), (220, 987), (221, 603), (222, 987), (223, 603),
    (224, 494), (225, 329), (226, 790), (227, 790), (228, 786), (229, 713), (230, 384), (231, 384),
    (232, 384), (233, 384), (234, 384), (235, 384), (236, 494), (237, 494), (238, 494), (239, 494),
    (241, 329), (242, 274), (243, 686), (244, 686), (245, 686), (246, 384), (247, 384), (248, 384),
    (249, 384), (250, 384), (251, 384), (252, 494), (253, 494), (254, 494),
];

#[rustfmt::skip]
const ZAPF_DINGBATS: &[(u8, u16)] = &[
    (32, 278), (33, 974), (34, 961), (35, 974), (36, 980), (37, 719), (38, 789), (39, 790),
    (40, 791), (41, 690), (42, 960), (43, 939), (44, 549), (45, 855), (46, 911), (47, 933),
    (48, 911), (49, 945), (50, 974), (51, 755), (52, 846), (53, 762), (54, 761), (55, 571),
    (56, 677), (57, 763), (58, 760), (59, 759), (60, 754), (61, 494), (62, 552), (63, 537),
    (64, 577), (65, 692), (66, 786), (67, 788), (68, 788), (69, 790), (70, 793), (71, 794),
    (72, 816), (73, 823), (74, 789), (75, 841), (76, 823), (77, 833), (78, 816), (79, 831),
    (80, 923), (81, 744), (82, 723), (83, 749), (84, 790), (85, 792), (86, 695), (87, 776),
    (88, 768), (89, 792), (90, 759), (91, 707), (92, 708), (93, 682), (94, 701), (95, 826),
    (96, 815), (97, 789), (98, 789), (99, 707), (100, 687), (101, 696), (102, 689), (103, 786),
    (104, 787), (105, 713), (106, 791), (107, 785), (108, 791), (109, 873), (110, 761), (111, 762),
    (112, 762), (113, 759), (114, 759), (115, 892), (116, 892), (117, 788), (118, 784), (119, 438),
    (120, 138), (121, 277), (122, 415), (123, 392), (124, 392), (125, 668), (126, 668),
    (128, 390), (129, 390), (130, 317), (131, 317), (132, 276), (133, 276), (134, 509), (135, 509),
    (136, 410), (137, 410), (138, 234), (139, 234), (140, 334), (141, 334),
    (161, 732), (162, 544), (163, 544), (164, 910), (165, 667), (166, 760), (167, 760), (168, 776),
    (169, 595), (170, 694), (171, 626), (172, 788), (173, 788), (174, 788), (175, 788), (176, 788),
    (177, 788), (178, 788), (179, 788), (180, 788), (181, 788), (182, 788), (183, 788), (184, 788),
    (185, 788), (186, 788), (187, 788), (188, 788), (189, 788), (190, 788), (191, 788), (192, 788),
    (193, 788), (194, 788), (195, 788), (196, 788), (197, 788), (198, 788), (199, 788), (200, 788),
    (201, 788), (202, 788), (203, 788), (204, 788), (205, 788), (206, 788), (207, 788), (208, 788),
    (209, 788), (210, 788), (211, 788), (212, 894), (213, 838), (214, 1016), (215, 458), (216, 748),
    (217, 924), (218, 748), (219, 918), (220, 927), (221, 928), (222, 928), (223, 834), (224, 873),
    (225, 828), (226, 924), (227, 924), (228, 917), (229, 930), (230, 931), (231, 463), (232, 883),
    (233, 836), (234, 836), (235, 867), (236, 867), (237, 696), (238, 696), (239, 874), (241, 874),
    (242, 760), (243, 946), (244, 771), (245, 865), (246, 771), (247, 888), (248, 967), (249, 888),
    (250, 831), (251, 873), (252, 927), (253, 970), (254, 918),
];

lazy_static::lazy_static! {
    static ref CORE_FONTS: HashMap<&'static str, CoreFont> = {
        let mut fonts = HashMap::new();

        let helvetica = CoreFont::glyphs(HELVETICA)
            .with_descriptor([-166, -225, 1000, 931], 718, 718, -207, 88);
        let helvetica_bold = CoreFont::glyphs(HELVETICA_BOLD)
            .with_descriptor([-170, -228, 1003, 962], 718, 718, -207, 140)
            .with_style(0.0, "Bold");
        let courier = CoreFont::fixed(600)
            .with_descriptor([-23, -250, 715, 805], 562, 629, -157, 51);

        fonts.insert("Times-Roman", CoreFont::glyphs(TIMES_ROMAN)
            .with_descriptor([-168, -218, 1000, 898], 662, 683, -217, 84));
        fonts.insert("Times-Bold", CoreFont::glyphs(TIMES_BOLD)
            .with_descriptor([-168, -218, 1000, 935], 676, 683, -217, 139)
            .with_style(0.0, "Bold"));
        fonts.insert("Times-Italic", CoreFont::glyphs(TIMES_ITALIC)
            .with_descriptor([-169, -217, 1010, 883], 653, 683, -217, 76)
            .with_style(-15.5, "Medium"));
        fonts.insert("Times-BoldItalic", CoreFont::glyphs(TIMES_BOLD_ITALIC)
            .with_descriptor([-200, -218, 996, 921], 669, 683, -217, 121)
            .with_style(-15.0, "Bold"));

        // obliques share their upright widths
        fonts.insert("Helvetica-Oblique", helvetica.styled([-170, -225, 1116, 931], -12.0, "Medium", 88));
        fonts.insert("Helvetica-BoldOblique", helvetica_bold.styled([-174, -228, 1114, 962], -12.0, "Bold", 140));
        fonts.insert("Courier-Bold", courier.styled([-113, -250, 749, 801], 0.0, "Bold", 106));
        fonts.insert("Courier-Oblique", courier.styled([-27, -250, 849, 805], -12.0, "Medium", 51));
        fonts.insert("Courier-BoldOblique", courier.styled([-57, -250, 869, 801], -12.0, "Bold", 106));
        fonts.insert("Helvetica", helvetica);
        fonts.insert("Helvetica-Bold", helvetica_bold);
        fonts.insert("Courier", courier);

        fonts.insert("Symbol", CoreFont::codes(SYMBOL)
            .with_descriptor([-180, -293, 1090, 1010], 0, 0, 0, 85));
        fonts.insert("ZapfDingbats", CoreFont::codes(ZAPF_DINGBATS)
            .with_descriptor([-1, -143, 981, 820], 0, 0, 0, 90));

        fonts
    };
}

/// Provider backed by the compiled-in table.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreMetrics;

impl MetricsProvider for CoreMetrics {
    fn resolve(&self, font_name: &str, encoding: Encoding) -> Result<Option<Resolved>> {
        let font = match CORE_FONTS.get(font_name) {
            Some(font) => font,
            None => return Ok(None),
        };

        if font.symbolic && encoding != Encoding::Builtin {
            return Ok(Some(Resolved {
                metrics: font.metrics(font_name, Encoding::Builtin),
                warning: Some(format!(
                    "Can't reencode Symbol font '{}' (using builtin)",
                    font_name
                )),
            }));
        }

        Ok(Some(Resolved {
            metrics: font.metrics(font_name, encoding),
            warning: None,
        }))
    }
}
