//! Single-byte font encodings.
//!
//! Every encoding maps a byte code to a Unicode character, and from there
//! to an Adobe glyph name. Glyph names are what AFM metrics are keyed by.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PdfError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// The font's own encoding; codes are used as-is.
    Builtin,
    PdfDoc,
    MacRoman,
    MacExpert,
    WinAnsi,
}

impl FromStr for Encoding {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "builtin" => Ok(Encoding::Builtin),
            "pdfdoc" => Ok(Encoding::PdfDoc),
            "macroman" => Ok(Encoding::MacRoman),
            "macexpert" => Ok(Encoding::MacExpert),
            "winansi" | "default" => Ok(Encoding::WinAnsi),
            other => Err(PdfError::value(format!("Bogus encoding '{}'", other))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Builtin => "builtin",
            Encoding::PdfDoc => "pdfdoc",
            Encoding::MacRoman => "macroman",
            Encoding::MacExpert => "macexpert",
            Encoding::WinAnsi => "winansi",
        })
    }
}

impl Encoding {
    /// Name used for the `/Encoding` entry, `None` for the builtin encoding.
    pub fn pdf_name(&self) -> Option<&'static str> {
        match self {
            Encoding::Builtin => None,
            Encoding::PdfDoc => Some("PDFDocEncoding"),
            Encoding::MacRoman => Some("MacRomanEncoding"),
            Encoding::MacExpert => Some("MacExpertEncoding"),
            Encoding::WinAnsi => Some("WinAnsiEncoding"),
        }
    }

    /// Whether a glyph-name vector exists for this encoding. Fonts in
    /// other encodings take their widths by code.
    pub fn has_vector(&self) -> bool {
        matches!(
            self,
            Encoding::PdfDoc | Encoding::MacRoman | Encoding::WinAnsi
        )
    }

    /// Character encoded by `code`, if any.
    pub fn to_unicode(&self, code: u8) -> Option<char> {
        match self {
            Encoding::Builtin | Encoding::MacExpert => latin1(code),
            Encoding::WinAnsi => vector_lookup(code, &WIN_ANSI_HIGH, false),
            Encoding::MacRoman => vector_lookup(code, &MAC_ROMAN_HIGH, false),
            Encoding::PdfDoc => vector_lookup(code, &PDF_DOC_HIGH, true),
        }
    }

    /// Glyph name for `code`, or `None` for an unencoded code.
    pub fn glyph_name(&self, code: u8) -> Option<&'static str> {
        self.to_unicode(code).and_then(glyph_name)
    }

    /// Encode text for a content stream. Control characters pass through;
    /// other characters the encoding cannot represent become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let reverse = match self {
            Encoding::WinAnsi => Some(&*WIN_ANSI_REVERSE),
            Encoding::MacRoman => Some(&*MAC_ROMAN_REVERSE),
            Encoding::PdfDoc => Some(&*PDF_DOC_REVERSE),
            Encoding::Builtin | Encoding::MacExpert => None,
        };

        text.chars()
            .map(|ch| match reverse {
                Some(map) => match map.get(&ch) {
                    Some(&code) => code,
                    None if ch < ' ' => ch as u8,
                    None => b'?',
                },
                None if (ch as u32) <= 0xFF => ch as u8,
                None => b'?',
            })
            .collect()
    }
}

fn latin1(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as char),
        _ => None,
    }
}

fn vector_lookup(code: u8, high: &[u16; 128], pdfdoc: bool) -> Option<char> {
    match code {
        0x18..=0x1F if pdfdoc => char::from_u32(PDF_DOC_ACCENTS[(code - 0x18) as usize] as u32),
        0x20..=0x7E => Some(code as char),
        0x80..=0xFF => match high[(code - 0x80) as usize] {
            0 => None,
            u => char::from_u32(u as u32),
        },
        _ => None,
    }
}

fn build_reverse(encoding: Encoding) -> HashMap<char, u8> {
    let mut map = HashMap::new();
    for code in 0..=255u8 {
        if let Some(ch) = encoding.to_unicode(code) {
            map.entry(ch).or_insert(code);
        }
    }
    map
}

lazy_static::lazy_static! {
    static ref WIN_ANSI_REVERSE: HashMap<char, u8> = build_reverse(Encoding::WinAnsi);
    static ref MAC_ROMAN_REVERSE: HashMap<char, u8> = build_reverse(Encoding::MacRoman);
    static ref PDF_DOC_REVERSE: HashMap<char, u8> = build_reverse(Encoding::PdfDoc);
    static ref GLYPH_NAMES: HashMap<char, &'static str> = GLYPHS.iter().copied().collect();
}

/// Adobe glyph name for a character.
pub fn glyph_name(ch: char) -> Option<&'static str> {
    GLYPH_NAMES.get(&ch).copied()
}

const PDF_DOC_ACCENTS: [u16; 8] = [
    0x02D8, 0x02C7, 0x02C6, 0x02D9, 0x02DD, 0x02DB, 0x02DA, 0x02DC,
];

#[rustfmt::skip]
const WIN_ANSI_HIGH: [u16; 128] = [
    // 0x80
    0x20AC, 0,      0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021,
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0,      0x017D, 0,
    // 0x90
    0,      0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0,      0x017E, 0x0178,
    // 0xA0
    0x00A0, 0x00A1, 0x00A2, 0x00A3, 0x00A4, 0x00A5, 0x00A6, 0x00A7,
    0x00A8, 0x00A9, 0x00AA, 0x00AB, 0x00AC, 0x00AD, 0x00AE, 0x00AF,
    0x00B0, 0x00B1, 0x00B2, 0x00B3, 0x00B4, 0x00B5, 0x00B6, 0x00B7,
    0x00B8, 0x00B9, 0x00BA, 0x00BB, 0x00BC, 0x00BD, 0x00BE, 0x00BF,
    0x00C0, 0x00C1, 0x00C2, 0x00C3, 0x00C4, 0x00C5, 0x00C6, 0x00C7,
    0x00C8, 0x00C9, 0x00CA, 0x00CB, 0x00CC, 0x00CD, 0x00CE, 0x00CF,
    0x00D0, 0x00D1, 0x00D2, 0x00D3, 0x00D4, 0x00D5, 0x00D6, 0x00D7,
    0x00D8, 0x00D9, 0x00DA, 0x00DB, 0x00DC, 0x00DD, 0x00DE, 0x00DF,
    0x00E0, 0x00E1, 0x00E2, 0x00E3, 0x00E4, 0x00E5, 0x00E6, 0x00E7,
    0x00E8, 0x00E9, 0x00EA, 0x00EB, 0x00EC, 0x00ED, 0x00EE, 0x00EF,
    0x00F0, 0x00F1, 0x00F2, 0x00F3, 0x00F4, 0x00F5, 0x00F6, 0x00F7,
    0x00F8, 0x00F9, 0x00FA, 0x00FB, 0x00FC, 0x00FD, 0x00FE, 0x00FF,
];

#[rustfmt::skip]
const MAC_ROMAN_HIGH: [u16; 128] = [
    // 0x80
    0x00C4, 0x00C5, 0x00C7, 0x00C9, 0x00D1, 0x00D6, 0x00DC, 0x00E1,
    0x00E0, 0x00E2, 0x00E4, 0x00E3, 0x00E5, 0x00E7, 0x00E9, 0x00E8,
    0x00EA, 0x00EB, 0x00ED, 0x00EC, 0x00EE, 0x00EF, 0x00F1, 0x00F3,
    0x00F2, 0x00F4, 0x00F6, 0x00F5, 0x00FA, 0x00F9, 0x00FB, 0x00FC,
    // 0xA0
    0x2020, 0x00B0, 0x00A2, 0x00A3, 0x00A7, 0x2022, 0x00B6, 0x00DF,
    0x00AE, 0x00A9, 0x2122, 0x00B4, 0x00A8, 0x2260, 0x00C6, 0x00D8,
    0x221E, 0x00B1, 0x2264, 0x2265, 0x00A5, 0x00B5, 0x2202, 0x2211,
    0x220F, 0x03C0, 0x222B, 0x00AA, 0x00BA, 0x03A9, 0x00E6, 0x00F8,
    // 0xC0
    0x00BF, 0x00A1, 0x00AC, 0x221A, 0x0192, 0x2248, 0x2206, 0x00AB,
    0x00BB, 0x2026, 0x00A0, 0x00C0, 0x00C3, 0x00D5, 0x0152, 0x0153,
    0x2013, 0x2014, 0x201C, 0x201D, 0x2018, 0x2019, 0x00F7, 0x25CA,
    0x00FF, 0x0178, 0x2044, 0x00A4, 0x2039, 0x203A, 0xFB01, 0xFB02,
    // 0xE0
    0x2021, 0x00B7, 0x201A, 0x201E, 0x2030, 0x00C2, 0x00CA, 0x00C1,
    0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF, 0x00CC, 0x00D3, 0x00D4,
    0,      0x00D2, 0x00DA, 0x00DB, 0x00D9, 0x0131, 0x02C6, 0x02DC,
    0x00AF, 0x02D8, 0x02D9, 0x02DA, 0x00B8, 0x02DD, 0x02DB, 0x02C7,
];

#[rustfmt::skip]
const PDF_DOC_HIGH: [u16; 128] = [
    // 0x80
    0x2022, 0x2020, 0x2021, 0x2026, 0x2014, 0x2013, 0x0192, 0x2044,
    0x2039, 0x203A, 0x2212, 0x2030, 0x201E, 0x201C, 0x201D, 0x2018,
    0x2019, 0x201A, 0x2122, 0xFB01, 0xFB02, 0x0141, 0x0152, 0x0160,
    0x0178, 0x017D, 0x0131, 0x0142, 0x0153, 0x0161, 0x017E, 0,
    // 0xA0
    0x20AC, 0x00A1, 0x00A2, 0x00A3, 0x00A4, 0x00A5, 0x00A6, 0x00A7,
    0x00A8, 0x00A9, 0x00AA, 0x00AB, 0x00AC, 0,      0x00AE, 0x00AF,
    0x00B0, 0x00B1, 0x00B2, 0x00B3, 0x00B4, 0x00B5, 0x00B6, 0x00B7,
    0x00B8, 0x00B9, 0x00BA, 0x00BB, 0x00BC, 0x00BD, 0x00BE, 0x00BF,
    0x00C0, 0x00C1, 0x00C2, 0x00C3, 0x00C4, 0x00C5, 0x00C6, 0x00C7,
    0x00C8, 0x00C9, 0x00CA, 0x00CB, 0x00CC, 0x00CD, 0x00CE, 0x00CF,
    0x00D0, 0x00D1, 0x00D2, 0x00D3, 0x00D4, 0x00D5, 0x00D6, 0x00D7,
    0x00D8, 0x00D9, 0x00DA, 0x00DB, 0x00DC, 0x00DD, 0x00DE, 0x00DF,
    0x00E0, 0x00E1, 0x00E2, 0x00E3, 0x00E4, 0x00E5, 0x00E6, 0x00E7,
    0x00E8, 0x00E9, 0x00EA, 0x00EB, 0x00EC, 0x00ED, 0x00EE, 0x00EF,
    0x00F0, 0x00F1, 0x00F2, 0x00F3, 0x00F4, 0x00F5, 0x00F6, 0x00F7,
    0x00F8, 0x00F9, 0x00FA, 0x00FB, 0x00FC, 0x00FD, 0x00FE, 0x00FF,
];

#[rustfmt::skip]
const GLYPHS: &[(char, &str)] = &[
    (' ', "space"), ('!', "exclam"), ('"', "quotedbl"), ('#', "numbersign"),
    ('$', "dollar"), ('%', "percent"), ('&', "ampersand"), ('\'', "quotesingle"),
    ('(', "parenleft"), (')', "parenright"), ('*', "asterisk"), ('+', "plus"),
    (',', "comma"), ('-', "hyphen"), ('.', "period"), ('/', "slash"),
    ('0', "zero"), ('1', "one"), ('2', "two"), ('3', "three"), ('4', "four"),
    ('5', "five"), ('6', "six"), ('7', "seven"), ('8', "eight"), ('9', "nine"),
    (':', "colon"), (';', "semicolon"), ('<', "less"), ('=', "equal"),
    ('>', "greater"), ('?', "question"), ('@', "at"),
    ('A', "A"), ('B', "B"), ('C', "C"), ('D', "D"), ('E', "E"), ('F', "F"),
    ('G', "G"), ('H', "H"), ('I', "I"), ('J', "J"), ('K', "K"), ('L', "L"),
    ('M', "M"), ('N', "N"), ('O', "O"), ('P', "P"), ('Q', "Q"), ('R', "R"),
    ('S', "S"), ('T', "T"), ('U', "U"), ('V', "V"), ('W', "W"), ('X', "X"),
    ('Y', "Y"), ('Z', "Z"),
    ('[', "bracketleft"), ('\\', "backslash"), (']', "bracketright"),
    ('^', "asciicircum"), ('_', "underscore"), ('`', "grave"),
    ('a', "a"), ('b', "b"), ('c', "c"), ('d', "d"), ('e', "e"), ('f', "f"),
    ('g', "g"), ('h', "h"), ('i', "i"), ('j', "j"), ('k', "k"), ('l', "l"),
    ('m', "m"), ('n', "n"), ('o', "o"), ('p', "p"), ('q', "q"), ('r', "r"),
    ('s', "s"), ('t', "t"), ('u', "u"), ('v', "v"), ('w', "w"), ('x', "x"),
    ('y', "y"), ('z', "z"),
    ('{', "braceleft"), ('|', "bar"), ('}', "braceright"), ('~', "asciitilde"),
    ('\u{a0}', "space"), ('\u{a1}', "exclamdown"), ('\u{a2}', "cent"),
    ('\u{a3}', "sterling"), ('\u{a4}', "currency"), ('\u{a5}', "yen"),
    ('\u{a6}', "brokenbar"), ('\u{a7}', "section"), ('\u{a8}', "dieresis"),
    ('\u{a9}', "copyright"), ('\u{aa}', "ordfeminine"), ('\u{ab}', "guillemotleft"),
    ('\u{ac}', "logicalnot"), ('\u{ad}', "hyphen"), ('\u{ae}', "registered"),
    ('\u{af}', "macron"), ('\u{b0}', "degree"), ('\u{b1}', "plusminus"),
    ('\u{b2}', "twosuperior"), ('\u{b3}', "threesuperior"), ('\u{b4}', "acute"),
    ('\u{b5}', "mu"), ('\u{b6}', "paragraph"), ('\u{b7}', "periodcentered"),
    ('\u{b8}', "cedilla"), ('\u{b9}', "onesuperior"), ('\u{ba}', "ordmasculine"),
    ('\u{bb}', "guillemotright"), ('\u{bc}', "onequarter"), ('\u{bd}', "onehalf"),
    ('\u{be}', "threequarters"), ('\u{bf}', "questiondown"),
    ('\u{c0}', "Agrave"), ('\u{c1}', "Aacute"), ('\u{c2}', "Acircumflex"),
    ('\u{c3}', "Atilde"), ('\u{c4}', "Adieresis"), ('\u{c5}', "Aring"),
    ('\u{c6}', "AE"), ('\u{c7}', "Ccedilla"), ('\u{c8}', "Egrave"),
    ('\u{c9}', "Eacute"), ('\u{ca}', "Ecircumflex"), ('\u{cb}', "Edieresis"),
    ('\u{cc}', "Igrave"), ('\u{cd}', "Iacute"), ('\u{ce}', "Icircumflex"),
    ('\u{cf}', "Idieresis"), ('\u{d0}', "Eth"), ('\u{d1}', "Ntilde"),
    ('\u{d2}', "Ograve"), ('\u{d3}', "Oacute"), ('\u{d4}', "Ocircumflex"),
    ('\u{d5}', "Otilde"), ('\u{d6}', "Odieresis"), ('\u{d7}', "multiply"),
    ('\u{d8}', "Oslash"), ('\u{d9}', "Ugrave"), ('\u{da}', "Uacute"),
    ('\u{db}', "Ucircumflex"), ('\u{dc}', "Udieresis"), ('\u{dd}', "Yacute"),
    ('\u{de}', "Thorn"), ('\u{df}', "germandbls"),
    ('\u{e0}', "agrave"), ('\u{e1}', "aacute"), ('\u{e2}', "acircumflex"),
    ('\u{e3}', "atilde"), ('\u{e4}', "adieresis"), ('\u{e5}', "aring"),
    ('\u{e6}', "ae"), ('\u{e7}', "ccedilla"), ('\u{e8}', "egrave"),
    ('\u{e9}', "eacute"), ('\u{ea}', "ecircumflex"), ('\u{eb}', "edieresis"),
    ('\u{ec}', "igrave"), ('\u{ed}', "iacute"), ('\u{ee}', "icircumflex"),
    ('\u{ef}', "idieresis"), ('\u{f0}', "eth"), ('\u{f1}', "ntilde"),
    ('\u{f2}', "ograve"), ('\u{f3}', "oacute"), ('\u{f4}', "ocircumflex"),
    ('\u{f5}', "otilde"), ('\u{f6}', "odieresis"), ('\u{f7}', "divide"),
    ('\u{f8}', "oslash"), ('\u{f9}', "ugrave"), ('\u{fa}', "uacute"),
    ('\u{fb}', "ucircumflex"), ('\u{fc}', "udieresis"), ('\u{fd}', "yacute"),
    ('\u{fe}', "thorn"), ('\u{ff}', "ydieresis"),
    ('\u{131}', "dotlessi"), ('\u{141}', "Lslash"), ('\u{142}', "lslash"),
    ('\u{152}', "OE"), ('\u{153}', "oe"), ('\u{160}', "Scaron"),
    ('\u{161}', "scaron"), ('\u{178}', "Ydieresis"), ('\u{17d}', "Zcaron"),
    ('\u{17e}', "zcaron"), ('\u{192}', "florin"),
    ('\u{2c6}', "circumflex"), ('\u{2c7}', "caron"), ('\u{2d8}', "breve"),
    ('\u{2d9}', "dotaccent"), ('\u{2da}', "ring"), ('\u{2db}', "ogonek"),
    ('\u{2dc}', "tilde"), ('\u{2dd}', "hungarumlaut"),
    ('\u{3a9}', "Omega"), ('\u{3c0}', "pi"),
    ('\u{2013}', "endash"), ('\u{2014}', "emdash"), ('\u{2018}', "quoteleft"),
    ('\u{2019}', "quoteright"), ('\u{201a}', "quotesinglbase"),
    ('\u{201c}', "quotedblleft"), ('\u{201d}', "quotedblright"),
    ('\u{201e}', "quotedblbase"), ('\u{2020}', "dagger"), ('\u{2021}', "daggerdbl"),
    ('\u{2022}', "bullet"), ('\u{2026}', "ellipsis"), ('\u{2030}', "perthousand"),
    ('\u{2039}', "guilsinglleft"), ('\u{203a}', "guilsinglright"),
    ('\u{2044}', "fraction"), ('\u{20ac}', "Euro"), ('\u{2122}', "trademark"),
    ('\u{2202}', "partialdiff"), ('\u{2206}', "Delta"), ('\u{220f}', "product"),
    ('\u{2211}', "summation"), ('\u{2212}', "minus"), ('\u{221a}', "radical"),
    ('\u{221e}', "infinity"), ('\u{222b}', "integral"), ('\u{2248}', "approxequal"),
    ('\u{2260}', "notequal"), ('\u{2264}', "lessequal"), ('\u{2265}', "greaterequal"),
    ('\u{25ca}', "lozenge"), ('\u{fb01}', "fi"), ('\u{fb02}', "fl"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encoding_names() {
        assert_eq!("builtin".parse::<Encoding>().unwrap(), Encoding::Builtin);
        assert_eq!("winansi".parse::<Encoding>().unwrap(), Encoding::WinAnsi);
        // the alias is the same on every platform
        assert_eq!("default".parse::<Encoding>().unwrap(), Encoding::WinAnsi);
        assert!("latin9".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_pdf_names() {
        assert_eq!(Encoding::Builtin.pdf_name(), None);
        assert_eq!(Encoding::MacRoman.pdf_name(), Some("MacRomanEncoding"));
        assert_eq!(Encoding::PdfDoc.pdf_name(), Some("PDFDocEncoding"));
    }

    #[test]
    fn test_glyph_names_by_code() {
        assert_eq!(Encoding::WinAnsi.glyph_name(b'A'), Some("A"));
        assert_eq!(Encoding::WinAnsi.glyph_name(0x80), Some("Euro"));
        assert_eq!(Encoding::WinAnsi.glyph_name(0x81), None);
        assert_eq!(Encoding::MacRoman.glyph_name(0x80), Some("Adieresis"));
        assert_eq!(Encoding::PdfDoc.glyph_name(0x18), Some("breve"));
        assert_eq!(Encoding::PdfDoc.glyph_name(0xA0), Some("Euro"));
        assert_eq!(Encoding::WinAnsi.glyph_name(0x05), None);
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(Encoding::WinAnsi.encode("A\u{20ac}"), vec![b'A', 0x80]);
        assert_eq!(Encoding::MacRoman.encode("\u{c4}"), vec![0x80]);
        assert_eq!(Encoding::WinAnsi.encode("\u{3b1}"), vec![b'?']);
        assert_eq!(Encoding::Builtin.encode("\u{e9}"), vec![0xE9]);
    }

    #[test]
    fn test_reverse_prefers_lowest_code() {
        // U+00A0 maps back to 0xA0 in WinAnsi, not to the space glyph
        assert_eq!(Encoding::WinAnsi.encode("\u{a0}"), vec![0xA0]);
        assert_eq!(Encoding::WinAnsi.encode(" "), vec![0x20]);
        assert_eq!(Encoding::WinAnsi.encode("a\tb"), vec![b'a', b'\t', b'b']);
    }
}
