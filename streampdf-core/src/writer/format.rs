//! Number and string formatting for PDF output.

use std::fmt;

/// Values closer to zero than this are written as `0`.
pub const SMALL_REAL: f64 = 0.000015;

/// Largest magnitude that still keeps two decimal places.
pub const BIG_REAL: f64 = 32767.0;

/// Format a real number the way PDF consumers accept it.
///
/// Four significant digits are used when that can be expressed without
/// an exponent. Otherwise the precision drops to five, two or zero
/// decimal places depending on the magnitude.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() || value.abs() < SMALL_REAL {
        return "0".to_string();
    }

    if let Some(general) = general_four_digits(value) {
        return general;
    }

    let magnitude = value.abs();
    if magnitude < 1.0 {
        format!("{:.5}", value)
    } else if magnitude <= BIG_REAL {
        format!("{:.2}", value)
    } else {
        format!("{:.0}", value)
    }
}

/// `%.4g` without the exponential form; `None` when `%.4g` would need one.
fn general_four_digits(value: f64) -> Option<String> {
    let scientific = format!("{:.3e}", value);
    let exponent: i32 = scientific.rsplit('e').next()?.parse().ok()?;

    if !(-4..4).contains(&exponent) {
        return None;
    }

    let decimals = (3 - exponent) as usize;
    let mut fixed = format!("{:.*}", decimals, value);
    if fixed.contains('.') {
        while fixed.ends_with('0') {
            fixed.pop();
        }
        if fixed.ends_with('.') {
            fixed.pop();
        }
    }
    if fixed == "-0" {
        fixed = "0".to_string();
    }
    Some(fixed)
}

/// Display adapter so reals can be used directly in `write!`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Real(pub f64);

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_real(self.0))
    }
}

/// Write `bytes` as a literal string: parentheses and backslashes are
/// escaped and tabs become four spaces.
pub fn quote_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &b in bytes {
        match b {
            b'\t' => out.extend_from_slice(b"    "),
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            _ => out.push(b),
        }
    }
    out.push(b')');
    out
}

/// Encode a string for use outside content streams (titles, info
/// entries, file names).
///
/// Text that fits in a single byte per character is written as Latin-1.
/// Anything else becomes UTF-16BE with a byte order mark.
pub fn text_string_bytes(text: &str) -> Vec<u8> {
    if text.chars().all(|c| (c as u32) <= 0xFF) {
        return text.chars().map(|c| c as u8).collect();
    }

    let mut out = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

/// `text_string_bytes` wrapped in a quoted literal.
pub fn quote_text(text: &str) -> Vec<u8> {
    quote_bytes(&text_string_bytes(text))
}
