//! Document-wide settings and the debug switches.
//!
//! Settings can be fixed up front through [`crate::DocumentBuilder`] or
//! changed while the document is open with
//! [`crate::Document::set_parameter`].

use std::env;
use std::path::PathBuf;

use bitflags::bitflags;

/// Environment variable that overrides the configured resource file.
pub const RESOURCE_FILE_ENV: &str = "STREAMPDF_RESOURCEFILE";

/// Resource file looked up when nothing else is configured.
pub const DEFAULT_RESOURCE_FILE: &str = "streampdf.upr";

bitflags! {
    /// Debug switches, each one named by a single character.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugFlags: u32 {
        /// `a`: hex-encode binary streams so the output stays readable.
        const ASCII_HEX = 1 << 0;
        /// `c`: write streams uncompressed.
        const NO_COMPRESSION = 1 << 1;
        /// `e`: report non-fatal warnings.
        const WARNINGS = 1 << 2;
        /// `u`: keep the partial output file after a fatal error.
        const KEEP_OUTPUT = 1 << 3;
    }
}

impl Default for DebugFlags {
    fn default() -> Self {
        DebugFlags::WARNINGS
    }
}

impl DebugFlags {
    /// Flag for a single switch character. Unknown characters map to no flag.
    pub fn from_char(c: char) -> DebugFlags {
        match c {
            'a' => DebugFlags::ASCII_HEX,
            'c' => DebugFlags::NO_COMPRESSION,
            'e' => DebugFlags::WARNINGS,
            'u' => DebugFlags::KEEP_OUTPUT,
            _ => DebugFlags::empty(),
        }
    }

    /// Union of all flags named in `spec`.
    pub fn parse(spec: &str) -> DebugFlags {
        spec.chars()
            .fold(DebugFlags::empty(), |acc, c| acc | DebugFlags::from_char(c))
    }
}

/// Settings that apply to a whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub compress: bool,
    pub debug: DebugFlags,
    pub resource_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compress: cfg!(feature = "compression"),
            debug: DebugFlags::default(),
            resource_file: None,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn on the switches named by `spec`. A leading `c` also turns
    /// compression off.
    pub fn enable_debug(&mut self, spec: &str) {
        self.debug |= DebugFlags::parse(spec);
        if spec.starts_with('c') {
            self.compress = false;
        }
    }

    /// Turn off the switches named by `spec`. A leading `c` turns
    /// compression back on when it is compiled in.
    pub fn disable_debug(&mut self, spec: &str) {
        self.debug &= !DebugFlags::parse(spec);
        if spec.starts_with('c') && cfg!(feature = "compression") {
            self.compress = true;
        }
    }

    /// Whether stream data should be deflated.
    pub fn compressing(&self) -> bool {
        self.compress && cfg!(feature = "compression")
    }

    pub fn ascii_hex(&self) -> bool {
        self.debug.contains(DebugFlags::ASCII_HEX)
    }

    /// The resource file to consult: the environment wins over the
    /// configured path, which wins over the built-in default.
    pub fn resolve_resource_file(&self) -> PathBuf {
        if let Some(path) = env::var_os(RESOURCE_FILE_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        self.resource_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_FILE))
    }
}
