//! Resource index for external font files.
//!
//! Maps a category (`FontAFM`, `FontOutline`, ...) and a logical resource
//! name to a file path. Entries are registered one by one or read from a
//! UPR-style configuration file. The file is parsed lazily on the first
//! lookup that the registered entries cannot answer, and at most once.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PdfError, Result};

/// The resource categories that can be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    FontAfm,
    FontPfm,
    FontOutline,
    FontTrueType,
}

impl ResourceCategory {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FontAFM" => Some(ResourceCategory::FontAfm),
            "FontPFM" => Some(ResourceCategory::FontPfm),
            "FontOutline" => Some(ResourceCategory::FontOutline),
            "FontTT" => Some(ResourceCategory::FontTrueType),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceCategory::FontAfm => "FontAFM",
            ResourceCategory::FontPfm => "FontPFM",
            ResourceCategory::FontOutline => "FontOutline",
            ResourceCategory::FontTrueType => "FontTT",
        }
    }
}

#[derive(Debug, Clone)]
struct Category {
    category: ResourceCategory,
    entries: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct ResourceIndex {
    categories: Vec<Category>,
    file_loaded: bool,
}

impl ResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_file_loaded(&self) -> bool {
        self.file_loaded
    }

    /// Register a single resource. `prefix` is a directory to join in
    /// front of `filename`, given with its leading `/` as it appears in a
    /// configuration file.
    pub fn add(
        &mut self,
        category: &str,
        name: &str,
        filename: &str,
        prefix: Option<&str>,
    ) -> Result<()> {
        let category = ResourceCategory::from_name(category)
            .ok_or_else(|| PdfError::value("Unknown resource category"))?;

        let path = match prefix {
            None => strip_dot_slash(filename).to_string(),
            Some(prefix) => {
                let prefix = strip_dot_slash(prefix.strip_prefix('/').unwrap_or(prefix));
                if prefix.is_empty() {
                    filename.to_string()
                } else {
                    format!("{}/{}", prefix, filename)
                }
            }
        };

        let index = match self
            .categories
            .iter()
            .position(|c| c.category == category)
        {
            Some(index) => index,
            None => {
                self.categories.push(Category {
                    category,
                    entries: Vec::new(),
                });
                self.categories.len() - 1
            }
        };
        self.categories[index]
            .entries
            .push((name.to_string(), path));
        Ok(())
    }

    /// Register from a `name=file` line, as accepted by
    /// `Document::set_parameter`.
    pub fn add_line(&mut self, category: &str, line: &str) -> Result<()> {
        let (name, file) = line
            .split_once('=')
            .ok_or_else(|| PdfError::value("Bogus resource line"))?;
        self.add(category, name, file, None)
    }

    fn lookup(&self, category: ResourceCategory, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .filter(|c| c.category == category)
            .flat_map(|c| c.entries.iter())
            .find(|(n, _)| n == name)
            .map(|(_, file)| file.as_str())
    }

    /// Find the file registered for `name`. Registered entries are tried
    /// first; the configuration file at `upr_file` is loaded once when
    /// they don't answer.
    pub fn find(
        &mut self,
        category: ResourceCategory,
        name: &str,
        upr_file: &Path,
    ) -> Result<Option<PathBuf>> {
        if let Some(file) = self.lookup(category, name) {
            return Ok(Some(PathBuf::from(file)));
        }
        if self.file_loaded {
            return Ok(None);
        }

        self.load_file(upr_file)?;
        Ok(self.lookup(category, name).map(PathBuf::from))
    }

    /// Parse the configuration file. Subsequent calls are no-ops.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        if self.file_loaded {
            return Ok(());
        }
        self.file_loaded = true;

        let content = fs::read(path).map_err(|e| {
            PdfError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Resource configuration file '{}' not found",
                    path.display()
                ),
            ))
        })?;
        let content = String::from_utf8_lossy(&content);
        self.parse_upr(&content)
    }

    /// Parse UPR text: a list of categories terminated by a `.` line,
    /// followed by one block per category.
    pub fn parse_upr(&mut self, content: &str) -> Result<()> {
        let mut raw = content.lines();

        // skip the category list
        if !raw.by_ref().any(|line| line.starts_with('.')) {
            return Ok(());
        }

        let mut lines = WholeLines { raw };
        let mut prefix: Option<String> = None;

        while let Some(line) = lines.next() {
            if line.starts_with('/') {
                prefix = Some(line);
                continue;
            }

            let category = line;
            loop {
                let line = match lines.next() {
                    Some(line) => line,
                    None => return Ok(()),
                };
                if line.starts_with('.') {
                    break;
                }
                if let Some((name, file)) = split_entry(&line) {
                    match file.strip_prefix('=') {
                        Some(absolute) => self.add(&category, name, absolute, None)?,
                        None => self.add(&category, name, file, prefix.as_deref())?,
                    }
                }
            }
        }
        Ok(())
    }
}

fn strip_dot_slash(s: &str) -> &str {
    s.strip_prefix("./").unwrap_or(s)
}

/// Split at the first `=` that is not escaped and not the first character.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let bytes = line.as_bytes();
    (1..bytes.len())
        .find(|&i| bytes[i] == b'=' && bytes[i - 1] != b'\\')
        .map(|i| (&line[..i], &line[i + 1..]))
}

/// Remove a `%` comment (unless escaped as `\%`) and trailing whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let end = (0..bytes.len())
        .find(|&i| bytes[i] == b'%' && (i == 0 || bytes[i - 1] != b'\\'))
        .unwrap_or(bytes.len());
    line[..end].trim_end_matches([' ', '\t', '\n', '\r'])
}

/// Iterator over logical lines: comments and blank lines dropped, lines
/// ending in `\` joined with their successor.
struct WholeLines<I> {
    raw: I,
}

impl<'a, I: Iterator<Item = &'a str>> Iterator for WholeLines<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut line = loop {
            let stripped = strip_comment(self.raw.next()?);
            if !stripped.is_empty() {
                break stripped.to_string();
            }
        };

        while line.ends_with('\\') {
            line.pop();
            match self.raw.next().map(strip_comment) {
                Some(next) if !next.is_empty() => line.push_str(next),
                _ => break,
            }
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const UPR: &str = "PS-Resources-1.0
FontAFM
FontOutline
.
//usr/share/fonts
FontAFM
Foo=foo.afm
Bar==/opt/bar.afm   % absolute path
.
FontOutline
Foo=foo\\
.pfa
.
";

    #[test]
    fn test_parse_upr_prefix_and_absolute() {
        let mut index = ResourceIndex::new();
        index.parse_upr(UPR).unwrap();

        assert_eq!(
            index.lookup(ResourceCategory::FontAfm, "Foo"),
            Some("/usr/share/fonts/foo.afm")
        );
        assert_eq!(
            index.lookup(ResourceCategory::FontAfm, "Bar"),
            Some("/opt/bar.afm")
        );
        assert_eq!(
            index.lookup(ResourceCategory::FontOutline, "Foo"),
            Some("/usr/share/fonts/foo.pfa")
        );
    }

    #[test]
    fn test_add_line_requires_equals() {
        let mut index = ResourceIndex::new();
        assert!(index.add_line("FontAFM", "nofile").is_err());
        index.add_line("FontAFM", "Baz=./fonts/baz.afm").unwrap();
        assert_eq!(
            index.lookup(ResourceCategory::FontAfm, "Baz"),
            Some("fonts/baz.afm")
        );
    }

    #[test]
    fn test_unknown_category_is_value_error() {
        let mut index = ResourceIndex::new();
        let err = index.add("Encoding", "x", "y", None).unwrap_err();
        assert!(matches!(err, PdfError::InvalidValue(_)));
    }

    #[test]
    fn test_strip_comment_escaped_percent() {
        assert_eq!(strip_comment("a=b\\%c % real comment  "), "a=b\\%c");
        assert_eq!(strip_comment("   % only comment"), "");
    }

    #[test]
    fn test_find_loads_file_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(UPR.as_bytes()).unwrap();

        let mut index = ResourceIndex::new();
        index.add("FontAFM", "Local", "local.afm", None).unwrap();

        // registered entries answer without touching the file
        let found = index
            .find(ResourceCategory::FontAfm, "Local", file.path())
            .unwrap();
        assert_eq!(found, Some(PathBuf::from("local.afm")));
        assert!(!index.is_file_loaded());

        let found = index
            .find(ResourceCategory::FontAfm, "Foo", file.path())
            .unwrap();
        assert_eq!(found, Some(PathBuf::from("/usr/share/fonts/foo.afm")));
        assert!(index.is_file_loaded());

        let missing = index
            .find(ResourceCategory::FontAfm, "Nope", Path::new("/does/not/exist"))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut index = ResourceIndex::new();
        let err = index
            .find(ResourceCategory::FontAfm, "Foo", Path::new("/does/not/exist.upr"))
            .unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }
}
