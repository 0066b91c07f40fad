//! Streaming of Type 1 font programs in PFA form.
//!
//! A PFA file has three portions: cleartext PostScript up to and including
//! the `currentfile eexec` line, the encrypted part as hex lines, and a
//! trailer made of lines of zeros. The embedded `/FontFile` stream holds
//! the encrypted part as binary, so the hex lines are converted on the fly
//! while the byte count of each portion is tallied for `/Length1..3`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{PdfError, Result};
use crate::source::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Portion {
    Ascii,
    Encrypted,
    Zeros,
}

/// Byte counts of the three portions, as written to the stream before any
/// ASCII-hex encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortionLengths {
    pub ascii: u64,
    pub encrypted: u64,
    pub zeros: u64,
}

#[derive(Debug)]
pub struct Type1Source {
    path: PathBuf,
    reader: BufReader<File>,
    line: Vec<u8>,
    portion: Portion,
    lengths: PortionLengths,
}

fn is_zero_line(line: &[u8]) -> bool {
    let body = trim_eol(line);
    !body.is_empty() && body.iter().all(|&b| b == b'0') && body.len() < line.len()
}

fn trim_eol(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &line[..end]
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit.to_ascii_uppercase() {
        d @ b'0'..=b'9' => Some(d - b'0'),
        d @ b'A'..=b'F' => Some(d - b'A' + 10),
        _ => None,
    }
}

impl Type1Source {
    /// Open the font file. Failing here keeps a half-written font object
    /// out of the output.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            PdfError::Io(io::Error::new(
                e.kind(),
                format!("Couldn't open font file '{}'", path.display()),
            ))
        })?;
        Ok(Self {
            path,
            reader: BufReader::new(file),
            line: Vec::new(),
            portion: Portion::Ascii,
            lengths: PortionLengths::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lengths(&self) -> PortionLengths {
        self.lengths
    }

    /// Convert the hex line in place, returning the binary length.
    fn decode_hex_line(&mut self) -> Result<usize> {
        let digits: Vec<u8> = self
            .line
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();

        self.line.clear();
        for pair in digits.chunks(2) {
            let hi = pair[0];
            let lo = pair.get(1).copied().unwrap_or(b'\n');
            match (hex_value(hi), hex_value(lo)) {
                (Some(hi), Some(lo)) => self.line.push(hi << 4 | lo),
                _ => {
                    return Err(PdfError::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "Bogus Type 1 font ASCII data (0x{:02X}, 0x{:02X})",
                            hi, lo
                        ),
                    )))
                }
            }
        }
        Ok(self.line.len())
    }
}

impl DataSource for Type1Source {
    fn init(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.portion = Portion::Ascii;
        self.lengths = PortionLengths::default();
        Ok(())
    }

    fn fill(&mut self) -> Result<Option<&[u8]>> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }

        if is_zero_line(&self.line) {
            self.portion = Portion::Zeros;
        }

        match self.portion {
            Portion::Ascii => {
                self.lengths.ascii += self.line.len() as u64;
                if self.line.starts_with(b"currentfile eexec") {
                    self.portion = Portion::Encrypted;
                }
            }
            Portion::Encrypted => {
                let len = self.decode_hex_line()?;
                self.lengths.encrypted += len as u64;
            }
            Portion::Zeros => self.lengths.zeros += self.line.len() as u64,
        }

        Ok(Some(&self.line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) const SAMPLE_PFA: &str = "%!PS-AdobeFont-1.0: Sample 001.000
/FontName /Sample def
currentfile eexec
d9d66f633b846a98
9B4A
0000000000000000
0000000000000000
cleartomark
";

    fn drain(src: &mut Type1Source) -> Vec<u8> {
        let mut out = Vec::new();
        src.init().unwrap();
        while let Some(chunk) = src.fill().unwrap() {
            out.extend_from_slice(chunk);
        }
        src.terminate();
        out
    }

    fn sample_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_portions_and_lengths() {
        let file = sample_file(SAMPLE_PFA);
        let mut src = Type1Source::open(file.path()).unwrap();
        let out = drain(&mut src);

        let cleartext = "%!PS-AdobeFont-1.0: Sample 001.000\n/FontName /Sample def\ncurrentfile eexec\n";
        assert!(out.starts_with(cleartext.as_bytes()));
        assert_eq!(
            &out[cleartext.len()..cleartext.len() + 10],
            &[0xD9, 0xD6, 0x6F, 0x63, 0x3B, 0x84, 0x6A, 0x98, 0x9B, 0x4A]
        );

        let lengths = src.lengths();
        assert_eq!(lengths.ascii, cleartext.len() as u64);
        assert_eq!(lengths.encrypted, 10);
        assert_eq!(lengths.zeros, 17 + 17 + 12);
        assert_eq!(
            out.len() as u64,
            lengths.ascii + lengths.encrypted + lengths.zeros
        );
    }

    #[test]
    fn test_reinit_resets_lengths() {
        let file = sample_file(SAMPLE_PFA);
        let mut src = Type1Source::open(file.path()).unwrap();
        let first = drain(&mut src);
        let second = drain(&mut src);
        assert_eq!(first, second);
        assert_eq!(src.lengths().encrypted, 10);
    }

    #[test]
    fn test_bad_hex_is_io_error() {
        let file = sample_file("currentfile eexec\nzz11\n");
        let mut src = Type1Source::open(file.path()).unwrap();
        src.init().unwrap();
        assert!(src.fill().unwrap().is_some());
        let err = src.fill().unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Type1Source::open("/does/not/exist.pfa").unwrap_err();
        assert!(err.to_string().contains("Couldn't open font file"));
    }
}
