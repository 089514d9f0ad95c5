//! Sniffing of the `%PDF-x.y` header before a file is handed to the backend.
//!
//! Readers are expected to tolerate junk before the header, so the marker is
//! searched for within the first [`HEADER_SEARCH_LEN`] bytes rather than
//! only at offset zero.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header information found at the start of a PDF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` marker.
    pub offset: usize,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;

/// How far into the file the header marker may appear.
pub const HEADER_SEARCH_LEN: usize = 1024;

/// Read the header of the file at `path`.
///
/// # Example
/// ```no_run
/// use vindaloo::detect::detect_header_from_path;
///
/// let header = detect_header_from_path("manual.pdf").unwrap();
/// println!("PDF version: {}", header.version);
/// ```
pub fn detect_header_from_path<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let file = File::open(path)?;
    detect_header_from_reader(file)
}

/// Read the header from the first bytes produced by `reader`.
pub fn detect_header_from_reader<R: Read>(reader: R) -> Result<PdfHeader> {
    let mut head = Vec::with_capacity(HEADER_SEARCH_LEN);
    reader
        .take(HEADER_SEARCH_LEN as u64)
        .read_to_end(&mut head)?;
    detect_header(&head)
}

/// Locate and validate the header in an in-memory buffer.
pub fn detect_header(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_SEARCH_LEN)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let start = offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(start..start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).into_owned();

    if !is_valid_version(version_bytes) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version, offset })
}

fn is_valid_version(v: &[u8]) -> bool {
    matches!(v, [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit())
}

/// Check whether `data` looks like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_header(data).is_ok()
}

/// Check whether the file at `path` looks like a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_header_from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_at_start() {
        let header = detect_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.offset, 0);
    }

    #[test]
    fn test_header_after_junk() {
        let header = detect_header(b"\xef\xbb\xbfgarbage\n%PDF-2.0\n").unwrap();
        assert_eq!(header.version, "2.0");
        assert_eq!(header.offset, 11);
    }

    #[test]
    fn test_header_beyond_search_window() {
        let mut data = vec![b' '; HEADER_SEARCH_LEN];
        data.extend_from_slice(b"%PDF-1.4\n");
        assert!(matches!(detect_header(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_truncated_version() {
        assert!(matches!(detect_header(b"%PDF-1"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_bad_version() {
        assert!(matches!(
            detect_header(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(v)) if v == "x.y"
        ));
    }

    #[test]
    fn test_reader() {
        let header = detect_header_from_reader(&b"%PDF-1.5\n1 0 obj"[..]).unwrap();
        assert_eq!(header.to_string(), "PDF 1.5");
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"<!DOCTYPE html>"));
    }
}
