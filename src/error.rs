//! Error types for the vindaloo library.

use std::io;
use thiserror::Error;

/// Result type alias for vindaloo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while opening, navigating or drawing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be opened.
    #[error("Document is encrypted")]
    Encrypted,

    /// The PDF structure is corrupted or malformed.
    #[error("Corrupted PDF structure: {0}")]
    Corrupted(String),

    /// A required PDF object is missing.
    #[error("Missing required object: {0}")]
    MissingObject(String),

    /// An operation needed an opened document, but none is loaded.
    #[error("No document is loaded")]
    NoDocument,

    /// An operation needed a current page, but none is selected.
    #[error("No page is selected")]
    NoPage,

    /// Page index is out of range.
    #[error("Page index {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The draw scale is not a finite, positive number.
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f32),

    /// Error while rasterizing a page.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoDocument;
        assert_eq!(err.to_string(), "No document is loaded");

        let err = Error::PageOutOfRange(5, 3);
        assert_eq!(
            err.to_string(),
            "Page index 5 is out of range (document has 3 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
