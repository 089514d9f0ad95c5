//! # vindaloo
//!
//! Document model for a PDF viewer.
//!
//! A [`Document`] opens a PDF through a [`PdfBackend`], keeps a cursor on the
//! current page, moves it forward and backward, and paints the current page
//! through the backend's [`PageRenderer`]. Every page change is announced to
//! subscribers as a [`PageChanged`] event.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vindaloo::{Document, Point};
//!
//! fn main() -> vindaloo::Result<()> {
//!     let mut doc = Document::open("manual.pdf")?;
//!     doc.subscribe(|event| println!("page changed on {:?}", event.sender));
//!
//!     while doc.next_page() {}
//!     println!("last page is {:?} points", doc.page_size()?);
//!
//!     let pixmap = doc.render_page(2.0)?;
//!     pixmap.save_png("last-page.png").map_err(|e| vindaloo::Error::Render(e.to_string()))?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod detect;
pub mod document;
pub mod error;
pub mod geometry;
pub mod model;
pub mod notify;
pub mod options;
pub mod render;

// Re-export commonly used types
pub use backend::{LopdfBackend, PdfBackend};
pub use detect::{detect_header, detect_header_from_path, is_pdf, is_pdf_bytes, PdfHeader};
pub use document::Document;
pub use error::{Error, Result};
pub use geometry::{PageRect, Point, Rotation, Size};
pub use model::{Metadata, Page, PageId};
pub use notify::{DocumentId, PageChanged, SubscriptionId};
pub use options::{OpenOptions, RenderOptions};
pub use render::{PageRenderer, VectorRenderer, MAX_PIXELS};

use std::path::Path;

/// Open a PDF file.
///
/// # Example
///
/// ```no_run
/// let doc = vindaloo::open("manual.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<Document> {
    Document::open(path)
}

/// Read the document information of a PDF file without keeping it open.
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    Document::open(path)?.metadata()
}
