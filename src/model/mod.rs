//! Value types describing an opened document.
//!
//! These are backend-independent: any [`PdfBackend`](crate::backend::PdfBackend)
//! implementation reports its pages and metadata through them.

mod metadata;
mod page;

pub use metadata::Metadata;
pub(crate) use metadata::parse_pdf_date;
pub use page::{Page, PageId};
