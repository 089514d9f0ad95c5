//! PDF backend abstraction layer.
//!
//! The [`Document`](crate::Document) facade never touches a concrete PDF
//! library. It talks to a [`PdfBackend`], which parses the file, hands out
//! [`Page`] descriptions and vends the [`PageRenderer`] used for drawing.

use std::path::Path;
use std::rc::Rc;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::geometry::{PageRect, Rotation};
use crate::model::{parse_pdf_date, Metadata, Page, PageId};
use crate::options::RenderOptions;
use crate::render::{PageRenderer, VectorRenderer};

/// Abstract interface to a parsed PDF document.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Describe the page at `index` (0-indexed).
    fn page(&self, index: u32) -> Result<Page>;

    /// Vend a renderer able to draw this document's pages.
    fn renderer(&self, options: &RenderOptions) -> Box<dyn PageRenderer>;

    /// Document information dictionary.
    fn metadata(&self) -> Metadata;

    /// PDF version string from the file header.
    fn version(&self) -> String;
}

/// Page trees deeper than this are treated as cyclic.
const MAX_TREE_DEPTH: usize = 64;

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: Rc<LopdfDocument>,
    pages: Vec<PageId>,
}

impl LopdfBackend {
    /// Load from a file path.
    ///
    /// Encrypted files are rejected with [`Error::Encrypted`].
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_plain_document(LopdfDocument::load(path)?)
    }

    /// Load from an in-memory byte slice.
    ///
    /// Encrypted files are rejected with [`Error::Encrypted`].
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Self::from_plain_document(LopdfDocument::load_mem(data)?)
    }

    fn from_plain_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self::from_document(doc))
    }

    /// Wrap an already parsed `lopdf::Document`.
    pub fn from_document(doc: LopdfDocument) -> Self {
        // get_pages() is keyed by 1-based page number in document order.
        let pages = doc.get_pages().into_values().collect();
        Self {
            doc: Rc::new(doc),
            pages,
        }
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, index: u32) -> Result<Page> {
        let id = *self
            .pages
            .get(index as usize)
            .ok_or(Error::PageOutOfRange(index, self.page_count()))?;
        let dict = self
            .doc
            .get_dictionary(id)
            .map_err(|e| Error::MissingObject(format!("page {:?}: {}", id, e)))?;

        let media_box = inherited(&self.doc, dict, b"MediaBox")
            .and_then(|obj| rect_from_object(&self.doc, obj))
            .unwrap_or_else(|| {
                log::debug!("page {} has no usable MediaBox, assuming Letter", index);
                PageRect::LETTER
            });

        let mut page = Page::new(index, id, media_box);
        if let Some(crop) =
            inherited(&self.doc, dict, b"CropBox").and_then(|obj| rect_from_object(&self.doc, obj))
        {
            page = page.with_crop_box(crop);
        }
        if let Some(degrees) = inherited(&self.doc, dict, b"Rotate").and_then(|o| o.as_i64().ok()) {
            page = page.with_rotation(Rotation::from_degrees(degrees));
        }
        Ok(page)
    }

    fn renderer(&self, options: &RenderOptions) -> Box<dyn PageRenderer> {
        Box::new(VectorRenderer::new(Rc::clone(&self.doc), options.clone()))
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());
        metadata.page_count = self.page_count();
        metadata.encrypted = self.doc.is_encrypted();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| resolve(&self.doc, obj))
            .and_then(|obj| obj.as_dict().ok());

        if let Some(info) = info {
            let text = |key: &[u8]| string_from_dict(&self.doc, info, key);
            metadata.title = text(b"Title");
            metadata.author = text(b"Author");
            metadata.subject = text(b"Subject");
            metadata.creator = text(b"Creator");
            metadata.producer = text(b"Producer");
            metadata.created = text(b"CreationDate").and_then(|d| parse_pdf_date(&d));
            metadata.modified = text(b"ModDate").and_then(|d| parse_pdf_date(&d));
        }
        metadata
    }

    fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

/// Follow an indirect reference, if `obj` is one.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up a page attribute, walking up `/Parent` links for inheritable keys.
fn inherited<'a>(doc: &'a LopdfDocument, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut dict = page;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(obj) = dict.get(key) {
            return resolve(doc, obj);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    log::warn!("page tree deeper than {} levels", MAX_TREE_DEPTH);
    None
}

/// Extract a number from an operand or array element.
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn rect_from_object(doc: &LopdfDocument, obj: &Object) -> Option<PageRect> {
    let array = obj.as_array().ok()?;
    let values: Vec<f32> = array
        .iter()
        .filter_map(|v| resolve(doc, v).and_then(number))
        .collect();
    match values[..] {
        [ax, ay, bx, by] => Some(PageRect::from_corners(ax, ay, bx, by)),
        _ => None,
    }
}

fn string_from_dict(doc: &LopdfDocument, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match resolve(doc, dict.get(key).ok()?)? {
        Object::String(bytes, _) => {
            let text = decode_text_simple(bytes);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

/// Concatenated, decoded content stream bytes of a page.
pub(crate) fn page_content(doc: &LopdfDocument, page_id: PageId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::MissingObject(e.to_string()))?;

    // A page without /Contents is blank.
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match resolve(doc, contents) {
        Some(Object::Stream(stream)) => stream_data(stream),
        Some(Object::Array(parts)) => {
            let mut content = Vec::new();
            for part in parts {
                match resolve(doc, part) {
                    Some(Object::Stream(stream)) => {
                        content.extend_from_slice(&stream_data(stream)?);
                        content.push(b'\n');
                    }
                    _ => log::debug!("skipping non-stream content entry on page {:?}", page_id),
                }
            }
            Ok(content)
        }
        _ => Err(Error::Corrupted(format!(
            "invalid content stream on page {:?}",
            page_id
        ))),
    }
}

fn stream_data(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        stream
            .decompressed_content()
            .map_err(|e| Error::PdfParse(e.to_string()))
    } else {
        Ok(stream.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, StringFormat};

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_number() {
        assert_eq!(number(&Object::Integer(42)), Some(42.0));
        assert_eq!(number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(number(&Object::Null), None);
    }

    /// Pages node carrying MediaBox and Rotate, one kid inheriting both.
    fn inheriting_document() -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "CropBox" => vec![10.into(), 10.into(), 210.into(), 110.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 300.into(), 200.into()],
                "Rotate" => 90,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_inherited_page_attributes() {
        let backend = LopdfBackend::from_document(inheriting_document());
        assert_eq!(backend.page_count(), 1);

        let page = backend.page(0).unwrap();
        assert_eq!(page.media_box, PageRect::from_corners(0.0, 0.0, 300.0, 200.0));
        assert_eq!(page.rotation, Rotation::Quarter);
        // 200x100 crop box, rotated a quarter turn.
        assert_eq!(page.size(), crate::geometry::Size::new(100.0, 200.0));
    }

    #[test]
    fn test_page_out_of_range() {
        let backend = LopdfBackend::from_document(inheriting_document());
        assert!(matches!(backend.page(1), Err(Error::PageOutOfRange(1, 1))));
    }

    #[test]
    fn test_load_bytes_rejects_encrypted_document() {
        let mut doc = inheriting_document();
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "O" => Object::String(vec![0u8; 32], StringFormat::Hexadecimal),
            "U" => Object::String(vec![0u8; 32], StringFormat::Hexadecimal),
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        assert!(matches!(
            LopdfBackend::load_bytes(&data),
            Err(Error::Encrypted)
        ));
    }

    #[test]
    fn test_load_bytes_accepts_plain_document() {
        let mut data = Vec::new();
        inheriting_document().save_to(&mut data).unwrap();
        let backend = LopdfBackend::load_bytes(&data).unwrap();
        assert!(!backend.is_encrypted());
        assert_eq!(backend.page_count(), 1);
    }

    #[test]
    fn test_page_without_contents_is_blank() {
        let backend = LopdfBackend::from_document(inheriting_document());
        let page = backend.page(0).unwrap();
        assert!(page_content(backend.raw_doc(), page.id).unwrap().is_empty());
    }
}
