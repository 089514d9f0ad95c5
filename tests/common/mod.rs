//! Builders for small PDF files used across integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// Description of one page in a synthetic document.
pub struct PageSpec {
    pub media_box: [i64; 4],
    pub rotate: Option<i64>,
    pub ops: Vec<Operation>,
}

impl PageSpec {
    pub fn letter() -> Self {
        Self {
            media_box: [0, 0, 612, 792],
            rotate: None,
            ops: Vec::new(),
        }
    }

    pub fn sized(width: i64, height: i64) -> Self {
        Self {
            media_box: [0, 0, width, height],
            ..Self::letter()
        }
    }

    pub fn rotated(mut self, degrees: i64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn with_ops(mut self, ops: Vec<Operation>) -> Self {
        self.ops = ops;
        self
    }
}

/// Serialize a document made of `pages`, with a title in its info dictionary.
pub fn build_pdf(pages: Vec<PageSpec>, title: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for spec in pages {
        let content = Content {
            operations: spec.ops,
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => spec.media_box.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
            "Contents" => content_id,
        };
        if let Some(degrees) = spec.rotate {
            page.set("Rotate", degrees);
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Producer" => Object::string_literal("vindaloo tests"),
        "CreationDate" => Object::string_literal("D:20240115103045Z"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// A document of `n` blank Letter pages.
pub fn blank_pdf(n: usize) -> Vec<u8> {
    build_pdf((0..n).map(|_| PageSpec::letter()).collect(), "Blank")
}

/// Fill the rectangle `(x, y, w, h)` with an RGB color.
pub fn filled_rect(rgb: [f32; 3], rect: [i64; 4]) -> Vec<Operation> {
    vec![
        Operation::new("rg", rgb.iter().map(|&c| Object::Real(c)).collect()),
        Operation::new("re", rect.iter().map(|&v| Object::Integer(v)).collect()),
        Operation::new("f", vec![]),
    ]
}
