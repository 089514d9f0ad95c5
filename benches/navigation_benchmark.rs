//! Benchmarks for page navigation and rasterization.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, Stream};
use vindaloo::Document;

/// Letter pages, each with a grid of filled squares.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = LopdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut ops = vec![Operation::new("rg", vec![0.2.into(), 0.4.into(), 0.8.into()])];
    for row in 0..20i64 {
        for col in 0..15i64 {
            ops.push(Operation::new(
                "re",
                vec![(col * 40 + 6).into(), (row * 39 + 6).into(), 28.into(), 28.into()],
            ));
        }
    }
    ops.push(Operation::new("f", vec![]));
    let encoded = Content { operations: ops }.encode().unwrap();

    let kids: Vec<Object> = (0..page_count)
        .map(|_| {
            let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded.clone()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

fn bench_open(c: &mut Criterion) {
    let pdf = create_test_pdf(100);
    c.bench_function("open_100_pages", |b| {
        b.iter(|| Document::from_bytes(black_box(&pdf)).unwrap())
    });
}

fn bench_navigation(c: &mut Criterion) {
    let pdf = create_test_pdf(100);
    let mut doc = Document::from_bytes(&pdf).unwrap();
    c.bench_function("walk_100_pages", |b| {
        b.iter(|| {
            while doc.next_page() {}
            while doc.previous_page() {}
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let pdf = create_test_pdf(1);
    let doc = Document::from_bytes(&pdf).unwrap();
    c.bench_function("render_letter_page_1x", |b| {
        b.iter(|| doc.render_page(black_box(1.0)).unwrap())
    });
}

criterion_group!(benches, bench_open, bench_navigation, bench_render);
criterion_main!(benches);
