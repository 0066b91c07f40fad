//! Writer benchmarks
//!
//! Measures whole-document output for text-heavy, path-heavy and image
//! pages, and the number formatting every operator goes through.
//!
//! Run with: `cargo bench writer_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use streampdf::images::{ImageData, ImageKind};
use streampdf::writer::format_real;
use streampdf::{Document, DocumentBuilder};

fn text_document(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_writer(Vec::new()).unwrap();
    let font = doc.find_font("Times-Roman", "winansi", false).unwrap().unwrap();
    for page in 0..pages {
        doc.begin_page(595.0, 842.0).unwrap();
        doc.set_font(font, 11.0).unwrap();
        doc.set_text_pos(50.0, 800.0).unwrap();
        for line in 0..60 {
            doc.continue_text(&format!("Page {} line {}: the quick brown fox", page, line))
                .unwrap();
        }
        doc.end_page().unwrap();
    }
    doc.close().unwrap()
}

fn path_document(shapes: usize) -> Vec<u8> {
    let mut doc = Document::with_writer(Vec::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    for i in 0..shapes {
        let x = (i % 50) as f64 * 11.3;
        let y = (i / 50) as f64 * 7.7;
        doc.set_rgb_color(0.2, (i % 10) as f64 / 10.0, 0.8).unwrap();
        doc.circle(x, y, 5.0).unwrap();
        doc.fill_stroke().unwrap();
        doc.arc(x, y, 3.0, 10.0, 300.0).unwrap();
        doc.stroke().unwrap();
    }
    doc.end_page().unwrap();
    doc.close().unwrap()
}

fn image_document(side: u32, compress: bool) -> Vec<u8> {
    let pixels: Vec<u8> = (0..side * side * 3).map(|i| (i % 251) as u8).collect();
    let mut doc = DocumentBuilder::new()
        .compress(compress)
        .open_writer(Vec::new())
        .unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    let image = doc
        .open_image(ImageKind::Raw, ImageData::Memory(&pixels), side, side, 3, 8, None)
        .unwrap();
    doc.place_image(image, 10.0, 10.0, 0.5).unwrap();
    doc.end_page().unwrap();
    doc.close().unwrap()
}

fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_pages");
    for pages in [1usize, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(pages), &pages, |b, &pages| {
            b.iter(|| black_box(text_document(pages)))
        });
    }
    group.finish();
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");
    for shapes in [100usize, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(shapes), &shapes, |b, &shapes| {
            b.iter(|| black_box(path_document(shapes)))
        });
    }
    group.finish();
}

fn bench_images(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw_image");
    for compress in [false, true] {
        group.bench_with_input(
            BenchmarkId::new("256px", if compress { "flate" } else { "plain" }),
            &compress,
            |b, &compress| b.iter(|| black_box(image_document(256, compress))),
        );
    }
    group.finish();
}

fn bench_format_real(c: &mut Criterion) {
    let values = [0.0, 0.5523, 12.3456, 105.523, 9999.99, 123456.789, -0.00002];
    c.bench_function("format_real", |b| {
        b.iter(|| {
            for value in values {
                black_box(format_real(black_box(value)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_text,
    bench_paths,
    bench_images,
    bench_format_real
);
criterion_main!(benches);
