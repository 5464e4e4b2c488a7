#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use vidreport_pdf::{DrawCommand, Page, Record, Report, Screenshot};

/// Output directory: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(case);
    std::fs::create_dir_all(&dir).expect("create output dir");
    dir
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    out.into_inner()
}

pub fn channel() -> Record {
    Record::new()
        .with("channelId", "UCabc123")
        .with("title", "Rust Screencasts")
        .with("description", "Weekly videos about systems programming.")
        .with("published At", "2015-05-15T00:00:00Z")
        .with("subscriber Count", 120_400i64)
        .with("video Count", 311i64)
        .with("view Count", 9_876_543i64)
}

pub fn video() -> Record {
    Record::new()
        .with("videoId", "dQw4w9WgXcQ")
        .with("title", "Pagination from scratch")
        .with("description", "We build a page layout engine.")
        .with("published At", "2024-03-01T12:00:00Z")
        .with("view Count", 10_000i64)
        .with("like Count", 420i64)
        .with("dislike Count", 0i64)
        .with("comment Count", 3i64)
}

pub fn comment(i: usize, text: &str) -> Record {
    Record::new()
        .with("author", format!("viewer{i}"))
        .with("text", text)
        .with("likeCount", i as i64)
        .with("publishedAt", format!("2024-03-02T00:00:00Z#{i}"))
}

pub fn report(comments: Vec<Record>) -> Report {
    Report {
        channel: channel(),
        video: video(),
        comments,
        screenshot: Screenshot::Bytes(png_bytes(64, 36)),
    }
}

pub fn report_with_comments(n: usize, text: &str) -> Report {
    report((0..n).map(|i| comment(i, text)).collect())
}

/// All text, in drawing order, across all pages.
pub fn all_texts(pages: &[Page]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|p| p.texts().map(str::to_string))
        .collect()
}

pub fn text_positions(page: &Page) -> Vec<(f32, f32)> {
    page.commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { x, y, .. } => Some((*x, *y)),
            DrawCommand::Image { .. } => None,
        })
        .collect()
}

pub fn pdf_page_count(bytes: &[u8]) -> usize {
    let doc = lopdf::Document::load_mem(bytes).expect("parse generated pdf");
    doc.get_pages().len()
}
