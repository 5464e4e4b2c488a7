mod common;

use std::path::{Path, PathBuf};

use lopdf::{Document, Object};
use ttf_parser::Face;
use vidreport_pdf::{DrawCommand, FontChoice, LayoutConfig, TextStyle, layout_report, render_report};

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

fn family_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|n| n.name_id == ttf_parser::name_id::FAMILY && n.is_unicode())
        .find_map(|n| n.to_string())
}

fn ttf_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            ttf_files(&path, out);
        } else if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf"))
        {
            out.push(path);
        }
    }
}

/// First upright, regular-weight TrueType face with Latin letters installed on
/// this machine, as (path, family).
fn find_regular_face() -> Option<(PathBuf, String)> {
    let mut files = Vec::new();
    for dir in SYSTEM_FONT_DIRS {
        ttf_files(Path::new(dir), &mut files);
    }
    files.sort();
    files.into_iter().find_map(|path| {
        // Skip math faces.
        if path.to_string_lossy().contains("Math") {
            return None;
        }
        let data = std::fs::read(&path).ok()?;
        let face = Face::parse(&data, 0).ok()?;
        if face.is_italic() || face.is_bold() {
            return None;
        }
        if !"Aaz09:".chars().all(|c| face.glyph_index(c).is_some()) {
            return None;
        }
        let family = family_name(&face)?;
        Some((path, family))
    })
}

fn dict<'a>(doc: &'a Document, obj: &'a Object) -> &'a lopdf::Dictionary {
    match obj {
        Object::Reference(r) => doc.get_object(*r).and_then(Object::as_dict).unwrap(),
        other => other.as_dict().unwrap(),
    }
}

// One test per binary: VIDREPORT_FONTS must be set before the font index is built.
#[test]
fn family_from_font_dir_is_subsetted_and_embedded() {
    let _ = env_logger::builder().is_test(true).try_init();
    let Some((source, family)) = find_regular_face() else {
        eprintln!("no installed TrueType font found, skipping");
        return;
    };
    let font_dir = common::output_dir("embedded_font").join("fonts");
    std::fs::create_dir_all(&font_dir).unwrap();
    let copied = font_dir.join(source.file_name().unwrap());
    std::fs::copy(&source, &copied).unwrap();
    // SAFETY: the only test in this binary; no other thread reads the environment yet.
    unsafe { std::env::set_var("VIDREPORT_FONTS", &font_dir) };

    let text = "Subsetting keeps only the glyphs a report draws, so the file stays small. ".repeat(5);
    let mut report = common::report_with_comments(4, &text);
    report.video.push("description", "x".repeat(300));
    let config = LayoutConfig {
        font: FontChoice::Family(family.clone()),
        ..LayoutConfig::default()
    };

    // Wrapped lines respect the budget under the embedded face's own advances.
    let data = std::fs::read(&copied).unwrap();
    let face = Face::parse(&data, 0).unwrap();
    let width = |line: &str, size: f32| -> f32 {
        line.chars()
            .filter_map(|c| face.glyph_index(c))
            .filter_map(|g| face.glyph_hor_advance(g))
            .map(|adv| adv as f32 / face.units_per_em() as f32 * size)
            .sum()
    };
    let (pages, _) = layout_report(&report, &config).unwrap();
    let mut widest = 0.0f32;
    for page in &pages {
        for cmd in &page.commands {
            if let DrawCommand::Text {
                text,
                style: TextStyle::Regular,
                font_size,
                ..
            } = cmd
            {
                let w = width(text, *font_size);
                assert!(w <= 468.0 + 0.01, "{text:?} is {w}pt wide");
                widest = widest.max(w);
            }
        }
    }
    assert!(widest > 400.0, "lines should fill the width, widest {widest}");

    let bytes = render_report(&report, &config).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let (_, first) = doc.get_pages().into_iter().next().unwrap();
    let page = doc.get_object(first).and_then(Object::as_dict).unwrap();
    let resources = dict(&doc, page.get(b"Resources").unwrap());
    let fonts = dict(&doc, resources.get(b"Font").unwrap());
    let regular = dict(&doc, fonts.get(b"F1").unwrap());

    assert_eq!(regular.get(b"Subtype").and_then(Object::as_name).unwrap(), b"Type0");
    assert_eq!(
        regular.get(b"Encoding").and_then(Object::as_name).unwrap(),
        b"Identity-H"
    );
    assert_eq!(
        regular.get(b"BaseFont").and_then(Object::as_name).unwrap(),
        family.replace(' ', "").as_bytes()
    );
    assert!(regular.get(b"ToUnicode").and_then(Object::as_reference).is_ok());

    let descendants = regular
        .get(b"DescendantFonts")
        .and_then(Object::as_array)
        .unwrap();
    let cid = dict(&doc, &descendants[0]);
    assert_eq!(cid.get(b"Subtype").and_then(Object::as_name).unwrap(), b"CIDFontType2");
    let descriptor = dict(&doc, cid.get(b"FontDescriptor").unwrap());
    let file_ref = descriptor
        .get(b"FontFile2")
        .and_then(Object::as_reference)
        .unwrap();
    let font_file = doc.get_object(file_ref).and_then(Object::as_stream).unwrap();
    assert!(
        font_file.content.len() < data.len(),
        "subset {} bytes, original {}",
        font_file.content.len(),
        data.len()
    );
}
