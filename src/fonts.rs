use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::OnceLock;

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::config::FontChoice;

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    widths_1000: Vec<f32>,
    char_to_gid: Option<HashMap<char, u16>>,
    char_widths_1000: Option<HashMap<char, f32>>,
}

impl FontEntry {
    /// Metrics-only entry for the built-in Helvetica faces.
    #[cfg(test)]
    pub(crate) fn builtin(bold: bool) -> Self {
        FontEntry {
            pdf_name: if bold { "F2".into() } else { "F1".into() },
            font_ref: Ref::new(1),
            widths_1000: helvetica_widths(bold),
            char_to_gid: None,
            char_widths_1000: None,
        }
    }

    /// Width of a single character in 1000-units. Uses the per-char cache of
    /// an embedded font, falls back to the WinAnsi table.
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(ref map) = self.char_widths_1000
            && let Some(&w) = map.get(&ch)
        {
            return w;
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }

    /// Bytes for a `Tj` operand: glyph IDs for embedded fonts, WinAnsi otherwise.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// (lowercase family name, bold) -> (file path, face index within TTC)
type FontLookup = HashMap<(String, bool), (PathBuf, u32)>;

static FONT_INDEX: OnceLock<FontLookup> = OnceLock::new();

fn font_family_name(face: &Face) -> Option<String> {
    // ID 1 (Family) keeps "Noto Sans" apart from "Noto Sans Display";
    // ID 16 groups them.
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if let Ok(val) = std::env::var("VIDREPORT_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        for part in val.split(sep) {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                dirs.push(PathBuf::from(trimmed));
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_file(path: &std::path::Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn is_font_collection(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"))
}

fn scan_font_dirs() -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let mut files_scanned = 0u32;
    let mut visited: HashSet<PathBuf> = HashSet::new();

    // Reversed so earlier directories (VIDREPORT_FONTS first) win on duplicate families.
    let mut stack: Vec<PathBuf> = font_directories().into_iter().rev().collect();
    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if !is_font_file(&path) {
                continue;
            }
            files_scanned += 1;
            let Ok(file) = std::fs::File::open(&path) else {
                continue;
            };
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            let face_count = if is_font_collection(&path) {
                ttf_parser::fonts_in_collection(&data).unwrap_or(1)
            } else {
                1
            };
            for face_idx in 0..face_count {
                let Ok(face) = Face::parse(&data, face_idx) else {
                    continue;
                };
                // Italic faces are never selected.
                if face.is_italic() {
                    continue;
                }
                if let Some(family) = font_family_name(&face) {
                    index
                        .entry((family.to_lowercase(), face.is_bold()))
                        .or_insert((path.clone(), face_idx));
                }
            }
        }
    }

    log::info!(
        "Font scan: {:.1}ms, {} files parsed → {} entries",
        t0.elapsed().as_secs_f64() * 1000.0,
        files_scanned,
        index.len(),
    );

    index
}

/// Look up a font file by family name. Falls back to the regular face when no
/// bold face is installed.
fn find_font_file(family: &str, bold: bool) -> Option<(PathBuf, u32)> {
    lookup_face(FONT_INDEX.get_or_init(scan_font_dirs), family, bold)
}

fn lookup_face(index: &FontLookup, family: &str, bold: bool) -> Option<(PathBuf, u32)> {
    let key = family.to_lowercase();
    index
        .get(&(key.clone(), bold))
        .or_else(|| if bold { index.get(&(key, false)) } else { None })
        .cloned()
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
/// Control characters are unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // p..~
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// WinAnsi 0x80..=0xFF. Bytes undefined in Windows-1252 never reach the table.
#[rustfmt::skip]
const HELVETICA_UPPER: [u16; 128] = [
    556, 350, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350, // 0x80
    350, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 350, 500, 667,  // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,    // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,    // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,   // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,    // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,    // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,    // 0xF0
];

#[rustfmt::skip]
const HELVETICA_BOLD_UPPER: [u16; 128] = [
    556, 350, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    350, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 350, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Helvetica AFM widths at 1000 units/em for WinAnsi bytes 32..=255.
fn helvetica_widths(bold: bool) -> Vec<f32> {
    let (ascii, upper) = if bold {
        (&HELVETICA_BOLD_ASCII, &HELVETICA_BOLD_UPPER)
    } else {
        (&HELVETICA_ASCII, &HELVETICA_UPPER)
    };
    (32u8..=255u8)
        .map(|b| match b {
            32..=126 => ascii[(b - 32) as usize] as f32,
            127 => 0.0,
            _ => upper[(b - 128) as usize] as f32,
        })
        .collect()
}

fn identity_system_info() -> pdf_writer::types::SystemInfo<'static> {
    pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    }
}

struct TrueTypeMetrics {
    widths_1000: Vec<f32>,
    char_to_gid: HashMap<char, u16>,
    char_widths_1000: HashMap<char, f32>,
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to only include glyphs used in the report.
#[allow(clippy::too_many_arguments)]
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    descriptor_ref: Ref,
    data_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<TrueTypeMetrics> {
    let face = Face::parse(font_data, face_index).ok()?;

    let units = face.units_per_em() as f32;
    let to_1000 = |v: f32| v / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| to_1000(h as f32))
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        to_1000(bb.x_min as f32),
        to_1000(bb.y_min as f32),
        to_1000(bb.x_max as f32),
        to_1000(bb.y_max as f32),
    );

    let widths_1000: Vec<f32> = (32u8..=255u8)
        .map(|byte| {
            face.glyph_index(winansi_to_char(byte))
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| to_1000(adv as f32))
                .unwrap_or(0.0)
        })
        .collect();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut char_widths_1000 = HashMap::new();
    // Sorted iteration keeps glyph numbering, and so the output bytes, stable.
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| to_1000(adv as f32))
                .unwrap_or(0.0);
            char_widths_1000.insert(ch, w);
        }
    }

    let subset_data = subsetter::subset(font_data, face_index, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e}, embedding full font");
        font_data.to_vec()
    });

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(to_1000(face.ascender() as f32))
        .descent(to_1000(face.descender() as f32))
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(identity_system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut gid_widths: Vec<(u16, f32)> = char_to_gid
            .iter()
            .map(|(ch, &new_gid)| (new_gid, char_widths_1000[ch]))
            .collect();
        gid_widths.sort_by_key(|&(gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), identity_system_info());
    let mut pairs: Vec<(u16, char)> = char_to_gid.iter().map(|(&ch, &g)| (g, ch)).collect();
    pairs.sort_unstable();
    for (new_gid, ch) in pairs {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(TrueTypeMetrics {
        widths_1000,
        char_to_gid,
        char_widths_1000,
    })
}

fn write_helvetica(pdf: &mut Pdf, font_ref: Ref, bold: bool) {
    let base: &[u8] = if bold { b"Helvetica-Bold" } else { b"Helvetica" };
    pdf.type1_font(font_ref)
        .base_font(Name(base))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
}

/// Write the font objects for one face and return its metrics.
pub(crate) fn register_font(
    pdf: &mut Pdf,
    choice: &FontChoice,
    bold: bool,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &BTreeSet<char>,
) -> FontEntry {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let embedded = match choice {
        FontChoice::Builtin => None,
        FontChoice::Family(family) => {
            let descriptor_ref = alloc();
            let data_ref = alloc();
            let found = find_font_file(family, bold).and_then(|(path, face_index)| {
                let data = std::fs::read(&path).ok()?;
                embed_truetype(
                    pdf,
                    font_ref,
                    descriptor_ref,
                    data_ref,
                    family,
                    &data,
                    face_index,
                    used_chars,
                    alloc,
                )
            });
            if found.is_none() {
                log::warn!("Font not found: {family} bold={bold}, using Helvetica");
            }
            found
        }
    };

    let entry = match embedded {
        Some(m) => FontEntry {
            pdf_name,
            font_ref,
            widths_1000: m.widths_1000,
            char_to_gid: Some(m.char_to_gid),
            char_widths_1000: Some(m.char_widths_1000),
        },
        None => {
            write_helvetica(pdf, font_ref, bold);
            let dropped: String = used_chars
                .iter()
                .filter(|&&c| char_to_winansi(c) == 0 && !c.is_whitespace())
                .collect();
            if !dropped.is_empty() {
                log::warn!(
                    "{} characters cannot be encoded in WinAnsi and are omitted: {dropped:?}",
                    dropped.chars().count()
                );
            }
            FontEntry {
                pdf_name,
                font_ref,
                widths_1000: helvetica_widths(bold),
                char_to_gid: None,
                char_widths_1000: None,
            }
        }
    };

    log::debug!(
        "register_font: {choice:?} bold={bold} → {:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_metrics() {
        let regular = FontEntry::builtin(false);
        let bold = FontEntry::builtin(true);
        assert_eq!(regular.char_width_1000('a'), 556.0);
        assert_eq!(regular.char_width_1000('i'), 222.0);
        assert_eq!(bold.char_width_1000('i'), 278.0);
        assert_eq!(regular.char_width_1000('~'), 584.0);
        assert!((regular.space_width(12.0) - 3.336).abs() < 1e-4);
        assert!((regular.text_width("Title", 10.0) - 18.89).abs() < 1e-3);
    }

    #[test]
    fn helvetica_upper_half_uses_afm_widths() {
        let regular = FontEntry::builtin(false);
        let bold = FontEntry::builtin(true);
        for ch in ['\u{2014}', '\u{2026}', '\u{2122}', '\u{2030}', '\u{0152}', '\u{00C6}'] {
            assert_eq!(regular.char_width_1000(ch), 1000.0, "{ch}");
            assert_eq!(bold.char_width_1000(ch), 1000.0, "{ch}");
        }
        assert_eq!(regular.char_width_1000('\u{2013}'), 556.0);
        assert_eq!(regular.char_width_1000('\u{00E9}'), 556.0);
        assert_eq!(bold.char_width_1000('\u{00E9}'), 556.0);
        assert_eq!(regular.char_width_1000('\u{00F1}'), 556.0);
        assert_eq!(bold.char_width_1000('\u{00F1}'), 611.0);
        assert_eq!(regular.char_width_1000('\u{00D7}'), 584.0);
        assert_eq!(regular.char_width_1000('\u{00A9}'), 737.0);
        assert_eq!(regular.char_width_1000('\u{00BD}'), 834.0);
    }

    #[test]
    fn bold_lookup_falls_back_to_regular_face() {
        let mut index = FontLookup::new();
        index.insert(("noto serif".into(), false), (PathBuf::from("/f/NotoSerif.ttf"), 0));
        index.insert(("dejavu sans".into(), false), (PathBuf::from("/f/DejaVuSans.ttf"), 0));
        index.insert(("dejavu sans".into(), true), (PathBuf::from("/f/DejaVuSans-Bold.ttf"), 0));

        assert_eq!(
            lookup_face(&index, "Noto Serif", true),
            Some((PathBuf::from("/f/NotoSerif.ttf"), 0))
        );
        assert_eq!(
            lookup_face(&index, "DejaVu Sans", true),
            Some((PathBuf::from("/f/DejaVuSans-Bold.ttf"), 0))
        );
        assert_eq!(lookup_face(&index, "Missing", false), None);
    }

    #[test]
    fn winansi_drops_unmappable() {
        assert_eq!(to_winansi_bytes("a€\u{1F600}b\n"), vec![b'a', 0x80, b'b']);
        assert_eq!(FontEntry::builtin(false).char_width_1000('\u{1F600}'), 0.0);
    }

    #[test]
    fn winansi_round_trips_upper_half() {
        for byte in 0x80u8..=0xFF {
            let ch = winansi_to_char(byte);
            let back = char_to_winansi(ch);
            // 0x81, 0x8D, 0x8F, 0x90, 0x9D are undefined in Windows-1252.
            if back != 0 {
                assert_eq!(back, byte);
            }
        }
    }

    #[test]
    fn gid_encoding_is_big_endian() {
        let map = HashMap::from([('A', 0x0102u16)]);
        assert_eq!(encode_as_gids("AZ", &map), vec![0x01, 0x02, 0x00, 0x00]);
    }
}
