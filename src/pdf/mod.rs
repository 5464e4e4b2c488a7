mod cursor;
mod flow;
mod image;
mod section;
mod wrap;
mod writer;

use std::collections::BTreeSet;
use std::path::Path;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::LayoutConfig;
use crate::error::Error;
use crate::fonts::{FontEntry, register_font};
use crate::model::{Report, Section};

pub use flow::LayoutStats;
pub use writer::{DrawCommand, ImageRect, Page, TextStyle};

use cursor::PageCursor;
use flow::PageFlow;
use self::image::{ImagePlacer, load_screenshot};
use section::SectionRenderer;

const IMAGE_NAME: &[u8] = b"Im1";
const PRODUCER: &str = concat!("vidreport-pdf ", env!("CARGO_PKG_VERSION"));

struct RefAlloc {
    next: i32,
}

impl RefAlloc {
    fn next(&mut self) -> Ref {
        let r = Ref::new(self.next);
        self.next += 1;
        r
    }
}

/// Everything written before layout: fonts, the image XObject and the refs
/// the page tree will need.
struct Prepared {
    pdf: Pdf,
    ids: RefAlloc,
    catalog_id: Ref,
    pages_id: Ref,
    regular: FontEntry,
    bold: FontEntry,
    image_ref: Ref,
    placer: ImagePlacer,
}

/// Every character the report can draw, so embedded fonts are subsetted once.
fn collect_used_chars(report: &Report, config: &LayoutConfig) -> BTreeSet<char> {
    let mut used: BTreeSet<char> = ": ".chars().collect();
    let titles = [
        &config.titles.channel,
        &config.titles.video,
        &config.titles.comments,
    ];
    used.extend(titles.iter().flat_map(|t| t.chars()));
    let records = [&report.channel, &report.video]
        .into_iter()
        .chain(report.comments.iter());
    for record in records {
        for field in record.fields() {
            used.extend(config.field_names.apply(&field.name).chars());
            used.extend(field.value.chars().filter(|c| !c.is_whitespace()));
        }
    }
    used
}

fn prepare(report: &Report, config: &LayoutConfig) -> Result<Prepared, Error> {
    config.validate()?;
    report.validate()?;
    let shot = load_screenshot(&report.screenshot)?;

    let mut pdf = Pdf::new();
    let mut ids = RefAlloc { next: 1 };
    let catalog_id = ids.next();
    let pages_id = ids.next();

    let used_chars = collect_used_chars(report, config);
    let regular = register_font(
        &mut pdf,
        &config.font,
        false,
        "F1".into(),
        &mut || ids.next(),
        &used_chars,
    );
    let bold = register_font(
        &mut pdf,
        &config.font,
        true,
        "F2".into(),
        &mut || ids.next(),
        &used_chars,
    );

    let image_ref = ids.next();
    shot.embed(&mut pdf, image_ref, &mut || ids.next())?;
    let placer = ImagePlacer::new(config, (shot.pixel_width, shot.pixel_height));

    Ok(Prepared {
        pdf,
        ids,
        catalog_id,
        pages_id,
        regular,
        bold,
        image_ref,
        placer,
    })
}

/// Run the layout pass: channel, video (screenshot first), comments.
fn layout(report: &Report, config: &LayoutConfig, prep: &Prepared) -> PageFlow {
    let (page_width, page_height) = config.page_size.dimensions();
    let cursor = PageCursor::new(
        page_width,
        page_height,
        config.margin,
        config.font_size,
        config.leading,
    );
    let mut flow = PageFlow::new(cursor);
    let mut renderer = SectionRenderer::new(config, &prep.regular, &prep.bold, Some(&prep.placer));

    let sections = [
        Section::single(&config.titles.channel, &report.channel),
        Section::single(&config.titles.video, &report.video).with_figure(),
        Section::list(&config.titles.comments, &report.comments),
    ];
    for section in &sections {
        renderer.render(&mut flow, section);
    }
    flow
}

fn page_content(page: &Page, prep: &Prepared) -> Content {
    let mut content = Content::new();
    for cmd in &page.commands {
        match cmd {
            DrawCommand::Text {
                x,
                y,
                text,
                style,
                font_size,
            } => {
                let font = match style {
                    TextStyle::Regular => &prep.regular,
                    TextStyle::Bold => &prep.bold,
                };
                content
                    .begin_text()
                    .set_font(Name(font.pdf_name.as_bytes()), *font_size)
                    .next_line(*x, *y)
                    .show(Str(&font.encode(text)))
                    .end_text();
            }
            DrawCommand::Image { rect } => {
                content
                    .save_state()
                    .transform([rect.width, 0.0, 0.0, rect.height, rect.x, rect.y])
                    .x_object(Name(IMAGE_NAME))
                    .restore_state();
            }
        }
    }
    content
}

/// Serialize finalized pages into a complete PDF file.
fn assemble(mut prep: Prepared, pages: &[Page], config: &LayoutConfig, title: &str) -> Vec<u8> {
    let (page_width, page_height) = config.page_size.dimensions();
    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| prep.ids.next()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| prep.ids.next()).collect();

    for (i, page) in pages.iter().enumerate() {
        let raw = page_content(page, &prep).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        prep.pdf
            .stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    let pdf = &mut prep.pdf;
    pdf.catalog(prep.catalog_id).pages(prep.pages_id);
    pdf.pages(prep.pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let fonts = [
        (prep.regular.pdf_name.as_str(), prep.regular.font_ref),
        (prep.bold.pdf_name.as_str(), prep.bold.font_ref),
    ];
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_width, page_height))
            .parent(prep.pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for (name, font_ref) in fonts {
                font_dict.pair(Name(name.as_bytes()), font_ref);
            }
        }
        if pages[i].image().is_some() {
            resources.x_objects().pair(Name(IMAGE_NAME), prep.image_ref);
        }
    }

    let info_id = prep.ids.next();
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(PRODUCER));

    prep.pdf.finish()
}

fn log_stats(stats: &LayoutStats) {
    log::info!(
        "Layout: {} pages, {} lines, {} page breaks, {} oversized blocks",
        stats.pages,
        stats.lines,
        stats.page_breaks,
        stats.oversized_blocks,
    );
}

pub(crate) fn render(report: &Report, config: &LayoutConfig) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let prep = prepare(report, config)?;
    let t_prepare = t0.elapsed();

    let (pages, stats) = layout(report, config, &prep).finish();
    let t_layout = t0.elapsed();
    log_stats(&stats);

    let bytes = assemble(prep, &pages, config, report.title());
    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: fonts+image={:.1}ms, layout={:.1}ms, assembly={:.1}ms",
        t_prepare.as_secs_f64() * 1000.0,
        (t_layout - t_prepare).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
    );
    Ok(bytes)
}

/// Lay out and write straight to `path`. Returns the number of bytes written.
pub(crate) fn render_to_file(
    report: &Report,
    config: &LayoutConfig,
    path: &Path,
) -> Result<usize, Error> {
    let prep = prepare(report, config)?;
    let (writer, mut stats) = layout(report, config, &prep).into_parts();
    writer.save(path, |pages| {
        stats.pages = pages.len();
        log_stats(&stats);
        Ok(assemble(prep, pages, config, report.title()))
    })
}

pub(crate) fn layout_only(
    report: &Report,
    config: &LayoutConfig,
) -> Result<(Vec<Page>, LayoutStats), Error> {
    let prep = prepare(report, config)?;
    Ok(layout(report, config, &prep).finish())
}
