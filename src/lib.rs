mod config;
mod error;
mod fonts;
mod input;
mod model;
mod pdf;

pub use config::{AspectRatio, FieldNameStyle, FontChoice, LayoutConfig, PageSize, SectionTitles};
pub use error::Error;
pub use input::{output_file_name, parse, parse_str};
pub use model::{Field, FieldValue, Record, Report, Screenshot, Section};
pub use pdf::{DrawCommand, ImageRect, LayoutStats, Page, TextStyle};

use std::path::Path;
use std::time::Instant;

/// Lay out and serialize `report`, returning the PDF bytes.
pub fn render_report(report: &Report, config: &LayoutConfig) -> Result<Vec<u8>, Error> {
    pdf::render(report, config)
}

/// Lay out `report` and write the PDF to `output`. Nothing is written when
/// any step fails.
pub fn write_report(report: &Report, config: &LayoutConfig, output: &Path) -> Result<(), Error> {
    let t0 = Instant::now();
    let written = pdf::render_to_file(report, config, output)?;
    log::info!(
        "Wrote {} ({} bytes) in {:.1}ms",
        output.display(),
        written,
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(())
}

/// Page geometry only: every draw command of every page, plus counters.
pub fn layout_report(report: &Report, config: &LayoutConfig) -> Result<(Vec<Page>, LayoutStats), Error> {
    pdf::layout_only(report, config)
}

/// Parse a report document and write its PDF to `output`, through the same
/// save path as [`write_report`].
pub fn convert_json_to_pdf(input: &Path, output: &Path, config: &LayoutConfig) -> Result<(), Error> {
    let t0 = Instant::now();

    let report = input::parse(input)?;
    let t_parse = t0.elapsed();

    let written = pdf::render_to_file(&report, config, output)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render+write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_total - t_parse).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        written,
    );

    Ok(())
}
