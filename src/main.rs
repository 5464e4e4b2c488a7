use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use vidreport_pdf::{AspectRatio, FieldNameStyle, FontChoice, LayoutConfig, PageSize, Screenshot};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Paper {
    Letter,
    A4,
}

/// Lay out a video report (channel and video metadata, a screenshot, comments) as a PDF.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Report JSON with "channel", "video", "comments" and "screenshot"
    input: PathBuf,

    /// Output file, or a directory to place "<video title>.pdf" in
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Screenshot to embed instead of the one named in the input
    #[arg(long)]
    screenshot: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Paper::Letter)]
    paper: Paper,

    /// Margin on all four sides, in points
    #[arg(long, default_value_t = 72.0)]
    margin: f32,

    /// Embed this installed font family instead of Helvetica
    #[arg(long)]
    font: Option<String>,

    /// Size the screenshot from its pixel dimensions instead of 16:9
    #[arg(long)]
    native_aspect: bool,

    /// Print field names exactly as they appear in the input
    #[arg(long)]
    keep_field_names: bool,

    /// Keep words wider than a line whole instead of breaking them
    #[arg(long)]
    no_split_words: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn layout_config(&self) -> LayoutConfig {
        let mut config = LayoutConfig {
            page_size: match self.paper {
                Paper::Letter => PageSize::Letter,
                Paper::A4 => PageSize::A4,
            },
            margin: self.margin,
            split_long_words: !self.no_split_words,
            ..LayoutConfig::default()
        };
        if let Some(family) = &self.font {
            config.font = FontChoice::Family(family.clone());
        }
        if self.native_aspect {
            config.image_aspect = AspectRatio::Native;
        }
        if self.keep_field_names {
            config.field_names = FieldNameStyle::AsIs;
        }
        config
    }
}

fn run(args: &Args) -> Result<PathBuf, vidreport_pdf::Error> {
    let config = args.layout_config();
    let mut report = vidreport_pdf::parse(&args.input)?;
    if let Some(shot) = &args.screenshot {
        report.screenshot = Screenshot::Path(shot.clone());
    }

    let output = match &args.output {
        Some(p) if p.is_dir() => p.join(vidreport_pdf::output_file_name(&report)),
        Some(p) => p.clone(),
        None => PathBuf::from(vidreport_pdf::output_file_name(&report)),
    };
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    vidreport_pdf::write_report(&report, &config, &output)?;
    Ok(output)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(output) => {
            println!("Report saved to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
