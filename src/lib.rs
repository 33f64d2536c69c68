//! Wiremark: annotated wireframe screenshots.
//!
//! Wiremark takes a full-page screenshot and the labeled regions captured
//! from the same page, and produces an annotated canvas: every region is
//! framed, numbered and connected by an arrow to a label in a margin. A
//! report with the same identifiers lists each region's reference text.
//!
//! # Modules
//!
//! - [`ir`]: Region model, coordinate spaces, ordering and identifiers
//! - [`filter`]: Exclusion rules applied before ordering
//! - [`layout`]: Side choice, label slots and connector geometry
//! - [`render`]: Canvas compositing, arrows and glyph providers
//! - [`report`]: Report rows as CSV or JSON
//! - [`output`]: Staged output files, committed together
//! - [`validation`]: Region list validation and error reporting
//! - [`config`]: Annotation options
//! - [`error`]: Error types for wiremark operations

pub mod config;
pub mod error;
pub mod filter;
pub mod ir;
pub mod layout;
pub mod output;
pub mod render;
pub mod report;
pub mod validation;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use config::{AnnotateConfig, Mode};
use ir::Region;
use render::glyph::{resolve_glyphs, BitmapGlyphs, GlyphProvider};
use report::ReportFormat;

pub use error::WiremarkError;

/// The wiremark CLI application.
#[derive(Parser)]
#[command(name = "wiremark")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Draw labels, arrows and frames onto a widened screenshot.
    Annotate(AnnotateArgs),
    /// Check a region list for errors and warnings.
    Validate(ValidateArgs),
    /// Print the planned label placements as JSON without drawing.
    Layout(LayoutArgs),
}

/// Inputs and layout options shared by `annotate` and `layout`.
#[derive(clap::Args)]
struct RenderArgs {
    /// Region list (JSON array of labeled boxes).
    regions: PathBuf,

    /// Base screenshot the regions were captured from.
    #[arg(long)]
    image: PathBuf,

    /// JSON configuration file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label placement mode.
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Margin width in pixels, per side.
    #[arg(long)]
    margin_width: Option<u32>,

    /// Font file for label text.
    #[arg(long, conflicts_with = "bitmap_font")]
    font: Option<PathBuf>,

    /// Skip font discovery and use the built-in bitmap font.
    #[arg(long)]
    bitmap_font: bool,

    /// Keep regions the exclusion rules would drop.
    #[arg(long)]
    no_filter: bool,
}

/// Arguments for the annotate subcommand.
#[derive(clap::Args)]
struct AnnotateArgs {
    #[command(flatten)]
    render: RenderArgs,

    /// Output PNG path.
    #[arg(short, long)]
    output: PathBuf,

    /// Report path; the format follows the extension ('.csv' or '.json').
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Arguments for the layout subcommand.
#[derive(clap::Args)]
struct LayoutArgs {
    #[command(flatten)]
    render: RenderArgs,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Region list to validate.
    regions: PathBuf,

    /// Base screenshot, enabling the bounds check.
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON configuration file (for the identifier alphabet).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportOutput::Text)]
    output: ReportOutput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportOutput {
    Text,
    Json,
}

/// Run the wiremark CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), WiremarkError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Annotate(args)) => run_annotate(args),
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Layout(args)) => run_layout(args),
        None => {
            println!("wiremark {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Annotated wireframe screenshots.");
            println!();
            println!("Run 'wiremark --help' for usage information.");
            Ok(())
        }
    }
}

/// Loads the config file and applies flag overrides.
fn resolve_config(args: &RenderArgs) -> Result<AnnotateConfig, WiremarkError> {
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(margin_width) = args.margin_width {
        config.margin_width = margin_width;
    }
    if let Some(font) = &args.font {
        config.font_path = Some(font.clone());
    }
    config.validate()?;
    Ok(config)
}

fn resolve_glyph_provider(args: &RenderArgs, config: &AnnotateConfig) -> Box<dyn GlyphProvider> {
    if args.bitmap_font {
        Box::new(BitmapGlyphs)
    } else {
        resolve_glyphs(config.font_path.as_deref())
    }
}

fn load_regions(args: &RenderArgs, config: &AnnotateConfig) -> Result<Vec<Region>, WiremarkError> {
    let regions = ir::io_json::read_regions_json(&args.regions)?;
    if args.no_filter {
        Ok(regions)
    } else {
        Ok(filter::filter_regions(regions, &config.exclusion_rules))
    }
}

/// Execute the annotate subcommand.
fn run_annotate(args: AnnotateArgs) -> Result<(), WiremarkError> {
    let report_target = args
        .report
        .as_deref()
        .map(|path| ReportFormat::from_path(path).map(|format| (path, format)))
        .transpose()?;
    let config = resolve_config(&args.render)?;
    let regions = load_regions(&args.render, &config)?;
    let base = render::load_image(&args.render.image)?;
    let glyphs = resolve_glyph_provider(&args.render, &config);
    tracing::debug!(font = glyphs.source(), "resolved glyphs");

    let annotation = render::annotate(&base, regions, &config, glyphs.as_ref())?;

    // Nothing replaces a target until every output has been written.
    let mut staged = vec![output::stage(&args.output, |w| {
        render::encode_png(w, &annotation.image, &args.output)
    })?];
    if let Some((path, format)) = report_target {
        staged.push(output::stage(path, |w| {
            report::write_report(w, format, &annotation.rows, path)
        })?);
    }
    output::commit(staged)?;

    println!(
        "Annotated {} region(s) on a {}x{} canvas ({} mode)",
        annotation.rows.len(),
        annotation.image.width(),
        annotation.image.height(),
        config.mode
    );
    let exhausted = annotation.plan.exhausted_count();
    if exhausted > 0 {
        println!("  {} label(s) could not be fully separated", exhausted);
    }
    println!("  image:  {}", args.output.display());
    if let Some(report_path) = &args.report {
        println!("  report: {}", report_path.display());
    }

    Ok(())
}

/// Execute the layout subcommand.
fn run_layout(args: LayoutArgs) -> Result<(), WiremarkError> {
    let config = resolve_config(&args.render)?;
    let regions = load_regions(&args.render, &config)?;
    let (width, height) = image::image_dimensions(&args.render.image).map_err(|source| {
        WiremarkError::ImageDecode {
            path: args.render.image.clone(),
            source,
        }
    })?;
    let glyphs = resolve_glyph_provider(&args.render, &config);

    let ordered = ir::order_regions(regions)?;
    let identifiers = config.identifier_alphabet.assign(&ordered);
    let plan = layout::plan_layout(
        &ordered,
        &identifiers,
        (width, height),
        &config,
        glyphs.as_ref(),
    )?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &plan).map_err(WiremarkError::JsonOutput)?;
    writeln!(stdout)?;
    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), WiremarkError> {
    let regions = ir::io_json::read_regions_json(&args.regions)?;
    let config = config::load_config(args.config.as_deref())?;
    let image_size = match &args.image {
        Some(path) => Some(image::image_dimensions(path).map_err(|source| {
            WiremarkError::ImageDecode {
                path: path.clone(),
                source,
            }
        })?),
        None => None,
    };

    let opts = validation::ValidateOptions {
        strict: args.strict,
        alphabet_len: config.identifier_alphabet.symbols.len(),
    };
    let report = validation::validate_regions(&regions, image_size, &opts);

    match args.output {
        ReportOutput::Json => {
            let value = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": &report.issues,
            });
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &value).map_err(WiremarkError::JsonOutput)?;
            writeln!(stdout)?;
        }
        ReportOutput::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(WiremarkError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}
