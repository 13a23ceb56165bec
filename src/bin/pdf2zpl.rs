//! CLI binary for pdf2zpl.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints the ZPL.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2zpl::{convert, convert_to_file, inspect, ConversionConfig, ConversionOutput, GraphicFormat, PageLayout};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a label PDF (stdout)
  pdf2zpl label.pdf

  # Read from stdin, answer as a CGI script
  pdf2zpl --cgi - < label.pdf

  # Write to a spool file
  pdf2zpl label.pdf -o /var/spool/zebra/label.zpl

  # 203 DPI printer with 4.0in wide stock
  pdf2zpl --printer-width 812 --printer-height 1218 label.pdf

  # What would happen, without rendering
  pdf2zpl --inspect-only label.pdf

LAYOUTS:
  A4 (595x842 pt, ±5 pt)  Page is cut into four quadrants, blank ones are
                          dropped and the rest cropped to their content.
                          At most --max-labels labels are emitted.
  anything else           Every page is rendered at the largest DPI that
                          fits the printable area, one label per page.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   libpdfium file, or the directory holding it
  RUST_LOG          Overrides the log filter (e.g. pdf2zpl=debug)
"#;

/// Convert PDF shipping labels to ZPL for Zebra thermal printers.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2zpl",
    version,
    about = "Convert PDF shipping labels to ZPL for Zebra thermal printers",
    long_about = "Convert PDF shipping labels to ZPL. A4 sheets holding four labels are split \
into one label per non-blank quadrant; label-sized pages are scaled to fit the printable area.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path, or - for stdin.
    input: String,

    /// Write ZPL to this file instead of stdout.
    #[arg(short, long, env = "PDF2ZPL_OUTPUT")]
    output: Option<PathBuf>,

    /// Prefix stdout with a "Content-Type: text/plain" CGI header.
    #[arg(long, env = "PDF2ZPL_CGI")]
    cgi: bool,

    /// Graphic field payload: a (hex), b64, z64.
    #[arg(long, env = "PDF2ZPL_FORMAT", default_value = "z64")]
    format: String,

    /// Printable width in dots.
    #[arg(long, env = "PDF2ZPL_PRINTER_WIDTH", default_value_t = pdf2zpl::config::PRINTER_DOTS_WIDTH)]
    printer_width: u32,

    /// Printable height in dots.
    #[arg(long, env = "PDF2ZPL_PRINTER_HEIGHT", default_value_t = pdf2zpl::config::PRINTER_DOTS_HEIGHT)]
    printer_height: u32,

    /// Tolerance in points when detecting A4 sheets.
    #[arg(long, env = "PDF2ZPL_A4_TOLERANCE", default_value_t = 5.0)]
    a4_tolerance: f64,

    /// Padding in pixels kept around cropped labels.
    #[arg(long, env = "PDF2ZPL_PADDING", default_value_t = 10)]
    padding: u32,

    /// DPI used to render A4 sheets before quartering (72–600).
    #[arg(long, env = "PDF2ZPL_RENDER_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    render_dpi: u32,

    /// Maximum number of labels taken from an A4 document.
    #[arg(long, env = "PDF2ZPL_MAX_LABELS", default_value_t = 4)]
    max_labels: usize,

    /// Dither grey levels instead of thresholding.
    #[arg(long, env = "PDF2ZPL_DITHER")]
    dither: bool,

    /// Burn light pixels instead of dark ones.
    #[arg(long, env = "PDF2ZPL_NO_INVERT")]
    no_invert: bool,

    /// Output structured JSON (ConversionOutput) instead of ZPL.
    #[arg(long, env = "PDF2ZPL_JSON")]
    json: bool,

    /// Print the page box and layout only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2ZPL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2ZPL_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(&cli.input, &config)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialize inspection")?
            );
        } else {
            let b = &info.page_box;
            println!("File:         {}", info.source_name);
            println!("Size:         {:.1} kB", info.input_bytes as f64 / 1024.0);
            println!(
                "MediaBox:     {},{},{},{} ({}x{} pt)",
                b.left,
                b.bottom,
                b.right,
                b.top,
                b.width(),
                b.height()
            );
            println!("UserUnit:     {}", b.user_unit);
            println!(
                "Physical:     {:.2} x {:.2} in",
                b.width_in(),
                b.height_in()
            );
            match info.layout {
                PageLayout::A4Quartered => println!("Layout:       A4 sheet, quartered"),
                PageLayout::Direct { dpi } => println!("Layout:       direct at {dpi} dpi"),
            }
        }
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let output = convert_to_file(&cli.input, output_path, &config)
            .await
            .context("Conversion failed")?;
        if !cli.quiet {
            print_summary(&output, Some(output_path.as_path()));
        }
        return Ok(());
    }

    let output = convert(&cli.input, &config)
        .await
        .context("Conversion failed")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else {
        let body = if cli.cgi {
            output.to_cgi_response()
        } else {
            output.zpl.clone()
        };
        handle
            .write_all(body.as_bytes())
            .context("Failed to write to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;

    if !cli.quiet && !cli.cgi && !cli.json {
        print_summary(&output, None);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let format: GraphicFormat = cli.format.parse().context("Invalid --format")?;

    ConversionConfig::builder()
        .printer_dots(cli.printer_width, cli.printer_height)
        .a4_tolerance(cli.a4_tolerance)
        .crop_padding(cli.padding)
        .render_dpi(cli.render_dpi)
        .max_labels(cli.max_labels)
        .format(format)
        .dither(cli.dither)
        .invert(!cli.no_invert)
        .build()
        .context("Invalid configuration")
}

fn print_summary(output: &ConversionOutput, path: Option<&Path>) {
    let layout = match output.job.layout {
        PageLayout::A4Quartered => "A4 quartered".to_string(),
        PageLayout::Direct { dpi } => format!("direct @ {dpi} dpi"),
    };
    let target = path
        .map(|p| format!("  →  {}", bold(&p.display().to_string())))
        .unwrap_or_default();
    eprintln!(
        "{}  {} labels  {}  {}ms{}",
        if output.job.dropped_labels == 0 {
            green("✔")
        } else {
            cyan("⚠")
        },
        output.label_count(),
        dim(&layout),
        output.stats.total_duration_ms,
        target,
    );
    if output.job.dropped_labels > 0 {
        eprintln!(
            "   {} labels past --max-labels were dropped",
            output.job.dropped_labels
        );
    }
}
