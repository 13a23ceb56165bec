//! Conversion entry points.
//!
//! [`convert_bytes`] is the whole pipeline as a plain blocking function of
//! the input bytes and the configuration: read the first page box, pick a
//! layout, then either quarter the rendered A4 sheet into labels or hand the
//! document to the encoder at a DPI that fits the label. The `async`
//! wrappers only add input reading and move the work onto Tokio's blocking
//! pool, because pdfium rendering is CPU-bound.
//!
//! Every failure is fatal: a conversion either returns the ZPL for all
//! labels or an error, never a partial result.

use crate::config::ConversionConfig;
use crate::error::Pdf2ZplError;
use crate::output::{ConversionOutput, ConversionStats, Fragment, FragmentSource, Inspection, LabelJob};
use crate::pipeline::classify::{classify, PageLayout};
use crate::pipeline::encode::{GraphicFieldEncoder, ZplEncoder};
use crate::pipeline::input;
use crate::pipeline::metadata::{LopdfPageBoxReader, PageBoxReader};
use crate::pipeline::quarter::quarter_pages_to_images;
use crate::pipeline::render::{PdfiumRasterizer, Rasterizer};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Convert a PDF held in memory to ZPL.
///
/// # Errors
/// - [`Pdf2ZplError::CorruptPdf`] / [`Pdf2ZplError::NoPages`] when the first
///   page box cannot be read
/// - [`Pdf2ZplError::DegeneratePage`] when a non-A4 page cannot be fitted
/// - rasterizer and encoder errors, unchanged
pub fn convert_bytes(
    pdf: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    let total_start = Instant::now();
    let backends = Backends::resolve(config);

    // ── Step 1: Page geometry ────────────────────────────────────────────
    let page_box = backends.reader.read_first_page_box(pdf)?;
    info!(
        "Received pdf of size {:.1}kB, box: {},{},{},{} ({}x{}) user space units: {}",
        kib(pdf.len()),
        page_box.left,
        page_box.bottom,
        page_box.right,
        page_box.top,
        page_box.width(),
        page_box.height(),
        page_box.user_unit
    );

    // ── Step 2: Layout ───────────────────────────────────────────────────
    let layout = classify(&page_box, config)?;
    let options = config.encode_options();
    let mut job = LabelJob {
        input_bytes: pdf.len(),
        page_box,
        layout,
        fragments: Vec::new(),
        dropped_labels: 0,
    };
    let mut stats = ConversionStats::default();
    let mut zpl = String::new();

    // ── Step 3: Encode ───────────────────────────────────────────────────
    match layout {
        PageLayout::A4Quartered => {
            info!(
                "PDF of dimensions {}x{} is assumed to be A4",
                page_box.width(),
                page_box.height()
            );

            let render_start = Instant::now();
            let mut labels = quarter_pages_to_images(pdf, backends.rasterizer.as_ref(), config)?;
            stats.render_duration_ms = render_start.elapsed().as_millis() as u64;

            // Only one sheet of labels is printed per request.
            if labels.len() > config.max_labels {
                job.dropped_labels = labels.len() - config.max_labels;
                warn!(
                    "Dropping {} of {} labels, only the first {} are converted",
                    job.dropped_labels,
                    labels.len(),
                    config.max_labels
                );
                labels.truncate(config.max_labels);
            }

            let encode_start = Instant::now();
            for label in &labels {
                let fragment = backends.encoder.encode_image(&label.image, &options)?;
                job.fragments.push(Fragment {
                    source: FragmentSource::Quadrant {
                        page_num: label.page_index + 1,
                        quadrant: label.quadrant,
                        width_px: label.image.width(),
                        height_px: label.image.height(),
                    },
                    zpl_len: fragment.len(),
                });
                zpl.push_str(&fragment);
            }
            stats.encode_duration_ms = encode_start.elapsed().as_millis() as u64;
        }
        PageLayout::Direct { dpi } => {
            info!(
                "PDF of dimensions {}x{} is not assumed to be A4, convert directly to zpl with {} dpi",
                page_box.width(),
                page_box.height(),
                dpi
            );

            let encode_start = Instant::now();
            let fragment = backends.encoder.encode_pdf(pdf, &options, true, dpi)?;
            stats.encode_duration_ms = encode_start.elapsed().as_millis() as u64;

            job.fragments.push(Fragment {
                source: FragmentSource::Document { dpi },
                zpl_len: fragment.len(),
            });
            zpl = fragment;
        }
    }

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Conversion of PDF of size {:.1}kB to {:.1}kB of zpl took {}ms",
        kib(pdf.len()),
        kib(zpl.len()),
        stats.total_duration_ms
    );

    Ok(ConversionOutput { zpl, job, stats })
}

/// Convert a PDF file, or stdin when `input` is `-`, to ZPL.
///
/// This is the primary entry point for the library.
pub async fn convert(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    let input = input::read_input(input_str).await?;
    convert_from_bytes(input.bytes, config).await
}

/// Convert PDF bytes in memory to ZPL on the blocking pool.
///
/// # Example
/// ```rust,no_run
/// use pdf2zpl::{convert_from_bytes, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes: Vec<u8> = std::fs::read("label.pdf")?;
/// let output = convert_from_bytes(bytes, &ConversionConfig::default()).await?;
/// print!("{}", output.zpl);
/// # Ok(())
/// # }
/// ```
pub async fn convert_from_bytes(
    bytes: impl Into<Vec<u8>>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    let bytes = bytes.into();
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert_bytes(&bytes, &config))
        .await
        .map_err(|e| Pdf2ZplError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Convert a PDF and write the ZPL directly to a file.
///
/// Uses atomic write (temp file + rename) so a printer spool directory
/// never sees a half-written job.
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    let output = convert(input_str, config).await?;
    let path = output_path.as_ref();

    let write_failed = |source: std::io::Error| Pdf2ZplError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("zpl.tmp");
    tokio::fs::write(&tmp_path, &output.zpl)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_failed)?;

    Ok(output)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2ZplError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2ZplError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_str, config))
}

/// Read the first page box and report the layout, without rendering.
///
/// Does not need pdfium unless a custom page-box reader says otherwise.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<Inspection, Pdf2ZplError> {
    let input = input::read_input(input_str.as_ref()).await?;
    let reader = Backends::resolve(config).reader;
    let page_box = reader.read_first_page_box(&input.bytes)?;
    let layout = classify(&page_box, config)?;

    Ok(Inspection {
        source_name: input.source_name,
        input_bytes: input.bytes.len(),
        page_box,
        layout,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Collaborators for one conversion, from the config or the defaults.
///
/// The default encoder renders through the resolved rasterizer, so a
/// custom rasterizer is used by both layouts.
struct Backends {
    reader: Arc<dyn PageBoxReader>,
    rasterizer: Arc<dyn Rasterizer>,
    encoder: Arc<dyn ZplEncoder>,
}

impl Backends {
    fn resolve(config: &ConversionConfig) -> Self {
        let reader = config
            .page_box_reader
            .clone()
            .unwrap_or_else(|| Arc::new(LopdfPageBoxReader) as Arc<dyn PageBoxReader>);
        let rasterizer = config
            .rasterizer
            .clone()
            .unwrap_or_else(|| Arc::new(PdfiumRasterizer) as Arc<dyn Rasterizer>);
        let encoder = config.encoder.clone().unwrap_or_else(|| {
            Arc::new(GraphicFieldEncoder::new(Arc::clone(&rasterizer))) as Arc<dyn ZplEncoder>
        });
        Self {
            reader,
            rasterizer,
            encoder,
        }
    }
}

fn kib(len: usize) -> f64 {
    len as f64 / 1024.0
}
