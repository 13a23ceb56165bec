//! Conversion results.
//!
//! [`ConversionOutput`] is what the `convert*` functions return: the ZPL
//! text plus a [`LabelJob`] describing what was decided along the way, and
//! timing in [`ConversionStats`]. Everything derives `serde` so the CLI can
//! print it with `--json`.

use crate::pipeline::classify::PageLayout;
use crate::pipeline::metadata::PageBox;
use crate::pipeline::quarter::Quadrant;
use serde::{Deserialize, Serialize};

/// Header line of a CGI response carrying ZPL.
pub const CGI_CONTENT_TYPE: &str = "Content-Type: text/plain";

/// Where one encoded fragment of the output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentSource {
    /// A cropped quadrant of an A4 sheet.
    Quadrant {
        /// 1-indexed page number.
        page_num: usize,
        quadrant: Quadrant,
        width_px: u32,
        height_px: u32,
    },
    /// The whole document rendered directly, one label per page.
    Document { dpi: u32 },
}

/// One encoded piece of the final ZPL, in output order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub source: FragmentSource,
    pub zpl_len: usize,
}

/// Everything decided for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelJob {
    /// Size of the input PDF in bytes.
    pub input_bytes: usize,
    /// Box of the first page.
    pub page_box: PageBox,
    pub layout: PageLayout,
    /// Encoded fragments, in the order they appear in the output.
    pub fragments: Vec<Fragment>,
    /// Non-blank quadrants past the label cap that were not encoded.
    pub dropped_labels: usize,
}

/// Timing of a conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total_duration_ms: u64,
    /// Time spent rasterising and quartering (A4 layout only).
    pub render_duration_ms: u64,
    pub encode_duration_ms: u64,
}

/// Output of a complete conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Concatenated ZPL for every label.
    pub zpl: String,
    pub job: LabelJob,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Number of `^XA … ^XZ` labels in the output.
    pub fn label_count(&self) -> usize {
        self.zpl.matches("^XA").count()
    }

    /// The ZPL framed as a CGI response: content-type header, blank line,
    /// body.
    pub fn to_cgi_response(&self) -> String {
        cgi_response(&self.zpl)
    }
}

/// What [`crate::inspect`] reports without rendering anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    /// Path as given, or `<stdin>`.
    pub source_name: String,
    pub input_bytes: usize,
    pub page_box: PageBox,
    pub layout: PageLayout,
}

/// Frame `body` as a `text/plain` CGI response.
pub fn cgi_response(body: &str) -> String {
    format!("{CGI_CONTENT_TYPE}\r\n\r\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(zpl: &str) -> ConversionOutput {
        ConversionOutput {
            zpl: zpl.to_string(),
            job: LabelJob {
                input_bytes: 1234,
                page_box: PageBox::new(0.0, 0.0, 306.0, 432.0, 1.0),
                layout: PageLayout::Direct { dpi: 195 },
                fragments: vec![Fragment {
                    source: FragmentSource::Document { dpi: 195 },
                    zpl_len: zpl.len(),
                }],
                dropped_labels: 0,
            },
            stats: ConversionStats::default(),
        }
    }

    #[test]
    fn cgi_response_has_crlf_header() {
        let out = output("^XA\n^XZ\n");
        assert_eq!(
            out.to_cgi_response(),
            "Content-Type: text/plain\r\n\r\n^XA\n^XZ\n"
        );
    }

    #[test]
    fn counts_labels() {
        assert_eq!(output("^XA\n^XZ\n^XA\n^XZ\n").label_count(), 2);
        assert_eq!(output("").label_count(), 0);
    }

    #[test]
    fn serialises_to_json() {
        let out = output("^XA\n^XZ\n");
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"Direct\""), "{json}");
        let back: ConversionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.job.input_bytes, 1234);
        assert_eq!(back.job.layout, PageLayout::Direct { dpi: 195 });
    }
}
