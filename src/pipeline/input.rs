//! Input resolution: read a PDF from a local path or from stdin.
//!
//! Print servers usually pipe the document in (`pdf2zpl - < label.pdf`), so
//! `-` means stdin. Everything is read into memory before conversion starts;
//! pdfium and lopdf both work from a byte slice. The `%PDF` marker is checked
//! up front so callers get a meaningful error rather than a parser failure.

use crate::error::Pdf2ZplError;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// The input string that selects stdin.
pub const STDIN: &str = "-";

/// Readers accept a `%PDF` header anywhere in the first kilobyte.
const HEADER_WINDOW: usize = 1024;

/// A fully read input document.
#[derive(Debug, Clone)]
pub struct PdfInput {
    /// Path as given, or `<stdin>`.
    pub source_name: String,
    pub bytes: Vec<u8>,
}

/// Check if the input string selects stdin.
pub fn is_stdin(input: &str) -> bool {
    input == STDIN
}

/// Read the document named by `input` (`-` for stdin).
pub async fn read_input(input: &str) -> Result<PdfInput, Pdf2ZplError> {
    let (source_name, bytes) = if is_stdin(input) {
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| Pdf2ZplError::ReadFailed {
                source_name: "<stdin>".into(),
                source: e,
            })?;
        ("<stdin>".to_string(), bytes)
    } else {
        let path = PathBuf::from(input);
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Pdf2ZplError::FileNotFound { path: path.clone() },
            std::io::ErrorKind::PermissionDenied => {
                Pdf2ZplError::PermissionDenied { path: path.clone() }
            }
            _ => Pdf2ZplError::ReadFailed {
                source_name: input.to_string(),
                source: e,
            },
        })?;
        (input.to_string(), bytes)
    };

    check_pdf_header(&source_name, &bytes)?;
    debug!("Read {} bytes from {}", bytes.len(), source_name);
    Ok(PdfInput { source_name, bytes })
}

/// Fail with [`Pdf2ZplError::NotAPdf`] unless `%PDF` appears in the first
/// kilobyte of `bytes`.
pub fn check_pdf_header(source_name: &str, bytes: &[u8]) -> Result<(), Pdf2ZplError> {
    let window = &bytes[..bytes.len().min(HEADER_WINDOW)];
    if window.windows(4).any(|w| w == b"%PDF") {
        return Ok(());
    }
    Err(Pdf2ZplError::NotAPdf {
        source_name: source_name.to_string(),
        magic: bytes.iter().take(4).copied().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_stdin() {
        assert!(is_stdin("-"));
        assert!(!is_stdin("--"));
        assert!(!is_stdin("label.pdf"));
        assert!(!is_stdin(""));
    }

    #[test]
    fn header_at_start_or_after_junk() {
        assert!(check_pdf_header("a", b"%PDF-1.7\n").is_ok());
        assert!(check_pdf_header("b", b"\xEF\xBB\xBF%PDF-1.4").is_ok());
    }

    #[test]
    fn header_missing_or_too_late() {
        let err = check_pdf_header("x.png", b"\x89PNG\r\n").unwrap_err();
        match err {
            Pdf2ZplError::NotAPdf { magic, .. } => assert_eq!(magic, b"\x89PNG".to_vec()),
            other => panic!("unexpected {other:?}"),
        }

        let mut late = vec![b' '; HEADER_WINDOW];
        late.extend_from_slice(b"%PDF-1.4");
        assert!(check_pdf_header("late", &late).is_err());
        assert!(check_pdf_header("empty", b"").is_err());
    }

    #[tokio::test]
    async fn reads_local_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.4\n%%EOF\n").unwrap();
        let input = read_input(tmp.path().to_str().unwrap()).await.unwrap();
        assert_eq!(input.bytes, b"%PDF-1.4\n%%EOF\n");
        assert_eq!(input.source_name, tmp.path().to_str().unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = read_input("/definitely/not/a/real/label.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2ZplError::FileNotFound { .. }));
    }
}
