//! Page geometry of the first page: MediaBox and UserUnit.
//!
//! The layout decision needs nothing but the size of page 0, so it is read
//! with `lopdf` straight from the page tree. Binding pdfium just to look at
//! four numbers would make every test depend on the native library.

use crate::error::Pdf2ZplError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// MediaBox used when neither the page nor its ancestors define one
/// (US Letter, the PDF default).
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Guards against cyclic `Parent` links in broken page trees.
const MAX_TREE_DEPTH: usize = 64;

/// Physical box of a PDF page in default user-space units (1/72 in at
/// `user_unit == 1`).
///
/// Corners are normalised on construction, so `width()` and `height()` are
/// never negative even for boxes written as `[right top left bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
    pub user_unit: f64,
}

impl PageBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, user_unit: f64) -> Self {
        Self {
            left: x0.min(x1),
            bottom: y0.min(y1),
            right: x0.max(x1),
            top: y0.max(y1),
            user_unit,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Physical width in inches.
    pub fn width_in(&self) -> f64 {
        self.width() * self.user_unit / 72.0
    }

    /// Physical height in inches.
    pub fn height_in(&self) -> f64 {
        self.height() * self.user_unit / 72.0
    }
}

/// Reads the page box of the first page of a PDF held in memory.
pub trait PageBoxReader: Send + Sync {
    fn read_first_page_box(&self, pdf: &[u8]) -> Result<PageBox, Pdf2ZplError>;
}

/// [`PageBoxReader`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfPageBoxReader;

impl PageBoxReader for LopdfPageBoxReader {
    fn read_first_page_box(&self, pdf: &[u8]) -> Result<PageBox, Pdf2ZplError> {
        let document = Document::load_mem(pdf).map_err(corrupt)?;
        first_page_box(&document)
    }
}

/// Page box of page 0 of an already loaded document.
pub fn first_page_box(document: &Document) -> Result<PageBox, Pdf2ZplError> {
    let pages = document.get_pages();
    let (&first_number, &page_id) = pages.iter().next().ok_or(Pdf2ZplError::NoPages)?;
    debug!(pages = pages.len(), first = first_number, "Reading first page box");

    let media_box = match inherited(document, page_id, b"MediaBox")? {
        Some(obj) => parse_rectangle(document, obj)?,
        None => DEFAULT_MEDIA_BOX,
    };

    // UserUnit is not inheritable, only the page itself may carry it.
    let page = page_dict(document, page_id)?;
    let user_unit = match page.get(b"UserUnit") {
        Ok(obj) => number(resolve(document, obj)?)?,
        Err(_) => 1.0,
    };
    if !(user_unit.is_finite() && user_unit > 0.0) {
        return Err(Pdf2ZplError::CorruptPdf {
            detail: format!("invalid UserUnit {user_unit}"),
        });
    }

    let [x0, y0, x1, y1] = media_box;
    Ok(PageBox::new(x0, y0, x1, y1, user_unit))
}

fn corrupt(e: lopdf::Error) -> Pdf2ZplError {
    Pdf2ZplError::CorruptPdf {
        detail: e.to_string(),
    }
}

fn resolve<'a>(document: &'a Document, obj: &'a Object) -> Result<&'a Object, Pdf2ZplError> {
    match obj {
        Object::Reference(id) => document.get_object(*id).map_err(corrupt),
        other => Ok(other),
    }
}

fn page_dict(document: &Document, id: ObjectId) -> Result<&Dictionary, Pdf2ZplError> {
    document
        .get_object(id)
        .and_then(Object::as_dict)
        .map_err(corrupt)
}

/// Look up `key` on the page, then on each `Parent` node in turn.
fn inherited<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, Pdf2ZplError> {
    let mut node = page_dict(document, page_id)?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(obj) = node.get(key) {
            return resolve(document, obj).map(Some);
        }
        match node.get(b"Parent") {
            Ok(parent) => node = resolve(document, parent)?.as_dict().map_err(corrupt)?,
            Err(_) => return Ok(None),
        }
    }
    Err(Pdf2ZplError::CorruptPdf {
        detail: "page tree is deeper than expected or cyclic".into(),
    })
}

fn number(obj: &Object) -> Result<f64, Pdf2ZplError> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(r) => Ok(f64::from(*r)),
        other => Err(Pdf2ZplError::CorruptPdf {
            detail: format!("expected a number, found {other:?}"),
        }),
    }
}

fn parse_rectangle(document: &Document, obj: &Object) -> Result<[f64; 4], Pdf2ZplError> {
    let items = obj.as_array().map_err(corrupt)?;
    if items.len() != 4 {
        return Err(Pdf2ZplError::CorruptPdf {
            detail: format!("MediaBox has {} entries, expected 4", items.len()),
        });
    }
    let mut rect = [0.0; 4];
    for (slot, item) in rect.iter_mut().zip(items) {
        *slot = number(resolve(document, item)?)?;
    }
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Build a one-page PDF, optionally putting the MediaBox on the Pages
    /// node instead of the page.
    fn build_pdf(media_box: Option<Vec<Object>>, on_parent: bool, user_unit: Option<Object>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        };
        if let (Some(rect), false) = (&media_box, on_parent) {
            page.set("MediaBox", rect.clone());
        }
        if let Some(unit) = user_unit {
            page.set("UserUnit", unit);
        }
        let page_id = doc.add_object(page);

        let mut pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        if let (Some(rect), true) = (media_box, on_parent) {
            pages.set("MediaBox", rect);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("save pdf");
        buf
    }

    fn ints(v: [i64; 4]) -> Option<Vec<Object>> {
        Some(v.iter().map(|&i| Object::Integer(i)).collect())
    }

    #[test]
    fn reads_media_box_from_page() {
        let pdf = build_pdf(ints([0, 0, 595, 842]), false, None);
        let page = LopdfPageBoxReader.read_first_page_box(&pdf).unwrap();
        assert_eq!((page.width(), page.height()), (595.0, 842.0));
        assert_eq!(page.user_unit, 1.0);
    }

    #[test]
    fn inherits_media_box_from_pages_node() {
        let pdf = build_pdf(ints([0, 0, 306, 432]), true, None);
        let page = LopdfPageBoxReader.read_first_page_box(&pdf).unwrap();
        assert_eq!((page.width(), page.height()), (306.0, 432.0));
        assert!((page.width_in() - 4.25).abs() < 1e-9);
        assert!((page.height_in() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn reads_user_unit() {
        let pdf = build_pdf(ints([0, 0, 306, 432]), false, Some(Object::Integer(2)));
        let page = LopdfPageBoxReader.read_first_page_box(&pdf).unwrap();
        assert_eq!(page.user_unit, 2.0);
        assert!((page.width_in() - 8.5).abs() < 1e-9);
    }

    #[test]
    fn normalises_flipped_corners() {
        let pdf = build_pdf(ints([306, 432, 0, 0]), false, None);
        let page = LopdfPageBoxReader.read_first_page_box(&pdf).unwrap();
        assert_eq!((page.left, page.bottom), (0.0, 0.0));
        assert_eq!((page.width(), page.height()), (306.0, 432.0));
    }

    #[test]
    fn missing_media_box_defaults_to_letter() {
        let pdf = build_pdf(None, false, None);
        let page = LopdfPageBoxReader.read_first_page_box(&pdf).unwrap();
        assert_eq!((page.width(), page.height()), (612.0, 792.0));
    }

    #[test]
    fn short_media_box_is_corrupt() {
        let pdf = build_pdf(Some(vec![Object::Integer(0), Object::Integer(0)]), false, None);
        let err = LopdfPageBoxReader.read_first_page_box(&pdf).unwrap_err();
        assert!(matches!(err, Pdf2ZplError::CorruptPdf { .. }), "{err}");
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = LopdfPageBoxReader
            .read_first_page_box(b"%PDF-1.4 not really")
            .unwrap_err();
        assert!(matches!(err, Pdf2ZplError::CorruptPdf { .. }), "{err}");
    }

    #[test]
    fn page_box_width_in_inches() {
        let page = PageBox::new(0.0, 0.0, 595.0, 842.0, 1.0);
        assert!((page.width_in() - 595.0 / 72.0).abs() < 1e-12);
    }
}
