// SPDX-License-Identifier: MIT
//
// PDF reader: sniff, open, and inspect existing PDF documents using the
// `lopdf` crate, and import them as ready-made scan pages.

use lopdf::{Document, Object, ObjectId};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};
use varaq_core::error::VaraqError;
use varaq_core::types::{DocumentType, RectifiedPage};

/// US Letter in points, used when a PDF carries no media box at all.
const DEFAULT_MEDIA_BOX: (f32, f32) = (612.0, 792.0);

/// Returns true if `data` starts with the PDF magic bytes.
pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF-")
}

/// Reads existing PDF files.
///
/// Wraps `lopdf::Document` for inspection of documents picked from the
/// gallery; imported PDFs are never re-rendered, only validated and measured.
#[derive(Debug)]
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, VaraqError> {
        let document = Document::load_mem(data).map_err(|err| {
            VaraqError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Media box of a page (1-indexed) in points, falling back to the size
    /// inherited from the page tree or US Letter.
    pub fn page_size(&self, page_number: u32) -> Result<(f32, f32), VaraqError> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page_number).ok_or_else(|| {
            VaraqError::PdfError(format!(
                "page {} not found (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        Ok(self
            .media_box(page_id)
            .unwrap_or(DEFAULT_MEDIA_BOX))
    }

    /// Walk from a page object up its /Parent chain looking for /MediaBox.
    fn media_box(&self, mut object_id: ObjectId) -> Option<(f32, f32)> {
        for _ in 0..8 {
            let dict = self.document.get_dictionary(object_id).ok()?;
            if let Ok(Object::Array(values)) = dict.get(b"MediaBox") {
                if values.len() == 4 {
                    let x0 = values[0].as_float().ok()?;
                    let y0 = values[1].as_float().ok()?;
                    let x1 = values[2].as_float().ok()?;
                    let y1 = values[3].as_float().ok()?;
                    return Some(((x1 - x0).abs(), (y1 - y0).abs()));
                }
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => object_id = *parent,
                _ => return None,
            }
        }
        None
    }
}

/// Import a picked PDF as a finished scan page.
///
/// The bytes are validated and measured but never re-rendered; the page
/// carries the original PDF verbatim. Dimensions are the first page's media
/// box in points, rounded.
#[instrument(skip_all, fields(bytes_len = data.len()))]
pub fn import_pdf_page(data: Vec<u8>) -> Result<RectifiedPage, VaraqError> {
    let reader = PdfReader::from_bytes(&data)?;
    if reader.page_count() == 0 {
        return Err(VaraqError::PdfError("PDF has no pages".to_string()));
    }

    let (width_pt, height_pt) = reader.page_size(1)?;
    let hash = hex::encode(Sha256::digest(&data));

    debug!(
        pages = reader.page_count(),
        width_pt, height_pt, "PDF imported as scan page"
    );

    Ok(RectifiedPage {
        data,
        format: DocumentType::Pdf,
        width: width_pt.round() as u32,
        height: height_pt.round() as u32,
        hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::writer::{EncodedPage, PdfWriter};
    use crate::image::processor::ImageProcessor;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn sample_pdf(pages: usize) -> Vec<u8> {
        let img = RgbaImage::from_pixel(300, 300, Rgba([90, 90, 90, 255]));
        let data = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(img))
            .to_jpeg_bytes(80)
            .unwrap();
        let encoded: Vec<EncodedPage> = (0..pages)
            .map(|_| EncodedPage {
                data: data.clone(),
                width: 300,
                height: 300,
            })
            .collect();
        PdfWriter::new(150.0).write("Sample", &encoded).unwrap()
    }

    #[test]
    fn sniffs_pdf_magic() {
        assert!(is_pdf(b"%PDF-1.5\n..."));
        assert!(!is_pdf(&[0xFF, 0xD8, 0xFF]));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn counts_pages() {
        let reader = PdfReader::from_bytes(&sample_pdf(3)).unwrap();
        assert_eq!(reader.page_count(), 3);
    }

    #[test]
    fn rejects_garbage_bytes() {
        let err = PdfReader::from_bytes(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, VaraqError::PdfError(_)));
    }

    /// Imported PDFs pass through byte for byte.
    #[test]
    fn import_keeps_bytes_verbatim() {
        let original = sample_pdf(1);
        let page = import_pdf_page(original.clone()).unwrap();

        assert_eq!(page.data, original);
        assert_eq!(page.format, DocumentType::Pdf);
        assert_eq!(page.hash, hex::encode(Sha256::digest(&original)));
        // 300 px at 150 dpi is 2 inches = 144 points.
        assert_eq!((page.width, page.height), (144, 144));
    }
}
