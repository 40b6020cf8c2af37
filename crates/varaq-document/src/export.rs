// SPDX-License-Identifier: MIT
//
// Document export: turns an accumulated scan session into shareable files.
// Raster pages are re-encoded at the selected quality tier and combined into
// one multi-page PDF; pages that were imported as PDFs pass through verbatim.

use tracing::{debug, info, instrument};
use varaq_core::error::VaraqError;
use varaq_core::types::{DocumentType, QualityTier, ScannedDocument};

use crate::image::processor::ImageProcessor;
use crate::pdf::writer::{EncodedPage, PdfWriter};

/// A single exported file ready to share, save, or upload.
#[derive(Debug)]
pub struct ExportArtifact {
    /// Suggested filename, already sanitised for the filesystem.
    pub filename: String,
    /// File kind, used for MIME type selection.
    pub kind: DocumentType,
    /// File contents.
    pub data: Vec<u8>,
}

impl ExportArtifact {
    /// MIME type for share sheets and uploads.
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

/// Exports scanned documents as PDF artifacts.
///
/// Scanned (raster) pages are decoded, re-encoded as JPEG at the quality
/// tier's setting, and assembled into a single PDF where each page is sized
/// to its own image's aspect ratio. Pages whose source was an imported PDF
/// are emitted as separate artifacts with their original bytes, never
/// re-rendered.
pub struct DocumentExporter {
    writer: PdfWriter,
}

impl DocumentExporter {
    pub fn new(dpi: f32) -> Self {
        Self {
            writer: PdfWriter::new(dpi),
        }
    }

    /// Export `document` at the given quality tier.
    ///
    /// The combined PDF of raster pages (if any) comes first, followed by
    /// pass-through PDF pages in page order.
    #[instrument(skip(self, document), fields(document_id = %document.id, pages = document.page_count()))]
    pub fn export(
        &self,
        document: &ScannedDocument,
        quality: QualityTier,
    ) -> Result<Vec<ExportArtifact>, VaraqError> {
        if document.pages.is_empty() {
            return Err(VaraqError::ExportError(
                "document has no pages".to_string(),
            ));
        }

        let base_name = sanitize_filename(&document.name);
        let mut artifacts = Vec::new();

        let mut raster_pages = Vec::new();
        let mut passthrough = Vec::new();
        for (index, page) in document.pages.iter().enumerate() {
            if page.format.is_raster() {
                raster_pages.push(page);
            } else {
                passthrough.push((index, page));
            }
        }

        if !raster_pages.is_empty() {
            let jpeg_quality = quality.jpeg_quality();
            let mut encoded = Vec::with_capacity(raster_pages.len());
            for page in &raster_pages {
                let processor = ImageProcessor::from_bytes(&page.data)?;
                let (width, height) = (processor.width(), processor.height());
                let data = processor.to_jpeg_bytes(jpeg_quality)?;
                encoded.push(EncodedPage {
                    data,
                    width,
                    height,
                });
            }

            let pdf = self.writer.write(&document.name, &encoded)?;
            debug!(
                raster_pages = encoded.len(),
                jpeg_quality,
                pdf_bytes = pdf.len(),
                "Raster pages combined"
            );
            artifacts.push(ExportArtifact {
                filename: format!("{}.pdf", base_name),
                kind: DocumentType::Pdf,
                data: pdf,
            });
        }

        for (index, page) in passthrough {
            artifacts.push(ExportArtifact {
                filename: format!("{}_page{}.pdf", base_name, index + 1),
                kind: DocumentType::Pdf,
                data: page.data.clone(),
            });
        }

        info!(artifacts = artifacts.len(), "Document exported");
        Ok(artifacts)
    }
}

/// Replace filesystem-hostile characters with underscores.
///
/// Keeps alphanumerics, dash, underscore, and dot; everything else (spaces,
/// slashes, colons) becomes `_`. An empty or all-hostile name falls back to
/// "document".
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '_') || cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
