// SPDX-License-Identifier: MIT
//
// varaq-document — Document processing for the Varaq scanner.
//
// Provides image operations (decode, centered zoom crop, encode), the
// perspective rectifier that flattens a crop quadrilateral into a page, and
// PDF reading/writing for multi-page export.

pub mod export;
pub mod image;
pub mod pdf;
pub mod rectify;

// Re-export the primary structs so callers can use `varaq_document::PageRectifier` etc.
pub use self::export::{DocumentExporter, ExportArtifact};
pub use self::image::processor::ImageProcessor;
pub use self::pdf::reader::{PdfReader, import_pdf_page, is_pdf};
pub use self::pdf::writer::{EncodedPage, PdfWriter};
pub use self::rectify::PageRectifier;
