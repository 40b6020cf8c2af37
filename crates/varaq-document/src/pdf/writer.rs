// SPDX-License-Identifier: MIT
//
// PDF writer: assembles scanned pages into a multi-page PDF using the
// `lopdf` crate. Each page's JPEG bytes are embedded verbatim as a
// DCTDecode image XObject, so the encoded size of the input directly
// determines the size of the output file.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use tracing::{debug, info, instrument};
use varaq_core::error::VaraqError;

/// A JPEG-encoded page ready for PDF embedding.
pub struct EncodedPage {
    /// JPEG bytes, embedded into the PDF unmodified.
    pub data: Vec<u8>,
    /// Pixel width of the decoded image.
    pub width: u32,
    /// Pixel height of the decoded image.
    pub height: u32,
}

/// Writes multi-page PDFs where each page is a single full-bleed image.
///
/// Page dimensions are derived per page from the image's pixel size and the
/// writer's DPI, so every page keeps its own aspect ratio. The image is drawn
/// to fill the entire media box with no margins.
pub struct PdfWriter {
    /// Pixels per inch used to map image dimensions to page points.
    dpi: f32,
}

impl PdfWriter {
    pub fn new(dpi: f32) -> Self {
        Self { dpi }
    }

    /// Build a PDF with one page per entry in `pages`, in order.
    ///
    /// Returns the serialised PDF bytes. Fails if `pages` is empty.
    #[instrument(skip(self, pages), fields(page_count = pages.len()))]
    pub fn write(&self, title: &str, pages: &[EncodedPage]) -> Result<Vec<u8>, VaraqError> {
        if pages.is_empty() {
            return Err(VaraqError::PdfError(
                "cannot build a PDF with no pages".to_string(),
            ));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let page_id = self.add_image_page(&mut doc, pages_id, page)?;
            kids.push(Object::Reference(page_id));
            debug!(
                page = index + 1,
                width = page.width,
                height = page.height,
                jpeg_bytes = page.data.len(),
                "Page added"
            );
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        };
        doc.objects
            .insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal("varaq"),
        });

        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| {
            VaraqError::PdfError(format!("failed to serialise PDF: {}", err))
        })?;

        info!(
            pages = pages.len(),
            output_bytes = output.len(),
            "PDF assembled"
        );
        Ok(output)
    }

    /// Add a single page drawing `page`'s JPEG full-bleed, returning the page
    /// object's ID. The caller owns wiring the ID into the /Pages tree.
    fn add_image_page(
        &self,
        doc: &mut Document,
        pages_id: lopdf::ObjectId,
        page: &EncodedPage,
    ) -> Result<lopdf::ObjectId, VaraqError> {
        let width_pt = page.width as f32 / self.dpi * 72.0;
        let height_pt = page.height as f32 / self.dpi * 72.0;

        // JPEG bytes go into the stream untouched; DCTDecode tells the viewer
        // the stream already is a JPEG. Compression stays off so lopdf never
        // re-encodes the payload.
        let image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => page.width as i64,
            "Height" => page.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        let image_id =
            doc.add_object(Stream::new(image_dict, page.data.clone()).with_compression(false));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(width_pt),
                        0.into(),
                        0.into(),
                        Object::Real(height_pt),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content.encode().map_err(|err| {
            VaraqError::PdfError(format!("failed to encode page content: {}", err))
        })?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content_bytes));

        let resources = dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(width_pt),
                Object::Real(height_pt),
            ],
            "Resources" => resources,
            "Contents" => content_id,
        });

        Ok(page_id)
    }
}
