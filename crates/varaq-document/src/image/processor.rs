// SPDX-License-Identifier: MIT
//
// Image processor: decode, centered zoom crop, exact resize, and JPEG/PNG
// encoding. Operates on in-memory images using the `image` crate.

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument};
use varaq_core::error::VaraqError;

/// Image processing pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and returns
/// a new `ImageProcessor` wrapping the transformed image, enabling method
/// chaining.
///
/// ```ignore
/// let jpeg = ImageProcessor::from_bytes(&photo)?
///     .zoom_crop(2.0)
///     .to_jpeg_bytes(90)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, VaraqError> {
        let img = image::load_from_memory(data).map_err(|err| {
            VaraqError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Emulate digital zoom at capture time: crop the centered sub-rectangle
    /// of size `(width / zoom, height / zoom)` and scale it back up to the
    /// original dimensions.
    ///
    /// Zoom levels at or below 1.0 are a no-op.
    #[instrument(skip(self))]
    pub fn zoom_crop(self, zoom: f32) -> Self {
        if zoom <= 1.0 {
            return self;
        }

        let width = self.image.width();
        let height = self.image.height();
        let crop_w = ((width as f32 / zoom).round() as u32).max(1);
        let crop_h = ((height as f32 / zoom).round() as u32).max(1);
        let crop_x = (width - crop_w) / 2;
        let crop_y = (height - crop_h) / 2;

        info!(crop_x, crop_y, crop_w, crop_h, "Applying digital zoom crop");

        let cropped = self.image.crop_imm(crop_x, crop_y, crop_w, crop_h);
        let scaled = cropped.resize_exact(width, height, image::imageops::FilterType::Lanczos3);
        Self { image: scaled }
    }

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        let resized =
            self.image
                .resize_exact(width, height, image::imageops::FilterType::Lanczos3);
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, VaraqError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| VaraqError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, VaraqError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| VaraqError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), VaraqError> {
        self.image.save(path.as_ref()).map_err(|err| {
            VaraqError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}
