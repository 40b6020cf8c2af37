// SPDX-License-Identifier: MIT
//
// Perspective rectifier: flattens the user's crop quadrilateral into an
// axis-aligned page image via a projective transform.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};
use varaq_core::ScannerConfig;
use varaq_core::error::VaraqError;
use varaq_core::types::{CropQuad, DocumentType, RectifiedPage};

use crate::image::processor::ImageProcessor;

/// Produces flattened page images from captured frames.
///
/// ## Algorithm
///
/// 1. Convert the quad's percentage corners to absolute pixel coordinates
///    against the frame's true dimensions.
/// 2. Size the target rectangle from the quad's edge lengths:
///    width = max(top edge, bottom edge), height = max(left edge, right edge).
/// 3. Solve the projective transform mapping the source corners (TL, TR, BR,
///    BL) onto the target rectangle's corners.
/// 4. Resample through the transform with bilinear interpolation and constant
///    zero border fill.
/// 5. Encode the result as JPEG.
///
/// Output dimensions derive solely from the quad geometry. A degenerate or
/// self-intersecting quad warps to a degenerate or mirrored page rather than
/// being rejected; only a quad whose corners are collinear (no projective
/// transform exists at all) is reported as an error.
pub struct PageRectifier {
    /// JPEG quality (1-100) for encoded pages.
    jpeg_quality: u8,
}

impl PageRectifier {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.page_jpeg_quality)
    }

    /// Flatten the quadrilateral region of `frame` into a [`RectifiedPage`].
    #[instrument(skip(self, frame), fields(frame_w = frame.width(), frame_h = frame.height()))]
    pub fn rectify(
        &self,
        frame: &DynamicImage,
        quad: &CropQuad,
    ) -> Result<RectifiedPage, VaraqError> {
        let src = quad.to_pixels(frame.width(), frame.height());
        let [top_left, top_right, bottom_right, bottom_left] = src;

        let top = distance(top_left, top_right);
        let bottom = distance(bottom_left, bottom_right);
        let left = distance(top_left, bottom_left);
        let right = distance(top_right, bottom_right);

        let target_w = top.max(bottom).round().max(1.0);
        let target_h = left.max(right).round().max(1.0);

        debug!(target_w, target_h, "Target rectangle computed from quad edges");

        let dest: [(f32, f32); 4] = [
            (0.0, 0.0),
            (target_w, 0.0),
            (target_w, target_h),
            (0.0, target_h),
        ];

        let projection = match Projection::from_control_points(src, dest) {
            Some(p) => p,
            None => {
                warn!(?src, "Crop corners admit no projective transform");
                return Err(VaraqError::ImageError(
                    "crop corners are collinear; no projective transform exists".into(),
                ));
            }
        };

        let rgba_input = frame.to_rgba8();
        let border = Rgba([0u8, 0, 0, 0]);
        let mut output = RgbaImage::new(target_w as u32, target_h as u32);

        warp_into(
            &rgba_input,
            &projection,
            Interpolation::Bilinear,
            border,
            &mut output,
        );

        let width = output.width();
        let height = output.height();

        let data = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(output))
            .to_jpeg_bytes(self.jpeg_quality)?;
        let hash = hex::encode(Sha256::digest(&data));

        info!(width, height, bytes = data.len(), "Page rectified");

        Ok(RectifiedPage {
            data,
            format: DocumentType::Jpeg,
            width,
            height,
            hash,
        })
    }
}

/// Euclidean distance between two pixel-space points.
fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).hypot(a.1 - b.1)
}
