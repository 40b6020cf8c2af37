// SPDX-License-Identifier: MIT
//
// Core domain types for the Varaq document scanner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a finalized scanned document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encoded formats a page or upload can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentType {
    /// MIME type string for uploads and share payloads.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Whether this format is a raster image (as opposed to a paginated
    /// document file).
    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

/// A corner point in percentage coordinates (0–100) of the displayed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The four user-adjustable corner points marking a document's boundary.
///
/// Order is fixed: top-left, top-right, bottom-right, bottom-left. The
/// rectifier relies on this order to map corners; no convexity or
/// self-intersection check is performed, so a reversed or crossed quad warps
/// to whatever the projective math produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropQuad {
    pub points: [Point; 4],
}

impl CropQuad {
    /// A quad inset from each frame edge by `margin_pct` percent.
    ///
    /// `margin_pct` of 10 gives the 10%/90% default the scanner starts with.
    pub fn inset(margin_pct: f32) -> Self {
        let lo = margin_pct;
        let hi = 100.0 - margin_pct;
        Self {
            points: [
                Point::new(lo, lo),
                Point::new(hi, lo),
                Point::new(hi, hi),
                Point::new(lo, hi),
            ],
        }
    }

    /// Move one corner to a new position, clamping each axis to [0, 100].
    /// The other three corners are untouched. Out-of-range indices are
    /// ignored.
    pub fn move_point(&mut self, index: usize, x: f32, y: f32) {
        if index >= self.points.len() {
            return;
        }
        self.points[index] = Point::new(x.clamp(0.0, 100.0), y.clamp(0.0, 100.0));
    }

    /// Convert the percentage corners into absolute pixel coordinates for a
    /// frame of the given dimensions, in TL, TR, BR, BL order.
    pub fn to_pixels(&self, frame_width: u32, frame_height: u32) -> [(f32, f32); 4] {
        let w = frame_width as f32;
        let h = frame_height as f32;
        let px = |p: &Point| (p.x * w / 100.0, p.y * h / 100.0);
        [
            px(&self.points[0]),
            px(&self.points[1]),
            px(&self.points[2]),
            px(&self.points[3]),
        ]
    }
}

impl Default for CropQuad {
    fn default() -> Self {
        Self::inset(10.0)
    }
}

/// Zoom bounds negotiated with the camera, or the digital fallback range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
}

impl ZoomRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Digital-zoom fallback range starting at 1x.
    pub fn digital(max: f32) -> Self {
        Self { min: 1.0, max }
    }

    /// Clamp a requested zoom level into this range.
    pub fn clamp(&self, level: f32) -> f32 {
        level.clamp(self.min, self.max)
    }
}

/// Export quality tiers mapped to JPEG encoder quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    /// JPEG quality (1–100) for this tier.
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            Self::Low => 40,
            Self::Medium => 70,
            Self::High => 100,
        }
    }
}

/// One flattened, perspective-corrected page. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectifiedPage {
    /// Encoded page bytes (JPEG for rectified captures, PDF for imported
    /// paginated files).
    pub data: Vec<u8>,
    pub format: DocumentType,
    /// Pixel dimensions; zero for non-raster sources.
    pub width: u32,
    pub height: u32,
    /// SHA-256 hash of `data`, hex-encoded.
    pub hash: String,
}

/// The finalized, named, timestamped multi-page artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedDocument {
    pub id: DocumentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub pages: Vec<RectifiedPage>,
}

impl ScannedDocument {
    /// Finalize pages under a name, stamping a fresh id and creation time.
    pub fn new(name: String, pages: Vec<RectifiedPage>) -> Self {
        Self {
            id: DocumentId::new(),
            name,
            created_at: Utc::now(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quad_is_ten_percent_inset() {
        let quad = CropQuad::default();
        assert_eq!(quad.points[0], Point::new(10.0, 10.0));
        assert_eq!(quad.points[1], Point::new(90.0, 10.0));
        assert_eq!(quad.points[2], Point::new(90.0, 90.0));
        assert_eq!(quad.points[3], Point::new(10.0, 90.0));
    }

    #[test]
    fn move_point_clamps_to_percent_bounds() {
        let mut quad = CropQuad::default();
        quad.move_point(0, -25.0, 140.0);
        assert_eq!(quad.points[0], Point::new(0.0, 100.0));
        // Other corners untouched.
        assert_eq!(quad.points[1], Point::new(90.0, 10.0));
    }

    #[test]
    fn move_point_ignores_out_of_range_index() {
        let mut quad = CropQuad::default();
        let before = quad;
        quad.move_point(4, 50.0, 50.0);
        assert_eq!(quad, before);
    }

    #[test]
    fn to_pixels_scales_by_frame_dimensions() {
        let quad = CropQuad::inset(10.0);
        let px = quad.to_pixels(1000, 500);
        assert_eq!(px[0], (100.0, 50.0));
        assert_eq!(px[2], (900.0, 450.0));
    }

    #[test]
    fn zoom_range_clamps_both_ends() {
        let range = ZoomRange::digital(4.0);
        assert_eq!(range.clamp(0.5), 1.0);
        assert_eq!(range.clamp(2.5), 2.5);
        assert_eq!(range.clamp(9.0), 4.0);
    }

    #[test]
    fn quality_tiers_are_ordered() {
        assert!(QualityTier::Low.jpeg_quality() < QualityTier::Medium.jpeg_quality());
        assert!(QualityTier::Medium.jpeg_quality() < QualityTier::High.jpeg_quality());
    }

    #[test]
    fn document_type_from_extension() {
        assert_eq!(DocumentType::from_extension("JPG"), Some(DocumentType::Jpeg));
        assert_eq!(DocumentType::from_extension("pdf"), Some(DocumentType::Pdf));
        assert_eq!(DocumentType::from_extension("docx"), None);
    }
}
