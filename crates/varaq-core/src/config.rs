// SPDX-License-Identifier: MIT
//
// Scanner configuration.

use serde::{Deserialize, Serialize};

use crate::types::QualityTier;

/// Persistent scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// JPEG quality (1–100) used when encoding rectified pages.
    pub page_jpeg_quality: u8,
    /// Upper bound for digital zoom when the camera has no hardware zoom.
    pub digital_zoom_max: f32,
    /// Default crop quad inset from each frame edge, in percent.
    pub crop_inset_pct: f32,
    /// Resolution assumed when sizing PDF pages from pixel dimensions.
    pub export_dpi: f32,
    /// Quality tier used when exporting without an explicit choice.
    pub default_export_quality: QualityTier,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            page_jpeg_quality: 90,
            digital_zoom_max: 4.0,
            crop_inset_pct: 10.0,
            export_dpi: 150.0,
            default_export_quality: QualityTier::High,
        }
    }
}
