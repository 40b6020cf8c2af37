// SPDX-License-Identifier: MIT
//
// Scanner controller: an explicit state machine driving the scan workflow
// through idle, camera, crop, processing, and review stages. Every operation
// is legal only in specific stages; illegal calls fail with a stage mismatch
// instead of corrupting the workflow.

use tracing::{debug, info, instrument, warn};
use varaq_core::ScannerConfig;
use varaq_core::error::{Result, VaraqError};
use varaq_core::human_errors::{HumanError, humanize_error};
use varaq_core::types::{CropQuad, ScannedDocument};
use varaq_bridge::traits::{CameraDevice, GalleryPicker};
use varaq_document::{PageRectifier, import_pdf_page, is_pdf};

use crate::capture::{CaptureController, CapturedFrame};
use crate::session::ScanSession;

/// Workflow stages.
///
/// ```text
/// Idle -> Camera -> Crop -> Processing -> Review -> Idle
///           ^________________|             |
///           |_______________________________|
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    /// Nothing in progress.
    Idle,
    /// Live camera preview with zoom.
    Camera,
    /// A frame is held and the user adjusts the crop quad.
    Crop,
    /// Rectification in progress; no operations accepted.
    Processing,
    /// Session pages visible; user can rescan, rename, remove, or finish.
    Review,
}

impl ScanStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Camera => "camera",
            Self::Crop => "crop",
            Self::Processing => "processing",
            Self::Review => "review",
        }
    }
}

/// Drives one scanning flow from first capture to the finished document.
pub struct ScannerController {
    stage: ScanStage,
    capture: CaptureController,
    rectifier: PageRectifier,
    frame: Option<CapturedFrame>,
    quad: CropQuad,
    session: ScanSession,
    config: ScannerConfig,
    last_error: Option<HumanError>,
}

impl ScannerController {
    pub fn new(devices: Vec<Box<dyn CameraDevice>>, config: ScannerConfig) -> Self {
        Self {
            stage: ScanStage::Idle,
            capture: CaptureController::new(devices, config.digital_zoom_max),
            rectifier: PageRectifier::from_config(&config),
            frame: None,
            quad: CropQuad::inset(config.crop_inset_pct),
            session: ScanSession::new(),
            config,
            last_error: None,
        }
    }

    // -- Observation ----------------------------------------------------------

    pub fn stage(&self) -> ScanStage {
        self.stage
    }

    pub fn quad(&self) -> &CropQuad {
        &self.quad
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn zoom(&self) -> f32 {
        self.capture.zoom()
    }

    /// The most recent user-facing error, cleared by the next successful
    /// stage transition.
    pub fn last_error(&self) -> Option<&HumanError> {
        self.last_error.as_ref()
    }

    // -- Camera stage ---------------------------------------------------------

    /// Open the camera preview. Legal from idle, review, or crop (rescan).
    #[instrument(skip(self))]
    pub fn open_camera(&mut self) -> Result<()> {
        self.require_stage(&[ScanStage::Idle, ScanStage::Review, ScanStage::Crop], "open_camera")?;

        match self.capture.start() {
            Ok(()) => {
                self.enter(ScanStage::Camera);
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(humanize_error(&err));
                self.stage = ScanStage::Idle;
                warn!(%err, "Camera failed to open");
                Err(err)
            }
        }
    }

    /// Set the zoom level. Ignored outside the camera stage.
    pub fn set_zoom(&mut self, level: f32) {
        if self.stage == ScanStage::Camera {
            self.capture.set_zoom(level);
        }
    }

    /// Pinch-zoom gesture. Ignored outside the camera stage.
    pub fn pinch_zoom(&mut self, start_zoom: f32, start_distance: f32, current_distance: f32) {
        if self.stage == ScanStage::Camera {
            self.capture
                .pinch_zoom(start_zoom, start_distance, current_distance);
        }
    }

    /// Cycle to the next camera device.
    pub fn switch_camera(&mut self) -> Result<()> {
        self.require_stage(&[ScanStage::Camera], "switch_camera")?;
        self.capture.switch_camera()
    }

    /// Take the photo and move to the crop stage with the default inset quad.
    #[instrument(skip(self))]
    pub fn capture(&mut self) -> Result<()> {
        self.require_stage(&[ScanStage::Camera], "capture")?;

        let frame = self.capture.capture_photo()?;
        self.frame = Some(frame);
        self.quad = CropQuad::inset(self.config.crop_inset_pct);
        self.enter(ScanStage::Crop);
        Ok(())
    }

    /// Leave the camera without capturing. Lands in review if the session
    /// already holds pages, otherwise back to idle.
    pub fn close_camera(&mut self) -> Result<()> {
        self.require_stage(&[ScanStage::Camera], "close_camera")?;

        self.capture.stop();
        if self.session.is_empty() {
            self.enter(ScanStage::Idle);
        } else {
            self.enter(ScanStage::Review);
        }
        Ok(())
    }

    // -- Gallery import -------------------------------------------------------

    /// Import picked bytes. PDFs join the session as finished pages and land
    /// in review; raster images go through the crop stage like a capture.
    #[instrument(skip(self, data), fields(bytes_len = data.len()))]
    pub fn import_from_gallery(&mut self, data: Vec<u8>) -> Result<()> {
        self.require_stage(
            &[ScanStage::Idle, ScanStage::Camera, ScanStage::Review],
            "import_from_gallery",
        )?;

        if self.stage == ScanStage::Camera {
            self.capture.stop();
        }

        if is_pdf(&data) {
            let page = import_pdf_page(data)?;
            self.session.add_page(page);
            self.enter(ScanStage::Review);
            return Ok(());
        }

        let frame = CapturedFrame::from_bytes(&data)?;
        self.frame = Some(frame);
        self.quad = CropQuad::inset(self.config.crop_inset_pct);
        self.enter(ScanStage::Crop);
        Ok(())
    }

    /// Show the host's picker and import the result.
    ///
    /// Returns `Ok(false)` when the user cancelled.
    pub fn import_from_picker(&mut self, picker: &dyn GalleryPicker) -> Result<bool> {
        match picker.pick_file()? {
            Some(data) => {
                self.import_from_gallery(data)?;
                Ok(true)
            }
            None => {
                debug!("Gallery pick cancelled");
                Ok(false)
            }
        }
    }

    // -- Crop stage -----------------------------------------------------------

    /// Drag one crop corner. Coordinates clamp to the frame.
    pub fn move_crop_point(&mut self, index: usize, x: f32, y: f32) -> Result<()> {
        self.require_stage(&[ScanStage::Crop], "move_crop_point")?;
        self.quad.move_point(index, x, y);
        Ok(())
    }

    /// Rectify the held frame through the current quad and add the result to
    /// the session. On failure the crop stage is restored so the user can
    /// adjust and retry.
    #[instrument(skip(self))]
    pub fn confirm_crop(&mut self) -> Result<()> {
        self.require_stage(&[ScanStage::Crop], "confirm_crop")?;

        let frame = self.frame.as_ref().ok_or(VaraqError::NoCapturedFrame)?;
        self.stage = ScanStage::Processing;

        match self.rectifier.rectify(&frame.image, &self.quad) {
            Ok(page) => {
                self.session.add_page(page);
                self.frame = None;
                self.enter(ScanStage::Review);
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(humanize_error(&err));
                self.stage = ScanStage::Crop;
                warn!(%err, "Rectification failed, back to crop");
                Err(err)
            }
        }
    }

    /// Discard the held frame and leave the crop stage.
    pub fn cancel_crop(&mut self) -> Result<()> {
        self.require_stage(&[ScanStage::Crop], "cancel_crop")?;
        self.frame = None;
        if self.session.is_empty() {
            self.enter(ScanStage::Idle);
        } else {
            self.enter(ScanStage::Review);
        }
        Ok(())
    }

    // -- Review stage ---------------------------------------------------------

    pub fn set_document_name(&mut self, name: &str) {
        self.session.set_name(name);
    }

    /// Remove a session page during review.
    pub fn remove_page(&mut self, index: usize) -> Result<()> {
        self.require_stage(&[ScanStage::Review], "remove_page")?;
        self.session.remove_page(index);
        if self.session.is_empty() {
            self.enter(ScanStage::Idle);
        }
        Ok(())
    }

    /// Finalize the session. Only legal in review; an empty session (already
    /// impossible in review) would yield `None`.
    pub fn finish(&mut self) -> Option<ScannedDocument> {
        if self.stage != ScanStage::Review {
            debug!(stage = self.stage.name(), "Finish ignored outside review");
            return None;
        }

        let document = self.session.finish()?;
        self.enter(ScanStage::Idle);
        Some(document)
    }

    // -- Helpers --------------------------------------------------------------

    fn enter(&mut self, stage: ScanStage) {
        info!(from = self.stage.name(), to = stage.name(), "Stage transition");
        self.stage = stage;
        self.last_error = None;
    }

    fn require_stage(&self, allowed: &[ScanStage], operation: &'static str) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(VaraqError::StageMismatch {
                stage: self.stage.name(),
                operation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use varaq_bridge::{FixedCamera, MemoryPicker};
    use varaq_core::human_errors::Severity;
    use varaq_document::{ImageProcessor, PdfReader};

    fn document_frame() -> RgbaImage {
        RgbaImage::from_fn(800, 600, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
        })
    }

    fn controller() -> ScannerController {
        let camera = FixedCamera::new("fixture", document_frame());
        ScannerController::new(vec![Box::new(camera)], ScannerConfig::default())
    }

    fn sample_pdf() -> Vec<u8> {
        use varaq_document::{EncodedPage, PdfWriter};
        let jpeg = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(document_frame()))
            .to_jpeg_bytes(80)
            .unwrap();
        PdfWriter::new(150.0)
            .write(
                "Picked",
                &[EncodedPage {
                    data: jpeg,
                    width: 800,
                    height: 600,
                }],
            )
            .unwrap()
    }

    /// Two captures with different quads produce a two-page document with
    /// pages in capture order and a default name carrying the count.
    #[test]
    fn two_capture_flow_produces_two_page_document() {
        let mut controller = controller();

        controller.open_camera().unwrap();
        controller.capture().unwrap();
        assert_eq!(controller.stage(), ScanStage::Crop);
        controller.confirm_crop().unwrap();
        assert_eq!(controller.stage(), ScanStage::Review);

        controller.open_camera().unwrap();
        controller.capture().unwrap();
        controller.move_crop_point(2, 70.0, 80.0).unwrap();
        controller.confirm_crop().unwrap();

        let first_hash = controller.session().pages()[0].hash.clone();
        let document = controller.finish().unwrap();

        assert_eq!(document.page_count(), 2);
        assert_eq!(document.pages[0].hash, first_hash);
        assert!(document.name.contains('2'));
        assert_eq!(controller.stage(), ScanStage::Idle);
        assert!(controller.session().is_empty());
    }

    #[test]
    fn operations_outside_their_stage_are_rejected() {
        let mut controller = controller();

        assert!(matches!(
            controller.capture(),
            Err(VaraqError::StageMismatch { operation: "capture", .. })
        ));
        assert!(matches!(
            controller.confirm_crop(),
            Err(VaraqError::StageMismatch { .. })
        ));
        assert!(matches!(
            controller.move_crop_point(0, 1.0, 1.0),
            Err(VaraqError::StageMismatch { .. })
        ));
        assert!(controller.finish().is_none());
        assert_eq!(controller.stage(), ScanStage::Idle);
    }

    #[test]
    fn zoom_outside_camera_stage_is_ignored() {
        let mut controller = controller();
        controller.set_zoom(3.0);
        controller.pinch_zoom(1.0, 100.0, 300.0);
        assert_eq!(controller.zoom(), 1.0);
    }

    #[test]
    fn failed_camera_open_lands_in_idle_with_human_error() {
        let camera = FixedCamera::new("denied", document_frame()).failing("permission denied");
        let mut controller =
            ScannerController::new(vec![Box::new(camera)], ScannerConfig::default());

        assert!(controller.open_camera().is_err());
        assert_eq!(controller.stage(), ScanStage::Idle);

        let human = controller.last_error().unwrap();
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.suggestion.is_empty());
    }

    #[test]
    fn close_camera_routes_by_session_content() {
        let mut controller = controller();

        controller.open_camera().unwrap();
        controller.close_camera().unwrap();
        assert_eq!(controller.stage(), ScanStage::Idle);

        controller.open_camera().unwrap();
        controller.capture().unwrap();
        controller.confirm_crop().unwrap();
        controller.open_camera().unwrap();
        controller.close_camera().unwrap();
        assert_eq!(controller.stage(), ScanStage::Review);
    }

    #[test]
    fn pdf_import_skips_crop_and_lands_in_review() {
        let mut controller = controller();
        let pdf = sample_pdf();

        controller.import_from_gallery(pdf.clone()).unwrap();
        assert_eq!(controller.stage(), ScanStage::Review);

        let page = &controller.session().pages()[0];
        assert_eq!(page.data, pdf);
        PdfReader::from_bytes(&page.data).unwrap();
    }

    #[test]
    fn raster_import_goes_through_crop() {
        let mut controller = controller();
        let jpeg = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(document_frame()))
            .to_jpeg_bytes(85)
            .unwrap();

        controller.import_from_gallery(jpeg).unwrap();
        assert_eq!(controller.stage(), ScanStage::Crop);
        controller.confirm_crop().unwrap();
        assert_eq!(controller.stage(), ScanStage::Review);
        assert_eq!(controller.session().page_count(), 1);
    }

    #[test]
    fn cancelled_picker_changes_nothing() {
        let mut controller = controller();
        let picked = controller
            .import_from_picker(&MemoryPicker::cancelled())
            .unwrap();
        assert!(!picked);
        assert_eq!(controller.stage(), ScanStage::Idle);
    }

    #[test]
    fn removing_last_review_page_returns_to_idle() {
        let mut controller = controller();
        controller.import_from_gallery(sample_pdf()).unwrap();
        assert_eq!(controller.stage(), ScanStage::Review);

        controller.remove_page(0).unwrap();
        assert_eq!(controller.stage(), ScanStage::Idle);
        assert!(controller.finish().is_none());
    }
}
