// SPDX-License-Identifier: MIT
//
// Capture controller: owns the live camera stream, tracks zoom state, and
// produces full-resolution frames. Zoom is hardware when the stream
// advertises a range, digital otherwise.

use image::DynamicImage;
use tracing::{debug, info, instrument, warn};
use varaq_core::error::{Result, VaraqError};
use varaq_core::types::ZoomRange;
use varaq_bridge::traits::{CameraConstraints, CameraDevice, CameraStream};
use varaq_document::ImageProcessor;

/// A full-resolution frame grabbed from the camera, with any digital zoom
/// already baked in.
pub struct CapturedFrame {
    pub image: DynamicImage,
}

impl CapturedFrame {
    /// Decode a frame from encoded bytes, as delivered by the gallery picker.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            image: ImageProcessor::from_bytes(data)?.into_dynamic(),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Manages the camera stream lifecycle and zoom.
///
/// At most one stream is open at a time. When the active device advertises a
/// hardware zoom range, zoom changes are forwarded to the stream; otherwise
/// the controller tracks a digital zoom level and applies it as a centered
/// crop at capture time. The preview-versus-capture field of view therefore
/// matches in both modes.
pub struct CaptureController {
    devices: Vec<Box<dyn CameraDevice>>,
    active_device: usize,
    stream: Option<Box<dyn CameraStream>>,
    zoom: f32,
    zoom_range: ZoomRange,
    hardware_zoom: bool,
    digital_zoom_max: f32,
}

impl CaptureController {
    pub fn new(devices: Vec<Box<dyn CameraDevice>>, digital_zoom_max: f32) -> Self {
        Self {
            devices,
            active_device: 0,
            stream: None,
            zoom: 1.0,
            zoom_range: ZoomRange::digital(digital_zoom_max),
            hardware_zoom: false,
            digital_zoom_max,
        }
    }

    /// Open a stream on the active device and negotiate zoom capability.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Result<()> {
        let device = self
            .devices
            .get(self.active_device)
            .ok_or_else(|| VaraqError::CameraUnavailable("no camera devices".to_string()))?;

        let stream = device.open(&CameraConstraints::default())?;
        let caps = stream.capabilities();

        match caps.zoom {
            Some(range) => {
                self.zoom_range = range;
                self.hardware_zoom = true;
            }
            None => {
                self.zoom_range = ZoomRange::digital(self.digital_zoom_max);
                self.hardware_zoom = false;
            }
        }
        self.zoom = self.zoom_range.clamp(1.0);

        info!(
            device = device.label(),
            width = caps.width,
            height = caps.height,
            hardware_zoom = self.hardware_zoom,
            zoom_min = self.zoom_range.min,
            zoom_max = self.zoom_range.max,
            "Camera stream started"
        );

        self.stream = Some(stream);
        Ok(())
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_active())
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    /// Set the zoom level, clamped to the negotiated range.
    ///
    /// With hardware zoom the level is forwarded to the stream; if the device
    /// rejects it the controller keeps the clamped value anyway so the UI
    /// slider stays consistent, and the mismatch is logged.
    pub fn set_zoom(&mut self, level: f32) {
        let clamped = self.zoom_range.clamp(level);
        self.zoom = clamped;

        if self.hardware_zoom {
            if let Some(stream) = self.stream.as_mut() {
                if let Err(err) = stream.apply_zoom(clamped) {
                    warn!(%err, level = clamped, "Hardware zoom rejected, keeping level");
                }
            }
        }
        debug!(zoom = self.zoom, hardware = self.hardware_zoom, "Zoom set");
    }

    /// Pinch gesture: scale the zoom captured at gesture start by the ratio
    /// of current to starting finger distance.
    ///
    /// A zero or negative starting distance is ignored.
    pub fn pinch_zoom(&mut self, start_zoom: f32, start_distance: f32, current_distance: f32) {
        if start_distance <= 0.0 {
            return;
        }
        self.set_zoom(start_zoom * (current_distance / start_distance));
    }

    /// Grab the current frame, bake in digital zoom if active, and stop the
    /// stream. Capture is a terminal operation on the stream.
    #[instrument(skip(self))]
    pub fn capture_photo(&mut self) -> Result<CapturedFrame> {
        let stream = self.stream.as_mut().ok_or(VaraqError::NoActiveStream)?;
        let frame = stream.grab_frame()?;
        stream.stop();
        self.stream = None;

        let mut processor = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(frame));
        if !self.hardware_zoom && self.zoom > 1.0 {
            debug!(zoom = self.zoom, "Applying digital zoom to captured frame");
            processor = processor.zoom_crop(self.zoom);
        }

        let image = processor.into_dynamic();
        info!(
            width = image.width(),
            height = image.height(),
            "Photo captured"
        );
        Ok(CapturedFrame { image })
    }

    /// Cycle to the next enumerated device and reopen the stream. Zoom
    /// resets because the new device negotiates its own range.
    #[instrument(skip(self))]
    pub fn switch_camera(&mut self) -> Result<()> {
        if self.devices.is_empty() {
            return Err(VaraqError::CameraUnavailable(
                "no camera devices".to_string(),
            ));
        }

        self.stop();
        self.active_device = (self.active_device + 1) % self.devices.len();
        debug!(device_index = self.active_device, "Switching camera");
        self.start()
    }

    /// Stop the stream and reset zoom state. Safe to call when no stream is
    /// open.
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("Camera stream stopped");
        }
        self.zoom = 1.0;
        self.zoom_range = ZoomRange::digital(self.digital_zoom_max);
        self.hardware_zoom = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use varaq_bridge::FixedCamera;

    fn center_marked_frame() -> RgbaImage {
        RgbaImage::from_fn(400, 400, |x, y| {
            if (100..300).contains(&x) && (100..300).contains(&y) {
                Rgba([220, 30, 30, 255])
            } else {
                Rgba([30, 30, 220, 255])
            }
        })
    }

    fn controller_with(devices: Vec<Box<dyn CameraDevice>>) -> CaptureController {
        CaptureController::new(devices, 4.0)
    }

    #[test]
    fn no_devices_is_unavailable() {
        let mut controller = controller_with(vec![]);
        assert!(matches!(
            controller.start(),
            Err(VaraqError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn digital_zoom_clamps_to_range() {
        let camera = FixedCamera::new("fixture", center_marked_frame());
        let mut controller = controller_with(vec![Box::new(camera)]);
        controller.start().unwrap();

        controller.set_zoom(10.0);
        assert_eq!(controller.zoom(), 4.0);
        controller.set_zoom(0.2);
        assert_eq!(controller.zoom(), 1.0);
    }

    #[test]
    fn hardware_range_overrides_digital_bounds() {
        let camera = FixedCamera::new("fixture", center_marked_frame())
            .with_hardware_zoom(ZoomRange::new(1.0, 8.0));
        let mut controller = controller_with(vec![Box::new(camera)]);
        controller.start().unwrap();

        controller.set_zoom(6.0);
        assert_eq!(controller.zoom(), 6.0);
        controller.set_zoom(20.0);
        assert_eq!(controller.zoom(), 8.0);
    }

    #[test]
    fn pinch_scales_start_zoom_by_distance_ratio() {
        let camera = FixedCamera::new("fixture", center_marked_frame());
        let mut controller = controller_with(vec![Box::new(camera)]);
        controller.start().unwrap();

        controller.pinch_zoom(1.0, 100.0, 250.0);
        assert!((controller.zoom() - 2.5).abs() < 1e-6);

        // Zero start distance is ignored.
        controller.pinch_zoom(1.0, 0.0, 300.0);
        assert!((controller.zoom() - 2.5).abs() < 1e-6);
    }

    /// At digital zoom 2 the captured frame must be drawn from the centered
    /// half-size region, which the fixture paints solid red.
    #[test]
    fn capture_bakes_in_digital_zoom() {
        let camera = FixedCamera::new("fixture", center_marked_frame());
        let mut controller = controller_with(vec![Box::new(camera)]);
        controller.start().unwrap();
        controller.set_zoom(2.0);

        let frame = controller.capture_photo().unwrap();
        assert_eq!((frame.width(), frame.height()), (400, 400));

        let rgba = frame.image.to_rgba8();
        for (x, y) in [(5u32, 5u32), (200, 200), (394, 394)] {
            let px = rgba.get_pixel(x, y);
            assert!(px.0[0] > 150, "pixel at ({x},{y}) outside center: {:?}", px);
        }
    }

    #[test]
    fn capture_closes_the_stream() {
        let camera = FixedCamera::new("fixture", center_marked_frame());
        let mut controller = controller_with(vec![Box::new(camera)]);
        controller.start().unwrap();
        assert!(controller.is_streaming());

        controller.capture_photo().unwrap();
        assert!(!controller.is_streaming());
        assert!(matches!(
            controller.capture_photo(),
            Err(VaraqError::NoActiveStream)
        ));
    }

    #[test]
    fn switch_camera_cycles_and_resets_zoom() {
        let rear = FixedCamera::new("rear", center_marked_frame())
            .with_hardware_zoom(ZoomRange::new(1.0, 8.0));
        let front = FixedCamera::new("front", center_marked_frame());
        let mut controller = controller_with(vec![Box::new(rear), Box::new(front)]);
        controller.start().unwrap();
        controller.set_zoom(5.0);

        controller.switch_camera().unwrap();
        // Front camera has no hardware zoom, so the digital range applies.
        assert_eq!(controller.zoom(), 1.0);
        assert_eq!(controller.zoom_range(), ZoomRange::digital(4.0));
    }
}
