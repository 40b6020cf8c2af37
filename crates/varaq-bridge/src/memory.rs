// SPDX-License-Identifier: MIT
//
// In-process bridge implementations for desktop runs and CI.
//
// `FixedCamera` serves a preloaded frame, optionally advertising a hardware
// zoom range; `MemoryPicker` hands out preloaded bytes; `MemoryStore` keeps
// uploads in a map. Together they let the whole scan pipeline run without a
// device.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use image::RgbaImage;
use uuid::Uuid;
use varaq_core::error::{Result, VaraqError};
use varaq_core::types::{DocumentType, ZoomRange};

use crate::traits::{
    CameraConstraints, CameraDevice, CameraFacing, CameraStream, DocumentStore, GalleryPicker,
    StoredRecord, StreamCapabilities,
};

/// A camera that always serves the same frame.
pub struct FixedCamera {
    label: String,
    facing: CameraFacing,
    frame: RgbaImage,
    /// Hardware zoom range to advertise, or `None` to force digital zoom.
    hardware_zoom: Option<ZoomRange>,
    /// When set, `open` fails with this detail string (permission-denied
    /// and missing-device scenarios).
    open_failure: Option<String>,
}

impl FixedCamera {
    pub fn new(label: impl Into<String>, frame: RgbaImage) -> Self {
        Self {
            label: label.into(),
            facing: CameraFacing::Rear,
            frame,
            hardware_zoom: None,
            open_failure: None,
        }
    }

    pub fn with_facing(mut self, facing: CameraFacing) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_hardware_zoom(mut self, range: ZoomRange) -> Self {
        self.hardware_zoom = Some(range);
        self
    }

    /// Make every `open` call fail, simulating a denied permission prompt
    /// or a missing device.
    pub fn failing(mut self, detail: impl Into<String>) -> Self {
        self.open_failure = Some(detail.into());
        self
    }
}

impl CameraDevice for FixedCamera {
    fn label(&self) -> &str {
        &self.label
    }

    fn facing(&self) -> CameraFacing {
        self.facing
    }

    fn open(&self, _constraints: &CameraConstraints) -> Result<Box<dyn CameraStream>> {
        if let Some(detail) = &self.open_failure {
            let lower = detail.to_ascii_lowercase();
            if lower.contains("denied") || lower.contains("permission") {
                return Err(VaraqError::CameraPermission(detail.clone()));
            }
            return Err(VaraqError::CameraUnavailable(detail.clone()));
        }

        Ok(Box::new(FixedStream {
            frame: self.frame.clone(),
            hardware_zoom: self.hardware_zoom,
            zoom_level: 1.0,
            active: true,
        }))
    }
}

/// Stream backing [`FixedCamera`]. Hardware zoom is recorded but does not
/// alter the served frame; tests read back `zoom_level` via capabilities.
#[derive(Debug)]
struct FixedStream {
    frame: RgbaImage,
    hardware_zoom: Option<ZoomRange>,
    zoom_level: f32,
    active: bool,
}

impl CameraStream for FixedStream {
    fn capabilities(&self) -> StreamCapabilities {
        StreamCapabilities {
            width: self.frame.width(),
            height: self.frame.height(),
            zoom: self.hardware_zoom,
        }
    }

    fn apply_zoom(&mut self, level: f32) -> Result<()> {
        match self.hardware_zoom {
            Some(range) => {
                self.zoom_level = range.clamp(level);
                Ok(())
            }
            None => Err(VaraqError::Bridge(
                "apply_zoom on a stream without hardware zoom".into(),
            )),
        }
    }

    fn grab_frame(&mut self) -> Result<RgbaImage> {
        if !self.active {
            return Err(VaraqError::NoActiveStream);
        }
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Picker that returns preloaded bytes once, then `None`.
pub struct MemoryPicker {
    file: Mutex<Option<Vec<u8>>>,
}

impl MemoryPicker {
    pub fn new(file: Vec<u8>) -> Self {
        Self {
            file: Mutex::new(Some(file)),
        }
    }

    /// A picker where the user cancels immediately.
    pub fn cancelled() -> Self {
        Self {
            file: Mutex::new(None),
        }
    }
}

impl GalleryPicker for MemoryPicker {
    fn pick_file(&self) -> Result<Option<Vec<u8>>> {
        let mut slot = self
            .file
            .lock()
            .map_err(|_| VaraqError::Bridge("picker lock poisoned".into()))?;
        Ok(slot.take())
    }
}

/// In-memory document store keyed by generated identifiers.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.records.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn upload(&self, file: &[u8], name: &str, kind: DocumentType) -> Result<StoredRecord> {
        let id = Uuid::new_v4().to_string();
        let mut records = self
            .records
            .lock()
            .map_err(|_| VaraqError::Bridge("store lock poisoned".into()))?;
        records.insert(id.clone(), file.to_vec());

        tracing::debug!(%id, name, mime = kind.mime_type(), bytes = file.len(), "Stored document");

        Ok(StoredRecord {
            url: format!("memory://documents/{id}"),
            id,
            uploaded_at: Utc::now(),
        })
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| VaraqError::Bridge("store lock poisoned".into()))?;
        match records.remove(id) {
            Some(_) => Ok(()),
            None => Err(VaraqError::UploadFailed(format!("no stored document {id}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn fixed_camera_serves_its_frame() {
        let frame = RgbaImage::from_pixel(64, 48, Rgba([10, 20, 30, 255]));
        let camera = FixedCamera::new("test", frame);
        let mut stream = camera.open(&CameraConstraints::default()).unwrap();

        let caps = stream.capabilities();
        assert_eq!((caps.width, caps.height), (64, 48));
        assert!(caps.zoom.is_none());

        let grabbed = stream.grab_frame().unwrap();
        assert_eq!(grabbed.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));

        stream.stop();
        assert!(!stream.is_active());
        assert!(stream.grab_frame().is_err());
    }

    #[test]
    fn failing_camera_maps_permission_detail() {
        let frame = RgbaImage::new(1, 1);
        let camera = FixedCamera::new("denied", frame).failing("permission denied by user");
        let err = camera.open(&CameraConstraints::default()).unwrap_err();
        assert!(matches!(err, VaraqError::CameraPermission(_)));
    }

    #[test]
    fn memory_store_upload_then_delete() {
        let store = MemoryStore::new();
        let record = store
            .upload(b"pdf bytes", "Contract", DocumentType::Pdf)
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(record.url.contains(&record.id));

        store.delete(&record.id).unwrap();
        assert!(store.is_empty());
        assert!(store.delete(&record.id).is_err());
    }

    #[test]
    fn picker_returns_bytes_once() {
        let picker = MemoryPicker::new(vec![1, 2, 3]);
        assert_eq!(picker.pick_file().unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(picker.pick_file().unwrap(), None);
    }
}
