// SPDX-License-Identifier: MIT
//
// Platform-agnostic trait definitions for native capabilities.
//
// The scanner needs four things from its host: camera streams, a gallery
// picker, a share sheet, and the backend document store. Each is a separate
// trait so hosts can implement only what they have.

use chrono::{DateTime, Utc};
use image::RgbaImage;
use varaq_core::error::Result;
use varaq_core::types::{DocumentType, ZoomRange};

/// Which way a camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFacing {
    Front,
    Rear,
}

/// Constraints requested when opening a camera stream.
///
/// Resolution values are hints, not guarantees; the stream reports what it
/// actually negotiated via [`StreamCapabilities`].
#[derive(Debug, Clone)]
pub struct CameraConstraints {
    pub facing: CameraFacing,
    pub ideal_width: u32,
    pub ideal_height: u32,
    /// Ask the device to expose its zoom capability, if it has one.
    pub request_zoom: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Rear,
            ideal_width: 3840,
            ideal_height: 2160,
            request_zoom: true,
        }
    }
}

/// What an open stream actually negotiated.
#[derive(Debug, Clone, Copy)]
pub struct StreamCapabilities {
    pub width: u32,
    pub height: u32,
    /// Hardware zoom bounds, or `None` when the device has no native zoom.
    pub zoom: Option<ZoomRange>,
}

/// An enumerated video input device.
pub trait CameraDevice {
    /// Human-readable device label (e.g. "Back Camera").
    fn label(&self) -> &str;

    fn facing(&self) -> CameraFacing;

    /// Open a live stream. Permission and availability failures surface as
    /// `CameraPermission` / `CameraUnavailable`.
    fn open(&self, constraints: &CameraConstraints) -> Result<Box<dyn CameraStream>>;
}

/// A live camera stream. Exclusively owned by the capture controller;
/// dropped or stopped streams release the device immediately.
pub trait CameraStream: std::fmt::Debug {
    fn capabilities(&self) -> StreamCapabilities;

    /// Apply a hardware zoom level. Only meaningful when
    /// `capabilities().zoom` is `Some`.
    fn apply_zoom(&mut self, level: f32) -> Result<()>;

    /// Grab the current full-resolution frame.
    fn grab_frame(&mut self) -> Result<RgbaImage>;

    /// Stop the stream and release the device. Idempotent.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Pick an image file from the device gallery or file system.
pub trait GalleryPicker {
    /// Show the picker and return the chosen file's bytes.
    /// Returns `Ok(None)` if the user cancelled.
    fn pick_file(&self) -> Result<Option<Vec<u8>>>;
}

/// Share content via the OS share sheet.
pub trait ShareSheet {
    /// Whether native sharing is available at all.
    fn can_share(&self) -> bool;

    /// Share document metadata (name and page count).
    fn share_document(&self, name: &str, page_count: usize) -> Result<()>;

    /// Share a file with other apps. Best-effort; hosts without file
    /// sharing return `PlatformUnavailable`.
    fn share_file(&self, filename: &str, mime_type: &str, data: &[u8]) -> Result<()>;
}

/// Record returned by the backend for a stored document.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Backend persistence collaborator.
///
/// The core treats the backend as a blob store: upload an already-encoded
/// file with a display name and type tag, get back an identifier and a
/// canonical URL; delete by identifier.
pub trait DocumentStore {
    fn upload(&self, file: &[u8], name: &str, kind: DocumentType) -> Result<StoredRecord>;

    fn delete(&self, id: &str) -> Result<()>;
}
