// SPDX-License-Identifier: MIT
//
// varaq-scan — scan workflow orchestration.
//
// Ties the bridge (camera, picker, share sheet, store) to the document
// pipeline (rectifier, exporter): camera capture with zoom, the crop stage,
// multi-page session accumulation, and the staged controller driving it all.

pub mod capture;
pub mod controller;
pub mod service;
pub mod session;

pub use capture::{CaptureController, CapturedFrame};
pub use controller::{ScanStage, ScannerController};
pub use service::DocumentService;
pub use session::ScanSession;
