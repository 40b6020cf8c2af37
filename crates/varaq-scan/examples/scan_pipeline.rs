// SPDX-License-Identifier: MIT
//
// End-to-end scan pipeline against in-memory bridges: open a synthetic
// camera, capture two pages, rectify, finish the session, export a PDF to a
// temp directory, and upload it to the in-memory store.

use image::{Rgba, RgbaImage};
use varaq_bridge::{FixedCamera, MemoryStore, StubBridge};
use varaq_core::ScannerConfig;
use varaq_core::types::QualityTier;
use varaq_scan::{DocumentService, ScannerController};

fn synthetic_page(seed: u32) -> RgbaImage {
    RgbaImage::from_fn(1280, 960, |x, y| {
        let stripe = if (y / 40) % 2 == 0 { 235 } else { 210 };
        Rgba([
            stripe,
            stripe.saturating_sub((x % 64) as u8),
            ((seed * 40) % 256) as u8,
            255,
        ])
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let camera = FixedCamera::new("Synthetic Rear Camera", synthetic_page(1));
    let mut controller = ScannerController::new(vec![Box::new(camera)], ScannerConfig::default());

    for page in 1..=2 {
        controller.open_camera()?;
        if page == 2 {
            controller.set_zoom(1.5);
        }
        controller.capture()?;
        controller.move_crop_point(0, 8.0, 12.0)?;
        controller.confirm_crop()?;
        println!("page {page} scanned, stage: {:?}", controller.stage());
    }

    let document = controller.finish().expect("two pages were scanned");
    println!(
        "finished: {} ({} pages, id {})",
        document.name,
        document.page_count(),
        document.id
    );

    let service = DocumentService::from_config(
        Box::new(MemoryStore::new()),
        Box::new(StubBridge),
        &ScannerConfig::default(),
    );

    let artifacts = service.export_document(&document, QualityTier::Medium)?;
    let dir = tempfile::tempdir()?;
    for artifact in &artifacts {
        let path = dir.path().join(&artifact.filename);
        std::fs::write(&path, &artifact.data)?;
        println!(
            "exported {} ({} bytes, {})",
            path.display(),
            artifact.data.len(),
            artifact.mime_type()
        );
    }

    let record = service.upload_document(&document)?;
    println!("uploaded as {} at {}", record.id, record.url);
    service.delete_document(&record.id)?;

    // Share is best-effort; on the stub bridge this logs and returns.
    service.share_document(&document);

    Ok(())
}
