// SPDX-License-Identifier: MIT
//
// Stub bridge for hosts where native capabilities are unavailable.
//
// Every trait method returns `PlatformUnavailable`; real implementations
// live in the host shell. Useful as a default and for exercising the
// degraded paths (share silently skipped, upload surfaced) in tests.

use varaq_core::error::{Result, VaraqError};
use varaq_core::types::DocumentType;

use crate::traits::{DocumentStore, GalleryPicker, ShareSheet, StoredRecord};

/// No-op bridge for hosts without picker, share, or backend access.
pub struct StubBridge;

impl GalleryPicker for StubBridge {
    fn pick_file(&self) -> Result<Option<Vec<u8>>> {
        tracing::warn!("GalleryPicker::pick_file called on stub bridge");
        Err(VaraqError::PlatformUnavailable)
    }
}

impl ShareSheet for StubBridge {
    fn can_share(&self) -> bool {
        false
    }

    fn share_document(&self, _name: &str, _page_count: usize) -> Result<()> {
        tracing::warn!("ShareSheet::share_document called on stub bridge");
        Err(VaraqError::PlatformUnavailable)
    }

    fn share_file(&self, _filename: &str, _mime_type: &str, _data: &[u8]) -> Result<()> {
        tracing::warn!("ShareSheet::share_file called on stub bridge");
        Err(VaraqError::PlatformUnavailable)
    }
}

impl DocumentStore for StubBridge {
    fn upload(&self, _file: &[u8], _name: &str, _kind: DocumentType) -> Result<StoredRecord> {
        tracing::warn!("DocumentStore::upload called on stub bridge");
        Err(VaraqError::PlatformUnavailable)
    }

    fn delete(&self, _id: &str) -> Result<()> {
        Err(VaraqError::PlatformUnavailable)
    }
}
