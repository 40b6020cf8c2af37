// SPDX-License-Identifier: MIT
//
// Document service: export, share, upload, and delete finalized documents
// through the host's bridge collaborators.

use tracing::{debug, info, instrument, warn};
use varaq_core::error::{Result, VaraqError};
use varaq_core::types::{QualityTier, ScannedDocument};
use varaq_bridge::traits::{DocumentStore, ShareSheet, StoredRecord};
use varaq_document::{DocumentExporter, ExportArtifact};

/// Hands finalized documents to the outside world.
pub struct DocumentService {
    store: Box<dyn DocumentStore>,
    share: Box<dyn ShareSheet>,
    exporter: DocumentExporter,
    default_quality: QualityTier,
}

impl DocumentService {
    pub fn new(
        store: Box<dyn DocumentStore>,
        share: Box<dyn ShareSheet>,
        export_dpi: f32,
        default_quality: QualityTier,
    ) -> Self {
        Self {
            store,
            share,
            exporter: DocumentExporter::new(export_dpi),
            default_quality,
        }
    }

    /// Build a service using the config's export DPI and default tier.
    pub fn from_config(
        store: Box<dyn DocumentStore>,
        share: Box<dyn ShareSheet>,
        config: &varaq_core::ScannerConfig,
    ) -> Self {
        Self::new(
            store,
            share,
            config.export_dpi,
            config.default_export_quality,
        )
    }

    /// Export at an explicit quality tier.
    pub fn export_document(
        &self,
        document: &ScannedDocument,
        quality: QualityTier,
    ) -> Result<Vec<ExportArtifact>> {
        self.exporter.export(document, quality)
    }

    /// Export at the default tier and upload the primary artifact.
    pub fn upload_document(&self, document: &ScannedDocument) -> Result<StoredRecord> {
        self.upload_document_at(document, self.default_quality)
    }

    /// Export at an explicit tier and upload the primary artifact.
    ///
    /// The in-memory document is left untouched on failure so the user can
    /// retry.
    #[instrument(skip(self, document), fields(document_id = %document.id))]
    pub fn upload_document_at(
        &self,
        document: &ScannedDocument,
        quality: QualityTier,
    ) -> Result<StoredRecord> {
        let artifacts = self.export_document(document, quality)?;
        let primary = artifacts
            .first()
            .ok_or_else(|| VaraqError::ExportError("export produced no artifacts".to_string()))?;

        let record = self
            .store
            .upload(&primary.data, &document.name, primary.kind)
            .map_err(|err| match err {
                VaraqError::PlatformUnavailable => {
                    VaraqError::UploadFailed("no backend available".to_string())
                }
                other => other,
            })?;

        info!(record_id = %record.id, url = %record.url, "Document uploaded");
        Ok(record)
    }

    /// Delete a previously uploaded document by its stored-record id.
    pub fn delete_document(&self, id: &str) -> Result<()> {
        self.store.delete(id)?;
        info!(record_id = id, "Document deleted");
        Ok(())
    }

    /// Share via the OS share sheet. Best effort: a host without sharing or
    /// a declined share is logged, never surfaced to the caller.
    #[instrument(skip(self, document), fields(document_id = %document.id))]
    pub fn share_document(&self, document: &ScannedDocument) {
        if !self.share.can_share() {
            debug!("Native sharing unavailable, skipping");
            return;
        }
        if let Err(err) = self.share.share_document(&document.name, document.page_count()) {
            warn!(%err, "Share failed");
        }
    }

    /// Share the exported file itself. Same best-effort contract as
    /// [`DocumentService::share_document`].
    pub fn share_export(&self, document: &ScannedDocument, quality: QualityTier) {
        if !self.share.can_share() {
            debug!("Native sharing unavailable, skipping");
            return;
        }
        let artifacts = match self.export_document(document, quality) {
            Ok(artifacts) => artifacts,
            Err(err) => {
                warn!(%err, "Export for sharing failed");
                return;
            }
        };
        for artifact in &artifacts {
            if let Err(err) =
                self.share
                    .share_file(&artifact.filename, artifact.mime_type(), &artifact.data)
            {
                warn!(%err, filename = %artifact.filename, "Share failed");
            }
        }
    }
}
