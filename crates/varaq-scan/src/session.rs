// SPDX-License-Identifier: MIT
//
// Scan session: the in-progress, unsaved accumulation of rectified pages
// during one scanning flow. Finalizing turns it into a ScannedDocument and
// empties the session.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use varaq_core::types::{RectifiedPage, ScannedDocument};

/// Ordered page accumulator with a user-editable name.
#[derive(Default)]
pub struct ScanSession {
    pages: Vec<RectifiedPage>,
    /// A name the user typed, if any. `None` means a default name is
    /// synthesized at finish time.
    name: Option<String>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[RectifiedPage] {
        &self.pages
    }

    /// Append a page at the end of the session.
    pub fn add_page(&mut self, page: RectifiedPage) {
        debug!(
            page_index = self.pages.len(),
            hash = %page.hash,
            "Page added to session"
        );
        self.pages.push(page);
    }

    /// Remove the page at `index`, keeping the relative order of the rest.
    /// Returns `None` for an out-of-range index.
    pub fn remove_page(&mut self, index: usize) -> Option<RectifiedPage> {
        if index >= self.pages.len() {
            return None;
        }
        debug!(page_index = index, "Page removed from session");
        Some(self.pages.remove(index))
    }

    /// Record the user's chosen name. Whitespace-only input clears the
    /// custom name, restoring default naming.
    pub fn set_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Default document name from the date and page count, used whenever the
    /// user leaves the name field untouched.
    pub fn default_name(at: DateTime<Utc>, page_count: usize) -> String {
        format!("Document_{}_{}_pages", at.format("%d.%m.%Y"), page_count)
    }

    /// Finalize the session into a [`ScannedDocument`].
    ///
    /// Returns `None` without side effects when the session has no pages.
    /// Otherwise the session is emptied and ready for the next scan flow.
    pub fn finish(&mut self) -> Option<ScannedDocument> {
        if self.pages.is_empty() {
            debug!("Finish requested on empty session, ignoring");
            return None;
        }

        let now = Utc::now();
        let name = self
            .name
            .take()
            .unwrap_or_else(|| Self::default_name(now, self.pages.len()));
        let pages = std::mem::take(&mut self.pages);

        let document = ScannedDocument::new(name, pages);
        info!(
            document_id = %document.id,
            name = %document.name,
            pages = document.page_count(),
            "Session finalized"
        );
        Some(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use varaq_core::types::DocumentType;

    fn page(tag: u8) -> RectifiedPage {
        RectifiedPage {
            data: vec![tag; 16],
            format: DocumentType::Jpeg,
            width: 100,
            height: 100,
            hash: format!("{tag:02x}"),
        }
    }

    /// Pages accumulate in order and removal re-indexes without reordering.
    #[test]
    fn remove_preserves_relative_order() {
        let mut session = ScanSession::new();
        for tag in [1, 2, 3, 4] {
            session.add_page(page(tag));
        }

        let removed = session.remove_page(1).unwrap();
        assert_eq!(removed.data[0], 2);

        let remaining: Vec<u8> = session.pages().iter().map(|p| p.data[0]).collect();
        assert_eq!(remaining, vec![1, 3, 4]);

        assert!(session.remove_page(10).is_none());
        assert_eq!(session.page_count(), 3);
    }

    #[test]
    fn finish_on_empty_session_is_a_noop() {
        let mut session = ScanSession::new();
        assert!(session.finish().is_none());
        session.add_page(page(1));
        session.remove_page(0);
        assert!(session.finish().is_none());
    }

    #[test]
    fn finish_clears_the_session() {
        let mut session = ScanSession::new();
        session.add_page(page(1));
        session.add_page(page(2));

        let document = session.finish().unwrap();
        assert_eq!(document.page_count(), 2);
        assert!(session.is_empty());
        assert!(session.finish().is_none());
    }

    #[test]
    fn user_name_wins_over_default() {
        let mut session = ScanSession::new();
        session.add_page(page(1));
        session.set_name("  Lease Contract  ");

        let document = session.finish().unwrap();
        assert_eq!(document.name, "Lease Contract");
    }

    #[test]
    fn whitespace_name_restores_default_naming() {
        let mut session = ScanSession::new();
        session.add_page(page(1));
        session.set_name("Custom");
        session.set_name("   ");

        let document = session.finish().unwrap();
        assert!(document.name.starts_with("Document_"));
        assert!(document.name.ends_with("_1_pages"));
    }

    /// Same-day sessions with different page counts get distinct default
    /// names differing only in the count component.
    #[test]
    fn default_names_differ_only_in_page_count() {
        let date = Utc.with_ymd_and_hms(2026, 8, 26, 9, 30, 0).unwrap();
        let one = ScanSession::default_name(date, 1);
        let three = ScanSession::default_name(date, 3);

        assert_eq!(one, "Document_26.08.2026_1_pages");
        assert_eq!(three, "Document_26.08.2026_3_pages");
        assert_ne!(one, three);
        assert_eq!(one.replace("_1_", "_3_"), three);
    }
}
