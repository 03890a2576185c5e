//! Incremental link discovery as the page content changes.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::services::link_scanner::{AnchorRewriteMode, LinkScanner, ScanReport};
use crate::domain::dom::{DomSurface, MutationBatch, MutationRecord};
use crate::domain::repositories::SettingsRepository;
use crate::error::AppError;

/// Feeds anchors from inserted subtrees to a [`LinkScanner`].
///
/// The document is shared with whatever mutates the page; the lock is taken
/// once per batch and never held across an await.
pub struct MutationWatcher<D: DomSurface> {
    scanner: LinkScanner,
    document: Arc<Mutex<D>>,
}

fn lock_document<D>(document: &Mutex<D>) -> Result<MutexGuard<'_, D>, AppError> {
    document
        .lock()
        .map_err(|_| AppError::dom_mutation("Document lock poisoned", json!({})))
}

impl<D: DomSurface> MutationWatcher<D> {
    pub fn new(scanner: LinkScanner, document: Arc<Mutex<D>>) -> Self {
        Self { scanner, document }
    }

    pub fn scanner(&self) -> &LinkScanner {
        &self.scanner
    }

    /// Scans every anchor currently in the document.
    pub fn scan_document(&mut self) -> ScanReport {
        let mut doc = match lock_document(&self.document) {
            Ok(doc) => doc,
            Err(e) => {
                error!(code = e.code(), error = %e, "Initial scan skipped");
                return ScanReport::default();
            }
        };

        let anchors = doc.document_anchors();
        self.scanner.scan(&mut *doc, &anchors)
    }

    /// Processes one batch of insertions in delivery order.
    ///
    /// Non-element nodes (text) are ignored. An inserted anchor is scanned
    /// itself, along with any anchors below it.
    pub fn handle_batch(&mut self, batch: &[MutationRecord]) -> ScanReport {
        let mut report = ScanReport::default();

        let mut doc = match lock_document(&self.document) {
            Ok(doc) => doc,
            Err(e) => {
                error!(code = e.code(), error = %e, "Mutation batch dropped");
                return report;
            }
        };

        for record in batch {
            for &node in &record.added_nodes {
                if !doc.is_element(node) {
                    continue;
                }
                let anchors = doc.anchors_within(node);
                report += self.scanner.scan(&mut *doc, &anchors);
            }
        }

        report
    }

    /// Consumes mutation batches until the source closes (page teardown).
    ///
    /// Returns the accumulated counters.
    pub async fn run(mut self, mut rx: mpsc::Receiver<MutationBatch>) -> ScanReport {
        let mut total = ScanReport::default();

        while let Some(batch) = rx.recv().await {
            let report = self.handle_batch(&batch);
            if report.rewritten > 0 {
                debug!(rewritten = report.rewritten, "Mutation batch processed");
            }
            total += report;
        }

        info!(
            rewritten = total.rewritten,
            processed = self.scanner.processed_count(),
            "Mutation source closed"
        );
        total
    }
}

/// Activates link rewriting for a freshly loaded page.
///
/// Reads one settings snapshot, scans the existing anchors and returns the
/// watcher to keep the page covered. Returns `None` when rewriting is
/// disabled or the settings cannot be read.
pub async fn start_page_session<S, D>(
    settings: &S,
    document: Arc<Mutex<D>>,
    mode: AnchorRewriteMode,
) -> Option<MutationWatcher<D>>
where
    S: SettingsRepository + ?Sized,
    D: DomSurface,
{
    let snapshot = match settings.load().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(code = e.code(), error = %e, "Page session not started");
            return None;
        }
    };

    let Some(scanner) = LinkScanner::from_settings(&snapshot, mode) else {
        debug!("Rewriting disabled, page session not started");
        return None;
    };

    let mut watcher = MutationWatcher::new(scanner, document);
    let report = watcher.scan_document();
    info!(
        rewritten = report.rewritten,
        skipped = report.skipped,
        "Initial link scan complete"
    );

    Some(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AffiliateTag, Settings};
    use crate::domain::repositories::MockSettingsRepository;
    use crate::infrastructure::dom::InMemoryDocument;

    fn watcher_for(
        doc: InMemoryDocument,
    ) -> (MutationWatcher<InMemoryDocument>, Arc<Mutex<InMemoryDocument>>) {
        let document = Arc::new(Mutex::new(doc));
        let scanner = LinkScanner::new(
            AffiliateTag::new("edu-20").unwrap(),
            AnchorRewriteMode::Preserve,
        );
        (MutationWatcher::new(scanner, document.clone()), document)
    }

    #[test]
    fn test_batch_with_inserted_div() {
        let (mut watcher, document) = watcher_for(InMemoryDocument::new());

        let (div, anchor) = {
            let mut doc = document.lock().unwrap();
            let body = doc.body();
            let div = doc.create_element("div");
            let anchor = doc.create_anchor("https://amazon.de/dp/B111111111");
            doc.append_child(div, anchor).unwrap();
            doc.append_child(body, div).unwrap();
            (div, anchor)
        };

        let report = watcher.handle_batch(&[MutationRecord::added([div])]);

        assert_eq!(report.rewritten, 1);
        let doc = document.lock().unwrap();
        assert!(doc.href(anchor).unwrap().contains("tag=edu-20"));
    }

    #[test]
    fn test_batch_ignores_text_nodes() {
        let (mut watcher, document) = watcher_for(InMemoryDocument::new());
        let text = document.lock().unwrap().create_text("hello");

        let report = watcher.handle_batch(&[MutationRecord::added([text])]);
        assert_eq!(report, ScanReport::default());
    }

    #[test]
    fn test_directly_inserted_anchor_is_scanned() {
        let (mut watcher, document) = watcher_for(InMemoryDocument::new());
        let anchor = {
            let mut doc = document.lock().unwrap();
            let body = doc.body();
            let a = doc.create_anchor("https://www.amazon.fr/gp/product/B222222222");
            doc.append_child(body, a).unwrap();
            a
        };

        watcher.handle_batch(&[MutationRecord::added([anchor])]);

        assert!(watcher.scanner().is_processed(anchor));
    }

    #[test]
    fn test_repeated_insert_reports_already_processed() {
        let (mut watcher, document) = watcher_for(InMemoryDocument::new());
        let anchor = {
            let mut doc = document.lock().unwrap();
            let body = doc.body();
            let a = doc.create_anchor("https://amazon.com/dp/B000123456");
            doc.append_child(body, a).unwrap();
            a
        };

        watcher.handle_batch(&[MutationRecord::added([anchor])]);
        let body = document.lock().unwrap().body();
        let report = watcher.handle_batch(&[
            MutationRecord::added([anchor]),
            MutationRecord::added([body]),
        ]);

        assert_eq!(report.rewritten, 0);
        assert_eq!(report.already_processed, 2);
    }

    #[tokio::test]
    async fn test_run_processes_batches_until_closed() {
        let (watcher, document) = watcher_for(InMemoryDocument::new());
        let (tx, rx) = mpsc::channel(8);

        let mut anchors = Vec::new();
        for href in [
            "https://amazon.com/dp/B000000001",
            "https://amazon.co.uk/dp/B000000002",
        ] {
            let node = {
                let mut doc = document.lock().unwrap();
                let body = doc.body();
                let a = doc.create_anchor(href);
                doc.append_child(body, a).unwrap();
                a
            };
            anchors.push(node);
            tx.send(vec![MutationRecord::added([node])]).await.unwrap();
        }
        drop(tx);

        let total = watcher.run(rx).await;

        assert_eq!(total.rewritten, 2);
        let doc = document.lock().unwrap();
        for anchor in anchors {
            assert!(doc.href(anchor).unwrap().ends_with("?tag=edu-20"));
        }
    }

    #[tokio::test]
    async fn test_start_page_session_scans_existing_links() {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        let existing = doc.create_anchor("https://amazon.it/dp/B333333333");
        doc.append_child(body, existing).unwrap();
        let document = Arc::new(Mutex::new(doc));

        let mut repo = MockSettingsRepository::new();
        repo.expect_load().times(1).returning(|| {
            Ok(Settings::with_fallback(AffiliateTag::new("food-20").unwrap()))
        });

        let watcher = start_page_session(&repo, document.clone(), AnchorRewriteMode::Preserve)
            .await
            .unwrap();

        assert!(watcher.scanner().is_processed(existing));
        assert_eq!(
            document.lock().unwrap().href(existing).unwrap(),
            "https://amazon.it/dp/B333333333?tag=food-20"
        );
    }

    #[tokio::test]
    async fn test_start_page_session_disabled() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_load().times(1).returning(|| {
            let mut settings = Settings::default();
            settings.enabled = false;
            Ok(settings)
        });

        let document = Arc::new(Mutex::new(InMemoryDocument::new()));
        let watcher = start_page_session(&repo, document, AnchorRewriteMode::Preserve).await;

        assert!(watcher.is_none());
    }

    #[tokio::test]
    async fn test_start_page_session_storage_error() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_load()
            .times(1)
            .returning(|| Err(AppError::storage("unavailable", json!({}))));

        let document = Arc::new(Mutex::new(InMemoryDocument::new()));
        let watcher = start_page_session(&repo, document, AnchorRewriteMode::Preserve).await;

        assert!(watcher.is_none());
    }
}
