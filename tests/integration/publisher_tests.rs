use std::time::Duration;

use q2lsp::document::DocumentSnapshot;
use q2lsp::lint::{DiagnosticCode, ValidationEngine};
use q2lsp::publisher::{DEFAULT_DEBOUNCE, Publisher};

use crate::common::{URI, fixture_repository};

const BROKEN: &str = "qiime demux summarize --i-data a.qza\n";
const FIXED: &str = "qiime demux summarize --i-data a.qza --p-something 2\n";

fn publisher() -> (Publisher, tokio::sync::mpsc::UnboundedReceiver<q2lsp::publisher::PublishEvent>) {
    Publisher::new(ValidationEngine::with_defaults(), fixture_repository(), DEFAULT_DEBOUNCE)
}

#[tokio::test(start_paused = true)]
async fn burst_of_edits_publishes_once_for_the_last_version() {
    let (publisher, mut rx) = publisher();

    for version in 1..=20 {
        let text = if version % 2 == 0 { FIXED } else { BROKEN };
        publisher.on_document_change(DocumentSnapshot::new(URI, version, text));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let event = rx.recv().await.unwrap();
    assert_eq!(event.version, 20);
    assert!(event.diagnostics.is_empty());

    tokio::time::sleep(DEFAULT_DEBOUNCE * 5).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn edits_spaced_past_the_debounce_each_publish() {
    let (publisher, mut rx) = publisher();

    publisher.on_document_change(DocumentSnapshot::new(URI, 1, BROKEN));
    let first = rx.recv().await.unwrap();
    assert_eq!(first.version, 1);
    assert_eq!(first.diagnostics[0].code, DiagnosticCode::MissingRequired);

    publisher.on_document_change(DocumentSnapshot::new(URI, 2, FIXED));
    let second = rx.recv().await.unwrap();
    assert_eq!(second.version, 2);
    assert!(second.diagnostics.is_empty());
    assert!(publisher.current_diagnostics(URI).is_empty());
}

#[tokio::test(start_paused = true)]
async fn nothing_publishes_before_the_debounce_elapses() {
    let (publisher, mut rx) = publisher();

    publisher.on_document_change(DocumentSnapshot::new(URI, 1, BROKEN));
    tokio::time::sleep(DEFAULT_DEBOUNCE / 2).await;
    assert!(rx.try_recv().is_err());

    tokio::time::sleep(DEFAULT_DEBOUNCE).await;
    assert_eq!(rx.try_recv().unwrap().version, 1);
}

#[tokio::test(start_paused = true)]
async fn documents_are_debounced_independently() {
    let (publisher, mut rx) = publisher();

    publisher.on_document_change(DocumentSnapshot::new("file:///a.sh", 1, BROKEN));
    publisher.on_document_change(DocumentSnapshot::new("file:///b.sh", 1, FIXED));

    let mut uris = vec![rx.recv().await.unwrap().uri, rx.recv().await.unwrap().uri];
    uris.sort();
    assert_eq!(uris, vec!["file:///a.sh", "file:///b.sh"]);
    assert_eq!(publisher.open_documents(), 2);
}

#[tokio::test(start_paused = true)]
async fn reopening_after_close_starts_fresh() {
    let (publisher, mut rx) = publisher();

    publisher.on_document_change(DocumentSnapshot::new(URI, 5, BROKEN));
    rx.recv().await.unwrap();
    publisher.on_document_close(URI);
    assert!(rx.recv().await.unwrap().diagnostics.is_empty());

    publisher.on_document_change(DocumentSnapshot::new(URI, 1, BROKEN));
    let event = rx.recv().await.unwrap();
    assert_eq!(event.version, 1);
    assert_eq!(event.diagnostics.len(), 1);
}
