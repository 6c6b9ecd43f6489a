//! Debounced diagnostic publishing.
//!
//! Each open document has at most one pending validation pass. A newer
//! snapshot aborts the pending pass; a pass that finishes after a newer
//! version arrived drops its result. Published sets leave through an mpsc
//! channel as [`PublishEvent`]s.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::document::DocumentSnapshot;
use crate::lint::{Diagnostic, ValidationEngine};
use crate::signatures::SignatureRepository;

/// Default quiet period between the last edit and validation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// The final diagnostic set for one document version.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishEvent {
    pub uri: String,
    pub version: i32,
    pub diagnostics: Vec<Diagnostic>,
}

struct DocumentState {
    snapshot: DocumentSnapshot,
    pending: Option<JoinHandle<()>>,
    published: Option<(i32, Vec<Diagnostic>)>,
}

impl DocumentState {
    const fn latest(&self) -> i32 {
        self.snapshot.version
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

struct Shared {
    engine: ValidationEngine,
    repository: RwLock<Arc<SignatureRepository>>,
    documents: Mutex<HashMap<String, DocumentState>>,
    events: mpsc::UnboundedSender<PublishEvent>,
    debounce: Duration,
}

/// Cheap to clone; all clones drive the same document table.
#[derive(Clone)]
pub struct Publisher {
    shared: Arc<Shared>,
}

impl Publisher {
    /// Create a publisher and the receiving end of its event stream.
    #[must_use]
    pub fn new(
        engine: ValidationEngine,
        repository: SignatureRepository,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PublishEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let shared = Shared {
            engine,
            repository: RwLock::new(Arc::new(repository)),
            documents: Mutex::new(HashMap::new()),
            events,
            debounce,
        };
        (
            Self {
                shared: Arc::new(shared),
            },
            rx,
        )
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.shared.debounce
    }

    /// Schedule validation of `snapshot`. Must be called inside a tokio runtime.
    ///
    /// Snapshots not newer than the latest known version are ignored.
    pub fn on_document_change(&self, snapshot: DocumentSnapshot) {
        let mut documents = self.shared.documents.lock();
        match documents.get_mut(&snapshot.uri) {
            Some(state) => {
                if snapshot.version <= state.latest() {
                    debug!(
                        uri = %snapshot.uri,
                        version = snapshot.version,
                        latest = state.latest(),
                        "ignoring stale snapshot"
                    );
                    return;
                }
                state.abort_pending();
                state.snapshot = snapshot.clone();
                state.pending = Some(self.spawn_pass(snapshot));
            }
            None => {
                let uri = snapshot.uri.clone();
                let pending = Some(self.spawn_pass(snapshot.clone()));
                documents.insert(
                    uri,
                    DocumentState {
                        snapshot,
                        pending,
                        published: None,
                    },
                );
            }
        }
    }

    /// Forget a document and publish an empty set for it.
    pub fn on_document_close(&self, uri: &str) {
        let removed = self.shared.documents.lock().remove(uri);
        let Some(mut state) = removed else {
            return;
        };
        state.abort_pending();
        self.shared.emit(PublishEvent {
            uri: uri.to_string(),
            version: state.latest(),
            diagnostics: Vec::new(),
        });
    }

    /// The last published diagnostics for `uri`, empty if none.
    #[must_use]
    pub fn current_diagnostics(&self, uri: &str) -> Vec<Diagnostic> {
        self.shared
            .documents
            .lock()
            .get(uri)
            .and_then(|state| state.published.as_ref())
            .map(|(_, diagnostics)| diagnostics.clone())
            .unwrap_or_default()
    }

    /// The repository passes currently validate against.
    #[must_use]
    pub fn repository(&self) -> Arc<SignatureRepository> {
        Arc::clone(&self.shared.repository.read())
    }

    /// Replace the repository and revalidate every open document.
    pub fn load_signatures(&self, repository: SignatureRepository) {
        debug!(signatures = repository.len(), "swapping signature repository");
        *self.shared.repository.write() = Arc::new(repository);

        let mut documents = self.shared.documents.lock();
        for state in documents.values_mut() {
            state.abort_pending();
            state.pending = Some(self.spawn_pass(state.snapshot.clone()));
        }
    }

    #[must_use]
    pub fn open_documents(&self) -> usize {
        self.shared.documents.lock().len()
    }

    fn spawn_pass(&self, snapshot: DocumentSnapshot) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            shared.run_pass(&snapshot);
        })
    }
}

impl Shared {
    fn is_latest(&self, snapshot: &DocumentSnapshot) -> bool {
        self.documents
            .lock()
            .get(&snapshot.uri)
            .is_some_and(|state| state.latest() == snapshot.version)
    }

    fn run_pass(&self, snapshot: &DocumentSnapshot) {
        if !self.is_latest(snapshot) {
            trace!(uri = %snapshot.uri, version = snapshot.version, "pass superseded before start");
            return;
        }

        let repository = Arc::clone(&self.repository.read());
        let result = self.engine.validate_document(snapshot, &repository);

        let mut documents = self.documents.lock();
        let Some(state) = documents.get_mut(&snapshot.uri) else {
            return;
        };
        if state.latest() != snapshot.version {
            debug!(uri = %snapshot.uri, version = snapshot.version, "dropping stale result");
            return;
        }
        state.pending = None;

        let unchanged = state
            .published
            .as_ref()
            .is_some_and(|(version, diagnostics)| {
                *version == snapshot.version && *diagnostics == result.diagnostics
            });
        if unchanged {
            trace!(uri = %snapshot.uri, version = snapshot.version, "diagnostics unchanged");
            return;
        }

        state.published = Some((snapshot.version, result.diagnostics.clone()));
        drop(documents);

        self.emit(PublishEvent {
            uri: snapshot.uri.clone(),
            version: snapshot.version,
            diagnostics: result.diagnostics,
        });
    }

    fn emit(&self, event: PublishEvent) {
        debug!(
            uri = %event.uri,
            version = event.version,
            diagnostics = event.diagnostics.len(),
            "publishing diagnostics"
        );
        if self.events.send(event).is_err() {
            trace!("publish receiver dropped");
        }
    }
}
