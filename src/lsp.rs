//! Language server over stdio.
//!
//! Document events go to the [`Publisher`]; a forwarder task turns each
//! [`PublishEvent`] into `textDocument/publishDiagnostics`. Completion and
//! hover answer from the open text and the current repository.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::{
    CompletionItem as LspCompletionItem, CompletionItemKind, CompletionOptions, CompletionParams,
    CompletionResponse, CompletionTextEdit, Diagnostic as LspDiagnostic, DiagnosticSeverity,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams, Hover,
    HoverContents, HoverParams, HoverProviderCapability, InitializeParams, InitializeResult,
    InitializedParams, MarkupContent, MarkupKind, MessageType, NumberOrString,
    Position as LspPosition, Range, ServerCapabilities, ServerInfo, TextDocumentSyncCapability,
    TextDocumentSyncKind, TextEdit, Url,
};
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info, trace, warn};

use crate::assist::{self, CompletionItem, CompletionKind, HoverInfo};
use crate::config::Config;
use crate::document::{DocumentSnapshot, LineIndex, Position, TextRange};
use crate::error::Result;
use crate::extract::Extractor;
use crate::lint::{Diagnostic, Severity, ValidationEngine};
use crate::publisher::{PublishEvent, Publisher};
use crate::signatures::SignatureRepository;

/// Value of `source` on every published diagnostic.
pub const SOURCE: &str = "q2lsp";

type OpenDocuments = Arc<Mutex<HashMap<String, DocumentSnapshot>>>;

pub struct Backend {
    client: Client,
    publisher: Publisher,
    documents: OpenDocuments,
    launcher: String,
}

impl Backend {
    fn track(&self, snapshot: DocumentSnapshot) {
        if !remember(&self.documents, &snapshot) {
            return;
        }
        self.publisher.on_document_change(snapshot);
    }

    fn completions_at(&self, uri: &str, position: LspPosition) -> Vec<LspCompletionItem> {
        let repository = self.publisher.repository();
        let documents = self.documents.lock();
        let Some(snapshot) = documents.get(uri) else {
            return Vec::new();
        };
        let index = LineIndex::new(&snapshot.text);
        let offset = index.offset(from_lsp_position(position));
        let Some(context) = assist::cursor_context(&snapshot.text, offset, &self.launcher) else {
            return Vec::new();
        };
        let items = assist::complete(&context, &repository);
        trace!(uri, slot = ?context.slot, items = items.len(), "completion");
        items.iter().map(|item| to_lsp_completion(item, &index)).collect()
    }

    fn hover_at(&self, uri: &str, position: LspPosition) -> Option<Hover> {
        let repository = self.publisher.repository();
        let documents = self.documents.lock();
        let snapshot = documents.get(uri)?;
        let index = LineIndex::new(&snapshot.text);
        let offset = index.offset(from_lsp_position(position));
        let context = assist::cursor_context(&snapshot.text, offset, &self.launcher)?;
        let info = assist::hover(&context, &repository)?;
        Some(to_lsp_hover(&info, &index))
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, _: InitializeParams) -> LspResult<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![" ".to_string(), "-".to_string()]),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: SOURCE.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let repository = self.publisher.repository();
        let message = if repository.is_loaded() {
            format!("q2lsp ready ({} signatures)", repository.len())
        } else {
            "q2lsp ready (signatures not loaded)".to_string()
        };
        self.client.log_message(MessageType::INFO, message).await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        info!("shutdown requested");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.track(DocumentSnapshot::new(doc.uri.to_string(), doc.version, doc.text));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        let version = params.text_document.version;
        // Full sync: the last change carries the whole text.
        if let Some(change) = params.content_changes.into_iter().last() {
            self.track(DocumentSnapshot::new(uri, version, change.text));
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        self.documents.lock().remove(&uri);
        self.publisher.on_document_close(&uri);
    }

    async fn completion(&self, params: CompletionParams) -> LspResult<Option<CompletionResponse>> {
        let position = params.text_document_position;
        let items = self.completions_at(position.text_document.uri.as_str(), position.position);
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let position = params.text_document_position_params;
        Ok(self.hover_at(position.text_document.uri.as_str(), position.position))
    }
}

/// Store `snapshot` unless a newer version of the document is already open.
fn remember(documents: &OpenDocuments, snapshot: &DocumentSnapshot) -> bool {
    let mut documents = documents.lock();
    if let Some(current) = documents.get(&snapshot.uri) {
        if snapshot.version < current.version {
            debug!(
                uri = %snapshot.uri,
                version = snapshot.version,
                latest = current.version,
                "ignoring out-of-order change"
            );
            return false;
        }
    }
    documents.insert(snapshot.uri.clone(), snapshot.clone());
    true
}

/// Convert a diagnostic to its protocol form using `index` for positions.
#[must_use]
pub fn to_lsp_diagnostic(diagnostic: &Diagnostic, index: &LineIndex<'_>) -> LspDiagnostic {
    LspDiagnostic {
        range: lsp_range(diagnostic.range, index),
        severity: Some(lsp_severity(diagnostic.severity)),
        code: Some(NumberOrString::String(diagnostic.code.as_str().to_string())),
        source: Some(SOURCE.to_string()),
        message: diagnostic.message.clone(),
        data: diagnostic.data.clone(),
        ..Default::default()
    }
}

const fn from_lsp_position(position: LspPosition) -> Position {
    Position {
        line: position.line,
        character: position.character,
    }
}

fn lsp_range(range: TextRange, index: &LineIndex<'_>) -> Range {
    let (start, end) = index.range(range);
    Range {
        start: LspPosition {
            line: start.line,
            character: start.character,
        },
        end: LspPosition {
            line: end.line,
            character: end.character,
        },
    }
}

#[must_use]
pub const fn completion_kind(kind: CompletionKind) -> CompletionItemKind {
    match kind {
        CompletionKind::Plugin => CompletionItemKind::MODULE,
        CompletionKind::Builtin => CompletionItemKind::CLASS,
        CompletionKind::Action => CompletionItemKind::FUNCTION,
        CompletionKind::Option => CompletionItemKind::FIELD,
    }
}

/// Convert a completion candidate; the edit replaces the typed part of the word.
#[must_use]
pub fn to_lsp_completion(item: &CompletionItem, index: &LineIndex<'_>) -> LspCompletionItem {
    LspCompletionItem {
        label: item.label.clone(),
        kind: Some(completion_kind(item.kind)),
        detail: Some(item.detail.clone()),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit {
            range: lsp_range(item.replace, index),
            new_text: item.label.clone(),
        })),
        ..Default::default()
    }
}

#[must_use]
pub fn to_lsp_hover(info: &HoverInfo, index: &LineIndex<'_>) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::PlainText,
            value: info.contents.clone(),
        }),
        range: Some(lsp_range(info.range, index)),
    }
}

#[must_use]
pub const fn lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}

/// Convert an event against the open text it was computed from.
///
/// Returns `None` when the document moved on to a newer version; that
/// version's own event will follow.
fn convert_event(event: &PublishEvent, documents: &OpenDocuments) -> Option<Vec<LspDiagnostic>> {
    let documents = documents.lock();
    match documents.get(&event.uri) {
        Some(snapshot) if snapshot.version == event.version => {
            let index = LineIndex::new(&snapshot.text);
            Some(
                event
                    .diagnostics
                    .iter()
                    .map(|d| to_lsp_diagnostic(d, &index))
                    .collect(),
            )
        }
        Some(_) => None,
        None if event.diagnostics.is_empty() => Some(Vec::new()),
        None => None,
    }
}

async fn forward(client: Client, mut events: mpsc::UnboundedReceiver<PublishEvent>, documents: OpenDocuments) {
    while let Some(event) = events.recv().await {
        let Ok(uri) = Url::parse(&event.uri) else {
            warn!(uri = %event.uri, "cannot publish to unparseable uri");
            continue;
        };
        let Some(diagnostics) = convert_event(&event, &documents) else {
            trace!(uri = %event.uri, version = event.version, "skipping superseded event");
            continue;
        };
        client
            .publish_diagnostics(uri, diagnostics, Some(event.version))
            .await;
    }
    debug!("diagnostic forwarder stopped");
}

/// Build the validation engine described by `config`.
#[must_use]
pub fn engine_from_config(config: &Config) -> ValidationEngine {
    ValidationEngine::new(config.validation_config())
        .with_builtin_rules()
        .with_extractor(Extractor::new(config.server.launcher.clone()))
}

/// Serve the protocol on stdin/stdout until the client exits.
pub async fn serve(config: &Config, repository: SignatureRepository) -> Result<()> {
    info!(
        launcher = %config.server.launcher,
        debounce_ms = config.diagnostics.debounce_ms,
        signatures = repository.len(),
        "starting language server"
    );

    let (publisher, events) = Publisher::new(engine_from_config(config), repository, config.debounce());
    let documents: OpenDocuments = Arc::new(Mutex::new(HashMap::new()));

    let (service, socket) = LspService::new(|client| {
        tokio::spawn(forward(client.clone(), events, Arc::clone(&documents)));
        Backend {
            client,
            publisher,
            documents,
            launcher: config.server.launcher.clone(),
        }
    });

    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;
    Ok(())
}
