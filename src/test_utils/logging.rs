//! Log capture for tests: record `tracing` events and assert on them.

use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// A captured event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Value of a structured field, e.g. `uri` or `error`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Layer that copies every event into shared storage.
struct TestLogLayer {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

struct EntryVisitor<'a> {
    message: &'a mut String,
    fields: &'a mut Vec<(String, String)>,
}

impl tracing::field::Visit for EntryVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value = format!("{value:?}");
        if field.name() == "message" {
            *self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for TestLogLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let metadata = event.metadata();
        let mut entry = LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: String::new(),
            fields: Vec::new(),
        };
        event.record(&mut EntryVisitor {
            message: &mut entry.message,
            fields: &mut entry.fields,
        });

        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

/// Run `f` with a subscriber scoped to the current thread and return what
/// it logged. Safe to use from tests running in parallel.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<LogEntry>) {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(TestLogLayer {
            entries: Arc::clone(&entries),
        });

    let result = tracing::subscriber::with_default(subscriber, f);
    let entries = entries.lock().map(|e| e.clone()).unwrap_or_default();
    (result, entries)
}

/// Render captured entries for a failure message.
#[must_use]
pub fn format_logs(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return String::from("No logs captured");
    }
    let mut output = format!("Captured {} log entries:\n", entries.len());
    for entry in entries {
        output.push_str(&format!("[{}] {}: {}\n", entry.level, entry.target, entry.message));
        for (key, value) in &entry.fields {
            output.push_str(&format!("    {key} = {value}\n"));
        }
    }
    output
}

/// Assert that captured entries include `level` with a message containing `message`.
#[macro_export]
macro_rules! assert_log_contains {
    ($entries:expr, $level:expr, $message:expr) => {{
        let entries: &[$crate::test_utils::logging::LogEntry] = &$entries;
        let found = entries
            .iter()
            .any(|e| e.level == $level && e.message.contains($message));
        assert!(
            found,
            "Expected log with level {} containing '{}'\n{}",
            $level,
            $message,
            $crate::test_utils::logging::format_logs(entries)
        );
    }};
}

/// Assert that captured entries include no errors.
#[macro_export]
macro_rules! assert_no_errors {
    ($entries:expr) => {{
        let entries: &[$crate::test_utils::logging::LogEntry] = &$entries;
        assert!(
            !entries.iter().any(|e| e.level == tracing::Level::ERROR),
            "Expected no errors\n{}",
            $crate::test_utils::logging::format_logs(entries)
        );
    }};
}
