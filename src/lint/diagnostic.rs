//! Diagnostic types for invocation validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::codes::{self, DiagnosticCode};
use crate::document::TextRange;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Faint editor hint
    Hint,
    /// Informational suggestion
    Info,
    /// Likely mistake, the command may still run
    Warning,
    /// The command will fail as written
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hint => write!(f, "hint"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message from validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The code that classifies this diagnostic
    pub code: DiagnosticCode,
    /// Severity level
    pub severity: Severity,
    /// Byte range in the document
    pub range: TextRange,
    /// Rendered message
    pub message: String,
    /// Structured fix payload, e.g. `{"suggestion": "p-depth"}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Diagnostic {
    /// Build a diagnostic from the registry entry for `code`, rendering its
    /// template with `args`.
    pub fn from_code(code: DiagnosticCode, range: TextRange, args: &[(&str, &str)]) -> Self {
        let entry = codes::describe(code);
        Self {
            code,
            severity: entry.default_severity,
            range,
            message: codes::render(entry.template, args),
            data: None,
        }
    }

    /// Attach a canonical-name suggestion as the fix payload
    #[must_use]
    pub fn with_suggestion(mut self, canonical: impl Into<String>) -> Self {
        self.data = Some(json!({ "suggestion": canonical.into() }));
        self
    }

    /// Set the severity
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The suggestion carried in `data`, if any
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.data.as_ref()?.get("suggestion")?.as_str()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        write!(f, " at {}", self.range)?;
        if let Some(suggestion) = self.suggestion() {
            write!(f, " (hint: {suggestion})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Hint < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_from_code_renders_template() {
        let diag = Diagnostic::from_code(
            DiagnosticCode::MissingValue,
            TextRange::new(4, 12),
            &[("option", "--p-depth")],
        );

        assert_eq!(diag.code, DiagnosticCode::MissingValue);
        assert_eq!(diag.severity, Severity::Error);
        assert!(diag.message.contains("--p-depth"));
        assert!(diag.data.is_none());
    }

    #[test]
    fn test_suggestion_payload() {
        let diag = Diagnostic::from_code(
            DiagnosticCode::UnknownOption,
            TextRange::new(0, 5),
            &[("option", "--p-dpth"), ("hint", "")],
        )
        .with_suggestion("p-depth");

        assert_eq!(diag.suggestion(), Some("p-depth"));
        assert_eq!(diag.data, Some(json!({"suggestion": "p-depth"})));
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::from_code(
            DiagnosticCode::DuplicateOption,
            TextRange::new(10, 17),
            &[("option", "--p-foo")],
        );
        let shown = diag.to_string();
        assert!(shown.starts_with("[warning] duplicate-option:"));
        assert!(shown.ends_with("at 10..17"));
    }

    #[test]
    fn test_serializes_code_as_string() {
        let diag = Diagnostic::from_code(
            DiagnosticCode::MissingRequired,
            TextRange::new(0, 1),
            &[("option", "--i-data")],
        );
        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(value["code"], "missing-required");
        assert_eq!(value["severity"], "error");
        assert!(value.get("data").is_none());
    }
}
