//! Diagnostic code registry.
//!
//! Every code has one message template and one default severity. Rules
//! pick a code and fill in template arguments; message wording lives only
//! here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::diagnostic::Severity;

/// Stable diagnostic codes. Editors may key behavior off these strings.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    UnknownPlugin,
    UnknownAction,
    UnknownOption,
    DuplicateOption,
    MissingRequired,
    MissingValue,
    MalformedInvocation,
}

impl DiagnosticCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownPlugin => "unknown-plugin",
            Self::UnknownAction => "unknown-action",
            Self::UnknownOption => "unknown-option",
            Self::DuplicateOption => "duplicate-option",
            Self::MissingRequired => "missing-required",
            Self::MissingValue => "missing-value",
            Self::MalformedInvocation => "malformed-invocation",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diagnostic code '{0}'")]
pub struct UnknownCode(pub String);

impl FromStr for DiagnosticCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_codes()
            .iter()
            .map(|entry| entry.code)
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}

/// One row of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: DiagnosticCode,
    /// Message with `{name}` placeholders.
    pub template: &'static str,
    pub default_severity: Severity,
    /// One-line description for listings.
    pub summary: &'static str,
}

static REGISTRY: [CodeEntry; 7] = [
    CodeEntry {
        code: DiagnosticCode::UnknownPlugin,
        template: "Unknown QIIME command '{plugin}'.{hint}",
        default_severity: Severity::Warning,
        summary: "The word after the launcher is not an installed plugin or builtin",
    },
    CodeEntry {
        code: DiagnosticCode::UnknownAction,
        template: "Unknown action '{action}' for '{plugin}'.{hint}",
        default_severity: Severity::Warning,
        summary: "The action is not registered for the plugin, or signatures are not loaded",
    },
    CodeEntry {
        code: DiagnosticCode::UnknownOption,
        template: "Unknown option '{option}' for '{command}'.{hint}",
        default_severity: Severity::Warning,
        summary: "The option matches no parameter of the action",
    },
    CodeEntry {
        code: DiagnosticCode::DuplicateOption,
        template: "Option '{option}' is given more than once.",
        default_severity: Severity::Warning,
        summary: "A parameter is supplied again",
    },
    CodeEntry {
        code: DiagnosticCode::MissingRequired,
        template: "Missing required option '{option}'.",
        default_severity: Severity::Error,
        summary: "A required input, parameter or metadata option is absent",
    },
    CodeEntry {
        code: DiagnosticCode::MissingValue,
        template: "Option '{option}' requires a value.",
        default_severity: Severity::Error,
        summary: "A value-taking option has nothing after it",
    },
    CodeEntry {
        code: DiagnosticCode::MalformedInvocation,
        template: "Malformed invocation: {reason}.",
        default_severity: Severity::Error,
        summary: "The command text could not be read",
    },
];

/// Registry entry for `code`.
#[must_use]
pub const fn describe(code: DiagnosticCode) -> &'static CodeEntry {
    match code {
        DiagnosticCode::UnknownPlugin => &REGISTRY[0],
        DiagnosticCode::UnknownAction => &REGISTRY[1],
        DiagnosticCode::UnknownOption => &REGISTRY[2],
        DiagnosticCode::DuplicateOption => &REGISTRY[3],
        DiagnosticCode::MissingRequired => &REGISTRY[4],
        DiagnosticCode::MissingValue => &REGISTRY[5],
        DiagnosticCode::MalformedInvocation => &REGISTRY[6],
    }
}

/// Every registered code, in registry order.
#[must_use]
pub fn all_codes() -> &'static [CodeEntry] {
    &REGISTRY
}

/// Replace `{name}` placeholders. Unknown placeholders are left as written.
#[must_use]
pub fn render(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match args.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..=open + close + 1]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// The `{hint}` argument for a list of suggestions: empty, or
/// ` Did you mean 'a', 'b'?`.
#[must_use]
pub fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{s}'")).collect();
    format!(" Did you mean {}?", quoted.join(", "))
}

/// The `{hint}` argument when no signatures have been loaded.
#[must_use]
pub fn not_loaded_hint() -> String {
    " Signatures not loaded yet.".to_string()
}
