//! Option spelling normalization.
//!
//! Written options like `--p-min_frequency=5`, `--P-MIN-FREQUENCY` and
//! `p-min-frequency` all denote the same canonical parameter name
//! `p-min-frequency`. The leading one-letter tag (`i-`, `p-`, `o-`, `m-`)
//! carries the parameter kind; spellings without a tag get no kind rather
//! than a guessed one.

use serde::{Deserialize, Serialize};

use crate::signatures::ParamKind;

/// A canonical option name plus the kind encoded in its spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalOption {
    pub name: String,
    pub kind: Option<ParamKind>,
}

impl CanonicalOption {
    /// Whether normalization produced the empty "unrecognized" name.
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        self.name.is_empty()
    }
}

/// Normalize a raw option token. Total and idempotent.
#[must_use]
pub fn normalize(raw: &str) -> CanonicalOption {
    let before_value = raw.split_once('=').map_or(raw, |(name, _)| name);
    let name = before_value
        .replace('_', "-")
        .to_lowercase()
        .trim_start_matches(|c: char| c == '-' || c.is_whitespace())
        .trim_end()
        .to_string();
    let kind = kind_tag(&name);
    CanonicalOption { name, kind }
}

fn kind_tag(name: &str) -> Option<ParamKind> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(tag), Some('-')) => ParamKind::from_tag(tag),
        _ => None,
    }
}

/// Render a canonical name the way a user writes it.
#[must_use]
pub fn option_label(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

/// For a negated boolean spelling (`p-no-verbose`), the flag it negates.
#[must_use]
pub fn negated_flag_target(name: &str) -> Option<String> {
    let rest = name.strip_prefix("p-no-")?;
    if rest.is_empty() {
        return None;
    }
    Some(format!("p-{rest}"))
}

/// An option accepted by every action, independent of its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOption {
    /// Canonical name, without dashes.
    pub name: String,
    #[serde(default)]
    pub takes_value: bool,
}

impl GlobalOption {
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            takes_value: false,
        }
    }

    pub fn with_value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            takes_value: true,
        }
    }

    /// `--help` and its `-h` alias.
    #[must_use]
    pub fn is_help(&self) -> bool {
        is_help_name(&self.name)
    }
}

#[must_use]
pub fn is_help_name(name: &str) -> bool {
    name == "help" || name == "h"
}

/// The options the command-line front end adds to every action.
#[must_use]
pub fn default_global_options() -> Vec<GlobalOption> {
    vec![
        GlobalOption::flag("help"),
        GlobalOption::flag("h"),
        GlobalOption::flag("verbose"),
        GlobalOption::flag("quiet"),
        GlobalOption::flag("citations"),
        GlobalOption::with_value("output-dir"),
        GlobalOption::with_value("example-data"),
        GlobalOption::with_value("use-cache"),
        GlobalOption::flag("parallel"),
        GlobalOption::with_value("parallel-config"),
        GlobalOption::with_value("recycle-pool"),
        GlobalOption::flag("no-recycle"),
    ]
}
