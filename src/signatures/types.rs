//! Signature data model: one immutable parameter contract per plugin action.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Q2Error, Result};

/// Role of a signature parameter.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Input,
    Parameter,
    Output,
    Metadata,
}

impl ParamKind {
    /// The one-letter tag used in option spellings (`--i-table`, `--p-depth`).
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Input => 'i',
            Self::Parameter => 'p',
            Self::Output => 'o',
            Self::Metadata => 'm',
        }
    }

    #[must_use]
    pub const fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'i' => Some(Self::Input),
            'p' => Some(Self::Parameter),
            'o' => Some(Self::Output),
            'm' => Some(Self::Metadata),
            _ => None,
        }
    }

    /// Parse a signature kind as written by the toolkit (`input`,
    /// `parameter`, `outputs`, `metadata`, ...). Unknown kinds give `None`.
    #[must_use]
    pub fn from_signature_type(value: &str) -> Option<Self> {
        let lower = value.to_ascii_lowercase();
        if lower.starts_with("input") {
            Some(Self::Input)
        } else if lower.starts_with("output") {
            Some(Self::Output)
        } else if lower.starts_with("parameter") {
            Some(Self::Parameter)
        } else if lower.starts_with("metadata") {
            Some(Self::Metadata)
        } else {
            None
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Parameter => write!(f, "parameter"),
            Self::Output => write!(f, "output"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

/// A single parameter of an action signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureParameter {
    /// Canonical name, as produced by [`crate::options::normalize`].
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    /// Declared type, opaque to validation (e.g. `FeatureTable[Frequency]`).
    #[serde(default)]
    pub type_descriptor: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    /// Boolean switch: takes no value.
    #[serde(default)]
    pub flag: bool,
    /// May be supplied more than once.
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl SignatureParameter {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            type_descriptor: None,
            default: None,
            flag: false,
            multiple: false,
            description: None,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn flag(mut self) -> Self {
        self.flag = true;
        self
    }

    #[must_use]
    pub const fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_type(mut self, descriptor: impl Into<String>) -> Self {
        self.type_descriptor = Some(descriptor.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether an option for this parameter must carry a value.
    #[must_use]
    pub const fn takes_value(&self) -> bool {
        !self.flag
    }
}

/// The declared parameter contract for one plugin action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSignature {
    plugin: String,
    action: String,
    parameters: Vec<SignatureParameter>,
    help: Option<String>,
}

impl ActionSignature {
    /// Build a signature, rejecting duplicate parameter names.
    pub fn new(
        plugin: impl Into<String>,
        action: impl Into<String>,
        parameters: Vec<SignatureParameter>,
    ) -> Result<Self> {
        let plugin = plugin.into();
        let action = action.into();
        let mut seen = HashSet::new();
        for param in &parameters {
            if param.name.is_empty() {
                return Err(Q2Error::InvalidSignature(format!(
                    "{plugin} {action}: parameter with empty name"
                )));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(Q2Error::InvalidSignature(format!(
                    "{plugin} {action}: duplicate parameter '{}'",
                    param.name
                )));
            }
        }
        Ok(Self {
            plugin,
            action,
            parameters,
            help: None,
        })
    }

    /// Attach the action's help text (description and epilog).
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    #[must_use]
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    #[must_use]
    pub fn parameters(&self) -> &[SignatureParameter] {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&SignatureParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Parameters the user must supply: required and not an output.
    pub fn user_required(&self) -> impl Iterator<Item = &SignatureParameter> {
        self.parameters
            .iter()
            .filter(|p| p.required && p.kind != ParamKind::Output)
    }
}
