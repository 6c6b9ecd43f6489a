//! Invocation validation framework.
//!
//! - `InvocationRule` trait for checks over one resolved invocation
//! - `ValidationEngine` for resolving signatures and running rules
//! - `codes` registry holding every message template and default severity
//! - `Diagnostic` values positioned by byte range
//! - `ValidationConfig` for disabling codes, severity overrides and strict mode
//!
//! # Example
//!
//! ```
//! use q2lsp::document::DocumentSnapshot;
//! use q2lsp::lint::{DiagnosticCode, ValidationEngine};
//! use q2lsp::signatures::{ActionSignature, ParamKind, SignatureParameter, SignatureRepository};
//!
//! let repository = SignatureRepository::from_signatures([ActionSignature::new(
//!     "demux",
//!     "summarize",
//!     vec![SignatureParameter::new("i-data", ParamKind::Input).required()],
//! )
//! .unwrap()]);
//!
//! let engine = ValidationEngine::with_defaults();
//! let snapshot = DocumentSnapshot::new("file:///run.sh", 1, "qiime demux summarize\n");
//! let result = engine.validate_document(&snapshot, &repository);
//!
//! assert_eq!(result.diagnostics.len(), 1);
//! assert_eq!(result.diagnostics[0].code, DiagnosticCode::MissingRequired);
//! ```

pub mod codes;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod rule;
pub mod rules;
pub mod suggest;

pub use codes::{CodeEntry, DiagnosticCode, all_codes, describe};
pub use config::ValidationConfig;
pub use diagnostic::{Diagnostic, Severity};
pub use engine::{RuleInfo, ValidationEngine, ValidationError, ValidationResult};
pub use rule::{BoxedRule, InvocationRule, RuleContext};
pub use rules::all_rules;
