//! q2lsp - diagnostics for QIIME 2 command lines embedded in shell scripts.
//!
//! The pipeline runs extraction ([`extract`]) over a [`document`] snapshot,
//! resolves each invocation against a [`signatures`] repository and checks
//! it with the [`lint`] engine. The [`publisher`] debounces edits and the
//! [`lsp`] module serves the results to editors, along with [`assist`]
//! completion and hover.

pub mod app;
pub mod assist;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod lint;
pub mod lsp;
pub mod options;
pub mod publisher;
pub mod signatures;
pub mod test_utils;

pub use error::{Q2Error, Result};
