//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use q2lsp::document::DocumentSnapshot;
use q2lsp::lint::{ValidationEngine, ValidationResult};
use q2lsp::signatures::{SignatureRepository, hierarchy};

pub const URI: &str = "file:///work/pipeline.sh";

pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

/// The repository described by `tests/fixtures/hierarchy.json`.
pub fn fixture_repository() -> SignatureRepository {
    let catalog = hierarchy::load_file(&fixture_path("hierarchy.json")).expect("load hierarchy fixture");
    let mut repository = SignatureRepository::new();
    repository.load_catalog(catalog);
    repository
}

pub fn snapshot(text: &str) -> DocumentSnapshot {
    DocumentSnapshot::new(URI, 1, text)
}

/// Validate `text` with the default engine against the fixture repository.
pub fn validate(text: &str) -> ValidationResult {
    ValidationEngine::with_defaults().validate_document(&snapshot(text), &fixture_repository())
}

/// The slice of `text` a diagnostic range covers.
pub fn covered<'a>(text: &'a str, start: usize, end: usize) -> &'a str {
    &text[start..end]
}
