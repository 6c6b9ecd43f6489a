#[path = "../common/mod.rs"]
mod common;

mod extraction_props;
mod normalizer_props;
mod validation_props;
