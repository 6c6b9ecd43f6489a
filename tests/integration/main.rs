#[path = "../common/mod.rs"]
mod common;

mod assist_tests;
mod lsp_tests;
mod publisher_tests;
mod scenario_tests;
