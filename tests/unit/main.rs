#[path = "../common/mod.rs"]
mod common;

mod codes_tests;
mod config_tests;
mod hierarchy_tests;
