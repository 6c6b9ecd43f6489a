//! Built-in invocation rules.
//!
//! - **Option rules** (`options`): unknown, duplicate and value-less options
//! - **Required rules** (`required`): required-parameter coverage
//!
//! Resolution and malformed-invocation reporting happen in the engine
//! itself, because they decide whether these rules run at all.

pub mod options;
pub mod required;

use crate::lint::rule::BoxedRule;

pub use options::{DuplicateOptionRule, MissingValueRule, UnknownOptionRule};
pub use required::MissingRequiredRule;

/// All built-in rules, in reporting order.
pub fn all_rules() -> Vec<BoxedRule> {
    vec![
        Box::new(UnknownOptionRule),
        Box::new(DuplicateOptionRule),
        Box::new(MissingRequiredRule),
        Box::new(MissingValueRule),
    ]
}
