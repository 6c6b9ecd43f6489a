//! Editor assistance for launcher invocations: completion and hover.
//!
//! Both start from a [`CursorContext`], the invocation words around a cursor
//! offset, and read everything they offer from the [`SignatureRepository`].
//!
//! [`SignatureRepository`]: crate::signatures::SignatureRepository

pub mod completion;
pub mod context;
pub mod hover;

pub use completion::{CompletionItem, CompletionKind, complete};
pub use context::{CursorContext, CursorSlot, Word, cursor_context};
pub use hover::{HoverInfo, hover};
