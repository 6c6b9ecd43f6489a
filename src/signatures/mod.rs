//! Action signatures and the repository that serves them.

pub mod hierarchy;
pub mod repository;
pub mod types;

pub use repository::{LookupMiss, SignatureCatalog, SignatureRepository};
pub use types::{ActionSignature, ParamKind, SignatureParameter};
