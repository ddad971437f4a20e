//! Data layer: raw document types, loading and load errors

pub mod error;
pub mod loader;
pub mod types;

pub use error::DataError;
pub use loader::{DocumentKind, InputFormat, TraceDocuments, load_documents, load_documents_from_path};
