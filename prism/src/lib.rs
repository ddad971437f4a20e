//! Normalize OpenTelemetry and Langfuse trace exports into one span tree.
//!
//! ```no_run
//! use traceprism::data::{InputFormat, load_documents_from_path};
//!
//! let documents = load_documents_from_path("trace.json", InputFormat::Auto)?;
//! for root in documents.to_span_tree() {
//!     println!("{} ({})", root.title, root.category.as_str());
//! }
//! # Ok::<(), traceprism::data::DataError>(())
//! ```

pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
