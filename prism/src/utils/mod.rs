//! Utility functions for the library and CLI

pub mod file;
pub mod json;
pub mod otlp;
pub mod time;
