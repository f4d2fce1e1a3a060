//! WikiQA Retrieval - Search, fetch, and answer pipeline
//!
//! This crate implements the question-answering use case, sequencing the
//! page search, content fetch, and span extraction ports.

pub mod models;
pub mod pipeline;

pub use models::{QaReport, SourceReference};
pub use pipeline::QaPipeline;
