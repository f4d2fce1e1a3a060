//! WikiQA Model - Extractive question-answering port
//!
//! This crate defines the port for span-extraction inference, along with
//! the hosted Hugging Face adapter and, behind the `local` feature, an
//! in-process Candle adapter.

pub mod huggingface;
#[cfg(feature = "local")]
pub mod local;
pub mod ports;
pub mod provider;
pub mod scoring;

// Re-export main types
pub use huggingface::HuggingFaceReader;
#[cfg(feature = "local")]
pub use local::LocalReader;
pub use ports::QuestionAnswerer;
pub use provider::{reader_from_config, DEFAULT_LOCAL_MODEL};
