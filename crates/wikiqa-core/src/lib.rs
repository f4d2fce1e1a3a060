//! WikiQA Core - Domain models, errors, and configuration
//!
//! This crate contains the request-scoped domain types shared by the search,
//! fetch, and answer stages, plus the layered configuration they are built from.

pub mod config;
pub mod error;
pub mod models;

pub use error::{Result, WikiqaError};
