//! WikiQA Wiki - Search and content ports and adapters
//!
//! This crate defines the ports for finding a Wikipedia page and reading its
//! plain-text extract, with a Wikimedia HTTP adapter and an in-memory adapter.

pub mod memory;
pub mod ports;
pub mod wikimedia;

pub use memory::MemoryWiki;
pub use ports::{PageFetcher, PageSearcher};
pub use wikimedia::WikimediaClient;
