pub mod answer;
pub mod page;
pub mod query;

pub use answer::{span_text, ExtractedSpan, QaInput};
pub use page::{PageContent, SearchResult};
pub use query::validate_query;
