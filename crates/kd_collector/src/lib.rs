pub mod dedup;
pub mod html;
pub mod manager;
pub mod relevance;
pub mod sources;

pub use manager::Collector;
pub use relevance::KeywordFilter;
pub use sources::{Source, SourceKind};
