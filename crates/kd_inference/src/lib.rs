pub mod models;
pub mod prompt;
pub mod summarizer;

pub use models::{create_model, DigestModel};
pub use summarizer::{parse_digest, Summarizer};
