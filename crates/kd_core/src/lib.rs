pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{Credentials, DigestConfig};
pub use error::{Error, Result};
pub use types::{ActionItem, Article, DigestDocument, Item, Section};

/// `dd.mm.yyyy`, the date format used across the digest.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub mod prelude {
    pub use super::{Article, DigestConfig, DigestDocument, Error, Result};
}
