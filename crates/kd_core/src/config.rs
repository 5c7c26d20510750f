use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Everything the pipeline needs except secrets.
///
/// `Default` carries the production tables. A JSON file passed with
/// `--config` may override any subset of the top-level fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub branding: Branding,
    pub keywords: Vec<String>,
    pub feeds: Vec<FeedSource>,
    pub scrape_targets: Vec<ScrapeTarget>,
    pub http: HttpConfig,
    pub collection: CollectionConfig,
    pub model: ModelConfig,
    pub output: OutputConfig,
    pub smtp: SmtpConfig,
}

impl DigestConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            branding: Branding::default(),
            keywords: ENERGY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            feeds: default_feeds(),
            scrape_targets: default_scrape_targets(),
            http: HttpConfig::default(),
            collection: CollectionConfig::default(),
            model: ModelConfig::default(),
            output: OutputConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    /// Full legal name shown in the page banner and the email header.
    pub association: String,
    /// Short tag used in the subject line and attachment name.
    pub tag: String,
    pub site: String,
    /// Source names listed in the title block caption.
    pub caption_sources: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            association: "ОЮЛ «Казахстанская Электроэнергетическая Ассоциация»".to_string(),
            tag: "КЭА".to_string(),
            site: "kea.kz".to_string(),
            caption_sources: "МЭМР РК, Kapital.kz, QazaqGreen, BAQ.KZ, Kursiv, Inbusiness.kz"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

/// A listing page without a feed.
///
/// Selectors are tried in order; the first one that matches anything wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeTarget {
    pub name: String,
    pub url: String,
    /// Base used to resolve relative links.
    pub base: String,
    pub item_selectors: Vec<String>,
    pub title_selectors: Vec<String>,
    pub link_selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; KEADigestBot/1.0; +https://kea.kz)".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub lookback_days: i64,
    pub summary_max_chars: usize,
    pub scrape_item_limit: usize,
    pub dedup_prefix_chars: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            lookback_days: 7,
            summary_max_chars: 500,
            scrape_item_limit: 20,
            dedup_prefix_chars: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pdf_path: PathBuf,
    pub logo_path: PathBuf,
    pub font_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("digest_output.pdf"),
            logo_path: PathBuf::from("assets/logo.png"),
            font_dir: PathBuf::from("assets/fonts"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 465,
        }
    }
}

/// Secrets, read from the environment once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub mail_user: String,
    pub mail_password: String,
    pub recipients: Vec<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("mail_user", &self.mail_user)
            .field("mail_password", &"<redacted>")
            .field("recipients", &self.recipients)
            .finish()
    }
}

impl Credentials {
    pub const API_KEY_VAR: &'static str = "GEMINI_API_KEY";
    pub const MAIL_USER_VAR: &'static str = "GMAIL_USER";
    pub const MAIL_PASSWORD_VAR: &'static str = "GMAIL_APP_PASSWORD";
    pub const RECIPIENTS_VAR: &'static str = "RECIPIENT_EMAILS";

    /// Load credentials from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| Error::Config(format!("{} must be set", name)))
        };

        let recipients = parse_recipients(&require(Self::RECIPIENTS_VAR)?);
        if recipients.is_empty() {
            return Err(Error::Config(format!(
                "{} must list at least one address",
                Self::RECIPIENTS_VAR
            )));
        }

        Ok(Self {
            api_key: require(Self::API_KEY_VAR)?,
            mail_user: require(Self::MAIL_USER_VAR)?,
            mail_password: require(Self::MAIL_PASSWORD_VAR)?,
            recipients,
        })
    }
}

pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

const ENERGY_KEYWORDS: &[&str] = &[
    "энергетик", "электроэнерги", "электростанци", "электросет",
    "тариф", "арем", "мэмр", "минэнерго", "генераци", "мощност",
    "квт", "мвт", "гвт", "тэс", "грэс", "гэс", "тэц",
    "вэс", "сэс", "виэ", "возобновляем", "уголь", "угольн",
    "накопитель", "bess", "водород", "атомн", "аэс",
    "энергосистем", "энергобаланс", "дефицит электр",
    "импорт электр", "экспорт электр", "подстанци",
    "kegoc", "кегок", "самрук", "samruk",
    "зелён", "зелен", "энергетический переход",
    "qazaqgreen", "казатомпром", "kazenergy",
    "ток", "напряжени", "сеть передач",
];

fn default_feeds() -> Vec<FeedSource> {
    [
        ("QazaqGreen", "https://qazaqgreen.com/feed/"),
        ("Kapital.kz", "https://kapital.kz/rss/"),
        ("Kursiv.media", "https://kursiv.media/feed/"),
        ("Inbusiness.kz", "https://inbusiness.kz/ru/rss/"),
        ("Bizmedia.kz", "https://bizmedia.kz/feed/"),
        ("BAQ.KZ", "https://baq.kz/rss/"),
        ("Forbes.kz", "https://forbes.kz/rss/"),
        ("Energyprom.kz", "https://energyprom.kz/rss/"),
        ("Azattyq Ruhy", "https://azattyq-ruhy.kz/feed/"),
    ]
    .into_iter()
    .map(|(name, url)| FeedSource {
        name: name.to_string(),
        url: url.to_string(),
    })
    .collect()
}

fn default_scrape_targets() -> Vec<ScrapeTarget> {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    vec![
        ScrapeTarget {
            name: "МЭМР РК".to_string(),
            url: "https://energo.gov.kz/ru/novosti".to_string(),
            base: "https://energo.gov.kz".to_string(),
            item_selectors: strings(&[".news-item", ".news__item", "article"]),
            title_selectors: strings(&["h2", "h3", ".title", ".news__title"]),
            link_selector: "a".to_string(),
        },
        ScrapeTarget {
            name: "Правительство РК".to_string(),
            url: "https://primeminister.kz/ru/news".to_string(),
            base: "https://primeminister.kz".to_string(),
            item_selectors: strings(&[".news-item", ".list__item", ".article-item"]),
            title_selectors: strings(&["h2", "h3", ".title", ".name"]),
            link_selector: "a".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_credentials_from_lookup() {
        let env = vars(&[
            ("GEMINI_API_KEY", "key"),
            ("GMAIL_USER", "bot@kea.kz"),
            ("GMAIL_APP_PASSWORD", "secret"),
            ("RECIPIENT_EMAILS", " a@kea.kz, b@kea.kz ,,"),
        ]);
        let creds = Credentials::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(creds.recipients, vec!["a@kea.kz", "b@kea.kz"]);
        assert_eq!(creds.mail_user, "bot@kea.kz");
        assert!(!format!("{:?}", creds).contains("secret"));
    }

    #[test]
    fn test_missing_variable_is_config_error() {
        let env = vars(&[
            ("GMAIL_USER", "bot@kea.kz"),
            ("GMAIL_APP_PASSWORD", "secret"),
            ("RECIPIENT_EMAILS", "a@kea.kz"),
        ]);
        let err = Credentials::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_empty_recipient_list_rejected() {
        let env = vars(&[
            ("GEMINI_API_KEY", "key"),
            ("GMAIL_USER", "bot@kea.kz"),
            ("GMAIL_APP_PASSWORD", "secret"),
            ("RECIPIENT_EMAILS", " , "),
        ]);
        assert!(Credentials::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_default_tables() {
        let config = DigestConfig::default();
        assert_eq!(config.feeds.len(), 9);
        assert_eq!(config.scrape_targets.len(), 2);
        assert!(config.keywords.iter().any(|k| k == "минэнерго"));
        assert_eq!(config.http.timeout(), Duration::from_secs(15));
        assert_eq!(config.smtp.port, 465);
    }

    #[test]
    fn test_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"feeds": [{{"name": "Test", "url": "http://localhost/feed"}}], "collection": {{"lookback_days": 3}}}}"#
        )
        .unwrap();

        let config = DigestConfig::from_file(file.path()).unwrap();
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.collection.lookback_days, 3);
        assert_eq!(config.collection.dedup_prefix_chars, 60);
        assert_eq!(config.scrape_targets.len(), 2);
    }
}
