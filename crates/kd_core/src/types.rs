use serde::{Deserialize, Serialize};

/// A news item that passed the relevance filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub source: String,
    pub title: String,
    /// Plain text, at most 500 characters. Empty for scraped listings.
    pub summary: String,
    pub link: String,
    /// Publication date as `dd.mm.yyyy`.
    pub date: String,
}

/// The structured digest returned by the language model.
///
/// Every field is optional on the wire: the model is trusted to follow the
/// prompt format, and anything it leaves out (or sets to `null`) renders as a
/// default instead of failing the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigestDocument {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub sections: Option<Vec<Section>>,
    #[serde(default, rename = "requires_action")]
    pub actions: Option<Vec<ActionItem>>,
}

impl DigestDocument {
    pub fn period(&self) -> Option<&str> {
        self.period.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        self.sections.as_deref().unwrap_or_default()
    }

    /// Sections that have at least one item, in document order.
    pub fn populated_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections().iter().filter(|s| !s.items().is_empty())
    }

    pub fn actions(&self) -> &[ActionItem] {
        self.actions.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<Item>>,
}

impl Section {
    pub const DEFAULT_ICON: &'static str = "•";

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(Self::DEFAULT_ICON)
    }

    pub fn items(&self) -> &[Item] {
        self.items.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Item {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ActionItem {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}
