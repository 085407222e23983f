//! Filter criteria and the precomputed text used to match them.
//!
//! Text search is a case-insensitive substring match over the resolved
//! title, the provider and the resolved tags. Lowercasing every record on
//! every keystroke is wasteful, so each record gets a [`SearchKey`] with
//! those fields already lowercased when the snapshot is built.

use serde::{Deserialize, Serialize};

use crate::models::Item;

/// Filter criteria. Unset or empty criteria do not filter.
///
/// All set criteria must hold (AND); there is no OR mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Exact, case-sensitive category name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Exact, case-sensitive subcategory name (independent of `category`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Case-insensitive substring of title, provider or any tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Whether no criterion would filter anything.
    pub fn is_empty(&self) -> bool {
        self.matcher().is_unrestricted()
    }

    pub(crate) fn matcher(&self) -> Matcher<'_> {
        Matcher::new(
            self.category.as_deref(),
            self.subcategory.as_deref(),
            self.text.as_deref(),
        )
    }
}

/// Normalized criteria ready to test against records.
#[derive(Debug)]
pub(crate) struct Matcher<'q> {
    category: Option<&'q str>,
    subcategory: Option<&'q str>,
    needle: Option<String>,
}

impl<'q> Matcher<'q> {
    pub(crate) fn new(
        category: Option<&'q str>,
        subcategory: Option<&'q str>,
        text: Option<&str>,
    ) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            subcategory: subcategory.filter(|s| !s.is_empty()),
            needle: text.filter(|t| !t.is_empty()).map(str::to_lowercase),
        }
    }

    pub(crate) fn is_unrestricted(&self) -> bool {
        self.category.is_none() && self.subcategory.is_none() && self.needle.is_none()
    }

    /// Equality checks run before the substring scan.
    pub(crate) fn matches(&self, item: &Item, key: &SearchKey) -> bool {
        self.category.is_none_or(|c| item.category == c)
            && self.subcategory.is_none_or(|s| item.subcategory == s)
            && self.needle.as_deref().is_none_or(|n| key.contains(n))
    }
}

/// Lowercased searchable text of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchKey {
    title: String,
    provider: String,
    tags: Vec<String>,
}

impl SearchKey {
    pub(crate) fn new(item: &Item, language: &str) -> Self {
        Self {
            title: item.resolve_title(language).to_lowercase(),
            provider: item.provider_or_empty().to_lowercase(),
            tags: item
                .resolve_tags(language)
                .iter()
                .map(|tag| tag.to_lowercase())
                .collect(),
        }
    }

    /// `needle` must already be lowercase.
    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.title.contains(needle)
            || self.provider.contains(needle)
            || self.tags.iter().any(|tag| tag.contains(needle))
    }
}
