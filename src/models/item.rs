//! Course record data structure.
//!
//! Source documents come in two shapes: older ones carry a plain `title`
//! and a flat `tags` list, newer ones map language codes to values. The
//! shape is detected once here, and everything downstream works with
//! [`Title`] and [`Tags`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validation::{self, ValidationError};

/// Language used when the requested one has no value.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Display title when no usable title exists.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// A course title, either single-language or keyed by language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Title {
    Plain(String),
    Multilingual(IndexMap<String, String>),
}

impl Title {
    /// Resolve to a display string for `language`.
    ///
    /// Lookup order is `language`, then `"en"`, then [`UNKNOWN_TITLE`].
    /// Empty values count as missing.
    pub fn resolve(&self, language: &str) -> &str {
        match self {
            Title::Plain(title) if title.is_empty() => UNKNOWN_TITLE,
            Title::Plain(title) => title.as_str(),
            Title::Multilingual(titles) => lookup(titles, language)
                .map(String::as_str)
                .unwrap_or(UNKNOWN_TITLE),
        }
    }

    fn parse(value: &Value) -> Result<Self, ValidationError> {
        const EXPECTED: &str = "a string or a map of language code to string";

        match value {
            Value::Null => Err(ValidationError::Missing { field: "title" }),
            Value::String(title) => Ok(Title::Plain(title.clone())),
            Value::Object(map) => map
                .iter()
                .map(|(lang, title)| match title {
                    Value::String(title) => Ok((lang.clone(), title.clone())),
                    _ => Err(ValidationError::WrongType {
                        field: "title",
                        expected: EXPECTED,
                    }),
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Title::Multilingual),
            _ => Err(ValidationError::WrongType {
                field: "title",
                expected: EXPECTED,
            }),
        }
    }
}

impl From<&str> for Title {
    fn from(title: &str) -> Self {
        Title::Plain(title.to_string())
    }
}

impl From<String> for Title {
    fn from(title: String) -> Self {
        Title::Plain(title)
    }
}

/// Course tags, either one flat list or one list per language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    Flat(Vec<String>),
    Multilingual(IndexMap<String, Vec<String>>),
}

impl Tags {
    /// Resolve to the tag list for `language`, falling back to `"en"`.
    pub fn resolve(&self, language: &str) -> &[String] {
        match self {
            Tags::Flat(tags) => tags.as_slice(),
            Tags::Multilingual(tags) => lookup(tags, language)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        }
    }

    /// Whether there are no tags at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Tags::Flat(tags) => tags.is_empty(),
            Tags::Multilingual(tags) => tags.is_empty(),
        }
    }

    /// Parse a raw `tags` value. Missing, `null`, `[]` and `{}` all become `None`.
    fn parse(value: Option<&Value>) -> Result<Option<Self>, ValidationError> {
        const EXPECTED: &str = "a list of strings or a map of language code to list";

        let wrong_type = || ValidationError::WrongType {
            field: "tags",
            expected: EXPECTED,
        };

        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(_)) => {
                let tags = validation::string_list(value, "tags", EXPECTED)?;
                Ok((!tags.is_empty()).then_some(Tags::Flat(tags)))
            }
            Some(Value::Object(map)) => {
                let tags = map
                    .iter()
                    .map(|(lang, list)| {
                        if !list.is_array() {
                            return Err(wrong_type());
                        }
                        let list = validation::string_list(Some(list), "tags", EXPECTED)?;
                        Ok((lang.clone(), list))
                    })
                    .collect::<Result<IndexMap<_, _>, _>>()?;
                Ok((!tags.is_empty()).then_some(Tags::Multilingual(tags)))
            }
            Some(_) => Err(wrong_type()),
        }
    }
}

/// Look up a language-keyed value with `"en"` fallback, skipping empty values.
fn lookup<'a, T: Blank>(values: &'a IndexMap<String, T>, language: &str) -> Option<&'a T> {
    [language, FALLBACK_LANGUAGE]
        .into_iter()
        .filter_map(|lang| values.get(lang))
        .find(|value| !value.is_blank())
}

trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for Vec<String> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// One course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Item {
    /// Unique identifier, e.g. `c-0001`
    pub id: String,

    /// Course title
    pub title: Title,

    /// Main category name
    pub category: String,

    /// Subcategory name
    pub subcategory: String,

    /// Course provider/platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Course URL
    pub link: String,

    /// Search tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl Item {
    /// Create an item without provider or tags.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<Title>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            subcategory: subcategory.into(),
            provider: None,
            link: link.into(),
            tags: None,
        }
    }

    /// Set the provider. Empty strings are stored as absent.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        let provider = provider.into();
        self.provider = (!provider.is_empty()).then_some(provider);
        self
    }

    /// Set the tags. Empty lists are stored as absent.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = (!tags.is_empty()).then_some(tags);
        self
    }

    /// Display title for `language`.
    pub fn resolve_title(&self, language: &str) -> &str {
        self.title.resolve(language)
    }

    /// Tags for `language`; empty when the item has none.
    pub fn resolve_tags(&self, language: &str) -> &[String] {
        self.tags
            .as_ref()
            .map(|tags| tags.resolve(language))
            .unwrap_or_default()
    }

    /// Provider, or an empty string when absent.
    pub fn provider_or_empty(&self) -> &str {
        self.provider.as_deref().unwrap_or_default()
    }

    /// Parse a raw JSON record.
    ///
    /// `title` and `tags` are accepted in either shape; the shape is
    /// detected from the value itself.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let record = validation::as_object(value, "course")?;

        let id = validation::required_str(record, "id")?;
        let title = Title::parse(record.get("title").unwrap_or(&Value::Null))?;
        let category = validation::required_str(record, "category")?;
        let subcategory = validation::required_str(record, "subcategory")?;
        let provider = validation::optional_str(record, "provider")?;
        let link = validation::required_str(record, "link")?;
        let tags = Tags::parse(record.get("tags"))?;

        if !link.starts_with("http") {
            return Err(ValidationError::InvalidLink {
                field: "link",
                value: link.to_string(),
            });
        }

        Ok(Self {
            id: id.to_string(),
            title,
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            provider,
            link: link.to_string(),
            tags,
        })
    }
}

impl TryFrom<Value> for Item {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Item::from_value(&value)
    }
}
