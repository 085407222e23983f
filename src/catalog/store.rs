//! In-memory catalog snapshot and its query operations.

use std::path::Path;

use crate::catalog::CatalogDocument;
use crate::catalog::query::{Matcher, Query, SearchKey};
use crate::error::Result;
use crate::models::{Category, FALLBACK_LANGUAGE, Item};

/// Owns the loaded categories and items and answers filter queries.
///
/// The snapshot is replaced as a whole by [`CatalogStore::load_from_json`];
/// a failed load leaves the previous snapshot in place. The store does no
/// locking of its own: hosts that share it across threads must serialize
/// access themselves.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    document: CatalogDocument,
    /// One entry per item, same order as `document.items`
    keys: Vec<SearchKey>,
    language: String,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create an empty store resolving titles and tags in English.
    pub fn new() -> Self {
        Self::with_language(FALLBACK_LANGUAGE)
    }

    /// Create an empty store resolving titles and tags in `language`.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            document: CatalogDocument::default(),
            keys: Vec::new(),
            language: language.into(),
        }
    }

    /// Create a store directly from an already validated document.
    pub fn from_document(document: CatalogDocument, language: impl Into<String>) -> Self {
        let language = language.into();
        let keys = build_keys(&document.items, &language);
        Self {
            document,
            keys,
            language,
        }
    }

    /// Load a catalog document, replacing the current snapshot.
    ///
    /// On failure the error detail is logged and the current snapshot is
    /// kept unchanged.
    pub fn load_from_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let document = match CatalogDocument::read(path) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("{e}");
                return Err(e);
            }
        };

        let keys = build_keys(&document.items, &self.language);
        log::info!(
            "Loaded {} categories and {} courses from {}",
            document.categories.len(),
            document.items.len(),
            path.display()
        );

        self.document = document;
        self.keys = keys;
        Ok(())
    }

    /// Write the current snapshot as a catalog document.
    pub fn save_to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        match self.document.write(path) {
            Ok(()) => {
                log::info!(
                    "Saved {} courses to {}",
                    self.document.items.len(),
                    path.display()
                );
                Ok(())
            }
            Err(e) => {
                log::error!("{e}");
                Err(e)
            }
        }
    }

    /// All items in load order.
    pub fn list_all(&self) -> &[Item] {
        &self.document.items
    }

    /// All categories in load order.
    pub fn list_categories(&self) -> &[Category] {
        &self.document.categories
    }

    /// Items matching every given criterion, in load order.
    ///
    /// `None` or an empty string leaves that dimension unfiltered. Unknown
    /// values produce an empty result, never an error.
    pub fn filter(
        &self,
        category: Option<&str>,
        subcategory: Option<&str>,
        text: Option<&str>,
    ) -> Vec<&Item> {
        self.select(&Matcher::new(category, subcategory, text))
    }

    /// Same as [`CatalogStore::filter`] with the criteria held in a [`Query`].
    pub fn query(&self, query: &Query) -> Vec<&Item> {
        self.select(&query.matcher())
    }

    fn select(&self, matcher: &Matcher<'_>) -> Vec<&Item> {
        if matcher.is_unrestricted() {
            return self.document.items.iter().collect();
        }

        self.document
            .items
            .iter()
            .zip(&self.keys)
            .filter(|(item, key)| matcher.matches(item, key))
            .map(|(item, _)| item)
            .collect()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.document.item(id)
    }

    /// Subcategories of `category`, empty if there is no such category.
    pub fn subcategories(&self, category: &str) -> &[String] {
        self.document
            .category(category)
            .map(|c| c.subcategories.as_slice())
            .unwrap_or_default()
    }

    /// Language used to resolve titles and tags for text search.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Switch the resolution language and rebuild the search keys.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
        self.keys = build_keys(&self.document.items, &self.language);
    }

    pub fn len(&self) -> usize {
        self.document.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.items.is_empty()
    }
}

fn build_keys(items: &[Item], language: &str) -> Vec<SearchKey> {
    items
        .iter()
        .map(|item| SearchKey::new(item, language))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::error::{AppError, LoadFailure};
    use crate::models::{Tags, Title};

    fn sample_catalog_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/catalog.sample.json")
    }

    fn loaded_store() -> CatalogStore {
        let mut store = CatalogStore::new();
        store
            .load_from_json(sample_catalog_path())
            .expect("sample catalog should load");
        store
    }

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|item| item.id.clone()).collect()
    }

    fn is_subsequence(part: &[&Item], all: &[Item]) -> bool {
        let mut rest = all.iter();
        part.iter()
            .all(|wanted| rest.any(|item| std::ptr::eq(item, *wanted)))
    }

    #[test]
    fn test_load_sample_catalog() {
        let store = loaded_store();
        assert_eq!(store.len(), 26);
        assert_eq!(store.list_categories().len(), 3);

        for item in store.list_all() {
            assert!(!item.id.is_empty());
            assert!(!item.category.is_empty());
            assert!(!item.subcategory.is_empty());
            assert!(item.link.starts_with("http"));
        }
        for category in store.list_categories() {
            assert!(!category.name.is_empty());
            assert!(!category.subcategories.is_empty());
        }
    }

    #[test]
    fn test_load_is_idempotent() {
        let first = loaded_store();
        let second = loaded_store();
        assert_eq!(first.list_all(), second.list_all());
        assert_eq!(first.list_categories(), second.list_categories());
    }

    #[test]
    fn test_failed_load_keeps_previous_snapshot() {
        let tmp = TempDir::new().unwrap();
        let mut store = loaded_store();
        let before = store.list_all().to_vec();

        let missing = store.load_from_json(tmp.path().join("missing.json"));
        assert!(missing.unwrap_err().is_load_error());

        let malformed = tmp.path().join("malformed.json");
        fs::write(&malformed, "{\"courses\": [").unwrap();
        assert!(store.load_from_json(&malformed).unwrap_err().is_load_error());

        let invalid = tmp.path().join("invalid.json");
        fs::write(
            &invalid,
            json!({"courses": [{"id": "c-1", "title": "No link", "category": "A", "subcategory": "B"}]})
                .to_string(),
        )
        .unwrap();
        let err = store.load_from_json(&invalid).unwrap_err();
        assert!(matches!(
            err,
            AppError::CatalogLoad {
                cause: LoadFailure::InvalidRecord { index: 0, .. },
                ..
            }
        ));

        assert_eq!(store.list_all(), before.as_slice());
        assert!(!store.filter(Some("Programming"), None, None).is_empty());
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let tmp = TempDir::new().unwrap();
        let original = loaded_store();

        // The fixture must exercise every shape for the round trip to mean anything
        let items = original.list_all();
        assert!(items.iter().any(|i| matches!(i.title, Title::Plain(_))));
        assert!(items.iter().any(|i| matches!(i.title, Title::Multilingual(_))));
        assert!(items.iter().any(|i| matches!(i.tags, Some(Tags::Flat(_)))));
        assert!(items.iter().any(|i| matches!(i.tags, Some(Tags::Multilingual(_)))));
        assert!(items.iter().any(|i| i.tags.is_none()));
        assert!(items.iter().any(|i| i.provider.is_none()));

        let saved = tmp.path().join("saved/catalog.json");
        original.save_to_json(&saved).unwrap();

        let mut reloaded = CatalogStore::new();
        reloaded.load_from_json(&saved).unwrap();
        assert_eq!(reloaded.list_all(), original.list_all());
        assert_eq!(reloaded.list_categories(), original.list_categories());
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let store = loaded_store();
        let err = store.save_to_json(blocker.join("catalog.json")).unwrap_err();
        assert!(err.is_save_error());
    }

    #[test]
    fn test_filter_category_only() {
        let store = loaded_store();
        for category in ["English", "Programming", "Design"] {
            let items = store.filter(Some(category), None, None);
            assert!(!items.is_empty());
            assert!(items.iter().all(|item| item.category == category));
        }
    }

    #[test]
    fn test_filter_category_and_subcategory() {
        let store = loaded_store();
        for (category, subcategory) in [
            ("English", "IELTS"),
            ("Programming", "Python"),
            ("Design", "UI/UX"),
        ] {
            let items = store.filter(Some(category), Some(subcategory), None);
            assert!(!items.is_empty());
            assert!(items
                .iter()
                .all(|i| i.category == category && i.subcategory == subcategory));
        }
    }

    #[test]
    fn test_filter_subcategory_alone_crosses_categories() {
        let store = loaded_store();
        let items = store.filter(None, Some("Python"), None);
        assert!(!items.is_empty());
        assert!(items.iter().all(|item| item.subcategory == "Python"));
    }

    #[test]
    fn test_filter_text_title_tag_and_provider() {
        let store = loaded_store();

        let by_title = store.filter(None, None, Some("IELTS"));
        assert!(by_title.iter().any(|i| i.resolve_title("en").contains("IELTS")));

        let tagged = store
            .list_all()
            .iter()
            .find(|item| !item.resolve_tags("en").is_empty())
            .unwrap();
        let tag = &tagged.resolve_tags("en")[0];
        let by_tag = store.filter(None, None, Some(tag.as_str()));
        assert!(by_tag.iter().any(|item| item.id == tagged.id));

        let by_provider = store.filter(None, None, Some("coursera"));
        assert!(!by_provider.is_empty());
        assert!(by_provider.iter().all(|item| {
            item.provider_or_empty().to_lowercase().contains("coursera")
                || item.resolve_title("en").to_lowercase().contains("coursera")
                || item
                    .resolve_tags("en")
                    .iter()
                    .any(|t| t.to_lowercase().contains("coursera"))
        }));
    }

    #[test]
    fn test_filter_text_case_insensitive() {
        let store = loaded_store();
        let lower = ids(&store.filter(None, None, Some("python")));
        let upper = ids(&store.filter(None, None, Some("PYTHON")));
        let title = ids(&store.filter(None, None, Some("Python")));

        assert!(!lower.is_empty());
        assert!(
            store
                .filter(None, None, Some("python"))
                .iter()
                .any(|item| item.resolve_title("en") == "Python Fundamentals")
        );
        assert_eq!(lower, upper);
        assert_eq!(lower, title);
    }

    #[test]
    fn test_filter_no_matches_returns_empty() {
        let store = loaded_store();
        assert!(store.filter(Some("DoesNotExist"), None, None).is_empty());
        assert!(store.filter(Some("English"), Some("Python"), None).is_empty());
        assert!(store.filter(None, None, Some("NonExistentSearchTerm")).is_empty());
    }

    #[test]
    fn test_filter_empty_criteria_returns_all() {
        let store = loaded_store();
        let all = store.filter(None, Some(""), Some(""));
        assert_eq!(all.len(), store.len());
        assert!(Query::new().is_empty());
        assert_eq!(store.query(&Query::new()).len(), store.len());
    }

    #[test]
    fn test_filter_combined() {
        let store = loaded_store();
        let items = store.filter(Some("Programming"), Some("Python"), Some("python"));
        assert!(!items.is_empty());
        for item in &items {
            assert_eq!(item.category, "Programming");
            assert_eq!(item.subcategory, "Python");
            let needle = "python";
            assert!(
                item.resolve_title("en").to_lowercase().contains(needle)
                    || item.provider_or_empty().to_lowercase().contains(needle)
                    || item
                        .resolve_tags("en")
                        .iter()
                        .any(|t| t.to_lowercase().contains(needle))
            );
        }
    }

    #[test]
    fn test_filter_is_intersection_of_single_criteria() {
        let store = loaded_store();

        let mut categories: Vec<Option<&str>> = vec![None];
        let mut subcategories: Vec<Option<&str>> = vec![None];
        for category in store.list_categories() {
            categories.push(Some(category.name.as_str()));
            subcategories.extend(category.subcategories.iter().map(|s| Some(s.as_str())));
        }
        categories.push(Some("DoesNotExist"));
        let texts = [None, Some("python"), Some("IELTS"), Some("design"), Some("zzz")];

        for &category in &categories {
            let by_category: HashSet<_> = ids(&store.filter(category, None, None))
                .into_iter()
                .collect();
            for &subcategory in &subcategories {
                let by_subcategory: HashSet<_> = ids(&store.filter(None, subcategory, None))
                    .into_iter()
                    .collect();
                for &text in &texts {
                    let by_text: HashSet<_> =
                        ids(&store.filter(None, None, text)).into_iter().collect();

                    let combined = store.filter(category, subcategory, text);
                    let expected: Vec<String> = store
                        .list_all()
                        .iter()
                        .map(|item| item.id.clone())
                        .filter(|id| {
                            by_category.contains(id)
                                && by_subcategory.contains(id)
                                && by_text.contains(id)
                        })
                        .collect();

                    assert_eq!(ids(&combined), expected);
                    assert!(is_subsequence(&combined, store.list_all()));
                }
            }
        }
    }

    #[test]
    fn test_query_matches_filter() {
        let store = loaded_store();
        let query = Query::new().category("Design").text("ui");
        assert_eq!(
            ids(&store.query(&query)),
            ids(&store.filter(Some("Design"), None, Some("ui")))
        );
    }

    #[test]
    fn test_get_and_subcategories() {
        let store = loaded_store();
        let first = &store.list_all()[0];
        assert_eq!(store.get(&first.id), Some(first));
        assert_eq!(store.get("missing"), None);

        assert_eq!(store.subcategories("English"), ["IELTS"]);
        assert!(store.subcategories("Cooking").is_empty());
    }

    #[test]
    fn test_language_switch_changes_text_search() {
        let mut store = loaded_store();
        assert!(store.filter(None, None, Some("nhập môn")).is_empty());

        store.set_language("vi");
        assert_eq!(store.language(), "vi");
        assert!(!store.filter(None, None, Some("nhập môn")).is_empty());
    }

    #[test]
    fn test_filter_performance() {
        let categories = [("English", "IELTS"), ("Programming", "Python"), ("Design", "UI/UX")];
        let items = (0..1200)
            .map(|i| {
                let (category, subcategory) = categories[i % categories.len()];
                Item::new(
                    format!("c-{i:04}"),
                    format!("{subcategory} course number {i}"),
                    category,
                    subcategory,
                    format!("https://example.com/{i}"),
                )
                .with_provider(if i % 2 == 0 { "Coursera" } else { "Udemy" })
                .with_tags(Tags::Flat(vec!["beginner".into(), format!("tag{i}")]))
            })
            .collect();
        let store = CatalogStore::from_document(
            CatalogDocument {
                categories: Vec::new(),
                items,
            },
            "en",
        );

        let start = Instant::now();
        let mut matched = 0;
        for _ in 0..500 {
            matched += store
                .filter(Some("Programming"), Some("Python"), Some("python"))
                .len();
        }
        let elapsed = start.elapsed();

        assert_eq!(matched, 500 * 400);
        assert!(
            elapsed < Duration::from_secs(2),
            "500 filter passes took {elapsed:?}"
        );
    }
}
