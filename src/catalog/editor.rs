//! Administrative edits to a catalog document on disk.
//!
//! The store itself is read-only. Adding, editing or deleting categories and
//! courses goes through a [`CatalogEditor`] that owns the document, and hosts
//! reload their store after [`CatalogEditor::save`].

use std::path::{Path, PathBuf};

use crate::catalog::{CatalogDocument, next_id};
use crate::error::{AppError, Result};
use crate::models::{Category, Item, Tags, Title, ValidationError};
use crate::utils::parse_http_url;

/// Form values for a new or edited course.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    /// English title
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub provider: Option<String>,
    pub link: String,
    pub tags: Vec<String>,
}

impl NewItem {
    /// Trim every value and check required fields.
    fn normalized(&self) -> Result<Self> {
        let title = required(&self.title, "title")?;
        let category = required(&self.category, "category")?;
        let subcategory = required(&self.subcategory, "subcategory")?;
        let link = required(&self.link, "link")?;

        if parse_http_url(&link).is_none() {
            return Err(ValidationError::InvalidLink {
                field: "link",
                value: link,
            }
            .into());
        }

        Ok(Self {
            title,
            category,
            subcategory,
            provider: self
                .provider
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            link,
            tags: self
                .tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field }.into());
    }
    Ok(value.to_string())
}

/// An open catalog document with pending edits.
#[derive(Debug)]
pub struct CatalogEditor {
    path: PathBuf,
    document: CatalogDocument,
    id_prefix: String,
}

impl CatalogEditor {
    /// Open the document at `path` for editing.
    pub fn open(path: impl Into<PathBuf>, id_prefix: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let document = CatalogDocument::read(&path)?;
        Ok(Self {
            path,
            document,
            id_prefix: id_prefix.into(),
        })
    }

    /// Start a new, empty document that will be written to `path`.
    pub fn create(path: impl Into<PathBuf>, id_prefix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            document: CatalogDocument::default(),
            id_prefix: id_prefix.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &CatalogDocument {
        &self.document
    }

    /// Write the edited document back to its path.
    pub fn save(&self) -> Result<()> {
        self.document.write(&self.path)?;
        log::info!("Catalog saved to {}", self.path.display());
        Ok(())
    }

    /// Add an empty category.
    pub fn add_category(&mut self, name: &str) -> Result<()> {
        let name = required(name, "name")?;
        if self.document.category(&name).is_some() {
            return Err(AppError::conflict(format!("category '{name}'")));
        }

        log::debug!("Adding category {name}");
        self.document.categories.push(Category::new(name, Vec::new()));
        Ok(())
    }

    /// Rename a category and replace its subcategories.
    ///
    /// Courses in the old category move to the new name; their subcategory
    /// is left as-is even if it is no longer listed.
    pub fn edit_category(
        &mut self,
        name: &str,
        new_name: &str,
        subcategories: &[String],
    ) -> Result<()> {
        let new_name = required(new_name, "name")?;
        if new_name != name && self.document.category(&new_name).is_some() {
            return Err(AppError::conflict(format!("category '{new_name}'")));
        }

        let category = self
            .document
            .categories
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| AppError::not_found(format!("category '{name}'")))?;

        category.name = new_name.clone();
        category.subcategories = subcategories
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let mut moved = 0;
        for item in self.document.items.iter_mut().filter(|i| i.category == name) {
            item.category = new_name.clone();
            moved += 1;
        }

        log::debug!("Renamed category {name} to {new_name} ({moved} courses moved)");
        Ok(())
    }

    /// Delete a category and every course in it.
    ///
    /// Returns the number of courses removed.
    pub fn delete_category(&mut self, name: &str) -> Result<usize> {
        let before = self.document.categories.len();
        self.document.categories.retain(|c| c.name != name);
        if self.document.categories.len() == before {
            return Err(AppError::not_found(format!("category '{name}'")));
        }

        let items_before = self.document.items.len();
        self.document.items.retain(|item| item.category != name);
        let removed = items_before - self.document.items.len();

        log::debug!("Deleted category {name} and {removed} courses");
        Ok(removed)
    }

    /// Add a course with a generated id. Returns the new id.
    pub fn add_item(&mut self, values: &NewItem) -> Result<String> {
        let values = values.normalized()?;
        self.warn_if_unlisted(&values);
        let id = next_id(
            &self.id_prefix,
            self.document.items.iter().map(|item| item.id.as_str()),
        );

        let mut item = Item::new(
            id.clone(),
            Title::Multilingual([("en".to_string(), values.title)].into()),
            values.category,
            values.subcategory,
            values.link,
        )
        .with_tags(Tags::Flat(values.tags));
        item.provider = values.provider;

        log::debug!("Adding course {id}");
        self.document.items.push(item);
        Ok(id)
    }

    /// Replace the editable fields of course `id`.
    ///
    /// Only the English title is touched; other translations are kept.
    pub fn edit_item(&mut self, id: &str, values: &NewItem) -> Result<()> {
        let values = values.normalized()?;
        self.warn_if_unlisted(&values);
        let item = self
            .document
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| AppError::not_found(format!("course '{id}'")))?;

        if let Title::Multilingual(titles) = &mut item.title {
            titles.insert("en".to_string(), values.title);
        } else {
            item.title = Title::Multilingual([("en".to_string(), values.title)].into());
        }
        item.category = values.category;
        item.subcategory = values.subcategory;
        item.provider = values.provider;
        item.link = values.link;
        item.tags = (!values.tags.is_empty()).then_some(Tags::Flat(values.tags));

        log::debug!("Updated course {id}");
        Ok(())
    }

    /// Whether `subcategory` is listed under `category`.
    fn is_listed(&self, category: &str, subcategory: &str) -> bool {
        self.document
            .category(category)
            .is_some_and(|c| c.has_subcategory(subcategory))
    }

    /// Courses may use unlisted names; they are kept but flagged.
    fn warn_if_unlisted(&self, values: &NewItem) {
        if !self.is_listed(&values.category, &values.subcategory) {
            log::warn!(
                "Subcategory '{}' is not listed under category '{}'",
                values.subcategory,
                values.category
            );
        }
    }

    /// Delete course `id`.
    pub fn delete_item(&mut self, id: &str) -> Result<()> {
        let before = self.document.items.len();
        self.document.items.retain(|item| item.id != id);
        if self.document.items.len() == before {
            return Err(AppError::not_found(format!("course '{id}'")));
        }

        log::debug!("Deleted course {id}");
        Ok(())
    }
}
