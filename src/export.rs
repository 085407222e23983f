// src/export.rs

//! CSV export of catalog items.
//!
//! Exports whatever sequence the caller hands in, usually the current
//! `filter` result, with titles and tags resolved for one language.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{AppError, Result};
use crate::models::{ExportColumns, Item};
use crate::utils::fs::write_atomic;

/// Writes items as CSV.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    columns: ExportColumns,
    language: String,
}

impl CsvExporter {
    pub fn new(columns: ExportColumns, language: impl Into<String>) -> Self {
        Self {
            columns,
            language: language.into(),
        }
    }

    fn header(&self) -> &'static [&'static str] {
        match self.columns {
            ExportColumns::Basic => &["title", "category", "subcategory", "link"],
            ExportColumns::Full => &[
                "id",
                "title",
                "category",
                "subcategory",
                "provider",
                "link",
                "tags",
            ],
        }
    }

    fn row(&self, item: &Item) -> Vec<String> {
        let title = item.resolve_title(&self.language).to_string();
        match self.columns {
            ExportColumns::Basic => vec![
                title,
                item.category.clone(),
                item.subcategory.clone(),
                item.link.clone(),
            ],
            ExportColumns::Full => vec![
                item.id.clone(),
                title,
                item.category.clone(),
                item.subcategory.clone(),
                item.provider_or_empty().to_string(),
                item.link.clone(),
                item.resolve_tags(&self.language).join(", "),
            ],
        }
    }

    /// Render items as CSV text, header first.
    pub fn render<'a, I>(&self, items: I) -> String
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut output = String::new();
        push_record(&mut output, self.header().iter().copied());
        for item in items {
            let row = self.row(item);
            push_record(&mut output, row.iter().map(String::as_str));
        }
        output
    }

    /// Write items to `path`. Returns the number of rows written.
    pub fn export_to_path<'a, I>(&self, items: I, path: impl AsRef<Path>) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let path = path.as_ref();
        let items: Vec<&Item> = items.into_iter().collect();
        let csv = self.render(items.iter().copied());

        write_atomic(path, csv.as_bytes()).map_err(|e| {
            log::error!("Failed to export CSV to {}: {}", path.display(), e);
            AppError::Io(e)
        })?;

        log::info!("Exported {} courses to {}", items.len(), path.display());
        Ok(items.len())
    }

    /// Write items to `{dir}/{stem}_YYYYmmdd_HHMMSS.csv`. Returns the path.
    pub fn export_timestamped<'a, I>(
        &self,
        items: I,
        dir: impl AsRef<Path>,
        stem: &str,
    ) -> Result<PathBuf>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.as_ref().join(format!("{stem}_{timestamp}.csv"));
        self.export_to_path(items, &path)?;
        Ok(path)
    }
}

/// Append one CSV record terminated by CRLF.
fn push_record<'a>(output: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push_str(&escape_field(field));
    }
    output.push_str("\r\n");
}

/// Quote a field if it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
