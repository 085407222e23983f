//! Catalog store, query engine and document editing.
//!
//! - [`CatalogStore`]: read-only snapshot with `filter`/`query`
//! - [`CatalogDocument`]: the JSON document shape, read/validate/write
//! - [`CatalogEditor`]: add/edit/delete on a document file

mod document;
mod editor;
mod ids;
mod query;
mod store;

pub use document::CatalogDocument;
pub use editor::{CatalogEditor, NewItem};
pub use ids::next_id;
pub use query::Query;
pub use store::CatalogStore;
