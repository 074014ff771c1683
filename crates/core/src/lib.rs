//! Precast core types for server-paginated list screens.

#![forbid(unsafe_code)]

use serde::de::DeserializeOwned;

pub mod columns;
pub mod filter;
pub mod page;
pub mod query;
pub mod rows;
pub mod screens;

/// Stable identifier of a row within one page, used for selection.
pub type RowKey = u64;

pub mod prelude {
    pub use super::columns::{ColumnKind, ColumnSpec};
    pub use super::filter::{FilterCriteria, FilterError, FilterValue};
    pub use super::page::{ListPage, PageEnvelope, Pagination};
    pub use super::query::ListQuery;
    pub use super::screens::{Screen, ScreenKind};
    pub use super::{ListRow, RowKey};
}

/// One record of a list response.
///
/// `cell` is the field-to-column mapping shared by table rendering, client-side
/// sort and export. Unknown column ids render as an empty string.
pub trait ListRow: DeserializeOwned + Clone + Send + Sync + 'static {
    fn key(&self) -> RowKey;
    fn cell(&self, column_id: &str) -> String;
}
