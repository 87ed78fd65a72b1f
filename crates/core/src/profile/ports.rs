//! Port interfaces for profile synchronization
//!
//! These traits define the boundaries between core business logic and the
//! remote relational data service / authentication collaborator.

use async_trait::async_trait;
use linkbio_domain::{Identity, Result};
use serde_json::{Map, Value};

/// One row as exchanged with the data service.
pub type Row = Map<String, Value>;

/// Equality filter `column = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { column: column.into(), value: value.into() }
    }

    /// True when `row` satisfies this filter.
    pub fn matches(&self, row: &Row) -> bool {
        row.get(&self.column) == Some(&self.value)
    }
}

/// Sort specification for a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Read query: `select(columns).eq(..)*.order(..)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    /// Comma separated projection; `None` selects every column.
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl SelectQuery {
    pub fn from(table: impl Into<String>) -> Self {
        Self { table: table.into(), columns: None, filters: Vec::new(), order: None }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order { column: column.into(), ascending });
        self
    }
}

/// Remote relational data service
///
/// Implementations classify failures into the domain taxonomy: a missing
/// table must surface as `LinkBioError::RelationNotFound` so the table
/// resolver can fall through to the next candidate.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Rows matching the query, in the requested order.
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>>;

    /// Zero or one row. More than one is `LinkBioError::MultipleRows`.
    async fn select_maybe_single(&self, query: &SelectQuery) -> Result<Option<Row>>;

    /// Insert rows and return them as stored.
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>>;

    /// Partial update of every row matching `filter`.
    async fn update(&self, table: &str, patch: Row, filter: &Filter) -> Result<()>;

    /// Delete every row matching `filter`.
    async fn delete(&self, table: &str, filter: &Filter) -> Result<()>;

    /// Replace every row matching `scope` with `rows`.
    ///
    /// On error the previous rows must still be in place unless the error is
    /// `LinkBioError::PartialWriteInconsistency`.
    async fn replace_rows(&self, table: &str, scope: &Filter, rows: Vec<Row>) -> Result<Vec<Row>>;
}

/// Authentication collaborator
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current caller identity, `None` when unauthenticated.
    async fn current_identity(&self) -> Result<Option<Identity>>;
}
