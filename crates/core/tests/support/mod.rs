//! Shared test helpers for `linkbio-core` integration tests.
//!
//! An in-memory data service with PostgREST-like semantics plus a scriptable
//! identity provider, so service tests can focus on behaviour instead of wire
//! details.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use linkbio_core::profile::{DataService, Filter, IdentityProvider, Row, SelectQuery};
use linkbio_domain::{Identity, LinkBioError, Result as DomainResult};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// One recorded data service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub table: String,
}

#[derive(Default)]
struct Store {
    tables: HashMap<String, Vec<Row>>,
    unique: HashMap<String, String>,
    failing: HashSet<(&'static str, String)>,
    partial_replace: HashSet<String>,
}

/// In-memory stand-in for the remote relational service.
///
/// Tables that were never created report `RelationNotFound`. Every call
/// yields once before touching state so concurrent callers interleave.
#[derive(Default, Clone)]
pub struct InMemoryDataService {
    store: Arc<Mutex<Store>>,
    calls: Arc<Mutex<Vec<Call>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data service with the default table names in place.
    pub fn with_default_tables() -> Self {
        Self::new().with_table("profiles").with_table("theme_settings").with_table("links")
    }

    pub fn with_table(self, table: &str) -> Self {
        self.store.lock().tables.entry(table.to_string()).or_default();
        self
    }

    /// Reject inserts that repeat a value of `column` in `table`.
    pub fn with_unique(self, table: &str, column: &str) -> Self {
        self.store.lock().unique.insert(table.to_string(), column.to_string());
        self
    }

    pub fn seed(&self, table: &str, row: Value) {
        let row = row.as_object().cloned().expect("seed rows must be objects");
        self.store.lock().tables.entry(table.to_string()).or_default().push(row);
    }

    pub fn drop_table(&self, table: &str) {
        self.store.lock().tables.remove(table);
    }

    /// Make every `op` call against `table` fail with a remote failure.
    pub fn fail(&self, op: &'static str, table: &str) {
        self.store.lock().failing.insert((op, table.to_string()));
    }

    /// Make `replace` on `table` insert the new rows, keep the old ones and
    /// report the write as partial.
    pub fn fail_prune(&self, table: &str) {
        self.store.lock().partial_replace.insert(table.to_string());
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.store.lock().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.calls.lock().iter().filter(|call| call.op == op).count()
    }

    fn begin(&self, op: &'static str, table: &str) -> DomainResult<()> {
        self.calls.lock().push(Call { op, table: table.to_string() });
        let store = self.store.lock();
        if !store.tables.contains_key(table) {
            return Err(LinkBioError::RelationNotFound(table.to_string()));
        }
        if store.failing.contains(&(op, table.to_string())) {
            return Err(LinkBioError::RemoteFailure(format!("injected {op} failure on {table}")));
        }
        Ok(())
    }

    fn assign_id(&self, row: &mut Row) {
        if !row.contains_key("id") {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            row.insert("id".into(), json!(format!("gen-{id}")));
        }
    }

    fn insert_locked(
        &self,
        store: &mut Store,
        table: &str,
        rows: Vec<Row>,
    ) -> DomainResult<Vec<Row>> {
        if let Some(column) = store.unique.get(table).cloned() {
            let existing = &store.tables[table];
            for row in &rows {
                let value = row.get(&column);
                if value.is_some() && existing.iter().any(|r| r.get(&column) == value) {
                    return Err(LinkBioError::Conflict(format!(
                        "duplicate key value violates unique constraint on {column}"
                    )));
                }
            }
        }

        let mut stored = Vec::with_capacity(rows.len());
        for mut row in rows {
            self.assign_id(&mut row);
            stored.push(row);
        }
        store.tables.entry(table.to_string()).or_default().extend(stored.iter().cloned());
        Ok(stored)
    }
}

fn project(row: &Row, columns: Option<&str>) -> Row {
    match columns {
        None => row.clone(),
        Some(columns) => columns
            .split(',')
            .map(str::trim)
            .filter_map(|column| row.get(column).map(|v| (column.to_string(), v.clone())))
            .collect(),
    }
}

#[async_trait]
impl DataService for InMemoryDataService {
    async fn select(&self, query: &SelectQuery) -> DomainResult<Vec<Row>> {
        tokio::task::yield_now().await;
        self.begin("select", &query.table)?;

        let store = self.store.lock();
        let mut rows: Vec<Row> = store.tables[&query.table]
            .iter()
            .filter(|row| query.filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by_key(|row| row.get(&order.column).and_then(Value::as_i64).unwrap_or(0));
            if !order.ascending {
                rows.reverse();
            }
        }

        Ok(rows.iter().map(|row| project(row, query.columns.as_deref())).collect())
    }

    async fn select_maybe_single(&self, query: &SelectQuery) -> DomainResult<Option<Row>> {
        let mut rows = self.select(query).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(LinkBioError::MultipleRows(format!("{n} rows in {}", query.table))),
        }
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> DomainResult<Vec<Row>> {
        tokio::task::yield_now().await;
        self.begin("insert", table)?;
        let mut store = self.store.lock();
        self.insert_locked(&mut store, table, rows)
    }

    async fn update(&self, table: &str, patch: Row, filter: &Filter) -> DomainResult<()> {
        tokio::task::yield_now().await;
        self.begin("update", table)?;
        let mut store = self.store.lock();
        if let Some(rows) = store.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| filter.matches(row)) {
                row.extend(patch.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> DomainResult<()> {
        tokio::task::yield_now().await;
        self.begin("delete", table)?;
        let mut store = self.store.lock();
        if let Some(rows) = store.tables.get_mut(table) {
            rows.retain(|row| !filter.matches(row));
        }
        Ok(())
    }

    async fn replace_rows(
        &self,
        table: &str,
        scope: &Filter,
        rows: Vec<Row>,
    ) -> DomainResult<Vec<Row>> {
        tokio::task::yield_now().await;
        self.begin("replace", table)?;
        let mut store = self.store.lock();
        if store.partial_replace.contains(table) {
            let stored = self.insert_locked(&mut store, table, rows)?;
            return Err(LinkBioError::PartialWriteInconsistency(format!(
                "{table}: inserted {} new rows but failed to remove previous rows",
                stored.len()
            )));
        }
        let previous = store.tables[table].clone();
        if let Some(existing) = store.tables.get_mut(table) {
            existing.retain(|row| !scope.matches(row));
        }
        match self.insert_locked(&mut store, table, rows) {
            Ok(stored) => Ok(stored),
            Err(err) => {
                store.tables.insert(table.to_string(), previous);
                Err(err)
            }
        }
    }
}

/// Identity provider whose answer can be changed mid-test.
#[derive(Default)]
pub struct FakeIdentityProvider {
    current: Mutex<Option<Identity>>,
    failing: Mutex<bool>,
    checks: AtomicU64,
}

impl FakeIdentityProvider {
    pub fn signed_in(identity: Identity) -> Arc<Self> {
        let provider = Self::default();
        *provider.current.lock() = Some(identity);
        Arc::new(provider)
    }

    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sign_in(&self, identity: Identity) {
        *self.current.lock() = Some(identity);
    }

    pub fn sign_out(&self) {
        *self.current.lock() = None;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn checks(&self) -> u64 {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn current_identity(&self) -> DomainResult<Option<Identity>> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock() {
            return Err(LinkBioError::RemoteFailure("auth service unavailable".into()));
        }
        Ok(self.current.lock().clone())
    }
}

pub fn ana() -> Identity {
    Identity::new("user-ana", Some("ana@example.com".into()))
}

pub fn profile_row(id: &str, owner: &str, username: &str) -> Value {
    json!({
        "id": id,
        "user_id": owner,
        "username": username,
        "title": "Engineer",
        "bio": "Hello there",
        "contact_email": "private@example.com",
        "contact_phone": "+34 600 000 000",
    })
}

pub fn theme_row(id: &str, profile_id: &str) -> Value {
    json!({
        "id": id,
        "profile_id": profile_id,
        "bg_type": "color",
        "bg_color": "#ffffff",
        "bg_image_url": null,
        "button_style": "rounded",
        "button_bg_color": "#000000",
        "button_text_color": "#ffffff",
        "button_shadow": false,
        "font_family": "Inter",
        "text_color": "#111111",
    })
}

pub fn link_row(id: &str, profile_id: &str, title: &str, order: i64, active: bool) -> Value {
    json!({
        "id": id,
        "profile_id": profile_id,
        "title": title,
        "url": format!("https://{}.example.com", title.to_lowercase()),
        "icon_class": null,
        "is_active": active,
        "display_order": order,
    })
}

/// Seed Ana's profile `p-ana` with a theme and links A (0) and B (1).
pub fn seed_ana(data: &InMemoryDataService, profile_table: &str) {
    data.seed(profile_table, profile_row("p-ana", "user-ana", "ana"));
    data.seed("theme_settings", theme_row("t-ana", "p-ana"));
    data.seed("links", link_row("l-a", "p-ana", "A", 0, true));
    data.seed("links", link_row("l-b", "p-ana", "B", 1, true));
}
