//! Logical-to-physical table resolution
//!
//! Backends get renamed. Each logical entity carries an ordered list of
//! physical table candidates; the resolver runs the same query shape against
//! each one until a table answers without a "relation not found" error, then
//! remembers the winner for the rest of the session.

use std::collections::HashMap;
use std::future::Future;

use linkbio_domain::{LinkBioError, LogicalEntity, Result, TableConfig};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// Ordered-fallback table resolver, memoised per logical entity.
#[derive(Debug)]
pub struct TableResolver {
    tables: TableConfig,
    resolved: RwLock<HashMap<LogicalEntity, String>>,
}

impl TableResolver {
    pub fn new(tables: TableConfig) -> Self {
        Self { tables, resolved: RwLock::new(HashMap::new()) }
    }

    /// Candidates for `entity` in priority order.
    pub fn candidates(&self, entity: LogicalEntity) -> &[String] {
        self.tables.candidates(entity)
    }

    /// Table previously accepted for `entity`, if any.
    pub fn resolved(&self, entity: LogicalEntity) -> Option<String> {
        self.resolved.read().get(&entity).cloned()
    }

    /// Drop the memoised table so the next call searches again.
    pub fn forget(&self, entity: LogicalEntity) {
        self.resolved.write().remove(&entity);
    }

    fn remember(&self, entity: LogicalEntity, table: &str) {
        self.resolved.write().insert(entity, table.to_string());
    }

    /// Run `attempt` against the physical table for `entity`.
    ///
    /// A candidate is rejected only when `attempt` fails with
    /// [`LinkBioError::RelationNotFound`]. Any other outcome ends the search:
    /// success (including "zero rows") is memoised, and a genuine data error
    /// is propagated without trying the remaining candidates.
    ///
    /// # Errors
    /// - [`LinkBioError::Config`] if no candidates are configured
    /// - [`LinkBioError::SchemaMismatch`] if every candidate is missing
    /// - whatever non-"relation not found" error `attempt` returns
    pub async fn resolve<T, F, Fut>(&self, entity: LogicalEntity, mut attempt: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let stale = match self.resolved(entity) {
            Some(table) => match attempt(table.clone()).await {
                Err(LinkBioError::RelationNotFound(detail)) => {
                    warn!(
                        %entity,
                        table = %table,
                        %detail,
                        "resolved table disappeared, searching again"
                    );
                    self.forget(entity);
                    Some(table)
                }
                other => return other,
            },
            None => None,
        };

        let candidates: Vec<&str> = self
            .candidates(entity)
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();
        if candidates.is_empty() {
            return Err(LinkBioError::Config(format!(
                "no table candidates configured for {entity}"
            )));
        }

        let mut rejected: Vec<&str> = Vec::new();
        for candidate in candidates {
            if stale.as_deref() == Some(candidate) {
                rejected.push(candidate);
                continue;
            }

            match attempt(candidate.to_string()).await {
                Err(LinkBioError::RelationNotFound(detail)) => {
                    debug!(%entity, table = candidate, %detail, "table candidate not found");
                    rejected.push(candidate);
                }
                Ok(value) => {
                    if !rejected.is_empty() {
                        info!(%entity, table = candidate, ?rejected, "resolved table by fallback");
                    }
                    self.remember(entity, candidate);
                    return Ok(value);
                }
                Err(err) => return Err(err),
            }
        }

        Err(LinkBioError::SchemaMismatch(format!(
            "no table found for {entity}; tried {}",
            rejected.join(", ")
        )))
    }
}
