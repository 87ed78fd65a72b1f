//! `DataService` over the PostgREST HTTP interface

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use linkbio_core::profile::{DataService, Filter, Row, SelectQuery};
use linkbio_domain::constants::ID_COLUMN;
use linkbio_domain::{DataServiceConfig, LinkBioError, Result};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::errors::PostgrestError;
use super::query::{filter_param, in_param, select_params};
use crate::auth::AccessTokenProvider;
use crate::errors::InfraError;
use crate::http::HttpClient;

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MINIMAL: &str = "return=minimal";

/// Remote relational data service reached through PostgREST.
///
/// Requests carry the project API key (set once on the HTTP client) and the
/// caller's session token when one is available, falling back to the API key
/// as bearer. Nothing is retried.
pub struct PostgrestDataService {
    http: HttpClient,
    rest_url: Url,
    api_key: String,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
    replace_rpc: HashMap<String, String>,
}

impl PostgrestDataService {
    /// # Errors
    /// `LinkBioError::Config` if the service URL is invalid.
    pub fn new(config: &DataServiceConfig) -> Result<Self> {
        let base = format!("{}/", config.url.trim_end_matches('/'));
        let rest_url = Url::parse(&base)
            .and_then(|base| base.join("rest/v1/"))
            .map_err(InfraError::from)?;
        let http = HttpClient::for_service(config)?;

        Ok(Self {
            http,
            rest_url,
            api_key: config.api_key.clone(),
            tokens: None,
            replace_rpc: config.replace_rpc.clone(),
        })
    }

    /// Send the caller's session token instead of the bare API key.
    pub fn with_token_provider(mut self, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.rest_url.join(path).map_err(InfraError::from)?)
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = match &self.tokens {
            Some(tokens) => tokens.access_token().await?,
            None => None,
        };
        let bearer = token.unwrap_or_else(|| self.api_key.clone());

        Ok(self.http.request(method, self.endpoint(path)?).bearer_auth(bearer))
    }

    /// Send and turn non-success statuses into classified domain errors.
    async fn execute(&self, request: RequestBuilder, target: &str) -> Result<Response> {
        let response = self.http.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = PostgrestError::parse(&body);
        debug!(table = target, %status, code = ?error.code, "data service rejected request");
        Err(error.classify(status, target))
    }

    async fn read_rows(response: Response) -> Result<Vec<Row>> {
        let body = response.text().await.map_err(InfraError::from)?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&body).map_err(InfraError::from)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(row) => Ok(row),
                    other => Err(LinkBioError::RemoteFailure(format!(
                        "expected row object, got {other}"
                    ))),
                })
                .collect(),
            Value::Object(row) => Ok(vec![row]),
            Value::Null => Ok(Vec::new()),
            other => Err(LinkBioError::RemoteFailure(format!("expected rows, got {other}"))),
        }
    }

    async fn delete_where(&self, table: &str, params: &[(String, String)]) -> Result<()> {
        let request = self
            .request(Method::DELETE, table)
            .await?
            .query(params)
            .header("Prefer", PREFER_MINIMAL);
        self.execute(request, table).await?;
        Ok(())
    }

    /// Single transactional call to a configured replace function.
    async fn replace_via_rpc(
        &self,
        function: &str,
        table: &str,
        scope: &Filter,
        rows: Vec<Row>,
    ) -> Result<Vec<Row>> {
        let payload = json!({
            "scope_column": scope.column,
            "scope_value": scope.value,
            "rows": rows,
        });
        let request = self.request(Method::POST, &format!("rpc/{function}")).await?.json(&payload);
        let response = self.execute(request, table).await?;
        Self::read_rows(response).await
    }

    /// Insert the new rows, then prune the rows that were in scope before.
    ///
    /// If the insert fails the previous rows are untouched. If the prune
    /// fails both generations are present and the error says so.
    async fn replace_by_insert_then_prune(
        &self,
        table: &str,
        scope: &Filter,
        rows: Vec<Row>,
    ) -> Result<Vec<Row>> {
        let in_scope =
            SelectQuery::from(table).columns(ID_COLUMN).eq(&scope.column, scope.value.clone());
        let existing = self.select(&in_scope).await?;
        let previous_ids: Vec<Value> =
            existing.into_iter().filter_map(|mut row| row.remove(ID_COLUMN)).collect();

        let stored = if rows.is_empty() { Vec::new() } else { self.insert(table, rows).await? };

        if previous_ids.is_empty() {
            return Ok(stored);
        }

        let params = vec![filter_param(scope), in_param(ID_COLUMN, &previous_ids)];
        if let Err(err) = self.delete_where(table, &params).await {
            warn!(
                table,
                inserted = stored.len(),
                stale = previous_ids.len(),
                error = %err,
                "replacement rows inserted but previous rows could not be removed"
            );
            return Err(LinkBioError::PartialWriteInconsistency(format!(
                "{table}: inserted {} new rows but failed to remove {} previous rows: {err}",
                stored.len(),
                previous_ids.len()
            )));
        }

        Ok(stored)
    }
}

#[async_trait]
impl DataService for PostgrestDataService {
    #[instrument(skip(self, query), fields(table = %query.table))]
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let request = self.request(Method::GET, &query.table).await?.query(&select_params(query));
        let response = self.execute(request, &query.table).await?;
        Self::read_rows(response).await
    }

    #[instrument(skip(self, query), fields(table = %query.table))]
    async fn select_maybe_single(&self, query: &SelectQuery) -> Result<Option<Row>> {
        let mut params = select_params(query);
        params.push(("limit".to_string(), "2".to_string()));
        let request = self.request(Method::GET, &query.table).await?.query(&params);
        let response = self.execute(request, &query.table).await?;

        let mut rows = Self::read_rows(response).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            _ => Err(LinkBioError::MultipleRows(format!(
                "{}: more than one row matched a single-row read",
                query.table
            ))),
        }
    }

    #[instrument(skip(self, rows), fields(count = rows.len()))]
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>> {
        let request = self
            .request(Method::POST, table)
            .await?
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&rows);
        let response = self.execute(request, table).await?;
        let stored = Self::read_rows(response).await?;
        debug!(stored = stored.len(), "rows inserted");
        Ok(stored)
    }

    #[instrument(skip(self, patch, filter), fields(column = %filter.column))]
    async fn update(&self, table: &str, patch: Row, filter: &Filter) -> Result<()> {
        let request = self
            .request(Method::PATCH, table)
            .await?
            .query(&[filter_param(filter)])
            .header("Prefer", PREFER_MINIMAL)
            .json(&patch);
        self.execute(request, table).await?;
        Ok(())
    }

    #[instrument(skip(self, filter), fields(column = %filter.column))]
    async fn delete(&self, table: &str, filter: &Filter) -> Result<()> {
        self.delete_where(table, &[filter_param(filter)]).await
    }

    #[instrument(skip(self, scope, rows), fields(count = rows.len()))]
    async fn replace_rows(&self, table: &str, scope: &Filter, rows: Vec<Row>) -> Result<Vec<Row>> {
        let stored = match self.replace_rpc.get(table) {
            Some(function) => {
                debug!(%function, "replacing rows through transactional function");
                self.replace_via_rpc(function, table, scope, rows).await?
            }
            None => self.replace_by_insert_then_prune(table, scope, rows).await?,
        };
        info!(stored = stored.len(), "rows replaced");
        Ok(stored)
    }
}
