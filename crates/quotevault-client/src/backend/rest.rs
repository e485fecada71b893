//! Backend over the hosted service's REST interface.
//!
//! Tables are exposed at `/rest/v1/<table>` and filtered with query
//! parameters (`column=eq.value`, `column=ilike.*term*`, `id=in.(a,b)`,
//! `or=(...)`, `order`, `offset`, `limit`).

use async_trait::async_trait;
use quotevault_shared::constants::{
    TABLE_CATEGORIES, TABLE_COLLECTIONS, TABLE_COLLECTION_QUOTES, TABLE_PROFILES, TABLE_QUOTES,
    TABLE_USER_FAVORITES, TABLE_USER_SETTINGS,
};
use quotevault_shared::{
    Category, Collection, CollectionQuote, Quote, QuoteQuery, QuoteVaultError, Result,
    SearchQuery, SortOrder, UserFavorite, UserProfile, UserSettings,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{AccountStore, CollectionStore, FavoriteStore, QuoteSource};
use crate::auth::SessionStore;
use crate::config::ClientConfig;

type Params = Vec<(String, String)>;

pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    session: SessionStore,
    search_cap: usize,
}

impl RestBackend {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self> {
        let base_url = config
            .api_url
            .clone()
            .ok_or_else(|| QuoteVaultError::Config("QUOTEVAULT_API_URL is not set".into()))?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| QuoteVaultError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone().unwrap_or_default(),
            session,
            search_cap: config.search_cap,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        // Anonymous reads authenticate with the API key itself.
        let token = self
            .session
            .access_token()
            .unwrap_or_else(|| self.api_key.clone());
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
    }

    async fn get_rows<T: DeserializeOwned>(&self, table: &str, params: &Params) -> Result<Vec<T>> {
        debug!(table, ?params, "select");
        let response = self
            .request(Method::GET, table)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;
        let response = error_for_status(response, table_label(table)).await?;
        decode_rows(table, response).await
    }

    async fn insert_row<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = error_for_status(response, table_label(table)).await?;
        let rows: Vec<T> = decode_rows(table, response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| QuoteVaultError::Decode(format!("{table}: insert returned no row")))
    }

    async fn upsert_row<B: Serialize + ?Sized>(
        &self,
        table: &str,
        on_conflict: &str,
        body: &B,
    ) -> Result<()> {
        let response = self
            .request(Method::POST, table)
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        error_for_status(response, table_label(table)).await?;
        Ok(())
    }

    /// Number of rows the request touched, read from the representation.
    async fn mutate_rows<B: Serialize + ?Sized>(
        &self,
        method: Method,
        table: &str,
        params: &Params,
        body: Option<&B>,
    ) -> Result<usize> {
        let mut request = self
            .request(method, table)
            .query(params)
            .header("Prefer", "return=representation");
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(transport_error)?;
        let response = error_for_status(response, table_label(table)).await?;
        let rows: Vec<serde_json::Value> = decode_rows(table, response).await?;
        Ok(rows.len())
    }

    async fn count(&self, table: &str, mut params: Params) -> Result<u64> {
        params.push(("select".into(), "id".into()));
        params.push(("limit".into(), "1".into()));
        let response = self
            .request(Method::GET, table)
            .query(&params)
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(transport_error)?;
        let response = error_for_status(response, table_label(table)).await?;
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total)
            .ok_or_else(|| QuoteVaultError::Decode(format!("{table}: missing row count")))
    }
}

#[async_trait]
impl QuoteSource for RestBackend {
    async fn fetch_quotes(&self, query: &QuoteQuery) -> Result<Vec<Quote>> {
        if matches!(&query.ids, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }
        self.get_rows(TABLE_QUOTES, &quote_params(query)).await
    }

    async fn count_quotes(&self, query: &QuoteQuery) -> Result<u64> {
        if matches!(&query.ids, Some(ids) if ids.is_empty()) {
            return Ok(0);
        }
        self.count(TABLE_QUOTES, filter_params(query)).await
    }

    /// The OR predicate is evaluated by the server.
    async fn search_quotes(&self, search: &SearchQuery) -> Result<Vec<Quote>> {
        let query = search
            .field_query()
            .matching_any(&search.term)
            .range(search.offset, search.limit);
        self.fetch_quotes(&query).await
    }

    fn search_cap(&self) -> usize {
        self.search_cap
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "name.asc".to_string()),
        ];
        self.get_rows(TABLE_CATEGORIES, &params).await
    }

    async fn list_authors(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct AuthorRow {
            author: String,
        }
        let params = vec![
            ("select".to_string(), "author".to_string()),
            ("order".to_string(), "author.asc".to_string()),
        ];
        let rows: Vec<AuthorRow> = self.get_rows(TABLE_QUOTES, &params).await?;
        let mut authors: Vec<String> = rows.into_iter().map(|r| r.author).collect();
        authors.dedup();
        Ok(authors)
    }
}

#[async_trait]
impl FavoriteStore for RestBackend {
    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<UserFavorite>> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("user_id".to_string(), format!("eq.{user_id}")),
            ("order".to_string(), "created_at.desc".to_string()),
        ];
        self.get_rows(TABLE_USER_FAVORITES, &params).await
    }

    async fn insert_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<UserFavorite> {
        let body = serde_json::json!({ "user_id": user_id, "quote_id": quote_id });
        self.insert_row(TABLE_USER_FAVORITES, &body).await
    }

    async fn delete_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<bool> {
        let params = vec![
            ("user_id".to_string(), format!("eq.{user_id}")),
            ("quote_id".to_string(), format!("eq.{quote_id}")),
        ];
        let deleted = self
            .mutate_rows::<()>(Method::DELETE, TABLE_USER_FAVORITES, &params, None)
            .await?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl CollectionStore for RestBackend {
    async fn list_collections(&self, user_id: Uuid) -> Result<Vec<Collection>> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("user_id".to_string(), format!("eq.{user_id}")),
            ("order".to_string(), "created_at.desc".to_string()),
        ];
        self.get_rows(TABLE_COLLECTIONS, &params).await
    }

    async fn insert_collection(&self, user_id: Uuid, name: &str) -> Result<Collection> {
        let body = serde_json::json!({ "user_id": user_id, "name": name });
        self.insert_row(TABLE_COLLECTIONS, &body).await
    }

    async fn rename_collection(&self, collection_id: Uuid, name: &str) -> Result<()> {
        let params = vec![("id".to_string(), format!("eq.{collection_id}"))];
        let body = serde_json::json!({ "name": name });
        let updated = self
            .mutate_rows(Method::PATCH, TABLE_COLLECTIONS, &params, Some(&body))
            .await?;
        if updated == 0 {
            return Err(QuoteVaultError::NotFound("Collection".into()));
        }
        Ok(())
    }

    async fn delete_collection(&self, collection_id: Uuid) -> Result<bool> {
        let params = vec![("id".to_string(), format!("eq.{collection_id}"))];
        let deleted = self
            .mutate_rows::<()>(Method::DELETE, TABLE_COLLECTIONS, &params, None)
            .await?;
        Ok(deleted > 0)
    }

    async fn list_collection_quotes(&self, collection_id: Uuid) -> Result<Vec<CollectionQuote>> {
        let params = vec![
            ("select".to_string(), "id,collection_id,quote_id".to_string()),
            ("collection_id".to_string(), format!("eq.{collection_id}")),
        ];
        self.get_rows(TABLE_COLLECTION_QUOTES, &params).await
    }

    async fn insert_collection_quote(
        &self,
        collection_id: Uuid,
        quote_id: Uuid,
    ) -> Result<CollectionQuote> {
        let body = serde_json::json!({ "collection_id": collection_id, "quote_id": quote_id });
        self.insert_row(TABLE_COLLECTION_QUOTES, &body).await
    }

    async fn delete_collection_quote(&self, collection_id: Uuid, quote_id: Uuid) -> Result<bool> {
        let params = vec![
            ("collection_id".to_string(), format!("eq.{collection_id}")),
            ("quote_id".to_string(), format!("eq.{quote_id}")),
        ];
        let deleted = self
            .mutate_rows::<()>(Method::DELETE, TABLE_COLLECTION_QUOTES, &params, None)
            .await?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl AccountStore for RestBackend {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("id".to_string(), format!("eq.{user_id}")),
            ("limit".to_string(), "1".to_string()),
        ];
        let rows: Vec<UserProfile> = self.get_rows(TABLE_PROFILES, &params).await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        self.upsert_row(TABLE_PROFILES, "id", profile).await
    }

    async fn get_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("user_id".to_string(), format!("eq.{user_id}")),
            ("limit".to_string(), "1".to_string()),
        ];
        let rows: Vec<UserSettings> = self.get_rows(TABLE_USER_SETTINGS, &params).await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_settings(&self, settings: &UserSettings) -> Result<()> {
        self.upsert_row(TABLE_USER_SETTINGS, "user_id", settings).await
    }
}

// ---------------------------------------------------------------------------
// Query translation
// ---------------------------------------------------------------------------

/// Predicate parameters of a quote query (no select, order or range).
pub fn filter_params(query: &QuoteQuery) -> Params {
    let mut params: Params = Vec::new();

    if let Some(category_id) = query.category_id {
        params.push(("category_id".into(), format!("eq.{category_id}")));
    }
    if let Some(author) = &query.author {
        params.push(("author".into(), format!("eq.{author}")));
    }

    match (&query.text_contains, &query.author_contains, query.match_any) {
        (Some(text), Some(author), true) => {
            params.push((
                "or".into(),
                format!(
                    "(text.ilike.{},author.ilike.{})",
                    quoted_pattern(text),
                    quoted_pattern(author)
                ),
            ));
        }
        (text, author, _) => {
            if let Some(text) = text {
                params.push(("text".into(), format!("ilike.{}", pattern(text))));
            }
            if let Some(author) = author {
                params.push(("author".into(), format!("ilike.{}", pattern(author))));
            }
        }
    }

    if let Some(ids) = &query.ids {
        let list: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        params.push(("id".into(), format!("in.({})", list.join(","))));
    }

    params
}

/// Full parameter list for a quote read.
pub fn quote_params(query: &QuoteQuery) -> Params {
    let mut params: Params = vec![("select".into(), "*".into())];
    params.extend(filter_params(query));

    let direction = match query.order {
        SortOrder::NewestFirst => "desc",
        SortOrder::OldestFirst => "asc",
    };
    params.push((
        "order".into(),
        format!("created_at.{direction},id.{direction}"),
    ));
    if query.offset > 0 {
        params.push(("offset".into(), query.offset.to_string()));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".into(), limit.to_string()));
    }
    params
}

/// `*term*` with the wildcard character removed from user input.
fn pattern(term: &str) -> String {
    format!("*{}*", term.replace('*', ""))
}

/// Pattern wrapped in double quotes for use inside `or=(...)`, where commas
/// and parentheses are reserved.
fn quoted_pattern(term: &str) -> String {
    let escaped = pattern(term).replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Total from a `Content-Range` header such as `0-0/45` or `*/0`.
pub fn content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

fn table_label(table: &str) -> &'static str {
    match table {
        TABLE_QUOTES => "Quote",
        TABLE_CATEGORIES => "Category",
        TABLE_USER_FAVORITES => "Favorite",
        TABLE_COLLECTIONS => "Collection",
        TABLE_COLLECTION_QUOTES => "Quote in collection",
        TABLE_PROFILES => "Profile",
        TABLE_USER_SETTINGS => "Settings",
        _ => "Record",
    }
}

pub(crate) fn transport_error(e: reqwest::Error) -> QuoteVaultError {
    if e.is_timeout() {
        QuoteVaultError::Network("The request timed out".into())
    } else {
        QuoteVaultError::Network(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "msg", alias = "error_description")]
    message: Option<String>,
}

/// Maps non-success statuses onto the error taxonomy.
pub(crate) async fn error_for_status(response: Response, what: &'static str) -> Result<Response> {
    rejection(response)
        .await
        .map_err(|(status, message)| status_error(status, message, what))
}

/// Passes successful responses through; otherwise yields the status and the
/// server's message for the caller to classify.
pub(crate) async fn rejection(
    response: Response,
) -> std::result::Result<Response, (StatusCode, String)> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| status.to_string());
    warn!(status = status.as_u16(), %message, "request rejected");
    Err((status, message))
}

pub(crate) fn status_error(
    status: StatusCode,
    message: String,
    what: &'static str,
) -> QuoteVaultError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => QuoteVaultError::Unauthorized,
        StatusCode::CONFLICT => QuoteVaultError::AlreadyExists(what.to_string()),
        StatusCode::NOT_FOUND => QuoteVaultError::NotFound(what.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            QuoteVaultError::Network(message)
        }
        _ => QuoteVaultError::Network(format!("{status}: {message}")),
    }
}

async fn decode_rows<T: DeserializeOwned>(table: &str, response: Response) -> Result<Vec<T>> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        let category = match e.classify() {
            serde_json::error::Category::Io => "io",
            serde_json::error::Category::Syntax => "syntax",
            serde_json::error::Category::Data => "data",
            serde_json::error::Category::Eof => "eof",
        };
        warn!(
            table,
            category,
            line = e.line(),
            column = e.column(),
            error = %e,
            "failed to decode rows"
        );
        QuoteVaultError::Decode(format!("could not read {table}"))
    })
}
