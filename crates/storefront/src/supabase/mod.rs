//! Supabase REST (PostgREST) client.
//!
//! # Architecture
//!
//! - Plain `reqwest` against the project's `/rest/v1` surface - no local sync,
//!   direct API calls
//! - Reads are whole-table selects; the catalog is small enough to load in
//!   one shot
//! - Writes use `Prefer: return=representation` when the generated row is
//!   needed (order insert) and `return=minimal` otherwise (order items)
//!
//! # Example
//!
//! ```rust,ignore
//! use lima_rocha_storefront::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config.supabase);
//!
//! let products = client.list_products().await?;
//! let order = client.insert_order(&new_order).await?;
//! client.insert_order_items(&items).await?;
//! ```

pub mod types;

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::config::SupabaseConfig;
use types::{Category, NewOrder, NewOrderItem, Order, Product};

/// Errors that can occur when talking to the Supabase REST API.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An insert with `return=representation` came back empty.
    ///
    /// Treated as a failure even though no explicit error was raised: the
    /// caller cannot proceed without the generated row.
    #[error("Insert into {0} returned no rows")]
    EmptyInsert(&'static str),
}

/// Error body shape returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
}

/// Extract a human-readable message from a PostgREST error response body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<PostgrestErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.chars().take(200).collect())
}

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for the Supabase REST API.
///
/// Cheaply cloneable; all requests carry the project anon key.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Create a new Supabase REST client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let rest_url = format!("{}/rest/v1", config.url.trim_end_matches('/'));

        Self {
            inner: Arc::new(SupabaseClientInner {
                client: reqwest::Client::new(),
                rest_url,
                anon_key: config.anon_key.expose_secret().to_string(),
            }),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.inner.rest_url)
    }

    /// Attach the auth headers every PostgREST request needs.
    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
    }

    /// Read the response body, converting error statuses to typed errors.
    async fn read_body(response: reqwest::Response) -> Result<String, SupabaseError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Supabase returned non-success status"
            );
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    /// `SELECT * FROM {table}` ordered by id.
    async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<Vec<T>, SupabaseError> {
        let response = self
            .authed(self.inner.client.get(self.table_url(table)))
            .query(&[("select", "*"), ("order", "id.asc")])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Catalog Reads
    // =========================================================================

    /// Fetch all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or deserialization fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, SupabaseError> {
        self.select_all("categories").await
    }

    /// Fetch all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or deserialization fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, SupabaseError> {
        self.select_all("products").await
    }

    // =========================================================================
    // Order Writes (append-only; the storefront never mutates or deletes)
    // =========================================================================

    /// Insert one order row and return the generated record.
    ///
    /// Uses `Prefer: return=representation` so the generated id comes back
    /// with the response. An empty representation is reported as
    /// [`SupabaseError::EmptyInsert`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects the row, or no
    /// row is returned.
    #[instrument(skip(self, order), fields(customer = %order.customer_name))]
    pub async fn insert_order(&self, order: &NewOrder) -> Result<Order, SupabaseError> {
        let response = self
            .authed(self.inner.client.post(self.table_url("orders")))
            .header("Prefer", "return=representation")
            .json(order)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let mut rows: Vec<Order> = serde_json::from_str(&body)?;

        rows.pop().ok_or(SupabaseError::EmptyInsert("orders"))
    }

    /// Insert one row per cart line into `order_items`.
    ///
    /// No return value is consumed (`Prefer: return=minimal`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the rows.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), SupabaseError> {
        let response = self
            .authed(self.inner.client.post(self.table_url("order_items")))
            .header("Prefer", "return=minimal")
            .json(items)
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }
}
