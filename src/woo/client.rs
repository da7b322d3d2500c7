//! HTTP client for the WooCommerce REST API.
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::types::{Brand, Category, CreateProductPayload, RemoteProduct, UpdateProductPayload};
use crate::config::WooConfig;
use crate::sync::error::SyncError;

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        s.truncate(max_len);
        s.push('…');
    }
    s
}

/// Consumed capability set against the remote catalog. `WooClient` is the
/// production implementation; tests substitute their own.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Substring search; the remote decides matching semantics.
    async fn search_categories(&self, name: &str) -> Result<Vec<Category>, SyncError>;
    async fn create_category(&self, name: &str) -> Result<Category, SyncError>;
    async fn search_brands(&self, name: &str) -> Result<Vec<Brand>, SyncError>;
    async fn create_brand(&self, name: &str) -> Result<Brand, SyncError>;
    /// Exact-match SKU query. Zero-or-one result is expected; callers take
    /// the first element if the remote returns more.
    async fn find_product_by_sku(&self, sku: &str) -> Result<Vec<RemoteProduct>, SyncError>;
    async fn create_product(
        &self,
        payload: &CreateProductPayload,
    ) -> Result<RemoteProduct, SyncError>;
    async fn update_product(
        &self,
        id: i64,
        payload: &UpdateProductPayload,
    ) -> Result<RemoteProduct, SyncError>;
}

/// WooCommerce REST client (`{base}/wp-json/wc/v3`).
///
/// The Basic credential is built once from the configured consumer key and
/// secret and attached to every request.
#[derive(Debug, Clone)]
pub struct WooClient {
    base_url: String,
    http: Client,
    auth_header: String,
}

pub(crate) fn basic_auth_header(key: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{key}:{secret}")))
}

/// Status + content-type gate shared by every call. WordPress serves HTML
/// error pages from the same routes; those must never reach the JSON parser.
async fn decode_json<T: DeserializeOwned>(resp: Response) -> Result<T, SyncError> {
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    if !status.is_success() {
        let body = truncate_for_log(resp.text().await.unwrap_or_default(), 2000);
        return Err(SyncError::Api { status, body });
    }
    if !content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("application/json"))
    {
        let body = truncate_for_log(resp.text().await.unwrap_or_default(), 300);
        return Err(SyncError::NonJson {
            status,
            content_type,
            body,
        });
    }
    Ok(resp.json::<T>().await?)
}

impl WooClient {
    pub fn new(config: &WooConfig) -> Result<Self, SyncError> {
        let http = Client::builder()
            .user_agent(concat!("woosync/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            auth_header: basic_auth_header(&config.consumer_key, &config.consumer_secret),
        })
    }

    fn products_url(&self) -> String {
        format!("{}/wp-json/wc/v3/products", self.base_url)
    }

    fn categories_url(&self) -> String {
        format!("{}/wp-json/wc/v3/products/categories", self.base_url)
    }

    fn brands_url(&self) -> String {
        format!("{}/wp-json/wc/v3/products/brands", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SyncError> {
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, &self.auth_header)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;
        decode_json(resp).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T, SyncError> {
        let resp = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, &self.auth_header)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;
        decode_json(resp).await
    }
}

#[async_trait]
impl CatalogApi for WooClient {
    async fn search_categories(&self, name: &str) -> Result<Vec<Category>, SyncError> {
        self.get_json(&self.categories_url(), &[("search", name)])
            .await
    }

    async fn create_category(&self, name: &str) -> Result<Category, SyncError> {
        self.send_json(Method::POST, &self.categories_url(), &json!({ "name": name }))
            .await
    }

    async fn search_brands(&self, name: &str) -> Result<Vec<Brand>, SyncError> {
        self.get_json(&self.brands_url(), &[("search", name)]).await
    }

    async fn create_brand(&self, name: &str) -> Result<Brand, SyncError> {
        self.send_json(Method::POST, &self.brands_url(), &json!({ "name": name }))
            .await
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Vec<RemoteProduct>, SyncError> {
        self.get_json(&self.products_url(), &[("sku", sku)]).await
    }

    async fn create_product(
        &self,
        payload: &CreateProductPayload,
    ) -> Result<RemoteProduct, SyncError> {
        self.send_json(Method::POST, &self.products_url(), payload)
            .await
    }

    async fn update_product(
        &self,
        id: i64,
        payload: &UpdateProductPayload,
    ) -> Result<RemoteProduct, SyncError> {
        let url = format!("{}/{}", self.products_url(), id);
        self.send_json(Method::PUT, &url, payload).await
    }
}
