//! Local row source: the `PRODUCTS` SQLite table the scraper writes.
//!
//! The table predates this crate and stores several columns with mixed
//! storage classes (identifiers as INTEGER or TEXT, availability as 0/1 or
//! "0"/"1" depending on the importing scraper). Loose columns are normalized
//! to TEXT in SQL and surfaced as `serde_json::Value` so the sync layer owns
//! the coercion rules. Rows are read-only from this crate's perspective.
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

/// One scraped product row. Field names follow the crate's conventions; the
/// source column names are kept in the queries below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalProduct {
    /// External identifier and SKU candidate; string or number at the source.
    pub product_id: Option<Value>,
    pub name: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    /// Pre-markup price; number, numeric string, or absent.
    pub original_price: Option<Value>,
    /// Truthy/falsy stock flag; bool, number or string at the source.
    pub availability: Option<Value>,
    pub category_name: Option<String>,
    pub brand: Option<String>,
    pub featured_image: Option<String>,
    /// Serialized JSON list of image URLs, or a single bare URL.
    pub image_urls: Option<String>,
    pub product_url: Option<String>,
    pub fetched_from: Option<String>,
    pub video_url: Option<String>,
    /// Epoch milliseconds.
    pub date_created: Option<i64>,
    /// Epoch milliseconds.
    pub last_updated: Option<i64>,
}

impl LocalProduct {
    /// SKU candidate: the identifier coerced to a non-empty string. `None`
    /// means the row is ineligible for sync and must be skipped.
    pub fn sku(&self) -> Option<String> {
        match self.product_id.as_ref()? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Open the product store. The path may carry SQLite URI options.
pub async fn connect(path: &str) -> Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite://{path}"))
        .await
        .with_context(|| format!("opening product store at {path}"))
}

const PRODUCT_COLUMNS: &str = "CAST(productId AS TEXT) AS productId, \
     productName, productDescription, productShortDescription, \
     CAST(productOriginalPrice AS TEXT) AS productOriginalPrice, \
     CAST(availability AS TEXT) AS availability, \
     catName, productBrand, featuredimg, imageUrl, productUrl, \
     productFetchedFrom, videoUrl, \
     CAST(productDateCreation AS INTEGER) AS productDateCreation, \
     CAST(productLastUpdated AS INTEGER) AS productLastUpdated";

fn text(row: &SqliteRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}

fn integer(row: &SqliteRow, column: &str) -> Option<i64> {
    row.try_get::<Option<i64>, _>(column).ok().flatten()
}

fn map_row(row: &SqliteRow) -> LocalProduct {
    LocalProduct {
        product_id: text(row, "productId").map(Value::String),
        name: text(row, "productName").unwrap_or_default(),
        description: text(row, "productDescription"),
        short_description: text(row, "productShortDescription"),
        original_price: text(row, "productOriginalPrice").map(Value::String),
        availability: text(row, "availability").map(Value::String),
        category_name: text(row, "catName"),
        brand: text(row, "productBrand"),
        featured_image: text(row, "featuredimg"),
        image_urls: text(row, "imageUrl"),
        product_url: text(row, "productUrl"),
        fetched_from: text(row, "productFetchedFrom"),
        video_url: text(row, "videoUrl"),
        date_created: integer(row, "productDateCreation"),
        last_updated: integer(row, "productLastUpdated"),
    }
}

fn recent_cutoff_millis(window_hours: f64) -> i64 {
    Utc::now().timestamp_millis() - (window_hours * 3_600_000.0) as i64
}

/// Rows updated at or after `now - window_hours`, most recently updated
/// first. A failure here aborts the whole sync invocation.
pub async fn fetch_recent(pool: &SqlitePool, window_hours: f64) -> Result<Vec<LocalProduct>> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM PRODUCTS \
         WHERE productLastUpdated >= ? ORDER BY productLastUpdated DESC"
    );
    let rows = sqlx::query(&sql)
        .bind(recent_cutoff_millis(window_hours))
        .fetch_all(pool)
        .await
        .context("querying recently updated products")?;
    Ok(rows.iter().map(map_row).collect())
}

/// Every row, newest creation first (full-sync scope).
pub async fn fetch_all(pool: &SqlitePool) -> Result<Vec<LocalProduct>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM PRODUCTS ORDER BY productDateCreation DESC");
    let rows = sqlx::query(&sql)
        .fetch_all(pool)
        .await
        .context("querying all products")?;
    Ok(rows.iter().map(map_row).collect())
}

#[derive(Debug, Clone, Copy)]
pub struct StoreCounts {
    pub total: i64,
    pub recent: i64,
}

/// Row totals for the admin `counts` command.
pub async fn counts(pool: &SqlitePool, window_hours: f64) -> Result<StoreCounts> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM PRODUCTS")
        .fetch_one(pool)
        .await
        .context("counting products")?;
    let recent: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM PRODUCTS WHERE productLastUpdated >= ?")
            .bind(recent_cutoff_millis(window_hours))
            .fetch_one(pool)
            .await
            .context("counting recent products")?;
    Ok(StoreCounts { total, recent })
}
