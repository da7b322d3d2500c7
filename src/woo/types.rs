//! Wire types for the WooCommerce REST catalog (`wp-json/wc/v3`).
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product category taxonomy term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Product brand taxonomy term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

/// The slice of a remote product this crate acts on. The API returns far
/// more; only `id` and `sku` drive control flow, so the rest is tolerated
/// loosely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub regular_price: Option<String>,
    #[serde(default)]
    pub stock_status: Option<String>,
}

/// Reference to an existing taxonomy term by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
}

/// Auxiliary key/value carried on the product for fields the catalog schema
/// has no native slot for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaDataEntry {
    pub key: String,
    pub value: Value,
}

impl MetaDataEntry {
    pub fn new(key: &str, value: impl Into<Value>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Instock,
    Outofstock,
}

impl StockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::Instock => "instock",
            StockStatus::Outofstock => "outofstock",
        }
    }
}

/// Full payload sent when a SKU has no remote counterpart yet.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProductPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: &'static str,
    pub regular_price: String,
    pub sku: String,
    pub description: String,
    pub short_description: String,
    pub categories: Vec<TermRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<TermRef>>,
    pub images: Vec<ImageRef>,
    pub stock_status: StockStatus,
    pub meta_data: Vec<MetaDataEntry>,
}

/// Partial payload for an existing remote product. Price, categories and
/// images have no field here at all: the remote values are preserved by
/// omission.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProductPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: &'static str,
    pub sku: String,
    pub description: String,
    pub short_description: String,
    pub stock_status: StockStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<TermRef>>,
    pub meta_data: Vec<MetaDataEntry>,
}
