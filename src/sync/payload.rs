//! Pure payload assembly: the create-vs-update field-inclusion rules live
//! here as two builders over plain data, with the coercion helpers they
//! share. Nothing in this module performs I/O.
use serde_json::Value;

use crate::store::LocalProduct;
use crate::woo::types::{
    CreateProductPayload, ImageRef, MetaDataEntry, StockStatus, TermRef, UpdateProductPayload,
};

const PRODUCT_TYPE: &str = "simple";

/// Inventory display downstream depends on this exact rule: in stock unless
/// the flag is falsy (absent, null, false, 0, "", or the string "0").
pub fn stock_status(availability: Option<&Value>) -> StockStatus {
    let in_stock = match availability {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty() && s != "0",
        Some(_) => true,
    };
    if in_stock {
        StockStatus::Instock
    } else {
        StockStatus::Outofstock
    }
}

/// Parse the serialized image-list field; fall back to a one-element list
/// from the featured image when parsing fails or yields nothing.
pub fn parse_image_list(raw: Option<&str>, featured: Option<&str>) -> Vec<ImageRef> {
    if let Some(raw) = raw {
        if let Ok(urls) = serde_json::from_str::<Vec<String>>(raw) {
            if !urls.is_empty() {
                return urls.into_iter().map(|src| ImageRef { src }).collect();
            }
        }
    }
    match featured {
        Some(src) if !src.is_empty() => vec![ImageRef {
            src: src.to_string(),
        }],
        _ => Vec::new(),
    }
}

fn price_as_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Format like the source system formats numbers: no trailing `.0` on whole
/// amounts, so 499 + 1200 serializes as "1699".
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Listed price: original price (0 when missing or non-numeric) plus the
/// fixed additive markup, as the string the API expects.
pub fn listed_price(original: Option<&Value>, markup: f64) -> String {
    format_amount(price_as_f64(original) + markup)
}

/// Auxiliary fields not native to the catalog schema, attached on both the
/// create and update path. Raw source values are kept for audit visibility
/// downstream, including fields redundant with native ones.
pub fn build_meta_data(product: &LocalProduct) -> Vec<MetaDataEntry> {
    let raw = |v: &Option<Value>| v.clone().unwrap_or(Value::Null);
    let text = |v: &Option<String>| Value::String(v.clone().unwrap_or_default());
    vec![
        MetaDataEntry::new("productFetchedFrom", text(&product.fetched_from)),
        MetaDataEntry::new("productUrl", text(&product.product_url)),
        MetaDataEntry::new("videoUrl", text(&product.video_url)),
        MetaDataEntry::new("availability", raw(&product.availability)),
        MetaDataEntry::new("productOriginalPrice", raw(&product.original_price)),
        MetaDataEntry::new("featuredimg", text(&product.featured_image)),
        MetaDataEntry::new("imageUrl", text(&product.image_urls)),
        MetaDataEntry::new("productBrand", text(&product.brand)),
        MetaDataEntry::new(
            "productLastUpdated",
            product.last_updated.map(Value::from).unwrap_or(Value::Null),
        ),
        MetaDataEntry::new(
            "productDateCreation",
            product.date_created.map(Value::from).unwrap_or(Value::Null),
        ),
        MetaDataEntry::new("productShortDescription", text(&product.short_description)),
        MetaDataEntry::new("productDescription", text(&product.description)),
    ]
}

/// Full field set for a product with no remote counterpart: computed price,
/// category and brand links, images.
pub fn build_create_payload(
    product: &LocalProduct,
    sku: &str,
    category: Option<i64>,
    brand: Option<i64>,
    markup: f64,
) -> CreateProductPayload {
    CreateProductPayload {
        name: product.name.clone(),
        product_type: PRODUCT_TYPE,
        regular_price: listed_price(product.original_price.as_ref(), markup),
        sku: sku.to_string(),
        description: product.description.clone().unwrap_or_default(),
        short_description: product.short_description.clone().unwrap_or_default(),
        categories: category.map(|id| vec![TermRef { id }]).unwrap_or_default(),
        brands: brand.map(|id| vec![TermRef { id }]),
        images: parse_image_list(
            product.image_urls.as_deref(),
            product.featured_image.as_deref(),
        ),
        stock_status: stock_status(product.availability.as_ref()),
        meta_data: build_meta_data(product),
    }
}

/// Partial field set for an existing remote product: stock status, metadata
/// and the brand link. Price, category and images stay remote-authoritative.
pub fn build_update_payload(
    product: &LocalProduct,
    sku: &str,
    brand: Option<i64>,
) -> UpdateProductPayload {
    UpdateProductPayload {
        name: product.name.clone(),
        product_type: PRODUCT_TYPE,
        sku: sku.to_string(),
        description: product.description.clone().unwrap_or_default(),
        short_description: product.short_description.clone().unwrap_or_default(),
        stock_status: stock_status(product.availability.as_ref()),
        brands: brand.map(|id| vec![TermRef { id }]),
        meta_data: build_meta_data(product),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // The sample row from the upstream scraper, kept as the canonical fixture.
    fn casio_metal() -> LocalProduct {
        LocalProduct {
            product_id: Some(json!(30122)),
            name: "CASIO METAL".to_string(),
            original_price: Some(json!(499)),
            fetched_from: Some("https://famwatch.cartpe.in/".to_string()),
            product_url: Some(
                "https://famwatch.cartpe.in/casio-metal-famwatch8944.html?color=".to_string(),
            ),
            featured_image: Some(
                "https://cdn.cartpe.in/images/gallery_sm/68e29b55ecf1c.jpeg".to_string(),
            ),
            image_urls: Some(
                "[\"https://cdn.cartpe.in/images/gallery_md/68e29b55ecf1c.jpeg\"]".to_string(),
            ),
            category_name: Some("Mens Watch".to_string()),
            availability: Some(json!(1)),
            ..LocalProduct::default()
        }
    }

    #[test]
    fn availability_truth_table() {
        for truthy in [json!(1), json!(true), json!("1"), json!("yes"), json!("false")] {
            assert_eq!(
                stock_status(Some(&truthy)),
                StockStatus::Instock,
                "{truthy}"
            );
        }
        for falsy in [json!(0), json!(false), json!("0"), json!(""), json!(null)] {
            assert_eq!(
                stock_status(Some(&falsy)),
                StockStatus::Outofstock,
                "{falsy}"
            );
        }
        assert_eq!(stock_status(None), StockStatus::Outofstock);
    }

    #[test]
    fn image_list_parses_serialized_urls() {
        let images = parse_image_list(Some("[\"a\",\"b\"]"), Some("feat"));
        assert_eq!(
            images,
            vec![
                ImageRef { src: "a".into() },
                ImageRef { src: "b".into() }
            ]
        );
    }

    #[test]
    fn image_list_falls_back_to_featured() {
        let images = parse_image_list(Some("not json"), Some("feat"));
        assert_eq!(images, vec![ImageRef { src: "feat".into() }]);

        // A parseable-but-empty list also falls back.
        let images = parse_image_list(Some("[]"), Some("feat"));
        assert_eq!(images, vec![ImageRef { src: "feat".into() }]);
    }

    #[test]
    fn image_list_empty_when_both_unusable() {
        assert!(parse_image_list(None, None).is_empty());
        assert!(parse_image_list(Some("not json"), Some("")).is_empty());
    }

    #[test]
    fn listed_price_adds_fixed_markup() {
        assert_eq!(listed_price(Some(&json!(499)), 1200.0), "1699");
        assert_eq!(listed_price(Some(&json!("499")), 1200.0), "1699");
        assert_eq!(listed_price(Some(&json!("499.0")), 1200.0), "1699");
        assert_eq!(listed_price(Some(&json!(499.5)), 1200.0), "1699.5");
        assert_eq!(listed_price(None, 1200.0), "1200");
        assert_eq!(listed_price(Some(&json!("n/a")), 1200.0), "1200");
    }

    #[test]
    fn create_payload_carries_full_field_set() {
        let product = casio_metal();
        let payload = build_create_payload(&product, "30122", Some(7), Some(3), 1200.0);
        assert_eq!(payload.regular_price, "1699");
        assert_eq!(payload.sku, "30122");
        assert_eq!(payload.categories, vec![TermRef { id: 7 }]);
        assert_eq!(payload.brands, Some(vec![TermRef { id: 3 }]));
        assert_eq!(payload.images.len(), 1);
        assert_eq!(payload.stock_status, StockStatus::Instock);

        // Unresolved category still serializes as an empty list, unresolved
        // brand is omitted entirely.
        let payload = build_create_payload(&product, "30122", None, None, 1200.0);
        assert!(payload.categories.is_empty());
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("categories").is_some());
        assert!(value.get("brands").is_none());
    }

    #[test]
    fn update_payload_never_touches_price_category_or_images() {
        let product = casio_metal();
        let payload = build_update_payload(&product, "30122", Some(3));
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("regular_price").is_none());
        assert!(value.get("categories").is_none());
        assert!(value.get("images").is_none());
        assert_eq!(value["stock_status"], "instock");
        assert_eq!(value["brands"], json!([{ "id": 3 }]));
    }

    #[test]
    fn meta_data_keeps_raw_auxiliary_fields() {
        let product = casio_metal();
        let meta = build_meta_data(&product);
        let get = |key: &str| {
            meta.iter()
                .find(|entry| entry.key == key)
                .map(|entry| entry.value.clone())
        };
        assert_eq!(get("availability"), Some(json!(1)));
        assert_eq!(get("productOriginalPrice"), Some(json!(499)));
        assert_eq!(get("productBrand"), Some(json!("")));
        assert_eq!(get("videoUrl"), Some(json!("")));
        assert_eq!(
            get("productFetchedFrom"),
            Some(json!("https://famwatch.cartpe.in/"))
        );
        assert_eq!(meta.len(), 12);
    }
}
