//! Per-product upsert against the remote catalog.
use tracing::{info, warn};

use crate::store::LocalProduct;
use crate::sync::error::SyncError;
use crate::sync::payload::{build_create_payload, build_update_payload};
use crate::woo::client::CatalogApi;
use crate::woo::types::RemoteProduct;

/// Result of one reconciliation pass over a local row.
#[derive(Debug, Clone)]
pub enum Reconciled {
    Created(RemoteProduct),
    Updated(RemoteProduct),
    /// Row had no usable identifier; no remote call was made.
    Skipped,
}

/// Look up a category id by name, creating the term when absent.
///
/// Resolution is best-effort: any failure is logged and yields `None`, and
/// the product proceeds without the link. Two concurrent resolutions of the
/// same new name can both miss the search and both create the term; the
/// duplicate is an accepted consequence of parallel batch dispatch.
pub async fn resolve_category<C: CatalogApi + ?Sized>(api: &C, name: Option<&str>) -> Option<i64> {
    let name = name.map(str::trim).filter(|n| !n.is_empty())?;
    match api.search_categories(name).await {
        Ok(found) if !found.is_empty() => Some(found[0].id),
        Ok(_) => match api.create_category(name).await {
            Ok(created) => {
                info!(category = name, id = created.id, "created category");
                Some(created.id)
            }
            Err(err) => {
                warn!(category = name, error = %err, "category create failed");
                None
            }
        },
        Err(err) => {
            warn!(category = name, error = %err, "category search failed");
            None
        }
    }
}

/// Brand counterpart of [`resolve_category`], same contract.
pub async fn resolve_brand<C: CatalogApi + ?Sized>(api: &C, name: Option<&str>) -> Option<i64> {
    let name = name.map(str::trim).filter(|n| !n.is_empty())?;
    match api.search_brands(name).await {
        Ok(found) if !found.is_empty() => Some(found[0].id),
        Ok(_) => match api.create_brand(name).await {
            Ok(created) => {
                info!(brand = name, id = created.id, "created brand");
                Some(created.id)
            }
            Err(err) => {
                warn!(brand = name, error = %err, "brand create failed");
                None
            }
        },
        Err(err) => {
            warn!(brand = name, error = %err, "brand search failed");
            None
        }
    }
}

/// Upsert one local row: look the SKU up remotely, then create with the full
/// field set or update with the partial one. Idempotent per call, but not
/// atomic across the lookup-then-write gap.
pub async fn reconcile<C: CatalogApi + ?Sized>(
    api: &C,
    product: &LocalProduct,
    markup: f64,
) -> Result<Reconciled, SyncError> {
    let Some(sku) = product.sku() else {
        info!(product = %product.name, "skipping product without identifier");
        return Ok(Reconciled::Skipped);
    };

    let existing = api.find_product_by_sku(&sku).await?.into_iter().next();

    match existing {
        Some(remote) => {
            // Brand may be corrected on update; category, price and images
            // stay remote-authoritative.
            let brand = resolve_brand(api, product.brand.as_deref()).await;
            let payload = build_update_payload(product, &sku, brand);
            let updated = api.update_product(remote.id, &payload).await?;
            info!(sku = %sku, id = updated.id, "updated product");
            Ok(Reconciled::Updated(updated))
        }
        None => {
            let category = resolve_category(api, product.category_name.as_deref()).await;
            let brand = resolve_brand(api, product.brand.as_deref()).await;
            let payload = build_create_payload(product, &sku, category, brand, markup);
            let created = api.create_product(&payload).await?;
            info!(sku = %sku, id = created.id, "created product");
            Ok(Reconciled::Created(created))
        }
    }
}
