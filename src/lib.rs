//! Batched upsert synchronization of locally scraped products into a
//! WooCommerce catalog.
//!
//! Rows come out of the local `PRODUCTS` store ([`store`]), get reconciled
//! one by one against the remote catalog by SKU ([`sync::reconciler`]) and
//! are dispatched in fixed-size concurrent batches with a pause between
//! batches ([`sync::orchestrator`]). The remote API surface lives behind
//! [`woo::client::CatalogApi`].
pub mod config;
pub mod store;
pub mod sync;
pub mod tracing;
pub mod woo;

pub mod util {
    pub mod env;
}

pub use config::{SyncParams, WooConfig};
pub use store::LocalProduct;
pub use sync::{sync_batches, Reconciled, SyncError, SyncSummary};
pub use woo::{CatalogApi, WooClient};
