//! The batched upsert reconciliation core.
pub mod error;
pub mod orchestrator;
pub mod payload;
pub mod reconciler;

pub use error::SyncError;
pub use orchestrator::{sync_batches, SyncSummary};
pub use reconciler::{reconcile, Reconciled};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use crate::sync::error::SyncError;
    use crate::woo::client::CatalogApi;
    use crate::woo::types::{
        Brand, Category, CreateProductPayload, RemoteProduct, UpdateProductPayload,
    };

    /// In-memory remote catalog double recording every call.
    #[derive(Default)]
    pub struct MockCatalog {
        pub state: Mutex<MockState>,
    }

    #[derive(Default)]
    pub struct MockState {
        pub products: Vec<RemoteProduct>,
        pub categories: Vec<Category>,
        pub brands: Vec<Brand>,
        pub calls: Vec<String>,
        pub created: Vec<CreateProductPayload>,
        pub updated: Vec<(i64, UpdateProductPayload)>,
        pub fail_category_search: bool,
        pub fail_sku: Option<String>,
        next_id: i64,
    }

    impl MockState {
        fn next_id(&mut self) -> i64 {
            self.next_id += 1;
            self.next_id
        }
    }

    fn api_error(body: &str) -> SyncError {
        SyncError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: body.to_string(),
        }
    }

    #[async_trait]
    impl CatalogApi for MockCatalog {
        async fn search_categories(&self, name: &str) -> Result<Vec<Category>, SyncError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("search_categories:{name}"));
            if state.fail_category_search {
                return Err(api_error("category search down"));
            }
            Ok(state
                .categories
                .iter()
                .filter(|c| c.name.contains(name))
                .cloned()
                .collect())
        }

        async fn create_category(&self, name: &str) -> Result<Category, SyncError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("create_category:{name}"));
            let id = state.next_id();
            let category = Category {
                id,
                name: name.to_string(),
            };
            state.categories.push(category.clone());
            Ok(category)
        }

        async fn search_brands(&self, name: &str) -> Result<Vec<Brand>, SyncError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("search_brands:{name}"));
            Ok(state
                .brands
                .iter()
                .filter(|b| b.name.contains(name))
                .cloned()
                .collect())
        }

        async fn create_brand(&self, name: &str) -> Result<Brand, SyncError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("create_brand:{name}"));
            let id = state.next_id();
            let brand = Brand {
                id,
                name: name.to_string(),
            };
            state.brands.push(brand.clone());
            Ok(brand)
        }

        async fn find_product_by_sku(&self, sku: &str) -> Result<Vec<RemoteProduct>, SyncError> {
            // Yield so concurrently dispatched lookups interleave like real
            // network calls would.
            tokio::task::yield_now().await;
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("lookup:{sku}"));
            if state.fail_sku.as_deref() == Some(sku) {
                return Err(api_error("lookup failed"));
            }
            Ok(state
                .products
                .iter()
                .filter(|p| p.sku == sku)
                .cloned()
                .collect())
        }

        async fn create_product(
            &self,
            payload: &CreateProductPayload,
        ) -> Result<RemoteProduct, SyncError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("create:{}", payload.sku));
            let id = state.next_id();
            let remote = RemoteProduct {
                id,
                sku: payload.sku.clone(),
                name: payload.name.clone(),
                regular_price: Some(payload.regular_price.clone()),
                stock_status: Some(payload.stock_status.as_str().to_string()),
            };
            state.products.push(remote.clone());
            state.created.push(payload.clone());
            Ok(remote)
        }

        async fn update_product(
            &self,
            id: i64,
            payload: &UpdateProductPayload,
        ) -> Result<RemoteProduct, SyncError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("update:{}", payload.sku));
            let stock = payload.stock_status.as_str().to_string();
            if let Some(existing) = state.products.iter_mut().find(|p| p.id == id) {
                existing.name = payload.name.clone();
                existing.stock_status = Some(stock);
            }
            let remote = state
                .products
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .unwrap_or(RemoteProduct {
                    id,
                    sku: payload.sku.clone(),
                    name: payload.name.clone(),
                    regular_price: None,
                    stock_status: Some(payload.stock_status.as_str().to_string()),
                });
            state.updated.push((id, payload.clone()));
            Ok(remote)
        }
    }
}
