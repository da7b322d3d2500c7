//! Batch orchestration over the per-product reconciler.
use futures::future::join_all;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{error, info};

use crate::config::SyncParams;
use crate::store::LocalProduct;
use crate::sync::reconciler::{reconcile, Reconciled};
use crate::woo::client::CatalogApi;

/// Aggregate outcome of one sync invocation. Per-product error detail stays
/// in the logs; callers only see the counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Partition `rows` into order-preserving fixed-size batches, fan each batch
/// out concurrently and wait for every member to settle, then pause before
/// the next batch. The pause is the sole rate limiter toward the remote; a
/// failed or skipped product never blocks its batch siblings.
pub async fn sync_batches<C: CatalogApi + ?Sized>(
    api: &C,
    rows: &[LocalProduct],
    markup: f64,
    params: &SyncParams,
) -> SyncSummary {
    let mut summary = SyncSummary {
        total: rows.len(),
        ..SyncSummary::default()
    };
    let batch_size = params.batch_size.max(1);
    let batches = rows.len().div_ceil(batch_size);

    for (index, batch) in rows.chunks(batch_size).enumerate() {
        info!(
            batch = index + 1,
            batches,
            size = batch.len(),
            "dispatching batch"
        );
        let results = join_all(batch.iter().map(|row| reconcile(api, row, markup))).await;
        for (row, result) in batch.iter().zip(results) {
            match result {
                Ok(Reconciled::Skipped) => summary.skipped += 1,
                Ok(_) => summary.success += 1,
                Err(err) => {
                    error!(sku = ?row.sku(), error = %err, "product sync failed");
                    summary.failed += 1;
                }
            }
        }
        if index + 1 < batches {
            sleep(params.inter_batch_delay).await;
        }
    }

    info!(
        total = summary.total,
        success = summary.success,
        failed = summary.failed,
        skipped = summary.skipped,
        "sync complete"
    );
    summary
}
