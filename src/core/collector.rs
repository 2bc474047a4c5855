use crate::domain::model::{Page, Record, RecordKind};
use crate::domain::ports::{PagedSource, WorkerManager};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Follows continuation tokens until the listing is exhausted.
pub async fn collect_all<P: PagedSource + ?Sized>(source: &P, kind: RecordKind) -> Result<Vec<Record>> {
    let mut page = source.fetch_page(None).await?;
    let mut page_count = 1;
    let mut records = std::mem::take(&mut page.items);
    tracing::info!(
        "Getting {}, page 1, {} {}...",
        kind.label(),
        records.len(),
        kind.label()
    );

    while let Some(token) = page.continuation_token.take() {
        page = source.fetch_page(Some(&token)).await?;
        records.append(&mut page.items);
        page_count += 1;
        tracing::info!(
            "Getting {}, page {}, {} {}...",
            kind.label(),
            page_count,
            records.len(),
            kind.label()
        );
    }

    tracing::info!("Found {} {}.", records.len(), kind.label());
    Ok(records)
}

pub struct WorkerPoolsListing<'a, W: WorkerManager + ?Sized> {
    pub manager: &'a W,
}

#[async_trait]
impl<W: WorkerManager + ?Sized> PagedSource for WorkerPoolsListing<'_, W> {
    async fn fetch_page(&self, continuation_token: Option<&str>) -> Result<Page> {
        self.manager.list_worker_pools(continuation_token).await
    }
}

pub struct PoolWorkersListing<'a, W: WorkerManager + ?Sized> {
    pub manager: &'a W,
    pub pool_id: &'a str,
}

#[async_trait]
impl<W: WorkerManager + ?Sized> PagedSource for PoolWorkersListing<'_, W> {
    async fn fetch_page(&self, continuation_token: Option<&str>) -> Result<Page> {
        self.manager
            .list_workers_for_pool(self.pool_id, continuation_token)
            .await
    }
}
