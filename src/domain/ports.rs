use crate::domain::model::{Page, Record, StatsReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// The subset of the worker-manager API these tools call.
#[async_trait]
pub trait WorkerManager: Send + Sync {
    async fn ping(&self) -> Result<()>;
    async fn worker_pool(&self, pool_id: &str) -> Result<Record>;
    async fn list_worker_pools(&self, continuation_token: Option<&str>) -> Result<Page>;
    async fn list_workers_for_pool(
        &self,
        pool_id: &str,
        continuation_token: Option<&str>,
    ) -> Result<Page>;
}

/// A listing that can be fetched one page at a time.
#[async_trait]
pub trait PagedSource: Send + Sync {
    async fn fetch_page(&self, continuation_token: Option<&str>) -> Result<Page>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, records: &[Record]) -> Result<StatsReport>;
    async fn load(&self, records: &[Record], report: &StatsReport) -> Result<()>;
}
