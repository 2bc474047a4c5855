use crate::config::RunSettings;
use crate::core::collector::{collect_all, PoolWorkersListing, WorkerPoolsListing};
use crate::core::datetime::DatetimeNormalizer;
use crate::core::export::{build_csv_table, records_from_json, records_to_json, table_to_csv};
use crate::core::summary::{worker_pool_summary, worker_summary};
use crate::core::{Pipeline, Record, RecordKind, Storage, StatsReport, WorkerManager};
use crate::utils::error::{Result, StatsError};

/// Fetch (or load), summarize and export one snapshot of workers or pools.
pub struct StatsPipeline<S: Storage, W: WorkerManager> {
    pub(crate) storage: S,
    pub(crate) manager: Option<W>,
    pub(crate) settings: RunSettings,
}

impl<S: Storage, W: WorkerManager> StatsPipeline<S, W> {
    pub fn new(storage: S, manager: Option<W>, settings: RunSettings) -> Self {
        Self {
            storage,
            manager,
            settings,
        }
    }

    async fn fetch(&self, manager: &W) -> Result<Vec<Record>> {
        manager.ping().await?;
        tracing::info!("Worker Manager is available.");

        match self.settings.kind {
            RecordKind::Worker => {
                let pool_id = self.settings.pool_id.as_deref().ok_or_else(|| {
                    StatsError::MissingRequiredArgument {
                        argument: "pool_id".to_string(),
                    }
                })?;
                let pool = manager.worker_pool(pool_id).await?;
                tracing::info!("Pool {} found.", pool.str_field("workerPoolId"));

                collect_all(&PoolWorkersListing { manager, pool_id }, RecordKind::Worker).await
            }
            RecordKind::WorkerPool => {
                let pools = collect_all(&WorkerPoolsListing { manager }, RecordKind::WorkerPool).await?;
                tracing::info!("Fetched {} worker pools.", pools.len());
                Ok(pools)
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, W: WorkerManager> Pipeline for StatsPipeline<S, W> {
    async fn extract(&self) -> Result<Vec<Record>> {
        if let Some(path) = &self.settings.from_json_file {
            let data = self.storage.read_file(path).await?;
            let records = records_from_json(&data)?;
            tracing::info!(
                "Loaded {} {} from {}.",
                records.len(),
                self.settings.kind.label(),
                path
            );
            return Ok(records);
        }

        let manager = self
            .manager
            .as_ref()
            .ok_or_else(|| StatsError::MissingConfiguration {
                message: "no Worker Manager client configured".to_string(),
            })?;
        self.fetch(manager).await
    }

    async fn transform(&self, records: &[Record]) -> Result<StatsReport> {
        let summary = match self.settings.kind {
            RecordKind::Worker => worker_summary(records)?,
            RecordKind::WorkerPool => worker_pool_summary(records)?,
        };

        let csv = match &self.settings.csv_file {
            Some(_) => Some(build_csv_table(
                self.settings.kind,
                records,
                DatetimeNormalizer::new(self.settings.full_datetimes),
                self.settings.csv_view,
            )?),
            None => None,
        };

        Ok(StatsReport { summary, csv })
    }

    async fn load(&self, records: &[Record], report: &StatsReport) -> Result<()> {
        let label = self.settings.kind.label();

        if let (Some(path), Some(table)) = (&self.settings.csv_file, &report.csv) {
            tracing::info!("Writing {} data to {}...", label, path);
            let data = table_to_csv(table)?;
            self.storage.write_file(path, &data).await?;
            tracing::info!("Done writing {}.", path);
        }

        if let Some(path) = &self.settings.json_file {
            let data = records_to_json(records)?;
            self.storage.write_file(path, &data).await?;
            tracing::info!("Wrote JSON {} data to {}.", label, path);
        }

        Ok(())
    }
}
