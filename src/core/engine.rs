use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct StatsEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> StatsEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order and returns the summary text.
    pub async fn run(&self) -> Result<String> {
        let records = self.pipeline.extract().await?;
        tracing::debug!("Extracted {} records", records.len());

        let report = self.pipeline.transform(&records).await?;
        if let Some(table) = &report.csv {
            tracing::debug!("Prepared CSV with {} rows", table.rows.len());
        }

        self.pipeline.load(&records, &report).await?;
        Ok(report.summary)
    }
}
