use crate::core::aggregate::aggregate;
use crate::core::datetime::DatetimeNormalizer;
use crate::core::projector::{explode_launch_configs, project, project_with_header, worker_rows, Header, Table};
use crate::domain::model::{CsvViewDefinition, Record, RecordKind};
use crate::utils::error::{Result, StatsError};

/// Shapes records into the CSV table for their kind, optionally reduced to a view.
pub fn build_csv_table(
    kind: RecordKind,
    records: &[Record],
    normalizer: DatetimeNormalizer,
    view: Option<&CsvViewDefinition>,
) -> Result<Table> {
    let rows = match kind {
        RecordKind::Worker => worker_rows(records),
        RecordKind::WorkerPool => explode_launch_configs(records)?,
    };

    match view {
        Some(view) => {
            let grouped = aggregate(&rows, view);
            project_with_header(Header::from_columns(view.output_columns()), &grouped, normalizer)
        }
        None => project(&rows, normalizer),
    }
}

pub fn table_to_csv(table: &Table) -> Result<Vec<u8>> {
    if table.header.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.header.columns())?;
    for row in &table.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }

    writer
        .into_inner()
        .map_err(|e| StatsError::IoError(e.into_error()))
}

pub fn records_to_json(records: &[Record]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

pub fn records_from_json(data: &[u8]) -> Result<Vec<Record>> {
    Ok(serde_json::from_slice(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::AMIS_VIEW;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn read_csv(data: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(data)
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_worker_csv_quotes_and_dates() {
        let workers = records(json!([
            {"workerId": "i-1", "workerGroup": "us-east-1, a", "created": "2021-03-05T14:22:09.500Z"},
            {"workerId": "i-2", "state": "running"}
        ]));
        let table = build_csv_table(RecordKind::Worker, &workers, DatetimeNormalizer::default(), None).unwrap();
        let data = table_to_csv(&table).unwrap();

        let text = String::from_utf8(data.clone()).unwrap();
        assert!(text.contains("\"us-east-1, a\""));

        let rows = read_csv(&data);
        assert_eq!(rows[0], vec!["workerId", "workerGroup", "created", "state"]);
        assert_eq!(rows[1], vec!["i-1", "us-east-1, a", "2021-03-05 14:22:09", ""]);
        assert_eq!(rows[2], vec!["i-2", "", "", "running"]);
    }

    #[test]
    fn test_pool_csv_with_amis_view() {
        let pools = records(json!([
            {
                "workerPoolId": "proj/a",
                "providerId": "aws",
                "created": "2020-01-01T00:00:00.000Z",
                "lastModified": "2020-02-01T00:00:00.000Z",
                "owner": "ops@example.com",
                "config": {"launchConfigs": [
                    {"region": "us-east-1", "launchConfig": {"ImageId": "ami-1"}, "capacityPerInstance": 1},
                    {"region": "us-east-1", "launchConfig": {"ImageId": "ami-1"}, "capacityPerInstance": 4}
                ]}
            }
        ]));
        let table = build_csv_table(
            RecordKind::WorkerPool,
            &pools,
            DatetimeNormalizer::default(),
            Some(&AMIS_VIEW),
        )
        .unwrap();

        assert_eq!(table.rows.len(), 1);
        let rows = read_csv(&table_to_csv(&table).unwrap());
        assert_eq!(rows[0].last().unwrap(), "launch_config_count");
        assert_eq!(
            rows[1],
            vec![
                "proj/a",
                "aws",
                "2020-01-01 00:00:00",
                "2020-02-01 00:00:00",
                "ops@example.com",
                "ami-1",
                "us-east-1",
                "",
                "2"
            ]
        );
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        let table = build_csv_table(RecordKind::Worker, &[], DatetimeNormalizer::default(), None).unwrap();
        assert!(table_to_csv(&table).unwrap().is_empty());
    }

    #[test]
    fn test_json_preserves_records() {
        let workers = records(json!([{"workerId": "i-1", "capacity": 2, "extra": {"k": [1, 2]}}]));
        let data = records_to_json(&workers).unwrap();
        assert_eq!(records_from_json(&data).unwrap(), workers);
    }
}
