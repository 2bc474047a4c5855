use crate::core::datetime::{is_date_field, DatetimeNormalizer, NormalizedTimestamp};
use crate::core::flatten::{flatten_config, merge_unique};
use crate::domain::model::{FlatRow, Record};
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

const LAUNCH_CONFIGS_KEY: &str = "config_launchConfigs";

/// Column names in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
    seen: HashSet<String>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut header = Self::new();
        for column in columns {
            header.observe(column.into());
        }
        header
    }

    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a FlatRow>,
    {
        let mut header = Self::new();
        for row in rows {
            for key in row.keys() {
                if !header.seen.contains(key) {
                    header.observe(key.clone());
                }
            }
        }
        header
    }

    fn observe(&mut self, column: String) {
        if self.seen.insert(column.clone()) {
            self.columns.push(column);
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Timestamp(NormalizedTimestamp),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(text) => f.write_str(text),
            Cell::Timestamp(ts) => write!(f, "{}", ts),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Header,
    pub rows: Vec<Vec<Cell>>,
}

/// Text form of a JSON value as it lands in a CSV cell.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

/// Builds the export table: header from the union of keys, one row per input.
pub fn project(rows: &[FlatRow], normalizer: DatetimeNormalizer) -> Result<Table> {
    let header = Header::from_rows(rows);
    project_with_header(header, rows, normalizer)
}

pub fn project_with_header(
    header: Header,
    rows: &[FlatRow],
    normalizer: DatetimeNormalizer,
) -> Result<Table> {
    let mut out = Vec::with_capacity(rows.len());

    for (row_num, row) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(header.len());
        for key in header.columns() {
            let cell = match row.get(key) {
                None | Some(Value::Null) => Cell::Empty,
                Some(Value::String(raw)) if raw.is_empty() => Cell::Empty,
                Some(Value::String(raw)) if is_date_field(key) => {
                    Cell::Timestamp(normalizer.normalize_field(row_num, key, raw)?)
                }
                Some(other) if is_date_field(key) => {
                    Cell::Timestamp(normalizer.normalize_field(row_num, key, &other.to_string())?)
                }
                Some(value) => Cell::Text(value_text(value)),
            };
            cells.push(cell);
        }
        out.push(cells);
    }

    Ok(Table { header, rows: out })
}

/// Worker records are already one level deep; they export as-is.
pub fn worker_rows(records: &[Record]) -> Vec<FlatRow> {
    records.iter().map(|record| record.data.clone()).collect()
}

/// One row per pool and launch config, launch config keys prefixed `lc_`.
pub fn explode_launch_configs(pools: &[Record]) -> Result<Vec<FlatRow>> {
    let mut flat_configs = Vec::new();

    for pool in pools {
        // Rebuilt rather than removed from so column order stays intact.
        let mut flat_pool = FlatRow::new();
        let mut launch_configs = Vec::new();
        for (key, value) in flatten_config(&pool.data, "", false)? {
            if key == LAUNCH_CONFIGS_KEY {
                if let Value::Array(items) = value {
                    launch_configs = items;
                }
            } else {
                flat_pool.insert(key, value);
            }
        }
        if launch_configs.is_empty() {
            tracing::debug!(
                "Pool {} has no launch configs, skipping in CSV",
                pool.str_field("workerPoolId")
            );
        }

        for config in launch_configs {
            let mut flat_config = flat_pool.clone();
            if let Value::Object(config) = config {
                merge_unique(&mut flat_config, flatten_config(&config, "lc", true)?)?;
            }
            flat_configs.push(flat_config);
        }
    }

    Ok(flat_configs)
}
