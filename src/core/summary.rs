//! Plain-text summary tables for workers and worker pools.

use crate::domain::model::Record;
use crate::utils::error::{Result, StatsError};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

const COL: &str = "  ";

pub const KNOWN_STATES: [&str; 4] = ["requested", "running", "stopping", "stopped"];

/// Lifecycle states in display order; unknown states are appended when first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateOrder {
    states: Vec<String>,
}

impl Default for StateOrder {
    fn default() -> Self {
        Self {
            states: KNOWN_STATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl StateOrder {
    pub fn observe(&mut self, state: &str) {
        if !self.states.iter().any(|s| s == state) {
            self.states.push(state.to_string());
        }
    }

    pub fn position(&self, state: &str) -> usize {
        self.states
            .iter()
            .position(|s| s == state)
            .unwrap_or(self.states.len())
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub workers: u64,
    pub capacity: i64,
}

impl Tally {
    fn add(&mut self, capacity: i64) {
        self.workers += 1;
        self.capacity += capacity;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkerGroupKey {
    pub pool_id: String,
    pub group: String,
    pub provider_id: String,
    pub state: String,
}

/// Counts gathered for the worker summary.
#[derive(Debug, Clone, Default)]
pub struct WorkerStats {
    pub groups: Vec<(WorkerGroupKey, Tally)>,
    pub states: Vec<(String, Tally)>,
}

/// Integer from a JSON number (integral floats included) or a numeric string.
fn parse_int(value: &Value, field: &str) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| StatsError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
        reason: "expected an integer".to_string(),
    })
}

fn int_field(record: &Record, field: &str, default: i64) -> Result<i64> {
    Ok(optional_int(record.get(field), field)?.unwrap_or(default))
}

fn optional_int(value: Option<&Value>, field: &str) -> Result<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse_int(value, field).map(Some),
    }
}

pub fn collect_worker_stats(workers: &[Record]) -> Result<WorkerStats> {
    let mut order = StateOrder::default();
    let mut groups: HashMap<WorkerGroupKey, Tally> = HashMap::new();
    let mut states: HashMap<String, Tally> = HashMap::new();

    for worker in workers {
        let key = WorkerGroupKey {
            pool_id: worker.str_field("workerPoolId").to_string(),
            group: worker.str_field("workerGroup").to_string(),
            provider_id: worker.str_field("providerId").to_string(),
            state: worker.str_field("state").to_string(),
        };
        let capacity = int_field(worker, "capacity", 1)?;

        order.observe(&key.state);
        states.entry(key.state.clone()).or_default().add(capacity);
        groups.entry(key).or_default().add(capacity);
    }

    let mut groups: Vec<(WorkerGroupKey, Tally)> = groups.into_iter().collect();
    groups.sort_by(|(a, _), (b, _)| {
        (&a.pool_id, &a.group, &a.provider_id, order.position(&a.state)).cmp(&(
            &b.pool_id,
            &b.group,
            &b.provider_id,
            order.position(&b.state),
        ))
    });

    let states = order
        .states()
        .iter()
        .map(|state| (state.clone(), states.get(state).copied().unwrap_or_default()))
        .collect();

    Ok(WorkerStats { groups, states })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct TextTable {
    titles: Vec<&'static str>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    fn new(columns: &[(&'static str, Align)]) -> Self {
        Self {
            titles: columns.iter().map(|(title, _)| *title).collect(),
            align: columns.iter().map(|(_, align)| *align).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.titles
            .iter()
            .enumerate()
            .map(|(index, title)| {
                self.rows
                    .iter()
                    .map(|row| row[index].chars().count())
                    .fold(title.chars().count(), usize::max)
            })
            .collect()
    }

    /// Renders with the given widths; pass [`widths`](Self::widths) unless
    /// columns must line up with another table.
    fn render_with(&self, widths: &[usize], output: &mut Vec<String>) {
        let line = |cells: Vec<&str>, header: bool| -> String {
            let joined = cells
                .iter()
                .enumerate()
                .map(|(index, cell)| match (header, self.align[index]) {
                    (false, Align::Right) => format!("{:>width$}", cell, width = widths[index]),
                    _ => format!("{:<width$}", cell, width = widths[index]),
                })
                .collect::<Vec<_>>()
                .join(COL);
            joined.trim_end().to_string()
        };

        output.push(line(self.titles.clone(), true));
        for row in &self.rows {
            output.push(line(row.iter().map(String::as_str).collect(), false));
        }
    }
}

/// Text summary of workers grouped by pool, group, provider and state,
/// followed by totals per state.
pub fn worker_summary(workers: &[Record]) -> Result<String> {
    let stats = collect_worker_stats(workers)?;

    let mut groups = TextTable::new(&[
        ("Pool ID", Align::Left),
        ("Group ID", Align::Left),
        ("Provider ID", Align::Left),
        ("State", Align::Left),
        ("Workers", Align::Left),
        ("Capacity", Align::Left),
    ]);
    for (key, tally) in &stats.groups {
        groups.push(vec![
            key.pool_id.clone(),
            key.group.clone(),
            key.provider_id.clone(),
            key.state.clone(),
            tally.workers.to_string(),
            tally.capacity.to_string(),
        ]);
    }

    let mut totals = TextTable::new(&[
        ("State", Align::Left),
        ("Workers", Align::Left),
        ("Capacity", Align::Left),
    ]);
    for (state, tally) in &stats.states {
        totals.push(vec![
            state.clone(),
            tally.workers.to_string(),
            tally.capacity.to_string(),
        ]);
    }

    // State, Workers and Capacity share widths across both tables.
    let mut group_widths = groups.widths();
    let total_widths = totals.widths();
    for (offset, width) in total_widths.iter().enumerate() {
        group_widths[3 + offset] = group_widths[3 + offset].max(*width);
    }
    let shared = group_widths[3..].to_vec();

    let mut output = Vec::new();
    groups.render_with(&group_widths, &mut output);
    output.extend([String::new(), String::new()]);
    totals.render_with(&shared, &mut output);

    Ok(output.join("\n"))
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PoolKey {
    pub pool_id: String,
    pub provider_id: String,
    pub capacity: i64,
    pub min_capacity: Option<i64>,
    pub max_capacity: Option<i64>,
    pub owner: String,
    pub launch_configs: usize,
}

pub fn pool_key(pool: &Record) -> Result<PoolKey> {
    let config = pool.get("config").and_then(Value::as_object);
    let config_field = |name: &str| config.and_then(|c| c.get(name));

    Ok(PoolKey {
        pool_id: pool.str_field("workerPoolId").to_string(),
        provider_id: pool.str_field("providerId").to_string(),
        capacity: int_field(pool, "currentCapacity", 0)?,
        min_capacity: optional_int(config_field("minCapacity"), "config.minCapacity")?,
        max_capacity: optional_int(config_field("maxCapacity"), "config.maxCapacity")?,
        owner: pool.str_field("owner").to_string(),
        launch_configs: config_field("launchConfigs")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
    })
}

fn opt_text(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Text summary of worker pools, one line per distinct pool.
pub fn worker_pool_summary(pools: &[Record]) -> Result<String> {
    let keys = pools
        .iter()
        .map(pool_key)
        .collect::<Result<BTreeSet<PoolKey>>>()?;

    let mut table = TextTable::new(&[
        ("Pool ID", Align::Left),
        ("Provider ID", Align::Left),
        ("Capacity", Align::Right),
        ("Min Cap", Align::Right),
        ("Max Cap", Align::Right),
        ("Owner", Align::Left),
        ("Launch Configs", Align::Right),
    ]);
    for key in &keys {
        table.push(vec![
            key.pool_id.clone(),
            key.provider_id.clone(),
            key.capacity.to_string(),
            opt_text(key.min_capacity),
            opt_text(key.max_capacity),
            key.owner.clone(),
            key.launch_configs.to_string(),
        ]);
    }

    let mut output = Vec::new();
    table.render_with(&table.widths(), &mut output);
    output.extend([String::new(), String::new()]);
    output.push(format!("Worker Pools: {}", pools.len()));

    Ok(output.join("\n"))
}
