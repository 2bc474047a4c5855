use crate::domain::model::{CsvViewDefinition, FlatRow};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const COUNT_COLUMN: &str = "launch_config_count";

pub const AMIS_VIEW: CsvViewDefinition = CsvViewDefinition {
    name: "amis",
    description: "Determine unique AMIs",
    columns: &[
        "workerPoolId",
        "providerId",
        "created",
        "lastModified",
        "owner",
        "lc_launchConfig_ImageId",
        "lc_region",
        "lc_disks_0_initializeParams_sourceImage",
    ],
};

impl CsvViewDefinition {
    /// Output columns: the projection plus the count.
    pub fn output_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.to_string())
            .chain(std::iter::once(COUNT_COLUMN.to_string()))
            .collect()
    }
}

/// Grouping tuple. Values order by type first (empty, bool, number, string,
/// nested), then within the type.
#[derive(Debug, Clone)]
struct GroupKey(Vec<Value>);

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(s) if s.is_empty() => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) | Value::Object(_) => 4,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    type_rank(a).cmp(&type_rank(b)).then_with(|| match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let fx = x.as_f64().unwrap_or(f64::NAN);
            let fy = y.as_f64().unwrap_or(f64::NAN);
            fx.total_cmp(&fy).then_with(|| x.to_string().cmp(&y.to_string()))
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => {
            a.to_string().cmp(&b.to_string())
        }
        // Null and "" share a rank and land in the same empty group.
        _ => Ordering::Equal,
    })
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match compare_values(a, b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

/// Counts rows sharing the same values in `view`'s columns, one output row
/// per distinct combination, sorted by those values.
pub fn aggregate(rows: &[FlatRow], view: &CsvViewDefinition) -> Vec<FlatRow> {
    let mut counts: BTreeMap<GroupKey, u64> = BTreeMap::new();

    for row in rows {
        let key = view
            .columns
            .iter()
            .map(|column| match row.get(*column) {
                Some(value) => value.clone(),
                None => Value::String(String::new()),
            })
            .collect();
        *counts.entry(GroupKey(key)).or_insert(0) += 1;
    }

    tracing::debug!(
        "CSV view {} reduced {} rows to {} groups",
        view.name,
        rows.len(),
        counts.len()
    );

    counts
        .into_iter()
        .map(|(GroupKey(values), count)| {
            let mut out: FlatRow = view
                .columns
                .iter()
                .map(|column| column.to_string())
                .zip(values)
                .collect();
            out.insert(COUNT_COLUMN.to_string(), Value::from(count));
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SMALL_VIEW: CsvViewDefinition = CsvViewDefinition {
        name: "small",
        description: "Region and image",
        columns: &["lc_region", "lc_launchConfig_ImageId"],
    };

    fn row(value: Value) -> FlatRow {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_identical_projection_counts_twice() {
        let rows = vec![
            row(json!({"workerPoolId": "a", "lc_region": "us-east-1", "lc_launchConfig_ImageId": "ami-1"})),
            row(json!({"workerPoolId": "b", "lc_region": "us-east-1", "lc_launchConfig_ImageId": "ami-1"})),
        ];
        let out = aggregate(&rows, &SMALL_VIEW);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0][COUNT_COLUMN], json!(2));
        assert_eq!(out[0]["lc_region"], json!("us-east-1"));
        assert!(!out[0].contains_key("workerPoolId"));
    }

    #[test]
    fn test_groups_sorted_and_missing_as_empty() {
        let rows = vec![
            row(json!({"lc_region": "us-west-2", "lc_launchConfig_ImageId": "ami-2"})),
            row(json!({"lc_region": "us-east-1", "lc_launchConfig_ImageId": "ami-9"})),
            row(json!({"lc_launchConfig_ImageId": "ami-3"})),
            row(json!({"lc_region": "us-east-1", "lc_launchConfig_ImageId": "ami-1"})),
        ];
        let out = aggregate(&rows, &SMALL_VIEW);
        let regions: Vec<(&str, &str)> = out
            .iter()
            .map(|r| {
                (
                    r["lc_region"].as_str().unwrap(),
                    r["lc_launchConfig_ImageId"].as_str().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            regions,
            vec![
                ("", "ami-3"),
                ("us-east-1", "ami-1"),
                ("us-east-1", "ami-9"),
                ("us-west-2", "ami-2"),
            ]
        );
    }

    #[test]
    fn test_numbers_sort_numerically() {
        let view = CsvViewDefinition {
            name: "cap",
            description: "capacity",
            columns: &["config_maxCapacity"],
        };
        let rows = vec![
            row(json!({"config_maxCapacity": 100})),
            row(json!({"config_maxCapacity": 9})),
            row(json!({"config_maxCapacity": 9})),
        ];
        let out = aggregate(&rows, &view);
        assert_eq!(out[0]["config_maxCapacity"], json!(9));
        assert_eq!(out[0][COUNT_COLUMN], json!(2));
        assert_eq!(out[1]["config_maxCapacity"], json!(100));
    }

    #[test]
    fn test_mixed_types_group_and_sort() {
        let view = CsvViewDefinition {
            name: "mixed",
            description: "mixed",
            columns: &["value"],
        };
        let values = [json!(9), json!("50"), json!(100), json!(9), json!("50"), json!(100)];
        let rows: Vec<FlatRow> = values
            .iter()
            .map(|value| row(json!({ "value": value })))
            .collect();

        let out = aggregate(&rows, &view);
        let groups: Vec<(Value, Value)> = out
            .iter()
            .map(|r| (r["value"].clone(), r[COUNT_COLUMN].clone()))
            .collect();
        assert_eq!(
            groups,
            vec![
                (json!(9), json!(2)),
                (json!(100), json!(2)),
                (json!("50"), json!(2)),
            ]
        );
    }

    #[test]
    fn test_missing_and_null_share_empty_group() {
        let view = CsvViewDefinition {
            name: "owner",
            description: "owner",
            columns: &["owner"],
        };
        let rows = vec![
            row(json!({"owner": "me@example.com"})),
            row(json!({"owner": null})),
            row(json!({})),
            row(json!({"owner": true})),
        ];
        let out = aggregate(&rows, &view);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0][COUNT_COLUMN], json!(2));
        assert_eq!(out[1]["owner"], json!(true));
        assert_eq!(out[2]["owner"], json!("me@example.com"));
    }

    #[test]
    fn test_amis_output_columns() {
        let columns = AMIS_VIEW.output_columns();
        assert_eq!(columns.len(), 9);
        assert_eq!(columns[0], "workerPoolId");
        assert_eq!(columns.last().unwrap(), COUNT_COLUMN);
    }
}
