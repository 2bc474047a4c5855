//! Collapses nested API objects into single-level rows with `_`-joined keys.

use crate::domain::model::FlatRow;
use crate::utils::error::{Result, StatsError};
use serde_json::{Map, Value};

/// Flattens `config` into one level.
///
/// Nested objects contribute `key_inner` entries. Arrays are copied as-is
/// unless `suffix` is set, in which case each element is expanded under
/// `key_<index>`. Every resulting key is prefixed with `prefix_` when a
/// prefix is given.
pub fn flatten_config(config: &Map<String, Value>, prefix: &str, suffix: bool) -> Result<FlatRow> {
    let pre = if prefix.is_empty() {
        String::new()
    } else {
        format!("{}_", prefix)
    };
    let mut ret = FlatRow::new();

    for (key, val) in config {
        match val {
            Value::Object(nested) => {
                for (nkey, nval) in flatten_config(nested, key, suffix)? {
                    insert_unique(&mut ret, format!("{}{}", pre, nkey), nval)?;
                }
            }
            Value::Array(items) if suffix => {
                for (pos, item) in items.iter().enumerate() {
                    let subkey = format!("{}_{}", key, pos);
                    match item {
                        Value::Object(nested) => {
                            for (nkey, nval) in flatten_config(nested, &subkey, suffix)? {
                                insert_unique(&mut ret, format!("{}{}", pre, nkey), nval)?;
                            }
                        }
                        scalar => {
                            insert_unique(&mut ret, format!("{}{}", pre, subkey), scalar.clone())?;
                        }
                    }
                }
            }
            other => insert_unique(&mut ret, format!("{}{}", pre, key), other.clone())?,
        }
    }

    Ok(ret)
}

/// Adds every entry of `extra` to `row`, failing on the first shared key.
pub fn merge_unique(row: &mut FlatRow, extra: FlatRow) -> Result<()> {
    for (key, value) in extra {
        insert_unique(row, key, value)?;
    }
    Ok(())
}

fn insert_unique(row: &mut FlatRow, key: String, value: Value) -> Result<()> {
    if row.contains_key(&key) {
        return Err(StatsError::DuplicateFlattenedKey { key });
    }
    row.insert(key, value);
    Ok(())
}
