// src/decode/locate.rs

use serde_json::{Map, Value};
use tracing::warn;

use super::column::Column;
use super::DecodeError;

const VALUES_KEY: &str = "C";
const REPEAT_MASK_KEY: &str = "R";
const NULL_MASK_KEY: &str = "Ø";

/// The `DS` row-set containers of a query response plus its run timestamp.
#[derive(Debug, Clone, Copy)]
pub struct RowSet<'a> {
    pub containers: &'a [Value],
    pub timestamp: &'a Value,
}

impl RowSet<'_> {
    /// Run timestamp as text: strings verbatim, other scalars in JSON form, empty when absent.
    pub fn timestamp_text(&self) -> String {
        match self.timestamp {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Find `results[0].result.data` and its `dsr.DS` list.
pub fn row_set(response: &Value) -> Result<RowSet<'_>, DecodeError> {
    let first = response
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .ok_or_else(|| DecodeError::MalformedResponse {
            detail: "no results found".into(),
        })?;

    let data = first.pointer("/result/data").unwrap_or(&Value::Null);
    let containers = data
        .pointer("/dsr/DS")
        .and_then(Value::as_array)
        .filter(|ds| !ds.is_empty())
        .ok_or_else(|| DecodeError::MalformedResponse {
            detail: "no DS row set found; was the report session established?".into(),
        })?;

    Ok(RowSet {
        containers,
        timestamp: data.get("timestamp").unwrap_or(&Value::Null),
    })
}

/// Repeat and null masks of one row. Only the low 16 bits are read and bit 15
/// has no column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Masks {
    pub repeat: u16,
    pub null: u16,
}

impl Masks {
    /// Bit `slot` of the mask, least significant bit first.
    fn bit(mask: u16, column: Column) -> bool {
        (mask >> column.slot()) & 1 == 1
    }

    pub fn repeats(&self, column: Column) -> bool {
        Self::bit(self.repeat, column)
    }

    pub fn is_null(&self, column: Column) -> bool {
        Self::bit(self.null, column)
    }
}

/// A row node: its sparse values and masks. Borrowed from the response tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowNode<'a> {
    pub values: &'a [Value],
    pub masks: Masks,
}

impl<'a> RowNode<'a> {
    /// A mapping with a `C` array and a non-null `R` or `Ø`. Mappings with `C` but
    /// neither mask are aggregate rows and yield `None`.
    pub fn from_map(map: &'a Map<String, Value>) -> Option<Self> {
        let values = map.get(VALUES_KEY)?.as_array()?;
        let repeat = map.get(REPEAT_MASK_KEY).filter(|v| !v.is_null());
        let null = map.get(NULL_MASK_KEY).filter(|v| !v.is_null());
        if repeat.is_none() && null.is_none() {
            return None;
        }
        Some(RowNode {
            values,
            masks: Masks {
                repeat: repeat.map_or(0, |v| mask_bits(REPEAT_MASK_KEY, v)),
                null: null.map_or(0, |v| mask_bits(NULL_MASK_KEY, v)),
            },
        })
    }
}

fn mask_bits(key: &str, value: &Value) -> u16 {
    match value.as_u64() {
        Some(bits) => (bits & 0xFFFF) as u16,
        None => {
            warn!(mask = key, value = %value, "unreadable mask treated as 0");
            0
        }
    }
}

/// Depth-first, document-order walk over a response tree yielding row nodes.
/// The walk is lazy; clone it or call `row_nodes` again to restart.
#[derive(Debug, Clone)]
pub struct RowNodes<'a> {
    stack: Vec<&'a Value>,
}

pub fn row_nodes(tree: &Value) -> RowNodes<'_> {
    RowNodes { stack: vec![tree] }
}

impl<'a> Iterator for RowNodes<'a> {
    type Item = RowNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Value::Object(map) => {
                    self.stack.extend(map.values().rev());
                    if let Some(row) = RowNode::from_map(map) {
                        return Some(row);
                    }
                }
                Value::Array(items) => self.stack.extend(items.iter().rev()),
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_in_document_order_at_any_depth() {
        let tree = json!({
            "PH": [
                { "DM0": [
                    { "C": [1], "R": 0 },
                    { "nested": { "C": [2], "Ø": 4 } },
                ]},
                { "DM1": [ { "C": [3], "R": 2, "Ø": 1 } ] },
            ]
        });
        let rows: Vec<_> = row_nodes(&tree).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].values, &[json!(1)][..]);
        assert_eq!(rows[1].values, &[json!(2)][..]);
        assert_eq!(rows[1].masks, Masks { repeat: 0, null: 4 });
        assert_eq!(rows[2].masks, Masks { repeat: 2, null: 1 });
    }

    #[test]
    fn test_aggregate_rows_are_skipped() {
        let tree = json!([
            { "C": [9, 9, 9] },
            { "C": [1], "R": null },
            { "C": [2], "R": 0 },
            { "C": "not a list", "R": 1 },
        ]);
        let rows: Vec<_> = row_nodes(&tree).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values, &[json!(2)][..]);
    }

    #[test]
    fn test_walk_is_restartable() {
        let tree = json!({ "a": [{ "C": [], "R": 1 }, { "C": [], "Ø": 1 }] });
        let walk = row_nodes(&tree);
        assert_eq!(walk.clone().count(), 2);
        assert_eq!(walk.count(), 2);
    }

    #[test]
    fn test_mask_bits_low_sixteen_only() {
        let tree = json!({ "C": [], "R": 0x1_8001u64, "Ø": -3 });
        let row = row_nodes(&tree).next().unwrap();
        assert_eq!(row.masks.repeat, 0x8001);
        assert_eq!(row.masks.null, 0);
        assert!(row.masks.repeats(Column::Date));
        assert!(!row.masks.repeats(Column::OilEquivalentsBoe));
    }

    #[test]
    fn test_row_set_envelope() {
        let response = json!({
            "results": [{ "result": { "data": {
                "timestamp": "2025-03-14T12:00:00Z",
                "dsr": { "DS": [{ "PH": [] }] }
            }}}]
        });
        let set = row_set(&response).unwrap();
        assert_eq!(set.containers.len(), 1);
        assert_eq!(set.timestamp_text(), "2025-03-14T12:00:00Z");
    }

    #[test]
    fn test_missing_row_set_is_malformed() {
        for response in [
            json!({}),
            json!({ "results": [] }),
            json!({ "results": [{ "result": { "data": { "dsr": {} } } }] }),
            json!({ "results": [{ "result": { "data": { "dsr": { "DS": [] } } } }] }),
        ] {
            assert!(matches!(
                row_set(&response),
                Err(DecodeError::MalformedResponse { .. })
            ));
        }
    }
}
