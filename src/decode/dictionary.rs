// src/decode/dictionary.rs

use serde_json::Value;
use tracing::{debug, trace};

/// Number of `ValueDicts` tables (`D0..D9`) backing the dictionary slots `G1..G10`.
pub const DICTIONARY_COUNT: usize = 10;

/// Lookup tables, ordinal index → display value, built once per decode run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionaries {
    tables: [Vec<Value>; DICTIONARY_COUNT],
}

impl Dictionaries {
    /// Read `D0..D9` out of a `ValueDicts` object. Missing or non-array tables
    /// become empty tables.
    pub fn from_value_dicts(value_dicts: Option<&Value>) -> Self {
        let tables = std::array::from_fn(|i| {
            let name = format!("D{}", i);
            match value_dicts.and_then(|d| d.get(&name)) {
                Some(Value::Array(values)) => values.clone(),
                Some(other) => {
                    debug!(table = %name, kind = ?other, "ignoring non-array value dictionary");
                    Vec::new()
                }
                None => Vec::new(),
            }
        });
        Self { tables }
    }

    /// Dictionaries of the first `DS` entry that carries `ValueDicts`.
    pub fn from_row_set(containers: &[Value]) -> Self {
        let value_dicts = containers.iter().find_map(|ds| ds.get("ValueDicts"));
        Self::from_value_dicts(value_dicts)
    }

    /// Resolve a raw entry against table `table`. Integer-like entries map to the
    /// table value, or to `Index_{k}_OutOfRange` when `k` is not a valid ordinal.
    /// Anything else is passed through unchanged.
    pub fn lookup(&self, table: usize, raw: &Value) -> Value {
        let Some(ordinal) = Ordinal::from_raw(raw) else {
            trace!(table, raw = %raw, "non-integer dictionary entry passed through");
            return raw.clone();
        };
        let values = self.tables.get(table).map(Vec::as_slice).unwrap_or(&[]);
        match ordinal {
            Ordinal::At(i) if i < values.len() => values[i].clone(),
            Ordinal::At(i) => out_of_range(table, &i.to_string(), values.len()),
            Ordinal::Beyond(k) => out_of_range(table, &k, values.len()),
        }
    }
}

fn out_of_range(table: usize, index: &str, len: usize) -> Value {
    trace!(table, index, len, "dictionary index out of range");
    Value::String(format!("Index_{}_OutOfRange", index))
}

/// An integer-like dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Ordinal {
    At(usize),
    /// Negative or too large for `usize`, kept as its decimal text.
    Beyond(String),
}

impl Ordinal {
    /// Integers, floats (truncated), booleans (0/1) and plain digit strings are
    /// ordinals; anything else is not.
    fn from_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Bool(b) => Some(Ordinal::At(usize::from(*b))),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    return Some(
                        usize::try_from(u)
                            .map(Ordinal::At)
                            .unwrap_or_else(|_| Ordinal::Beyond(u.to_string())),
                    );
                }
                if let Some(i) = n.as_i64() {
                    return Some(Ordinal::Beyond(i.to_string()));
                }
                let f = n.as_f64().filter(|f| f.is_finite())?.trunc();
                if f >= 0.0 && f < usize::MAX as f64 {
                    Some(Ordinal::At(f as usize))
                } else {
                    Some(Ordinal::Beyond(format!("{:.0}", f)))
                }
            }
            Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                Some(s.parse::<usize>().map(Ordinal::At).unwrap_or_else(|_| {
                    let digits = s.trim_start_matches('0');
                    Ordinal::Beyond(digits.to_string())
                }))
            }
            _ => None,
        }
    }
}
