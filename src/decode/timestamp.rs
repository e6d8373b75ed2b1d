use chrono::{DateTime, Utc};
use serde_json::Value;

/// Values above this are epoch milliseconds, anything else is epoch seconds.
const MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

/// Render an epoch timestamp (number or numeric string) as `YYYY-MM-DD` in UTC.
/// Returns `None` when the value cannot be read as a non-zero epoch; the caller
/// keeps the raw value in that case.
pub fn epoch_to_date(raw: &Value) -> Option<String> {
    let epoch = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !epoch.is_finite() || epoch == 0.0 {
        return None;
    }

    let millis = if epoch.abs() > MILLIS_THRESHOLD {
        epoch
    } else {
        epoch * 1000.0
    };
    if millis.abs() > i64::MAX as f64 {
        return None;
    }

    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(millis.floor() as i64)?;
    Some(dt.format("%Y-%m-%d").to_string())
}
