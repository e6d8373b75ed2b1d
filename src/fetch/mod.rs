// src/fetch/mod.rs

pub mod client;
pub mod query;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::info;

pub use client::{check_api_error, query_data, DEFAULT_ENDPOINT};
pub use query::build_query;

/// First day requested by a historical run.
pub fn historical_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("2025-01-01 is a valid date")
}

/// Number of days covered by a regular run, today included.
pub const RECENT_DAYS: i64 = 14;

/// Inclusive date window of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The last `RECENT_DAYS` days up to and including `today`.
    pub fn recent(today: NaiveDate) -> Self {
        DateRange {
            start: today - Duration::days(RECENT_DAYS - 1),
            end: today,
        }
    }

    /// From `historical_start()` up to `today`.
    pub fn historical(today: NaiveDate) -> Self {
        DateRange {
            start: historical_start(),
            end: today,
        }
    }
}

/// Read a response previously saved by `save_response`.
pub async fn read_response(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading saved response {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parsing saved response {:?}", path))
}

/// Persist the raw response, pretty-printed, for troubleshooting.
pub async fn save_response(path: &Path, response: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(response)?;
    fs::write(path, json)
        .await
        .with_context(|| format!("writing debug response {:?}", path))?;
    Ok(())
}

/// Save the raw response, then fail if the API answered with an `error` member.
/// The saved copy is kept for troubleshooting either way.
pub async fn save_then_check(path: &Path, response: &Value) -> Result<()> {
    save_response(path, response).await?;
    info!("raw response saved to {}", path.display());
    check_api_error(response)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeError;
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_date_ranges() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let recent = DateRange::recent(today);
        assert_eq!(recent.start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(recent.end, today);

        let historical = DateRange::historical(today);
        assert_eq!(historical.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(historical.end, today);
        assert_eq!(historical_start(), historical.start);
    }

    #[tokio::test]
    async fn test_error_response_is_saved_before_failing() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("debug_response.json");
        let response = json!({ "error": { "code": "QueryUserError" } });

        let err = save_then_check(&path, &response).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DecodeError>(),
            Some(DecodeError::UpstreamError { .. })
        ));
        assert_eq!(read_response(&path).await?, response);

        let ok = json!({ "results": [] });
        save_then_check(&path, &ok).await?;
        assert_eq!(read_response(&path).await?, ok);
        Ok(())
    }

    #[tokio::test]
    async fn test_saved_response_keeps_member_order() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("debug_response.json");
        let response = json!({ "z": { "C": [1], "R": 0 }, "a": { "C": [2], "R": 0 } });
        save_response(&path, &response).await?;

        let loaded = read_response(&path).await?;
        assert_eq!(loaded, response);
        let keys: Vec<&String> = loaded.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a"]);
        Ok(())
    }
}
