// src/fetch/client.rs

use anyhow::{Context, Result};
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT},
    Client,
};
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use super::{query::build_query, DateRange};
use crate::decode::DecodeError;

pub const DEFAULT_ENDPOINT: &str =
    "https://wabi-brazil-south-api.analysis.windows.net/public/reports/querydata";

const RESOURCE_KEY: &str = "f446236f-7676-436d-b414-c98ef4db8849";

/// POST the production query for `range` and return the parsed response tree.
/// A single round trip: transport errors and non-success status are fatal. An
/// API-level `error` member is left in the tree for `check_api_error`, so the
/// caller can save the response first.
#[instrument(level = "info", skip(client, endpoint), fields(endpoint = %endpoint))]
pub async fn query_data(client: &Client, endpoint: &Url, range: DateRange) -> Result<Value> {
    let body = build_query(range);
    debug!(start = %range.start, end = %range.end, "sending query");

    let response: Value = client
        .post(endpoint.clone())
        .query(&[("synchronous", "true")])
        .header(ACCEPT, "application/json, text/plain, */*")
        .header(CONTENT_TYPE, "application/json;charset=UTF-8")
        .header(ORIGIN, "https://app.powerbi.com")
        .header(REFERER, "https://app.powerbi.com/")
        .header(USER_AGENT, "Mozilla/5.0")
        .header("X-PowerBI-ResourceKey", RESOURCE_KEY)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("POST {} failed", endpoint))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", endpoint))?
        .json()
        .await
        .with_context(|| format!("Reading JSON from {}", endpoint))?;

    info!("query answered");
    Ok(response)
}

/// Surface a top-level `error` member of a response.
pub fn check_api_error(response: &Value) -> Result<(), DecodeError> {
    match response.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(error) => Err(DecodeError::UpstreamError {
            detail: error.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_member() {
        assert!(check_api_error(&json!({ "results": [] })).is_ok());
        assert!(check_api_error(&json!({ "error": null })).is_ok());

        let err = check_api_error(&json!({ "error": { "code": "QueryUserError" } })).unwrap_err();
        assert!(matches!(err, DecodeError::UpstreamError { .. }));
        assert!(err.to_string().contains("QueryUserError"));
    }
}
