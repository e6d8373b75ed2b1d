// src/config.rs

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::{env, path::PathBuf};
use url::Url;

use crate::fetch::{DateRange, DEFAULT_ENDPOINT};

pub const DEFAULT_OUTPUT: &str = "production.csv";
pub const DEFAULT_DEBUG_RESPONSE: &str = "debug_response.json";

const USAGE: &str =
    "usage: anpscraper [OUTPUT.csv] [--historical] [--input RESPONSE.json] [--debug-response PATH]";

/// Run configuration, from command-line arguments and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CSV destination.
    pub output: PathBuf,
    /// Query from `fetch::historical_start()` instead of the last 14 days.
    pub historical: bool,
    /// Decode a saved response instead of querying the API.
    pub input: Option<PathBuf>,
    /// Where the raw API response is saved (`ANP_DEBUG_RESPONSE`).
    pub debug_response: PathBuf,
    /// Query endpoint (`ANP_ENDPOINT`).
    pub endpoint: Url,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_args(env::args().skip(1), |key| env::var(key).ok())
    }

    /// `var` looks up environment variables; flags win over the environment.
    pub fn from_args<I, F>(args: I, var: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_str = var("ANP_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint_str)
            .with_context(|| format!("parsing endpoint URL {}", endpoint_str))?;

        let mut config = Config {
            output: PathBuf::from(DEFAULT_OUTPUT),
            historical: false,
            input: None,
            debug_response: var("ANP_DEBUG_RESPONSE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEBUG_RESPONSE)),
            endpoint,
        };

        let mut output_seen = false;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--historical" => config.historical = true,
                "--input" => {
                    let path = args.next().ok_or_else(|| anyhow!("--input needs a path; {}", USAGE))?;
                    config.input = Some(PathBuf::from(path));
                }
                "--debug-response" => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow!("--debug-response needs a path; {}", USAGE))?;
                    config.debug_response = PathBuf::from(path);
                }
                flag if flag.starts_with("--") => {
                    return Err(anyhow!("unknown flag {}; {}", flag, USAGE));
                }
                path if !output_seen => {
                    config.output = PathBuf::from(path);
                    output_seen = true;
                }
                extra => return Err(anyhow!("unexpected argument {}; {}", extra, USAGE)),
            }
        }

        Ok(config)
    }

    pub fn date_range(&self, today: NaiveDate) -> DateRange {
        if self.historical {
            DateRange::historical(today)
        } else {
            DateRange::recent(today)
        }
    }
}
