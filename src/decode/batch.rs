// src/decode/batch.rs

use serde_json::Value;
use tracing::{info, instrument};

use super::dictionary::Dictionaries;
use super::locate::{row_nodes, row_set, RowNode};
use super::row::{decode_row, DecodedRow};
use super::DecodeError;
use crate::output::record::{project, ProductionRecord};

const PROGRESS_EVERY: usize = 50;

/// Records decoded from one response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBatch {
    pub timestamp: String,
    pub records: Vec<ProductionRecord>,
    pub rows_decoded: usize,
    pub rows_rejected: usize,
}

/// Sequential row decoder holding the one-row lookback register.
///
/// The register always holds the last *decoded* row, including rows the
/// projector rejected, because the next row's repeat bits refer to it.
pub struct BatchDecoder<'d> {
    dictionaries: &'d Dictionaries,
    timestamp: String,
    previous: Option<DecodedRow>,
    batch: DecodedBatch,
}

impl<'d> BatchDecoder<'d> {
    pub fn new(dictionaries: &'d Dictionaries, timestamp: impl Into<String>) -> Self {
        let timestamp = timestamp.into();
        BatchDecoder {
            dictionaries,
            previous: None,
            batch: DecodedBatch {
                timestamp: timestamp.clone(),
                ..Default::default()
            },
            timestamp,
        }
    }

    /// Decode the next row node in order and keep its record if it has a date.
    pub fn push(&mut self, node: &RowNode<'_>) {
        let row = decode_row(node, self.previous.as_ref(), self.dictionaries);
        match project(&row, &self.timestamp) {
            Some(record) => self.batch.records.push(record),
            None => self.batch.rows_rejected += 1,
        }
        self.previous = Some(row);
        self.batch.rows_decoded += 1;

        if self.batch.rows_decoded % PROGRESS_EVERY == 0 {
            info!(rows = self.batch.rows_decoded, "decoded rows");
        }
    }

    pub fn finish(self) -> DecodedBatch {
        self.batch
    }
}

/// Decode row nodes in the given order.
pub fn decode_rows<'a, I>(nodes: I, dictionaries: &Dictionaries, timestamp: &str) -> DecodedBatch
where
    I: IntoIterator<Item = RowNode<'a>>,
{
    let mut decoder = BatchDecoder::new(dictionaries, timestamp);
    for node in nodes {
        decoder.push(&node);
    }
    decoder.finish()
}

/// Decode a full query response: locate the row set, build dictionaries from
/// its `ValueDicts`, and decode every row node of the tree in document order.
#[instrument(level = "info", skip(response))]
pub fn decode_response(response: &Value) -> Result<DecodedBatch, DecodeError> {
    let set = row_set(response)?;
    let dictionaries = Dictionaries::from_row_set(set.containers);
    let batch = decode_rows(row_nodes(response), &dictionaries, &set.timestamp_text());

    info!(
        rows = batch.rows_decoded,
        records = batch.records.len(),
        rejected = batch.rows_rejected,
        "decoded response"
    );
    Ok(batch)
}
