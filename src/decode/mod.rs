// src/decode/mod.rs
//
// Rebuilds flat rows from the PowerBI "DSR" row encoding: every row node carries
// a sparse value list `C`, a repeat mask `R` and a null mask `Ø`. Bit `i` of a
// mask belongs to column slot `i` (see `column::Column::ALL`).

pub mod batch;
pub mod column;
pub mod dictionary;
pub mod locate;
pub mod row;
pub mod timestamp;

use thiserror::Error;

pub use batch::{decode_response, decode_rows, BatchDecoder, DecodedBatch};
pub use column::{Column, SlotPolicy, SLOT_COUNT};
pub use dictionary::{Dictionaries, DICTIONARY_COUNT};
pub use locate::{row_nodes, row_set, Masks, RowNode, RowNodes, RowSet};
pub use row::{decode_row, Cell, DecodedRow};

/// Structural failures. Bad individual values never surface here; they degrade
/// to null, a passthrough value or a placeholder instead.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The row-set container (`results[0].result.data.dsr.DS`) is missing or empty.
    #[error("malformed response: {detail}")]
    MalformedResponse { detail: String },

    /// The API answered with a top-level `error` member.
    #[error("API error: {detail}")]
    UpstreamError { detail: String },
}
