// src/decode/row.rs

use serde_json::Value;

use super::column::{Column, SlotPolicy};
use super::dictionary::Dictionaries;
use super::locate::RowNode;
use super::timestamp::epoch_to_date;

/// A resolved slot value; `None` is a null cell.
pub type Cell = Option<Value>;

/// One fully decoded row, one field per column slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRow {
    pub date: Cell,
    pub installation: Cell,
    pub operator: Cell,
    pub kind: Cell,
    pub estado: Cell,
    pub city: Cell,
    pub atendimento_campo: Cell,
    pub campo: Cell,
    pub active: Cell,
    pub code: Cell,
    pub status: Cell,
    pub oil_production: Cell,
    pub gas_production: Cell,
    pub quantity: Cell,
    pub oil_equivalents_boe: Cell,
}

impl DecodedRow {
    pub fn get(&self, column: Column) -> &Cell {
        match column {
            Column::Date => &self.date,
            Column::Installation => &self.installation,
            Column::Operator => &self.operator,
            Column::Kind => &self.kind,
            Column::Estado => &self.estado,
            Column::City => &self.city,
            Column::AtendimentoCampo => &self.atendimento_campo,
            Column::Campo => &self.campo,
            Column::Active => &self.active,
            Column::Code => &self.code,
            Column::Status => &self.status,
            Column::OilProduction => &self.oil_production,
            Column::GasProduction => &self.gas_production,
            Column::Quantity => &self.quantity,
            Column::OilEquivalentsBoe => &self.oil_equivalents_boe,
        }
    }

    pub fn get_mut(&mut self, column: Column) -> &mut Cell {
        match column {
            Column::Date => &mut self.date,
            Column::Installation => &mut self.installation,
            Column::Operator => &mut self.operator,
            Column::Kind => &mut self.kind,
            Column::Estado => &mut self.estado,
            Column::City => &mut self.city,
            Column::AtendimentoCampo => &mut self.atendimento_campo,
            Column::Campo => &mut self.campo,
            Column::Active => &mut self.active,
            Column::Code => &mut self.code,
            Column::Status => &mut self.status,
            Column::OilProduction => &mut self.oil_production,
            Column::GasProduction => &mut self.gas_production,
            Column::Quantity => &mut self.quantity,
            Column::OilEquivalentsBoe => &mut self.oil_equivalents_boe,
        }
    }
}

/// Decode one row node against the previously decoded row.
///
/// Per slot, in bit order:
/// - repeat bit set: copy the previous row's cell (null on the first row), whatever the null bit says;
/// - else null bit set: null;
/// - else: take the next entry of `C`, or null once `C` is exhausted.
///
/// Only the last branch advances the cursor into `C`.
pub fn decode_row(
    node: &RowNode<'_>,
    previous: Option<&DecodedRow>,
    dictionaries: &Dictionaries,
) -> DecodedRow {
    let mut values = node.values.iter();
    let mut row = DecodedRow::default();

    for column in Column::ALL {
        let cell = if node.masks.repeats(column) {
            previous.and_then(|prev| prev.get(column).clone())
        } else if node.masks.is_null(column) {
            None
        } else {
            values
                .next()
                .and_then(|raw| resolve(column, raw, dictionaries))
        };
        *row.get_mut(column) = cell;
    }

    row
}

fn resolve(column: Column, raw: &Value, dictionaries: &Dictionaries) -> Cell {
    if raw.is_null() {
        return None;
    }
    let value = match column.policy() {
        SlotPolicy::Timestamp => epoch_to_date(raw)
            .map(Value::String)
            .unwrap_or_else(|| raw.clone()),
        SlotPolicy::Dictionary(table) => dictionaries.lookup(table, raw),
        SlotPolicy::Passthrough => raw.clone(),
    };
    Some(value)
}
