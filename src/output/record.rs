// src/output/record.rs

use serde::Serialize;
use serde_json::Value;

use crate::decode::{Cell, DecodedRow};

/// CSV header, in column order.
pub const HEADER: [&str; 15] = [
    "scrape_datetime",
    "date",
    "installation",
    "oil_production",
    "gas_production",
    "oil_equivalents_boe",
    "operator",
    "type",
    "estado",
    "city",
    "atendimento_campo",
    "campo",
    "quantity",
    "code",
    "status",
];

/// One exported production line. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionRecord {
    pub scrape_datetime: String,
    pub date: String,
    pub installation: String,
    pub oil_production: String,
    pub gas_production: String,
    pub oil_equivalents_boe: String,
    pub operator: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub estado: String,
    pub city: String,
    pub atendimento_campo: String,
    pub campo: String,
    pub quantity: String,
    pub code: String,
    pub status: String,
}

/// Project a decoded row onto the export schema. Rows without a date are dropped.
///
/// Descriptive fields render falsy cells (null, `""`, `0`, `false`) as empty;
/// measures, `code` and `status` are empty only when null so a zero survives.
pub fn project(row: &DecodedRow, timestamp: &str) -> Option<ProductionRecord> {
    let record = ProductionRecord {
        scrape_datetime: timestamp.to_string(),
        date: text(&row.date),
        installation: text(&row.installation),
        oil_production: measure(&row.oil_production),
        gas_production: measure(&row.gas_production),
        oil_equivalents_boe: measure(&row.oil_equivalents_boe),
        operator: text(&row.operator),
        kind: text(&row.kind),
        estado: text(&row.estado),
        city: text(&row.city),
        atendimento_campo: text(&row.atendimento_campo),
        campo: text(&row.campo),
        quantity: measure(&row.quantity),
        code: measure(&row.code),
        status: measure(&row.status),
    };

    if record.date.is_empty() {
        None
    } else {
        Some(record)
    }
}

fn text(cell: &Cell) -> String {
    match cell {
        Some(value) if !is_falsy(value) => render(value),
        _ => String::new(),
    }
}

fn measure(cell: &Cell) -> String {
    cell.as_ref().map(render).unwrap_or_default()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Strings verbatim, everything else in its JSON text form.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> DecodedRow {
        DecodedRow {
            date: Some(json!("2025-03-14")),
            installation: Some(json!("Platform-B")),
            operator: Some(json!("PETROBRAS")),
            kind: Some(json!("FPSO")),
            active: Some(json!("S")),
            code: Some(json!(0)),
            oil_production: Some(json!(0)),
            gas_production: Some(json!(12.5)),
            oil_equivalents_boe: Some(json!(1600)),
            ..Default::default()
        }
    }

    #[test]
    fn test_projection_fields() {
        let record = project(&row(), "2025-03-14T12:00:00Z").unwrap();
        assert_eq!(record.scrape_datetime, "2025-03-14T12:00:00Z");
        assert_eq!(record.date, "2025-03-14");
        assert_eq!(record.installation, "Platform-B");
        assert_eq!(record.kind, "FPSO");
        assert_eq!(record.gas_production, "12.5");
        assert_eq!(record.oil_equivalents_boe, "1600");
        assert_eq!(record.estado, "");
        assert_eq!(record.quantity, "");
        assert_eq!(record.status, "");
    }

    #[test]
    fn test_numeric_zero_is_kept_for_measures() {
        let record = project(&row(), "").unwrap();
        assert_eq!(record.oil_production, "0");
        assert_eq!(record.code, "0");

        let mut zero_city = row();
        zero_city.city = Some(json!(0));
        assert_eq!(project(&zero_city, "").unwrap().city, "");
    }

    #[test]
    fn test_rows_without_date_are_rejected() {
        let mut no_date = row();
        no_date.date = None;
        assert_eq!(project(&no_date, "ts"), None);

        no_date.date = Some(json!(""));
        assert_eq!(project(&no_date, "ts"), None);
    }
}
