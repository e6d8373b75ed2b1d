// src/fetch/query.rs

use serde_json::{json, Value};

use super::DateRange;

const DATASET_ID: &str = "5dd23708-9095-4e35-b585-d1039d481990";
const REPORT_ID: &str = "0f6fa041-4098-458c-a4ac-1603e4eebbd2";
const VISUAL_ID: &str = "7b566eb945004bec1197";
const MODEL_ID: u64 = 3418545;
const WINDOW_ROWS: u64 = 50000;

fn source(name: &str) -> Value {
    json!({ "SourceRef": { "Source": name } })
}

fn column(src: &str, property: &str) -> Value {
    json!({ "Column": { "Expression": source(src), "Property": property } })
}

fn measure(src: &str, property: &str) -> Value {
    json!({ "Measure": { "Expression": source(src), "Property": property } })
}

fn named(mut expr: Value, name: &str) -> Value {
    expr["Name"] = json!(name);
    expr
}

fn datetime_literal(date: chrono::NaiveDate) -> Value {
    json!({ "Literal": { "Value": format!("datetime'{}T00:00:00'", date.format("%Y-%m-%d")) } })
}

/// Installation columns used both as selections and as filter targets.
const INSTALLATION_COLUMNS: [&str; 10] = [
    "Instalação",
    "Operadora",
    "Tipo",
    "Estado",
    "Cidade",
    "Atendimento Campo",
    "Campo",
    "IND_ATIVO",
    "Silga",
    "Situação",
];

/// Selections, in the projection order the response uses for `G0..G10, M0..M3`.
fn select() -> Vec<Value> {
    let v = |p: &str| named(column("v", p), &format!("v_instalacoes_final.{}", p));
    vec![
        named(column("d", "Data"), "Datas.Data"),
        v("Instalação"),
        v("Operadora"),
        v("Tipo"),
        named(measure("m", "Petróleo"), "Medidas.Petroleo"),
        named(measure("m", "Gás Mm3"), "Medidas.Gás"),
        v("Estado"),
        v("Cidade"),
        v("Atendimento Campo"),
        v("Campo"),
        v("IND_ATIVO"),
        json!({
            "Aggregation": { "Expression": column("v", "qtde_pms"), "Function": 0 },
            "Name": "Sum(v_instalacoes_final.qtde_pms)"
        }),
        v("Silga"),
        v("Situação"),
        named(
            measure("m", "Petróleo Equivalente boe"),
            "Medidas.Petroleo Equivalente boe",
        ),
    ]
}

fn filters(range: DateRange) -> Vec<Value> {
    let mut targets = vec![column("d", "Data")];
    targets.extend(INSTALLATION_COLUMNS.iter().map(|p| column("v", p)));

    let date = || column("d", "Data");
    vec![
        json!({
            "Condition": { "Not": { "Expression": { "Comparison": {
                "ComparisonKind": 0,
                "Left": measure("m", "Petróleo Equivalente boe"),
                "Right": { "Literal": { "Value": "null" } }
            }}}},
            "Target": targets
        }),
        json!({
            "Condition": { "In": {
                "Expressions": [column("c", "Unidade")],
                "Values": [[{ "Literal": { "Value": "'bbl'" } }]]
            }}
        }),
        json!({
            "Condition": { "And": {
                "Left": { "Comparison": {
                    "ComparisonKind": 2,
                    "Left": date(),
                    "Right": datetime_literal(range.start)
                }},
                "Right": { "Comparison": {
                    "ComparisonKind": 3,
                    "Left": date(),
                    "Right": datetime_literal(range.end)
                }}
            }}
        }),
    ]
}

/// Build the `querydata` request body for the production-by-installation table
/// over `range` (both ends inclusive), newest dates first.
pub fn build_query(range: DateRange) -> Value {
    let projections: Vec<usize> = (0..crate::decode::SLOT_COUNT).collect();
    json!({
        "version": "1.0.0",
        "queries": [{
            "Query": { "Commands": [{ "SemanticQueryDataShapeCommand": {
                "Query": {
                    "Version": 2,
                    "From": [
                        { "Name": "d", "Entity": "Datas", "Type": 0 },
                        { "Name": "v", "Entity": "v_instalacoes_final", "Type": 0 },
                        { "Name": "m", "Entity": "Medidas", "Type": 0 },
                        { "Name": "c", "Entity": "Correção", "Type": 0 }
                    ],
                    "Select": select(),
                    "Where": filters(range),
                    "OrderBy": [{ "Direction": 2, "Expression": column("d", "Data") }]
                },
                "Binding": {
                    "Primary": { "Groupings": [{ "Projections": projections, "Subtotal": 1 }] },
                    "DataReduction": {
                        "DataVolume": 3,
                        "Primary": { "Window": { "Count": WINDOW_ROWS } }
                    },
                    "Version": 1
                },
                "ExecutionMetricsKind": 1
            }}]},
            "CacheKey": "",
            "QueryId": "",
            "ApplicationContext": {
                "DatasetId": DATASET_ID,
                "Sources": [{ "ReportId": REPORT_ID, "VisualId": VISUAL_ID }]
            }
        }],
        "cancelQueries": [],
        "modelId": MODEL_ID
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        }
    }

    #[test]
    fn test_select_matches_slot_count() {
        let body = build_query(range());
        let command = &body["queries"][0]["Query"]["Commands"][0]["SemanticQueryDataShapeCommand"];
        let select = command["Query"]["Select"].as_array().unwrap();
        assert_eq!(select.len(), crate::decode::SLOT_COUNT);
        assert_eq!(select[0]["Name"], "Datas.Data");
        assert_eq!(select[12]["Name"], "v_instalacoes_final.Silga");

        let projections = command["Binding"]["Primary"]["Groupings"][0]["Projections"]
            .as_array()
            .unwrap();
        assert_eq!(projections.len(), 15);
        assert_eq!(projections[14], 14);
    }

    #[test]
    fn test_date_window_literals() {
        let body = build_query(range());
        let text = body.to_string();
        assert!(text.contains("datetime'2025-03-01T00:00:00'"));
        assert!(text.contains("datetime'2025-03-14T00:00:00'"));
        assert!(text.contains("'bbl'"));
    }
}
