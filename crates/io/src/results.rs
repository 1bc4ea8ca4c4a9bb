// Column layout shared by the CSV and XLSX result writers

use estab_matcher::{MatchReport, ResultRow, Value};

/// Fixed result columns, before the copied source columns.
pub const RESULT_COLUMNS: [&str; 11] = [
    "source_row_index",
    "enterprise_number",
    "source_address",
    "best_match_address",
    "best_match_address_column",
    "dice_score",
    "establishment_unit_number",
    "success",
    "confidence",
    "error_kind",
    "error",
];

/// Prefix for copied source columns, so a source column named `success`
/// cannot collide with a result column.
pub const SOURCE_PREFIX: &str = "source_";

/// Header row: the fixed columns, then one `source_<name>` per copied column.
/// Copied columns come from the report meta, so an empty run keeps them.
pub fn header(report: &MatchReport) -> Vec<String> {
    RESULT_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(
            report
                .meta
                .copy_columns
                .iter()
                .map(|column| format!("{SOURCE_PREFIX}{column}")),
        )
        .collect()
}

/// Cells of one result row, aligned with [`header`].
pub fn cells(row: &ResultRow) -> Vec<Value> {
    let text = |s: &Option<String>| s.as_deref().map(Value::from).unwrap_or_default();

    let mut cells = vec![
        Value::Number(row.source_row_index as f64),
        text(&row.enterprise_number),
        text(&row.source_address),
        text(&row.best_match_address),
        text(&row.best_match_address_column),
        Value::Number(row.dice_score),
        text(&row.establishment_unit_number),
        Value::Bool(row.success),
        row.confidence
            .map(|c| Value::from(c.to_string()))
            .unwrap_or_default(),
        row.error_kind
            .map(|k| Value::from(k.to_string()))
            .unwrap_or_default(),
        text(&row.error),
    ];
    cells.extend(row.source_fields.iter().map(|(_, value)| value.clone()));
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use estab_matcher::model::{Confidence, MatchFailure};
    use estab_matcher::{run, Dataset, MatchConfig};

    fn row(success: bool) -> ResultRow {
        ResultRow {
            source_row_index: 4,
            enterprise_number: Some("123456789".into()),
            source_address: Some("Meir 1".into()),
            best_match_address: success.then(|| "Meir 1".to_string()),
            best_match_address_column: success.then(|| "Adress NL".to_string()),
            dice_score: if success { 1.0 } else { 0.0 },
            establishment_unit_number: success.then(|| "EST9".to_string()),
            success,
            confidence: success.then_some(Confidence::High),
            error_kind: (!success).then_some(MatchFailure::NoCandidates),
            error: (!success).then(|| "No KBO data found for enterprise number: 123456789".into()),
            source_fields: vec![("company_name".into(), Value::from("Company D"))],
        }
    }

    #[test]
    fn cells_align_with_header() {
        let cells = cells(&row(true));
        assert_eq!(cells.len(), RESULT_COLUMNS.len() + 1);
        assert_eq!(cells[0], Value::Number(4.0));
        assert_eq!(cells[5], Value::Number(1.0));
        assert_eq!(cells[7], Value::Bool(true));
        assert_eq!(cells[8], Value::from("high"));
        assert_eq!(cells[9], Value::Empty);
        assert_eq!(cells[11], Value::from("Company D"));
    }

    #[test]
    fn header_lists_copied_columns_without_rows() {
        let config = MatchConfig::from_toml(
            r#"
[source]
file = "s.csv"
copy_columns = ["company_name", "contact_person"]

[registry]
file = "k.csv"
"#,
        )
        .unwrap();
        let source = Dataset::new(
            "source",
            vec![
                "Enterprise Number".into(),
                "Address".into(),
                "company_name".into(),
                "contact_person".into(),
            ],
        );
        let registry = Dataset::from_strings(
            "kbo",
            &["EnterpriseNumber", "Adress NL", "Adress FR", "EntityNumber"],
            &[&["1", "Meir 1", "", "EST1"]],
        );
        let report = run(&config, &source, &registry).unwrap();

        let header = header(&report);
        assert_eq!(header.len(), RESULT_COLUMNS.len() + 2);
        assert_eq!(header[RESULT_COLUMNS.len()..], ["source_company_name", "source_contact_person"]);
    }

    #[test]
    fn failure_cells() {
        let cells = cells(&row(false));
        assert_eq!(cells[3], Value::Empty);
        assert_eq!(cells[8], Value::Empty);
        assert_eq!(cells[9], Value::from("no_candidates"));
    }
}
