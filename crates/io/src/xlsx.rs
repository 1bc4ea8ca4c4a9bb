// Excel: dataset loading via calamine, results export via rust_xlsxwriter

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use estab_matcher::{Dataset, MatchReport, Value};
use log::{info, warn};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::TableError;
use crate::results;

pub const RESULTS_SHEET: &str = "Results";
pub const SAMPLE_SHEET: &str = "Source_Data_Sample";
pub const SUMMARY_SHEET: &str = "Summary";

/// Longest string a worksheet cell accepts, in characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Load one worksheet (xlsx, xls, xlsb, ods). The first row of the used
/// range is the header. Without `sheet`, the first sheet is read.
pub fn load_workbook(path: &Path, name: &str, sheet: Option<&str>) -> Result<Dataset, TableError> {
    let workbook_err = |e: calamine::Error| TableError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let sheet_names = workbook.sheet_names();

    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|s| s.as_str() == wanted)
            .cloned()
            .ok_or_else(|| TableError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: wanted.to_string(),
                available: sheet_names.clone(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| TableError::Workbook {
                path: path.to_path_buf(),
                message: "workbook contains no sheets".into(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet_name).map_err(workbook_err)?;
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Err(TableError::Empty {
            path: path.to_path_buf(),
        });
    };
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell_value(cell).to_text() {
            Some(text) => text.into_owned(),
            None => format!("column_{}", i + 1),
        })
        .collect();

    let mut dataset = Dataset::new(name, columns);
    for row in rows {
        dataset.push_row(row.iter().map(cell_value).collect());
    }

    info!(
        "loaded {} rows x {} columns from {} [{}]",
        dataset.len(),
        dataset.columns.len(),
        path.display(),
        sheet_name
    );
    Ok(dataset)
}

/// Dates keep their serial number; error cells read as empty.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::from(s.as_str()),
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
    }
}

/// Write the results workbook: one row per result, a sample of the source
/// data, and the summary metrics. Header rows are bold and frozen.
pub fn write_results_xlsx(
    path: &Path,
    report: &MatchReport,
    source: &Dataset,
    sample_rows: usize,
) -> Result<(), TableError> {
    build_workbook(report, source, sample_rows)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|e| TableError::write(path, e))?;
    info!(
        "wrote {} result rows to {} ({} source rows sampled)",
        report.rows.len(),
        path.display(),
        sample_rows.min(source.len())
    );
    Ok(())
}

fn build_workbook(
    report: &MatchReport,
    source: &Dataset,
    sample_rows: usize,
) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    // Results
    let worksheet = workbook.add_worksheet().set_name(RESULTS_SHEET)?;
    write_header(worksheet, &results::header(report), &bold)?;
    for (i, row) in report.rows.iter().enumerate() {
        write_row(worksheet, i as u32 + 1, &results::cells(row))?;
    }

    // Source_Data_Sample
    let worksheet = workbook.add_worksheet().set_name(SAMPLE_SHEET)?;
    write_header(worksheet, &source.columns, &bold)?;
    for (i, values) in source.rows.iter().take(sample_rows).enumerate() {
        write_row(worksheet, i as u32 + 1, values)?;
    }

    // Summary
    let worksheet = workbook.add_worksheet().set_name(SUMMARY_SHEET)?;
    write_header(worksheet, &["Metric".to_string(), "Value".to_string()], &bold)?;
    for (i, (metric, value)) in report.summary.metrics().iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, metric)?;
        worksheet.write_string(row, 1, value)?;
    }
    worksheet.set_column_width(0, 28)?;

    Ok(workbook)
}

fn write_header(worksheet: &mut Worksheet, names: &[String], bold: &Format) -> Result<(), XlsxError> {
    for (col, name) in names.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, bold)?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row: u32, values: &[Value]) -> Result<(), XlsxError> {
    for (col, value) in values.iter().enumerate() {
        let col = col as u16;
        match value {
            Value::Empty => {}
            Value::Text(s) => {
                worksheet.write_string(row, col, cell_text(s, row, col))?;
            }
            Value::Number(n) => {
                worksheet.write_number(row, col, *n)?;
            }
            Value::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
        }
    }
    Ok(())
}

/// Over-long text is cut so the rest of the workbook can still be written.
fn cell_text(s: &str, row: u32, col: u16) -> &str {
    match s.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(
                "cell at row {} column {} exceeds {MAX_CELL_CHARS} characters, truncated",
                row + 1,
                col + 1
            );
            &s[..end]
        }
        None => s,
    }
}
