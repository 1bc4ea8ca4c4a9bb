// Delimited text: dataset loading and results export

use std::io::Read;
use std::path::Path;

use estab_matcher::{Dataset, MatchReport, Value};
use log::{info, warn};

use crate::error::TableError;
use crate::results;

/// Load a delimited text file. The first record is the header. When no
/// delimiter is given it is sniffed from the first lines.
pub fn load_csv(path: &Path, name: &str, delimiter: Option<u8>) -> Result<Dataset, TableError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    let dataset = parse_csv(&content, name, delimiter).map_err(|message| TableError::Csv {
        path: path.to_path_buf(),
        message,
    })?;
    let Some(dataset) = dataset else {
        return Err(TableError::Empty {
            path: path.to_path_buf(),
        });
    };
    info!(
        "loaded {} rows x {} columns from {} (delimiter {:?})",
        dataset.len(),
        dataset.columns.len(),
        path.display(),
        delimiter as char
    );
    Ok(dataset)
}

/// Parse delimited text into a dataset. `None` when there is no header.
///
/// Records longer than the header are truncated; shorter ones read as
/// empty in the missing columns.
pub fn parse_csv(content: &str, name: &str, delimiter: u8) -> Result<Option<Dataset>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| e.to_string())?,
        None => return Ok(None),
    };
    let columns: Vec<String> = header.iter().map(str::to_string).collect();
    let width = columns.len();

    let mut dataset = Dataset::new(name, columns);
    for record in records {
        let record = record.map_err(|e| e.to_string())?;
        dataset.push_row(record.iter().take(width).map(Value::from).collect());
    }
    Ok(Some(dataset))
}

/// Guess the field delimiter from the header and the first data lines.
///
/// A candidate must split the header into several columns. Among those,
/// the one whose split agrees with the header on the most lines wins,
/// weighted by the column count. Comma when nothing splits.
pub fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];
    let lines: Vec<&str> = content.lines().take(10).collect();
    let Some((&header, data)) = lines.split_first() else {
        return b',';
    };

    let field_count = |line: &str, delim: u8| -> usize {
        csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes())
            .records()
            .next()
            .and_then(Result::ok)
            .map_or(1, |record| record.len())
    };

    let mut best = (b',', 0usize);
    for delim in CANDIDATES {
        let columns = field_count(header, delim);
        if columns < 2 {
            continue;
        }
        let agreeing = 1 + data.iter().filter(|&&line| field_count(line, delim) == columns).count();
        let weight = agreeing * columns;
        if weight > best.1 {
            best = (delim, weight);
        }
    }
    best.0
}

/// Read file and convert to UTF-8 if needed. Excel-exported CSVs are often
/// Windows-1252. A leading byte order mark is dropped.
pub fn read_file_as_utf8(path: &Path) -> Result<String, TableError> {
    let mut file = std::fs::File::open(path).map_err(|e| TableError::io(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| TableError::io(path, e))?;

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            warn!("{} is not valid UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

/// Write one line per result row, preceded by a header.
pub fn write_results_csv(
    path: &Path,
    report: &MatchReport,
    delimiter: u8,
) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| TableError::io(path, e))?;

    writer
        .write_record(results::header(report))
        .map_err(|e| TableError::write(path, e))?;

    for row in &report.rows {
        let record: Vec<String> = results::cells(row).iter().map(Value::to_string).collect();
        writer
            .write_record(&record)
            .map_err(|e| TableError::write(path, e))?;
    }

    writer.flush().map_err(|e| TableError::write(path, e))?;
    info!("wrote {} result rows to {}", report.rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Name;Age;City\nAlice;30;Paris\nBob;25;London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "Name,Age,City\nAlice,30,Paris\nBob,25,London\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "Name\tAge\tCity\nAlice\t30\tParis\nBob\t25\tLondon\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_pipe_delimiter() {
        let content = "Name|Age|City\nAlice|30|Paris\nBob|25|London\n";
        assert_eq!(sniff_delimiter(content), b'|');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_addresses() {
        let content = "Enterprise Number;Address\n123456789;\"Rue de la Paix 123, 1000 Brussels\"\n987654321;\"Avenue Louise 456, 1050 Ixelles\"\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter("Address\nMeir 1\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_parse_header_and_ragged_rows() {
        let content = "id;address;unit\n1;Meir 1\n2;Kerkstraat 5;EST2;extra\n";
        let dataset = parse_csv(content, "kbo", b';').unwrap().unwrap();
        assert_eq!(dataset.columns, vec!["id", "address", "unit"]);
        assert_eq!(dataset.len(), 2);

        let first = dataset.row(0).unwrap();
        assert_eq!(first.get("unit"), Some(&Value::Empty));
        let second = dataset.row(1).unwrap();
        assert_eq!(second.text("unit").as_deref(), Some("EST2"));
        assert_eq!(dataset.rows[1].len(), 3);
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(parse_csv("", "x", b',').unwrap().is_none());
    }

    #[test]
    fn test_load_sniffs_and_keeps_blank_cells_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("source.csv");
        fs::write(
            &path,
            "Enterprise Number;Address\n123456789;Rue de la Paix 123\n;Meir 1\n",
        )
        .unwrap();

        let dataset = load_csv(&path, "source", None).unwrap();
        assert_eq!(dataset.name, "source");
        assert_eq!(dataset.columns, vec!["Enterprise Number", "Address"]);
        assert_eq!(dataset.rows[1][0], Value::Empty);
        assert_eq!(dataset.rows[1][1], Value::from("Meir 1"));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kbo.csv");
        // "Chaussée" with é as the single byte 0xE9
        let mut bytes = b"id,address\n1,Chauss".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"e de Wavre 789\n");
        fs::write(&path, bytes).unwrap();

        let dataset = load_csv(&path, "kbo", None).unwrap();
        assert_eq!(dataset.rows[0][1], Value::from("Chaussée de Wavre 789"));
    }

    #[test]
    fn test_bom_is_stripped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}id,address\n1,Meir 1\n").unwrap();

        let dataset = load_csv(&path, "source", None).unwrap();
        assert_eq!(dataset.columns[0], "id");
    }

    #[test]
    fn test_results_csv_reads_back() {
        let config = estab_matcher::MatchConfig::from_toml(
            r#"
[source]
file = "s.csv"
copy_columns = ["company_name"]

[registry]
file = "k.csv"

[output]
delimiter = ","
"#,
        )
        .unwrap();
        let source = Dataset::from_strings(
            "source",
            &["Enterprise Number", "Address", "company_name"],
            &[
                &["123456789", "Rue de la Paix 123, 1000 Brussels", "Company A, NV"],
                &["987654321", "Meir 1, 2000 Antwerpen", "Company B"],
                &["", "Kerkstraat 5", ""],
            ],
        );
        let registry = Dataset::from_strings(
            "kbo",
            &["EnterpriseNumber", "Adress NL", "Adress FR", "EntityNumber"],
            &[&["123456789", "Vredestraat 123, 1000 Brussel", "Rue de la Paix 123, 1000 Bruxelles", "EST001"]],
        );
        let report = estab_matcher::run(&config, &source, &registry).unwrap();
        let score = report.rows[0].dice_score;
        assert!(score > 0.0 && score < 1.0);

        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_results_csv(&path, &report, config.output_delimiter()).unwrap();

        let reloaded = load_csv(&path, "results", Some(b',')).unwrap();
        assert_eq!(reloaded.columns, results::header(&report));
        assert_eq!(reloaded.len(), report.rows.len());
        for (values, row) in reloaded.rows.iter().zip(&report.rows) {
            let expected: Vec<String> = results::cells(row).iter().map(Value::to_string).collect();
            let actual: Vec<String> = values.iter().map(Value::to_string).collect();
            assert_eq!(actual, expected);
        }

        let first = reloaded.row(0).unwrap();
        assert_eq!(first.text("source_address").as_deref(), Some("Rue de la Paix 123, 1000 Brussels"));
        assert_eq!(first.text("source_company_name").as_deref(), Some("Company A, NV"));
        let reread: f64 = first.text("dice_score").unwrap().parse().unwrap();
        assert_eq!(reread, score);
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv(Path::new("/nonexistent/source.csv"), "source", None).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();
        let err = load_csv(&path, "source", None).unwrap_err();
        assert!(matches!(err, TableError::Empty { .. }));
    }
}
