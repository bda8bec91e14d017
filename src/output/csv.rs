//! CSV export of analysis results

use crate::output::{KeywordRecord, OutputResult};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Writes the result records to a timestamped CSV file under `dir`
///
/// The file starts with a UTF-8 BOM so spreadsheet applications detect
/// the encoding.
pub fn write_results_csv(dir: &Path, records: &[KeywordRecord]) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let filename = format!("result_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);

    let mut content = String::from("\u{feff}");
    content.push_str("rank,keyword,allintitle_count,route\r\n");
    for record in records {
        content.push_str(&format!(
            "{},{},{},{}\r\n",
            escape_field(&record.rank.to_string()),
            escape_field(&record.keyword),
            record.allintitle_count,
            escape_field(&record.route),
        ));
    }

    std::fs::write(&path, content)?;
    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Quotes a field when it contains a delimiter, quote, or line break
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::Rank;
    use tempfile::TempDir;

    fn record(keyword: &str, rank: Rank, count: i64) -> KeywordRecord {
        KeywordRecord {
            keyword: keyword.to_string(),
            rank,
            allintitle_count: count,
            route: "Smart recursive".to_string(),
        }
    }

    #[test]
    fn test_csv_has_bom_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let records = vec![record("keyword one", Rank::S, 0), record("kw", Rank::C, 42)];
        let path = write_results_csv(dir.path(), &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('\u{feff}'));

        let lines: Vec<&str> = content.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(lines[0], "rank,keyword,allintitle_count,route");
        assert_eq!(lines[1], "S,keyword one,0,Smart recursive");
        assert_eq!(lines[2], "C,kw,42,Smart recursive");
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let dir = TempDir::new().unwrap();
        let records = vec![record("tricky, \"quoted\" keyword", Rank::A, 1)];
        let path = write_results_csv(dir.path(), &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"tricky, \"\"quoted\"\" keyword\""));
    }

    #[test]
    fn test_sentinel_count_written_as_minus_one() {
        let dir = TempDir::new().unwrap();
        let records = vec![record("kw", Rank::Unknown, -1)];
        let path = write_results_csv(dir.path(), &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("?,kw,-1,"));
    }

    #[test]
    fn test_creates_output_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("results/nested");
        let path = write_results_csv(&nested, &[]).unwrap();
        assert!(path.exists());
    }
}
