use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<CsvData> {
    let stdin = io::stdin();
    read_csv(stdin.lock())
}

/// Read CSV data from a file path
pub fn read_csv_from_path(path: &Path) -> Result<CsvData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file '{}'", path.display()))?;
    read_csv(file)
}

fn read_csv<R: Read>(reader: R) -> Result<CsvData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.context("Failed to read CSV record")?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    if rows.is_empty() {
        anyhow::bail!("CSV must contain at least one data row");
    }

    Ok(CsvData { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let csv = "file,went\nVenue A,5\nVenue B,10\n";
        let data = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.headers, vec!["file", "went"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0], vec!["Venue A", "5"]);
    }

    #[test]
    fn test_read_csv_empty_fails() {
        let csv = "file,went\n";
        assert!(read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_read_csv_ragged_rows() {
        // flexible mode keeps short rows; missing cells read as absent later
        let csv = "file,went\nVenue A\nVenue B,10\n";
        let data = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0].len(), 1);
    }
}
