use anyhow::{anyhow, Result};
use serde_json::Value;

/// Tabular data loaded once per invocation and never mutated afterwards.
/// Cells are kept as strings; numeric coercion happens at read sites.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Create a Dataset from an existing CsvData struct
    pub fn from_csv(csv: crate::csv_reader::CsvData) -> Self {
        Self {
            headers: csv.headers,
            rows: csv.rows,
        }
    }

    /// Create a Dataset from a JSON array of objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            return Err(anyhow!("Input data array is empty"));
        }

        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::new();
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::new();
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => "".to_string(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Case-insensitive column lookup
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Numeric value of a cell. Absent or non-numeric cells coerce to 0,
    /// matching the treatment of missing measures during aggregation.
    pub fn numeric(&self, row: &[String], col: usize) -> f64 {
        row.get(col)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_dataset() -> Dataset {
        Dataset::new(
            vec!["file".to_string(), "went".to_string()],
            vec![
                vec!["A".to_string(), "5".to_string()],
                vec!["B".to_string(), "".to_string()],
                vec!["C".to_string()],
            ],
        )
    }

    #[test]
    fn test_column_lookup_case_insensitive() {
        let data = make_dataset();
        assert_eq!(data.column("Went"), Some(1));
        assert_eq!(data.column("capacity"), None);
    }

    #[test]
    fn test_numeric_coercion() {
        let data = make_dataset();
        assert_eq!(data.numeric(&data.rows[0], 1), 5.0);
        // empty cell
        assert_eq!(data.numeric(&data.rows[1], 1), 0.0);
        // short row, cell absent entirely
        assert_eq!(data.numeric(&data.rows[2], 1), 0.0);
    }

    #[test]
    fn test_from_json() {
        let value = json!([
            {"Name": "Club X", "Capacity": 120},
            {"Name": "Hall Y", "Capacity": 800}
        ]);
        let data = Dataset::from_json(&value).unwrap();
        assert_eq!(data.rows.len(), 2);
        assert!(data.column("Capacity").is_some());
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        let value = json!({"Name": "Club X"});
        assert!(Dataset::from_json(&value).is_err());
    }
}
