//! CSV ingest and type coercion.
//!
//! This module turns a comma-separated house-sales export into a typed
//! `RecordTable`.
//!
//! Design goals:
//! - **Strict schema**: every field is coerced to its declared column type and
//!   the first failure aborts the load with the line, column and value
//! - **Deterministic behavior**: columns missing from the schema are typed by
//!   inspecting every value, never by sampling
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{ColumnType, RecordTable, Schema, Value};
use crate::error::AppError;

/// Columns the sales table is ordered by after loading.
pub const SALES_SORT_COLUMNS: [&str; 2] = ["sqft_living", "price"];

/// Load a CSV file and coerce its columns per `schema`.
pub fn load_table(path: &Path, schema: &Schema) -> Result<RecordTable, AppError> {
    let file = File::open(path).map_err(|source| AppError::Io {
        action: "open CSV",
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file, schema)?;
    info!(path = %path.display(), rows = table.len(), columns = table.headers().len(), "loaded table");
    Ok(table)
}

/// Load a house-sales CSV and sort it by `(sqft_living, price)`.
pub fn load_sales(path: &Path) -> Result<RecordTable, AppError> {
    let mut table = load_table(path, &Schema::house_sales())?;
    table.sort_by_columns(&SALES_SORT_COLUMNS)?;
    Ok(table)
}

/// Parse CSV from any reader. The first row must be a header.
pub fn read_table<R: Read>(reader: R, schema: &Schema) -> Result<RecordTable, AppError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::MalformedInput {
            line: 1,
            column: String::new(),
            message: format!("failed to read CSV header: {e}"),
        })?
        .iter()
        .map(normalize_header_name)
        .collect();

    if let Some(dup) = first_duplicate(&headers) {
        return Err(AppError::schema(format!("duplicate column `{dup}`")));
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Quoted fields may span lines, so take the line from the reader. The
        // fallback (+2: after the header, 1-based) only covers records without one.
        let record = result.map_err(|e| AppError::MalformedInput {
            line: e.position().map_or(idx + 2, position_line),
            column: String::new(),
            message: format!("CSV parse error: {e}"),
        })?;
        records.push(record);
    }

    let types: Vec<ColumnType> = headers
        .iter()
        .enumerate()
        .map(|(col, name)| {
            schema.column_type(name).unwrap_or_else(|| {
                let inferred = infer_column_type(&records, col);
                debug!(column = %name, ty = %inferred, "inferred type for column outside schema");
                inferred
            })
        })
        .collect();

    let mut rows = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let line = record.position().map_or(idx + 2, position_line);
        rows.push(coerce_record(record, &headers, &types, line)?);
    }

    RecordTable::new(headers, types, rows)
}

fn position_line(position: &csv::Position) -> usize {
    usize::try_from(position.line()).unwrap_or(usize::MAX)
}

fn normalize_header_name(name: &str) -> String {
    // UTF-8 exports from spreadsheet tools may carry a BOM on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn first_duplicate(headers: &[String]) -> Option<&str> {
    headers
        .iter()
        .enumerate()
        .find(|(i, h)| headers[..*i].contains(h))
        .map(|(_, h)| h.as_str())
}

fn infer_column_type(records: &[StringRecord], col: usize) -> ColumnType {
    let values = || records.iter().filter_map(|r| r.get(col));
    if records.is_empty() {
        return ColumnType::Text;
    }
    if values().all(|s| parse_int(s).is_ok()) {
        ColumnType::Int
    } else if values().all(|s| parse_float(s).is_ok()) {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

fn coerce_record(
    record: &StringRecord,
    headers: &[String],
    types: &[ColumnType],
    line: usize,
) -> Result<Vec<Value>, AppError> {
    headers
        .iter()
        .zip(types)
        .enumerate()
        .map(|(col, (name, &ty))| {
            let raw = record.get(col).unwrap_or("");
            coerce_value(raw, ty).map_err(|message| AppError::MalformedInput {
                line,
                column: name.clone(),
                message,
            })
        })
        .collect()
}

fn coerce_value(raw: &str, ty: ColumnType) -> Result<Value, String> {
    match ty {
        ColumnType::Text => Ok(Value::Text(raw.to_string())),
        ColumnType::Int => parse_int(raw).map(Value::Int),
        ColumnType::Float => parse_float(raw).map(Value::Float),
    }
}

fn parse_int(s: &str) -> Result<i64, String> {
    if s.is_empty() {
        return Err("empty value for int column".to_string());
    }
    s.parse::<i64>().map_err(|_| format!("'{s}' is not an integer"))
}

fn parse_float(s: &str) -> Result<f64, String> {
    if s.is_empty() {
        return Err("empty value for float column".to_string());
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("'{s}' is not a finite number")),
        Err(_) => Err(format!("'{s}' is not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}id,date,price,bedrooms,sqft_living,zipcode,view,extra\n\
        7129300520,20141013T000000,221900,3,1180,98178,0,1.5\n\
        6414100192,20141209T000000,538000,3,2570,98125,0,2\n\
        5631500400,20150225T000000,180000,2,770,98028,0,x\n";

    #[test]
    fn coerces_declared_and_inferred_columns() {
        let table = read_table(SAMPLE.as_bytes(), &Schema::house_sales()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.headers()[0], "id");
        assert_eq!(table.column_type("id").unwrap(), ColumnType::Text);
        assert_eq!(table.column_type("zipcode").unwrap(), ColumnType::Text);
        assert_eq!(table.column_type("view").unwrap(), ColumnType::Int);
        assert_eq!(table.column_type("extra").unwrap(), ColumnType::Text);
        assert_eq!(table.numeric_column("sqft_living").unwrap(), vec![1180.0, 2570.0, 770.0]);
    }

    #[test]
    fn type_mismatch_is_malformed_input() {
        let csv = "price,view\n100.0,0\n200.0,1.5\n";
        let err = read_table(csv.as_bytes(), &Schema::house_sales()).unwrap_err();
        match err {
            AppError::MalformedInput { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "view");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn line_numbers_follow_multiline_quoted_fields() {
        let csv = "id,price\n\"a\nb\",100\nc,oops\n";
        let err = read_table(csv.as_bytes(), &Schema::house_sales()).unwrap_err();
        match err {
            AppError::MalformedInput { line, column, .. } => {
                assert_eq!(line, 4);
                assert_eq!(column, "price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_numeric_field_is_malformed_input() {
        let csv = "price,sqft_living\n100.0,\n";
        let err = read_table(csv.as_bytes(), &Schema::house_sales()).unwrap_err();
        assert!(matches!(err, AppError::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn ragged_row_is_malformed_input() {
        let csv = "price,sqft_living\n100.0,1000\n200.0\n";
        let err = read_table(csv.as_bytes(), &Schema::house_sales()).unwrap_err();
        assert!(matches!(err, AppError::MalformedInput { .. }));
    }

    #[test]
    fn inference_prefers_int_then_float() {
        let csv = "a,b,c\n1,1.5,x\n2,2,y\n";
        let table = read_table(csv.as_bytes(), &Schema::new()).unwrap();
        assert_eq!(table.column_type("a").unwrap(), ColumnType::Int);
        assert_eq!(table.column_type("b").unwrap(), ColumnType::Float);
        assert_eq!(table.column_type("c").unwrap(), ColumnType::Text);
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let csv = "price,price\n1,2\n";
        assert!(matches!(
            read_table(csv.as_bytes(), &Schema::new()),
            Err(AppError::Schema(_))
        ));
    }
}
