//! In-memory record table.
//!
//! A table is an ordered header plus rows of typed cells. Every row has exactly
//! one cell per header, and each cell matches its column's declared type.

use std::cmp::Ordering;

use crate::domain::{ColumnType, Value};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct RecordTable {
    headers: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Vec<Value>>,
}

impl RecordTable {
    /// Build a table, checking that every row matches the header width.
    pub fn new(headers: Vec<String>, types: Vec<ColumnType>, rows: Vec<Vec<Value>>) -> Result<Self, AppError> {
        if headers.len() != types.len() {
            return Err(AppError::schema(format!(
                "{} headers but {} column types",
                headers.len(),
                types.len()
            )));
        }
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            return Err(AppError::schema(format!(
                "row {idx} has {} values, expected {}",
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, types, rows })
    }

    /// Build an all-float table from named columns of equal length.
    pub fn from_columns(columns: &[(&str, &[f64])]) -> Result<Self, AppError> {
        let n = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != n) {
            return Err(AppError::schema(format!(
                "column `{name}` has {} values, expected {n}",
                values.len()
            )));
        }

        let headers = columns.iter().map(|(name, _)| name.to_string()).collect();
        let types = vec![ColumnType::Float; columns.len()];
        let rows = (0..n)
            .map(|i| columns.iter().map(|(_, v)| Value::Float(v[i])).collect())
            .collect();
        Self::new(headers, types, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Result<usize, AppError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AppError::schema(format!("missing column `{name}`")))
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType, AppError> {
        Ok(self.types[self.column_index(name)?])
    }

    /// Index of a column that must hold numbers.
    pub fn numeric_column_index(&self, name: &str) -> Result<usize, AppError> {
        let idx = self.column_index(name)?;
        let ty = self.types[idx];
        if !ty.is_numeric() {
            return Err(AppError::schema(format!(
                "column `{name}` is {ty}, expected a numeric column"
            )));
        }
        Ok(idx)
    }

    /// Values of a numeric column as `f64`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, AppError> {
        let idx = self.numeric_column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                values[idx].as_f64().ok_or_else(|| {
                    AppError::schema(format!("row {row}: column `{name}` holds a non-numeric value"))
                })
            })
            .collect()
    }

    /// Stable ascending sort by one or more numeric columns.
    pub fn sort_by_columns(&mut self, names: &[&str]) -> Result<(), AppError> {
        let indices = names
            .iter()
            .map(|name| self.numeric_column_index(name))
            .collect::<Result<Vec<_>, _>>()?;

        self.rows.sort_by(|a, b| {
            for &idx in &indices {
                let ka = a[idx].as_f64().unwrap_or(f64::NAN);
                let kb = b[idx].as_f64().unwrap_or(f64::NAN);
                match ka.total_cmp(&kb) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            Ordering::Equal
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_table() -> RecordTable {
        RecordTable::new(
            vec!["id".to_string(), "sqft_living".to_string(), "price".to_string()],
            vec![ColumnType::Text, ColumnType::Float, ColumnType::Float],
            vec![
                vec![Value::Text("a".into()), Value::Float(2000.0), Value::Float(500.0)],
                vec![Value::Text("b".into()), Value::Float(1000.0), Value::Float(300.0)],
                vec![Value::Text("c".into()), Value::Float(2000.0), Value::Float(400.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn sort_by_living_area_then_price() {
        let mut table = mixed_table();
        table.sort_by_columns(&["sqft_living", "price"]).unwrap();
        let ids: Vec<&Value> = table.rows().iter().map(|r| &r[0]).collect();
        assert_eq!(
            ids,
            vec![
                &Value::Text("b".into()),
                &Value::Text("c".into()),
                &Value::Text("a".into())
            ]
        );
    }

    #[test]
    fn numeric_column_rejects_text_and_missing() {
        let table = mixed_table();
        assert!(matches!(table.numeric_column("id"), Err(AppError::Schema(_))));
        assert!(matches!(table.numeric_column("bedrooms"), Err(AppError::Schema(_))));
        assert_eq!(table.numeric_column("price").unwrap(), vec![500.0, 300.0, 400.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = RecordTable::new(
            vec!["x".to_string()],
            vec![ColumnType::Float],
            vec![vec![Value::Float(1.0), Value::Float(2.0)]],
        );
        assert!(err.is_err());
        assert!(RecordTable::from_columns(&[("x", &[1.0, 2.0]), ("y", &[1.0])]).is_err());
    }
}
