// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! CSV tables → typed records.
//!
//! Files are decoded with arrow-csv. The header row names the columns and
//! every column is read as nullable Utf8, so no type inference ever touches
//! the data: prices, dates and ids stay exactly as written.

use crate::error::{Error, Result};
use crate::records::{FromRow, Publishable, Row};
use arrow_array::{Array, StringArray};
use arrow_csv::reader::{Format, ReaderBuilder};
use arrow_schema::{ArrowError, DataType, Field, Schema};
use diagnostics::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// A decoded CSV file: trimmed header names and every data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Read every data row of a CSV file, in file order.
pub fn read_table(path: &Path) -> Result<CsvTable> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let csv_err = |source: ArrowError| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(CsvTable {
            columns: Vec::new(),
            rows: Vec::new(),
        });
    }

    // Only the header is needed; all columns become Utf8 below.
    let (header, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(&bytes), Some(0))
        .map_err(csv_err)?;

    let columns: Vec<String> = header
        .fields()
        .iter()
        .map(|f| f.name().trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if columns.is_empty() {
        return Ok(CsvTable {
            columns,
            rows: Vec::new(),
        });
    }

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .build(Cursor::new(&bytes))
        .map_err(csv_err)?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.map_err(csv_err)?;

        let arrays = batch
            .columns()
            .iter()
            .map(|c| {
                c.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
                    csv_err(ArrowError::CastError("expected string column".to_string()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for i in 0..batch.num_rows() {
            let mut values = BTreeMap::new();
            for (name, array) in columns.iter().zip(&arrays) {
                let value = if array.is_null(i) { "" } else { array.value(i) };
                values.insert(name.clone(), value.to_string());
            }
            rows.push(Row {
                row: rows.len() + 1,
                values,
            });
        }
    }

    let count = rows.len();
    let file = path.display().to_string();
    debug!("Read {count} rows from {file}", count: count, file: file);

    Ok(CsvTable { columns, rows })
}

/// Load a whole table of records, preserving row order.
///
/// Fails on the first malformed row or on a duplicate `id`. Slugs are only
/// checked among visible records, see [`check_unique_slugs`].
pub fn load_table<T: FromRow>(path: &Path) -> Result<Vec<T>> {
    let table = read_table(path)?;
    for required in T::REQUIRED_COLUMNS {
        if !table.columns.iter().any(|c| c == required) {
            return Err(Error::MissingColumn {
                path: path.to_path_buf(),
                column: (*required).to_string(),
            });
        }
    }

    let mut records = Vec::with_capacity(table.rows.len());
    let mut ids: HashMap<String, usize> = HashMap::new();

    for row in &table.rows {
        let record = T::from_row(row, path)?;
        let meta = record.meta();

        if let Some(first_row) = ids.insert(meta.id.clone(), meta.row) {
            return Err(Error::DuplicateId {
                path: path.to_path_buf(),
                id: meta.id.clone(),
                first_row,
                row: meta.row,
            });
        }

        records.push(record);
    }

    let count = records.len();
    let kind = T::KIND;
    info!("Loaded {count} {kind} records", count: count, kind: kind);

    Ok(records)
}

/// Fail if two of `records` would be written to the same page.
///
/// Run on visible records only: a draft may share a title with a published
/// record.
pub fn check_unique_slugs<T: Publishable>(path: &Path, records: &[T]) -> Result<()> {
    let mut slugs: HashSet<&str> = HashSet::new();
    for record in records {
        let meta = record.meta();
        if !slugs.insert(meta.slug.as_str()) {
            return Err(Error::DuplicateSlug {
                path: path.to_path_buf(),
                slug: meta.slug.clone(),
                row: meta.row,
            });
        }
    }
    Ok(())
}
