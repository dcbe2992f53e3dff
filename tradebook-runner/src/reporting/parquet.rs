//! Sheet export to Parquet.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, ParquetWriter};
use std::fs::File;
use std::path::Path;

use crate::workbook::Sheet;

/// Convert a sheet to a DataFrame.
///
/// A column whose non-empty cells all parse as numbers becomes `f64`
/// (empty cells are null); any other column is kept as nullable strings.
pub fn sheet_to_dataframe(sheet: &Sheet) -> Result<DataFrame> {
    let columns: Vec<Column> = sheet
        .headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let numeric: Option<Vec<Option<f64>>> = sheet
                .column_cells(i)
                .map(|cell| {
                    if cell.is_empty() {
                        Some(None)
                    } else {
                        cell.as_f64().map(Some)
                    }
                })
                .collect();
            match numeric {
                Some(values) => Column::new(name.as_str().into(), values),
                None => {
                    let values: Vec<Option<String>> = sheet
                        .column_cells(i)
                        .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                        .collect();
                    Column::new(name.as_str().into(), values)
                }
            }
        })
        .collect();

    DataFrame::new(columns)
        .with_context(|| format!("Failed to build dataframe for sheet '{}'", sheet.name))
}

pub fn write_sheet_parquet(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut df = sheet_to_dataframe(sheet)?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create parquet {}", path.display()))?;
    ParquetWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write parquet {}", path.display()))?;
    Ok(())
}
