//! CSV serialization of the cohort table and the label catalog.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use polars::prelude::DataFrame;
use ruleout_model::LabelCatalog;
use tracing::info;

use crate::error::{ReportError, Result};
use crate::values::cell_text;

/// Separator between catalog values in one cell.
pub const VALUE_SEPARATOR: &str = " | ";
/// Stand-in for an empty answer in the catalog.
pub const EMPTY_VALUE: &str = "(empty)";

/// Write the cohort table with a header row. Nulls become empty cells.
pub fn write_cohort<W: Write>(writer: W, frame: &DataFrame) -> Result<W> {
    let mut csv = csv::Writer::from_writer(writer);
    let columns = frame.get_columns();
    csv.write_record(columns.iter().map(|column| column.name().as_str()))?;
    for row in 0..frame.height() {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| cell_text(column, row).unwrap_or_default())
            .collect();
        csv.write_record(&cells)?;
    }
    csv.flush().map_err(ReportError::Flush)?;
    csv.into_inner()
        .map_err(|error| ReportError::Flush(error.into_error()))
}

/// Write the label catalog: one row per field key.
pub fn write_catalog<W: Write>(writer: W, catalog: &LabelCatalog) -> Result<W> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["field_key", "label", "value_count", "values"])?;
    for (key, entry) in catalog.iter() {
        let values = entry
            .values
            .iter()
            .map(|value| {
                if value.is_empty() {
                    EMPTY_VALUE
                } else {
                    value.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(VALUE_SEPARATOR);
        let count = entry.values.len().to_string();
        csv.write_record([key.as_str(), entry.label.as_str(), count.as_str(), values.as_str()])?;
    }
    csv.flush().map_err(ReportError::Flush)?;
    csv.into_inner()
        .map_err(|error| ReportError::Flush(error.into_error()))
}

pub fn write_cohort_csv(path: &Path, frame: &DataFrame) -> Result<()> {
    let file = create(path)?;
    write_cohort(file, frame)?;
    info!(path = %path.display(), rows = frame.height(), "wrote cohort table");
    Ok(())
}

pub fn write_catalog_csv(path: &Path, catalog: &LabelCatalog) -> Result<()> {
    let file = create(path)?;
    write_catalog(file, catalog)?;
    info!(path = %path.display(), fields = catalog.len(), "wrote label catalog");
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}
