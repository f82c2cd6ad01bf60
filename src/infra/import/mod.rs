pub mod csv;
pub mod xlsx;

use std::path::Path;

use anyhow::{bail, Result};

/// A header row plus data rows, all cells as trimmed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRows {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetRows {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }
}

pub fn read_table(path: &Path) -> Result<SheetRows> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => csv::read_csv(path),
        "xlsx" | "xls" | "ods" => xlsx::read_first_sheet(path),
        other => bail!("unsupported file type: {other:?}"),
    }
}
