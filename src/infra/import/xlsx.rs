use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use super::SheetRows;

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.trim().to_string(),
        // whole numbers come back as floats; ids must not gain a ".0"
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

pub fn read_first_sheet(xlsx_path: &Path) -> Result<SheetRows> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open workbook: {}", xlsx_path.display()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("failed to read sheet: {sheet}"))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    let headers = rows
        .next()
        .with_context(|| format!("sheet {sheet} has no header row"))?;
    Ok(SheetRows {
        headers,
        rows: rows.collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Data::Float(3.0), "3")]
    #[case(Data::Float(2.5), "2.5")]
    #[case(Data::Int(7), "7")]
    #[case(Data::String("  Class diagram ".to_string()), "Class diagram")]
    #[case(Data::Empty, "")]
    fn cells_render_as_text(#[case] cell: Data, #[case] expected: &str) {
        assert_eq!(cell_to_string(&cell), expected);
    }

    #[test]
    fn missing_workbook_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("questions.xlsx");
        let err = read_first_sheet(&path).expect_err("missing file");
        assert!(err.to_string().contains("questions.xlsx"));
    }
}
