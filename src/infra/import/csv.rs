use std::path::Path;

use anyhow::{Context, Result};

use super::SheetRows;

pub fn read_csv(csv_path: &Path) -> Result<SheetRows> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(String::is_empty) {
        anyhow::bail!("csv header is required")
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(SheetRows { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_header_and_trimmed_cells() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp csv");
        writeln!(file, "content,type,options\n What is UML? , SINGLE ,a|b\n,,").expect("write");

        let table = read_csv(file.path()).expect("read");

        assert_eq!(table.headers, vec!["content", "type", "options"]);
        assert_eq!(table.rows[0], vec!["What is UML?", "SINGLE", "a|b"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn empty_file_has_no_header() {
        let file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp csv");
        assert!(read_csv(file.path()).is_err());
    }
}
