use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::entities::resource::Resource;
use crate::infra::import::{read_table, SheetRows};
use crate::usecase::ports::api::AdminApi;

pub const QUESTION_TYPES: [&str; 3] = ["SINGLE_CHOICE", "MULTIPLE_CHOICE", "ESSAY"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read {}: {source:#}", path.display())]
    Read {
        path: PathBuf,
        source: anyhow::Error,
    },
    #[error("missing column \"{0}\"")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// Spreadsheet row number; the header is row 1.
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub failures: Vec<RowFailure>,
}

struct Columns {
    content: usize,
    kind: usize,
    group: usize,
    options: Option<usize>,
    answer: Option<usize>,
}

impl Columns {
    fn locate(table: &SheetRows) -> Result<Self, ImportError> {
        let required = |name: &'static str| table.column(name).ok_or(ImportError::MissingColumn(name));
        Ok(Self {
            content: required("content")?,
            kind: required("type")?,
            group: required("group_id")?,
            options: table.column("options"),
            answer: table.column("answer"),
        })
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|value| value.trim()).unwrap_or("")
}

/// Builds the create payload for one question row.
fn question_payload(row: &[String], columns: &Columns) -> Result<Value, String> {
    let content = cell(row, columns.content);
    if content.is_empty() {
        return Err("content is empty".to_string());
    }
    let kind = cell(row, columns.kind).to_ascii_uppercase();
    if !QUESTION_TYPES.contains(&kind.as_str()) {
        return Err(format!("unknown question type \"{}\"", cell(row, columns.kind)));
    }
    let group = cell(row, columns.group);
    let group_id: i64 = group
        .parse()
        .map_err(|_| format!("group_id \"{group}\" is not a number"))?;

    let options: Vec<Value> = columns
        .options
        .map(|index| cell(row, index))
        .unwrap_or("")
        .split('|')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(|option| json!({ "text": option }))
        .collect();
    let answer = columns.answer.map(|index| cell(row, index)).unwrap_or("");

    if kind != "ESSAY" {
        if options.len() < 2 {
            return Err("choice questions need at least two options".to_string());
        }
        if answer.is_empty() {
            return Err("answer is empty".to_string());
        }
    }

    Ok(json!({
        "content": content,
        "type": kind,
        "options": options,
        "answer": answer,
        "groupId": group_id,
        "active": true,
    }))
}

pub struct ImportService {
    api: Arc<dyn AdminApi>,
}

impl ImportService {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportReport, ImportError> {
        let table = read_table(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let report = self.import_table(&table)?;
        tracing::info!(
            path = %path.display(),
            created = report.created,
            failed = report.failures.len(),
            "question import finished"
        );
        Ok(report)
    }

    /// Rows are created one at a time; a failing row never stops the rest.
    pub fn import_table(&self, table: &SheetRows) -> Result<ImportReport, ImportError> {
        let columns = Columns::locate(table)?;
        let mut report = ImportReport::default();
        for (index, row) in table.rows.iter().enumerate() {
            if row.iter().all(|value| value.trim().is_empty()) {
                continue;
            }
            let row_number = index + 2;
            let result = question_payload(row, &columns).and_then(|payload| {
                self.api
                    .create(Resource::Questions, payload)
                    .map_err(|err| err.user_message())
            });
            match result {
                Ok(_) => report.created += 1,
                Err(message) => {
                    tracing::debug!(row = row_number, %message, "question row skipped");
                    report.failures.push(RowFailure {
                        row: row_number,
                        message,
                    });
                }
            }
        }
        Ok(report)
    }
}
