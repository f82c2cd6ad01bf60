use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Local;
use rusqlite::{params, types::Value, Connection, OptionalExtension};
use serde_json::{Map, Value as Json};

use crate::domain::entities::listing::SortDirection;
use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::infra::sqlite::schema::open_connection;
use crate::usecase::ports::api::ListRequest;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Text form of a document field; booleans compare as `true`/`false`.
const FIELD_TEXT_SQL: &str = "CASE json_type(doc, ?)
        WHEN 'true' THEN 'true'
        WHEN 'false' THEN 'false'
        ELSE CAST(json_extract(doc, ?) AS TEXT)
    END";

/// Turns `group.name` into the JSON path `$.group.name`. Only plain
/// identifiers are accepted so keys can never reach the SQL text.
pub fn json_path(key: &str) -> Result<String> {
    let valid = !key.is_empty()
        && key.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if !valid {
        bail!("invalid field name: {key:?}")
    }
    Ok(format!("$.{key}"))
}

fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// SQL for one filter term. Whole-number terms match integer fields
/// exactly, so `assignmentId=1` never finds assignment 11; everything else
/// is a case-insensitive substring match.
fn term_clause(key: &str, term: &str) -> Result<(String, Vec<Value>)> {
    let number = term.parse::<i64>().ok();
    if key == "id" {
        return Ok(match number {
            Some(number) => ("id = ?".to_string(), vec![Value::Integer(number)]),
            None => ("0".to_string(), Vec::new()),
        });
    }
    let path = json_path(key)?;
    let like = format!("({FIELD_TEXT_SQL}) LIKE ? ESCAPE '\\'");
    let mut params = vec![
        Value::Text(path.clone()),
        Value::Text(path.clone()),
        Value::Text(like_pattern(term)),
    ];
    let Some(number) = number else {
        return Ok((like, params));
    };
    let clause = format!(
        "(CASE WHEN json_type(doc, ?) = 'integer' THEN json_extract(doc, ?) = ? ELSE {like} END)"
    );
    let mut exact = vec![
        Value::Text(path.clone()),
        Value::Text(path),
        Value::Integer(number),
    ];
    exact.append(&mut params);
    Ok((clause, exact))
}

fn row_from_doc(id: i64, doc: &str) -> Result<RowData> {
    let mut fields: Map<String, Json> = match serde_json::from_str(doc)
        .with_context(|| format!("failed to parse document #{id}"))?
    {
        Json::Object(map) => map,
        _ => bail!("document #{id} is not an object"),
    };
    fields.insert("id".to_string(), Json::from(id));
    Ok(RowData {
        id: RecordId(id),
        fields,
    })
}

fn into_doc(payload: Json) -> Result<Map<String, Json>> {
    let Json::Object(mut map) = payload else {
        bail!("payload must be a JSON object")
    };
    map.remove("id");
    Ok(map)
}

pub fn query_records(
    db_path: &Path,
    resource: Resource,
    request: &ListRequest,
) -> Result<(Vec<RowData>, u64)> {
    if request.limit == 0 {
        bail!("limit must be greater than zero")
    }

    let conn = open_connection(db_path)?;

    let mut filter_clauses = vec!["resource = ?".to_string()];
    let mut filter_params = vec![Value::Text(resource.path().to_string())];

    for (key, raw) in &request.filters {
        let terms: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .collect();
        if terms.is_empty() {
            continue;
        }
        let mut alternatives = Vec::with_capacity(terms.len());
        for term in terms {
            let (clause, params) = term_clause(key, term)?;
            alternatives.push(clause);
            filter_params.extend(params);
        }
        filter_clauses.push(format!("({})", alternatives.join(" OR ")));
    }

    let where_sql = filter_clauses.join(" AND ");

    let total: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM record WHERE {where_sql}"),
            rusqlite::params_from_iter(filter_params.iter().cloned()),
            |row| row.get(0),
        )
        .context("failed to query filtered record count")?;

    let mut row_params = filter_params;
    let mut row_sql = format!("SELECT id, doc FROM record WHERE {where_sql} ORDER BY ");
    let direction = match request.sort_order.unwrap_or(SortDirection::Asc) {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    match request.sort_by.as_deref() {
        // the row id lives in its own column, not in the document
        Some("id") => row_sql.push_str(&format!("id {direction}")),
        Some(sort_by) => {
            row_sql.push_str(&format!("json_extract(doc, ?) {direction}, id ASC"));
            row_params.push(Value::Text(json_path(sort_by)?));
        }
        None => row_sql.push_str("id ASC"),
    }
    row_sql.push_str(" LIMIT ? OFFSET ?");
    row_params.push(Value::Integer(i64::from(request.limit)));
    row_params.push(Value::Integer(
        i64::from(request.page) * i64::from(request.limit),
    ));

    let mut stmt = conn
        .prepare(&row_sql)
        .context("failed to prepare record page query")?;
    let docs = stmt
        .query_map(rusqlite::params_from_iter(row_params), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })
        .context("failed to query record page")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect record page")?;

    let rows = docs
        .iter()
        .map(|(id, doc)| row_from_doc(*id, doc))
        .collect::<Result<Vec<_>>>()?;
    Ok((rows, total.max(0) as u64))
}

fn load_doc(conn: &Connection, resource: Resource, id: RecordId) -> Result<Option<String>> {
    conn.query_row(
        "SELECT doc FROM record WHERE resource = ?1 AND id = ?2",
        params![resource.path(), id.0],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to load {resource} #{id}"))
}

pub fn get_record(db_path: &Path, resource: Resource, id: RecordId) -> Result<Option<RowData>> {
    let conn = open_connection(db_path)?;
    load_doc(&conn, resource, id)?
        .map(|doc| row_from_doc(id.0, &doc))
        .transpose()
}

pub fn insert_record(db_path: &Path, resource: Resource, payload: Json) -> Result<RowData> {
    let doc = into_doc(payload)?;
    let conn = open_connection(db_path)?;
    insert_doc(&conn, resource, doc)
}

fn insert_doc(conn: &Connection, resource: Resource, mut doc: Map<String, Json>) -> Result<RowData> {
    doc.entry("createdAt")
        .or_insert_with(|| Json::from(Local::now().format(TIMESTAMP_FORMAT).to_string()));
    doc.entry("active").or_insert(Json::Bool(true));
    let text = serde_json::to_string(&doc).context("failed to encode document")?;
    conn.execute(
        "INSERT INTO record(resource, doc) VALUES (?1, ?2)",
        params![resource.path(), text],
    )
    .with_context(|| format!("failed to insert {resource}"))?;
    row_from_doc(conn.last_insert_rowid(), &text)
}

/// Merges `payload` into the stored document. Keys the payload leaves out
/// keep their stored values.
pub fn update_record(
    db_path: &Path,
    resource: Resource,
    id: RecordId,
    payload: Json,
) -> Result<Option<RowData>> {
    let changes = into_doc(payload)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start update transaction")?;
    let Some(doc) = load_doc(&tx, resource, id)? else {
        return Ok(None);
    };
    let mut row = row_from_doc(id.0, &doc)?;
    row.fields.extend(changes);
    row.fields.remove("id");
    let text = serde_json::to_string(&row.fields).context("failed to encode document")?;
    tx.execute(
        "UPDATE record SET doc = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![text, id.0],
    )
    .with_context(|| format!("failed to update {resource} #{id}"))?;
    tx.commit().context("failed to commit update")?;
    row.fields.insert("id".to_string(), Json::from(id.0));
    Ok(Some(row))
}

pub fn toggle_active(db_path: &Path, resource: Resource, id: RecordId) -> Result<Option<RowData>> {
    let Some(row) = get_record(db_path, resource, id)? else {
        return Ok(None);
    };
    let flipped = serde_json::json!({ "active": !row.is_active() });
    update_record(db_path, resource, id, flipped)
}

/// Deletes all `ids` or nothing. Returns the first id that does not exist.
pub fn delete_records(
    db_path: &Path,
    resource: Resource,
    ids: &[RecordId],
) -> Result<Option<RecordId>> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start delete transaction")?;
    for id in ids {
        let deleted = tx
            .execute(
                "DELETE FROM record WHERE resource = ?1 AND id = ?2",
                params![resource.path(), id.0],
            )
            .with_context(|| format!("failed to delete {resource} #{id}"))?;
        if deleted == 0 {
            return Ok(Some(*id));
        }
    }
    tx.commit().context("failed to commit delete")?;
    Ok(None)
}

pub fn is_empty(db_path: &Path) -> Result<bool> {
    let conn = open_connection(db_path)?;
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM record", [], |row| row.get(0))
        .context("failed to count records")?;
    Ok(count == 0)
}

pub fn insert_many(db_path: &Path, resource: Resource, docs: Vec<Json>) -> Result<Vec<RecordId>> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start seed transaction")?;
    let mut ids = Vec::with_capacity(docs.len());
    for doc in docs {
        let row = insert_doc(&tx, resource, into_doc(doc)?)?;
        ids.push(row.id);
    }
    tx.commit().context("failed to commit seed data")?;
    Ok(ids)
}
