use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub i64);

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entity as the backend returned it. Tables only read it; changes go
/// through the action handlers and a refetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RowData {
    pub id: RecordId,
    pub fields: Map<String, Value>,
}

impl RowData {
    pub fn from_json(value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        let id = fields.get("id").and_then(value_as_i64)?;
        Some(Self {
            id: RecordId(id),
            fields,
        })
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Looks up a dotted path such as `group.name` or `modules.0.title`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn text(&self, path: &str) -> String {
        self.get(path).map(value_to_text).unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        match self.get("active") {
            Some(Value::Bool(active)) => *active,
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("active") || s == "true",
            _ => false,
        }
    }
}

pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => map
                    .get("name")
                    .or_else(|| map.get("title"))
                    .map(value_to_text)
                    .unwrap_or_default(),
                other => value_to_text(other),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("title"))
            .map(value_to_text)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_requires_numeric_id() {
        assert!(RowData::from_json(json!({"name": "x"})).is_none());
        let row = RowData::from_json(json!({"id": "7", "name": "x"})).expect("string id parses");
        assert_eq!(row.id, RecordId(7));
    }

    #[test]
    fn dotted_paths_reach_nested_values() {
        let row = RowData::from_json(json!({
            "id": 1,
            "group": {"name": "UML basics"},
            "modules": [{"title": "Class diagram"}]
        }))
        .expect("row");

        assert_eq!(row.text("group.name"), "UML basics");
        assert_eq!(row.text("modules.0.title"), "Class diagram");
        assert_eq!(row.text("modules.3.title"), "");
    }

    #[test]
    fn arrays_of_objects_render_their_names() {
        let row = RowData::from_json(json!({
            "id": 1,
            "roles": [{"name": "ADMIN"}, {"name": "TEACHER"}]
        }))
        .expect("row");
        assert_eq!(row.text("roles"), "ADMIN, TEACHER");
    }

    #[test]
    fn active_flag_accepts_bool_number_and_text() {
        for (raw, expected) in [
            (json!(true), true),
            (json!(0), false),
            (json!("ACTIVE"), true),
            (json!("inactive"), false),
        ] {
            let row = RowData::from_json(json!({"id": 1, "active": raw})).expect("row");
            assert_eq!(row.is_active(), expected);
        }
    }
}
