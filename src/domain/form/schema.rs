use std::collections::BTreeMap;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::entities::record::{value_as_i64, value_to_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Option<f64>),
    Keys(Vec<String>),
    Entries(Vec<FormValues>),
}

impl FieldValue {
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(text) => text,
            _ => "",
        }
    }

    pub fn as_keys(&self) -> &[String] {
        match self {
            FieldValue::Keys(keys) => keys,
            _ => &[],
        }
    }

    pub fn as_entries(&self) -> &[FormValues] {
        match self {
            FieldValue::Entries(entries) => entries,
            _ => &[],
        }
    }
}

pub type FormValues = BTreeMap<String, FieldValue>;

pub type CheckFn = dyn Fn(&FieldValue, &FormValues) -> Result<(), String> + Send + Sync;

/// Named validator function; the name only shows up in debug output.
#[derive(Clone)]
pub struct CustomRule {
    pub name: &'static str,
    pub check: Arc<CheckFn>,
}

impl std::fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRule").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    MinLength(usize),
    MaxLength(usize),
    Pattern { regex: Regex, message: String },
    Range { min: Option<f64>, max: Option<f64> },
    Custom(CustomRule),
}

impl Rule {
    pub fn custom<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&FieldValue, &FormValues) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Custom(CustomRule {
            name,
            check: Arc::new(check),
        })
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Textarea,
    Password,
    RichText,
    Date,
    DateTime,
    Number { min: Option<f64>, max: Option<f64> },
    Select { options: Vec<SelectOption> },
    MultiSelect { options: Vec<SelectOption> },
    DualList { options: Vec<SelectOption> },
    DynamicList { fields: Vec<FieldSchema> },
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Grid columns out of 24.
    pub span: u8,
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            required: false,
            span: 24,
            rules: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn span(mut self, span: u8) -> Self {
        self.span = span.clamp(1, 24);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl FieldKind {
    pub fn options(&self) -> &[SelectOption] {
        match self {
            FieldKind::Select { options }
            | FieldKind::MultiSelect { options }
            | FieldKind::DualList { options } => options,
            _ => &[],
        }
    }

    pub fn set_options(&mut self, replacement: Vec<SelectOption>) -> bool {
        match self {
            FieldKind::Select { options }
            | FieldKind::MultiSelect { options }
            | FieldKind::DualList { options } => {
                *options = replacement;
                true
            }
            _ => false,
        }
    }

    /// Value of a blank top-level form.
    pub fn empty_value(&self) -> FieldValue {
        match self {
            FieldKind::Number { .. } => FieldValue::Number(None),
            FieldKind::MultiSelect { .. } | FieldKind::DualList { .. } => {
                FieldValue::Keys(Vec::new())
            }
            FieldKind::DynamicList { .. } => FieldValue::Entries(Vec::new()),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// Value of a freshly added dynamic-list entry: selects start on their first option.
    pub fn seed_value(&self) -> FieldValue {
        match self {
            FieldKind::Select { options } => FieldValue::Text(
                options
                    .first()
                    .map(|option| option.value.clone())
                    .unwrap_or_default(),
            ),
            other => other.empty_value(),
        }
    }

    pub fn is_empty(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldKind::RichText, FieldValue::Text(html)) => strip_tags(html).trim().is_empty(),
            (_, FieldValue::Text(text)) => text.trim().is_empty(),
            (_, FieldValue::Number(number)) => number.is_none(),
            (_, FieldValue::Keys(keys)) => keys.is_empty(),
            (_, FieldValue::Entries(entries)) => entries.is_empty(),
        }
    }

    pub fn to_json(&self, value: &FieldValue) -> Value {
        match (self, value) {
            (FieldKind::Number { .. }, FieldValue::Number(Some(number))) => {
                serde_json::Number::from_f64(*number)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
            (FieldKind::Number { .. }, _) => Value::Null,
            (FieldKind::Select { .. }, FieldValue::Text(text)) => {
                if text.is_empty() {
                    Value::Null
                } else {
                    key_to_json(text)
                }
            }
            (_, FieldValue::Text(text)) => Value::String(text.clone()),
            (_, FieldValue::Keys(keys)) => Value::Array(keys.iter().map(|k| key_to_json(k)).collect()),
            (FieldKind::DynamicList { fields }, FieldValue::Entries(entries)) => Value::Array(
                entries
                    .iter()
                    .map(|entry| values_to_json(fields, entry))
                    .collect(),
            ),
            (_, FieldValue::Entries(_)) => Value::Array(Vec::new()),
            (_, FieldValue::Number(number)) => number
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }

    pub fn from_json(&self, value: Option<&Value>) -> FieldValue {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return self.empty_value();
        };
        match self {
            FieldKind::Number { .. } => FieldValue::Number(match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
            FieldKind::Select { .. } => FieldValue::Text(json_to_key(value)),
            FieldKind::MultiSelect { .. } | FieldKind::DualList { .. } => FieldValue::Keys(
                match value {
                    Value::Array(items) => items.iter().map(json_to_key).collect(),
                    other => vec![json_to_key(other)],
                }
                .into_iter()
                .filter(|key| !key.is_empty())
                .collect(),
            ),
            FieldKind::DynamicList { fields } => FieldValue::Entries(match value {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|item| values_from_json(fields, item))
                    .collect(),
                _ => Vec::new(),
            }),
            _ => FieldValue::Text(value_to_text(value)),
        }
    }
}

pub fn values_to_json(schema: &[FieldSchema], values: &FormValues) -> Value {
    let mut map = Map::new();
    for field in schema {
        let value = values
            .get(&field.key)
            .cloned()
            .unwrap_or_else(|| field.kind.empty_value());
        // a blank password on an edit form means "keep the current one"
        if matches!(field.kind, FieldKind::Password) && field.kind.is_empty(&value) {
            continue;
        }
        map.insert(field.key.clone(), field.kind.to_json(&value));
    }
    Value::Object(map)
}

pub fn values_from_json(schema: &[FieldSchema], record: &Map<String, Value>) -> FormValues {
    schema
        .iter()
        .map(|field| {
            let value = if matches!(field.kind, FieldKind::Password) {
                field.kind.empty_value()
            } else {
                field.kind.from_json(record.get(&field.key))
            };
            (field.key.clone(), value)
        })
        .collect()
}

pub fn empty_values(schema: &[FieldSchema]) -> FormValues {
    schema
        .iter()
        .map(|field| (field.key.clone(), field.kind.empty_value()))
        .collect()
}

pub fn seeded_entry(schema: &[FieldSchema]) -> FormValues {
    schema
        .iter()
        .map(|field| (field.key.clone(), field.kind.seed_value()))
        .collect()
}

fn key_to_json(key: &str) -> Value {
    match key.parse::<i64>() {
        Ok(number) => Value::from(number),
        Err(_) => Value::String(key.to_string()),
    }
}

fn json_to_key(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .get("id")
            .and_then(value_as_i64)
            .map(|id| id.to_string())
            .or_else(|| map.get("value").map(value_to_text))
            .unwrap_or_default(),
        other => value_to_text(other),
    }
}

pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Vec<SelectOption> {
        vec![SelectOption::new("1", "Class"), SelectOption::new("2", "Sequence")]
    }

    #[test]
    fn seed_value_picks_first_option_for_selects_only() {
        let select = FieldKind::Select { options: options() };
        assert_eq!(select.seed_value(), FieldValue::Text("1".to_string()));
        assert_eq!(select.empty_value(), FieldValue::Text(String::new()));
        assert_eq!(FieldKind::Text.seed_value(), FieldValue::Text(String::new()));
        assert_eq!(
            FieldKind::Number { min: None, max: None }.seed_value(),
            FieldValue::Number(None)
        );
        assert_eq!(
            FieldKind::DualList { options: options() }.seed_value(),
            FieldValue::Keys(Vec::new())
        );
    }

    #[test]
    fn rich_text_with_only_markup_is_empty() {
        let kind = FieldKind::RichText;
        assert!(kind.is_empty(&FieldValue::Text("<p><br></p>".to_string())));
        assert!(kind.is_empty(&FieldValue::Text("<p>&nbsp;</p>".to_string())));
        assert!(!kind.is_empty(&FieldValue::Text("<p>Draw it</p>".to_string())));
    }

    #[test]
    fn numeric_keys_are_sent_as_numbers() {
        let kind = FieldKind::DualList { options: options() };
        let value = FieldValue::Keys(vec!["1".to_string(), "VIEW".to_string()]);
        assert_eq!(kind.to_json(&value), json!([1, "VIEW"]));
    }

    #[test]
    fn list_values_read_ids_from_objects() {
        let kind = FieldKind::MultiSelect { options: options() };
        let value = kind.from_json(Some(&json!([{"id": 2, "name": "TEACHER"}, 5])));
        assert_eq!(value, FieldValue::Keys(vec!["2".to_string(), "5".to_string()]));
    }

    #[test]
    fn nested_entries_convert_both_ways() {
        let schema = vec![FieldSchema::new(
            "modules",
            "Modules",
            FieldKind::DynamicList {
                fields: vec![
                    FieldSchema::new("title", "Title", FieldKind::Text),
                    FieldSchema::new("weight", "Weight", FieldKind::Number { min: None, max: None }),
                ],
            },
        )];
        let record = json!({"modules": [{"title": "Use cases", "weight": 2.0}]});
        let values = values_from_json(&schema, record.as_object().expect("object"));
        assert_eq!(values_to_json(&schema, &values), record);
    }

    #[test]
    fn blank_password_is_left_out_of_payload() {
        let schema = vec![
            FieldSchema::new("username", "Username", FieldKind::Text),
            FieldSchema::new("password", "Password", FieldKind::Password),
        ];
        let record = json!({"username": "teacher1", "password": "hash"});
        let values = values_from_json(&schema, record.as_object().expect("object"));
        assert_eq!(values_to_json(&schema, &values), json!({"username": "teacher1"}));
    }
}
