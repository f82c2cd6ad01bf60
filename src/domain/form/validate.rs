use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::form::schema::{FieldKind, FieldSchema, FieldValue, FormValues, Rule};
use crate::messages;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Error message per field path (`title`, `modules.0.name`).
pub type FieldErrors = BTreeMap<String, String>;

pub fn validate_values(schema: &[FieldSchema], values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    validate_level(schema, values, values, "", &mut errors);
    errors
}

fn validate_level(
    schema: &[FieldSchema],
    values: &FormValues,
    root: &FormValues,
    prefix: &str,
    errors: &mut FieldErrors,
) {
    for field in schema {
        let path = format!("{prefix}{}", field.key);
        let fallback;
        let value = match values.get(&field.key) {
            Some(value) => value,
            None => {
                fallback = field.kind.empty_value();
                &fallback
            }
        };

        if let Some(message) = first_failure(field, value, root) {
            errors.insert(path.clone(), message);
            continue;
        }

        if let (FieldKind::DynamicList { fields }, FieldValue::Entries(entries)) =
            (&field.kind, value)
        {
            for (idx, entry) in entries.iter().enumerate() {
                validate_level(fields, entry, root, &format!("{path}.{idx}."), errors);
            }
        }
    }
}

fn first_failure(field: &FieldSchema, value: &FieldValue, root: &FormValues) -> Option<String> {
    let label = field.label.as_str();
    if field.kind.is_empty(value) {
        return field.required.then(|| messages::required(label));
    }

    if let Some(message) = kind_failure(field, value) {
        return Some(message);
    }

    field
        .rules
        .iter()
        .find_map(|rule| rule_failure(label, rule, value, root))
}

fn kind_failure(field: &FieldSchema, value: &FieldValue) -> Option<String> {
    let label = field.label.as_str();
    match (&field.kind, value) {
        (FieldKind::Date, FieldValue::Text(text)) => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
            .err()
            .map(|_| messages::invalid_date(label)),
        (FieldKind::DateTime, FieldValue::Text(text)) => {
            NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT)
                .err()
                .map(|_| messages::invalid_datetime(label))
        }
        (FieldKind::Number { min, max }, FieldValue::Number(Some(number))) => {
            let below = min.is_some_and(|min| *number < min);
            let above = max.is_some_and(|max| *number > max);
            (below || above).then(|| messages::out_of_range(label, *min, *max))
        }
        (FieldKind::Select { options }, FieldValue::Text(text)) if !options.is_empty() => {
            (!options.iter().any(|option| &option.value == text))
                .then(|| messages::invalid_format(label))
        }
        _ => None,
    }
}

fn rule_failure(
    label: &str,
    rule: &Rule,
    value: &FieldValue,
    root: &FormValues,
) -> Option<String> {
    match rule {
        Rule::MinLength(min) => {
            (measured_len(value) < *min).then(|| messages::min_length(label, *min))
        }
        Rule::MaxLength(max) => {
            (measured_len(value) > *max).then(|| messages::max_length(label, *max))
        }
        Rule::Pattern { regex, message } => {
            (!regex.is_match(value.as_text().trim())).then(|| message.clone())
        }
        Rule::Range { min, max } => {
            let number = match value {
                FieldValue::Number(number) => *number,
                FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
                _ => None,
            }?;
            let below = min.is_some_and(|min| number < min);
            let above = max.is_some_and(|max| number > max);
            (below || above).then(|| messages::out_of_range(label, *min, *max))
        }
        Rule::Custom(custom) => (custom.check)(value, root).err(),
    }
}

fn measured_len(value: &FieldValue) -> usize {
    match value {
        FieldValue::Text(text) => text.trim().chars().count(),
        FieldValue::Keys(keys) => keys.len(),
        FieldValue::Entries(entries) => entries.len(),
        FieldValue::Number(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::schema::SelectOption;
    use regex::Regex;

    fn assignment_schema() -> Vec<FieldSchema> {
        vec![
            FieldSchema::new("title", "Title", FieldKind::Text)
                .required()
                .rule(Rule::MinLength(3)),
            FieldSchema::new("dueAt", "Due", FieldKind::DateTime),
            FieldSchema::new(
                "maxScore",
                "Max score",
                FieldKind::Number {
                    min: Some(0.0),
                    max: Some(100.0),
                },
            ),
            FieldSchema::new(
                "modules",
                "Modules",
                FieldKind::DynamicList {
                    fields: vec![FieldSchema::new("name", "Module name", FieldKind::Text).required()],
                },
            )
            .required(),
        ]
    }

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    #[test]
    fn required_fields_report_one_message_each() {
        let errors = validate_values(&assignment_schema(), &FormValues::new());
        assert_eq!(errors.get("title").map(String::as_str), Some("Title is required"));
        assert_eq!(
            errors.get("modules").map(String::as_str),
            Some("Modules is required")
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn only_first_failing_rule_is_kept() {
        let schema = vec![FieldSchema::new("code", "Code", FieldKind::Text)
            .rule(Rule::MinLength(4))
            .rule(Rule::Pattern {
                regex: Regex::new("^[A-Z_]+$").expect("regex"),
                message: "Code must be upper case".to_string(),
            })];
        let mut values = FormValues::new();
        values.insert("code".to_string(), text("ab"));

        let errors = validate_values(&schema, &values);
        assert_eq!(
            errors.get("code").map(String::as_str),
            Some("Code must be at least 4 characters")
        );
    }

    #[test]
    fn nested_entries_are_keyed_by_path() {
        let mut entry = FormValues::new();
        entry.insert("name".to_string(), text(""));
        let mut values = FormValues::new();
        values.insert("title".to_string(), text("Library system"));
        values.insert("modules".to_string(), FieldValue::Entries(vec![entry]));

        let errors = validate_values(&assignment_schema(), &values);
        assert_eq!(
            errors.get("modules.0.name").map(String::as_str),
            Some("Module name is required")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn kind_checks_cover_dates_numbers_and_options() {
        let schema = vec![
            FieldSchema::new("dueAt", "Due", FieldKind::DateTime),
            FieldSchema::new("openOn", "Open", FieldKind::Date),
            FieldSchema::new("score", "Score", FieldKind::Number { min: Some(0.0), max: Some(10.0) }),
            FieldSchema::new(
                "type",
                "Type",
                FieldKind::Select {
                    options: vec![SelectOption::new("SINGLE", "Single choice")],
                },
            ),
        ];
        let mut values = FormValues::new();
        values.insert("dueAt".to_string(), text("2026-10-18 10:00"));
        values.insert("openOn".to_string(), text("2026-02-30"));
        values.insert("score".to_string(), FieldValue::Number(Some(11.0)));
        values.insert("type".to_string(), text("ESSAY"));

        let errors = validate_values(&schema, &values);
        assert_eq!(errors.len(), 4);

        values.insert("dueAt".to_string(), text("2026-10-18T10:00"));
        values.insert("openOn".to_string(), text("2026-02-28"));
        values.insert("score".to_string(), FieldValue::Number(Some(10.0)));
        values.insert("type".to_string(), text("SINGLE"));
        assert!(validate_values(&schema, &values).is_empty());
    }

    #[test]
    fn custom_rules_see_the_whole_form() {
        let schema = vec![
            FieldSchema::new("password", "Password", FieldKind::Password),
            FieldSchema::new("confirm", "Confirm", FieldKind::Password).rule(Rule::custom(
                "matches_password",
                |value, form| {
                    let password = form.get("password").map(FieldValue::as_text).unwrap_or("");
                    if value.as_text() == password {
                        Ok(())
                    } else {
                        Err("Passwords do not match".to_string())
                    }
                },
            )),
        ];
        let mut values = FormValues::new();
        values.insert("password".to_string(), text("s3cret"));
        values.insert("confirm".to_string(), text("secret"));

        let errors = validate_values(&schema, &values);
        assert_eq!(
            errors.get("confirm").map(String::as_str),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn range_rule_applies_to_text_numbers_too() {
        let schema = vec![FieldSchema::new("weight", "Weight", FieldKind::Text)
            .rule(Rule::Range { min: Some(1.0), max: None })];
        let mut values = FormValues::new();
        values.insert("weight".to_string(), text("0.5"));
        assert_eq!(
            validate_values(&schema, &values).get("weight").map(String::as_str),
            Some("Weight must be at least 1")
        );

        values.insert("weight".to_string(), text("abc"));
        assert!(validate_values(&schema, &values).is_empty());
    }
}
