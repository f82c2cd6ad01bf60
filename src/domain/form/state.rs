use serde_json::Value;

use crate::domain::form::schema::{
    empty_values, seeded_entry, values_from_json, values_to_json, FieldKind, FieldSchema,
    FieldValue, FormValues, SelectOption,
};
use crate::domain::form::validate::{validate_values, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    Invalid,
    Busy,
}

#[derive(Debug)]
pub enum SubmitOutcome<T, E> {
    /// Validation failed; nothing was sent.
    Invalid,
    /// A previous submit has not finished yet.
    Busy,
    Done(Result<T, E>),
}

#[derive(Debug, Clone)]
pub struct FormState {
    schema: Vec<FieldSchema>,
    values: FormValues,
    errors: FieldErrors,
    submitting: bool,
}

impl FormState {
    pub fn new(schema: Vec<FieldSchema>) -> Self {
        let values = empty_values(&schema);
        Self {
            schema,
            values,
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn from_record(schema: Vec<FieldSchema>, record: &Value) -> Self {
        let values = match record {
            Value::Object(map) => values_from_json(&schema, map),
            _ => empty_values(&schema),
        };
        Self {
            schema,
            values,
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn schema(&self) -> &[FieldSchema] {
        &self.schema
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn value(&self, path: &str) -> Option<&FieldValue> {
        let mut segments = path.split('.');
        let mut current = self.values.get(segments.next()?)?;
        while let Some(index) = segments.next() {
            let entry = current.as_entries().get(index.parse::<usize>().ok()?)?;
            current = entry.get(segments.next()?)?;
        }
        Some(current)
    }

    /// Schema of the field at `path`; entry indexes are skipped over.
    pub fn field(&self, path: &str) -> Option<&FieldSchema> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut field = self.schema.iter().find(|f| f.key == first)?;
        while let Some(_index) = segments.next() {
            let FieldKind::DynamicList { fields } = &field.kind else {
                return None;
            };
            let key = segments.next()?;
            field = fields.iter().find(|f| f.key == key)?;
        }
        Some(field)
    }

    pub fn set_value(&mut self, path: &str, value: FieldValue) -> bool {
        let Some((slot, _)) = locate(&mut self.values, &self.schema, path) else {
            return false;
        };
        *slot = value;
        self.errors.remove(path);
        true
    }

    /// Replaces the options of every field named `key`, nested ones included.
    pub fn set_options(&mut self, key: &str, options: Vec<SelectOption>) -> bool {
        replace_options(&mut self.schema, key, &options)
    }

    /// Appends a pre-populated entry to the dynamic list at `path`.
    pub fn add_entry(&mut self, path: &str) -> Option<usize> {
        let (slot, field) = locate(&mut self.values, &self.schema, path)?;
        let FieldKind::DynamicList { fields } = &field.kind else {
            return None;
        };
        let FieldValue::Entries(entries) = slot else {
            return None;
        };
        entries.push(seeded_entry(fields));
        self.errors.remove(path);
        Some(entries.len() - 1)
    }

    pub fn remove_entry(&mut self, path: &str, index: usize) -> bool {
        let Some((FieldValue::Entries(entries), _)) = locate(&mut self.values, &self.schema, path)
        else {
            return false;
        };
        if index >= entries.len() {
            return false;
        }
        entries.remove(index);
        // entry positions shifted; stale nested messages would point at the wrong rows
        let nested = format!("{path}.");
        self.errors.retain(|key, _| !key.starts_with(&nested));
        true
    }

    pub fn validate(&mut self) -> bool {
        self.errors = validate_values(&self.schema, &self.values);
        self.errors.is_empty()
    }

    pub fn payload(&self) -> Value {
        values_to_json(&self.schema, &self.values)
    }

    /// Validates and hands the payload out; the caller reports back via
    /// [`FormState::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<Value, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::Busy);
        }
        if !self.validate() {
            return Err(SubmitBlocked::Invalid);
        }
        self.submitting = true;
        Ok(self.payload())
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    pub fn submit<T, E, F>(&mut self, send: F) -> SubmitOutcome<T, E>
    where
        F: FnOnce(Value) -> Result<T, E>,
    {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(SubmitBlocked::Busy) => return SubmitOutcome::Busy,
            Err(SubmitBlocked::Invalid) => return SubmitOutcome::Invalid,
        };
        let result = send(payload);
        self.finish_submit();
        SubmitOutcome::Done(result)
    }
}

fn locate<'v, 's>(
    values: &'v mut FormValues,
    schema: &'s [FieldSchema],
    path: &str,
) -> Option<(&'v mut FieldValue, &'s FieldSchema)> {
    let mut segments = path.split('.');
    let mut key = segments.next()?;
    let mut values = values;
    let mut schema = schema;
    loop {
        let field = schema.iter().find(|field| field.key == key)?;
        let slot = values
            .entry(key.to_string())
            .or_insert_with(|| field.kind.empty_value());
        let Some(index) = segments.next() else {
            return Some((slot, field));
        };
        let index = index.parse::<usize>().ok()?;
        let FieldKind::DynamicList { fields } = &field.kind else {
            return None;
        };
        let FieldValue::Entries(entries) = slot else {
            return None;
        };
        values = entries.get_mut(index)?;
        schema = fields;
        key = segments.next()?;
    }
}

fn replace_options(schema: &mut [FieldSchema], key: &str, options: &[SelectOption]) -> bool {
    let mut replaced = false;
    for field in schema.iter_mut() {
        if field.key == key && field.kind.set_options(options.to_vec()) {
            replaced = true;
        }
        if let FieldKind::DynamicList { fields } = &mut field.kind {
            replaced |= replace_options(fields, key, options);
        }
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn assignment_schema() -> Vec<FieldSchema> {
        vec![
            FieldSchema::new("title", "Title", FieldKind::Text).required(),
            FieldSchema::new(
                "modules",
                "Modules",
                FieldKind::DynamicList {
                    fields: vec![
                        FieldSchema::new("name", "Module name", FieldKind::Text).required(),
                        FieldSchema::new(
                            "diagramType",
                            "Diagram type",
                            FieldKind::Select {
                                options: vec![
                                    SelectOption::new("CLASS", "Class"),
                                    SelectOption::new("SEQUENCE", "Sequence"),
                                ],
                            },
                        ),
                        FieldSchema::new(
                            "solutions",
                            "Solutions",
                            FieldKind::DynamicList {
                                fields: vec![FieldSchema::new(
                                    "source",
                                    "PlantUML",
                                    FieldKind::Textarea,
                                )
                                .required()],
                            },
                        ),
                    ],
                },
            ),
        ]
    }

    #[test]
    fn adding_an_entry_prepopulates_by_kind() {
        let mut form = FormState::new(assignment_schema());
        assert_eq!(form.value("modules"), Some(&FieldValue::Entries(Vec::new())));

        assert_eq!(form.add_entry("modules"), Some(0));
        assert_eq!(
            form.value("modules.0.diagramType"),
            Some(&FieldValue::Text("CLASS".to_string()))
        );
        assert_eq!(
            form.value("modules.0.name"),
            Some(&FieldValue::Text(String::new()))
        );
        assert_eq!(
            form.value("modules.0.solutions"),
            Some(&FieldValue::Entries(Vec::new()))
        );
    }

    #[test]
    fn nested_lists_can_be_spliced() {
        let mut form = FormState::new(assignment_schema());
        form.add_entry("modules");
        assert_eq!(form.add_entry("modules.0.solutions"), Some(0));
        assert_eq!(form.add_entry("modules.0.solutions"), Some(1));
        assert!(form.set_value(
            "modules.0.solutions.1.source",
            FieldValue::Text("A -> B".to_string())
        ));

        assert!(form.remove_entry("modules.0.solutions", 0));
        assert_eq!(
            form.value("modules.0.solutions.0.source"),
            Some(&FieldValue::Text("A -> B".to_string()))
        );
        assert!(!form.remove_entry("modules.0.solutions", 5));
        assert_eq!(form.add_entry("title"), None);
    }

    #[test]
    fn required_field_blocks_submission() {
        let mut form = FormState::new(assignment_schema());
        let calls = Cell::new(0);

        let outcome = form.submit(|_| {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(())
        });

        assert!(matches!(outcome, SubmitOutcome::Invalid));
        assert_eq!(calls.get(), 0);
        assert_eq!(form.error("title"), Some("Title is required"));
    }

    #[test]
    fn valid_form_calls_service_exactly_once() {
        let mut form = FormState::new(assignment_schema());
        form.set_value("title", FieldValue::Text("Library".to_string()));
        let calls = Cell::new(0);

        let outcome = form.submit(|payload| {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(payload)
        });

        assert_eq!(calls.get(), 1);
        match outcome {
            SubmitOutcome::Done(Ok(payload)) => {
                assert_eq!(payload, json!({"title": "Library", "modules": []}));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!form.is_submitting());
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut form = FormState::new(assignment_schema());
        form.set_value("title", FieldValue::Text("Library".to_string()));

        assert!(form.begin_submit().is_ok());
        assert_eq!(form.begin_submit(), Err(SubmitBlocked::Busy));
        form.finish_submit();
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut form = FormState::new(assignment_schema());
        assert!(!form.validate());
        form.set_value("title", FieldValue::Text("Library".to_string()));
        assert_eq!(form.error("title"), None);
    }

    #[test]
    fn options_can_be_loaded_later() {
        let mut form = FormState::new(assignment_schema());
        assert!(form.set_options("diagramType", vec![SelectOption::new("USECASE", "Use case")]));
        form.add_entry("modules");
        assert_eq!(
            form.value("modules.0.diagramType"),
            Some(&FieldValue::Text("USECASE".to_string()))
        );
        assert!(!form.set_options("title", Vec::new()));
    }

    #[test]
    fn nested_field_schema_is_found_by_path() {
        let form = FormState::new(assignment_schema());
        assert_eq!(
            form.field("modules.3.solutions.0.source").map(|f| f.label.as_str()),
            Some("PlantUML")
        );
        assert!(form.field("title.0.name").is_none());
        assert!(form.field("missing").is_none());
    }

    #[test]
    fn edit_form_reads_existing_record() {
        let record = json!({
            "id": 4,
            "title": "Library",
            "modules": [{"name": "Classes", "diagramType": "CLASS", "solutions": []}]
        });
        let form = FormState::from_record(assignment_schema(), &record);
        assert_eq!(
            form.value("modules.0.name"),
            Some(&FieldValue::Text("Classes".to_string()))
        );
    }
}
