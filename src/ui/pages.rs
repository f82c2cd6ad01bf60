//! Declarative description of every management page: table columns, search
//! fields, row actions and the create/edit form.

use chrono::NaiveDateTime;
use regex::Regex;
use serde_json::Value;

use crate::domain::entities::listing::{FilterState, FilterValue};
use crate::domain::entities::resource::Resource;
use crate::domain::entities::record::RowData;
use crate::domain::form::schema::{
    FieldKind, FieldSchema, FieldValue, FormValues, Rule, SelectOption,
};
use crate::domain::url_state::UrlStateConfig;
use crate::usecase::services::action_service::{
    plain_class, status_class, ActionKind, Mutation, RowAction,
};
use crate::usecase::services::import_service::QUESTION_TYPES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRender {
    Plain,
    /// Active/inactive badge from the `active` flag.
    Status,
    DateTime,
    /// Length of an array field.
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub key: &'static str,
    pub title: &'static str,
    pub sortable: bool,
    pub render: CellRender,
}

const fn column(key: &'static str, title: &'static str, render: CellRender) -> ColumnDef {
    ColumnDef {
        key,
        title,
        sortable: true,
        render,
    }
}

impl ColumnDef {
    pub const fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn render_cell(&self, row: &RowData) -> String {
        match self.render {
            CellRender::Plain => row.text(self.key),
            CellRender::Status => if row.is_active() { "Active" } else { "Inactive" }.to_string(),
            CellRender::DateTime => format_datetime(&row.text(self.key)),
            CellRender::Count => match row.get(self.key) {
                Some(Value::Array(items)) => items.len().to_string(),
                _ => "0".to_string(),
            },
        }
    }
}

pub fn format_datetime(raw: &str) -> String {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .map(|parsed| parsed.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// A form field whose options are loaded from another resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSource {
    pub field: &'static str,
    pub resource: Resource,
    pub value_key: &'static str,
    pub label_key: &'static str,
}

#[derive(Debug, Clone)]
pub struct PageConfig {
    pub resource: Resource,
    pub columns: Vec<ColumnDef>,
    pub search: Vec<FieldSchema>,
    pub actions: Vec<RowAction>,
    pub form: Vec<FieldSchema>,
    pub option_sources: Vec<OptionSource>,
    pub bulk_delete: bool,
    pub can_create: bool,
    pub importable: bool,
}

impl PageConfig {
    pub fn url_config(&self, default_limit: u32) -> UrlStateConfig {
        self.search
            .iter()
            .filter(|field| matches!(field.kind, FieldKind::MultiSelect { .. }))
            .fold(UrlStateConfig::new(default_limit), |config, field| {
                config.with_multi_key(field.key.clone())
            })
    }

    /// Search form values to filters; blanks are dropped.
    pub fn filters_from_values(&self, values: &FormValues) -> FilterState {
        let mut filters = FilterState::new();
        for field in &self.search {
            let value = match values.get(&field.key) {
                Some(FieldValue::Keys(keys)) => FilterValue::Multi(keys.clone()),
                Some(FieldValue::Text(text)) => FilterValue::Single(text.trim().to_string()),
                _ => continue,
            };
            filters.set(field.key.clone(), value);
        }
        filters
    }

    /// Pre-fills the search form from the URL.
    pub fn values_from_filters(&self, filters: &FilterState) -> FormValues {
        self.search
            .iter()
            .map(|field| {
                let value = match (&field.kind, filters.get(&field.key)) {
                    (FieldKind::MultiSelect { .. }, Some(value)) => FieldValue::Keys(value.values()),
                    (_, Some(value)) => FieldValue::Text(value.joined()),
                    (kind, None) => kind.empty_value(),
                };
                (field.key.clone(), value)
            })
            .collect()
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.key == key)
    }
}

const EDIT: RowAction = RowAction {
    id: "edit",
    icon: "✎",
    tooltip: "Edit",
    class: plain_class,
    kind: ActionKind::Navigate { path: "" },
};

const TOGGLE: RowAction = RowAction {
    id: "toggle",
    icon: "⏻",
    tooltip: "Activate / deactivate",
    class: status_class,
    kind: ActionKind::Mutate {
        confirm: true,
        mutation: Mutation::ToggleStatus,
    },
};

const DELETE: RowAction = RowAction {
    id: "delete",
    icon: "🗑",
    tooltip: "Delete",
    class: plain_class,
    kind: ActionKind::Mutate {
        confirm: true,
        mutation: Mutation::Delete,
    },
};

fn edit(path: &'static str) -> RowAction {
    RowAction {
        kind: ActionKind::Navigate { path },
        ..EDIT
    }
}

fn options(pairs: &[(&str, &str)]) -> Vec<SelectOption> {
    pairs
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect()
}

fn status_search() -> FieldSchema {
    FieldSchema::new(
        "active",
        "Status",
        FieldKind::Select {
            options: options(&[("true", "Active"), ("false", "Inactive")]),
        },
    )
}

fn text_search(key: &str, label: &str) -> FieldSchema {
    FieldSchema::new(key, label, FieldKind::Text).span(6)
}

fn code_pattern() -> Rule {
    match Regex::new("^[A-Z][A-Z0-9_]*$") {
        Ok(regex) => Rule::Pattern {
            regex,
            message: "Use upper case letters, digits and underscores".to_string(),
        },
        Err(_) => Rule::MaxLength(64),
    }
}

fn email_pattern() -> Rule {
    match Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$") {
        Ok(regex) => Rule::Pattern {
            regex,
            message: "Enter a valid email address".to_string(),
        },
        Err(_) => Rule::MaxLength(254),
    }
}

fn question_types() -> Vec<SelectOption> {
    QUESTION_TYPES
        .iter()
        .map(|kind| {
            let label = match *kind {
                "SINGLE_CHOICE" => "Single choice",
                "MULTIPLE_CHOICE" => "Multiple choice",
                _ => "Essay",
            };
            SelectOption::new(*kind, label)
        })
        .collect()
}

fn diagram_types() -> Vec<SelectOption> {
    options(&[
        ("CLASS", "Class"),
        ("SEQUENCE", "Sequence"),
        ("USECASE", "Use case"),
        ("ACTIVITY", "Activity"),
        ("STATE", "State"),
    ])
}

pub fn page_config(resource: Resource) -> PageConfig {
    let base = PageConfig {
        resource,
        columns: Vec::new(),
        search: Vec::new(),
        actions: Vec::new(),
        form: Vec::new(),
        option_sources: Vec::new(),
        bulk_delete: true,
        can_create: true,
        importable: false,
    };
    match resource {
        Resource::Permissions => PageConfig {
            columns: vec![
                column("code", "Code", CellRender::Plain),
                column("name", "Name", CellRender::Plain),
                column("description", "Description", CellRender::Plain).unsortable(),
                column("active", "Status", CellRender::Status),
                column("createdAt", "Created", CellRender::DateTime),
            ],
            search: vec![
                text_search("code", "Code"),
                text_search("name", "Name"),
                status_search(),
            ],
            actions: vec![edit("/permissions/:id/edit"), TOGGLE, DELETE],
            form: vec![
                FieldSchema::new("code", "Code", FieldKind::Text)
                    .required()
                    .span(12)
                    .rule(Rule::MaxLength(64))
                    .rule(code_pattern()),
                FieldSchema::new("name", "Name", FieldKind::Text)
                    .required()
                    .span(12)
                    .rule(Rule::MaxLength(120)),
                FieldSchema::new("description", "Description", FieldKind::Textarea)
                    .rule(Rule::MaxLength(500)),
            ],
            ..base
        },
        Resource::Roles => PageConfig {
            columns: vec![
                column("name", "Name", CellRender::Plain),
                column("description", "Description", CellRender::Plain).unsortable(),
                column("permissions", "Permissions", CellRender::Count).unsortable(),
                column("active", "Status", CellRender::Status),
                column("createdAt", "Created", CellRender::DateTime),
            ],
            search: vec![text_search("name", "Name"), status_search()],
            actions: vec![edit("/roles/:id/edit"), TOGGLE, DELETE],
            form: vec![
                FieldSchema::new("name", "Name", FieldKind::Text)
                    .required()
                    .span(12)
                    .rule(code_pattern()),
                FieldSchema::new("description", "Description", FieldKind::Text).span(12),
                FieldSchema::new(
                    "permissions",
                    "Permissions",
                    FieldKind::DualList {
                        options: Vec::new(),
                    },
                ),
            ],
            option_sources: vec![OptionSource {
                field: "permissions",
                resource: Resource::Permissions,
                value_key: "code",
                label_key: "name",
            }],
            ..base
        },
        Resource::Users => PageConfig {
            columns: vec![
                column("username", "Username", CellRender::Plain),
                column("fullName", "Full name", CellRender::Plain),
                column("email", "Email", CellRender::Plain),
                column("roles", "Roles", CellRender::Plain).unsortable(),
                column("active", "Status", CellRender::Status),
                column("createdAt", "Created", CellRender::DateTime),
            ],
            search: vec![
                text_search("username", "Username"),
                text_search("email", "Email"),
                FieldSchema::new(
                    "roles",
                    "Roles",
                    FieldKind::MultiSelect {
                        options: options(&[
                            ("ADMIN", "Admin"),
                            ("TEACHER", "Teacher"),
                            ("STUDENT", "Student"),
                        ]),
                    },
                ),
                status_search(),
            ],
            actions: vec![edit("/users/:id/edit"), TOGGLE, DELETE],
            form: vec![
                FieldSchema::new("username", "Username", FieldKind::Text)
                    .required()
                    .span(12)
                    .rule(Rule::MinLength(3))
                    .rule(Rule::MaxLength(50)),
                FieldSchema::new("fullName", "Full name", FieldKind::Text)
                    .required()
                    .span(12),
                FieldSchema::new("email", "Email", FieldKind::Text)
                    .required()
                    .span(12)
                    .rule(email_pattern()),
                FieldSchema::new("password", "Password", FieldKind::Password)
                    .span(12)
                    .rule(Rule::MinLength(8)),
                FieldSchema::new(
                    "roles",
                    "Roles",
                    FieldKind::MultiSelect {
                        options: Vec::new(),
                    },
                )
                .required(),
            ],
            option_sources: vec![OptionSource {
                field: "roles",
                resource: Resource::Roles,
                value_key: "name",
                label_key: "description",
            }],
            ..base
        },
        Resource::QuestionGroups => PageConfig {
            columns: vec![
                column("name", "Name", CellRender::Plain),
                column("description", "Description", CellRender::Plain).unsortable(),
                column("active", "Status", CellRender::Status),
                column("createdAt", "Created", CellRender::DateTime),
            ],
            search: vec![text_search("name", "Name"), status_search()],
            actions: vec![edit("/question-groups/:id/edit"), TOGGLE, DELETE],
            form: vec![
                FieldSchema::new("name", "Name", FieldKind::Text)
                    .required()
                    .rule(Rule::MaxLength(120)),
                FieldSchema::new("description", "Description", FieldKind::Textarea),
            ],
            ..base
        },
        Resource::Questions => PageConfig {
            columns: vec![
                column("id", "#", CellRender::Plain),
                column("content", "Question", CellRender::Plain).unsortable(),
                column("type", "Type", CellRender::Plain),
                column("groupId", "Bank", CellRender::Plain),
                column("options", "Options", CellRender::Count).unsortable(),
                column("active", "Status", CellRender::Status),
            ],
            search: vec![
                text_search("content", "Question"),
                FieldSchema::new(
                    "type",
                    "Type",
                    FieldKind::Select {
                        options: question_types(),
                    },
                ),
                text_search("groupId", "Bank id"),
            ],
            actions: vec![edit("/questions/:id/edit"), TOGGLE, DELETE],
            form: vec![
                FieldSchema::new("content", "Question", FieldKind::RichText).required(),
                FieldSchema::new(
                    "type",
                    "Type",
                    FieldKind::Select {
                        options: question_types(),
                    },
                )
                .required()
                .span(12)
                .rule(Rule::custom("choice_needs_answer", |value, form| {
                    let answer = form.get("answer").map(FieldValue::as_text).unwrap_or("");
                    if value.as_text() != "ESSAY" && answer.trim().is_empty() {
                        Err("Choice questions need an answer".to_string())
                    } else {
                        Ok(())
                    }
                })),
                FieldSchema::new(
                    "groupId",
                    "Question bank",
                    FieldKind::Select {
                        options: Vec::new(),
                    },
                )
                .required()
                .span(12),
                FieldSchema::new(
                    "options",
                    "Options",
                    FieldKind::DynamicList {
                        fields: vec![FieldSchema::new("text", "Option", FieldKind::Text).required()],
                    },
                ),
                FieldSchema::new("answer", "Answer", FieldKind::Text),
            ],
            option_sources: vec![OptionSource {
                field: "groupId",
                resource: Resource::QuestionGroups,
                value_key: "id",
                label_key: "name",
            }],
            importable: true,
            ..base
        },
        Resource::TestSets => PageConfig {
            columns: vec![
                column("title", "Title", CellRender::Plain),
                column("description", "Description", CellRender::Plain).unsortable(),
                column("questions", "Questions", CellRender::Count).unsortable(),
                column("active", "Status", CellRender::Status),
                column("createdAt", "Created", CellRender::DateTime),
            ],
            search: vec![text_search("title", "Title"), status_search()],
            actions: vec![edit("/test-sets/:id/edit"), TOGGLE, DELETE],
            form: vec![
                FieldSchema::new("title", "Title", FieldKind::Text).required(),
                FieldSchema::new("description", "Description", FieldKind::Textarea),
                FieldSchema::new(
                    "questions",
                    "Questions",
                    FieldKind::DualList {
                        options: Vec::new(),
                    },
                )
                .required(),
            ],
            option_sources: vec![OptionSource {
                field: "questions",
                resource: Resource::Questions,
                value_key: "id",
                label_key: "content",
            }],
            ..base
        },
        Resource::Assignments => PageConfig {
            columns: vec![
                column("title", "Title", CellRender::Plain),
                column("dueDate", "Due", CellRender::Plain),
                column("maxScore", "Max score", CellRender::Plain),
                column("modules", "Modules", CellRender::Count).unsortable(),
                column("active", "Status", CellRender::Status),
            ],
            search: vec![text_search("title", "Title"), status_search()],
            actions: vec![
                edit("/assignments/:id/edit"),
                RowAction {
                    id: "submissions",
                    icon: "☰",
                    tooltip: "Submissions",
                    class: plain_class,
                    kind: ActionKind::Navigate {
                        path: "/submissions?assignmentId=:id",
                    },
                },
                RowAction {
                    id: "submit",
                    icon: "⇪",
                    tooltip: "Submit a diagram",
                    class: plain_class,
                    kind: ActionKind::Navigate {
                        path: "/assignments/:id/submit",
                    },
                },
                TOGGLE,
                DELETE,
            ],
            form: vec![
                FieldSchema::new("title", "Title", FieldKind::Text)
                    .required()
                    .rule(Rule::MaxLength(200)),
                FieldSchema::new("description", "Description", FieldKind::RichText),
                FieldSchema::new("dueDate", "Due date", FieldKind::Date)
                    .required()
                    .span(12),
                FieldSchema::new(
                    "maxScore",
                    "Max score",
                    FieldKind::Number {
                        min: Some(1.0),
                        max: Some(100.0),
                    },
                )
                .required()
                .span(12),
                FieldSchema::new(
                    "modules",
                    "Modules",
                    FieldKind::DynamicList {
                        fields: vec![
                            FieldSchema::new("name", "Module name", FieldKind::Text)
                                .required()
                                .span(12),
                            FieldSchema::new(
                                "diagramType",
                                "Diagram type",
                                FieldKind::Select {
                                    options: diagram_types(),
                                },
                            )
                            .span(12),
                            FieldSchema::new(
                                "solutions",
                                "Reference solutions",
                                FieldKind::DynamicList {
                                    fields: vec![FieldSchema::new(
                                        "source",
                                        "PlantUML source",
                                        FieldKind::Textarea,
                                    )
                                    .required()],
                                },
                            ),
                        ],
                    },
                )
                .required(),
            ],
            ..base
        },
        Resource::Submissions => PageConfig {
            columns: vec![
                column("id", "#", CellRender::Plain),
                column("assignmentId", "Assignment", CellRender::Plain),
                column("moduleId", "Module", CellRender::Plain),
                column("student", "Student", CellRender::Plain),
                column("status", "Status", CellRender::Plain),
                column("score", "Score", CellRender::Plain),
                column("submittedAt", "Submitted", CellRender::DateTime),
            ],
            search: vec![
                text_search("assignmentId", "Assignment id"),
                text_search("student", "Student"),
                FieldSchema::new(
                    "status",
                    "Status",
                    FieldKind::Select {
                        options: options(&[("SUBMITTED", "Submitted"), ("GRADED", "Graded")]),
                    },
                ),
            ],
            actions: vec![
                RowAction {
                    id: "grade",
                    icon: "✓",
                    tooltip: "Grade",
                    class: plain_class,
                    kind: ActionKind::Navigate {
                        path: "/submissions/:id/grade",
                    },
                },
                DELETE,
            ],
            can_create: false,
            ..base
        },
    }
}
