use std::sync::Arc;

use dioxus::prelude::*;

use crate::domain::entities::record::RecordId;
use crate::domain::entities::resource::Resource;
use crate::domain::form::schema::{FieldKind, FieldValue, SelectOption};
use crate::domain::form::state::{FormState, SubmitBlocked};
use crate::messages;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::components::dual_list::DualListBox;
use crate::ui::pages::page_config;
use crate::ui::route::Route;
use crate::ui::state::app_state::{use_app_state, use_backend};
use crate::ui::styles::{button_style, grid_cell_style, input_style};
use crate::usecase::ports::api::ApiError;
use crate::usecase::services::record_service::RecordService;

type OptionsLoad = Vec<(&'static str, Result<Vec<SelectOption>, ApiError>)>;

/// Create form when `id` is `None`, edit form otherwise.
#[component]
pub fn FormTemplate(resource: Resource, id: Option<RecordId>) -> Element {
    let backend = use_backend();
    let mut app = use_app_state();
    let page = use_signal(|| page_config(resource));
    let mut form = use_signal(|| FormState::new(page.peek().form.clone()));
    let mut loading = use_signal(|| true);
    let mut load_error = use_signal(|| None::<String>);
    let service = use_signal(|| Arc::new(RecordService::new(backend.api.clone())));

    use_effect(move || {
        let service = service.peek().clone();
        let sources = page.peek().option_sources.clone();
        spawn(async move {
            let worker = service.clone();
            let loaded = run_blocking(move || {
                let record = id.map(|id| worker.load(resource, id));
                let options: OptionsLoad = sources
                    .iter()
                    .map(|source| {
                        (
                            source.field,
                            worker.options(source.resource, source.value_key, source.label_key),
                        )
                    })
                    .collect();
                (record, options)
            })
            .await;

            match loaded {
                Ok((record, options)) => {
                    if let Some(record) = record {
                        match record {
                            Ok(row) => {
                                let schema = page.peek().form.clone();
                                form.set(FormState::from_record(schema, &row.to_json()));
                            }
                            Err(err) => {
                                load_error.set(Some(messages::load_failed(resource, &err.user_message())));
                            }
                        }
                    }
                    let mut form = form.write();
                    for (field, result) in options {
                        match result {
                            Ok(options) => {
                                form.set_options(field, options);
                            }
                            Err(err) => {
                                tracing::warn!(%resource, field, error = %err, "could not load options");
                            }
                        }
                    }
                }
                Err(err) => load_error.set(Some(format!("{err:#}"))),
            }
            loading.set(false);
        });
    });

    let mut submit = move || {
        let payload = match form.write().begin_submit() {
            Ok(payload) => payload,
            Err(SubmitBlocked::Invalid) => {
                app.error(messages::form_has_errors());
                return;
            }
            Err(SubmitBlocked::Busy) => return,
        };
        let service = service.peek().clone();
        spawn(async move {
            let result = run_blocking(move || service.save(resource, id, payload))
                .await
                .unwrap_or_else(|err| Err(ApiError::Network(format!("{err:#}"))));
            form.write().finish_submit();
            match result {
                Ok(_) => {
                    app.success(messages::saved(resource));
                    app.redirect(Route::list(resource));
                }
                Err(err) => app.error(messages::save_failed(resource, &err.user_message())),
            }
        });
    };

    let keys: Vec<String> = form.read().schema().iter().map(|field| field.key.clone()).collect();
    let submitting = form.read().is_submitting();
    let heading = match id {
        Some(id) => format!("Edit {} #{id}", resource.singular()),
        None => format!("New {}", resource.singular()),
    };

    let body = if loading() {
        rsx!(p { style: "color: #555;", "Loading…" })
    } else if let Some(error) = load_error() {
        rsx!(p { style: "color: #c62828;", "{error}" })
    } else {
        rsx!(
            div {
                style: "display: grid; grid-template-columns: repeat(24, 1fr); gap: 12px; max-width: 960px;",
                for key in keys {
                    FieldEditor { key: "{key}", path: key.clone(), form: form }
                }
            }
            div { style: "display: flex; gap: 8px;",
                button {
                    style: button_style(true),
                    disabled: submitting,
                    onclick: move |_| submit(),
                    if submitting { "Saving…" } else { "Save" }
                }
                button {
                    style: button_style(false),
                    onclick: move |_| app.navigate(Route::list(resource)),
                    "Cancel"
                }
            }
        )
    };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 12px; flex: 1; min-height: 0; overflow: auto;",
            h2 { style: "margin: 0;", "{heading}" }
            {body}
        }
    }
}

/// Editor for the field at `path`; dynamic lists recurse into their entries.
#[component]
fn FieldEditor(path: String, form: Signal<FormState>) -> Element {
    let snapshot = form.read();
    let Some(field) = snapshot.field(&path).cloned() else {
        return rsx! {};
    };
    let value = snapshot
        .value(&path)
        .cloned()
        .unwrap_or_else(|| field.kind.empty_value());
    let error = snapshot.error(&path).map(str::to_string);
    drop(snapshot);

    let invalid = error.is_some();
    let marker = if field.required { " *" } else { "" };

    let control = match field.kind.clone() {
        FieldKind::Text | FieldKind::Password | FieldKind::Date | FieldKind::DateTime => {
            let input_type = match field.kind {
                FieldKind::Password => "password",
                FieldKind::Date => "date",
                FieldKind::DateTime => "datetime-local",
                _ => "text",
            };
            let text = value.as_text().to_string();
            let path = path.clone();
            rsx!(
                input {
                    r#type: input_type,
                    style: input_style(invalid),
                    value: "{text}",
                    oninput: move |event| {
                        form.write().set_value(&path, FieldValue::Text(event.value()));
                    }
                }
            )
        }
        FieldKind::Textarea => {
            let text = value.as_text().to_string();
            let path = path.clone();
            rsx!(
                textarea {
                    style: "{input_style(invalid)} min-height: 90px; font-family: monospace;",
                    value: "{text}",
                    oninput: move |event| {
                        form.write().set_value(&path, FieldValue::Text(event.value()));
                    }
                }
            )
        }
        FieldKind::RichText => {
            let html = value.as_text().to_string();
            let path = path.clone();
            rsx!(
                div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 8px;",
                    textarea {
                        style: "{input_style(invalid)} min-height: 120px;",
                        value: "{html}",
                        oninput: move |event| {
                            form.write().set_value(&path, FieldValue::Text(event.value()));
                        }
                    }
                    div {
                        style: "border: 1px dashed #bbb; border-radius: 4px; padding: 6px; overflow: auto;",
                        dangerous_inner_html: "{html}",
                    }
                }
            )
        }
        FieldKind::Number { min, max } => {
            let text = match value {
                FieldValue::Number(Some(number)) => number.to_string(),
                _ => String::new(),
            };
            let path = path.clone();
            rsx!(
                input {
                    r#type: "number",
                    style: input_style(invalid),
                    min: min.map(|min| min.to_string()).unwrap_or_default(),
                    max: max.map(|max| max.to_string()).unwrap_or_default(),
                    value: "{text}",
                    oninput: move |event| {
                        let number = event.value().trim().parse::<f64>().ok();
                        form.write().set_value(&path, FieldValue::Number(number));
                    }
                }
            )
        }
        FieldKind::Select { options } => {
            let selected = value.as_text().to_string();
            let path = path.clone();
            rsx!(
                select {
                    style: input_style(invalid),
                    value: "{selected}",
                    onchange: move |event| {
                        form.write().set_value(&path, FieldValue::Text(event.value()));
                    },
                    option { value: "", selected: selected.is_empty(), "Select…" }
                    for choice in options {
                        option {
                            value: "{choice.value}",
                            selected: choice.value == selected,
                            "{choice.label}"
                        }
                    }
                }
            )
        }
        FieldKind::MultiSelect { options } => {
            let chosen = value.as_keys().to_vec();
            rsx!(
                div { style: "display: flex; gap: 10px; flex-wrap: wrap;",
                    for choice in options {
                        {
                            let checked = chosen.contains(&choice.value);
                            let chosen = chosen.clone();
                            let path = path.clone();
                            rsx!(
                                label { style: "display: flex; gap: 4px; align-items: center;",
                                    input {
                                        r#type: "checkbox",
                                        checked: checked,
                                        onclick: move |_| {
                                            let mut keys = chosen.clone();
                                            if checked {
                                                keys.retain(|key| key != &choice.value);
                                            } else {
                                                keys.push(choice.value.clone());
                                            }
                                            form.write().set_value(&path, FieldValue::Keys(keys));
                                        }
                                    }
                                    span { "{choice.label}" }
                                }
                            )
                        }
                    }
                }
            )
        }
        FieldKind::DualList { options } => {
            let assigned = value.as_keys().to_vec();
            let path = path.clone();
            rsx!(
                DualListBox {
                    options: options,
                    assigned: assigned,
                    invalid: invalid,
                    on_change: move |keys: Vec<String>| {
                        form.write().set_value(&path, FieldValue::Keys(keys));
                    }
                }
            )
        }
        FieldKind::DynamicList { fields } => {
            let count = value.as_entries().len();
            let add_path = path.clone();
            rsx!(
                div { style: "display: flex; flex-direction: column; gap: 8px;",
                    for index in 0..count {
                        {
                            let remove_path = path.clone();
                            let entry_path = format!("{path}.{index}");
                            rsx!(
                                div {
                                    key: "{entry_path}",
                                    style: "display: grid; grid-template-columns: repeat(24, 1fr); gap: 8px; padding: 8px; border: 1px solid #ddd; border-radius: 6px; background: #fafafa;",
                                    for sub in fields.iter() {
                                        FieldEditor {
                                            key: "{entry_path}.{sub.key}",
                                            path: format!("{entry_path}.{}", sub.key),
                                            form: form,
                                        }
                                    }
                                    div { style: "grid-column: span 24; display: flex; justify-content: flex-end;",
                                        button {
                                            style: button_style(false),
                                            onclick: move |_| {
                                                form.write().remove_entry(&remove_path, index);
                                            },
                                            "Remove"
                                        }
                                    }
                                }
                            )
                        }
                    }
                    div {
                        button {
                            style: button_style(false),
                            onclick: move |_| {
                                form.write().add_entry(&add_path);
                            },
                            "+ Add {field.label.to_lowercase()}"
                        }
                    }
                }
            )
        }
    };

    rsx! {
        div { style: grid_cell_style(field.span),
            label { style: "font-size: 13px; font-weight: 600;", "{field.label}{marker}" }
            {control}
            if let Some(error) = error {
                span { style: "color: #d33; font-size: 12px;", "{error}" }
            }
        }
    }
}
