use std::sync::Arc;

use dioxus::prelude::*;
use serde_json::Value;

use crate::domain::entities::record::{value_as_i64, RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::domain::entities::submission::SubmissionStatus;
use crate::messages;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::route::Route;
use crate::ui::state::app_state::{use_app_state, use_backend};
use crate::ui::styles::{button_style, input_style};
use crate::usecase::ports::api::ApiError;
use crate::usecase::services::record_service::RecordService;
use crate::usecase::services::submission_service::SubmissionService;

/// Used when an assignment carries no `maxScore`.
const FALLBACK_MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
struct ModuleInfo {
    name: String,
    diagram_type: String,
    solutions: Vec<String>,
}

/// Modules in stored order; a module's position is its id.
fn modules_of(assignment: &RowData) -> Vec<ModuleInfo> {
    let Some(Value::Array(modules)) = assignment.get("modules") else {
        return Vec::new();
    };
    modules
        .iter()
        .enumerate()
        .map(|(index, module)| {
            let text = |key: &str| module.get(key).and_then(Value::as_str).unwrap_or("").to_string();
            let name = match text("name") {
                name if name.is_empty() => format!("Module {}", index + 1),
                name => name,
            };
            let solutions = match module.get("solutions") {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(source) => Some(source.clone()),
                        other => other.get("source").and_then(Value::as_str).map(str::to_string),
                    })
                    .collect(),
                _ => Vec::new(),
            };
            ModuleInfo {
                name,
                diagram_type: text("diagramType"),
                solutions,
            }
        })
        .collect()
}

fn max_score_of(assignment: &RowData) -> f64 {
    match assignment.get("maxScore") {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(FALLBACK_MAX_SCORE),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(FALLBACK_MAX_SCORE),
        _ => FALLBACK_MAX_SCORE,
    }
}

fn submissions_of(assignment: RecordId) -> Route {
    Route::List {
        resource: Resource::Submissions,
        query: format!("assignmentId={assignment}"),
    }
}

/// Student view: pick a module, write PlantUML, preview, submit.
#[component]
pub fn SubmitPage(assignment: RecordId) -> Element {
    let backend = use_backend();
    let mut app = use_app_state();
    let records = use_signal(|| Arc::new(RecordService::new(backend.api.clone())));
    let service = use_signal(|| {
        Arc::new(SubmissionService::new(
            backend.api.clone(),
            backend.config.plantuml_server.clone(),
        ))
    });
    let mut loaded = use_signal(|| None::<Result<RowData, String>>);
    let mut module = use_signal(|| 0_usize);
    let mut student = use_signal(String::new);
    let mut source = use_signal(String::new);
    let mut preview = use_signal(|| None::<String>);
    let mut sending = use_signal(|| false);

    use_effect(move || {
        let records = records.peek().clone();
        spawn(async move {
            let result = run_blocking(move || records.load(Resource::Assignments, assignment))
                .await
                .unwrap_or_else(|err| Err(ApiError::Network(format!("{err:#}"))))
                .map_err(|err| messages::load_failed(Resource::Assignments, &err.user_message()));
            loaded.set(Some(result));
        });
    });

    let row = match loaded() {
        None => return rsx! { p { style: "color: #555;", "Loading…" } },
        Some(Err(error)) => return rsx! { p { style: "color: #c62828;", "{error}" } },
        Some(Ok(row)) => row,
    };
    let modules = modules_of(&row);
    let title = row.text("title");
    let preview_src = preview();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 10px; flex: 1; min-height: 0; overflow: auto; max-width: 1100px;",
            h2 { style: "margin: 0;", "Submit: {title}" }
            if modules.is_empty() {
                p { style: "color: #c62828;", "This assignment has no modules yet." }
            } else {
                label { style: "display: flex; flex-direction: column; gap: 4px; max-width: 360px;",
                    span { "Your name" }
                    input {
                        style: input_style(false),
                        value: "{student}",
                        oninput: move |event| student.set(event.value()),
                    }
                }
                label { style: "display: flex; flex-direction: column; gap: 4px; max-width: 360px;",
                    span { "Module" }
                    select {
                        style: input_style(false),
                        onchange: move |event| {
                            if let Ok(index) = event.value().parse::<usize>() {
                                module.set(index);
                            }
                        },
                        {modules.iter().enumerate().map(|(index, info)| {
                            let label = if info.diagram_type.is_empty() {
                                info.name.clone()
                            } else {
                                format!("{} ({})", info.name, info.diagram_type)
                            };
                            rsx!(option { value: "{index}", selected: index == module(), "{label}" })
                        })}
                    }
                }
                div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 10px;",
                    textarea {
                        style: "{input_style(false)} min-height: 320px; font-family: monospace;",
                        placeholder: "@startuml\nclass Book\n@enduml",
                        value: "{source}",
                        oninput: move |event| source.set(event.value()),
                    }
                    div {
                        style: "border: 1px dashed #bbb; border-radius: 4px; padding: 6px; overflow: auto; min-height: 320px;",
                        if let Some(src) = preview_src {
                            img { src: "{src}", alt: "Diagram preview", style: "max-width: 100%;" }
                        } else {
                            p { style: "color: #777;", "Press Preview to render the diagram." }
                        }
                    }
                }
                div { style: "display: flex; gap: 8px;",
                    button {
                        style: button_style(false),
                        onclick: move |_| {
                            let url = service.peek().preview_url(&source.peek());
                            preview.set(Some(url));
                        },
                        "Preview"
                    }
                    button {
                        style: button_style(true),
                        disabled: sending(),
                        onclick: move |_| {
                            let service = service.peek().clone();
                            let name = student.peek().clone();
                            let text = source.peek().clone();
                            let module_id = *module.peek() as i64;
                            sending.set(true);
                            spawn(async move {
                                let result = run_blocking(move || service.submit(assignment.0, module_id, &name, &text)).await;
                                sending.set(false);
                                match result {
                                    Ok(Ok(_)) => {
                                        app.success(messages::submitted());
                                        app.redirect(submissions_of(assignment));
                                    }
                                    Ok(Err(err)) => app.error(err.user_message()),
                                    Err(err) => app.error(format!("{err:#}")),
                                }
                            });
                        },
                        if sending() { "Sending…" } else { "Submit" }
                    }
                    button {
                        style: button_style(false),
                        onclick: move |_| app.navigate(Route::list(Resource::Assignments)),
                        "Cancel"
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct GradeContext {
    submission: RowData,
    module: Option<ModuleInfo>,
    max_score: f64,
}

fn grade_context(records: &RecordService, id: RecordId) -> Result<GradeContext, ApiError> {
    let submission = records.load(Resource::Submissions, id)?;
    let assignment = submission
        .get("assignmentId")
        .and_then(value_as_i64)
        .map(|assignment| records.load(Resource::Assignments, RecordId(assignment)))
        .transpose()?;
    let module_index = submission
        .get("moduleId")
        .and_then(value_as_i64)
        .and_then(|index| usize::try_from(index).ok());
    let (module, max_score) = match &assignment {
        Some(assignment) => (
            module_index.and_then(|index| modules_of(assignment).into_iter().nth(index)),
            max_score_of(assignment),
        ),
        None => (None, FALLBACK_MAX_SCORE),
    };
    Ok(GradeContext {
        submission,
        module,
        max_score,
    })
}

/// Grader view: the student's diagram next to the reference solutions.
#[component]
pub fn GradePage(submission: RecordId) -> Element {
    let backend = use_backend();
    let mut app = use_app_state();
    let records = use_signal(|| Arc::new(RecordService::new(backend.api.clone())));
    let service = use_signal(|| {
        Arc::new(SubmissionService::new(
            backend.api.clone(),
            backend.config.plantuml_server.clone(),
        ))
    });
    let mut loaded = use_signal(|| None::<Result<GradeContext, String>>);
    let mut score = use_signal(String::new);
    let mut feedback = use_signal(String::new);
    let mut sending = use_signal(|| false);

    use_effect(move || {
        let records = records.peek().clone();
        spawn(async move {
            let result = run_blocking(move || grade_context(&records, submission))
                .await
                .unwrap_or_else(|err| Err(ApiError::Network(format!("{err:#}"))))
                .map_err(|err| messages::load_failed(Resource::Submissions, &err.user_message()));
            if let Ok(context) = &result {
                score.set(context.submission.text("score"));
                feedback.set(context.submission.text("feedback"));
            }
            loaded.set(Some(result));
        });
    });

    let context = match loaded() {
        None => return rsx! { p { style: "color: #555;", "Loading…" } },
        Some(Err(error)) => return rsx! { p { style: "color: #c62828;", "{error}" } },
        Some(Ok(context)) => context,
    };
    let max_score = context.max_score;
    let row = &context.submission;
    let student = row.text("student");
    let status = row
        .get("status")
        .cloned()
        .and_then(|value| serde_json::from_value::<SubmissionStatus>(value).ok())
        .map(SubmissionStatus::label)
        .unwrap_or("Unknown");
    let assignment = row.get("assignmentId").and_then(value_as_i64).map(RecordId);
    let student_preview = service.peek().preview_url(&row.text("umlSource"));
    let module_name = context
        .module
        .as_ref()
        .map(|module| module.name.clone())
        .unwrap_or_else(|| row.text("moduleId"));
    let solutions: Vec<String> = context
        .module
        .as_ref()
        .map(|module| {
            module
                .solutions
                .iter()
                .map(|source| service.peek().preview_url(source))
                .collect()
        })
        .unwrap_or_default();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 10px; flex: 1; min-height: 0; overflow: auto;",
            h2 { style: "margin: 0;", "Grade submission #{submission}" }
            p { style: "margin: 0; color: #555;", "{student} · {module_name} · {status}" }
            div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 10px;",
                div { style: "border: 1px solid #ddd; border-radius: 6px; padding: 6px; overflow: auto;",
                    h4 { style: "margin: 4px 0;", "Student diagram" }
                    img { src: "{student_preview}", alt: "Student diagram", style: "max-width: 100%;" }
                }
                div { style: "border: 1px solid #ddd; border-radius: 6px; padding: 6px; overflow: auto;",
                    h4 { style: "margin: 4px 0;", "Reference solutions" }
                    if solutions.is_empty() {
                        p { style: "color: #777;", "No reference solution for this module." }
                    }
                    for url in solutions {
                        img { src: "{url}", alt: "Reference solution", style: "max-width: 100%; margin-bottom: 8px;" }
                    }
                }
            }
            div { style: "display: flex; gap: 12px; align-items: flex-end; max-width: 900px;",
                label { style: "display: flex; flex-direction: column; gap: 4px; width: 140px;",
                    span { "Score (0-{max_score})" }
                    input {
                        r#type: "number",
                        style: input_style(false),
                        value: "{score}",
                        oninput: move |event| score.set(event.value()),
                    }
                }
                label { style: "display: flex; flex-direction: column; gap: 4px; flex: 1;",
                    span { "Feedback" }
                    textarea {
                        style: "{input_style(false)} min-height: 80px;",
                        value: "{feedback}",
                        oninput: move |event| feedback.set(event.value()),
                    }
                }
            }
            div { style: "display: flex; gap: 8px;",
                button {
                    style: button_style(true),
                    disabled: sending(),
                    onclick: move |_| {
                        let service = service.peek().clone();
                        let value = score.peek().trim().parse::<f64>().unwrap_or(f64::NAN);
                        let text = feedback.peek().clone();
                        sending.set(true);
                        spawn(async move {
                            let result = run_blocking(move || service.grade(submission, value, &text, max_score)).await;
                            sending.set(false);
                            match result {
                                Ok(Ok(_)) => {
                                    app.success(messages::graded(value));
                                    app.redirect(match assignment {
                                        Some(assignment) => submissions_of(assignment),
                                        None => Route::list(Resource::Submissions),
                                    });
                                }
                                Ok(Err(err)) => app.error(err.user_message()),
                                Err(err) => app.error(format!("{err:#}")),
                            }
                        });
                    },
                    if sending() { "Saving…" } else { "Save feedback" }
                }
                button {
                    style: button_style(false),
                    onclick: move |_| app.navigate(Route::list(Resource::Submissions)),
                    "Cancel"
                }
            }
        }
    }
}
