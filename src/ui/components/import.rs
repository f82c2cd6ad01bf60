use std::sync::Arc;

use dioxus::prelude::*;

use crate::messages;
use crate::platform::desktop::blocking::run_blocking;
use crate::platform::desktop::dialogs::{pick_question_file, show_error};
use crate::ui::state::app_state::{use_app_state, use_backend};
use crate::ui::styles::button_style;
use crate::usecase::services::import_service::{ImportReport, ImportService};

/// Picks a CSV or spreadsheet of questions and creates one question per row.
#[component]
pub fn ImportButton(on_done: EventHandler<()>) -> Element {
    let backend = use_backend();
    let mut app = use_app_state();
    let service = use_signal(|| Arc::new(ImportService::new(backend.api.clone())));
    let mut busy = use_signal(|| false);

    rsx! {
        button {
            style: button_style(false),
            disabled: busy(),
            onclick: move |_| {
                let Some(path) = pick_question_file() else {
                    app.error(messages::import_cancelled());
                    return;
                };
                let service = service.peek().clone();
                busy.set(true);
                spawn(async move {
                    let result = run_blocking(move || service.import_file(&path)).await;
                    busy.set(false);
                    match result {
                        Ok(Ok(report)) => {
                            report_failures(&report);
                            let text = messages::imported(report.created, report.failures.len());
                            if report.failures.is_empty() {
                                app.success(text);
                            } else {
                                app.error(text);
                            }
                            on_done.call(());
                        }
                        Ok(Err(err)) => app.error(messages::import_failed(&err.to_string())),
                        Err(err) => app.error(messages::import_failed(&format!("{err:#}"))),
                    }
                });
            },
            if busy() { "Importing…" } else { "Import questions" }
        }
    }
}

fn report_failures(report: &ImportReport) {
    if report.failures.is_empty() {
        return;
    }
    let details = report
        .failures
        .iter()
        .take(20)
        .map(|failure| format!("Row {}: {}", failure.row, failure.message))
        .collect::<Vec<_>>()
        .join("\n");
    show_error("Some rows were not imported", &details);
}
