use dioxus::prelude::*;

use crate::domain::entities::resource::Resource;
use crate::ui::components::form::FormTemplate;
use crate::ui::components::management::ManagementTemplate;
use crate::ui::components::submission::{GradePage, SubmitPage};
use crate::ui::route::Route;
use crate::ui::state::app_state::{AppState, NoticeLevel};
use crate::ui::styles::{page_body_style, root_container_style};

#[component]
pub fn App() -> Element {
    let state = AppState::new(Route::default());
    use_context_provider(|| state);
    let route = (state.route)();

    rsx! {
        div {
            style: root_container_style(),
            Header { active: route.resource() }
            NoticeBanner {}
            div {
                style: page_body_style(),
                {screen(route)}
            }
        }
    }
}

/// Each route gets a fresh component tree so page state never leaks between screens.
fn screen(route: Route) -> Element {
    let key = route.path();
    match route {
        Route::List { resource, query } => rsx! {
            ManagementTemplate { key: "{key}", resource: resource, initial_query: query }
        },
        Route::Create(resource) => rsx! {
            FormTemplate { key: "{key}", resource: resource, id: None }
        },
        Route::Edit(resource, id) => rsx! {
            FormTemplate { key: "{key}", resource: resource, id: Some(id) }
        },
        Route::Submit { assignment } => rsx! {
            SubmitPage { key: "{key}", assignment: assignment }
        },
        Route::Grade { submission } => rsx! {
            GradePage { key: "{key}", submission: submission }
        },
    }
}

#[component]
fn Header(active: Resource) -> Element {
    let mut state = use_context::<AppState>();

    rsx! {
        div {
            style: "display: flex; gap: 4px; align-items: center; flex-wrap: wrap; padding: 8px 12px; background: #1f2937; color: #fff;",
            strong { style: "margin-right: 16px;", "Portal Admin" }
            for resource in Resource::ALL {
                {
                    let background = if resource == active { "#374151" } else { "transparent" };
                    rsx!(
                        button {
                            style: "border: none; background: {background}; color: #fff; padding: 6px 10px; border-radius: 6px; cursor: pointer;",
                            onclick: move |_| state.navigate(Route::list(resource)),
                            "{resource.title()}"
                        }
                    )
                }
            }
        }
    }
}

#[component]
fn NoticeBanner() -> Element {
    let mut state = use_context::<AppState>();
    let Some(notice) = (state.notice)() else {
        return rsx! {};
    };
    let (background, color) = match notice.level {
        NoticeLevel::Success => ("#e8f5e9", "#1b5e20"),
        NoticeLevel::Error => ("#ffebee", "#b71c1c"),
    };

    rsx! {
        div {
            style: "display: flex; align-items: center; gap: 8px; padding: 6px 16px; background: {background}; color: {color};",
            span { style: "flex: 1; white-space: pre-wrap;", "{notice.text}" }
            button {
                style: "border: none; background: transparent; cursor: pointer; color: {color};",
                onclick: move |_| state.notice.set(None),
                "✕"
            }
        }
    }
}
