use dioxus::prelude::*;

use crate::domain::form::dual_list::{DualListState, Side};
use crate::domain::form::schema::SelectOption;
use crate::ui::styles::{button_style, table_cell_style, table_header_cell_style};

/// Available and assigned tables with move buttons between them.
#[component]
pub fn DualListBox(
    options: Vec<SelectOption>,
    assigned: Vec<String>,
    invalid: bool,
    on_change: EventHandler<Vec<String>>,
) -> Element {
    let mut state = use_signal(|| DualListState::new(options.clone(), &assigned));

    use_effect(use_reactive!(|(options, assigned)| {
        state.write().resync(options, &assigned);
    }));

    let snapshot = state.read().clone();
    let border = if invalid { "#d33" } else { "#ddd" };

    rsx! {
        div {
            style: "display: grid; grid-template-columns: 1fr auto 1fr; gap: 8px; align-items: center; border: 1px solid {border}; border-radius: 6px; padding: 6px;",
            {side_table(state, Side::Available, "Available", snapshot.available().into_iter().cloned().collect(), &snapshot)}
            div { style: "display: flex; flex-direction: column; gap: 6px;",
                button {
                    style: button_style(false),
                    disabled: snapshot.selected_count(Side::Available) == 0,
                    onclick: move |_| {
                        let mut state = state.write();
                        if state.move_to_assigned() > 0 {
                            on_change.call(state.assigned_keys());
                        }
                    },
                    "→"
                }
                button {
                    style: button_style(false),
                    disabled: snapshot.selected_count(Side::Assigned) == 0,
                    onclick: move |_| {
                        let mut state = state.write();
                        if state.move_to_available() > 0 {
                            on_change.call(state.assigned_keys());
                        }
                    },
                    "←"
                }
            }
            {side_table(state, Side::Assigned, "Assigned", snapshot.assigned().into_iter().cloned().collect(), &snapshot)}
        }
    }
}

fn side_table(
    mut state: Signal<DualListState>,
    side: Side,
    title: &'static str,
    rows: Vec<SelectOption>,
    snapshot: &DualListState,
) -> Element {
    let all_selected = !rows.is_empty() && snapshot.selected_count(side) == rows.len();
    rsx! {
        div { style: "max-height: 260px; overflow: auto; border: 1px solid #bbb;",
            table { style: "border-collapse: collapse; width: 100%;",
                thead {
                    tr {
                        th { style: table_header_cell_style(),
                            input {
                                r#type: "checkbox",
                                checked: all_selected,
                                onclick: move |_| state.write().toggle_all(side),
                            }
                        }
                        th { style: table_header_cell_style(), "{title} ({rows.len()})" }
                    }
                }
                tbody {
                    {rows.iter().map(|option| {
                        let key = option.value.clone();
                        let clicked = key.clone();
                        let label = option.label.clone();
                        let selected = snapshot.is_selected(side, &key);
                        let background = if selected { "#eef4ff" } else { "transparent" };
                        rsx!(
                            tr {
                                key: "{key}",
                                style: "background: {background}; cursor: pointer;",
                                onclick: move |_| state.write().toggle_row(side, &clicked),
                                td { style: "{table_cell_style()} width: 24px;",
                                    input { r#type: "checkbox", checked: selected, readonly: true }
                                }
                                td { style: table_cell_style(), "{label}" }
                            }
                        )
                    })}
                }
            }
        }
    }
}
