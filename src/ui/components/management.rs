use std::sync::Arc;

use dioxus::prelude::*;

use crate::domain::entities::listing::SortDirection;
use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::domain::form::schema::{FieldKind, FieldSchema, FieldValue, FormValues};
use crate::domain::url_state::decode;
use crate::infra::history::memory::MemoryHistory;
use crate::platform::desktop::blocking::run_blocking;
use crate::platform::desktop::dialogs::DialogConfirmer;
use crate::ui::components::import::ImportButton;
use crate::ui::components::pagination::Pagination;
use crate::ui::pages::{page_config, CellRender, PageConfig};
use crate::ui::route::Route;
use crate::ui::state::app_state::{use_app_state, use_backend};
use crate::ui::styles::{
    button_style, input_style, status_color, table_cell_style, table_container_style,
    table_header_cell_style,
};
use crate::usecase::ports::api::ApiError;
use crate::usecase::ports::confirm::Confirmer;
use crate::usecase::services::action_service::{
    ActionDispatcher, ActionOutcome, ActionStep, Mutation, RowAction,
};
use crate::usecase::services::list_controller::{ListController, PendingFetch};
use crate::usecase::services::listing_service::ListingService;

/// Search form, sortable table, pagination and row actions for one resource.
#[component]
pub fn ManagementTemplate(resource: Resource, initial_query: String) -> Element {
    let backend = use_backend();
    let mut app = use_app_state();
    let page_size = backend.config.page_size;

    let page = use_signal(|| page_config(resource));
    let mut search_values = use_signal(|| {
        let page = page.peek();
        let state = decode(&initial_query, &page.url_config(page_size));
        page.values_from_filters(&state.filters)
    });
    let mut list = use_signal(|| {
        let history = Arc::new(MemoryHistory::new(&initial_query));
        ListController::new(resource, page.peek().url_config(page_size), history)
    });
    let listing = use_signal(|| Arc::new(ListingService::new(backend.api.clone())));
    let dispatcher = use_signal(|| Arc::new(ActionDispatcher::new(backend.api.clone(), resource)));

    let run_fetch = use_callback(move |pending: PendingFetch| {
        let listing = listing.peek().clone();
        spawn(async move {
            let PendingFetch { ticket, request } = pending;
            let result = run_blocking(move || listing.fetch_request(resource, &request))
                .await
                .unwrap_or_else(|err| Err(ApiError::Network(format!("{err:#}"))));
            list.write().complete(ticket, result);
        });
    });

    use_effect(move || {
        let pending = list.write().mount();
        run_fetch.call(pending);
    });

    let execute = use_callback(move |(mutation, ids): (Mutation, Vec<RecordId>)| {
        let dispatcher = dispatcher.peek().clone();
        spawn(async move {
            let worker = dispatcher.clone();
            let result = run_blocking(move || worker.execute(mutation, &ids))
                .await
                .unwrap_or_else(|err| Err(format!("{err:#}")));
            let outcome = dispatcher.finish(result, &mut list.write());
            match outcome {
                ActionOutcome::Done { message, refetch } => {
                    app.success(message);
                    run_fetch.call(refetch);
                }
                ActionOutcome::Failed { message } => app.error(message),
                ActionOutcome::Navigate(_) | ActionOutcome::Cancelled => {}
            }
        });
    });

    let on_row_action = use_callback(move |(action, row): (RowAction, RowData)| {
        let dispatcher = dispatcher.peek().clone();
        match dispatcher.prepare(&action, &row) {
            ActionStep::Navigate(path) => app.navigate_path(&path),
            ActionStep::Confirm(confirmation, mutation) => {
                if DialogConfirmer.confirm(&confirmation) {
                    execute.call((mutation, vec![row.id]));
                }
            }
            ActionStep::Execute(mutation) => execute.call((mutation, vec![row.id])),
        }
    });

    let submit_search = use_callback(move |_: ()| {
        let filters = page.peek().filters_from_values(&search_values.peek());
        let pending = list.write().search(filters);
        run_fetch.call(pending);
    });

    let mut sync_search_form = move || {
        let values = page.peek().values_from_filters(&list.peek().state().filters);
        search_values.set(values);
    };

    let config = page.read();
    let controller = list.read();
    let rows: Vec<RowData> = controller.rows().to_vec();
    let state = controller.state().clone();
    let loading = controller.is_loading();
    let error = controller.error().map(str::to_string);
    let location = Route::List {
        resource,
        query: controller.query(),
    }
    .path();
    let selected_count = controller.selected_ids().len();
    let all_selected = !rows.is_empty() && selected_count == rows.len();
    let selected: Vec<bool> = rows.iter().map(|row| controller.is_selected(row.id)).collect();
    let page_count = controller.page_count();
    let total = controller.total_count();
    drop(controller);

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 8px; flex: 1; min-height: 0;",
            div {
                style: "display: flex; gap: 8px; align-items: center;",
                h2 { style: "margin: 0; flex: 1;", "{resource.title()}" }
                if config.importable {
                    ImportButton {
                        on_done: move |_| {
                            let pending = list.write().refetch();
                            run_fetch.call(pending);
                        }
                    }
                }
                if config.can_create {
                    button {
                        style: button_style(true),
                        onclick: move |_| app.navigate(Route::Create(resource)),
                        "New {resource.singular()}"
                    }
                }
            }

            div {
                style: "display: flex; gap: 6px; align-items: center; font-size: 12px; color: #555;",
                button {
                    style: button_style(false),
                    onclick: move |_| {
                        let pending = list.write().back();
                        if let Some(pending) = pending {
                            sync_search_form();
                            run_fetch.call(pending);
                        }
                    },
                    "←"
                }
                button {
                    style: button_style(false),
                    onclick: move |_| {
                        let pending = list.write().forward();
                        if let Some(pending) = pending {
                            sync_search_form();
                            run_fetch.call(pending);
                        }
                    },
                    "→"
                }
                code { "{location}" }
            }

            div {
                style: "display: flex; gap: 12px; align-items: flex-end; flex-wrap: wrap; padding: 8px; background: #fafafa; border: 1px solid #ddd; border-radius: 6px;",
                for field in config.search.iter().cloned() {
                    {search_field(field, search_values, submit_search)}
                }
                button {
                    style: button_style(true),
                    disabled: loading,
                    onclick: move |_| submit_search.call(()),
                    "Search"
                }
                button {
                    style: button_style(false),
                    onclick: move |_| {
                        let pending = list.write().clear_filters();
                        sync_search_form();
                        run_fetch.call(pending);
                    },
                    "Reset"
                }
            }

            div {
                style: "display: flex; gap: 8px; align-items: center; min-height: 28px;",
                if config.bulk_delete {
                    button {
                        style: button_style(false),
                        disabled: selected_count == 0 || loading,
                        onclick: move |_| {
                            let ids = list.peek().selected_ids();
                            if ids.is_empty() {
                                return;
                            }
                            let confirmation = dispatcher.peek().confirmation(Mutation::BulkDelete, ids.len());
                            if DialogConfirmer.confirm(&confirmation) {
                                execute.call((Mutation::BulkDelete, ids));
                            }
                        },
                        "Delete selected ({selected_count})"
                    }
                }
                if loading {
                    span { style: "color: #555;", "Loading…" }
                }
                if let Some(error) = error {
                    span { style: "color: #c62828;", "{error}" }
                }
            }

            div {
                style: table_container_style(),
                table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                    thead {
                        tr {
                            if config.bulk_delete {
                                th { style: table_header_cell_style(),
                                    input {
                                        r#type: "checkbox",
                                        checked: all_selected,
                                        onclick: move |_| list.write().toggle_select_all(),
                                    }
                                }
                            }
                            for column in config.columns.iter().copied() {
                                {
                                    let indicator = match &state.sort {
                                        Some(sort) if sort.key == column.key => match sort.direction {
                                            SortDirection::Asc => " ▲",
                                            SortDirection::Desc => " ▼",
                                        },
                                        _ => "",
                                    };
                                    let cursor = if column.sortable { "pointer" } else { "default" };
                                    rsx!(
                                        th {
                                            style: "{table_header_cell_style()} cursor: {cursor};",
                                            onclick: move |_| {
                                                if !column.sortable {
                                                    return;
                                                }
                                                let pending = list.write().toggle_sort(column.key);
                                                run_fetch.call(pending);
                                            },
                                            "{column.title}{indicator}"
                                        }
                                    )
                                }
                            }
                            if !config.actions.is_empty() {
                                th { style: table_header_cell_style(), "Actions" }
                            }
                        }
                    }
                    tbody {
                        if rows.is_empty() && !loading {
                            tr {
                                td {
                                    colspan: "{config.columns.len() + 2}",
                                    style: "padding: 16px; text-align: center; color: #777;",
                                    "No records"
                                }
                            }
                        }
                        {rows.iter().zip(selected).map(|(row, is_selected)| {
                            let id = row.id;
                            let background = if is_selected { "#eef4ff" } else { "transparent" };
                            rsx!(
                                tr {
                                    key: "{id}",
                                    style: "background: {background};",
                                    if config.bulk_delete {
                                        td { style: "{table_cell_style()} text-align: center;",
                                            input {
                                                r#type: "checkbox",
                                                checked: is_selected,
                                                onclick: move |_| list.write().toggle_selected(id),
                                            }
                                        }
                                    }
                                    {table_cells(&config, row)}
                                    if !config.actions.is_empty() {
                                        td { style: "{table_cell_style()} white-space: nowrap;",
                                            {config.actions.iter().copied().map(|action| {
                                                let row = row.clone();
                                                let class = (action.class)(&row);
                                                let color = status_color(class);
                                                rsx!(
                                                    button {
                                                        class: class,
                                                        title: action.tooltip,
                                                        style: "border: none; background: transparent; cursor: pointer; color: {color}; font-size: 15px;",
                                                        onclick: move |_| on_row_action.call((action, row.clone())),
                                                        "{action.icon}"
                                                    }
                                                )
                                            })}
                                        }
                                    }
                                }
                            )
                        })}
                    }
                }
            }

            Pagination {
                current: state.page.current,
                page_count: page_count,
                size: state.page.size,
                total: total,
                disabled: loading,
                on_page: move |target: u32| {
                    let pending = list.write().go_to_page(target);
                    if let Some(pending) = pending {
                        run_fetch.call(pending);
                    }
                },
                on_size: move |size: u32| {
                    let pending = list.write().set_page_size(size);
                    if let Some(pending) = pending {
                        run_fetch.call(pending);
                    }
                },
            }
        }
    }
}

fn table_cells(config: &PageConfig, row: &RowData) -> Element {
    rsx! {
        for column in config.columns.iter().copied() {
            {
                let text = column.render_cell(row);
                match column.render {
                    CellRender::Status => {
                        let color = if row.is_active() { "#2e7d32" } else { "#c62828" };
                        rsx!(
                            td { style: table_cell_style(),
                                span {
                                    style: "padding: 2px 8px; border-radius: 10px; color: #fff; background: {color}; font-size: 12px;",
                                    "{text}"
                                }
                            }
                        )
                    }
                    _ => rsx!(td { style: table_cell_style(), "{text}" }),
                }
            }
        }
    }
}

fn search_field(
    field: FieldSchema,
    mut values: Signal<FormValues>,
    submit: Callback<()>,
) -> Element {
    let key = field.key.clone();
    let current = values.read().get(&key).cloned().unwrap_or_else(|| field.kind.empty_value());

    let control = match &field.kind {
        FieldKind::Select { options } => {
            let selected = current.as_text().to_string();
            rsx!(
                select {
                    style: input_style(false),
                    value: "{selected}",
                    onchange: move |event| {
                        values.write().insert(key.clone(), FieldValue::Text(event.value()));
                    },
                    option { value: "", selected: selected.is_empty(), "All" }
                    for choice in options.iter().cloned() {
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
            let chosen = current.as_keys().to_vec();
            rsx!(
                div { style: "display: flex; gap: 8px; flex-wrap: wrap;",
                    for choice in options.iter().cloned() {
                        {
                            let checked = chosen.contains(&choice.value);
                            let key = key.clone();
                            rsx!(
                                label { style: "display: flex; gap: 4px; align-items: center;",
                                    input {
                                        r#type: "checkbox",
                                        checked: checked,
                                        onclick: move |_| {
                                            let mut values = values.write();
                                            let entry = values
                                                .entry(key.clone())
                                                .or_insert_with(|| FieldValue::Keys(Vec::new()));
                                            let mut keys = entry.as_keys().to_vec();
                                            if checked {
                                                keys.retain(|k| k != &choice.value);
                                            } else {
                                                keys.push(choice.value.clone());
                                            }
                                            *entry = FieldValue::Keys(keys);
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
        _ => {
            let text = current.as_text().to_string();
            rsx!(
                input {
                    style: input_style(false),
                    value: "{text}",
                    oninput: move |event| {
                        values.write().insert(key.clone(), FieldValue::Text(event.value()));
                    },
                    onkeydown: move |event| {
                        if event.key() == Key::Enter {
                            submit.call(());
                        }
                    }
                }
            )
        }
    };

    let width = if matches!(field.kind, FieldKind::MultiSelect { .. }) {
        "auto"
    } else {
        "180px"
    };
    rsx! {
        label {
            style: "display: flex; flex-direction: column; gap: 4px; min-width: {width}; font-size: 13px;",
            span { "{field.label}" }
            {control}
        }
    }
}
