use std::sync::Arc;

use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::messages;
use crate::usecase::ports::api::AdminApi;
use crate::usecase::ports::confirm::{Confirmation, Confirmer};
use crate::usecase::services::list_controller::{ListController, PendingFetch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    ToggleStatus,
    Delete,
    BulkDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Route template; `:id` is replaced with the row id.
    Navigate { path: &'static str },
    Mutate { confirm: bool, mutation: Mutation },
}

#[derive(Clone, Copy)]
pub struct RowAction {
    pub id: &'static str,
    pub icon: &'static str,
    pub tooltip: &'static str,
    /// CSS class derived from the row, e.g. a lock icon that reflects status.
    pub class: fn(&RowData) -> &'static str,
    pub kind: ActionKind,
}

impl std::fmt::Debug for RowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowAction")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for RowAction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

pub fn plain_class(_row: &RowData) -> &'static str {
    "action"
}

pub fn status_class(row: &RowData) -> &'static str {
    if row.is_active() {
        "action action-active"
    } else {
        "action action-inactive"
    }
}

pub fn render_path(template: &str, id: RecordId) -> String {
    template.replace(":id", &id.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStep {
    Navigate(String),
    Confirm(Confirmation, Mutation),
    Execute(Mutation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Navigate(String),
    Cancelled,
    /// Mutation succeeded; the page must be fetched again.
    Done { message: String, refetch: PendingFetch },
    Failed { message: String },
}

/// Runs row and bulk actions. Successful mutations are always followed by a
/// full refetch of the page; rows are never patched in place.
pub struct ActionDispatcher {
    api: Arc<dyn AdminApi>,
    resource: Resource,
}

impl ActionDispatcher {
    pub fn new(api: Arc<dyn AdminApi>, resource: Resource) -> Self {
        Self { api, resource }
    }

    pub fn prepare(&self, action: &RowAction, row: &RowData) -> ActionStep {
        match action.kind {
            ActionKind::Navigate { path } => ActionStep::Navigate(render_path(path, row.id)),
            ActionKind::Mutate {
                confirm: true,
                mutation,
            } => ActionStep::Confirm(self.confirmation(mutation, 1), mutation),
            ActionKind::Mutate {
                confirm: false,
                mutation,
            } => ActionStep::Execute(mutation),
        }
    }

    pub fn confirmation(&self, mutation: Mutation, count: usize) -> Confirmation {
        match mutation {
            Mutation::ToggleStatus => Confirmation::new(
                "Change status",
                messages::confirm_toggle(self.resource),
            ),
            Mutation::Delete => {
                Confirmation::new("Delete", messages::confirm_delete(self.resource))
            }
            Mutation::BulkDelete => Confirmation::new(
                "Delete selected",
                messages::confirm_bulk_delete(self.resource, count),
            ),
        }
    }

    /// Sends the mutation. `Ok` carries the notification text, `Err` the
    /// failure text; neither touches list state, so this may run off the UI thread.
    pub fn execute(&self, mutation: Mutation, ids: &[RecordId]) -> Result<String, String> {
        let resource = self.resource;
        let result = match (mutation, ids) {
            (Mutation::ToggleStatus, [id]) => self
                .api
                .toggle_status(resource, *id)
                .map(|_| messages::status_changed(resource))
                .map_err(|err| messages::status_change_failed(resource, &err.user_message())),
            (Mutation::Delete, [id]) => self
                .api
                .delete(resource, *id)
                .map(|_| messages::deleted(resource))
                .map_err(|err| messages::delete_failed(resource, &err.user_message())),
            (Mutation::BulkDelete, ids) if !ids.is_empty() => self
                .api
                .bulk_delete(resource, ids)
                .map(|_| messages::bulk_deleted(resource, ids.len()))
                .map_err(|err| messages::delete_failed(resource, &err.user_message())),
            (mutation, ids) => Err(format!(
                "{mutation:?} cannot run on {} record(s)",
                ids.len()
            )),
        };
        if let Err(message) = &result {
            tracing::warn!(%resource, ?mutation, %message, "row action failed");
        }
        result
    }

    pub fn finish(&self, result: Result<String, String>, list: &mut ListController) -> ActionOutcome {
        match result {
            Ok(message) => {
                list.clear_selection();
                ActionOutcome::Done {
                    message,
                    refetch: list.refetch(),
                }
            }
            Err(message) => ActionOutcome::Failed { message },
        }
    }

    /// Whole flow on the calling thread.
    pub fn dispatch(
        &self,
        action: &RowAction,
        row: &RowData,
        confirmer: &dyn Confirmer,
        list: &mut ListController,
    ) -> ActionOutcome {
        let mutation = match self.prepare(action, row) {
            ActionStep::Navigate(path) => return ActionOutcome::Navigate(path),
            ActionStep::Confirm(confirmation, mutation) => {
                if !confirmer.confirm(&confirmation) {
                    return ActionOutcome::Cancelled;
                }
                mutation
            }
            ActionStep::Execute(mutation) => mutation,
        };
        let result = self.execute(mutation, &[row.id]);
        self.finish(result, list)
    }

    pub fn bulk_delete(&self, confirmer: &dyn Confirmer, list: &mut ListController) -> ActionOutcome {
        let ids = list.selected_ids();
        if ids.is_empty() {
            return ActionOutcome::Cancelled;
        }
        if !confirmer.confirm(&self.confirmation(Mutation::BulkDelete, ids.len())) {
            return ActionOutcome::Cancelled;
        }
        let result = self.execute(Mutation::BulkDelete, &ids);
        self.finish(result, list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::history::memory::MemoryHistory;
    use crate::domain::url_state::UrlStateConfig;
    use crate::test_support::{FakeApi, FixedConfirmer};
    use crate::usecase::ports::api::ApiError;
    use serde_json::json;

    const TOGGLE: RowAction = RowAction {
        id: "toggle",
        icon: "lock",
        tooltip: "Toggle status",
        class: status_class,
        kind: ActionKind::Mutate {
            confirm: true,
            mutation: Mutation::ToggleStatus,
        },
    };

    const EDIT: RowAction = RowAction {
        id: "edit",
        icon: "edit",
        tooltip: "Edit",
        class: plain_class,
        kind: ActionKind::Navigate {
            path: "/roles/:id/edit",
        },
    };

    fn setup(api: &Arc<FakeApi>) -> (ActionDispatcher, ListController) {
        let dispatcher = ActionDispatcher::new(api.clone(), Resource::Roles);
        let mut list = ListController::new(
            Resource::Roles,
            UrlStateConfig::default(),
            Arc::new(MemoryHistory::default()),
        );
        let pending = list.mount();
        list.run(pending, api.as_ref());
        (dispatcher, list)
    }

    fn role_row(id: i64, active: bool) -> RowData {
        RowData::from_json(json!({"id": id, "name": "TEACHER", "active": active})).expect("row")
    }

    #[test]
    fn navigate_renders_route_without_calling_api() {
        let api = Arc::new(FakeApi::with_rows(vec![role_row(5, true)]));
        let (dispatcher, mut list) = setup(&api);
        let calls_before = api.calls().len();

        let outcome = dispatcher.dispatch(&EDIT, &role_row(5, true), &FixedConfirmer(true), &mut list);

        assert_eq!(outcome, ActionOutcome::Navigate("/roles/5/edit".to_string()));
        assert_eq!(api.calls().len(), calls_before);
    }

    #[test]
    fn cancelled_confirmation_sends_nothing() {
        let api = Arc::new(FakeApi::with_rows(vec![role_row(5, true)]));
        let (dispatcher, mut list) = setup(&api);

        let outcome = dispatcher.dispatch(&TOGGLE, &role_row(5, true), &FixedConfirmer(false), &mut list);

        assert_eq!(outcome, ActionOutcome::Cancelled);
        assert!(!api.calls().iter().any(|call| call.starts_with("toggle")));
    }

    #[test]
    fn successful_toggle_refetches_and_shows_new_state() {
        let api = Arc::new(FakeApi::with_rows(vec![role_row(5, true)]));
        let (dispatcher, mut list) = setup(&api);

        let outcome = dispatcher.dispatch(&TOGGLE, &role_row(5, true), &FixedConfirmer(true), &mut list);

        let ActionOutcome::Done { message, refetch } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(message, "Updated role status");
        // the row still shows the old state until the refetch resolves
        assert!(list.rows()[0].is_active());
        list.run(refetch, api.as_ref());
        assert!(!list.rows()[0].is_active());
        assert_eq!(
            api.calls().iter().filter(|call| call.starts_with("list")).count(),
            2
        );
    }

    #[test]
    fn failed_delete_keeps_rows_and_reports_server_message() {
        let api = Arc::new(FakeApi::with_rows(vec![role_row(5, true)]));
        api.fail_next_mutation(ApiError::Status {
            code: 409,
            message: "Role is assigned to 3 users".to_string(),
        });
        let (dispatcher, mut list) = setup(&api);
        let delete = RowAction {
            kind: ActionKind::Mutate {
                confirm: false,
                mutation: Mutation::Delete,
            },
            ..TOGGLE
        };

        let outcome = dispatcher.dispatch(&delete, &role_row(5, true), &FixedConfirmer(true), &mut list);

        assert_eq!(
            outcome,
            ActionOutcome::Failed {
                message: "Could not delete role: Role is assigned to 3 users".to_string()
            }
        );
        assert_eq!(list.rows().len(), 1);
        assert!(!list.is_loading());
    }

    #[test]
    fn bulk_delete_sends_selected_ids_once() {
        let api = Arc::new(FakeApi::with_rows(vec![role_row(1, true), role_row(2, true)]));
        let (dispatcher, mut list) = setup(&api);
        assert_eq!(dispatcher.bulk_delete(&FixedConfirmer(true), &mut list), ActionOutcome::Cancelled);

        list.toggle_select_all();
        let outcome = dispatcher.bulk_delete(&FixedConfirmer(true), &mut list);

        assert!(matches!(outcome, ActionOutcome::Done { .. }));
        assert!(list.selected_ids().is_empty());
        assert_eq!(
            api.calls().iter().filter(|call| call.starts_with("bulk_delete")).count(),
            1
        );
    }

    #[test]
    fn path_template_substitutes_id() {
        assert_eq!(render_path("/assignments/:id/submissions", RecordId(12)), "/assignments/12/submissions");
    }
}
