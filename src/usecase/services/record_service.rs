use std::sync::Arc;

use serde_json::Value;

use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::domain::form::schema::SelectOption;
use crate::usecase::ports::api::{AdminApi, ApiError, ListRequest};

/// Upper bound for option lists pulled from another resource.
const OPTION_LIMIT: u32 = 500;

/// Create/update screens. Which call is made depends on whether an id is being edited.
pub struct RecordService {
    api: Arc<dyn AdminApi>,
}

impl RecordService {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    pub fn load(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError> {
        self.api.get(resource, id)
    }

    /// Choices for a select or dual list, read from another resource.
    pub fn options(
        &self,
        resource: Resource,
        value_key: &str,
        label_key: &str,
    ) -> Result<Vec<SelectOption>, ApiError> {
        let request = ListRequest {
            page: 0,
            limit: OPTION_LIMIT,
            sort_by: None,
            sort_order: None,
            filters: Vec::new(),
        };
        let page = self.api.list(resource, &request)?;
        Ok(page
            .rows
            .iter()
            .map(|row| {
                let value = if value_key == "id" {
                    row.id.to_string()
                } else {
                    row.text(value_key)
                };
                let label = match row.text(label_key) {
                    label if label.is_empty() => value.clone(),
                    label => label,
                };
                SelectOption::new(value, label)
            })
            .filter(|option| !option.value.is_empty())
            .collect())
    }

    pub fn save(
        &self,
        resource: Resource,
        id: Option<RecordId>,
        payload: Value,
    ) -> Result<RowData, ApiError> {
        let result = match id {
            Some(id) => self.api.update(resource, id, payload),
            None => self.api.create(resource, payload),
        };
        match &result {
            Ok(row) => tracing::info!(%resource, id = %row.id, "record saved"),
            Err(err) => tracing::warn!(%resource, error = %err, "record save failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::schema::{FieldKind, FieldSchema, FieldValue};
    use crate::domain::form::state::{FormState, SubmitOutcome};
    use crate::test_support::FakeApi;
    use serde_json::json;

    fn schema() -> Vec<FieldSchema> {
        vec![
            FieldSchema::new("name", "Name", FieldKind::Text).required(),
            FieldSchema::new("code", "Code", FieldKind::Text).required(),
        ]
    }

    #[test]
    fn create_form_posts_once_after_validation() {
        let api = Arc::new(FakeApi::default());
        let service = RecordService::new(api.clone());
        let mut form = FormState::new(schema());
        form.set_value("name", FieldValue::Text("View tags".to_string()));

        let blocked = form.submit(|payload| service.save(Resource::Permissions, None, payload));
        assert!(matches!(blocked, SubmitOutcome::Invalid));
        assert_eq!(form.error("code"), Some("Code is required"));
        assert!(api.calls().is_empty());

        form.set_value("code", FieldValue::Text("TAG_VIEW".to_string()));
        let outcome = form.submit(|payload| service.save(Resource::Permissions, None, payload));
        assert!(matches!(outcome, SubmitOutcome::Done(Ok(_))));
        assert_eq!(
            api.calls()
                .iter()
                .filter(|call| call.starts_with("create permissions"))
                .count(),
            1
        );
    }

    #[test]
    fn editing_updates_existing_record() {
        let row = RowData::from_json(json!({"id": 3, "name": "Old", "code": "OLD"})).expect("row");
        let api = Arc::new(FakeApi::with_rows(vec![row]));
        let service = RecordService::new(api.clone());

        let loaded = service.load(Resource::Permissions, RecordId(3)).expect("load");
        let mut form = FormState::from_record(schema(), &loaded.to_json());
        form.set_value("name", FieldValue::Text("New".to_string()));
        let outcome = form.submit(|payload| service.save(Resource::Permissions, Some(RecordId(3)), payload));

        let SubmitOutcome::Done(Ok(saved)) = outcome else {
            panic!("expected saved record");
        };
        assert_eq!(saved.text("name"), "New");
        assert_eq!(saved.text("code"), "OLD");
    }

    #[test]
    fn options_come_from_another_resource() {
        let api = Arc::new(FakeApi::with_rows(vec![
            RowData::from_json(json!({"id": 1, "name": "UML basics"})).expect("row"),
            RowData::from_json(json!({"id": 2, "name": ""})).expect("row"),
        ]));
        let options = RecordService::new(api)
            .options(Resource::QuestionGroups, "id", "name")
            .expect("options");

        assert_eq!(
            options,
            vec![
                SelectOption::new("1", "UML basics"),
                SelectOption::new("2", "2"),
            ]
        );
    }
}
