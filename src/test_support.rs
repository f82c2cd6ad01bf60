use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::domain::entities::listing::SortDirection;
use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::usecase::ports::api::{AdminApi, ApiError, ListPage, ListRequest};
use crate::usecase::ports::confirm::{Confirmation, Confirmer};

/// In-memory backend that records every call as `"<op> <resource> <detail>"`.
#[derive(Default)]
pub struct FakeApi {
    rows: Mutex<Vec<RowData>>,
    calls: Mutex<Vec<String>>,
    requests: Mutex<Vec<ListRequest>>,
    failure: Mutex<Option<ApiError>>,
}

impl FakeApi {
    pub fn with_rows(rows: Vec<RowData>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn rows(&self) -> Vec<RowData> {
        self.rows.lock().expect("rows lock").clone()
    }

    /// The next create/update/delete/toggle call fails with `err`.
    pub fn fail_next_mutation(&self, err: ApiError) {
        *self.failure.lock().expect("failure lock") = Some(err);
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        match self.failure.lock().expect("failure lock").take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AdminApi for FakeApi {
    fn list(&self, resource: Resource, request: &ListRequest) -> Result<ListPage, ApiError> {
        self.record(format!("list {resource} page={}", request.page));
        self.requests.lock().expect("requests lock").push(request.clone());

        let mut rows: Vec<RowData> = self
            .rows()
            .into_iter()
            .filter(|row| {
                request.filters.iter().all(|(key, value)| {
                    row.text(key).to_lowercase().contains(&value.to_lowercase())
                })
            })
            .collect();
        if let Some(key) = &request.sort_by {
            rows.sort_by_key(|row| row.text(key));
            if request.sort_order == Some(SortDirection::Desc) {
                rows.reverse();
            }
        }
        let total_count = rows.len() as u64;
        let start = (request.page as usize) * (request.limit as usize);
        let rows = rows
            .into_iter()
            .skip(start)
            .take(request.limit as usize)
            .collect();
        Ok(ListPage { rows, total_count })
    }

    fn get(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError> {
        self.record(format!("get {resource} {id}"));
        self.rows()
            .into_iter()
            .find(|row| row.id == id)
            .ok_or(ApiError::NotFound { resource, id })
    }

    fn create(&self, resource: Resource, payload: Value) -> Result<RowData, ApiError> {
        self.record(format!("create {resource} {payload}"));
        self.take_failure()?;
        let mut rows = self.rows.lock().expect("rows lock");
        let id = rows.iter().map(|row| row.id.0).max().unwrap_or(0) + 1;
        let mut fields = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        fields.insert("id".to_string(), Value::from(id));
        let row = RowData {
            id: RecordId(id),
            fields,
        };
        rows.push(row.clone());
        Ok(row)
    }

    fn update(&self, resource: Resource, id: RecordId, payload: Value) -> Result<RowData, ApiError> {
        self.record(format!("update {resource} {id} {payload}"));
        self.take_failure()?;
        let mut rows = self.rows.lock().expect("rows lock");
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(ApiError::NotFound { resource, id })?;
        if let Value::Object(map) = payload {
            row.fields.extend(map);
        }
        Ok(row.clone())
    }

    fn delete(&self, resource: Resource, id: RecordId) -> Result<(), ApiError> {
        self.record(format!("delete {resource} {id}"));
        self.take_failure()?;
        self.rows.lock().expect("rows lock").retain(|row| row.id != id);
        Ok(())
    }

    fn bulk_delete(&self, resource: Resource, ids: &[RecordId]) -> Result<(), ApiError> {
        self.record(format!("bulk_delete {resource} {ids:?}"));
        self.take_failure()?;
        self.rows
            .lock()
            .expect("rows lock")
            .retain(|row| !ids.contains(&row.id));
        Ok(())
    }

    fn toggle_status(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError> {
        self.record(format!("toggle {resource} {id}"));
        self.take_failure()?;
        let mut rows = self.rows.lock().expect("rows lock");
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(ApiError::NotFound { resource, id })?;
        let active = row.is_active();
        row.fields.insert("active".to_string(), Value::Bool(!active));
        Ok(row.clone())
    }
}

pub struct FixedConfirmer(pub bool);

impl Confirmer for FixedConfirmer {
    fn confirm(&self, _confirmation: &Confirmation) -> bool {
        self.0
    }
}
