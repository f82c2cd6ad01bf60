use serde_json::Value;
use thiserror::Error;

use crate::domain::entities::listing::{ListingState, SortDirection};
use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{message}")]
    Status { code: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: RecordId },
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    /// Text suitable for a notification, without the transport prefix.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// One listing call as the backend expects it: 0-based page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub page: u32,
    pub limit: u32,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDirection>,
    pub filters: Vec<(String, String)>,
}

impl ListRequest {
    pub fn from_state(state: &ListingState) -> Self {
        Self {
            page: state.page.current.saturating_sub(1),
            limit: state.page.size,
            sort_by: state.sort.as_ref().map(|sort| sort.key.clone()),
            sort_order: state.sort.as_ref().map(|sort| sort.direction),
            filters: state
                .filters
                .iter()
                .map(|(key, value)| (key.clone(), value.joined()))
                .collect(),
        }
    }

    /// Query pairs in wire order: page, limit, sortBy, sortOrder, then filters.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy".to_string(), sort_by.clone()));
            let order = self.sort_order.unwrap_or(SortDirection::Asc);
            pairs.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListPage {
    pub rows: Vec<RowData>,
    pub total_count: u64,
}

pub trait AdminApi: Send + Sync {
    fn list(&self, resource: Resource, request: &ListRequest) -> Result<ListPage, ApiError>;
    fn get(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError>;
    fn create(&self, resource: Resource, payload: Value) -> Result<RowData, ApiError>;
    fn update(&self, resource: Resource, id: RecordId, payload: Value)
        -> Result<RowData, ApiError>;
    fn delete(&self, resource: Resource, id: RecordId) -> Result<(), ApiError>;
    fn bulk_delete(&self, resource: Resource, ids: &[RecordId]) -> Result<(), ApiError>;
    fn toggle_status(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError>;
}
