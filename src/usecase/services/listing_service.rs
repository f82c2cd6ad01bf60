use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::entities::resource::Resource;
use crate::usecase::ports::api::{AdminApi, ApiError, ListPage, ListRequest};

pub struct ListingService {
    api: Arc<dyn AdminApi>,
}

impl ListingService {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    pub fn fetch_request(
        &self,
        resource: Resource,
        request: &ListRequest,
    ) -> Result<ListPage, ApiError> {
        tracing::debug!(%resource, page = request.page, limit = request.limit, "listing request");
        self.api.list(resource, request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(pub u64);

/// Hands out increasing tickets; only the newest one may apply its response.
#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: AtomicU64,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> FetchTicket {
        FetchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
