use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::entities::listing::{
    next_sort, page_count, FilterState, ListingState, SortState,
};
use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::domain::url_state::{decode, encode, UrlStateConfig};
use crate::messages;
use crate::usecase::ports::api::{AdminApi, ApiError, ListPage, ListRequest};
use crate::usecase::ports::history::History;
use crate::usecase::services::listing_service::{FetchSequencer, FetchTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// A fetch the caller must run and report back through [`ListController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub request: ListRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued after this one; its response was dropped.
    Discarded,
}

/// State of one list page. The URL is authoritative; everything here is
/// derived from it or from the last applied response.
pub struct ListController {
    resource: Resource,
    config: UrlStateConfig,
    history: Arc<dyn History>,
    state: ListingState,
    rows: Vec<RowData>,
    total: u64,
    phase: LoadPhase,
    error: Option<String>,
    sequencer: FetchSequencer,
    selected: BTreeSet<RecordId>,
}

impl ListController {
    pub fn new(resource: Resource, config: UrlStateConfig, history: Arc<dyn History>) -> Self {
        let state = config.initial_state();
        Self {
            resource,
            config,
            history,
            state,
            rows: Vec::new(),
            total: 0,
            phase: LoadPhase::Idle,
            error: None,
            sequencer: FetchSequencer::new(),
            selected: BTreeSet::new(),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn rows(&self) -> &[RowData] {
        &self.rows
    }

    pub fn total_count(&self) -> u64 {
        self.total
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.state.page.size)
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> String {
        encode(&self.state, &self.config)
    }

    /// Initial load: state comes from the current URL, which is rewritten in
    /// normalised form without adding a history entry.
    pub fn mount(&mut self) -> PendingFetch {
        self.state = decode(&self.history.current_query(), &self.config);
        self.history.replace_query(&self.query());
        self.begin_fetch()
    }

    /// Back/forward navigation landed on `query`.
    pub fn navigate(&mut self, query: &str) -> PendingFetch {
        self.state = decode(query, &self.config);
        self.begin_fetch()
    }

    pub fn back(&mut self) -> Option<PendingFetch> {
        let query = self.history.back()?;
        Some(self.navigate(&query))
    }

    pub fn forward(&mut self) -> Option<PendingFetch> {
        let query = self.history.forward()?;
        Some(self.navigate(&query))
    }

    pub fn search(&mut self, filters: FilterState) -> PendingFetch {
        self.state.filters = filters;
        self.state.page.current = 1;
        self.push_url();
        self.begin_fetch()
    }

    pub fn clear_filters(&mut self) -> PendingFetch {
        self.search(FilterState::new())
    }

    pub fn toggle_sort(&mut self, key: &str) -> PendingFetch {
        let sort = next_sort(&self.state.sort, key);
        self.set_sort(sort)
    }

    pub fn set_sort(&mut self, sort: SortState) -> PendingFetch {
        self.state.sort = sort;
        self.push_url();
        self.begin_fetch()
    }

    /// Clamped to the pages the last response offered; `None` when nothing changes.
    pub fn go_to_page(&mut self, page: u32) -> Option<PendingFetch> {
        let last = self.page_count().max(1);
        let page = page.clamp(1, last);
        if page == self.state.page.current {
            return None;
        }
        self.state.page.current = page;
        self.push_url();
        Some(self.begin_fetch())
    }

    pub fn set_page_size(&mut self, size: u32) -> Option<PendingFetch> {
        if size == 0 {
            return None;
        }
        self.state.page.size = size;
        self.state.page.current = 1;
        self.push_url();
        Some(self.begin_fetch())
    }

    /// Same query again, e.g. after a mutation changed server-side data.
    pub fn refetch(&mut self) -> PendingFetch {
        self.begin_fetch()
    }

    pub fn begin_fetch(&mut self) -> PendingFetch {
        self.phase = LoadPhase::Loading;
        PendingFetch {
            ticket: self.sequencer.issue(),
            request: ListRequest::from_state(&self.state),
        }
    }

    pub fn complete(&mut self, ticket: FetchTicket, result: Result<ListPage, ApiError>) -> FetchOutcome {
        if !self.sequencer.is_current(ticket) {
            tracing::debug!(
                resource = %self.resource,
                ticket = ticket.0,
                "discarding superseded listing response"
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                self.rows = page.rows;
                self.total = page.total_count;
                self.error = None;
                self.phase = LoadPhase::Loaded;
                let visible: BTreeSet<RecordId> = self.rows.iter().map(|row| row.id).collect();
                self.selected.retain(|id| visible.contains(id));
            }
            Err(err) => {
                tracing::warn!(resource = %self.resource, error = %err, "listing request failed");
                self.error = Some(messages::load_failed(self.resource, &err.user_message()));
                self.phase = LoadPhase::Errored;
            }
        }
        FetchOutcome::Applied
    }

    /// Runs `pending` on the calling thread.
    pub fn run(&mut self, pending: PendingFetch, api: &dyn AdminApi) -> FetchOutcome {
        let result = api.list(self.resource, &pending.request);
        self.complete(pending.ticket, result)
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    pub fn toggle_selected(&mut self, id: RecordId) {
        if !self.selected.remove(&id) && self.rows.iter().any(|row| row.id == id) {
            self.selected.insert(id);
        }
    }

    pub fn toggle_select_all(&mut self) {
        if !self.rows.is_empty() && self.selected.len() == self.rows.len() {
            self.selected.clear();
        } else {
            self.selected = self.rows.iter().map(|row| row.id).collect();
        }
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selected.iter().copied().collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn push_url(&self) {
        self.history.push_query(&self.query());
    }
}
