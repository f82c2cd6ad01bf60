//! Listing state <-> query string.
//!
//! The query string is the source of truth for a list page: reloading a URL
//! reproduces the same listing query. Only non-default values are written.

use std::collections::BTreeSet;

use url::form_urlencoded;

use crate::domain::entities::listing::{
    FilterState, FilterValue, ListingState, PageState, SortDirection, SortSpec,
    DEFAULT_PAGE_SIZE,
};

pub const PAGE_KEY: &str = "page";
pub const LIMIT_KEY: &str = "limit";
pub const SORT_BY_KEY: &str = "sortBy";
pub const SORT_ORDER_KEY: &str = "sortOrder";

const RESERVED_KEYS: [&str; 4] = [PAGE_KEY, LIMIT_KEY, SORT_BY_KEY, SORT_ORDER_KEY];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStateConfig {
    pub default_limit: u32,
    pub multi_keys: BTreeSet<String>,
}

impl UrlStateConfig {
    pub fn new(default_limit: u32) -> Self {
        Self {
            default_limit: default_limit.max(1),
            multi_keys: BTreeSet::new(),
        }
    }

    pub fn with_multi_key(mut self, key: impl Into<String>) -> Self {
        self.multi_keys.insert(key.into());
        self
    }

    pub fn initial_state(&self) -> ListingState {
        ListingState::with_page_size(self.default_limit)
    }
}

impl Default for UrlStateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

pub fn encode(state: &ListingState, config: &UrlStateConfig) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (key, value) in state.filters.iter() {
        if is_reserved_key(key) || value.is_blank() {
            continue;
        }
        serializer.append_pair(key, &value.joined());
    }

    if state.page.current > 1 {
        serializer.append_pair(PAGE_KEY, &state.page.current.to_string());
    }
    if state.page.size != config.default_limit {
        serializer.append_pair(LIMIT_KEY, &state.page.size.to_string());
    }
    if let Some(sort) = &state.sort {
        serializer.append_pair(SORT_BY_KEY, &sort.key);
        serializer.append_pair(SORT_ORDER_KEY, sort.direction.as_str());
    }

    serializer.finish()
}

pub fn decode(query: &str, config: &UrlStateConfig) -> ListingState {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut filters = FilterState::new();
    let mut current = 1_u32;
    let mut size = config.default_limit;
    let mut sort_by: Option<String> = None;
    let mut sort_order: Option<SortDirection> = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            PAGE_KEY => current = parse_positive(&value).unwrap_or(1),
            LIMIT_KEY => size = parse_positive(&value).unwrap_or(config.default_limit),
            SORT_BY_KEY => {
                let value = value.trim();
                sort_by = (!value.is_empty()).then(|| value.to_string());
            }
            SORT_ORDER_KEY => sort_order = SortDirection::parse(&value),
            other => {
                let filter = if config.multi_keys.contains(other) {
                    FilterValue::Multi(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|part| !part.is_empty())
                            .map(str::to_string)
                            .collect(),
                    )
                } else {
                    FilterValue::Single(value.into_owned())
                };
                filters.set(other, filter);
            }
        }
    }

    let sort = sort_by.map(|key| SortSpec::new(key, sort_order.unwrap_or(SortDirection::Asc)));

    ListingState {
        filters,
        sort,
        page: PageState { current, size },
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}
