use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    Multi(Vec<String>),
}

impl FilterValue {
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Single(value) => value.trim().is_empty(),
            FilterValue::Multi(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }

    /// Multi-value filters travel comma-joined, both in the URL and to the backend.
    pub fn joined(&self) -> String {
        match self {
            FilterValue::Single(value) => value.clone(),
            FilterValue::Multi(values) => values.join(","),
        }
    }

    pub fn values(&self) -> Vec<String> {
        match self {
            FilterValue::Single(value) => vec![value.clone()],
            FilterValue::Multi(values) => values.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState(BTreeMap<String, FilterValue>);

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: FilterValue) {
        let key = key.into();
        if value.is_blank() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, FilterValue::Single(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

pub type SortState = Option<SortSpec>;

/// Header-click cycle for one column: none, ascending, descending, none.
pub fn next_sort(current: &SortState, key: &str) -> SortState {
    match current {
        Some(spec) if spec.key == key => match spec.direction {
            SortDirection::Asc => Some(SortSpec::new(key, SortDirection::Desc)),
            SortDirection::Desc => None,
        },
        _ => Some(SortSpec::new(key, SortDirection::Asc)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current: u32,
    pub size: u32,
}

impl PageState {
    pub fn first(size: u32) -> Self {
        Self {
            current: 1,
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.current.saturating_sub(1)) * u64::from(self.size)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

pub fn page_count(total: u64, size: u32) -> u32 {
    if total == 0 || size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingState {
    pub filters: FilterState,
    pub sort: SortState,
    pub page: PageState,
}

impl ListingState {
    pub fn with_page_size(size: u32) -> Self {
        Self {
            filters: FilterState::new(),
            sort: None,
            page: PageState::first(size),
        }
    }
}
