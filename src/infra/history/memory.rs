use std::sync::Mutex;

use crate::usecase::ports::history::History;

#[derive(Debug)]
struct Entries {
    queries: Vec<String>,
    cursor: usize,
}

/// Session history kept in memory; the desktop shell has no address bar of its own.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<Entries>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Mutex::new(Entries {
                queries: vec![strip(initial).to_string()],
                cursor: 0,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.with(|entries| entries.queries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with<T>(&self, f: impl FnOnce(&mut Entries) -> T) -> T {
        // a poisoned lock still holds a consistent list of strings
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl History for MemoryHistory {
    fn current_query(&self) -> String {
        self.with(|entries| entries.queries[entries.cursor].clone())
    }

    fn push_query(&self, query: &str) {
        let query = strip(query);
        self.with(|entries| {
            if entries.queries[entries.cursor] == query {
                return;
            }
            let keep = entries.cursor + 1;
            entries.queries.truncate(keep);
            entries.queries.push(query.to_string());
            entries.cursor = keep;
        });
    }

    fn replace_query(&self, query: &str) {
        let query = strip(query);
        self.with(|entries| {
            let cursor = entries.cursor;
            entries.queries[cursor] = query.to_string();
        });
    }

    fn back(&self) -> Option<String> {
        self.with(|entries| {
            if entries.cursor == 0 {
                return None;
            }
            entries.cursor -= 1;
            Some(entries.queries[entries.cursor].clone())
        })
    }

    fn forward(&self) -> Option<String> {
        self.with(|entries| {
            if entries.cursor + 1 >= entries.queries.len() {
                return None;
            }
            entries.cursor += 1;
            Some(entries.queries[entries.cursor].clone())
        })
    }
}

fn strip(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}
