use std::collections::BTreeSet;

use crate::domain::form::schema::SelectOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Available,
    Assigned,
}

/// Two-table picker. The assigned side, in option order, is the field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualListState {
    options: Vec<SelectOption>,
    assigned: BTreeSet<String>,
    selected_available: BTreeSet<String>,
    selected_assigned: BTreeSet<String>,
}

impl DualListState {
    pub fn new(options: Vec<SelectOption>, assigned: &[String]) -> Self {
        let assigned = assigned
            .iter()
            .filter(|key| options.iter().any(|o| &o.value == *key))
            .cloned()
            .collect();
        Self {
            assigned,
            options,
            selected_available: BTreeSet::new(),
            selected_assigned: BTreeSet::new(),
        }
    }

    /// Takes new options or a new assigned list from the form, keeping row
    /// selections that are still on their side.
    pub fn resync(&mut self, options: Vec<SelectOption>, assigned: &[String]) {
        let selected_available = std::mem::take(&mut self.selected_available);
        let selected_assigned = std::mem::take(&mut self.selected_assigned);
        *self = Self::new(options, assigned);
        self.selected_available = selected_available
            .into_iter()
            .filter(|key| self.on_side(Side::Available, key))
            .collect();
        self.selected_assigned = selected_assigned
            .into_iter()
            .filter(|key| self.on_side(Side::Assigned, key))
            .collect();
    }

    pub fn available(&self) -> Vec<&SelectOption> {
        self.options
            .iter()
            .filter(|option| !self.assigned.contains(&option.value))
            .collect()
    }

    pub fn assigned(&self) -> Vec<&SelectOption> {
        self.options
            .iter()
            .filter(|option| self.assigned.contains(&option.value))
            .collect()
    }

    pub fn assigned_keys(&self) -> Vec<String> {
        self.assigned().into_iter().map(|o| o.value.clone()).collect()
    }

    pub fn is_selected(&self, side: Side, key: &str) -> bool {
        self.selection(side).contains(key)
    }

    pub fn selected_count(&self, side: Side) -> usize {
        self.selection(side).len()
    }

    /// Full-row click.
    pub fn toggle_row(&mut self, side: Side, key: &str) {
        if !self.on_side(side, key) {
            return;
        }
        let selection = self.selection_mut(side);
        if !selection.remove(key) {
            selection.insert(key.to_string());
        }
    }

    /// Header checkbox: selects every row of the side, or clears when all are selected.
    pub fn toggle_all(&mut self, side: Side) {
        let keys: BTreeSet<String> = match side {
            Side::Available => self.available().into_iter().map(|o| o.value.clone()).collect(),
            Side::Assigned => self.assigned.clone(),
        };
        let selection = self.selection_mut(side);
        if !keys.is_empty() && *selection == keys {
            selection.clear();
        } else {
            *selection = keys;
        }
    }

    pub fn move_to_assigned(&mut self) -> usize {
        let moved = std::mem::take(&mut self.selected_available);
        let count = moved.len();
        self.assigned.extend(moved);
        count
    }

    pub fn move_to_available(&mut self) -> usize {
        let moved = std::mem::take(&mut self.selected_assigned);
        let count = moved.len();
        for key in moved {
            self.assigned.remove(&key);
        }
        count
    }

    fn on_side(&self, side: Side, key: &str) -> bool {
        let known = self.options.iter().any(|o| o.value == key);
        known
            && match side {
                Side::Available => !self.assigned.contains(key),
                Side::Assigned => self.assigned.contains(key),
            }
    }

    fn selection(&self, side: Side) -> &BTreeSet<String> {
        match side {
            Side::Available => &self.selected_available,
            Side::Assigned => &self.selected_assigned,
        }
    }

    fn selection_mut(&mut self, side: Side) -> &mut BTreeSet<String> {
        match side {
            Side::Available => &mut self.selected_available,
            Side::Assigned => &mut self.selected_assigned,
        }
    }
}
