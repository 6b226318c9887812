use std::collections::BTreeSet;

/// Labels toggled on the active multi-select step. Options have no identity beyond their
/// label text, so two options sharing a label share a toggle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionStore {
    selected: BTreeSet<String>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `label` is selected after the toggle.
    pub fn toggle(&mut self, label: &str) -> bool {
        if self.selected.remove(label) {
            false
        } else {
            self.selected.insert(label.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, label: &str) -> bool {
        self.selected.contains(label)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn snapshot(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Selected labels in the order the step lists its options.
    pub fn ordered_by<'a>(&self, options: &[&'a str]) -> Vec<&'a str> {
        options
            .iter()
            .copied()
            .filter(|label| self.contains(label))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
