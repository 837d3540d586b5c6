use std::collections::{BTreeMap, BTreeSet};

/// Selected option keys per exam position. Empty selections are never stored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Answers(BTreeMap<usize, BTreeSet<char>>);

impl Answers {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, position: usize) -> Option<&BTreeSet<char>> {
        self.0.get(&position)
    }

    pub fn selection(&self, position: usize) -> BTreeSet<char> {
        self.0.get(&position).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, position: usize, selection: BTreeSet<char>) {
        if selection.is_empty() {
            self.0.remove(&position);
        } else {
            self.0.insert(position, selection);
        }
    }

    pub fn clear(&mut self, position: usize) {
        self.0.remove(&position);
    }

    pub fn is_answered(&self, position: usize) -> bool {
        self.0.contains_key(&position)
    }

    pub fn answered_count(&self) -> usize {
        self.0.len()
    }
}
