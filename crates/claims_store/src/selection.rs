//! Bulk-action selection
//!
//! The tracker is a plain set of claim ids, independent of filtering and
//! paging. It never scans the collection on mutation. Ids whose claims have
//! left the collection are filtered out when the selection is read.

use std::collections::{BTreeSet, HashSet};

use core_kernel::ClaimId;

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    ids: HashSet<ClaimId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id`; returns true if it is now selected
    pub fn toggle(&mut self, id: ClaimId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Adds every id given; returns how many were newly selected
    pub fn select_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = ClaimId>,
    {
        ids.into_iter().filter(|id| self.ids.insert(id.clone())).count()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &ClaimId, is_live: impl Fn(&ClaimId) -> bool) -> bool {
        self.ids.contains(id) && is_live(id)
    }

    /// Selected ids that are still live, in id order
    pub fn selected(&self, is_live: impl Fn(&ClaimId) -> bool) -> BTreeSet<ClaimId> {
        self.ids.iter().filter(|id| is_live(*id)).cloned().collect()
    }

    pub fn count(&self, is_live: impl Fn(&ClaimId) -> bool) -> usize {
        self.ids.iter().filter(|id| is_live(*id)).count()
    }

    /// Ids held, including any whose claim is gone
    pub fn tracked_len(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ClaimId {
        ClaimId::new(raw).unwrap()
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let mut tracker = SelectionTracker::new();
        assert!(tracker.toggle(id("c1")));
        assert!(!tracker.toggle(id("c1")));
        assert_eq!(tracker.tracked_len(), 0);
    }

    #[test]
    fn test_select_all_counts_new_ids_only() {
        let mut tracker = SelectionTracker::new();
        tracker.toggle(id("c1"));
        let added = tracker.select_all([id("c1"), id("c2"), id("c3")]);
        assert_eq!(added, 2);
        assert_eq!(tracker.tracked_len(), 3);
    }

    #[test]
    fn test_dangling_ids_hidden_on_read() {
        let mut tracker = SelectionTracker::new();
        tracker.select_all([id("c1"), id("c2")]);

        let live = |candidate: &ClaimId| candidate.as_str() == "c2";
        assert_eq!(tracker.selected(live), BTreeSet::from([id("c2")]));
        assert_eq!(tracker.count(live), 1);
        assert!(!tracker.is_selected(&id("c1"), live));
        assert_eq!(tracker.tracked_len(), 2);
    }
}
