//! Change notification
//!
//! Observers are registered explicitly on a store and receive one
//! `StoreChange` per mutating operation, after the operation has finished.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::projection::Page;

/// Which operation produced a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    ClaimsReplaced,
    ClaimUpdated,
    ClaimsBulkUpdated,
    FiltersChanged,
    SortChanged,
    PageChanged,
    PageSizeChanged,
    SelectionChanged,
    LoadingChanged,
    ErrorChanged,
}

/// Snapshot delivered to observers
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub kind: ChangeKind,
    /// Collection revision after the operation
    pub revision: u64,
    pub page: Arc<Page>,
    pub selected_count: usize,
    pub loading: bool,
    pub error: Option<String>,
}

pub trait StoreObserver {
    fn on_change(&mut self, change: &StoreChange);
}

impl<F> StoreObserver for F
where
    F: FnMut(&StoreChange),
{
    fn on_change(&mut self, change: &StoreChange) {
        self(change)
    }
}

/// Forwards every change into a channel; a closed receiver is ignored
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<StoreChange>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<StoreChange>) -> Self {
        Self { sender }
    }
}

impl StoreObserver for ChannelObserver {
    fn on_change(&mut self, change: &StoreChange) {
        let _ = self.sender.send(change.clone());
    }
}

/// Handle returned by `ClaimsStore::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Box<dyn StoreObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn StoreObserver>) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    /// Delivers `change` to every observer in registration order
    pub(crate) fn notify(&mut self, change: &StoreChange) {
        for (_, observer) in &mut self.observers {
            observer.on_change(change);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
