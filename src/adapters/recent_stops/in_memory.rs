//! In-memory recent stop store.

use std::collections::VecDeque;
use std::sync::RwLock;

use crate::domain::foundation::StopId;
use crate::ports::RecentStopStore;

/// Number of stops kept when no capacity is given.
pub const DEFAULT_RECENT_STOP_CAPACITY: usize = 10;

/// Most-recent-first list of stops, bounded by capacity.
///
/// Recording a stop that is already present moves it to the front.
#[derive(Debug)]
pub struct InMemoryRecentStopStore {
    stops: RwLock<VecDeque<StopId>>,
    capacity: usize,
}

impl InMemoryRecentStopStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RECENT_STOP_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stops: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Seed with stops already in most-recent-first order.
    pub fn with_stops(stops: impl IntoIterator<Item = StopId>) -> Self {
        let store = Self::new();
        if let Ok(mut current) = store.stops.write() {
            current.extend(stops.into_iter().take(store.capacity));
        }
        store
    }
}

impl Default for InMemoryRecentStopStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecentStopStore for InMemoryRecentStopStore {
    fn recent_stop_ids(&self) -> Vec<StopId> {
        self.stops
            .read()
            .map(|stops| stops.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn record_stop(&self, stop_id: StopId) {
        let Ok(mut stops) = self.stops.write() else {
            return;
        };
        stops.retain(|existing| existing != &stop_id);
        stops.push_front(stop_id);
        stops.truncate(self.capacity);
    }
}
