//! RecentStopStore port - Stops the rider looked at recently.

use crate::domain::foundation::StopId;

/// Ordered record of recently viewed stops.
///
/// Append-only from the engine's side.
pub trait RecentStopStore: Send + Sync {
    /// Recent stop ids in store order.
    fn recent_stop_ids(&self) -> Vec<StopId>;

    fn record_stop(&self, stop_id: StopId);
}
