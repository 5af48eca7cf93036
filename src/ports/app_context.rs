//! Read-only application context consulted by the engine.
//!
//! Region and location providers live outside the engine; so does the device's
//! cellular-data setting. Only their current values matter here.

use crate::domain::foundation::RegionId;
use crate::domain::transit::Coordinate;

/// Port for the rider's current region and location.
pub trait ApplicationContext: Send + Sync {
    fn current_region_id(&self) -> Option<RegionId>;

    /// Display name of the current region, used to personalise server errors.
    fn current_region_name(&self) -> Option<String>;

    fn current_coordinate(&self) -> Option<Coordinate>;
}

/// Port for the device's per-app cellular data switch.
pub trait CellularDataMonitor: Send + Sync {
    fn is_cellular_data_restricted(&self) -> bool;
}
