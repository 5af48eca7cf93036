//! Static application context
//!
//! Holds region, location and cellular state set by the host application.
//! Values can be swapped at runtime; readers always see the latest ones.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::domain::foundation::RegionId;
use crate::domain::transit::Coordinate;
use crate::ports::{ApplicationContext, CellularDataMonitor};

#[derive(Debug, Clone, Default)]
struct Region {
    id: Option<RegionId>,
    name: Option<String>,
}

/// Application context backed by values the host sets.
#[derive(Debug, Default)]
pub struct StaticApplicationContext {
    region: RwLock<Region>,
    coordinate: RwLock<Option<Coordinate>>,
}

impl StaticApplicationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(self, id: RegionId, name: impl Into<String>) -> Self {
        self.set_region(Some(id), Some(name.into()));
        self
    }

    pub fn with_coordinate(self, coordinate: Coordinate) -> Self {
        self.set_coordinate(Some(coordinate));
        self
    }

    pub fn set_region(&self, id: Option<RegionId>, name: Option<String>) {
        if let Ok(mut region) = self.region.write() {
            *region = Region { id, name };
        }
    }

    pub fn set_coordinate(&self, coordinate: Option<Coordinate>) {
        if let Ok(mut current) = self.coordinate.write() {
            *current = coordinate;
        }
    }
}

impl ApplicationContext for StaticApplicationContext {
    fn current_region_id(&self) -> Option<RegionId> {
        self.region.read().ok().and_then(|r| r.id)
    }

    fn current_region_name(&self) -> Option<String> {
        self.region.read().ok().and_then(|r| r.name.clone())
    }

    fn current_coordinate(&self) -> Option<Coordinate> {
        self.coordinate.read().ok().and_then(|c| *c)
    }
}

/// Cellular data switch the host flips.
#[derive(Debug, Default)]
pub struct StaticCellularDataMonitor {
    restricted: AtomicBool,
}

impl StaticCellularDataMonitor {
    pub fn new(restricted: bool) -> Self {
        Self {
            restricted: AtomicBool::new(restricted),
        }
    }

    pub fn set_restricted(&self, restricted: bool) {
        self.restricted.store(restricted, Ordering::Relaxed);
    }
}

impl CellularDataMonitor for StaticCellularDataMonitor {
    fn is_cellular_data_restricted(&self) -> bool {
        self.restricted.load(Ordering::Relaxed)
    }
}
