//! Transit context values a survey can be shown against.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RouteId, StopId};

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A transit stop and the routes serving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub coordinate: Coordinate,
    /// Route identifiers in the order the backend lists them.
    #[serde(default)]
    pub route_ids: Vec<RouteId>,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate,
            route_ids: Vec::new(),
        }
    }

    pub fn with_routes(mut self, route_ids: impl IntoIterator<Item = RouteId>) -> Self {
        self.route_ids = route_ids.into_iter().collect();
        self
    }

    pub fn is_served_by(&self, route_id: &RouteId) -> bool {
        self.route_ids.contains(route_id)
    }
}
