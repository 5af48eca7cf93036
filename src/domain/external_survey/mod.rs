//! External survey links and the contextual data they may embed.

mod url_builder;

pub use url_builder::ExternalSurveyUrlBuilder;

/// Contextual values an external survey link can request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddedDataField {
    UserId,
    RegionId,
    StopId,
    RouteId,
    RecentStopIds,
    CurrentLocation,
}

impl EmbeddedDataField {
    /// Parses a server-defined field name; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user_id" => Some(EmbeddedDataField::UserId),
            "region_id" => Some(EmbeddedDataField::RegionId),
            "stop_id" => Some(EmbeddedDataField::StopId),
            "route_id" => Some(EmbeddedDataField::RouteId),
            "recent_stop_ids" => Some(EmbeddedDataField::RecentStopIds),
            "current_location" => Some(EmbeddedDataField::CurrentLocation),
            _ => None,
        }
    }

    /// Query parameter name.
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddedDataField::UserId => "user_id",
            EmbeddedDataField::RegionId => "region_id",
            EmbeddedDataField::StopId => "stop_id",
            EmbeddedDataField::RouteId => "route_id",
            EmbeddedDataField::RecentStopIds => "recent_stop_ids",
            EmbeddedDataField::CurrentLocation => "current_location",
        }
    }
}
