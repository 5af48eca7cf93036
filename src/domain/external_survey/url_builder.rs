//! Builds the link to an externally hosted survey.
//!
//! The base URL comes from the first external-survey question that carries a
//! parseable one. Each embedded data field that question asks for is appended
//! as a query parameter when its value is available; unknown field names are
//! ignored so the backend can introduce new ones without breaking old clients.
//! Existing query parameters are kept as they are.

use reqwest::Url;
use tracing::debug;

use super::EmbeddedDataField;
use crate::domain::survey::Survey;
use crate::domain::transit::Stop;
use crate::ports::{ApplicationContext, RecentStopStore};

pub struct ExternalSurveyUrlBuilder<'a> {
    user_id: &'a str,
    context: &'a dyn ApplicationContext,
    recent_stops: &'a dyn RecentStopStore,
}

impl<'a> ExternalSurveyUrlBuilder<'a> {
    pub fn new(
        user_id: &'a str,
        context: &'a dyn ApplicationContext,
        recent_stops: &'a dyn RecentStopStore,
    ) -> Self {
        Self {
            user_id,
            context,
            recent_stops,
        }
    }

    /// Returns `None` when the survey has no question with a valid base URL.
    pub fn build_url(&self, survey: &Survey, stop: Option<&Stop>) -> Option<Url> {
        let (mut url, fields) = survey.ordered_questions().into_iter().find_map(|q| {
            let base = q.content.external_url()?;
            match Url::parse(base) {
                Ok(url) => Some((url, q.content.embedded_data_fields())),
                Err(err) => {
                    debug!(survey_id = %survey.id, question_id = %q.id, error = %err, "invalid external survey URL");
                    None
                }
            }
        })?;

        let mut seen = Vec::new();
        let params: Vec<(&'static str, String)> = fields
            .iter()
            .filter_map(|name| EmbeddedDataField::from_name(name))
            .filter(|field| {
                let first = !seen.contains(field);
                seen.push(*field);
                first
            })
            .filter_map(|field| self.value_for(field, stop).map(|v| (field.name(), v)))
            .collect();

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &params {
                pairs.append_pair(name, value);
            }
        }

        Some(url)
    }

    fn value_for(&self, field: EmbeddedDataField, stop: Option<&Stop>) -> Option<String> {
        match field {
            EmbeddedDataField::UserId => Some(self.user_id.to_string()),
            EmbeddedDataField::RegionId => self.context.current_region_id().map(|id| id.to_string()),
            EmbeddedDataField::StopId => stop.map(|s| s.id.to_string()),
            EmbeddedDataField::RouteId => stop
                .filter(|s| !s.route_ids.is_empty())
                .map(|s| join(s.route_ids.iter().map(|r| r.as_str()))),
            EmbeddedDataField::RecentStopIds => {
                let recent = self.recent_stops.recent_stop_ids();
                (!recent.is_empty()).then(|| join(recent.iter().map(|s| s.as_str())))
            }
            EmbeddedDataField::CurrentLocation => self
                .context
                .current_coordinate()
                // Debug formatting keeps the decimal point on whole numbers ("0.0").
                .map(|c| format!("{:?},{:?}", c.latitude, c.longitude)),
        }
    }
}

fn join<'s>(ids: impl Iterator<Item = &'s str>) -> String {
    ids.collect::<Vec<_>>().join(",")
}
