use serde::{Deserialize, Serialize};

use super::{PopulationReport, StopReport, TripLogReport, TripReport};

/// everything one analysis run produced. sections are absent when their
/// input was not configured.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisReport {
    /// date and time this report was created
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trips: Option<TripReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trip_log: Option<TripLogReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub population: Option<PopulationReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stops: Option<StopReport>,
}

impl Default for AnalysisReport {
    fn default() -> Self {
        Self {
            created: chrono::Utc::now().to_rfc3339(),
            trips: None,
            trip_log: None,
            population: None,
            stops: None,
        }
    }
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_none()
            && self.trip_log.is_none()
            && self.population.is_none()
            && self.stops.is_none()
    }
}
