mod stop_classification;
mod stop_zone_analyzer;

pub use stop_classification::{StopClassification, StopZoneRelation};
pub use stop_zone_analyzer::{StopZoneAnalyzer, DEFAULT_INTERMODAL_RADIUS};
