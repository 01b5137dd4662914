use serde::{Deserialize, Serialize};

use crate::model::StopRecord;

/// where a stop lies relative to the service area and the intermodal radius
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StopZoneRelation {
    Inside,
    WithinRadius,
    OutsideRadius,
}

/// the spatial classification of one stop. carries the stop fields needed
/// for reporting so that results can be written without the registry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopClassification {
    pub stop_id: String,
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub category: Option<String>,
    pub inside_zone: bool,
    pub within_radius: bool,
    /// 0 when inside, NaN when the service area is degenerate
    pub distance_to_zone: f64,
}

impl StopClassification {
    pub fn new(stop: StopRecord, inside_zone: bool, within_radius: bool, distance: f64) -> Self {
        Self {
            stop_id: stop.stop_id,
            name: stop.name,
            x: stop.x,
            y: stop.y,
            category: stop.category,
            inside_zone,
            within_radius,
            distance_to_zone: distance,
        }
    }

    pub fn relation(&self) -> StopZoneRelation {
        if self.inside_zone {
            StopZoneRelation::Inside
        } else if self.within_radius {
            StopZoneRelation::WithinRadius
        } else {
            StopZoneRelation::OutsideRadius
        }
    }

    /// distance rounded to one decimal, None when undefined
    pub fn rounded_distance(&self) -> Option<f64> {
        if self.distance_to_zone.is_finite() {
            Some((self.distance_to_zone * 10.0).round() / 10.0)
        } else {
            None
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("N/A")
    }
}
