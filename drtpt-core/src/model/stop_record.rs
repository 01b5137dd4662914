use geo::Point;
use serde::{Deserialize, Serialize};

/// a transit stop facility from the stop registry. coordinates are in the
/// (planar) coordinate system of the simulation scenario.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopRecord {
    pub stop_id: String,
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
    /// value of the `stopCategory` attribute, if the registry carries one
    pub category: Option<String>,
}

impl StopRecord {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }

    /// display name, "N/A" when the registry has none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("N/A")
    }
}
