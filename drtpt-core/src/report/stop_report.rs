use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::percent;
use crate::{
    reader::ReadSummary,
    stop::{StopClassification, StopZoneRelation},
    zone::{ZoneBoundingBox, ZoneGeometryIndex, ZoneQueryStatistics},
};

/// default length of the nearest reachable stops list
pub const DEFAULT_NEAREST_LIMIT: usize = 10;

/// the service area the stops were tested against
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ZoneSummary {
    pub polygons: usize,
    pub area: f64,
    pub bbox: Option<ZoneBoundingBox>,
    pub degenerate: bool,
    pub queries: ZoneQueryStatistics,
}

impl From<&ZoneGeometryIndex> for ZoneSummary {
    fn from(index: &ZoneGeometryIndex) -> Self {
        Self {
            polygons: index.polygon_count(),
            area: index.area(),
            bbox: index.bounding_box(),
            degenerate: index.is_degenerate(),
            queries: index.statistics(),
        }
    }
}

/// a stop outside the service area but within the intermodal radius
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NearestStop {
    pub stop_id: String,
    pub name: String,
    pub distance: f64,
}

/// a stop inside the service area
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InsideStop {
    pub stop_id: String,
    pub name: String,
    pub category: Option<String>,
}

/// partition of the stop registry by relation to the service area.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopReport {
    pub source: ReadSummary,
    pub radius: f64,
    pub zone: ZoneSummary,
    pub total_stops: u64,
    pub inside: u64,
    /// stops within the radius, inside stops included
    pub within_radius: u64,
    /// stops within the radius but not inside
    pub within_radius_outside: u64,
    pub outside_radius: u64,
    pub inside_percent: f64,
    pub within_radius_percent: f64,
    pub outside_radius_percent: f64,
    /// true when not a single stop lies inside the service area, so every
    /// intermodal trip must use a stop outside of it
    pub no_stops_inside: bool,
    /// reachable stops outside the service area, nearest first
    pub nearest_outside: Vec<NearestStop>,
    /// stops inside the service area, registry order
    pub inside_stops: Vec<InsideStop>,
}

impl StopReport {
    pub fn new(
        source: ReadSummary,
        radius: f64,
        zone: ZoneSummary,
        classifications: &[StopClassification],
        nearest_limit: usize,
    ) -> Self {
        let mut inside_stops = vec![];
        let mut reachable = vec![];
        let mut outside_radius = 0;
        for c in classifications.iter() {
            match c.relation() {
                StopZoneRelation::Inside => inside_stops.push(InsideStop {
                    stop_id: c.stop_id.clone(),
                    name: c.display_name().to_string(),
                    category: c.category.clone(),
                }),
                StopZoneRelation::WithinRadius => reachable.push(c),
                StopZoneRelation::OutsideRadius => outside_radius += 1,
            }
        }
        let total_stops = classifications.len() as u64;
        let inside = inside_stops.len() as u64;
        let within_radius_outside = reachable.len() as u64;
        let within_radius = inside + within_radius_outside;

        // stable sort, equal distances keep registry order
        reachable.sort_by(|a, b| {
            a.distance_to_zone
                .partial_cmp(&b.distance_to_zone)
                .unwrap_or(Ordering::Equal)
        });
        let nearest_outside = reachable
            .into_iter()
            .take(nearest_limit)
            .map(|c| NearestStop {
                stop_id: c.stop_id.clone(),
                name: c.display_name().to_string(),
                distance: c.rounded_distance().unwrap_or(f64::NAN),
            })
            .collect();

        Self {
            source,
            radius,
            zone,
            total_stops,
            inside,
            within_radius,
            within_radius_outside,
            outside_radius,
            inside_percent: percent(inside, total_stops),
            within_radius_percent: percent(within_radius, total_stops),
            outside_radius_percent: percent(outside_radius, total_stops),
            no_stops_inside: total_stops > 0 && inside == 0,
            nearest_outside,
            inside_stops,
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "stops: {} read ({} malformed) from '{}'",
            self.total_stops,
            self.source.malformed,
            self.source.path
        );
        log::info!(
            "  inside the DRT area:      {:>8} ({:.1}%)",
            self.inside,
            self.inside_percent
        );
        log::info!(
            "  within {:.0} of the area: {:>8} ({:.1}%)",
            self.radius,
            self.within_radius,
            self.within_radius_percent
        );
        log::info!(
            "  beyond {:.0} of the area: {:>8} ({:.1}%)",
            self.radius,
            self.outside_radius,
            self.outside_radius_percent
        );
        if self.zone.degenerate {
            log::warn!("the zone set has no polygons, distances are undefined");
        }
        if self.no_stops_inside {
            log::warn!(
                "no PT stop lies inside the DRT area, intermodal trips must use stops outside of it"
            );
        }
        for stop in self.nearest_outside.iter() {
            log::info!(
                "  reachable: {} ({}): {:.0} from the area",
                stop.name,
                stop.stop_id,
                stop.distance
            );
        }
        for stop in self.inside_stops.iter() {
            match &stop.category {
                Some(category) => {
                    log::info!("  inside: {} ({}) (cat: {category})", stop.name, stop.stop_id)
                }
                None => log::info!("  inside: {} ({})", stop.name, stop.stop_id),
            }
        }
    }
}

/// one row of the per-stop output file
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopOutputRow {
    pub stop_id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub category: Option<String>,
    pub inside_drt_area: bool,
    pub within_intermodal_radius: bool,
    /// blank when the distance is undefined
    pub distance_to_drt_m: Option<f64>,
}

impl From<&StopClassification> for StopOutputRow {
    fn from(c: &StopClassification) -> Self {
        Self {
            stop_id: c.stop_id.clone(),
            name: c.display_name().to_string(),
            x: c.x,
            y: c.y,
            category: c.category.clone(),
            inside_drt_area: c.inside_zone,
            within_intermodal_radius: c.within_radius,
            distance_to_drt_m: c.rounded_distance(),
        }
    }
}
