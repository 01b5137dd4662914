use std::sync::Arc;

use super::StopClassification;
use crate::{model::StopRecord, zone::ZoneGeometryIndex};

/// default intermodal catchment radius, in zone units (meters)
pub const DEFAULT_INTERMODAL_RADIUS: f64 = 5000.0;

/// classifies stops against a shared service area at a fixed radius.
#[derive(Clone, Debug)]
pub struct StopZoneAnalyzer {
    index: Arc<ZoneGeometryIndex>,
    radius: f64,
}

impl StopZoneAnalyzer {
    pub fn new(index: Arc<ZoneGeometryIndex>, radius: f64) -> Self {
        Self { index, radius }
    }

    /// one containment query, one buffered query and, for stops outside the
    /// service area, one distance query.
    pub fn classify(&self, stop: StopRecord) -> StopClassification {
        let point = stop.point();
        let inside = self.index.contains(&point);
        let within = inside || self.index.within_radius(&point, self.radius);
        let distance = if inside {
            0.0
        } else {
            self.index.distance_to_zone(&point)
        };
        StopClassification::new(stop, inside, within, distance)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::StopZoneAnalyzer;
    use crate::model::StopRecord;
    use crate::stop::StopZoneRelation;
    use crate::zone::ZoneGeometryIndex;
    use geo::polygon;

    fn stop(id: &str, x: f64, y: f64) -> StopRecord {
        StopRecord {
            stop_id: id.to_string(),
            x,
            y,
            name: None,
            category: None,
        }
    }

    fn square_index() -> Arc<ZoneGeometryIndex> {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 10_000.0, y: 0.0),
            (x: 10_000.0, y: 10_000.0),
            (x: 0.0, y: 10_000.0),
            (x: 0.0, y: 0.0),
        ];
        Arc::new(ZoneGeometryIndex::new(vec![square]))
    }

    #[test]
    fn test_stop_3000_from_boundary() {
        let index = square_index();
        let wide = StopZoneAnalyzer::new(index.clone(), 5000.0).classify(stop("s", 13_000.0, 5_000.0));
        assert!(!wide.inside_zone);
        assert!(wide.within_radius);
        assert_eq!(wide.rounded_distance(), Some(3000.0));
        assert_eq!(wide.relation(), StopZoneRelation::WithinRadius);

        let narrow = StopZoneAnalyzer::new(index, 2000.0).classify(stop("s", 13_000.0, 5_000.0));
        assert!(!narrow.within_radius);
        assert_eq!(narrow.relation(), StopZoneRelation::OutsideRadius);
    }

    #[test]
    fn test_boundary_stop() {
        let analyzer = StopZoneAnalyzer::new(square_index(), 5000.0);
        let result = analyzer.classify(stop("edge", 0.0, 5_000.0));
        assert!(result.inside_zone);
        assert!(result.within_radius);
        assert_eq!(result.distance_to_zone, 0.0);
        assert_eq!(result.relation(), StopZoneRelation::Inside);
    }

    #[test]
    fn test_degenerate_zone_gives_undefined_distance() {
        let analyzer = StopZoneAnalyzer::new(Arc::new(ZoneGeometryIndex::new(vec![])), 5000.0);
        let result = analyzer.classify(stop("s", 1.0, 1.0));
        assert!(!result.inside_zone);
        assert!(!result.within_radius);
        assert_eq!(result.rounded_distance(), None);
    }
}
