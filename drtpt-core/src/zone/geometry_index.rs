use std::{
    collections::HashMap,
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        PoisonError, RwLock,
    },
};

use geo::{
    Area, BooleanOps, BoundingRect, Buffer, Distance, Euclidean, Intersects, MultiPolygon, Point,
    Polygon, Rect,
};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::{zone_source, ZoneError};

/// the service area of the DRT fleet, as the union of all zone polygons.
///
/// answers containment, distance-to-boundary and buffered-radius queries in
/// the planar units of the zone file. buffered unions are computed once per
/// radius and shared by later queries. a zone set with no polygons is
/// degenerate: nothing is contained, nothing is within any radius and all
/// distances are NaN.
#[derive(Debug)]
pub struct ZoneGeometryIndex {
    union: MultiPolygon<f64>,
    polygon_count: usize,
    buffered: RwLock<HashMap<OrderedFloat<f64>, MultiPolygon<f64>>>,
    checks: AtomicU64,
    inside: AtomicU64,
}

/// axis-aligned extent of the service area
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ZoneBoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// counts of containment checks answered by a [`ZoneGeometryIndex`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoneQueryStatistics {
    pub checks: u64,
    pub inside: u64,
    pub outside: u64,
}

impl ZoneGeometryIndex {
    /// unions the polygons into a single service area
    pub fn new(polygons: Vec<Polygon<f64>>) -> ZoneGeometryIndex {
        let polygon_count = polygons.len();
        let union = match polygons.len() {
            0 => MultiPolygon::new(vec![]),
            1 => MultiPolygon::new(polygons),
            _ => polygons
                .iter()
                .fold(MultiPolygon::new(vec![]), |acc, p| acc.union(p)),
        };
        ZoneGeometryIndex {
            union,
            polygon_count,
            buffered: RwLock::new(HashMap::new()),
            checks: AtomicU64::new(0),
            inside: AtomicU64::new(0),
        }
    }

    /// loads a zone file (GeoJSON, shapefile or WKT) and builds the index.
    ///
    /// unless `allow_geographic` is set, a zone whose extent fits within
    /// longitude/latitude ranges, or whose shapefile projection declares a
    /// geographic system, is rejected since its distances would be in degrees.
    pub fn from_file(path: &Path, allow_geographic: bool) -> Result<ZoneGeometryIndex, ZoneError> {
        let polygons = zone_source::read_zone_polygons(path)?;
        let index = ZoneGeometryIndex::new(polygons);
        if !allow_geographic {
            if zone_source::declares_geographic_projection(path) {
                return Err(ZoneError::NonMetricCoordinates {
                    path: path.to_path_buf(),
                    message: String::from("projection file declares GEOGCS"),
                });
            }
            if let Some(bbox) = index.bounding_box() {
                if bbox.is_geographic_range() {
                    return Err(ZoneError::NonMetricCoordinates {
                        path: path.to_path_buf(),
                        message: format!(
                            "extent [{}, {}, {}, {}] lies within longitude/latitude bounds",
                            bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y
                        ),
                    });
                }
            }
        }
        log::info!(
            "loaded {} zone polygon(s) from '{}' into a service area of {} part(s)",
            index.polygon_count,
            path.display(),
            index.union.0.len()
        );
        Ok(index)
    }

    /// true when the zone set had no polygons
    pub fn is_degenerate(&self) -> bool {
        self.union.0.is_empty()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygon_count
    }

    pub fn union(&self) -> &MultiPolygon<f64> {
        &self.union
    }

    pub fn area(&self) -> f64 {
        self.union.unsigned_area()
    }

    pub fn bounding_box(&self) -> Option<ZoneBoundingBox> {
        self.union.bounding_rect().map(ZoneBoundingBox::from)
    }

    /// true if the point lies inside the service area or on its boundary.
    /// each call is counted in the query statistics.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        let inside = self.covers(point);
        self.checks.fetch_add(1, Ordering::Relaxed);
        if inside {
            self.inside.fetch_add(1, Ordering::Relaxed);
        }
        inside
    }

    /// true if either endpoint of a trip lies inside the service area
    pub fn contains_either(&self, origin: &Point<f64>, destination: &Point<f64>) -> bool {
        self.contains(origin) || self.contains(destination)
    }

    /// 0 inside the service area, otherwise the shortest planar distance to
    /// its boundary. NaN for a degenerate zone set.
    pub fn distance_to_zone(&self, point: &Point<f64>) -> f64 {
        if self.is_degenerate() {
            return f64::NAN;
        }
        if self.covers(point) {
            return 0.0;
        }
        self.distance_to_boundary(point)
    }

    /// true if the point lies within the service area grown by `radius`, i.e.
    /// iff `distance_to_zone(point) <= radius`. a radius of zero (or less)
    /// tests against the service area itself.
    ///
    /// the memoized buffered union approximates rounded corners with chords, so
    /// it lies inside the exact buffer: a hit is final, a miss falls back to
    /// the exact boundary distance.
    pub fn within_radius(&self, point: &Point<f64>, radius: f64) -> bool {
        if self.is_degenerate() {
            return false;
        }
        if self.covers(point) {
            return true;
        }
        if radius.is_nan() || radius <= 0.0 {
            return false;
        }
        self.buffered_contains(point, radius) || self.distance_to_boundary(point) <= radius
    }

    /// number of distinct radii with a memoized buffered union
    pub fn buffered_radius_count(&self) -> usize {
        self.buffered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn statistics(&self) -> ZoneQueryStatistics {
        let checks = self.checks.load(Ordering::Relaxed);
        let inside = self.inside.load(Ordering::Relaxed);
        ZoneQueryStatistics {
            checks,
            inside,
            outside: checks.saturating_sub(inside),
        }
    }

    pub fn log_statistics(&self) {
        let stats = self.statistics();
        if stats.checks == 0 {
            log::info!("service area: no containment checks performed");
            return;
        }
        let pct = |n: u64| n as f64 * 100.0 / stats.checks as f64;
        log::info!(
            "service area: {} checks, {} inside ({:.1}%), {} outside ({:.1}%)",
            stats.checks,
            stats.inside,
            pct(stats.inside),
            stats.outside,
            pct(stats.outside)
        );
    }

    fn covers(&self, point: &Point<f64>) -> bool {
        !self.is_degenerate() && self.union.intersects(point)
    }

    fn buffered_contains(&self, point: &Point<f64>, radius: f64) -> bool {
        let key = OrderedFloat(radius);
        {
            let cache = self.buffered.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(buffered) = cache.get(&key) {
                return buffered.intersects(point);
            }
        }
        let mut cache = self.buffered.write().unwrap_or_else(PoisonError::into_inner);
        let buffered = cache.entry(key).or_insert_with(|| {
            log::debug!("buffering service area by {radius}");
            self.union.buffer(radius)
        });
        buffered.intersects(point)
    }

    fn distance_to_boundary(&self, point: &Point<f64>) -> f64 {
        self.union
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .map(|ring| Euclidean.distance(point, ring))
            .fold(f64::INFINITY, f64::min)
    }
}

impl ZoneBoundingBox {
    /// true if the whole extent fits within [-180, 180] x [-90, 90]
    pub fn is_geographic_range(&self) -> bool {
        self.min_x >= -180.0 && self.max_x <= 180.0 && self.min_y >= -90.0 && self.max_y <= 90.0
    }
}

impl From<Rect<f64>> for ZoneBoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        ZoneBoundingBox {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        }
    }
}

#[cfg(test)]
mod test {
    use super::ZoneGeometryIndex;
    use crate::zone::ZoneError;
    use geo::{polygon, Point, Polygon};

    fn square(min: f64, max: f64) -> Polygon<f64> {
        polygon![
            (x: min, y: min),
            (x: max, y: min),
            (x: max, y: max),
            (x: min, y: max),
            (x: min, y: min),
        ]
    }

    #[test]
    fn test_boundary_point_is_inside() {
        let index = ZoneGeometryIndex::new(vec![square(0.0, 10_000.0)]);
        let p = Point::new(10_000.0, 5_000.0);
        assert!(index.contains(&p));
        assert_eq!(index.distance_to_zone(&p), 0.0);
    }

    #[test]
    fn test_radius_around_outside_stop() {
        let index = ZoneGeometryIndex::new(vec![square(0.0, 10_000.0)]);
        let p = Point::new(13_000.0, 5_000.0);
        assert!(!index.contains(&p));
        assert!((index.distance_to_zone(&p) - 3_000.0).abs() < 1e-9);
        assert!(index.within_radius(&p, 5_000.0));
        assert!(!index.within_radius(&p, 2_000.0));
        assert_eq!(index.buffered_radius_count(), 2);
        // memoized radius is reused
        assert!(index.within_radius(&p, 5_000.0));
        assert_eq!(index.buffered_radius_count(), 2);
    }

    #[test]
    fn test_radius_agrees_with_distance_around_corners() {
        let index = ZoneGeometryIndex::new(vec![square(0.0, 10_000.0)]);
        let radius = 5_000.0;
        let corner = (10_000.0, 10_000.0);
        for distance in [4_990.0, 4_999.0, 4_999.9, 5_000.1, 5_010.0] {
            // quarter circle around the corner, outside the square
            for step in 0..=90 {
                let angle = (step as f64).to_radians();
                let p = Point::new(
                    corner.0 + distance * angle.cos(),
                    corner.1 + distance * angle.sin(),
                );
                let exact = index.distance_to_zone(&p);
                assert_eq!(
                    index.within_radius(&p, radius),
                    exact <= radius,
                    "{p:?} at distance {exact}"
                );
            }
        }
    }

    #[test]
    fn test_contained_points_are_within_every_radius() {
        let index = ZoneGeometryIndex::new(vec![square(0.0, 10_000.0), square(20_000.0, 30_000.0)]);
        let points = [
            Point::new(0.0, 0.0),
            Point::new(5_000.0, 5_000.0),
            Point::new(25_000.0, 30_000.0),
            Point::new(15_000.0, 5_000.0),
        ];
        for p in points.iter() {
            for r in [0.0, 1.0, 500.0, 5_000.0] {
                if index.contains(p) {
                    assert!(index.within_radius(p, r), "{p:?} at radius {r}");
                }
            }
        }
    }

    #[test]
    fn test_disjoint_parts_and_holes() {
        let with_hole = Polygon::new(
            square(0.0, 10_000.0).exterior().clone(),
            vec![square(4_000.0, 6_000.0).exterior().clone()],
        );
        let index = ZoneGeometryIndex::new(vec![with_hole, square(20_000.0, 30_000.0)]);
        let in_hole = Point::new(5_000.0, 5_000.0);
        assert!(!index.contains(&in_hole));
        assert!((index.distance_to_zone(&in_hole) - 1_000.0).abs() < 1e-9);
        let between = Point::new(15_000.0, 5_000.0);
        assert!((index.distance_to_zone(&between) - 5_000.0).abs() < 1e-9);
        assert!(index.contains(&Point::new(25_000.0, 25_000.0)));
    }

    #[test]
    fn test_overlapping_polygons_are_unioned() {
        let index = ZoneGeometryIndex::new(vec![square(0.0, 10_000.0), square(5_000.0, 15_000.0)]);
        assert_eq!(index.union().0.len(), 1);
        let expected_area = 2.0 * 10_000.0 * 10_000.0 - 5_000.0 * 5_000.0;
        assert!((index.area() - expected_area).abs() < expected_area * 1e-6);
    }

    #[test]
    fn test_degenerate_zone() {
        let index = ZoneGeometryIndex::new(vec![]);
        let p = Point::new(1.0, 1.0);
        assert!(index.is_degenerate());
        assert!(!index.contains(&p));
        assert!(!index.within_radius(&p, 5_000.0));
        assert!(index.distance_to_zone(&p).is_nan());
        assert_eq!(index.bounding_box(), None);
    }

    #[test]
    fn test_statistics() {
        let index = ZoneGeometryIndex::new(vec![square(0.0, 10_000.0)]);
        assert!(index.contains_either(&Point::new(20_000.0, 0.0), &Point::new(1.0, 1.0)));
        assert!(!index.contains(&Point::new(-1.0, -1.0)));
        let stats = index.statistics();
        assert_eq!(stats.checks, 3);
        assert_eq!(stats.inside, 1);
        assert_eq!(stats.outside, 2);
    }

    #[test]
    fn test_geographic_projection_file_is_rejected() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = dir.path().join("zone.wkt");
        let contents = "POLYGON((0 0,10000 0,10000 10000,0 10000,0 0))\n";
        std::fs::write(&path, contents).expect("test invariant failed: cannot write fixture");
        let prj = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;
        std::fs::write(dir.path().join("zone.prj"), prj)
            .expect("test invariant failed: cannot write fixture");
        assert!(matches!(
            ZoneGeometryIndex::from_file(&path, false),
            Err(ZoneError::NonMetricCoordinates { .. })
        ));
        let index = ZoneGeometryIndex::from_file(&path, true).expect("should load when allowed");
        assert!(!index.is_degenerate());
    }

    #[test]
    fn test_geographic_extent_is_rejected() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = dir.path().join("zone.wkt");
        let contents = "POLYGON((8.5 47.3,8.6 47.3,8.6 47.4,8.5 47.4,8.5 47.3))\n";
        std::fs::write(&path, contents).expect("test invariant failed: cannot write fixture");
        assert!(matches!(
            ZoneGeometryIndex::from_file(&path, false),
            Err(ZoneError::NonMetricCoordinates { .. })
        ));
        let index = ZoneGeometryIndex::from_file(&path, true).expect("should load when allowed");
        assert_eq!(index.polygon_count(), 1);
    }
}
