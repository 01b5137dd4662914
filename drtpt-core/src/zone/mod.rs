//! the DRT service area: zone file loading and the geometry index that
//! answers containment, distance and buffered-radius queries.
mod error;
mod geometry_index;
mod zone_source;

pub use error::ZoneError;
pub use geometry_index::{ZoneBoundingBox, ZoneGeometryIndex, ZoneQueryStatistics};
pub use zone_source::{declares_geographic_projection, read_zone_polygons, ZoneFormat};
