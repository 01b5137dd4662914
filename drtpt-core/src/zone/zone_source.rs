use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;
use geo::{Geometry, Polygon};
use serde::{Deserialize, Serialize};
use wkt::TryFromWkt;

use super::ZoneError;
use crate::reader::is_gzip;

/// file formats a service-area zone set can be read from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ZoneFormat {
    /// FeatureCollection, Feature or bare Geometry. may be gzipped
    GeoJson,
    /// ESRI shapefile with polygon shapes
    Shapefile,
    /// one WKT geometry per non-empty line. may be gzipped
    Wkt,
}

impl ZoneFormat {
    /// detects the format from the file extension, ignoring a trailing `.gz`
    pub fn from_path(path: &Path) -> Result<ZoneFormat, ZoneError> {
        let inner = if is_gzip(path) {
            PathBuf::from(path.file_stem().unwrap_or_default())
        } else {
            path.to_path_buf()
        };
        let extension = inner
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "geojson" | "json" => Ok(ZoneFormat::GeoJson),
            "shp" if !is_gzip(path) => Ok(ZoneFormat::Shapefile),
            "wkt" => Ok(ZoneFormat::Wkt),
            _ => Err(ZoneError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// reads every polygon of a zone file. multi-part and collection geometries
/// are flattened into their polygon parts.
pub fn read_zone_polygons(path: &Path) -> Result<Vec<Polygon<f64>>, ZoneError> {
    match ZoneFormat::from_path(path)? {
        ZoneFormat::GeoJson => read_geojson(path),
        ZoneFormat::Shapefile => read_shapefile(path),
        ZoneFormat::Wkt => read_wkt(path),
    }
}

/// true if a `.prj` file next to `path` declares a geographic coordinate system
pub fn declares_geographic_projection(path: &Path) -> bool {
    let prj = path.with_extension("prj");
    std::fs::read_to_string(prj)
        .map(|text| text.trim_start().to_ascii_uppercase().starts_with("GEOGCS"))
        .unwrap_or_default()
}

fn read_text(path: &Path) -> Result<String, ZoneError> {
    let file = File::open(path).map_err(|e| ZoneError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut text = String::new();
    let result = if is_gzip(path) {
        MultiGzDecoder::new(BufReader::new(file)).read_to_string(&mut text)
    } else {
        BufReader::new(file).read_to_string(&mut text)
    };
    result.map_err(|e| ZoneError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(text)
}

fn read_geojson(path: &Path) -> Result<Vec<Polygon<f64>>, ZoneError> {
    let geojson_value = read_text(path)?
        .parse::<geojson::GeoJson>()
        .map_err(|e| ZoneError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let geometries = match geojson_value {
        geojson::GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .enumerate()
            .filter_map(|(n, f)| f.geometry.map(|g| (format!("feature {n}"), g)))
            .collect::<Vec<_>>(),
        geojson::GeoJson::Feature(feature) => feature
            .geometry
            .map(|g| vec![(String::from("feature 0"), g)])
            .unwrap_or_default(),
        geojson::GeoJson::Geometry(geometry) => vec![(String::from("geometry"), geometry)],
    };

    let mut polygons = vec![];
    for (item, geom_json) in geometries {
        let geometry: Geometry<f64> = geom_json.try_into().map_err(|e| ZoneError::Deserialize {
            item: item.clone(),
            path: path.to_path_buf(),
            message: format!("failure decoding GeoJson geometry to geo-types: {e}"),
        })?;
        collect_polygons(geometry, &mut polygons).map_err(|message| ZoneError::Deserialize {
            item,
            path: path.to_path_buf(),
            message,
        })?;
    }
    Ok(polygons)
}

fn read_shapefile(path: &Path) -> Result<Vec<Polygon<f64>>, ZoneError> {
    let shapes = shapefile::read_shapes(path).map_err(|e| ZoneError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut polygons = vec![];
    for (idx, shape) in shapes.into_iter().enumerate() {
        let converted: Result<geo::MultiPolygon<f64>, String> = match shape {
            shapefile::Shape::Polygon(generic_polygon) => generic_polygon
                .try_into()
                .map_err(|e| format!("failed to convert shapefile polygon: {e}")),
            shapefile::Shape::PolygonM(generic_polygon) => generic_polygon
                .try_into()
                .map_err(|e| format!("failed to convert shapefile polygon: {e}")),
            other => Err(format!(
                "unexpected shape type {}, must be polygonal",
                other.shapetype()
            )),
        };
        let multipolygon = converted.map_err(|message| ZoneError::Deserialize {
            item: format!("shape {idx}"),
            path: path.to_path_buf(),
            message,
        })?;
        polygons.extend(multipolygon.0);
    }
    Ok(polygons)
}

fn read_wkt(path: &Path) -> Result<Vec<Polygon<f64>>, ZoneError> {
    let text = read_text(path)?;
    let mut polygons = vec![];
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item = format!("line {}", idx + 1);
        let geometry = Geometry::<f64>::try_from_wkt_str(line).map_err(|e| ZoneError::Deserialize {
            item: item.clone(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        collect_polygons(geometry, &mut polygons).map_err(|message| ZoneError::Deserialize {
            item,
            path: path.to_path_buf(),
            message,
        })?;
    }
    Ok(polygons)
}

fn collect_polygons(geometry: Geometry<f64>, out: &mut Vec<Polygon<f64>>) -> Result<(), String> {
    match geometry {
        Geometry::Polygon(p) => out.push(p),
        Geometry::MultiPolygon(mp) => out.extend(mp.0),
        Geometry::Rect(r) => out.push(r.to_polygon()),
        Geometry::Triangle(t) => out.push(t.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                collect_polygons(g, out)?;
            }
        }
        Geometry::Point(_) => return Err(String::from("unexpected Point geometry type")),
        Geometry::Line(_) => return Err(String::from("unexpected Line geometry type")),
        Geometry::LineString(_) => {
            return Err(String::from("unexpected LineString geometry type"))
        }
        Geometry::MultiPoint(_) => return Err(String::from("unexpected MultiPoint geometry type")),
        Geometry::MultiLineString(_) => {
            return Err(String::from("unexpected MultiLineString geometry type"))
        }
    }
    Ok(())
}
