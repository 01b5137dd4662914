use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ZoneError {
    #[error("failure reading file from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse '{path}' due to: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to deserialize {item} in file '{path}' due to: {message}")]
    Deserialize {
        item: String,
        path: PathBuf,
        message: String,
    },
    #[error("unsupported zone file format for '{path}', expected .geojson, .json, .shp or .wkt")]
    UnsupportedFormat { path: PathBuf },
    #[error("zone file '{path}' appears to use geographic (lon/lat) coordinates: {message}. distances and radii require a planar metric system")]
    NonMetricCoordinates { path: PathBuf, message: String },
}
