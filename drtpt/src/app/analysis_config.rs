use std::path::Path;

use config::{Config, File};
use drtpt_core::{
    report::DEFAULT_NEAREST_LIMIT,
    stop::DEFAULT_INTERMODAL_RADIUS,
    trip::{ActivityCodeTable, DEFAULT_EXAMPLE_LIMIT},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::AppError;

/// default number of records buffered between a reader thread and its consumer
pub const DEFAULT_PIPELINE_CAPACITY: usize = 4096;

/// inputs and parameters of one analysis run.
///
/// ```toml
/// summary_file = "drtpt_summary.json"
///
/// [trips]
/// legs_file = "output/output_legs.csv.gz"
/// trips_file = "output/output_trips.csv.gz"
///
/// [population]
/// population_file = "output/output_plans.xml.gz"
///
/// [stops]
/// schedule_file = "output/output_transitSchedule.xml.gz"
/// zone_file = "drt_zone.shp"
/// radius = 5000.0
/// output_file = "pt_stops_vs_drt_area.csv"
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub trips: Option<TripsConfig>,
    #[serde(default)]
    pub population: Option<PopulationConfig>,
    #[serde(default)]
    pub stops: Option<StopsConfig>,
    /// JSON file the full report is written to
    #[serde(default)]
    pub summary_file: Option<String>,
    #[serde(default = "default_pipeline_capacity")]
    pub pipeline_capacity: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TripsConfig {
    /// per-leg log with `person`, `trip_id` and `mode` columns
    #[serde(default)]
    pub legs_file: Option<String>,
    /// per-trip log with `person`, `trip_id`, `main_mode` or
    /// `longest_distance_mode`, and `modes` columns
    #[serde(default)]
    pub trips_file: Option<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_example_limit")]
    pub example_limit: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PopulationConfig {
    pub population_file: String,
    /// replaces the default activity code table when present
    #[serde(default)]
    pub activity_codes: Option<IndexMap<String, String>>,
    /// replaces the default excluded activity types when present
    #[serde(default)]
    pub excluded_activity_types: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopsConfig {
    pub schedule_file: String,
    #[serde(default)]
    pub zone_file: Option<String>,
    /// intermodal catchment radius in zone units
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// per-stop CSV, gzipped when the name ends in `.gz`
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default = "default_nearest_limit")]
    pub nearest_limit: usize,
    #[serde(default)]
    pub allow_geographic_coordinates: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trips: None,
            population: None,
            stops: None,
            summary_file: None,
            pipeline_capacity: DEFAULT_PIPELINE_CAPACITY,
        }
    }
}

fn default_pipeline_capacity() -> usize {
    DEFAULT_PIPELINE_CAPACITY
}

fn default_delimiter() -> char {
    ';'
}

fn default_example_limit() -> usize {
    DEFAULT_EXAMPLE_LIMIT
}

fn default_radius() -> f64 {
    DEFAULT_INTERMODAL_RADIUS
}

fn default_nearest_limit() -> usize {
    DEFAULT_NEAREST_LIMIT
}

impl AnalysisConfig {
    /// reads a TOML (or any format the `config` crate detects by extension)
    /// analysis file.
    pub fn from_file(configuration_file: &str) -> Result<AnalysisConfig, AppError> {
        let filepath = Path::new(configuration_file);
        let config = Config::builder()
            .add_source(File::from(filepath))
            .build()
            .map_err(|e| {
                let msg = format!("file '{configuration_file}' produced error: {e}");
                AppError::InvalidConfiguration(msg)
            })?;
        config.try_deserialize::<AnalysisConfig>().map_err(|e| {
            let msg = format!("error reading analysis configuration in '{configuration_file}': {e}");
            AppError::InvalidConfiguration(msg)
        })
    }

    /// rejects configurations that cannot produce a meaningful run. runs
    /// before any input file is opened.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.pipeline_capacity == 0 {
            return Err(AppError::InvalidConfiguration(String::from(
                "pipeline_capacity must be at least 1",
            )));
        }
        let has_trip_input = self
            .trips
            .as_ref()
            .map(|t| t.legs_file.is_some() || t.trips_file.is_some())
            .unwrap_or_default();
        if !has_trip_input && self.population.is_none() && self.stops.is_none() {
            return Err(AppError::InvalidConfiguration(String::from(
                "no input configured, provide a legs, trips, population or stop schedule file",
            )));
        }
        if let Some(trips) = &self.trips {
            trips.delimiter_byte()?;
        }
        if let Some(stops) = &self.stops {
            if stops.zone_file.is_none() {
                return Err(AppError::InvalidConfiguration(format!(
                    "stop analysis of '{}' requires a zone_file",
                    stops.schedule_file
                )));
            }
            if !stops.radius.is_finite() || stops.radius < 0.0 {
                return Err(AppError::InvalidConfiguration(format!(
                    "radius must be a finite, non-negative number, found {}",
                    stops.radius
                )));
            }
        }
        Ok(())
    }
}

impl TripsConfig {
    pub fn delimiter_byte(&self) -> Result<u8, AppError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                AppError::InvalidConfiguration(format!(
                    "delimiter must be a single ASCII character, found '{}'",
                    self.delimiter
                ))
            })
    }
}

impl PopulationConfig {
    /// the activity code table with any configured overrides applied
    pub fn code_table(&self) -> ActivityCodeTable {
        let default = ActivityCodeTable::default();
        ActivityCodeTable {
            codes: self.activity_codes.clone().unwrap_or(default.codes),
            excluded: self
                .excluded_activity_types
                .clone()
                .unwrap_or(default.excluded),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AnalysisConfig, PopulationConfig, StopsConfig, TripsConfig};
    use crate::app::AppError;

    fn stops(zone_file: Option<&str>, radius: f64) -> StopsConfig {
        StopsConfig {
            schedule_file: String::from("schedule.xml"),
            zone_file: zone_file.map(String::from),
            radius,
            output_file: None,
            nearest_limit: 10,
            allow_geographic_coordinates: false,
        }
    }

    fn with_stops(stops: StopsConfig) -> AnalysisConfig {
        AnalysisConfig {
            stops: Some(stops),
            pipeline_capacity: 16,
            ..Default::default()
        }
    }

    #[test]
    fn test_reads_toml_with_defaults() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = dir.path().join("analysis.toml");
        let contents = r#"
summary_file = "summary.json"

[trips]
legs_file = "output_legs.csv.gz"

[population]
population_file = "output_plans.xml.gz"
excluded_activity_types = ["pt interaction", "drt interaction"]

[stops]
schedule_file = "transit_schedule.xml.gz"
zone_file = "drt_zone.shp"
"#;
        std::fs::write(&path, contents).expect("test invariant failed: cannot write fixture");
        let config = AnalysisConfig::from_file(&path.to_string_lossy()).expect("should load");
        config.validate().expect("should be valid");

        let trips = config.trips.as_ref().expect("trips section");
        assert_eq!(trips.delimiter, ';');
        assert_eq!(trips.example_limit, 3);
        assert_eq!(trips.trips_file, None);
        let stops = config.stops.as_ref().expect("stops section");
        assert_eq!(stops.radius, 5000.0);
        assert_eq!(stops.nearest_limit, 10);
        assert!(!stops.allow_geographic_coordinates);
        assert_eq!(config.pipeline_capacity, super::DEFAULT_PIPELINE_CAPACITY);

        let codes = config.population.as_ref().expect("population").code_table();
        assert_eq!(codes.code("home"), "H");
        assert!(codes.is_excluded("drt interaction"));
    }

    #[test]
    fn test_negative_or_infinite_radius_is_rejected() {
        for radius in [-1.0, f64::INFINITY, f64::NAN] {
            let result = with_stops(stops(Some("zone.shp"), radius)).validate();
            assert!(matches!(result, Err(AppError::InvalidConfiguration(_))));
        }
        assert!(with_stops(stops(Some("zone.shp"), 0.0)).validate().is_ok());
    }

    #[test]
    fn test_stops_require_zone_file() {
        let result = with_stops(stops(None, 5000.0)).validate();
        assert!(matches!(result, Err(AppError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_no_input_is_rejected() {
        let empty = AnalysisConfig {
            trips: Some(TripsConfig {
                legs_file: None,
                trips_file: None,
                delimiter: ';',
                example_limit: 3,
            }),
            pipeline_capacity: 16,
            ..Default::default()
        };
        assert!(matches!(
            empty.validate(),
            Err(AppError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_capacity_and_bad_delimiter_are_rejected() {
        let mut config = AnalysisConfig {
            population: Some(PopulationConfig {
                population_file: String::from("plans.xml"),
                activity_codes: None,
                excluded_activity_types: None,
            }),
            pipeline_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        config.pipeline_capacity = 1;
        assert!(config.validate().is_ok());
        config.trips = Some(TripsConfig {
            legs_file: Some(String::from("legs.csv")),
            trips_file: None,
            delimiter: '§',
            example_limit: 3,
        });
        assert!(config.validate().is_err());
    }
}
