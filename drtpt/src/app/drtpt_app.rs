use clap::{Parser, Subcommand};
use drtpt_core::{
    report::DEFAULT_NEAREST_LIMIT, stop::DEFAULT_INTERMODAL_RADIUS, trip::DEFAULT_EXAMPLE_LIMIT,
};
use serde::{Deserialize, Serialize};

use super::{
    pipeline, AnalysisConfig, AppError, PopulationConfig, StopsConfig, TripsConfig,
    DEFAULT_PIPELINE_CAPACITY,
};

/// Command line tool for analyzing DRT and PT intermodality in agent-based
/// transport simulation outputs
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct DrtptApp {
    #[command(subcommand)]
    pub op: DrtptOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum DrtptOperation {
    /// run every analysis named in a configuration file
    Run {
        /// TOML file with [trips], [population] and [stops] sections
        #[arg(short, long)]
        configuration_file: String,
    },
    /// classify trips by how they combine DRT and PT legs
    Trips {
        /// per-leg log, optionally gzipped
        #[arg(short, long)]
        legs_file: Option<String>,

        /// per-trip log with primary modes, optionally gzipped
        #[arg(short, long)]
        trips_file: Option<String>,

        /// field delimiter of both logs
        #[arg(short, long, default_value_t = ';')]
        delimiter: char,

        /// example trips kept per intermodal category
        #[arg(long, default_value_t = DEFAULT_EXAMPLE_LIMIT)]
        example_limit: usize,

        /// write the report as JSON to this file
        #[arg(short, long)]
        summary_file: Option<String>,
    },
    /// locate PT stops relative to the DRT service area
    Stops {
        /// transit schedule with the stop registry, optionally gzipped
        #[arg(long)]
        schedule_file: String,

        /// DRT service area as GeoJSON, shapefile or WKT
        #[arg(short, long)]
        zone_file: String,

        /// intermodal catchment radius, in the units of the zone coordinates
        #[arg(short, long, default_value_t = DEFAULT_INTERMODAL_RADIUS)]
        radius: f64,

        /// per-stop CSV output, gzipped when the name ends in .gz
        #[arg(short, long)]
        output_file: Option<String>,

        /// stops listed in the nearest-outside table
        #[arg(long, default_value_t = DEFAULT_NEAREST_LIMIT)]
        nearest_limit: usize,

        /// accept zones whose coordinates look like longitude/latitude
        #[arg(long)]
        allow_geographic_coordinates: bool,

        /// write the report as JSON to this file
        #[arg(short, long)]
        summary_file: Option<String>,
    },
    /// summarize activity chains and leg modes of the selected plans
    Population {
        /// population plans file, optionally gzipped
        #[arg(short, long)]
        population_file: String,

        /// write the report as JSON to this file
        #[arg(short, long)]
        summary_file: Option<String>,
    },
}

impl DrtptOperation {
    pub fn run(&self) -> Result<(), AppError> {
        let config = self.analysis_config()?;
        let report = pipeline::run_analysis(&config)?;
        if report.is_empty() {
            log::warn!("analysis finished without producing any report section");
        }
        Ok(())
    }

    /// the analysis configuration this operation describes
    pub fn analysis_config(&self) -> Result<AnalysisConfig, AppError> {
        match self {
            DrtptOperation::Run { configuration_file } => {
                AnalysisConfig::from_file(configuration_file)
            }
            DrtptOperation::Trips {
                legs_file,
                trips_file,
                delimiter,
                example_limit,
                summary_file,
            } => Ok(AnalysisConfig {
                trips: Some(TripsConfig {
                    legs_file: legs_file.clone(),
                    trips_file: trips_file.clone(),
                    delimiter: *delimiter,
                    example_limit: *example_limit,
                }),
                summary_file: summary_file.clone(),
                pipeline_capacity: DEFAULT_PIPELINE_CAPACITY,
                ..Default::default()
            }),
            DrtptOperation::Stops {
                schedule_file,
                zone_file,
                radius,
                output_file,
                nearest_limit,
                allow_geographic_coordinates,
                summary_file,
            } => Ok(AnalysisConfig {
                stops: Some(StopsConfig {
                    schedule_file: schedule_file.clone(),
                    zone_file: Some(zone_file.clone()),
                    radius: *radius,
                    output_file: output_file.clone(),
                    nearest_limit: *nearest_limit,
                    allow_geographic_coordinates: *allow_geographic_coordinates,
                }),
                summary_file: summary_file.clone(),
                ..Default::default()
            }),
            DrtptOperation::Population {
                population_file,
                summary_file,
            } => Ok(AnalysisConfig {
                population: Some(PopulationConfig {
                    population_file: population_file.clone(),
                    activity_codes: None,
                    excluded_activity_types: None,
                }),
                summary_file: summary_file.clone(),
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{DrtptApp, DrtptOperation};
    use clap::Parser;

    #[test]
    fn test_stops_arguments() {
        let app = DrtptApp::try_parse_from([
            "drtpt",
            "stops",
            "--schedule-file",
            "schedule.xml.gz",
            "--zone-file",
            "zone.shp",
            "--radius",
            "2500",
        ])
        .expect("arguments should parse");
        let config = app.op.analysis_config().expect("should build config");
        let stops = config.stops.expect("stops section");
        assert_eq!(stops.radius, 2500.0);
        assert_eq!(stops.zone_file.as_deref(), Some("zone.shp"));
        assert_eq!(stops.nearest_limit, 10);
        assert!(config.trips.is_none());
        config_is_valid(&app.op);
    }

    #[test]
    fn test_trips_arguments_default_delimiter() {
        let app = DrtptApp::try_parse_from(["drtpt", "trips", "--legs-file", "legs.csv.gz"])
            .expect("arguments should parse");
        let config = app.op.analysis_config().expect("should build config");
        let trips = config.trips.expect("trips section");
        assert_eq!(trips.delimiter, ';');
        assert_eq!(trips.example_limit, 3);
        assert_eq!(trips.legs_file.as_deref(), Some("legs.csv.gz"));
    }

    fn config_is_valid(op: &DrtptOperation) {
        let config = op.analysis_config().expect("should build config");
        config.validate().expect("config should validate");
    }
}
