use std::{path::Path, sync::Arc};

use drtpt_core::{
    model::{LegRecord, TripRecord},
    reader::{pipelined, DelimitedReader, PopulationReader, StopRegistryReader},
    report::{
        AnalysisReport, PopulationReport, StopReport, TripLogReport, TripReport, ZoneSummary,
    },
    stop::{StopClassification, StopZoneAnalyzer},
    trip::{ModePatternClassifier, PopulationAccumulator, TripLegAggregator, TripLogSummary},
    zone::ZoneGeometryIndex,
};
use kdam::tqdm;

use super::{
    analysis_config::{PopulationConfig, StopsConfig, TripsConfig},
    output, AnalysisConfig, AppError,
};

/// mode patterns and activity chains printed to the log
const LOGGED_PATTERN_LIMIT: usize = 20;

type TripSide = (
    Option<TripReport>,
    Option<TripLogReport>,
    Option<PopulationReport>,
);

/// runs every configured analysis and writes the configured outputs.
///
/// the trip-side inputs (legs, trips, population) and the stop-side input
/// are processed as two independent tasks. each input file is streamed once,
/// with decoding on its own thread feeding a bounded queue.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisReport, AppError> {
    config.validate()?;
    let capacity = config.pipeline_capacity;

    let (trip_side, stop_side) = rayon::join(
        || run_trip_side(config, capacity),
        || {
            config
                .stops
                .as_ref()
                .map(|stops| run_stops(stops, capacity))
                .transpose()
        },
    );
    let (trips, trip_log, population) = trip_side?;
    let stops = stop_side?;

    let report = AnalysisReport {
        trips,
        trip_log,
        population,
        stops,
        ..AnalysisReport::new()
    };
    log_report(&report);
    if let Some(summary_file) = &config.summary_file {
        output::write_summary(Path::new(summary_file), &report)?;
    }
    Ok(report)
}

fn run_trip_side(config: &AnalysisConfig, capacity: usize) -> Result<TripSide, AppError> {
    let mut trips = None;
    let mut trip_log = None;
    if let Some(trips_config) = &config.trips {
        if let Some(legs_file) = &trips_config.legs_file {
            trips = Some(run_legs(legs_file, trips_config, capacity)?);
        }
        if let Some(trips_file) = &trips_config.trips_file {
            trip_log = Some(run_trip_log(trips_file, trips_config, capacity)?);
        }
    }
    let population = config
        .population
        .as_ref()
        .map(|p| run_population(p, capacity))
        .transpose()?;
    Ok((trips, trip_log, population))
}

/// groups the leg log into trips and classifies every DRT-bearing trip
pub fn run_legs(
    legs_file: &str,
    trips_config: &TripsConfig,
    capacity: usize,
) -> Result<TripReport, AppError> {
    let delimiter = trips_config.delimiter_byte()?;
    let stream = DelimitedReader::<LegRecord>::open(Path::new(legs_file), delimiter)?;
    let mut records = pipelined(stream, capacity)?;
    let mut aggregator = TripLegAggregator::new();
    let legs_iter = tqdm!(records.by_ref(), desc = "reading legs", position = 0);
    for leg in legs_iter {
        aggregator.add(leg?);
    }
    eprintln!();
    let source = records.finish()?;
    warn_malformed(source.malformed, legs_file);

    log::info!(
        "classifying {} trips from '{legs_file}'",
        aggregator.trip_count()
    );
    let trips = aggregator.finish();
    let classifier = ModePatternClassifier::new(trips_config.example_limit);
    let tables = classifier.classify(&trips.sequences);
    Ok(TripReport::new(source, trips.statistics, tables))
}

/// primary mode distribution and DRT component count of the trip log
pub fn run_trip_log(
    trips_file: &str,
    trips_config: &TripsConfig,
    capacity: usize,
) -> Result<TripLogReport, AppError> {
    let delimiter = trips_config.delimiter_byte()?;
    let stream = DelimitedReader::<TripRecord>::open(Path::new(trips_file), delimiter)?;
    let mut records = pipelined(stream, capacity)?;
    let mut summary = TripLogSummary::default();
    let trips_iter = tqdm!(records.by_ref(), desc = "reading trips", position = 0);
    for trip in trips_iter {
        summary.add(&trip?);
    }
    eprintln!();
    let source = records.finish()?;
    warn_malformed(source.malformed, trips_file);
    Ok(TripLogReport::new(source, summary))
}

/// activity chains and leg modes of the selected plans
pub fn run_population(
    population_config: &PopulationConfig,
    capacity: usize,
) -> Result<PopulationReport, AppError> {
    let population_file = &population_config.population_file;
    let stream = PopulationReader::open(Path::new(population_file))?;
    let mut records = pipelined(stream, capacity)?;
    let mut accumulator = PopulationAccumulator::new(population_config.code_table());
    let persons_iter = tqdm!(records.by_ref(), desc = "reading plans", position = 0);
    for person in persons_iter {
        accumulator.add(&person?);
    }
    eprintln!();
    let source = records.finish()?;
    warn_malformed(source.malformed, population_file);
    Ok(PopulationReport::new(source, accumulator.finish()))
}

/// classifies every stop of the registry against the service area and
/// writes the per-stop file when one is configured
pub fn run_stops(stops_config: &StopsConfig, capacity: usize) -> Result<StopReport, AppError> {
    let zone_file = stops_config.zone_file.as_ref().ok_or_else(|| {
        AppError::InvalidConfiguration(String::from("stop analysis requires a zone_file"))
    })?;
    let index = ZoneGeometryIndex::from_file(
        Path::new(zone_file),
        stops_config.allow_geographic_coordinates,
    )?;
    if index.is_degenerate() {
        log::warn!("zone file '{zone_file}' contains no polygons, no stop can be inside the DRT area");
    }
    let index = Arc::new(index);
    let analyzer = StopZoneAnalyzer::new(index.clone(), stops_config.radius);

    let schedule_file = &stops_config.schedule_file;
    let stream = StopRegistryReader::open(Path::new(schedule_file))?;
    let mut records = pipelined(stream, capacity)?;
    let stops_iter = tqdm!(records.by_ref(), desc = "classifying stops", position = 1);
    let classifications = stops_iter
        .map(|stop| stop.map(|s| analyzer.classify(s)))
        .collect::<Result<Vec<StopClassification>, _>>()?;
    eprintln!();
    let source = records.finish()?;
    warn_malformed(source.malformed, schedule_file);
    index.log_statistics();

    if let Some(output_file) = &stops_config.output_file {
        output::write_stop_csv(Path::new(output_file), &classifications)?;
    }
    Ok(StopReport::new(
        source,
        stops_config.radius,
        ZoneSummary::from(index.as_ref()),
        &classifications,
        stops_config.nearest_limit,
    ))
}

fn warn_malformed(malformed: u64, path: &str) {
    if malformed > 0 {
        log::warn!("skipped {malformed} malformed record(s) in '{path}'");
    }
}

fn log_report(report: &AnalysisReport) {
    if let Some(trips) = &report.trips {
        trips.log_summary(LOGGED_PATTERN_LIMIT);
    }
    if let Some(trip_log) = &report.trip_log {
        trip_log.log_summary();
    }
    if let Some(population) = &report.population {
        population.log_summary(LOGGED_PATTERN_LIMIT);
    }
    if let Some(stops) = &report.stops {
        stops.log_summary();
    }
}
