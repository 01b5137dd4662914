//! reduction of classifier and analyzer outputs into serializable summaries.
//! nothing in here touches the filesystem.
mod analysis_report;
mod population_report;
mod stop_report;
mod trip_report;

pub use analysis_report::AnalysisReport;
pub use population_report::PopulationReport;
pub use stop_report::{
    InsideStop, NearestStop, StopOutputRow, StopReport, ZoneSummary, DEFAULT_NEAREST_LIMIT,
};
pub use trip_report::{CategoryCount, TripLogReport, TripReport};

/// `part` as a percentage of `whole`, 0 for an empty whole
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
