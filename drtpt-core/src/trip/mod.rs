//! trip-side analysis: grouping leg events into trips, classifying their
//! mode sequences and summarizing the trip and population logs.
mod activity_chain;
mod aggregator;
mod category;
mod classifier;
mod frequency;
mod leg_sequence;
mod trip_log;

pub use activity_chain::{
    ActivityCodeTable, PopulationAccumulator, PopulationSummary, ACTIVITY_CHAIN_SEPARATOR,
};
pub use aggregator::{AggregatedTrips, LegStatistics, TripLegAggregator};
pub use category::IntermodalCategory;
pub use classifier::{
    IntermodalityTables, ModePatternClassifier, TripExample, DEFAULT_EXAMPLE_LIMIT,
};
pub use frequency::FrequencyTable;
pub use leg_sequence::{TripLegSequence, MODE_PATTERN_SEPARATOR};
pub use trip_log::TripLogSummary;
