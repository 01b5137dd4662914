use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::percent;
use crate::{
    reader::ReadSummary,
    trip::{IntermodalCategory, IntermodalityTables, LegStatistics, TripExample, TripLogSummary},
};

/// count and share of one intermodality category among DRT-bearing trips
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CategoryCount {
    pub count: u64,
    pub percent: f64,
}

/// results of the leg log analysis.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TripReport {
    pub source: ReadSummary,
    pub total_legs: u64,
    pub drt_legs: u64,
    pub distinct_trips: u64,
    pub drt_trips: u64,
    /// share of trips with at least one DRT-family leg
    pub drt_trip_percent: f64,
    /// mode patterns of DRT-bearing trips, most frequent first
    pub mode_patterns: IndexMap<String, u64>,
    /// every category in reporting order, zeros included
    pub categories: IndexMap<IntermodalCategory, CategoryCount>,
    pub examples: IndexMap<IntermodalCategory, Vec<TripExample>>,
    /// mode tags outside the known vocabulary, most frequent first
    pub unknown_modes: IndexMap<String, u64>,
}

impl TripReport {
    pub fn new(source: ReadSummary, statistics: LegStatistics, tables: IntermodalityTables) -> Self {
        let categories = tables
            .categories
            .iter()
            .map(|(category, count)| {
                let entry = CategoryCount {
                    count: *count,
                    percent: percent(*count, tables.drt_trips),
                };
                (*category, entry)
            })
            .collect();
        Self {
            source,
            total_legs: statistics.total_legs,
            drt_legs: statistics.drt_legs,
            distinct_trips: statistics.distinct_trips,
            drt_trips: statistics.drt_trips,
            drt_trip_percent: percent(statistics.drt_trips, statistics.distinct_trips),
            mode_patterns: tables.patterns.sorted(),
            categories,
            examples: tables.examples,
            unknown_modes: statistics.unknown_modes.sorted(),
        }
    }

    pub fn category_count(&self, category: IntermodalCategory) -> u64 {
        self.categories
            .get(&category)
            .map(|c| c.count)
            .unwrap_or_default()
    }

    pub fn log_summary(&self, top_patterns: usize) {
        log::info!(
            "legs: {} read ({} malformed) from '{}', {} DRT legs",
            self.total_legs,
            self.source.malformed,
            self.source.path,
            self.drt_legs
        );
        log::info!(
            "trips: {} distinct, {} with DRT ({:.1}%)",
            self.distinct_trips,
            self.drt_trips,
            self.drt_trip_percent
        );
        for (pattern, count) in self.mode_patterns.iter().take(top_patterns) {
            log::info!("  {count:>8}  {pattern}");
        }
        for (category, entry) in self.categories.iter() {
            log::info!("  {category:<14} {:>8} ({:.1}%)", entry.count, entry.percent);
            let examples = self.examples.get(category).map(Vec::as_slice).unwrap_or_default();
            for example in examples {
                log::info!(
                    "      Person {}, Trip {}: {}",
                    example.person_id,
                    example.trip_id,
                    example.mode_pattern
                );
            }
        }
        if !self.unknown_modes.is_empty() {
            log::warn!(
                "{} unrecognized mode tag(s): {}",
                self.unknown_modes.len(),
                self.unknown_modes
                    .iter()
                    .map(|(mode, count)| format!("{mode} ({count})"))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
}

/// results of the trip log analysis.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TripLogReport {
    pub source: ReadSummary,
    pub total_trips: u64,
    pub drt_component_trips: u64,
    pub drt_component_percent: f64,
    /// primary modes, most frequent first
    pub primary_modes: IndexMap<String, u64>,
}

impl TripLogReport {
    pub fn new(source: ReadSummary, summary: TripLogSummary) -> Self {
        Self {
            source,
            total_trips: summary.total_trips,
            drt_component_trips: summary.drt_component_trips,
            drt_component_percent: percent(summary.drt_component_trips, summary.total_trips),
            primary_modes: summary.primary_modes.sorted(),
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "trip log: {} trips ({} malformed rows) from '{}', {} with a DRT component ({:.1}%)",
            self.total_trips,
            self.source.malformed,
            self.source.path,
            self.drt_component_trips,
            self.drt_component_percent
        );
        for (mode, count) in self.primary_modes.iter() {
            log::info!(
                "  {mode:<20} {count:>8} ({:.1}%)",
                percent(*count, self.total_trips)
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::TripReport;
    use crate::model::{LegRecord, ModeTag};
    use crate::reader::ReadSummary;
    use crate::trip::{IntermodalCategory, ModePatternClassifier, TripLegAggregator};
    use std::path::Path;

    #[test]
    fn test_report_from_legs() {
        let mut aggregator = TripLegAggregator::new();
        for (person, mode) in [
            ("1", "drt_access"),
            ("1", "pt"),
            ("1", "drt_egress"),
            ("2", "car"),
            ("3", "drt"),
            ("4", "walk"),
        ] {
            aggregator.add(LegRecord::new(person, "1", ModeTag::parse(mode)));
        }
        let trips = aggregator.finish();
        let tables = ModePatternClassifier::default().classify(&trips.sequences);
        let report = TripReport::new(ReadSummary::new(Path::new("legs.csv")), trips.statistics, tables);

        assert_eq!(report.distinct_trips, 4);
        assert_eq!(report.drt_trips, 2);
        assert_eq!(report.drt_trip_percent, 50.0);
        assert_eq!(report.category_count(IntermodalCategory::DrtPtDrt), 1);
        assert_eq!(report.category_count(IntermodalCategory::DrtOnly), 1);
        assert_eq!(report.categories[&IntermodalCategory::DrtOnly].percent, 50.0);
        assert_eq!(report.categories[&IntermodalCategory::Other].percent, 0.0);
        assert_eq!(report.mode_patterns.len(), 2);
        assert!(!report.mode_patterns.contains_key("car"));
    }
}
