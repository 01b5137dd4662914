use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FrequencyTable, TripLegSequence};
use crate::model::{LegRecord, TripKey};

/// folds a leg stream into per-trip leg sequences. legs of one trip do not
/// need to be adjacent in the stream; sequences are only complete once the
/// whole stream has been added.
#[derive(Debug, Default)]
pub struct TripLegAggregator {
    sequences: IndexMap<TripKey, TripLegSequence>,
    total_legs: u64,
    drt_legs: u64,
    unknown_modes: FrequencyTable,
}

/// counts gathered while aggregating the leg stream.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LegStatistics {
    pub total_legs: u64,
    pub drt_legs: u64,
    pub distinct_trips: u64,
    pub drt_trips: u64,
    /// mode tags outside the known vocabulary, by raw text
    pub unknown_modes: FrequencyTable,
}

/// the finished fold: trips in first-seen order plus leg statistics.
#[derive(Debug, Default)]
pub struct AggregatedTrips {
    pub sequences: IndexMap<TripKey, TripLegSequence>,
    pub statistics: LegStatistics,
}

impl TripLegAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, leg: LegRecord) {
        self.total_legs += 1;
        if leg.mode.is_drt_family() {
            self.drt_legs += 1;
        }
        if leg.mode.is_unknown() {
            self.unknown_modes.add(leg.mode.as_str());
        }
        let key = leg.trip_key();
        self.sequences.entry(key).or_default().push(leg.mode);
    }

    /// number of distinct trips seen so far
    pub fn trip_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn finish(self) -> AggregatedTrips {
        let drt_trips = self.sequences.values().filter(|s| s.has_drt()).count() as u64;
        let statistics = LegStatistics {
            total_legs: self.total_legs,
            drt_legs: self.drt_legs,
            distinct_trips: self.sequences.len() as u64,
            drt_trips,
            unknown_modes: self.unknown_modes,
        };
        AggregatedTrips {
            sequences: self.sequences,
            statistics,
        }
    }
}

impl Extend<LegRecord> for TripLegAggregator {
    fn extend<I: IntoIterator<Item = LegRecord>>(&mut self, iter: I) {
        for leg in iter {
            self.add(leg);
        }
    }
}
