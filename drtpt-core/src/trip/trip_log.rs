use serde::{Deserialize, Serialize};

use super::FrequencyTable;
use crate::model::TripRecord;

/// coarse distribution over the aggregate trip log.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TripLogSummary {
    pub total_trips: u64,
    /// trips with a DRT-family tag in their mode list or as primary mode
    pub drt_component_trips: u64,
    /// primary mode label by trip count, first seen first
    pub primary_modes: FrequencyTable,
}

impl TripLogSummary {
    pub fn add(&mut self, trip: &TripRecord) {
        self.total_trips += 1;
        if trip.has_drt_component() {
            self.drt_component_trips += 1;
        }
        self.primary_modes.add(trip.primary_mode_label());
    }
}

impl<'a> Extend<&'a TripRecord> for TripLogSummary {
    fn extend<I: IntoIterator<Item = &'a TripRecord>>(&mut self, iter: I) {
        for trip in iter {
            self.add(trip);
        }
    }
}
