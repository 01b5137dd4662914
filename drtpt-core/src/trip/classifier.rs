use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FrequencyTable, IntermodalCategory, TripLegSequence};
use crate::model::TripKey;

/// default number of example trips kept per category
pub const DEFAULT_EXAMPLE_LIMIT: usize = 3;

/// one trip shown as an example of its category.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TripExample {
    pub person_id: String,
    pub trip_id: String,
    pub mode_pattern: String,
}

/// frequency tables over the DRT-bearing trips of a leg log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IntermodalityTables {
    /// trips that were classified, i.e. carried a DRT-family leg
    pub drt_trips: u64,
    /// mode patterns of DRT-bearing trips in first-seen order
    pub patterns: FrequencyTable,
    /// all categories in declaration order, zeros included
    pub categories: IndexMap<IntermodalCategory, u64>,
    /// at most `example_limit` trips per category, first seen first
    pub examples: IndexMap<IntermodalCategory, Vec<TripExample>>,
}

/// classifies finished leg sequences into intermodality categories.
#[derive(Clone, Debug)]
pub struct ModePatternClassifier {
    example_limit: usize,
}

impl Default for ModePatternClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXAMPLE_LIMIT)
    }
}

impl ModePatternClassifier {
    pub fn new(example_limit: usize) -> Self {
        Self { example_limit }
    }

    pub fn classify<'a, I>(&self, trips: I) -> IntermodalityTables
    where
        I: IntoIterator<Item = (&'a TripKey, &'a TripLegSequence)>,
    {
        let mut categories: IndexMap<IntermodalCategory, u64> = IntermodalCategory::ALL
            .iter()
            .map(|c| (*c, 0))
            .collect();
        let mut examples: IndexMap<IntermodalCategory, Vec<TripExample>> = IntermodalCategory::ALL
            .iter()
            .map(|c| (*c, vec![]))
            .collect();
        let mut patterns = FrequencyTable::new();
        let mut drt_trips = 0;

        for (key, sequence) in trips {
            let Some(category) = sequence.category() else {
                continue;
            };
            drt_trips += 1;
            let pattern = sequence.mode_pattern();
            patterns.add(&pattern);
            if let Some(count) = categories.get_mut(&category) {
                *count += 1;
            }
            if let Some(kept) = examples.get_mut(&category) {
                if kept.len() < self.example_limit {
                    kept.push(TripExample {
                        person_id: key.person_id.clone(),
                        trip_id: key.trip_id.clone(),
                        mode_pattern: pattern,
                    });
                }
            }
        }

        IntermodalityTables {
            drt_trips,
            patterns,
            categories,
            examples,
        }
    }
}
