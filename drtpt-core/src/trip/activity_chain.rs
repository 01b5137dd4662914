use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::FrequencyTable;
use crate::model::PersonChain;

/// joins the codes of an activity chain
pub const ACTIVITY_CHAIN_SEPARATOR: &str = "-";

/// substitutes short codes for activity types when rendering activity chains.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ActivityCodeTable {
    /// activity type to code. unmapped types are kept verbatim
    pub codes: IndexMap<String, String>,
    /// activity types dropped from chains entirely
    pub excluded: Vec<String>,
}

impl Default for ActivityCodeTable {
    fn default() -> Self {
        let codes = [
            ("home", "H"),
            ("work", "W"),
            ("outside", "OU"),
            ("other", "O"),
            ("leisure", "L"),
            ("education", "E"),
            ("freight_loading", "FL"),
            ("freight_unloading", "FU"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            codes,
            excluded: vec![String::from("pt interaction")],
        }
    }
}

impl ActivityCodeTable {
    pub fn code<'a>(&'a self, activity_type: &'a str) -> &'a str {
        self.codes
            .get(activity_type)
            .map(String::as_str)
            .unwrap_or(activity_type)
    }

    pub fn is_excluded(&self, activity_type: &str) -> bool {
        self.excluded.iter().any(|e| e == activity_type)
    }

    /// renders an activity chain such as `H-W-L-H`
    pub fn canonicalize<S: AsRef<str>>(&self, activity_types: &[S]) -> String {
        activity_types
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| !self.is_excluded(t))
            .map(|t| self.code(t))
            .collect::<Vec<_>>()
            .join(ACTIVITY_CHAIN_SEPARATOR)
    }
}

/// distributions over the selected plans of a population.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PopulationSummary {
    pub persons: u64,
    pub activity_chains: FrequencyTable,
    /// modes over every leg of every selected plan
    pub leg_modes: FrequencyTable,
}

/// builds a [`PopulationSummary`] one person at a time.
#[derive(Debug, Default)]
pub struct PopulationAccumulator {
    codes: ActivityCodeTable,
    person_ids: HashSet<String>,
    summary: PopulationSummary,
}

impl PopulationAccumulator {
    pub fn new(codes: ActivityCodeTable) -> Self {
        Self {
            codes,
            ..Default::default()
        }
    }

    pub fn add(&mut self, person: &PersonChain) {
        if self.person_ids.insert(person.person_id.clone()) {
            self.summary.persons += 1;
        }
        let chain = self.codes.canonicalize(person.activity_types.as_slice());
        self.summary.activity_chains.add(&chain);
        for mode in person.leg_modes.iter() {
            self.summary.leg_modes.add(mode.as_str());
        }
    }

    pub fn finish(self) -> PopulationSummary {
        self.summary
    }
}

#[cfg(test)]
mod test {
    use super::{ActivityCodeTable, PopulationAccumulator};
    use crate::model::{ModeTag, PersonChain};

    #[test]
    fn test_canonicalize() {
        let table = ActivityCodeTable::default();
        let chain = table.canonicalize(&["home", "pt interaction", "work", "shop", "home"]);
        assert_eq!(chain, "H-W-shop-H");
        assert_eq!(table.canonicalize::<&str>(&[]), "");
    }

    #[test]
    fn test_population_summary() {
        let person = |id: &str, acts: &[&str], modes: &[ModeTag]| PersonChain {
            person_id: id.to_string(),
            activity_types: acts.iter().map(|a| a.to_string()).collect(),
            leg_modes: modes.to_vec(),
        };
        let mut acc = PopulationAccumulator::new(ActivityCodeTable::default());
        acc.add(&person("1", &["home", "work", "home"], &[ModeTag::Pt, ModeTag::Pt]));
        acc.add(&person("2", &["home", "leisure", "home"], &[ModeTag::Car, ModeTag::Car]));
        acc.add(&person("3", &["home", "work", "home"], &[ModeTag::Drt, ModeTag::Pt]));
        let summary = acc.finish();
        assert_eq!(summary.persons, 3);
        assert_eq!(summary.activity_chains.get("H-W-H"), 2);
        assert_eq!(summary.activity_chains.get("H-L-H"), 1);
        assert_eq!(summary.leg_modes.get("pt"), 3);
        assert_eq!(summary.leg_modes.total(), 6);
    }
}
