use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::percent;
use crate::{reader::ReadSummary, trip::PopulationSummary};

/// activity chain and leg mode distributions of the selected plans
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PopulationReport {
    pub source: ReadSummary,
    pub persons: u64,
    /// canonical activity chains, most frequent first
    pub activity_chains: IndexMap<String, u64>,
    /// leg modes, most frequent first
    pub leg_modes: IndexMap<String, u64>,
}

impl PopulationReport {
    pub fn new(source: ReadSummary, summary: PopulationSummary) -> Self {
        Self {
            source,
            persons: summary.persons,
            activity_chains: summary.activity_chains.sorted(),
            leg_modes: summary.leg_modes.sorted(),
        }
    }

    pub fn log_summary(&self, top_chains: usize) {
        log::info!(
            "population: {} persons ({} malformed) from '{}'",
            self.persons,
            self.source.malformed,
            self.source.path
        );
        for (chain, count) in self.activity_chains.iter().take(top_chains) {
            log::info!(
                "  {count:>8} ({:.1}%)  {chain}",
                percent(*count, self.persons)
            );
        }
        let legs: u64 = self.leg_modes.values().sum();
        for (mode, count) in self.leg_modes.iter() {
            log::info!("  {mode:<20} {count:>8} ({:.1}%)", percent(*count, legs));
        }
    }
}
