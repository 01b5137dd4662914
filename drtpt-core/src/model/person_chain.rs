use serde::{Deserialize, Serialize};

use super::ModeTag;

/// the selected daily plan of one simulated person: activity types and leg
/// modes in plan order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PersonChain {
    pub person_id: String,
    pub activity_types: Vec<String>,
    pub leg_modes: Vec<ModeTag>,
}
