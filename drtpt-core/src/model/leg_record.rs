use serde::{Deserialize, Serialize};

use super::{ModeTag, TripKey};

/// one single-mode segment of a trip, as read from the leg log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LegRecord {
    pub person_id: String,
    pub trip_id: String,
    pub mode: ModeTag,
}

impl LegRecord {
    pub fn new(person_id: &str, trip_id: &str, mode: ModeTag) -> Self {
        Self {
            person_id: person_id.to_string(),
            trip_id: trip_id.to_string(),
            mode,
        }
    }

    pub fn trip_key(&self) -> TripKey {
        TripKey::new(&self.person_id, &self.trip_id)
    }
}
