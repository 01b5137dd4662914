use serde::{Deserialize, Serialize};

/// identifies one logical trip of one simulated person. the simulation does
/// not write a leg sequence number, so all legs sharing a key are ordered by
/// their appearance in the leg log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripKey {
    pub person_id: String,
    pub trip_id: String,
}

impl TripKey {
    pub fn new(person_id: &str, trip_id: &str) -> Self {
        Self {
            person_id: person_id.to_string(),
            trip_id: trip_id.to_string(),
        }
    }
}

impl std::fmt::Display for TripKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Person {}, Trip {}", self.person_id, self.trip_id)
    }
}
