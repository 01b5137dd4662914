use serde::{Deserialize, Serialize};

use super::ModeTag;

/// separators observed in the `modes` column of trip logs
pub const MODE_LIST_SEPARATORS: [char; 4] = ['/', ',', '-', '+'];

/// an aggregate trip row from the trip log. independent from the leg log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TripRecord {
    pub person_id: String,
    pub trip_id: String,
    /// `main_mode`, or `longest_distance_mode` when the former is not written.
    /// None when neither is present on the row.
    pub primary_mode: Option<ModeTag>,
    /// the modes used along the trip in the order listed by the simulation
    pub raw_mode_list: Vec<ModeTag>,
}

impl TripRecord {
    /// splits a joined mode list such as "walk-pt-walk" or "drt_access/pt".
    /// hyphenated DRT feeder spellings are not supported in this column since
    /// '-' is a list separator here.
    pub fn parse_mode_list(raw: &str) -> Vec<ModeTag> {
        raw.split(&MODE_LIST_SEPARATORS[..])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ModeTag::parse)
            .collect()
    }

    /// a trip has a DRT component if any listed mode, or its primary mode, is
    /// part of the DRT family.
    pub fn has_drt_component(&self) -> bool {
        self.raw_mode_list.iter().any(ModeTag::is_drt_family)
            || self
                .primary_mode
                .as_ref()
                .map(ModeTag::is_drt_family)
                .unwrap_or_default()
    }

    /// label used in the primary-mode distribution
    pub fn primary_mode_label(&self) -> &str {
        self.primary_mode
            .as_ref()
            .map(ModeTag::as_str)
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod test {
    use super::TripRecord;
    use crate::model::ModeTag;

    #[test]
    fn test_parse_mode_list_separators() {
        let modes = TripRecord::parse_mode_list("walk-pt/drt_egress, walk");
        assert_eq!(
            modes,
            vec![ModeTag::Walk, ModeTag::Pt, ModeTag::DrtEgress, ModeTag::Walk]
        );
        assert!(TripRecord::parse_mode_list("").is_empty());
    }

    #[test]
    fn test_has_drt_component() {
        let trip = TripRecord {
            person_id: String::from("7"),
            trip_id: String::from("7_2"),
            primary_mode: Some(ModeTag::Pt),
            raw_mode_list: TripRecord::parse_mode_list("walk-drt_access-pt"),
        };
        assert!(trip.has_drt_component());

        let car = TripRecord {
            person_id: String::from("8"),
            trip_id: String::from("8_1"),
            primary_mode: None,
            raw_mode_list: vec![ModeTag::Car],
        };
        assert!(!car.has_drt_component());
        assert_eq!(car.primary_mode_label(), "unknown");
    }
}
