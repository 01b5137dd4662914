use serde::{Deserialize, Serialize};

use super::IntermodalCategory;
use crate::model::ModeTag;

/// joins the mode tags of a mode pattern
pub const MODE_PATTERN_SEPARATOR: &str = " -> ";

/// the modes of one trip in leg log order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TripLegSequence(Vec<ModeTag>);

impl TripLegSequence {
    pub fn push(&mut self, mode: ModeTag) {
        self.0.push(mode);
    }

    pub fn has_drt(&self) -> bool {
        self.0.iter().any(ModeTag::is_drt_family)
    }

    /// canonical pattern string, e.g. `walk -> drt_access -> pt`
    pub fn mode_pattern(&self) -> String {
        self.0
            .iter()
            .map(ModeTag::as_str)
            .collect::<Vec<_>>()
            .join(MODE_PATTERN_SEPARATOR)
    }

    pub fn category(&self) -> Option<IntermodalCategory> {
        IntermodalCategory::classify(&self.0)
    }
}

impl From<Vec<ModeTag>> for TripLegSequence {
    fn from(value: Vec<ModeTag>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod test {
    use super::TripLegSequence;
    use crate::model::ModeTag;

    #[test]
    fn test_mode_pattern() {
        let sequence =
            TripLegSequence::from(vec![ModeTag::DrtAccess, ModeTag::Pt, ModeTag::DrtEgress]);
        assert_eq!(sequence.mode_pattern(), "drt_access -> pt -> drt_egress");

        let unknown = TripLegSequence::from(vec![ModeTag::parse("ferry")]);
        assert_eq!(unknown.mode_pattern(), "ferry");
        assert_eq!(TripLegSequence::default().mode_pattern(), "");
    }
}
