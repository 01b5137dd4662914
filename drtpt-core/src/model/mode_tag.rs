use serde::{Deserialize, Serialize};

/// a travel mode tag as written by the simulation into leg, trip and plan logs.
///
/// the mode vocabulary of a simulation run is open: agencies configure their own
/// modes. the tags that drive intermodality classification are validated here,
/// everything else is kept verbatim in [`ModeTag::Unknown`] so it can be counted
/// rather than silently folded into another bucket.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(into = "String", from = "String")]
pub enum ModeTag {
    Walk,
    NonNetworkWalk,
    Bike,
    Car,
    CarPassenger,
    Truck,
    Pt,
    Drt,
    DrtAccess,
    DrtEgress,
    Unknown(String),
}

impl ModeTag {
    /// parses a raw tag. leading/trailing whitespace is ignored and matching is
    /// ASCII case-insensitive. hyphenated DRT feeder spellings ("drt-access")
    /// normalize to their underscore form.
    pub fn parse(raw: &str) -> ModeTag {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "walk" => ModeTag::Walk,
            "non_network_walk" => ModeTag::NonNetworkWalk,
            "bike" => ModeTag::Bike,
            "car" => ModeTag::Car,
            "car_passenger" => ModeTag::CarPassenger,
            "truck" => ModeTag::Truck,
            "pt" => ModeTag::Pt,
            "drt" => ModeTag::Drt,
            "drt_access" | "drt-access" => ModeTag::DrtAccess,
            "drt_egress" | "drt-egress" => ModeTag::DrtEgress,
            _ => ModeTag::Unknown(trimmed.to_string()),
        }
    }

    /// canonical text for this tag. unknown tags return their raw text.
    pub fn as_str(&self) -> &str {
        match self {
            ModeTag::Walk => "walk",
            ModeTag::NonNetworkWalk => "non_network_walk",
            ModeTag::Bike => "bike",
            ModeTag::Car => "car",
            ModeTag::CarPassenger => "car_passenger",
            ModeTag::Truck => "truck",
            ModeTag::Pt => "pt",
            ModeTag::Drt => "drt",
            ModeTag::DrtAccess => "drt_access",
            ModeTag::DrtEgress => "drt_egress",
            ModeTag::Unknown(raw) => raw,
        }
    }

    /// true for drt, drt_access and drt_egress
    pub fn is_drt_family(&self) -> bool {
        matches!(self, ModeTag::Drt | ModeTag::DrtAccess | ModeTag::DrtEgress)
    }

    pub fn is_pt(&self) -> bool {
        matches!(self, ModeTag::Pt)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ModeTag::Unknown(_))
    }
}

impl From<String> for ModeTag {
    fn from(value: String) -> Self {
        ModeTag::parse(&value)
    }
}

impl From<ModeTag> for String {
    fn from(value: ModeTag) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ModeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
