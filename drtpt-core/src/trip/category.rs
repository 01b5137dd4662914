use serde::{Deserialize, Serialize};

use crate::model::ModeTag;

/// how a DRT-bearing trip combines demand-responsive transit with fixed-route
/// public transit. variants are declared in reporting order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum IntermodalCategory {
    /// DRT feeds PT and PT feeds DRT: first and last mile both served
    DrtPtDrt,
    /// DRT as first-mile access to PT
    DrtAccessPt,
    /// DRT as last-mile egress from PT
    PtDrtEgress,
    /// DRT without any PT leg
    DrtOnly,
    /// DRT and PT present but not in a feeder arrangement
    Other,
}

impl IntermodalCategory {
    pub const ALL: [IntermodalCategory; 5] = [
        IntermodalCategory::DrtPtDrt,
        IntermodalCategory::DrtAccessPt,
        IntermodalCategory::PtDrtEgress,
        IntermodalCategory::DrtOnly,
        IntermodalCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntermodalCategory::DrtPtDrt => "drt_pt_drt",
            IntermodalCategory::DrtAccessPt => "drt_access_pt",
            IntermodalCategory::PtDrtEgress => "pt_drt_egress",
            IntermodalCategory::DrtOnly => "drt_only",
            IntermodalCategory::Other => "other",
        }
    }

    /// classifies the ordered modes of one trip. returns None for trips without
    /// any DRT-family leg, which are not part of the intermodality table.
    ///
    /// membership decides every category except [`IntermodalCategory::DrtPtDrt`],
    /// which also requires a drt_access leg before the first pt leg and a
    /// drt_egress leg after the last pt leg.
    pub fn classify(modes: &[ModeTag]) -> Option<IntermodalCategory> {
        if !modes.iter().any(ModeTag::is_drt_family) {
            return None;
        }
        let first_pt = modes.iter().position(ModeTag::is_pt);
        let last_pt = modes.iter().rposition(ModeTag::is_pt);
        let has_access = modes.contains(&ModeTag::DrtAccess);
        let has_egress = modes.contains(&ModeTag::DrtEgress);

        let category = match (first_pt, last_pt) {
            (Some(first), Some(last)) => {
                let access_before = modes[..first].contains(&ModeTag::DrtAccess);
                let egress_after = modes[last + 1..].contains(&ModeTag::DrtEgress);
                if access_before && egress_after {
                    IntermodalCategory::DrtPtDrt
                } else if has_access {
                    IntermodalCategory::DrtAccessPt
                } else if has_egress {
                    IntermodalCategory::PtDrtEgress
                } else {
                    IntermodalCategory::Other
                }
            }
            _ => IntermodalCategory::DrtOnly,
        };
        Some(category)
    }
}

impl std::fmt::Display for IntermodalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
