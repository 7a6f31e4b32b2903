use serde::{Deserialize, Serialize};

use crate::bubbles::BubbleGeometry;
use crate::decide::DecisionParams;
use crate::reconstruct::ReconstructParams;

/// All tunable grading parameters, JSON-overridable as one document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderParams {
    pub bubble: BubbleGeometry,
    pub decision: DecisionParams,
    pub reconstruct: ReconstructParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LetterOrder;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: GraderParams = serde_json::from_str(
            r#"{"decision": {"letter_order": "right_to_left", "min_margin": 20.0}}"#,
        )
        .unwrap();
        assert_eq!(params.decision.letter_order, LetterOrder::RightToLeft);
        assert_eq!(params.decision.min_margin, 20.0);
        // untouched sections keep their defaults
        assert_eq!(params.bubble, BubbleGeometry::default());
        assert_eq!(params.decision.patch_half, 6);
        assert_eq!(params.reconstruct, ReconstructParams::default());
    }

    #[test]
    fn params_json_round_trip() {
        let params = GraderParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: GraderParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
