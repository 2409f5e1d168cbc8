//! Deviation semantics for the two extractor variants

use serde::{Deserialize, Serialize};

/// How a measurement's deviation from baseline is computed
///
/// The face-drop tracker is signed: only moving *down* in the frame counts
/// against you. The neck-angle tracker is unsigned: any drift from the
/// calibrated angle counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationMode {
    /// `current - baseline`, bad only when positive and above threshold
    Signed,
    /// `|current - baseline|`, bad above threshold in either direction
    Unsigned,
}

impl DeviationMode {
    /// Compute the deviation of `current` from `baseline` under this mode
    pub fn deviation(&self, current: f32, baseline: f32) -> f32 {
        match self {
            DeviationMode::Signed => current - baseline,
            DeviationMode::Unsigned => (current - baseline).abs(),
        }
    }
}

impl std::fmt::Display for DeviationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviationMode::Signed => "signed",
            DeviationMode::Unsigned => "unsigned",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_deviation_keeps_direction() {
        let mode = DeviationMode::Signed;
        assert_eq!(mode.deviation(350.0, 300.0), 50.0);
        assert_eq!(mode.deviation(250.0, 300.0), -50.0);
    }

    #[test]
    fn test_unsigned_deviation_folds_direction() {
        let mode = DeviationMode::Unsigned;
        assert_eq!(mode.deviation(110.0, 90.0), 20.0);
        assert_eq!(mode.deviation(70.0, 90.0), 20.0);
    }
}
