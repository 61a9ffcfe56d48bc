//! Difficulty scaling derived from the running score

use super::random::RandomSource;
use crate::config::{GapCurve, SpeedCurve};

/// `min(max, initial + floor(score / interval) * step)`
pub fn speed_for(score: u64, curve: &SpeedCurve) -> f32 {
    let steps = score / u64::from(curve.interval.max(1));
    (curve.initial + steps as f32 * curve.step).min(curve.max)
}

/// Gap for the next spawn: fixed early, redrawn within `[min, initial]` late
pub fn gap_for_spawn(score: u64, curve: &GapCurve, rng: &mut dyn RandomSource) -> f32 {
    if score < u64::from(curve.variance_score) {
        return curve.initial.max(curve.min);
    }
    rng.range(curve.min, curve.initial)
}
