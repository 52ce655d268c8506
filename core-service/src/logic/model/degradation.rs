//! Health Degradation Engine
//!
//! The predictor reports instantaneous risk, not remaining quality. Damage to
//! blood products is irreversible, so each tick can only lower a bag's health.

use serde::{Deserialize, Serialize};

use crate::constants::DAMAGE_SCALE;

/// How a raw model score moves the stored health index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DegradationPolicy {
    /// `health -= (1 - raw) * scale`, floored at 0
    ScaledDamage { scale: f64 },
    /// `health = min(health, raw)`
    MonotonicMinimum,
}

impl Default for DegradationPolicy {
    fn default() -> Self {
        DegradationPolicy::ScaledDamage { scale: DAMAGE_SCALE }
    }
}

impl DegradationPolicy {
    /// New health index from the previous one and a raw model score.
    ///
    /// `raw_score` is clamped to [0, 1]; the result never exceeds `previous`
    /// and never leaves [0, 1]. A NaN `previous` is read as 0, a NaN score
    /// as total failure.
    pub fn apply(&self, previous: f64, raw_score: f64) -> f64 {
        let previous = unit_or_zero(previous);
        let raw = unit_or_zero(raw_score);

        let next = match self {
            DegradationPolicy::ScaledDamage { scale } => {
                // 0 * inf is NaN: no shortfall means no damage at any scale
                let damage = (1.0 - raw) * scale.max(0.0);
                if damage.is_nan() {
                    previous
                } else {
                    previous - damage
                }
            }
            DegradationPolicy::MonotonicMinimum => previous.min(raw),
        };

        next.clamp(0.0, previous)
    }

    /// Scale is finite and non-negative (always true for `MonotonicMinimum`)
    pub fn is_valid(&self) -> bool {
        match self {
            DegradationPolicy::ScaledDamage { scale } => scale.is_finite() && *scale >= 0.0,
            DegradationPolicy::MonotonicMinimum => true,
        }
    }
}

fn unit_or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_scaled_damage_reference_value() {
        let policy = DegradationPolicy::default();
        assert!((policy.apply(1.0, 0.40) - 0.91).abs() < EPS);
    }

    #[test]
    fn test_perfect_score_causes_no_damage() {
        let policy = DegradationPolicy::default();
        assert_eq!(policy.apply(0.7, 1.0), 0.7);
    }

    #[test]
    fn test_raw_score_is_clamped() {
        let policy = DegradationPolicy::default();
        assert_eq!(policy.apply(0.8, 3.5), 0.8);
        assert!((policy.apply(0.8, -2.0) - 0.65).abs() < EPS);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let policy = DegradationPolicy::ScaledDamage { scale: 0.15 };
        let mut health = 0.1;
        for _ in 0..5 {
            health = policy.apply(health, 0.0);
        }
        assert_eq!(health, 0.0);
    }

    #[test]
    fn test_unbounded_scale_never_yields_nan() {
        let policy = DegradationPolicy::ScaledDamage { scale: f64::INFINITY };
        assert!(!policy.is_valid());

        let after_perfect = policy.apply(1.0, 1.0);
        assert_eq!(after_perfect, 1.0);
        assert_eq!(policy.apply(after_perfect, 0.5), 0.0);

        let nan_scale = DegradationPolicy::ScaledDamage { scale: f64::NAN };
        assert_eq!(nan_scale.apply(0.9, 0.2), 0.9);
    }

    #[test]
    fn test_nan_inputs_do_not_panic() {
        let policy = DegradationPolicy::default();
        assert_eq!(policy.apply(f64::NAN, 0.5), 0.0);
        assert!((policy.apply(0.6, f64::NAN) - 0.45).abs() < EPS);
        assert!(DegradationPolicy::default().is_valid());
        assert!(!DegradationPolicy::ScaledDamage { scale: -0.1 }.is_valid());
    }

    #[test]
    fn test_monotonic_minimum() {
        let policy = DegradationPolicy::MonotonicMinimum;
        assert_eq!(policy.apply(0.9, 0.95), 0.9);
        assert_eq!(policy.apply(0.9, 0.4), 0.4);
    }

    #[test]
    fn test_health_is_non_increasing_for_any_score_sequence() {
        // Deterministic pseudo-random walk over [0, 1], including the endpoints
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut scores = vec![0.0, 1.0];
        for _ in 0..500 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            scores.push((state % 10_001) as f64 / 10_000.0);
        }

        for policy in [DegradationPolicy::default(), DegradationPolicy::MonotonicMinimum] {
            let mut health = 1.0;
            for raw in &scores {
                let next = policy.apply(health, *raw);
                assert!(next <= health, "{:?}: {} -> {}", policy, health, next);
                assert!((0.0..=1.0).contains(&next));
                health = next;
            }
        }
    }
}
