//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the model input schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature or vocabulary entry → increment FEATURE_VERSION
//!
//! The predictor was trained on exactly these columns in exactly this order.
//! Categorical vocabularies are fixed here and never inferred from data.

use crc32fast::Hasher;
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// CATEGORICAL VOCABULARIES
// ============================================================================

/// Known route labels, one-hot encoded as `route_<label>`
pub const ROUTE_VOCABULARY: [&str; 4] = ["Hospital_1", "Hospital_2", "Hospital_3", "Hospital_4"];

/// Known blood group labels, one-hot encoded as `blood_type_<label>`
pub const BLOOD_TYPE_VOCABULARY: [&str; 8] = ["A+", "A-", "AB+", "AB-", "B+", "B-", "O+", "O-"];

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Raw thermal (0-5) ===
    "temp_mean",
    "temp_min",
    "temp_max",
    "temp_std",
    "frac_temp_above_6",
    "frac_temp_above_8",

    // === Raw humidity (6-7) ===
    "hum_mean",
    "hum_std",

    // === Raw handling (8-11) ===
    "accel_rms",
    "door_count",
    "light_mean_abs",
    "handling_stress",

    // === Time (12-14) ===
    "elapsed_hours",         // 12: hours since the current trip started
    "hour_of_day",           // 13: UTC hour of the tick
    "day_of_week",           // 14: Monday = 0

    // === Cumulative exposure (15-20) ===
    "cum_door_count",
    "cum_accel_rms",
    "cum_handling_stress",
    "cum_light_mean_abs",
    "cum_frac_temp_above_6",
    "cum_frac_temp_above_8",

    // === Thermal deviation (21-22) ===
    "temp_dev_above_6",      // 21: max(temp_mean - 6, 0)
    "cum_temp_dev_above_6",  // 22: running sum of the above

    // === Route one-hot (23-26) ===
    "route_Hospital_1",
    "route_Hospital_2",
    "route_Hospital_3",
    "route_Hospital_4",

    // === Blood type one-hot (27-34) ===
    "blood_type_A+",
    "blood_type_A-",
    "blood_type_AB+",
    "blood_type_AB-",
    "blood_type_B+",
    "blood_type_B-",
    "blood_type_O+",
    "blood_type_O-",
];

/// Total number of features
pub const FEATURE_COUNT: usize = 35;

/// Index of the first route one-hot column
pub const ROUTE_OFFSET: usize = 23;

/// Index of the first blood type one-hot column
pub const BLOOD_TYPE_OFFSET: usize = ROUTE_OFFSET + ROUTE_VOCABULARY.len();

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);
const _: () = assert!(BLOOD_TYPE_OFFSET + BLOOD_TYPE_VOCABULARY.len() == FEATURE_COUNT);

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 35);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(FEATURE_VERSION + 1, layout_hash()).is_err());
        assert!(validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).is_err());
    }

    #[test]
    fn test_vocabulary_columns_match_layout() {
        for (i, route) in ROUTE_VOCABULARY.iter().enumerate() {
            assert_eq!(feature_index(&format!("route_{}", route)), Some(ROUTE_OFFSET + i));
        }
        for (i, blood_type) in BLOOD_TYPE_VOCABULARY.iter().enumerate() {
            assert_eq!(
                feature_index(&format!("blood_type_{}", blood_type)),
                Some(BLOOD_TYPE_OFFSET + i)
            );
        }
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(0), Some("temp_mean"));
        assert_eq!(feature_name(22), Some("cum_temp_dev_above_6"));
        assert_eq!(feature_name(FEATURE_COUNT), None);
    }
}
