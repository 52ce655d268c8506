//! Features Module - Model Input Construction
//!
//! - `layout` - the fixed, versioned column schema
//! - `vector` - the versioned feature vector
//! - `exposure` - cumulative exposure totals per trip
//! - `builder` - record + totals + clock → vector

pub mod builder;
pub mod exposure;
pub mod layout;
pub mod vector;


use thiserror::Error;

pub use builder::{build_features, FeatureVectorBuilder};
pub use exposure::CumulativeTotals;
pub use layout::{LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::FeatureVector;

/// A record that cannot be turned into a well-formed model input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("field `{field}` is not a finite number ({value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),
}
