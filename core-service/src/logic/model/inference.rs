//! Inference Engine - Predictor seam and ONNX Runtime integration
//!
//! The engine treats the model as a black box `score(features) -> raw`.
//! `OnnxPredictor` is the production implementation; tests plug in closures.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use thiserror::Error;

use crate::logic::features::layout::{layout_hash, LayoutMismatchError, FEATURE_VERSION};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("model not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model returned no output")]
    EmptyOutput,

    #[error("model returned a non-finite score: {0}")]
    NonFiniteOutput(f64),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),
}

// ============================================================================
// PREDICTOR TRAIT
// ============================================================================

/// Black-box health model. Output is nominally in [0, 1]; callers clamp.
pub trait HealthPredictor: Send {
    fn score(&mut self, features: &FeatureVector) -> Result<f64, PredictorError>;

    /// Short description for status reporting
    fn describe(&self) -> String {
        "custom predictor".to_string()
    }
}

impl<F> HealthPredictor for F
where
    F: FnMut(&FeatureVector) -> Result<f64, PredictorError> + Send,
{
    fn score(&mut self, features: &FeatureVector) -> Result<f64, PredictorError> {
        self(features)
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

#[derive(Debug, Clone)]
struct ModelMetadata {
    model_path: String,
    feature_version: u8,
    layout_hash: u32,
    features: usize,
    loaded_at: DateTime<Utc>,
}

/// ONNX regressor taking `float32[1, FEATURE_COUNT]` and returning the
/// health score as the first element of its first output
pub struct OnnxPredictor {
    session: Session,
    metadata: ModelMetadata,
    inference_count: u64,
    latency_sum_us: u64,
}

impl OnnxPredictor {
    /// Load ONNX model from file
    pub fn load(model_path: &Path) -> Result<Self, PredictorError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(PredictorError::ModelNotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| PredictorError::Load(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| PredictorError::Load(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| PredictorError::Load(format!("Failed to load model: {}", e)))?;

        log::info!("ONNX model loaded successfully");

        Ok(Self {
            session,
            metadata: ModelMetadata {
                model_path: model_path.display().to_string(),
                feature_version: FEATURE_VERSION,
                layout_hash: layout_hash(),
                features: FEATURE_COUNT,
                loaded_at: Utc::now(),
            },
            inference_count: 0,
            latency_sum_us: 0,
        })
    }

    /// Average inference latency in milliseconds
    pub fn avg_latency_ms(&self) -> f32 {
        if self.inference_count == 0 {
            return 0.0;
        }
        (self.latency_sum_us as f32 / self.inference_count as f32) / 1000.0
    }

    fn run(&mut self, features: &FeatureVector) -> Result<f64, PredictorError> {
        let input = Array2::from_shape_vec((1, FEATURE_COUNT), features.as_slice().to_vec())
            .map_err(|e| PredictorError::Inference(format!("Shape error: {}", e)))?;
        let tensor = Tensor::from_array(input)
            .map_err(|e| PredictorError::Inference(format!("Tensor error: {}", e)))?;

        let output_name = self
            .session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or(PredictorError::EmptyOutput)?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(|e| PredictorError::Inference(format!("Run error: {}", e)))?;

        let output = outputs.get(&output_name).ok_or(PredictorError::EmptyOutput)?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictorError::Inference(format!("Extract error: {}", e)))?;

        data.first()
            .map(|v| f64::from(*v))
            .ok_or(PredictorError::EmptyOutput)
    }
}

impl HealthPredictor for OnnxPredictor {
    fn score(&mut self, features: &FeatureVector) -> Result<f64, PredictorError> {
        if features.version != self.metadata.feature_version
            || features.layout_hash != self.metadata.layout_hash
        {
            return Err(PredictorError::Layout(LayoutMismatchError {
                expected_version: self.metadata.feature_version,
                expected_hash: self.metadata.layout_hash,
                actual_version: features.version,
                actual_hash: features.layout_hash,
            }));
        }

        let start = Instant::now();
        let result = self.run(features);

        self.inference_count += 1;
        self.latency_sum_us += start.elapsed().as_micros() as u64;

        if let Err(e) = &result {
            log::error!("ONNX inference failed: {}", e);
        }
        result
    }

    fn describe(&self) -> String {
        format!(
            "ONNX Runtime (CPU): {} [{} features, layout v{} {:08x}, loaded {}, {} runs, {:.2} ms avg]",
            self.metadata.model_path,
            self.metadata.features,
            self.metadata.feature_version,
            self.metadata.layout_hash,
            self.metadata.loaded_at.to_rfc3339(),
            self.inference_count,
            self.avg_latency_ms()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxPredictor::load(&dir.path().join("health_model.onnx"));
        assert!(matches!(result, Err(PredictorError::ModelNotFound(_))));
    }

    #[test]
    fn test_unreadable_model_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health_model.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();

        assert!(matches!(OnnxPredictor::load(&path), Err(PredictorError::Load(_))));
    }

    #[test]
    fn test_closure_predictor() {
        let mut calls = 0;
        let mut predictor = move |_: &FeatureVector| -> Result<f64, PredictorError> {
            calls += 1;
            Ok(0.25 * calls as f64)
        };

        let vector = FeatureVector::new();
        assert_eq!(predictor.score(&vector).unwrap(), 0.25);
        assert_eq!(predictor.score(&vector).unwrap(), 0.5);
        assert_eq!(predictor.describe(), "custom predictor");
    }
}
