//! Placeholder prediction layer.
//!
//! Nothing here is a trained model. `PlaceholderPredictor` is the seam a real
//! model integration would implement; `MockPredictor` fabricates plausible
//! numbers so the dashboard panels are not empty. Scores have no clinical or
//! statistical meaning.

pub mod catalog;
pub mod mock;

pub use catalog::*;
pub use mock::*;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Predictor lock poisoned")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// Response types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub factor: &'static str,
    pub risk: &'static str,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// 0–100, one decimal
    pub compatibility_score: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapValue {
    pub feature: &'static str,
    pub shap_value: f64,
    pub importance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDistribution {
    pub feature: &'static str,
    pub distribution: Vec<f64>,
}

/// SHAP-style explanation of a single (placeholder) prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub method: &'static str,
    pub patient_id: String,
    pub base_value: f64,
    pub shap_values: Vec<ShapValue>,
    pub feature_distributions: Vec<FeatureDistribution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorDetail {
    pub factor: &'static str,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationSummary {
    pub summary: String,
    pub detailed_factors: Vec<FactorDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub confusion_matrix: [[u32; 2]; 2],
    pub roc_auc: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub accuracy: &'static str,
    pub precision: &'static str,
    pub recall: &'static str,
    pub f1_score: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelVersion {
    pub version: &'static str,
    pub active: bool,
    pub date: &'static str,
}

// ═══════════════════════════════════════════════════════════
// Predictor seam
// ═══════════════════════════════════════════════════════════

/// Interface for the prediction panels. Implementations are placeholders until
/// a real model exists; callers must not treat outputs as clinical results.
pub trait PlaceholderPredictor: Send + Sync {
    /// Compatibility score in [0, 100] for a patient identifier.
    fn predict(&self, patient_id: &str, organ_data: &Value) -> Result<Prediction, PredictionError>;

    fn explain(&self, patient_id: &str) -> Result<Explanation, PredictionError>;

    fn summarize(&self, patient_id: &str) -> Result<ExplanationSummary, PredictionError>;

    fn evaluate(&self, model_id: &str, test_data: &Value) -> Result<Evaluation, PredictionError>;

    fn performance(&self) -> PerformanceMetrics;

    fn model_versions(&self) -> Vec<ModelVersion>;
}

/// Null and whitespace-only strings count as missing.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Reject a missing or blank required parameter.
pub fn require<'a>(value: Option<&'a Value>, name: &'static str) -> Result<&'a Value, PredictionError> {
    match value {
        Some(v) if !is_blank(v) => Ok(v),
        _ => Err(PredictionError::MissingParameter(name)),
    }
}
