//! Fixed figures shown in the model-insights panel.

use super::{Evaluation, ModelVersion, PerformanceMetrics, RiskFactor};

/// A feature weight used by the placeholder explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureImportance {
    pub feature: &'static str,
    /// Percentage weight; the set sums to 100.
    pub importance: u32,
    pub value: &'static str,
}

/// Ordered most to least important.
pub const FEATURE_IMPORTANCE: [FeatureImportance; 4] = [
    FeatureImportance {
        feature: "Genetic Compatibility",
        importance: 34,
        value: "High",
    },
    FeatureImportance {
        feature: "Immune Response Profile",
        importance: 28,
        value: "Moderate",
    },
    FeatureImportance {
        feature: "Organ Health Metrics",
        importance: 21,
        value: "Excellent",
    },
    FeatureImportance {
        feature: "Patient Health History",
        importance: 17,
        value: "Good",
    },
];

pub const RISK_FACTORS: [RiskFactor; 3] = [
    RiskFactor {
        factor: "Genetic Mismatch",
        risk: "Medium",
        explanation: "Some HLA markers show potential for rejection",
    },
    RiskFactor {
        factor: "Immune Response",
        risk: "Low",
        explanation: "Patient has favorable immunosuppression profile",
    },
    RiskFactor {
        factor: "Age Factor",
        risk: "Low",
        explanation: "Patient age is within optimal range",
    },
];

pub const ACTIVE_MODEL_PERFORMANCE: PerformanceMetrics = PerformanceMetrics {
    accuracy: "94.3%",
    precision: "91.7%",
    recall: "89.2%",
    f1_score: "90.4%",
};

pub const EVALUATION: Evaluation = Evaluation {
    accuracy: 0.943,
    precision: 0.917,
    recall: 0.892,
    f1_score: 0.904,
    confusion_matrix: [[120, 7], [13, 110]],
    roc_auc: 0.956,
};

pub const MODEL_VERSIONS: [ModelVersion; 2] = [
    ModelVersion {
        version: "v2.4.0",
        active: true,
        date: "May 15, 2023",
    },
    ModelVersion {
        version: "v2.5.0",
        active: false,
        date: "June 2, 2023",
    },
];

/// Recommendation text for a score.
pub fn recommendation(score: f64) -> &'static str {
    if score > 80.0 {
        "Highly Compatible - Proceed with transplant"
    } else if score > 70.0 {
        "Moderately Compatible - Consider with caution"
    } else {
        "Low Compatibility - Consider alternatives"
    }
}
