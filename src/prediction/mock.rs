//! Hash-plus-jitter placeholder predictor.

use std::sync::{Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use super::catalog::{
    recommendation, ACTIVE_MODEL_PERFORMANCE, EVALUATION, FEATURE_IMPORTANCE, MODEL_VERSIONS,
    RISK_FACTORS,
};
use super::{
    Evaluation, Explanation, ExplanationSummary, FactorDetail, FeatureDistribution, ModelVersion,
    PerformanceMetrics, PlaceholderPredictor, Prediction, PredictionError, ShapValue,
};

/// Noise added to the identity-derived base score, as a half-width.
pub const SCORE_JITTER: f64 = 5.0;

const DISTRIBUTION_FEATURES: [&str; 4] = [
    "Genetic Compatibility",
    "Immune Response Profile",
    "Organ Health Metrics",
    "Patient Health History",
];
const DISTRIBUTION_SAMPLES: usize = 10;

/// Deterministic part of the score: UTF-16 code-unit sum mod 30, offset by 60.
pub fn base_score(patient_id: &str) -> f64 {
    let sum: u64 = patient_id.encode_utf16().map(u64::from).sum();
    (sum % 30 + 60) as f64
}

/// Combine base score and noise, clamp to [0, 100], round to one decimal.
pub fn placeholder_score(patient_id: &str, noise: f64) -> f64 {
    let score = (base_score(patient_id) + noise).clamp(0.0, 100.0);
    (score * 10.0).round() / 10.0
}

/// Placeholder predictor. Outputs depend on the patient identifier plus
/// random jitter; a fixed seed makes them reproducible.
pub struct MockPredictor {
    rng: Mutex<StdRng>,
}

impl MockPredictor {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    fn rng(&self) -> Result<MutexGuard<'_, StdRng>, PredictionError> {
        self.rng.lock().map_err(|_| PredictionError::LockPoisoned)
    }
}

impl PlaceholderPredictor for MockPredictor {
    fn predict(&self, patient_id: &str, _organ_data: &Value) -> Result<Prediction, PredictionError> {
        let noise = self.rng()?.gen_range(-SCORE_JITTER..SCORE_JITTER);
        let score = placeholder_score(patient_id, noise);
        Ok(Prediction {
            compatibility_score: score,
            risk_factors: RISK_FACTORS.to_vec(),
            recommendation: recommendation(score),
        })
    }

    fn explain(&self, patient_id: &str) -> Result<Explanation, PredictionError> {
        let mut rng = self.rng()?;

        let mut shap_values: Vec<ShapValue> = FEATURE_IMPORTANCE
            .iter()
            .map(|f| {
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                ShapValue {
                    feature: f.feature,
                    shap_value: f64::from(f.importance) / 100.0 * sign * 2.0,
                    importance: f.importance,
                }
            })
            .collect();
        shap_values.sort_by(|a, b| b.shap_value.abs().total_cmp(&a.shap_value.abs()));

        let feature_distributions = DISTRIBUTION_FEATURES
            .iter()
            .map(|&feature| FeatureDistribution {
                feature,
                distribution: (0..DISTRIBUTION_SAMPLES)
                    .map(|_| rng.gen_range(0.0..100.0))
                    .collect(),
            })
            .collect();

        Ok(Explanation {
            method: "SHAP",
            patient_id: patient_id.to_string(),
            base_value: 0.5,
            shap_values,
            feature_distributions,
        })
    }

    fn summarize(&self, _patient_id: &str) -> Result<ExplanationSummary, PredictionError> {
        let [top, second, third, _] = FEATURE_IMPORTANCE;

        let profile = if top.importance > 30 {
            format!(
                "strong compatibility profile mainly due to favorable {} ({}% importance). ",
                top.feature.to_lowercase(),
                top.importance
            )
        } else {
            format!(
                "moderate compatibility profile with {} being the most significant factor ({}% importance). ",
                top.feature.to_lowercase(),
                top.importance
            )
        };
        let summary = format!(
            "This transplant has a {profile}Secondary factors include {} ({}%) and {} ({}%).",
            second.feature.to_lowercase(),
            second.importance,
            third.feature.to_lowercase(),
            third.importance
        );

        let detailed_factors = FEATURE_IMPORTANCE
            .iter()
            .map(|f| FactorDetail {
                factor: f.feature,
                explanation: format!(
                    "This factor contributes {}% to the overall prediction. The patient's value of \"{}\" is {} for transplant success.",
                    f.importance,
                    f.value,
                    if f.importance > 25 {
                        "highly favorable"
                    } else {
                        "moderately favorable"
                    }
                ),
            })
            .collect();

        Ok(ExplanationSummary {
            summary,
            detailed_factors,
        })
    }

    fn evaluate(&self, model_id: &str, _test_data: &Value) -> Result<Evaluation, PredictionError> {
        tracing::debug!(model_id, "Returning fixed evaluation metrics");
        Ok(EVALUATION)
    }

    fn performance(&self) -> PerformanceMetrics {
        ACTIVE_MODEL_PERFORMANCE
    }

    fn model_versions(&self) -> Vec<ModelVersion> {
        MODEL_VERSIONS.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_score_depends_only_on_identity() {
        assert_eq!(base_score("XP-2023-0371"), base_score("XP-2023-0371"));
        assert!((60.0..90.0).contains(&base_score("XP-2023-0371")));
        // "" sums to 0
        assert_eq!(base_score(""), 60.0);
    }

    #[test]
    fn score_always_in_range() {
        let inputs = [
            "",
            "XP-2023-0371",
            "患者-001",
            "🫀🫁",
            "ÄÖÜ-ß",
            &"Z".repeat(10_000),
        ];
        for id in inputs {
            for noise in [-100.0, -SCORE_JITTER, 0.0, SCORE_JITTER, 100.0] {
                let score = placeholder_score(id, noise);
                assert!((0.0..=100.0).contains(&score), "{id:?} {noise} -> {score}");
            }
        }
    }

    #[test]
    fn predictions_stay_in_range_with_jitter() {
        let predictor = MockPredictor::seeded(42);
        for id in ["", "XP-2023-0287", "ñandú", "\u{0}"] {
            for _ in 0..50 {
                let prediction = predictor.predict(id, &json!({})).unwrap();
                assert!((0.0..=100.0).contains(&prediction.compatibility_score));
                let base = base_score(id);
                assert!((prediction.compatibility_score - base).abs() <= SCORE_JITTER + 0.05);
            }
        }
    }

    #[test]
    fn seeded_predictors_agree() {
        let a = MockPredictor::seeded(7);
        let b = MockPredictor::seeded(7);
        let pa = a.predict("XP-2023-0371", &json!({})).unwrap();
        let pb = b.predict("XP-2023-0371", &json!({})).unwrap();
        assert_eq!(pa, pb);
        assert_eq!(pa.risk_factors.len(), 3);
        assert_eq!(pa.recommendation, recommendation(pa.compatibility_score));
    }

    #[test]
    fn explanation_is_sorted_by_magnitude() {
        let explanation = MockPredictor::seeded(3).explain("XP-2023-0371").unwrap();
        assert_eq!(explanation.method, "SHAP");
        assert_eq!(explanation.base_value, 0.5);
        assert_eq!(explanation.patient_id, "XP-2023-0371");
        let magnitudes: Vec<f64> = explanation
            .shap_values
            .iter()
            .map(|s| s.shap_value.abs())
            .collect();
        assert_eq!(magnitudes, vec![0.68, 0.56, 0.42, 0.34]);
        assert_eq!(explanation.feature_distributions.len(), 4);
        for dist in &explanation.feature_distributions {
            assert_eq!(dist.distribution.len(), 10);
            assert!(dist.distribution.iter().all(|v| (0.0..100.0).contains(v)));
        }
    }

    #[test]
    fn summary_mentions_top_factors() {
        let summary = MockPredictor::seeded(1).summarize("XP-1").unwrap();
        assert!(summary
            .summary
            .starts_with("This transplant has a strong compatibility profile mainly due to favorable genetic compatibility (34% importance)."));
        assert!(summary
            .summary
            .ends_with("Secondary factors include immune response profile (28%) and organ health metrics (21%)."));
        assert_eq!(summary.detailed_factors.len(), 4);
        assert!(summary.detailed_factors[0].explanation.contains("highly favorable"));
        assert!(summary.detailed_factors[3].explanation.contains("moderately favorable"));
    }

    #[test]
    fn evaluation_and_catalog_are_fixed() {
        let predictor = MockPredictor::seeded(0);
        let eval = predictor.evaluate("v2.4.0", &json!([1, 2, 3])).unwrap();
        assert_eq!(eval.confusion_matrix, [[120, 7], [13, 110]]);
        assert_eq!(eval.roc_auc, 0.956);
        assert_eq!(predictor.performance().accuracy, "94.3%");
        let versions = predictor.model_versions();
        assert_eq!(versions[0].version, "v2.4.0");
        assert!(versions[0].active);
        assert_eq!(versions[1].date, "June 2, 2023");
    }
}
