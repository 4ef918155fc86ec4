//! Prediction panel endpoints.
//!
//! Everything served here comes from a `PlaceholderPredictor`. The numbers
//! are demo output, not model results.
//!
//! - `GET /api/ml/insights`: performance, factor weights, model versions
//! - `GET /api/ml/explanation/:patient_id`: SHAP-style explanation
//! - `GET /api/ml/explanation/:patient_id/summary`: plain-language summary
//! - `POST /api/ml/predict`: compatibility score for `{patientId, organData}`
//! - `POST /api/ml/evaluate`: evaluation metrics for `{modelId, testData}`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::prediction::{
    self, Evaluation, Explanation, ExplanationSummary, ModelVersion, PerformanceMetrics,
    Prediction,
};

#[derive(Serialize)]
pub struct FactorWeight {
    pub name: String,
    pub importance: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub performance_metrics: PerformanceMetrics,
    pub prediction_factors: Vec<FactorWeight>,
    pub models: Vec<ModelVersion>,
}

/// String form of a required identifier field.
fn required_id(body: &Value, name: &'static str) -> Result<String, ApiError> {
    match prediction::require(body.get(name), name)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ApiError::BadRequest(format!("{name} must be a string"))),
    }
}

/// `GET /api/ml/insights`: factor weights come from the database, the
/// rest from the predictor.
pub async fn insights(State(ctx): State<ApiContext>) -> Result<Json<InsightsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let prediction_factors = db::list_prediction_factors(&conn)?
        .into_iter()
        .map(|f| FactorWeight {
            name: f.name,
            importance: f.importance,
        })
        .collect();

    Ok(Json(InsightsResponse {
        performance_metrics: ctx.predictor.performance(),
        prediction_factors,
        models: ctx.predictor.model_versions(),
    }))
}

/// `GET /api/ml/explanation/:patient_id`
pub async fn explanation(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Explanation>, ApiError> {
    Ok(Json(ctx.predictor.explain(&patient_id)?))
}

/// `GET /api/ml/explanation/:patient_id/summary`
pub async fn explanation_summary(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<ExplanationSummary>, ApiError> {
    Ok(Json(ctx.predictor.summarize(&patient_id)?))
}

/// `POST /api/ml/predict`
pub async fn predict(
    State(ctx): State<ApiContext>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(body) = body?;
    let patient_id = required_id(&body, "patientId")?;
    let organ_data = prediction::require(body.get("organData"), "organData")?;

    let result = ctx.predictor.predict(&patient_id, organ_data)?;
    tracing::debug!(%patient_id, score = result.compatibility_score, "Placeholder prediction");
    Ok(Json(result))
}

/// `POST /api/ml/evaluate`
pub async fn evaluate(
    State(ctx): State<ApiContext>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Evaluation>, ApiError> {
    let Json(body) = body?;
    let model_id = required_id(&body, "modelId")?;
    let test_data = prediction::require(body.get("testData"), "testData")?;

    Ok(Json(ctx.predictor.evaluate(&model_id, test_data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_id_accepts_strings_and_numbers() {
        let body = json!({"patientId": " XP-2023-0371 ", "modelId": 24});
        assert_eq!(required_id(&body, "patientId").unwrap(), "XP-2023-0371");
        assert_eq!(required_id(&body, "modelId").unwrap(), "24");
    }

    #[test]
    fn required_id_rejects_blank_and_objects() {
        let body = json!({"patientId": "", "modelId": {"v": 1}});
        assert!(matches!(required_id(&body, "patientId"), Err(ApiError::BadRequest(_))));
        assert!(matches!(required_id(&body, "modelId"), Err(ApiError::BadRequest(_))));
        assert!(matches!(required_id(&body, "absent"), Err(ApiError::BadRequest(_))));
    }
}
