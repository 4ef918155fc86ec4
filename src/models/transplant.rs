use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::CaseStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransplantCase {
    pub id: i64,
    pub patient_id: i64,
    pub organ_type: String,
    /// 0–100
    pub compatibility_score: f64,
    pub status: CaseStatus,
    pub successful: bool,
    pub created_at: NaiveDateTime,
    /// Only present once `status` is terminal.
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewTransplantCase {
    pub patient_id: i64,
    pub organ_type: String,
    pub compatibility_score: f64,
    pub status: CaseStatus,
    pub successful: bool,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

/// A transplant case joined with the patient's display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransplantCaseSummary {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub organ_type: String,
    pub compatibility_score: f64,
    pub status: String,
    pub created_at: String,
}
