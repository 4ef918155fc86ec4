use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Immune status value that always flags a patient as urgent.
pub const ELEVATED_RESPONSE: &str = "Elevated Response";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringPatient {
    pub id: i64,
    pub patient_id: i64,
    pub transplant_date: NaiveDate,
    pub organ_type: String,
    /// Nominally 0–100
    pub organ_function_value: f64,
    pub immune_status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMonitoringPatient {
    pub patient_id: i64,
    pub transplant_date: NaiveDate,
    pub organ_type: String,
    pub organ_function_value: f64,
    pub immune_status: String,
    pub created_at: NaiveDateTime,
}

/// One daily sample for a monitoring patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringDataPoint {
    pub id: i64,
    pub monitoring_patient_id: i64,
    pub date: NaiveDate,
    pub organ_function_value: f64,
    pub immune_response_value: f64,
    pub recovery_index_value: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMonitoringDataPoint {
    pub monitoring_patient_id: i64,
    pub date: NaiveDate,
    pub organ_function_value: f64,
    pub immune_response_value: f64,
    pub recovery_index_value: f64,
    pub notes: Option<String>,
}

/// Monitoring patient joined with the patient's display fields.
#[derive(Debug, Clone)]
pub struct MonitoringRosterRow {
    pub id: i64,
    pub patient_code: String,
    pub name: String,
    pub transplant_date: NaiveDate,
    pub organ_type: String,
    pub organ_function_value: f64,
    pub immune_status: String,
}

/// Per-day mean of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub value: f64,
}
