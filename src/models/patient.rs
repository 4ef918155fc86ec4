use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    /// External identifier (e.g. `XP-2023-0371`). Unique, never changes once issued.
    pub patient_code: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub blood_type: String,
    pub medical_history: Vec<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPatient {
    pub patient_code: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub blood_type: String,
    pub medical_history: Vec<String>,
    pub created_at: NaiveDateTime,
}
