use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionFactor {
    pub id: i64,
    pub name: String,
    /// Weight in 0–100. The active set is not required to sum to 100.
    pub importance: f64,
    pub created_at: NaiveDateTime,
}
