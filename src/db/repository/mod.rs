//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per table. All public functions are re-exported here.

mod monitoring;
mod notification;
mod patient;
mod prediction_factor;
mod transplant;
mod user;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use super::{DatabaseError, DATE_FORMAT, TIMESTAMP_FORMAT};

// Re-export all public items from sub-modules
pub use monitoring::*;
pub use notification::*;
pub use patient::*;
pub use prediction_factor::*;
pub use transplant::*;
pub use user::*;

/// Tables that can be counted through `count_rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Patients,
    TransplantCases,
    MonitoringPatients,
    MonitoringData,
    PredictionFactors,
    Notifications,
}

impl Table {
    fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Patients => "patients",
            Self::TransplantCases => "transplant_cases",
            Self::MonitoringPatients => "monitoring_patients",
            Self::MonitoringData => "monitoring_data",
            Self::PredictionFactors => "prediction_factors",
            Self::Notifications => "notifications",
        }
    }
}

pub fn count_rows(conn: &Connection, table: Table) -> Result<u64, DatabaseError> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", table.name()),
        [],
        |row| row.get(0),
    )?;
    Ok(to_count(count))
}

pub(crate) fn to_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, DatabaseError> {
    // Timestamps written into date columns keep their date part
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("bad date '{raw}': {e}")))
}

/// Accepts `YYYY-MM-DD HH:MM:SS` and bare dates (midnight).
pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DatabaseError> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|e| DatabaseError::ConstraintViolation(format!("bad timestamp '{raw}': {e}")))
}
