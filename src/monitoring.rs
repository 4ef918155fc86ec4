//! Post-transplant monitoring: metric trends and the patient roster.
//!
//! Trends are per-day averages across every monitoring patient matching the
//! organ filter. Roster rows carry two derived fields, the organ-function
//! status band and the `urgent` flag, computed here rather than in SQL.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{self, DatabaseError};
use crate::models::enums::{MonitoringMetric, OrganFunctionStatus};
use crate::models::{DailyAverage, MonitoringFilter, MonitoringRosterRow, TimeRange, ELEVATED_RESPONSE};

/// Organ function below this value marks a patient urgent.
pub const URGENT_ORGAN_FUNCTION: f64 = 70.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One metric's chart data.
#[derive(Debug, Clone, Serialize)]
pub struct MetricSeries {
    pub data: Vec<f64>,
    /// `m/d`, one per data point
    pub labels: Vec<String>,
    pub average: String,
    pub threshold: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSeries {
    pub organ_function: MetricSeries,
    pub immune_response: MetricSeries,
    pub recovery_index: MetricSeries,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganFunction {
    pub value: f64,
    pub status: OrganFunctionStatus,
}

/// A roster row as shown in the monitoring table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringPatientView {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub transplant_date: String,
    pub organ_type: String,
    pub organ_function: OrganFunction,
    pub immune_status: String,
    pub urgent: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringOverview {
    pub monitoring_data: MonitoringSeries,
    pub patients: Vec<MonitoringPatientView>,
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

pub fn is_urgent(organ_function_value: f64, immune_status: &str) -> bool {
    organ_function_value < URGENT_ORGAN_FUNCTION || immune_status == ELEVATED_RESPONSE
}

/// Chart label without the year. Ambiguous across a year boundary.
pub fn date_label(date: NaiveDate) -> String {
    date.format("%-m/%-d").to_string()
}

/// `"May 3, 2023"`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Mean of the daily averages; 0 for an empty series.
fn mean(points: &[DailyAverage]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64
}

fn build_series(metric: MonitoringMetric, points: Vec<DailyAverage>) -> MetricSeries {
    let average = metric.format_average(mean(&points));
    let (labels, data) = points
        .into_iter()
        .map(|p| (date_label(p.date), p.value))
        .unzip();
    MetricSeries {
        data,
        labels,
        average,
        threshold: metric.threshold(),
    }
}

fn view_from_row(row: MonitoringRosterRow) -> MonitoringPatientView {
    MonitoringPatientView {
        id: row.id.to_string(),
        urgent: is_urgent(row.organ_function_value, &row.immune_status),
        organ_function: OrganFunction {
            value: row.organ_function_value,
            status: OrganFunctionStatus::from_value(row.organ_function_value),
        },
        patient_id: row.patient_code,
        name: row.name,
        transplant_date: long_date(row.transplant_date),
        organ_type: row.organ_type,
        immune_status: row.immune_status,
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Trends for all three metrics over samples dated strictly after `today - range`.
pub fn fetch_monitoring_series(
    conn: &Connection,
    range: TimeRange,
    filter: &MonitoringFilter,
    today: NaiveDate,
) -> Result<MonitoringSeries, DatabaseError> {
    let after = today - Duration::days(range.days());
    let series_for = |metric: MonitoringMetric| {
        db::daily_metric_averages(conn, metric, filter, after)
            .map(|points| build_series(metric, points))
    };

    Ok(MonitoringSeries {
        organ_function: series_for(MonitoringMetric::OrganFunction)?,
        immune_response: series_for(MonitoringMetric::ImmuneResponse)?,
        recovery_index: series_for(MonitoringMetric::RecoveryIndex)?,
    })
}

pub fn fetch_monitoring_roster(
    conn: &Connection,
    filter: &MonitoringFilter,
) -> Result<Vec<MonitoringPatientView>, DatabaseError> {
    Ok(db::list_monitoring_roster(conn, filter)?
        .into_iter()
        .map(view_from_row)
        .collect())
}

/// Everything the monitoring page needs in one fetch.
pub fn fetch_monitoring_overview(
    conn: &Connection,
    range: TimeRange,
    filter: &MonitoringFilter,
    today: NaiveDate,
) -> Result<MonitoringOverview, DatabaseError> {
    Ok(MonitoringOverview {
        monitoring_data: fetch_monitoring_series(conn, range, filter, today)?,
        patients: fetch_monitoring_roster(conn, filter)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::tests::{date, monitoring_patient, seed_patient, test_db};
    use crate::models::NewMonitoringDataPoint;

    #[test]
    fn urgent_boundaries() {
        assert!(is_urgent(69.0, "Stable"));
        assert!(!is_urgent(70.0, "Stable"));
        assert!(!is_urgent(71.0, "Stable"));
        assert!(is_urgent(71.0, "Elevated Response"));
        assert!(is_urgent(95.0, "Elevated Response"));
        assert!(!is_urgent(95.0, "Mild Response"));
    }

    #[test]
    fn labels_drop_the_year() {
        assert_eq!(date_label(date("2024-03-05")), "3/5");
        assert_eq!(date_label(date("2023-12-31")), "12/31");
    }

    #[test]
    fn long_date_matches_display_format() {
        assert_eq!(long_date(date("2023-05-03")), "May 3, 2023");
        assert_eq!(long_date(date("2023-04-18")), "April 18, 2023");
    }

    #[test]
    fn empty_series_reports_zero_average() {
        let conn = test_db();
        let series = fetch_monitoring_series(
            &conn,
            TimeRange::default(),
            &MonitoringFilter::default(),
            date("2024-03-31"),
        )
        .unwrap();
        assert!(series.organ_function.data.is_empty());
        assert_eq!(series.organ_function.average, "0.0%");
        assert_eq!(series.immune_response.average, "0.0");
        assert_eq!(series.recovery_index.threshold, "70%");
    }

    #[test]
    fn series_respect_window_and_format() {
        let conn = test_db();
        let patient = seed_patient(&conn, "XP-1");
        let mp = db::insert_monitoring_patient(&conn, &monitoring_patient(patient, "Heart", 94.0, "Stable"))
            .unwrap();
        let point = |day: &str, organ: f64, immune: f64| NewMonitoringDataPoint {
            monitoring_patient_id: mp,
            date: date(day),
            organ_function_value: organ,
            immune_response_value: immune,
            recovery_index_value: 72.0,
            notes: None,
        };
        db::insert_monitoring_data(
            &conn,
            &[
                // exactly 30 days before: excluded
                point("2024-03-01", 10.0, 9.0),
                point("2024-03-02", 80.0, 4.0),
                point("2024-03-30", 90.0, 5.0),
            ],
        )
        .unwrap();

        let series = fetch_monitoring_series(
            &conn,
            TimeRange::Last30Days,
            &MonitoringFilter::default(),
            date("2024-03-31"),
        )
        .unwrap();
        assert_eq!(series.organ_function.data, vec![80.0, 90.0]);
        assert_eq!(series.organ_function.labels, vec!["3/2", "3/30"]);
        assert_eq!(series.organ_function.average, "85.0%");
        assert_eq!(series.immune_response.average, "4.5");
        assert_eq!(series.recovery_index.average, "72.0%");
        assert_eq!(series.organ_function.threshold, "75%");

        let wider = fetch_monitoring_series(
            &conn,
            TimeRange::Last90Days,
            &MonitoringFilter::default(),
            date("2024-03-31"),
        )
        .unwrap();
        assert_eq!(wider.organ_function.data.len(), 3);
    }

    #[test]
    fn roster_derives_status_and_urgency() {
        let conn = test_db();
        let cases = [
            ("XP-1", 69.0, "Stable", (OrganFunctionStatus::Concerning, true)),
            ("XP-2", 70.0, "Stable", (OrganFunctionStatus::Concerning, false)),
            ("XP-3", 71.0, "Stable", (OrganFunctionStatus::Concerning, false)),
            ("XP-4", 90.0, "Elevated Response", (OrganFunctionStatus::Excellent, true)),
            ("XP-5", 75.0, "Mild Response", (OrganFunctionStatus::Good, false)),
        ];
        for (code, value, immune, _) in &cases {
            let patient = seed_patient(&conn, code);
            db::insert_monitoring_patient(&conn, &monitoring_patient(patient, "Kidney", *value, immune))
                .unwrap();
        }

        let roster = fetch_monitoring_roster(&conn, &MonitoringFilter::default()).unwrap();
        assert_eq!(roster.len(), cases.len());
        for (code, _, _, (status, urgent)) in &cases {
            let row = roster.iter().find(|r| r.patient_id == *code).unwrap();
            assert_eq!(row.organ_function.status, *status, "{code}");
            assert_eq!(row.urgent, *urgent, "{code}");
            assert_eq!(row.transplant_date, "May 3, 2023");
        }
    }

    #[test]
    fn overview_serializes_expected_shape() {
        let conn = test_db();
        let patient = seed_patient(&conn, "XP-2023-0287");
        db::insert_monitoring_patient(
            &conn,
            &monitoring_patient(patient, "Liver", 68.0, "Elevated Response"),
        )
        .unwrap();

        let overview = fetch_monitoring_overview(
            &conn,
            TimeRange::default(),
            &MonitoringFilter::default(),
            date("2024-03-31"),
        )
        .unwrap();
        let json = serde_json::to_value(&overview).unwrap();
        assert!(json["monitoringData"]["organFunction"]["data"].is_array());
        assert_eq!(json["monitoringData"]["immuneResponse"]["threshold"], "5.0");
        let row = &json["patients"][0];
        assert_eq!(row["patientId"], "XP-2023-0287");
        assert_eq!(row["organFunction"]["status"], "Concerning");
        assert_eq!(row["organFunction"]["value"], 68.0);
        assert_eq!(row["urgent"], true);
        assert_eq!(row["immuneStatus"], "Elevated Response");
    }
}
