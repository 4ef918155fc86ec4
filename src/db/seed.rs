//! Demo data for a fresh database.
//!
//! Each table is seeded only when empty, so running this against an existing
//! database is a no-op for whatever is already there.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use rusqlite::Connection;

use super::repository::{self, Table};
use super::DatabaseError;
use crate::crypto::{hash_password_with_iterations, CryptoError};
use crate::models::enums::CaseStatus;
use crate::models::{
    NewMonitoringDataPoint, NewMonitoringPatient, NewNotification, NewPatient, NewTransplantCase,
    NewUser,
};

/// Days of monitoring history generated per monitoring patient.
pub const HISTORY_DAYS: i64 = 30;

const CHECKUP_NOTE: &str = "Regular checkup performed";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Password hashing failed: {0}")]
    Crypto(#[from] CryptoError),
}

/// Rows inserted by one seeding run, per table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub patients: usize,
    pub transplant_cases: usize,
    pub monitoring_patients: usize,
    pub monitoring_data: usize,
    pub prediction_factors: usize,
    pub notifications: usize,
}

/// Seed every empty table. `today` anchors the generated monitoring history
/// (it ends yesterday); `iterations` is the password hashing cost.
pub fn seed_demo_data(
    conn: &Connection,
    today: NaiveDate,
    iterations: u32,
) -> Result<SeedReport, SeedError> {
    seed_demo_data_with_rng(conn, today, iterations, &mut rand::thread_rng())
}

pub fn seed_demo_data_with_rng<R: Rng>(
    conn: &Connection,
    today: NaiveDate,
    iterations: u32,
    rng: &mut R,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport {
        users: seed_users(conn, iterations)?,
        patients: seed_patients(conn)?,
        ..Default::default()
    };

    let patient_ids = patient_ids_by_code(conn)?;
    report.transplant_cases = seed_transplant_cases(conn, &patient_ids)?;
    report.monitoring_patients = seed_monitoring_patients(conn, &patient_ids)?;
    report.monitoring_data = seed_monitoring_data(conn, today, rng)?;
    report.prediction_factors = seed_prediction_factors(conn, today)?;
    report.notifications = seed_notifications(conn, today)?;

    tracing::info!(?report, "Demo data seeded");
    Ok(report)
}

fn is_empty(conn: &Connection, table: Table) -> Result<bool, DatabaseError> {
    let populated = repository::count_rows(conn, table)? > 0;
    if populated {
        tracing::debug!(?table, "Table already populated, skipping seed");
    }
    Ok(!populated)
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!("invalid date {year}-{month}-{day}"))
    })
}

fn seed_users(conn: &Connection, iterations: u32) -> Result<usize, SeedError> {
    if !is_empty(conn, Table::Users)? {
        return Ok(0);
    }

    let users = [
        (
            "doctor",
            "password",
            "Dr. Sarah Chen",
            "Transplant Specialist",
            "doctor",
            "sarah.chen@xenotransplant.org",
        ),
        (
            "admin",
            "admin123",
            "Admin User",
            "System Administrator",
            "admin",
            "admin@xenotransplant.org",
        ),
    ];

    for (username, password, name, title, role, email) in users {
        repository::insert_user(
            conn,
            &NewUser {
                username: username.into(),
                password_hash: hash_password_with_iterations(password, iterations)?,
                name: name.into(),
                title: title.into(),
                role: role.into(),
                email: Some(email.into()),
            },
        )?;
    }
    Ok(users.len())
}

fn seed_patients(conn: &Connection) -> Result<usize, DatabaseError> {
    if !is_empty(conn, Table::Patients)? {
        return Ok(0);
    }

    #[rustfmt::skip]
    let patients: [(&str, &str, (i32, u32, u32), &str, &str, [&str; 2], (i32, u32, u32)); 7] = [
        ("XP-2023-0371", "John Doe", (1985, 3, 15), "Male", "A+", ["Hypertension", "Type 2 Diabetes"], (2023, 5, 10)),
        ("XP-2023-0368", "Robert Smith", (1978, 11, 22), "Male", "O-", ["Chronic Kidney Disease", "Anemia"], (2023, 5, 8)),
        ("XP-2023-0362", "Alice Parker", (1990, 7, 30), "Female", "B+", ["Hepatitis C", "Fatty Liver Disease"], (2023, 5, 1)),
        ("XP-2023-0355", "Lisa Johnson", (1982, 9, 18), "Female", "AB+", ["COPD", "Former Smoker"], (2023, 4, 25)),
        ("XP-2023-0312", "Maria Garcia", (1975, 5, 20), "Female", "A-", ["Heart Failure", "Arrhythmia"], (2023, 3, 15)),
        ("XP-2023-0298", "Thomas Wilson", (1968, 12, 10), "Male", "O+", ["End-stage Renal Disease", "Hypertension"], (2023, 3, 5)),
        ("XP-2023-0287", "Keisha Johnson", (1988, 2, 28), "Female", "AB-", ["Cirrhosis", "Hepatitis B"], (2023, 2, 20)),
    ];

    for (code, name, (by, bm, bd), gender, blood_type, history, (cy, cm, cd)) in patients {
        repository::insert_patient(
            conn,
            &NewPatient {
                patient_code: code.into(),
                name: name.into(),
                date_of_birth: ymd(by, bm, bd)?,
                gender: gender.into(),
                blood_type: blood_type.into(),
                medical_history: history.iter().map(|h| h.to_string()).collect(),
                created_at: midnight(ymd(cy, cm, cd)?),
            },
        )?;
    }
    Ok(patients.len())
}

fn patient_ids_by_code(conn: &Connection) -> Result<HashMap<String, i64>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT patient_code, id FROM patients")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
    let mut ids = HashMap::new();
    for row in rows {
        let (code, id) = row?;
        ids.insert(code, id);
    }
    Ok(ids)
}

fn lookup(ids: &HashMap<String, i64>, code: &str) -> Result<i64, DatabaseError> {
    ids.get(code).copied().ok_or_else(|| DatabaseError::NotFound {
        entity_type: "patient".into(),
        id: code.into(),
    })
}

fn seed_transplant_cases(
    conn: &Connection,
    ids: &HashMap<String, i64>,
) -> Result<usize, DatabaseError> {
    if !is_empty(conn, Table::TransplantCases)? {
        return Ok(0);
    }

    let cases = [
        ("XP-2023-0371", "Heart", 85.0, CaseStatus::PendingReview, (2023, 6, 10)),
        ("XP-2023-0368", "Kidney", 72.0, CaseStatus::PendingReview, (2023, 6, 5)),
        ("XP-2023-0362", "Liver", 91.0, CaseStatus::ReadyForSurgery, (2023, 5, 28)),
        ("XP-2023-0355", "Lung", 63.0, CaseStatus::PendingReview, (2023, 5, 20)),
    ];

    for (code, organ, score, status, (y, m, d)) in cases {
        repository::insert_transplant_case(
            conn,
            &NewTransplantCase {
                patient_id: lookup(ids, code)?,
                organ_type: organ.into(),
                compatibility_score: score,
                status,
                successful: false,
                created_at: midnight(ymd(y, m, d)?),
                completed_at: None,
            },
        )?;
    }
    Ok(cases.len())
}

fn seed_monitoring_patients(
    conn: &Connection,
    ids: &HashMap<String, i64>,
) -> Result<usize, DatabaseError> {
    if !is_empty(conn, Table::MonitoringPatients)? {
        return Ok(0);
    }

    let patients = [
        ("XP-2023-0312", "Heart", 94.0, "Stable", (2023, 5, 3)),
        ("XP-2023-0298", "Kidney", 82.0, "Mild Response", (2023, 4, 18)),
        ("XP-2023-0287", "Liver", 68.0, "Elevated Response", (2023, 4, 5)),
    ];

    for (code, organ, value, immune_status, (y, m, d)) in patients {
        let transplant_date = ymd(y, m, d)?;
        repository::insert_monitoring_patient(
            conn,
            &NewMonitoringPatient {
                patient_id: lookup(ids, code)?,
                transplant_date,
                organ_type: organ.into(),
                organ_function_value: value,
                immune_status: immune_status.into(),
                created_at: midnight(transplant_date),
            },
        )?;
    }
    Ok(patients.len())
}

/// Linear trend plus symmetric jitter for one metric on day `i`.
struct Trend {
    start: f64,
    slope: f64,
    jitter: f64,
}

impl Trend {
    const fn new(start: f64, slope: f64, jitter: f64) -> Self {
        Self { start, slope, jitter }
    }

    fn sample<R: Rng>(&self, day: i64, rng: &mut R, min: f64, max: f64) -> f64 {
        let noise = rng.gen_range(-self.jitter..self.jitter);
        let raw = self.start + day as f64 * self.slope + noise;
        round1(raw).clamp(min, max)
    }
}

/// Organ function, immune response and recovery index trends for an organ.
fn trends_for(organ: &str) -> [Trend; 3] {
    match organ {
        "Heart" => [
            Trend::new(85.0, 0.3, 3.0),
            Trend::new(4.0, -0.05, 0.5),
            Trend::new(70.0, 0.6, 2.0),
        ],
        "Kidney" => [
            Trend::new(75.0, 0.25, 2.5),
            Trend::new(5.0, -0.08, 0.6),
            Trend::new(65.0, 0.5, 2.5),
        ],
        _ => [
            Trend::new(75.0, -0.2, 2.0),
            Trend::new(5.0, 0.1, 0.5),
            Trend::new(60.0, 0.2, 1.5),
        ],
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn seed_monitoring_data<R: Rng>(
    conn: &Connection,
    today: NaiveDate,
    rng: &mut R,
) -> Result<usize, DatabaseError> {
    if !is_empty(conn, Table::MonitoringData)? {
        return Ok(0);
    }

    let mut points = Vec::new();
    for patient in repository::list_monitoring_patients(conn)? {
        let [organ, immune, recovery] = trends_for(&patient.organ_type);
        for i in 0..HISTORY_DAYS {
            points.push(NewMonitoringDataPoint {
                monitoring_patient_id: patient.id,
                date: today - Duration::days(HISTORY_DAYS - i),
                organ_function_value: organ.sample(i, rng, 40.0, 100.0),
                immune_response_value: immune.sample(i, rng, 0.0, 10.0),
                recovery_index_value: recovery.sample(i, rng, 40.0, 100.0),
                notes: (i % 7 == 0).then(|| CHECKUP_NOTE.to_string()),
            });
        }
    }

    repository::insert_monitoring_data(conn, &points)
}

fn seed_prediction_factors(conn: &Connection, today: NaiveDate) -> Result<usize, DatabaseError> {
    if !is_empty(conn, Table::PredictionFactors)? {
        return Ok(0);
    }

    let factors = [
        ("Genetic Compatibility", 34.0),
        ("Immune Response Profile", 28.0),
        ("Organ Vitality Score", 22.0),
        ("Pre-Op Risk Score", 16.0),
    ];
    let created_at = midnight(today);
    for (name, importance) in factors {
        repository::insert_prediction_factor(conn, name, importance, &created_at)?;
    }
    Ok(factors.len())
}

fn seed_notifications(conn: &Connection, today: NaiveDate) -> Result<usize, DatabaseError> {
    if !is_empty(conn, Table::Notifications)? {
        return Ok(0);
    }
    let Some(doctor) = repository::get_user_by_username(conn, "doctor")? else {
        return Ok(0);
    };

    let morning = |days_ago: i64, hour: u32| {
        midnight(today - Duration::days(days_ago)) + Duration::hours(i64::from(hour))
    };
    let notifications = [
        (
            "Welcome to Xenowatch",
            "Your dashboard is ready. Pending cases and monitoring trends update daily.",
            true,
            morning(2, 8),
        ),
        (
            "New case pending review",
            "Patient XP-2023-0371 (Heart) is awaiting compatibility review.",
            false,
            morning(1, 9),
        ),
        (
            "Elevated immune response",
            "Patient XP-2023-0287 (Liver) reports an elevated immune response.",
            false,
            morning(1, 14),
        ),
    ];

    for (title, message, read, timestamp) in notifications {
        repository::insert_notification(
            conn,
            &NewNotification {
                user_id: doctor.id,
                title: title.into(),
                message: message.into(),
                read,
                timestamp,
            },
        )?;
    }
    Ok(notifications.len())
}
