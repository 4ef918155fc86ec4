use rusqlite::{params, Connection, OptionalExtension};

use super::{format_date, format_timestamp, parse_date, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::{NewPatient, Patient};

pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, DatabaseError> {
    let history_json = serde_json::to_string(&patient.medical_history)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    conn.execute(
        "INSERT INTO patients (patient_code, name, date_of_birth, gender, blood_type,
         medical_history, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            patient.patient_code,
            patient.name,
            format_date(&patient.date_of_birth),
            patient.gender,
            patient.blood_type,
            history_json,
            format_timestamp(&patient.created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Look up a patient by external code (`XP-...`).
pub fn get_patient_by_code(
    conn: &Connection,
    patient_code: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_code, name, date_of_birth, gender, blood_type,
                    medical_history, created_at
             FROM patients WHERE patient_code = ?1",
            params![patient_code],
            |row| {
                Ok(PatientRow {
                    id: row.get(0)?,
                    patient_code: row.get(1)?,
                    name: row.get(2)?,
                    date_of_birth: row.get(3)?,
                    gender: row.get(4)?,
                    blood_type: row.get(5)?,
                    medical_history: row.get(6)?,
                    created_at: row.get(7)?,
                })
            },
        )
        .optional()?;

    row.map(patient_from_row).transpose()
}

struct PatientRow {
    id: i64,
    patient_code: String,
    name: String,
    date_of_birth: String,
    gender: String,
    blood_type: String,
    medical_history: String,
    created_at: String,
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    // Older rows may hold a bare string rather than a JSON array
    let medical_history = serde_json::from_str::<Vec<String>>(&row.medical_history)
        .unwrap_or_else(|_| {
            if row.medical_history.trim().is_empty() {
                Vec::new()
            } else {
                vec![row.medical_history.clone()]
            }
        });

    Ok(Patient {
        id: row.id,
        patient_code: row.patient_code,
        name: row.name,
        date_of_birth: parse_date(&row.date_of_birth)?,
        gender: row.gender,
        blood_type: row.blood_type,
        medical_history,
        created_at: parse_timestamp(&row.created_at)?,
    })
}
