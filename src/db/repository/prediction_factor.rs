use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use super::{format_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::PredictionFactor;

pub fn insert_prediction_factor(
    conn: &Connection,
    name: &str,
    importance: f64,
    created_at: &NaiveDateTime,
) -> Result<i64, DatabaseError> {
    if !(0.0..=100.0).contains(&importance) {
        return Err(DatabaseError::ConstraintViolation(format!(
            "importance {importance} outside 0..=100"
        )));
    }
    conn.execute(
        "INSERT INTO prediction_factors (name, importance, created_at) VALUES (?1, ?2, ?3)",
        params![name, importance, format_timestamp(created_at)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All factors, most important first.
pub fn list_prediction_factors(
    conn: &Connection,
) -> Result<Vec<PredictionFactor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, importance, created_at
         FROM prediction_factors ORDER BY importance DESC, id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut factors = Vec::new();
    for row in rows {
        let (id, name, importance, created_at) = row?;
        factors.push(PredictionFactor {
            id,
            name,
            importance,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(factors)
}
