use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection};

use super::{format_date, format_timestamp, parse_date, parse_timestamp, to_count};
use crate::db::query::{Condition, Predicates};
use crate::db::DatabaseError;
use crate::models::enums::MonitoringMetric;
use crate::models::{
    DailyAverage, MonitoringFilter, MonitoringPatient, MonitoringRosterRow,
    NewMonitoringDataPoint, NewMonitoringPatient,
};

pub fn insert_monitoring_patient(
    conn: &Connection,
    patient: &NewMonitoringPatient,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO monitoring_patients (patient_id, transplant_date, organ_type,
         organ_function_value, immune_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient.patient_id,
            format_date(&patient.transplant_date),
            patient.organ_type,
            patient.organ_function_value,
            patient.immune_status,
            format_timestamp(&patient.created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert daily samples in a single transaction.
pub fn insert_monitoring_data(
    conn: &Connection,
    points: &[NewMonitoringDataPoint],
) -> Result<usize, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO monitoring_data (patient_id, date, organ_function_value,
             immune_response_value, recovery_index_value, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for point in points {
            stmt.execute(params![
                point.monitoring_patient_id,
                format_date(&point.date),
                point.organ_function_value,
                point.immune_response_value,
                point.recovery_index_value,
                point.notes,
            ])?;
        }
    }
    tx.commit()?;
    Ok(points.len())
}

pub fn list_monitoring_patients(
    conn: &Connection,
) -> Result<Vec<MonitoringPatient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, transplant_date, organ_type, organ_function_value,
                immune_status, created_at
         FROM monitoring_patients ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, f64>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut patients = Vec::new();
    for row in rows {
        let (id, patient_id, transplant_date, organ_type, value, immune_status, created_at) = row?;
        patients.push(MonitoringPatient {
            id,
            patient_id,
            transplant_date: parse_date(&transplant_date)?,
            organ_type,
            organ_function_value: value,
            immune_status,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(patients)
}

pub fn count_monitoring_patients(conn: &Connection) -> Result<u64, DatabaseError> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM monitoring_patients", [], |row| row.get(0))?;
    Ok(to_count(count))
}

fn organ_condition(filter: &MonitoringFilter) -> Option<Condition> {
    filter
        .organ_type
        .as_ref()
        .map(|organ| Condition::text_eq("mp.organ_type", organ.clone()))
}

/// Per-day average of `metric` for samples strictly after `after`, oldest first.
pub fn daily_metric_averages(
    conn: &Connection,
    metric: MonitoringMetric,
    filter: &MonitoringFilter,
    after: NaiveDate,
) -> Result<Vec<DailyAverage>, DatabaseError> {
    let (where_sql, values) = Predicates::new()
        .and(Condition::DateAfter("md.date", after))
        .and_maybe(organ_condition(filter))
        .where_clause();

    let sql = format!(
        "SELECT md.date, AVG(md.{column})
         FROM monitoring_data md
         INNER JOIN monitoring_patients mp ON md.patient_id = mp.id{where_sql}
         GROUP BY md.date
         ORDER BY md.date ASC",
        column = metric.column(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
    })?;

    let mut series = Vec::new();
    for row in rows {
        let (date, value) = row?;
        series.push(DailyAverage {
            date: parse_date(&date)?,
            value,
        });
    }
    Ok(series)
}

/// Monitoring patients joined to their patient record, most recent transplant first.
pub fn list_monitoring_roster(
    conn: &Connection,
    filter: &MonitoringFilter,
) -> Result<Vec<MonitoringRosterRow>, DatabaseError> {
    let (where_sql, values) = Predicates::new()
        .and_maybe(organ_condition(filter))
        .where_clause();

    let sql = format!(
        "SELECT mp.id, p.patient_code, p.name, mp.transplant_date, mp.organ_type,
                mp.organ_function_value, mp.immune_status
         FROM monitoring_patients mp
         INNER JOIN patients p ON mp.patient_id = p.id{where_sql}
         ORDER BY mp.transplant_date DESC, mp.id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, f64>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut roster = Vec::new();
    for row in rows {
        let (id, patient_code, name, transplant_date, organ_type, value, immune_status) = row?;
        roster.push(MonitoringRosterRow {
            id,
            patient_code,
            name,
            transplant_date: parse_date(&transplant_date)?,
            organ_type,
            organ_function_value: value,
            immune_status,
        });
    }
    Ok(roster)
}
