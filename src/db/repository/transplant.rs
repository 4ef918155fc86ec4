use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::{format_timestamp, parse_timestamp, to_count};
use crate::db::query::{Condition, Predicates};
use crate::db::DatabaseError;
use crate::models::enums::CaseStatus;
use crate::models::{
    to_rfc3339, NewTransplantCase, PageRequest, TransplantCase, TransplantCaseFilter,
    TransplantCaseSummary,
};

pub fn insert_transplant_case(
    conn: &Connection,
    case: &NewTransplantCase,
) -> Result<i64, DatabaseError> {
    if !(0.0..=100.0).contains(&case.compatibility_score) {
        return Err(DatabaseError::ConstraintViolation(format!(
            "compatibility_score {} outside 0..=100",
            case.compatibility_score
        )));
    }
    if case.completed_at.is_some() && !case.status.is_terminal() {
        return Err(DatabaseError::ConstraintViolation(format!(
            "completed_at set on non-terminal status '{}'",
            case.status.as_str()
        )));
    }

    conn.execute(
        "INSERT INTO transplant_cases (patient_id, organ_type, compatibility_score, status,
         successful, created_at, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            case.patient_id,
            case.organ_type,
            case.compatibility_score,
            case.status.as_str(),
            case.successful,
            format_timestamp(&case.created_at),
            case.completed_at.as_ref().map(format_timestamp),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_transplant_case(
    conn: &Connection,
    id: i64,
) -> Result<Option<TransplantCase>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, organ_type, compatibility_score, status, successful,
                    created_at, completed_at
             FROM transplant_cases WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, bool>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, Option<String>>(7)?,
                ))
            },
        )
        .optional()?;

    let Some((id, patient_id, organ_type, score, status, successful, created_at, completed_at)) =
        row
    else {
        return Ok(None);
    };

    Ok(Some(TransplantCase {
        id,
        patient_id,
        organ_type,
        compatibility_score: score,
        status: CaseStatus::from_str(&status)?,
        successful,
        created_at: parse_timestamp(&created_at)?,
        completed_at: completed_at.as_deref().map(parse_timestamp).transpose()?,
    }))
}

fn case_predicates(filter: &TransplantCaseFilter) -> Predicates {
    Predicates::new()
        .and_maybe(
            filter
                .organ_type
                .as_ref()
                .map(|organ| Condition::text_eq("tc.organ_type", organ.clone())),
        )
        .and_maybe(
            filter
                .status
                .map(|status| Condition::text_eq("tc.status", status.as_str())),
        )
}

/// One page of cases joined to their patients, newest first. `id` breaks ties
/// on `created_at` so pages never overlap.
pub fn list_transplant_cases(
    conn: &Connection,
    filter: &TransplantCaseFilter,
    page: &PageRequest,
) -> Result<Vec<TransplantCaseSummary>, DatabaseError> {
    let (where_sql, mut values) = case_predicates(filter).where_clause();
    let limit_idx = values.len() + 1;
    let offset_idx = values.len() + 2;
    values.push(Value::Integer(i64::from(page.limit())));
    values.push(Value::Integer(
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    ));

    let sql = format!(
        "SELECT tc.id, p.patient_code, p.name, tc.organ_type, tc.compatibility_score,
                tc.status, tc.created_at
         FROM transplant_cases tc
         INNER JOIN patients p ON tc.patient_id = p.id{where_sql}
         ORDER BY tc.created_at DESC, tc.id DESC
         LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, f64>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut cases = Vec::new();
    for row in rows {
        let (id, patient_code, name, organ_type, score, status, created_at) = row?;
        cases.push(TransplantCaseSummary {
            id: id.to_string(),
            patient_id: patient_code,
            name,
            organ_type,
            compatibility_score: score,
            status,
            created_at: to_rfc3339(&parse_timestamp(&created_at)?),
        });
    }
    Ok(cases)
}

/// Total cases matching the filter, ignoring pagination.
pub fn count_transplant_cases(
    conn: &Connection,
    filter: &TransplantCaseFilter,
) -> Result<u64, DatabaseError> {
    let (where_sql, values) = case_predicates(filter).where_clause();
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM transplant_cases tc{where_sql}"),
        params_from_iter(values.iter()),
        |row| row.get(0),
    )?;
    Ok(to_count(count))
}

/// Completed-case outcome counts for cases created on or after `since`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletedOutcomes {
    pub completed: u64,
    pub successful: u64,
}

pub fn completed_outcomes_since(
    conn: &Connection,
    since: NaiveDate,
) -> Result<CompletedOutcomes, DatabaseError> {
    let (where_sql, values) = Predicates::new()
        .and(Condition::text_eq("tc.status", CaseStatus::Completed.as_str()))
        .and(Condition::OnOrAfter("tc.created_at", since))
        .where_clause();

    let (completed, successful): (i64, i64) = conn.query_row(
        &format!(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN tc.successful THEN 1 ELSE 0 END), 0)
             FROM transplant_cases tc{where_sql}"
        ),
        params_from_iter(values.iter()),
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(CompletedOutcomes {
        completed: to_count(completed),
        successful: to_count(successful),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::tests::{case_at, seed_patient, test_db, ts};

    #[test]
    fn rejects_score_out_of_range() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "XP-1");
        let mut case = case_at(patient_id, "Heart", "2024-01-01 00:00:00");
        case.compatibility_score = 100.5;
        assert!(matches!(
            insert_transplant_case(&conn, &case),
            Err(DatabaseError::ConstraintViolation(_))
        ));
        case.compatibility_score = -1.0;
        assert!(insert_transplant_case(&conn, &case).is_err());
    }

    #[test]
    fn rejects_completed_at_on_open_case() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "XP-1");
        let mut case = case_at(patient_id, "Heart", "2024-01-01 00:00:00");
        case.completed_at = Some(ts("2024-02-01 00:00:00"));
        assert!(insert_transplant_case(&conn, &case).is_err());

        case.status = CaseStatus::Completed;
        let id = insert_transplant_case(&conn, &case).unwrap();
        let stored = get_transplant_case(&conn, id).unwrap().unwrap();
        assert_eq!(stored.status, CaseStatus::Completed);
        assert_eq!(stored.completed_at, Some(ts("2024-02-01 00:00:00")));
    }

    #[test]
    fn rejects_unknown_patient() {
        let conn = test_db();
        let case = case_at(999, "Heart", "2024-01-01 00:00:00");
        assert!(insert_transplant_case(&conn, &case).is_err());
    }

    #[test]
    fn missing_case_is_none() {
        let conn = test_db();
        assert!(get_transplant_case(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn ties_on_created_at_are_broken_by_id() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "XP-1");
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(
                insert_transplant_case(&conn, &case_at(patient_id, "Heart", "2024-01-01 00:00:00"))
                    .unwrap(),
            );
        }

        let filter = TransplantCaseFilter::default();
        let first = list_transplant_cases(&conn, &filter, &PageRequest::new(1, 2).unwrap()).unwrap();
        let second = list_transplant_cases(&conn, &filter, &PageRequest::new(2, 2).unwrap()).unwrap();
        let third = list_transplant_cases(&conn, &filter, &PageRequest::new(3, 2).unwrap()).unwrap();

        let seen: Vec<String> = first
            .iter()
            .chain(second.iter())
            .chain(third.iter())
            .map(|c| c.id.clone())
            .collect();
        let expected: Vec<String> = ids.iter().rev().map(|id| id.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn status_filter_narrows_count() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "XP-1");
        insert_transplant_case(&conn, &case_at(patient_id, "Heart", "2024-01-01 00:00:00")).unwrap();
        let mut ready = case_at(patient_id, "Liver", "2024-01-02 00:00:00");
        ready.status = CaseStatus::ReadyForSurgery;
        insert_transplant_case(&conn, &ready).unwrap();

        let pending = TransplantCaseFilter {
            status: Some(CaseStatus::PendingReview),
            ..Default::default()
        };
        assert_eq!(count_transplant_cases(&conn, &pending).unwrap(), 1);
        assert_eq!(
            count_transplant_cases(&conn, &TransplantCaseFilter::default()).unwrap(),
            2
        );
    }

    #[test]
    fn completed_outcomes_respect_window() {
        let conn = test_db();
        let patient_id = seed_patient(&conn, "XP-1");

        let mut recent_success = case_at(patient_id, "Heart", "2024-05-01 09:00:00");
        recent_success.status = CaseStatus::Completed;
        recent_success.successful = true;
        insert_transplant_case(&conn, &recent_success).unwrap();

        let mut recent_failure = case_at(patient_id, "Kidney", "2024-04-01 09:00:00");
        recent_failure.status = CaseStatus::Completed;
        insert_transplant_case(&conn, &recent_failure).unwrap();

        let mut old_success = case_at(patient_id, "Liver", "2022-01-01 09:00:00");
        old_success.status = CaseStatus::Completed;
        old_success.successful = true;
        insert_transplant_case(&conn, &old_success).unwrap();

        let since = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let outcomes = completed_outcomes_since(&conn, since).unwrap();
        assert_eq!(
            outcomes,
            CompletedOutcomes {
                completed: 2,
                successful: 1
            }
        );
    }
}
