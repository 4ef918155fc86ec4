//! Typed filter predicates for dynamic queries.
//!
//! Filters are collected as a list of `Condition`s first, then rendered once
//! into a `WHERE` clause with positional parameters. Column names are
//! `&'static str` so only compile-time identifiers ever reach the SQL text;
//! every value is bound.

use chrono::NaiveDate;
use rusqlite::types::Value;

use super::DATE_FORMAT;

/// A single SQL condition on a trusted column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = value`
    Eq(&'static str, Value),
    /// `column > date` on a `YYYY-MM-DD` column
    DateAfter(&'static str, NaiveDate),
    /// `column >= date` on a `YYYY-MM-DD` or timestamp column
    OnOrAfter(&'static str, NaiveDate),
}

impl Condition {
    pub fn text_eq(column: &'static str, value: impl Into<String>) -> Self {
        Self::Eq(column, Value::Text(value.into()))
    }

    pub fn int_eq(column: &'static str, value: i64) -> Self {
        Self::Eq(column, Value::Integer(value))
    }

    fn render(&self, index: usize) -> (String, Value) {
        match self {
            Self::Eq(column, value) => (format!("{column} = ?{index}"), value.clone()),
            Self::DateAfter(column, date) => (
                format!("{column} > ?{index}"),
                Value::Text(date.format(DATE_FORMAT).to_string()),
            ),
            Self::OnOrAfter(column, date) => (
                format!("{column} >= ?{index}"),
                Value::Text(date.format(DATE_FORMAT).to_string()),
            ),
        }
    }
}

/// An ordered conjunction of conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicates {
    conditions: Vec<Condition>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add the condition only when present.
    pub fn and_maybe(self, condition: Option<Condition>) -> Self {
        match condition {
            Some(c) => self.and(c),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Render as `" WHERE a = ?1 AND b > ?2"` (empty string when there are no
    /// conditions) plus the bound values in order.
    pub fn where_clause(&self) -> (String, Vec<Value>) {
        if self.conditions.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut parts = Vec::with_capacity(self.conditions.len());
        let mut values = Vec::with_capacity(self.conditions.len());
        for (i, condition) in self.conditions.iter().enumerate() {
            let (sql, value) = condition.render(i + 1);
            parts.push(sql);
            values.push(value);
        }

        (format!(" WHERE {}", parts.join(" AND ")), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_predicates_render_nothing() {
        let (sql, values) = Predicates::new().where_clause();
        assert_eq!(sql, "");
        assert!(values.is_empty());
    }

    #[test]
    fn conditions_are_numbered_in_order() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let predicates = Predicates::new()
            .and(Condition::text_eq("tc.organ_type", "Heart"))
            .and(Condition::DateAfter("md.date", date));

        let (sql, values) = predicates.where_clause();
        assert_eq!(sql, " WHERE tc.organ_type = ?1 AND md.date > ?2");
        assert_eq!(
            values,
            vec![
                Value::Text("Heart".into()),
                Value::Text("2024-03-01".into())
            ]
        );
    }

    #[test]
    fn and_maybe_skips_absent_conditions() {
        let predicates = Predicates::new()
            .and_maybe(None)
            .and_maybe(Some(Condition::int_eq("n.user_id", 7)));
        assert_eq!(predicates.len(), 1);
        let (sql, values) = predicates.where_clause();
        assert_eq!(sql, " WHERE n.user_id = ?1");
        assert_eq!(values, vec![Value::Integer(7)]);
    }

    #[test]
    fn on_or_after_uses_inclusive_comparison() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        let (sql, _) = Predicates::new()
            .and(Condition::OnOrAfter("created_at", date))
            .where_clause();
        assert_eq!(sql, " WHERE created_at >= ?1");
    }

    #[test]
    fn builder_is_value_based() {
        let base = Predicates::new().and(Condition::int_eq("a", 1));
        let extended = base.clone().and(Condition::int_eq("b", 2));
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }
}
