//! Search option value objects.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{MAX_PERIOD, Weekday};
use crate::error::{AppError, Result};

/// Current filter configuration. An empty field imposes no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOption {
    /// Case-insensitive substring of title or course code
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub grades: BTreeSet<u8>,

    #[serde(default)]
    pub days: BTreeSet<Weekday>,

    /// Class periods
    #[serde(default)]
    pub times: BTreeSet<u32>,

    /// Raw major labels, markup included
    #[serde(default)]
    pub majors: BTreeSet<String>,

    /// Matches lectures whose credits string starts with this value.
    #[serde(default)]
    pub credits: Option<u32>,
}

impl SearchOption {
    /// True when no field restricts the catalog.
    pub fn is_unrestricted(&self) -> bool {
        self.query.is_empty()
            && self.grades.is_empty()
            && self.days.is_empty()
            && self.times.is_empty()
            && self.majors.is_empty()
            && self.credits.is_none()
    }

    /// Check field ranges before the option reaches the filter engine.
    pub fn validate(&self) -> Result<()> {
        if let Some(grade) = self.grades.iter().find(|g| !(1..=4).contains(*g)) {
            return Err(AppError::validation(format!(
                "grade {grade} is outside 1-4"
            )));
        }
        if let Some(time) = self.times.iter().find(|t| !(1..=MAX_PERIOD).contains(*t)) {
            return Err(AppError::validation(format!(
                "time {time} is outside 1-{MAX_PERIOD}"
            )));
        }
        Ok(())
    }

    /// Return a copy with one field replaced.
    pub fn with(&self, update: SearchOptionUpdate) -> Self {
        let mut next = self.clone();
        match update {
            SearchOptionUpdate::Query(query) => next.query = query,
            SearchOptionUpdate::Grades(grades) => next.grades = grades,
            SearchOptionUpdate::Days(days) => next.days = days,
            SearchOptionUpdate::Times(times) => next.times = times,
            SearchOptionUpdate::Majors(majors) => next.majors = majors,
            SearchOptionUpdate::Credits(credits) => next.credits = credits,
        }
        next
    }
}

/// Replacement of a single SearchOption field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOptionUpdate {
    Query(String),
    Grades(BTreeSet<u8>),
    Days(BTreeSet<Weekday>),
    Times(BTreeSet<u32>),
    Majors(BTreeSet<String>),
    Credits(Option<u32>),
}

/// Timetable cell a search was opened from.
///
/// Opening a search for a cell presets the day and time filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    pub table_id: String,
    pub day: Option<Weekday>,
    pub time: Option<u32>,
}

impl SearchTarget {
    pub fn table(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            day: None,
            time: None,
        }
    }

    pub fn cell(table_id: impl Into<String>, day: Weekday, time: u32) -> Self {
        Self {
            table_id: table_id.into(),
            day: Some(day),
            time: Some(time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unrestricted() {
        assert!(SearchOption::default().is_unrestricted());
        assert!(SearchOption::default().validate().is_ok());
    }

    #[test]
    fn test_with_replaces_single_field() {
        let option = SearchOption {
            query: "algo".to_string(),
            ..SearchOption::default()
        };
        let next = option.with(SearchOptionUpdate::Credits(Some(3)));

        assert_eq!(next.query, "algo");
        assert_eq!(next.credits, Some(3));
        assert_eq!(option.credits, None);
    }

    #[test]
    fn test_validate_rejects_out_of_range_grade() {
        let option = SearchOption::default().with(SearchOptionUpdate::Grades([0, 2].into()));
        assert!(matches!(option.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_time() {
        let option = SearchOption::default().with(SearchOptionUpdate::Times([25].into()));
        assert!(option.validate().is_err());
    }
}
