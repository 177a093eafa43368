// src/pipeline/plan.rs

use crate::error::{AppError, Result};
use crate::models::Catalog;
use crate::services::{INITIAL_TABLE_ID, ScheduleBook};

/// Put the given lectures into a fresh book's first timetable.
///
/// Unknown course codes and unparsable schedules abort the plan.
pub fn run_plan(catalog: &Catalog, lecture_ids: &[String]) -> Result<ScheduleBook> {
    let mut book = ScheduleBook::new();

    for id in lecture_ids {
        let lecture = catalog
            .find(id)
            .ok_or_else(|| AppError::validation(format!("no lecture with id {id}")))?;
        let added = book.add_lecture(INITIAL_TABLE_ID, lecture)?;
        if added == 0 {
            log::warn!("{} has no scheduled time; nothing placed", id);
        }
    }

    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lecture;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Lecture {
                id: "CS101".to_string(),
                title: "Intro".to_string(),
                grade: 1,
                credits: "3".to_string(),
                major: "CS".to_string(),
                schedule: "월1~2<p>수1~2".to_string(),
            },
            Lecture {
                id: "GE001".to_string(),
                title: "Online".to_string(),
                grade: 1,
                credits: "1".to_string(),
                major: "교양".to_string(),
                schedule: String::new(),
            },
        ])
    }

    #[test]
    fn test_plan_places_slots() {
        let book = run_plan(&catalog(), &["CS101".to_string(), "GE001".to_string()]).unwrap();
        assert_eq!(book.get(INITIAL_TABLE_ID).unwrap().slots.len(), 2);
    }

    #[test]
    fn test_plan_rejects_unknown_id() {
        let result = run_plan(&catalog(), &["XX999".to_string()]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
