// src/services/filter.rs

//! Catalog filter engine.
//!
//! Applies every active predicate of a [`SearchOption`] to the catalog and
//! keeps catalog order. The whole list is recomputed for each option; there
//! is no incremental patching between options.

use std::sync::Arc;

use crate::models::{Lecture, SearchOption, SlotSpec};
use crate::services::ScheduleTextParser;

/// Conjunctive multi-predicate filter over lectures.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine {
    parser: ScheduleTextParser,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self {
            parser: ScheduleTextParser::new(),
        }
    }

    /// Return the lectures that satisfy every active predicate, in catalog order.
    pub fn filter(&self, lectures: &[Arc<Lecture>], option: &SearchOption) -> Vec<Arc<Lecture>> {
        let query = option.query.to_lowercase();
        lectures
            .iter()
            .filter(|lecture| self.matches(lecture, option, &query))
            .cloned()
            .collect()
    }

    /// Check a single lecture. `query` must already be lowercased.
    fn matches(&self, lecture: &Lecture, option: &SearchOption, query: &str) -> bool {
        Self::matches_query(lecture, query)
            && Self::matches_grade(lecture, option)
            && Self::matches_major(lecture, option)
            && Self::matches_credits(lecture, option)
            && self.matches_schedule(lecture, option)
    }

    fn matches_query(lecture: &Lecture, query: &str) -> bool {
        query.is_empty()
            || lecture.title.to_lowercase().contains(query)
            || lecture.id.to_lowercase().contains(query)
    }

    fn matches_grade(lecture: &Lecture, option: &SearchOption) -> bool {
        option.grades.is_empty() || option.grades.contains(&lecture.grade)
    }

    fn matches_major(lecture: &Lecture, option: &SearchOption) -> bool {
        option.majors.is_empty() || option.majors.contains(&lecture.major)
    }

    /// Prefix match on the credits string: `credits = 3` accepts "3" and "3(3)".
    fn matches_credits(lecture: &Lecture, option: &SearchOption) -> bool {
        option
            .credits
            .is_none_or(|credits| lecture.credits.starts_with(&credits.to_string()))
    }

    /// Day and time predicates share one parse of the schedule.
    fn matches_schedule(&self, lecture: &Lecture, option: &SearchOption) -> bool {
        if option.days.is_empty() && option.times.is_empty() {
            return true;
        }

        let slots = self.slots_or_empty(lecture);
        let day_ok = option.days.is_empty() || slots.iter().any(|s| option.days.contains(&s.day));
        let time_ok = option.times.is_empty()
            || slots
                .iter()
                .any(|s| s.range.iter().any(|hour| option.times.contains(hour)));
        day_ok && time_ok
    }

    /// Unparsable schedules count as having no slots so that one bad record
    /// cannot abort a filter pass.
    fn slots_or_empty(&self, lecture: &Lecture) -> Vec<SlotSpec> {
        self.parser.parse(&lecture.schedule).unwrap_or_else(|e| {
            log::debug!("Ignoring schedule of {}: {}", lecture.id, e);
            Vec::new()
        })
    }
}
