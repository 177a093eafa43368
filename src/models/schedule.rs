//! Weekday labels and parsed schedule slots.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Lecture;

/// Highest class period that can appear in a schedule string.
pub const MAX_PERIOD: u32 = 24;

/// Day labels offered by the day filter, in week order.
pub const DAY_LABELS: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Day of a schedule slot.
///
/// Source data uses the Korean single-character labels; the English
/// abbreviations are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "월", alias = "Mon")]
    Mon,
    #[serde(rename = "화", alias = "Tue")]
    Tue,
    #[serde(rename = "수", alias = "Wed")]
    Wed,
    #[serde(rename = "목", alias = "Thu")]
    Thu,
    #[serde(rename = "금", alias = "Fri")]
    Fri,
    #[serde(rename = "토", alias = "Sat")]
    Sat,
    #[serde(rename = "일", alias = "Sun")]
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Label as it appears in the catalog data.
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Mon => "월",
            Weekday::Tue => "화",
            Weekday::Wed => "수",
            Weekday::Thu => "목",
            Weekday::Fri => "금",
            Weekday::Sat => "토",
            Weekday::Sun => "일",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Resolve a day token. Matching is exact: `"mon"` is not a label.
    pub fn from_label(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|day| day.label() == token || day.abbrev() == token)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure to parse one segment of a schedule string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("unknown day '{token}' in segment '{segment}'")]
    UnknownDay { segment: String, token: String },

    #[error("malformed hours in segment '{segment}': {reason}")]
    MalformedHours { segment: String, reason: String },
}

impl ScheduleError {
    /// The segment that failed to parse.
    pub fn segment(&self) -> &str {
        match self {
            ScheduleError::UnknownDay { segment, .. } => segment,
            ScheduleError::MalformedHours { segment, .. } => segment,
        }
    }
}

/// One parsed `(day, hours)` segment, not yet attached to a lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSpec {
    pub day: Weekday,

    /// Consecutive class periods, ascending, never empty
    pub range: Vec<u32>,

    /// Room text found in parentheses after the hours
    pub room: Option<String>,
}

impl SlotSpec {
    pub fn covers(&self, hour: u32) -> bool {
        self.range.contains(&hour)
    }
}

/// A slot occupied by a lecture in a timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub day: Weekday,
    pub range: Vec<u32>,
    pub room: Option<String>,
    pub lecture: Arc<Lecture>,
}

impl ScheduleSlot {
    pub(crate) fn attach(spec: SlotSpec, lecture: &Arc<Lecture>) -> Self {
        Self {
            day: spec.day,
            range: spec.range,
            room: spec.room,
            lecture: Arc::clone(lecture),
        }
    }

    pub fn covers(&self, hour: u32) -> bool {
        self.range.contains(&hour)
    }
}
