// src/services/parser.rs

//! Schedule string parser.
//!
//! Catalog schedules are compact strings such as `월1~2(공학관 101)<p>수3(공학관 101)`:
//! segments separated by `<p>`, `;` or newlines, each a day label followed by
//! class periods (`3`, `1~3` or `1,2,3`) and an optional room in parentheses.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::models::{Lecture, MAX_PERIOD, ScheduleError, ScheduleSlot, SlotSpec, Weekday};

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p>|;|\r?\n").expect("valid separator pattern"));

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<day>[^0-9(]+?)\s*(?P<hours>[0-9][^(]*?)\s*(?:\((?P<room>.*)\))?$")
        .expect("valid segment pattern")
});

/// Stateless parser for lecture schedule strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleTextParser;

impl ScheduleTextParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw schedule string into one slot per segment.
    ///
    /// Empty or whitespace-only input yields no slots.
    pub fn parse(&self, raw: &str) -> Result<Vec<SlotSpec>, ScheduleError> {
        SEPARATOR
            .split(raw)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(Self::parse_segment)
            .collect()
    }

    /// Parse a lecture's schedule and attach the lecture to every slot.
    pub fn slots_for(&self, lecture: &Arc<Lecture>) -> Result<Vec<ScheduleSlot>, ScheduleError> {
        Ok(self
            .parse(&lecture.schedule)?
            .into_iter()
            .map(|spec| ScheduleSlot::attach(spec, lecture))
            .collect())
    }

    fn parse_segment(segment: &str) -> Result<SlotSpec, ScheduleError> {
        let Some(caps) = SEGMENT.captures(segment) else {
            return Err(Self::diagnose(segment));
        };

        let token = &caps["day"];
        let day = Weekday::from_label(token).ok_or_else(|| ScheduleError::UnknownDay {
            segment: segment.to_string(),
            token: token.to_string(),
        })?;

        let range = Self::parse_hours(&caps["hours"]).map_err(|reason| {
            ScheduleError::MalformedHours {
                segment: segment.to_string(),
                reason,
            }
        })?;

        let room = caps
            .name("room")
            .map(|m| m.as_str().trim().to_string())
            .filter(|room| !room.is_empty());

        Ok(SlotSpec { day, range, room })
    }

    /// Work out why a segment did not match the segment shape.
    fn diagnose(segment: &str) -> ScheduleError {
        let head = segment
            .split(|c: char| c.is_ascii_digit() || c == '(')
            .next()
            .unwrap_or("");
        let token = head.trim();

        if Weekday::from_label(token).is_none() {
            return ScheduleError::UnknownDay {
                segment: segment.to_string(),
                token: token.to_string(),
            };
        }

        let rest = &segment[head.len()..];
        let hours = rest.split('(').next().unwrap_or("").trim();
        let reason = if hours.is_empty() {
            "missing class periods".to_string()
        } else if let Err(reason) = Self::parse_hours(hours) {
            reason
        } else {
            format!("unexpected text after class periods '{hours}'")
        };

        ScheduleError::MalformedHours {
            segment: segment.to_string(),
            reason,
        }
    }

    fn parse_hours(spec: &str) -> Result<Vec<u32>, String> {
        if let Some((start, end)) = spec.split_once('~') {
            let start = Self::parse_period(start)?;
            let end = Self::parse_period(end)?;
            if start > end {
                return Err(format!("range {start}~{end} runs backwards"));
            }
            return Ok((start..=end).collect());
        }

        let periods = spec
            .split(',')
            .map(Self::parse_period)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(pair) = periods.windows(2).find(|pair| pair[1] != pair[0] + 1) {
            return Err(format!(
                "periods {} and {} are not consecutive",
                pair[0], pair[1]
            ));
        }
        Ok(periods)
    }

    fn parse_period(token: &str) -> Result<u32, String> {
        let token = token.trim();
        let period: u32 = token
            .parse()
            .map_err(|_| format!("'{token}' is not a class period"))?;
        if !(1..=MAX_PERIOD).contains(&period) {
            return Err(format!("period {period} is outside 1-{MAX_PERIOD}"));
        }
        Ok(period)
    }
}
