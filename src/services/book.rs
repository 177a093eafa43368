// src/services/book.rs

//! Timetable collections.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Lecture, ScheduleSlot, Weekday};
use crate::services::ScheduleTextParser;

/// Id of the timetable every new book starts with.
pub const INITIAL_TABLE_ID: &str = "schedule-1";

/// One named timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCollection {
    pub id: String,
    pub slots: Vec<ScheduleSlot>,
}

/// Ordered set of timetables, in creation order.
#[derive(Debug, Clone)]
pub struct ScheduleBook {
    tables: Vec<ScheduleCollection>,
    parser: ScheduleTextParser,
}

impl ScheduleBook {
    /// A book holding one empty timetable.
    pub fn new() -> Self {
        Self {
            tables: vec![ScheduleCollection {
                id: INITIAL_TABLE_ID.to_string(),
                slots: Vec::new(),
            }],
            parser: ScheduleTextParser::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|table| table.id.as_str())
    }

    pub fn tables(&self) -> &[ScheduleCollection] {
        &self.tables
    }

    pub fn get(&self, table_id: &str) -> Option<&ScheduleCollection> {
        self.tables.iter().find(|table| table.id == table_id)
    }

    /// Whether removing a table would still leave at least one.
    pub fn can_remove(&self) -> bool {
        self.tables.len() > 1
    }

    /// Append every slot of `lecture` to a timetable.
    ///
    /// Nothing is added when the lecture's schedule does not parse.
    pub fn add_lecture(&mut self, table_id: &str, lecture: &Arc<Lecture>) -> Result<usize> {
        let slots = self.parser.slots_for(lecture)?;
        let table = self.table_mut(table_id)?;
        let added = slots.len();
        table.slots.extend(slots);
        log::debug!("Added {} ({} slots) to {}", lecture.id, added, table_id);
        Ok(added)
    }

    /// Drop the slots of a timetable that occupy `hour` on `day`.
    pub fn remove_slot(&mut self, table_id: &str, day: Weekday, hour: u32) -> Result<usize> {
        let table = self.table_mut(table_id)?;
        let before = table.slots.len();
        table
            .slots
            .retain(|slot| slot.day != day || !slot.covers(hour));
        Ok(before - table.slots.len())
    }

    /// Copy a timetable under a fresh id and return that id.
    pub fn duplicate(&mut self, table_id: &str) -> Result<String> {
        let slots = self
            .get(table_id)
            .ok_or_else(|| AppError::UnknownTable(table_id.to_string()))?
            .slots
            .clone();
        let id = self.next_id();
        self.tables.push(ScheduleCollection {
            id: id.clone(),
            slots,
        });
        Ok(id)
    }

    /// Remove a timetable.
    ///
    /// There is no guard against removing the last one: callers that must
    /// keep a timetable check [`ScheduleBook::can_remove`] first.
    pub fn remove(&mut self, table_id: &str) -> Result<ScheduleCollection> {
        let index = self
            .tables
            .iter()
            .position(|table| table.id == table_id)
            .ok_or_else(|| AppError::UnknownTable(table_id.to_string()))?;
        Ok(self.tables.remove(index))
    }

    fn table_mut(&mut self, table_id: &str) -> Result<&mut ScheduleCollection> {
        self.tables
            .iter_mut()
            .find(|table| table.id == table_id)
            .ok_or_else(|| AppError::UnknownTable(table_id.to_string()))
    }

    /// `schedule-<unix millis>`, suffixed when that id is already taken.
    fn next_id(&self) -> String {
        let base = format!("schedule-{}", Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while self.get(&id).is_some() {
            n += 1;
            id = format!("{base}-{n}");
        }
        id
    }
}

impl Default for ScheduleBook {
    fn default() -> Self {
        Self::new()
    }
}
