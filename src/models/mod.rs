// src/models/mod.rs

//! Domain models for the timetable application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod lecture;
mod schedule;
mod search;

// Re-export all public types
pub use config::{CatalogConfig, Config, RenderConfig, SearchConfig};
pub use lecture::{Catalog, Lecture};
pub use schedule::{DAY_LABELS, MAX_PERIOD, ScheduleError, ScheduleSlot, SlotSpec, Weekday};
pub use search::{SearchOption, SearchOptionUpdate, SearchTarget};
