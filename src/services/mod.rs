//! Service layer for the timetable application.
//!
//! This module contains the business logic for:
//! - Schedule string parsing (`ScheduleTextParser`)
//! - Catalog filtering (`FilterEngine`) and paging (`WindowedResultFeed`)
//! - Search dialog state (`SearchSession`) and timetables (`ScheduleBook`)
//! - Catalog loading with request dedup (`CatalogLoader`, `SingleFlight`)
//! - Rendered page memoization (`RenderCache`)

mod book;
mod catalog;
mod feed;
mod filter;
mod parser;
mod render_cache;
mod session;
mod single_flight;

pub use book::{INITIAL_TABLE_ID, ScheduleBook, ScheduleCollection};
pub use catalog::{CatalogLoader, CatalogSource, FileCatalogSource, HttpCatalogSource};
pub use feed::{PAGE_SIZE, WindowedResultFeed};
pub use filter::FilterEngine;
pub use parser::ScheduleTextParser;
pub use render_cache::{CacheStats, CachedPage, PrewarmOutcome, RenderCache};
pub use session::SearchSession;
pub use single_flight::SingleFlight;
