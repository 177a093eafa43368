// src/services/session.rs

//! Search dialog state: the current option, its filtered results and the
//! page counter of the result feed.

use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Catalog, Lecture, SearchOption, SearchOptionUpdate, SearchTarget};
use crate::services::{FilterEngine, WindowedResultFeed};

/// One user's search over a shared catalog.
///
/// Every option change replaces the option, recomputes the filtered list and
/// resets the feed to its first page. Callers should scroll their result view
/// back to the top whenever [`SearchSession::update`] or
/// [`SearchSession::open`] succeeds.
pub struct SearchSession {
    catalog: Arc<Catalog>,
    engine: FilterEngine,
    option: SearchOption,
    results: Vec<Arc<Lecture>>,
    feed: WindowedResultFeed,
    target: Option<SearchTarget>,
}

impl SearchSession {
    pub fn new(catalog: Arc<Catalog>, page_size: NonZeroUsize) -> Self {
        let engine = FilterEngine::new();
        let option = SearchOption::default();
        let results = engine.filter(catalog.lectures(), &option);
        Self {
            catalog,
            engine,
            option,
            results,
            feed: WindowedResultFeed::new(page_size),
            target: None,
        }
    }

    /// Open the search for a timetable, presetting day and time from the cell.
    ///
    /// A cell outside the period range is rejected and the session is unchanged.
    pub fn open(&mut self, target: SearchTarget) -> Result<()> {
        let option = SearchOption {
            days: target.day.into_iter().collect(),
            times: target.time.into_iter().collect(),
            ..self.option.clone()
        };
        option.validate()?;
        self.target = Some(target);
        self.replace(option);
        Ok(())
    }

    /// Forget the target timetable, keeping the option.
    pub fn close(&mut self) -> Option<SearchTarget> {
        self.target.take()
    }

    /// Replace one option field. Invalid values leave the session unchanged.
    pub fn update(&mut self, update: SearchOptionUpdate) -> Result<()> {
        let option = self.option.with(update);
        option.validate()?;
        self.replace(option);
        Ok(())
    }

    /// Handle a "load more" signal. Returns true if more rows became visible.
    pub fn advance(&mut self) -> bool {
        self.feed.advance(self.results.len())
    }

    pub fn visible(&self) -> &[Arc<Lecture>] {
        self.feed.visible(&self.results)
    }

    pub fn results(&self) -> &[Arc<Lecture>] {
        &self.results
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn page(&self) -> usize {
        self.feed.page()
    }

    pub fn last_page(&self) -> usize {
        self.feed.last_page(self.results.len())
    }

    pub fn option(&self) -> &SearchOption {
        &self.option
    }

    pub fn target(&self) -> Option<&SearchTarget> {
        self.target.as_ref()
    }

    /// Majors of the whole catalog, independent of the current option.
    pub fn all_majors(&self) -> Vec<&str> {
        self.catalog.all_majors()
    }

    fn replace(&mut self, option: SearchOption) {
        self.results = self.engine.filter(self.catalog.lectures(), &option);
        self.option = option;
        self.feed.reset();
        log::debug!(
            "Search option changed: {} results, {} pages",
            self.results.len(),
            self.last_page()
        );
    }
}
