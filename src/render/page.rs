// src/render/page.rs

//! Catalog listing page.
//!
//! Routes look like `/`, `/3` or `/2?q=algo&grade=1&day=월`. The path picks
//! how many pages of results are shown (the state of the search dialog after
//! that many "load more" steps) and the query string builds the search option.

use std::num::NonZeroUsize;
use std::sync::Arc;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Catalog, Lecture, RenderConfig, SearchOption, Weekday};
use crate::render::PageRenderer;
use crate::services::{FilterEngine, ScheduleTextParser, WindowedResultFeed};
use crate::utils::{escape_html, strip_markup};

/// Renders the lecture catalog as a full HTML document.
pub struct CatalogPageRenderer {
    catalog: Arc<Catalog>,
    engine: FilterEngine,
    parser: ScheduleTextParser,
    page_size: NonZeroUsize,
    title: String,
}

impl CatalogPageRenderer {
    pub fn new(catalog: Arc<Catalog>, page_size: NonZeroUsize, title: impl Into<String>) -> Self {
        Self {
            catalog,
            engine: FilterEngine::new(),
            parser: ScheduleTextParser::new(),
            page_size,
            title: title.into(),
        }
    }

    pub fn from_config(catalog: Arc<Catalog>, config: &RenderConfig) -> Result<Self> {
        let page_size = NonZeroUsize::new(config.page_size)
            .ok_or_else(|| AppError::config("render.page_size must be > 0"))?;
        Ok(Self::new(catalog, page_size, &config.title))
    }

    /// Split a route into its page number and search option.
    fn parse_route(route: &str) -> Result<(usize, SearchOption)> {
        let url = Url::parse("http://localhost/")?.join(route)?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let page = match segments.as_slice() {
            [] => 1,
            [page] => page
                .parse::<usize>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| AppError::render(route, "no page at this path"))?,
            _ => return Err(AppError::render(route, "no page at this path")),
        };

        let mut option = SearchOption::default();
        for (key, value) in url.query_pairs() {
            let invalid = || AppError::render(route, format!("invalid {key} '{value}'"));
            match key.as_ref() {
                "q" => option.query = value.into_owned(),
                "grade" => {
                    option.grades.insert(value.parse().map_err(|_| invalid())?);
                }
                "day" => {
                    option
                        .days
                        .insert(Weekday::from_label(&value).ok_or_else(invalid)?);
                }
                "time" => {
                    option.times.insert(value.parse().map_err(|_| invalid())?);
                }
                "major" => {
                    option.majors.insert(value.into_owned());
                }
                "credits" => option.credits = Some(value.parse().map_err(|_| invalid())?),
                _ => log::debug!("Ignoring query parameter {} on {}", key, route),
            }
        }
        option.validate()?;

        Ok((page, option))
    }

    fn render_document(&self, page: usize, option: &SearchOption) -> String {
        let results = self.engine.filter(self.catalog.lectures(), option);
        let feed = WindowedResultFeed::new(self.page_size);
        let page = feed.clamp(page, results.len());
        let visible = feed.visible_at(page, &results);

        let mut rows = String::new();
        for lecture in visible {
            self.render_row(&mut rows, lecture);
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
</head>
<body>
  <div id="root">
    <p class="summary">{count} results, page {page} of {last}</p>
    <table>
      <thead><tr><th>Code</th><th>Grade</th><th>Title</th><th>Credits</th><th>Major</th><th>Schedule</th></tr></thead>
      <tbody>
{rows}      </tbody>
    </table>
  </div>
</body>
</html>
"#,
            title = escape_html(&self.title),
            count = results.len(),
            last = feed.last_page(results.len()).max(1),
        )
    }

    fn render_row(&self, out: &mut String, lecture: &Lecture) {
        out.push_str(&format!(
            "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&lecture.id),
            lecture.grade,
            escape_html(&lecture.title),
            escape_html(&lecture.credits),
            escape_html(&strip_markup(&lecture.major)),
            escape_html(&self.schedule_text(lecture)),
        ));
    }

    /// Parsed slots joined for display, or the stripped raw text if the
    /// schedule does not parse.
    fn schedule_text(&self, lecture: &Lecture) -> String {
        match self.parser.parse(&lecture.schedule) {
            Ok(slots) => slots
                .iter()
                .map(|slot| {
                    let first = slot.range.first().copied().unwrap_or_default();
                    let last = slot.range.last().copied().unwrap_or_default();
                    let hours = if first == last {
                        first.to_string()
                    } else {
                        format!("{first}~{last}")
                    };
                    match &slot.room {
                        Some(room) => format!("{}{} ({})", slot.day, hours, room),
                        None => format!("{}{}", slot.day, hours),
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
            Err(_) => strip_markup(&lecture.schedule),
        }
    }
}

impl PageRenderer for CatalogPageRenderer {
    fn render(&self, route: &str) -> Result<String> {
        let (page, option) = Self::parse_route(route)?;
        Ok(self.render_document(page, &option))
    }
}
