// src/pipeline/search.rs

use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Catalog, SearchConfig, SearchOptionUpdate};
use crate::services::SearchSession;

/// Build a search session, apply `updates` in order, then deliver `load_more`
/// "load more" signals.
pub fn run_search(
    catalog: Arc<Catalog>,
    config: &SearchConfig,
    updates: Vec<SearchOptionUpdate>,
    load_more: usize,
) -> Result<SearchSession> {
    let page_size = NonZeroUsize::new(config.page_size)
        .ok_or_else(|| AppError::config("search.page_size must be > 0"))?;
    let mut session = SearchSession::new(catalog, page_size);

    for update in updates {
        session.update(update)?;
    }

    for _ in 0..load_more {
        if !session.advance() {
            break;
        }
    }

    log::info!(
        "{} of {} results visible (page {} of {})",
        session.visible().len(),
        session.result_count(),
        session.page(),
        session.last_page()
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lecture;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            Lecture {
                id: "CS101".to_string(),
                title: "Intro".to_string(),
                grade: 1,
                credits: "3".to_string(),
                major: "CS".to_string(),
                schedule: "Mon1,2".to_string(),
            },
            Lecture {
                id: "CS201".to_string(),
                title: "Algo".to_string(),
                grade: 2,
                credits: "3".to_string(),
                major: "CS".to_string(),
                schedule: "Tue3".to_string(),
            },
        ]))
    }

    #[test]
    fn test_grade_filter_with_single_row_pages() {
        let config = SearchConfig { page_size: 1 };
        let session = run_search(
            catalog(),
            &config,
            vec![SearchOptionUpdate::Grades([1].into())],
            0,
        )
        .unwrap();

        let ids: Vec<_> = session.visible().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["CS101"]);
        assert_eq!(session.last_page(), 1);
    }

    #[test]
    fn test_load_more_stops_at_last_page() {
        let config = SearchConfig { page_size: 1 };
        let session = run_search(catalog(), &config, vec![], 10).unwrap();
        assert_eq!(session.page(), 2);
        assert_eq!(session.visible().len(), 2);
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let config = SearchConfig::default();
        let result = run_search(
            catalog(),
            &config,
            vec![SearchOptionUpdate::Times([0].into())],
            0,
        );
        assert!(result.is_err());
    }
}
