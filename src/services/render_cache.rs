// src/services/render_cache.rs

//! Route-keyed memoization of rendered markup.
//!
//! Keys are the request path with its query string, used verbatim: `/2` and
//! `/2/` are different entries. Entries are never evicted or re-rendered for
//! the life of the cache, even if the catalog behind them changes.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use futures::future;
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, OnceCell};

use crate::error::{AppError, Result};
use crate::render::PageRenderer;

/// Markup stored for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage {
    pub route: String,
    pub html: String,
    /// Hex SHA-256 of `html`
    pub etag: String,
    pub rendered_at: DateTime<Utc>,
}

impl CachedPage {
    fn new(route: &str, html: String) -> Self {
        let etag = hex::encode(Sha256::digest(html.as_bytes()));
        Self {
            route: route.to_string(),
            html,
            etag,
            rendered_at: Utc::now(),
        }
    }
}

/// Counters describing how the cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub renders: u64,
}

/// Result of a pre-warm run.
#[derive(Debug, Default)]
pub struct PrewarmOutcome {
    pub warmed: Vec<String>,
    pub failures: Vec<AppError>,
}

/// Process-lifetime render cache with at most one render in flight per route.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<CachedPage>>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    renders: AtomicU64,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached page for `route`, rendering it on first use.
    ///
    /// A failing `render` stores nothing; the error goes to the caller and
    /// the next request for the route renders again. Concurrent requests for
    /// the same uncached route wait for a single render.
    pub async fn get_or_render<F>(&self, route: &str, render: F) -> Result<Arc<CachedPage>>
    where
        F: FnOnce() -> Result<String>,
    {
        let cell = self.cell(route).await;

        if let Some(page) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("Serving from cache for {}", route);
            return Ok(Arc::clone(page));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = cell
            .get_or_try_init(|| async move {
                self.renders.fetch_add(1, Ordering::Relaxed);
                log::debug!("Rendering {}", route);
                render().map(|html| Arc::new(CachedPage::new(route, html)))
            })
            .await
            .map(Arc::clone);

        if result.is_err() {
            self.discard_empty(route, &cell).await;
        }
        result
    }

    /// Remove the entry for `route` if it is still `cell` and nothing filled it.
    async fn discard_empty(&self, route: &str, cell: &Arc<OnceCell<Arc<CachedPage>>>) {
        let mut entries = self.entries.lock().await;
        let stale = entries
            .get(route)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && !current.initialized());
        if stale {
            entries.remove(route);
        }
    }

    /// Render every route concurrently before requests are served.
    ///
    /// Routes are distinct keys, so the tasks never contend for an entry.
    /// Failures are collected and logged; the other routes still warm.
    pub async fn prewarm(
        self: &Arc<Self>,
        routes: &[String],
        renderer: Arc<dyn PageRenderer>,
    ) -> PrewarmOutcome {
        let tasks = routes.iter().cloned().map(|route| {
            let cache = Arc::clone(self);
            let renderer = Arc::clone(&renderer);
            tokio::spawn(async move {
                let result = cache
                    .get_or_render(&route, || renderer.render(&route))
                    .await
                    .map(|_| ());
                (route, result)
            })
        });

        let mut outcome = PrewarmOutcome::default();
        for (joined, route) in future::join_all(tasks).await.into_iter().zip(routes) {
            match joined {
                Ok((route, Ok(()))) => outcome.warmed.push(route),
                Ok((route, Err(error))) => {
                    log::warn!("Failed to pre-render {}: {}", route, error);
                    outcome.failures.push(error);
                }
                Err(error) => {
                    log::warn!("Pre-render task for {} aborted: {}", route, error);
                    outcome.failures.push(AppError::render(route.as_str(), error));
                }
            }
        }

        log::info!(
            "Pre-warmed {} of {} routes",
            outcome.warmed.len(),
            routes.len()
        );
        outcome
    }

    /// Whether a rendered page is stored for `route`.
    pub async fn contains(&self, route: &str) -> bool {
        self.entries
            .lock()
            .await
            .get(route)
            .is_some_and(|cell| cell.initialized())
    }

    /// Stored page for `route`, without rendering.
    pub async fn get(&self, route: &str) -> Option<Arc<CachedPage>> {
        self.entries
            .lock()
            .await
            .get(route)
            .and_then(|cell| cell.get().cloned())
    }

    /// Number of rendered pages stored.
    pub async fn len(&self) -> usize {
        self.entries
            .lock()
            .await
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            renders: self.renders.load(Ordering::Relaxed),
        }
    }

    async fn cell(&self, route: &str) -> Arc<OnceCell<Arc<CachedPage>>> {
        let mut entries = self.entries.lock().await;
        Arc::clone(entries.entry(route.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_miss_renders_once_then_hits() {
        let cache = RenderCache::new();

        let first = cache
            .get_or_render("/x", || Ok("<p>one</p>".to_string()))
            .await
            .unwrap();
        assert_eq!(first.html, "<p>one</p>");

        let second = cache
            .get_or_render("/x", || Ok("<p>two</p>".to_string()))
            .await
            .unwrap();
        assert_eq!(second.html, "<p>one</p>");
        assert!(Arc::ptr_eq(&first, &second));

        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                renders: 1
            }
        );
    }

    #[tokio::test]
    async fn test_hit_does_not_invoke_render() {
        let cache = RenderCache::new();
        cache.get_or_render("/x", || Ok("a".into())).await.unwrap();

        let page = cache
            .get_or_render("/x", || panic!("render must not run on a hit"))
            .await
            .unwrap();
        assert_eq!(page.html, "a");
    }

    #[tokio::test]
    async fn test_keys_are_not_normalized() {
        let cache = RenderCache::new();
        cache.get_or_render("/2", || Ok("a".into())).await.unwrap();
        cache.get_or_render("/2/", || Ok("b".into())).await.unwrap();
        cache.get_or_render("/2?q=x", || Ok("c".into())).await.unwrap();

        assert_eq!(cache.len().await, 3);
        assert_eq!(cache.get("/2/").await.unwrap().html, "b");
    }

    #[tokio::test]
    async fn test_failed_render_is_not_cached() {
        let cache = RenderCache::new();

        let err = cache
            .get_or_render("/broken", || Err(AppError::render("/broken", "boom")))
            .await;
        assert!(matches!(err, Err(AppError::Render { .. })));
        assert!(!cache.contains("/broken").await);

        let page = cache
            .get_or_render("/broken", || Ok("fixed".into()))
            .await
            .unwrap();
        assert_eq!(page.html, "fixed");
        assert_eq!(cache.stats().renders, 2);
    }

    #[tokio::test]
    async fn test_failed_renders_leave_no_entries() {
        let cache = RenderCache::new();

        for i in 0..100 {
            let route = format!("/about?x={i}");
            let result = cache
                .get_or_render(&route, || Err(AppError::render(route.as_str(), "no page")))
                .await;
            assert!(result.is_err());
        }

        assert_eq!(cache.entries.lock().await.len(), 0);
        assert!(cache.is_empty().await);

        cache.get_or_render("/", || Ok("home".into())).await.unwrap();
        assert_eq!(cache.entries.lock().await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_render_once() {
        let cache = Arc::new(RenderCache::new());
        let renders = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let renders = Arc::clone(&renders);
                tokio::spawn(async move {
                    cache
                        .get_or_render("/slow", || {
                            renders.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(20));
                            Ok("slow".to_string())
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();

        for page in future::join_all(tasks).await {
            assert_eq!(page.unwrap().html, "slow");
        }
        assert_eq!(renders.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prewarm_populates_every_route() {
        let cache = Arc::new(RenderCache::new());
        let routes: Vec<String> = ["/", "/2", "/3", "/4"].map(String::from).into();
        let renderer: Arc<dyn PageRenderer> =
            Arc::new(|route: &str| -> Result<String> { Ok(format!("page {route}")) });

        let outcome = cache.prewarm(&routes, renderer).await;
        assert_eq!(outcome.warmed.len(), 4);
        assert!(outcome.failures.is_empty());

        for route in &routes {
            assert!(cache.contains(route).await);
            let page = cache
                .get_or_render(route, || panic!("pre-warmed route rendered again"))
                .await
                .unwrap();
            assert_eq!(page.html, format!("page {route}"));
        }
        assert_eq!(cache.stats().renders, 4);
    }

    #[tokio::test]
    async fn test_prewarm_reports_failures() {
        let cache = Arc::new(RenderCache::new());
        let routes = vec!["/".to_string(), "/bad".to_string()];
        let renderer: Arc<dyn PageRenderer> = Arc::new(|route: &str| -> Result<String> {
            if route == "/bad" {
                Err(AppError::render(route, "unknown route"))
            } else {
                Ok("ok".to_string())
            }
        });

        let outcome = cache.prewarm(&routes, renderer).await;
        assert_eq!(outcome.warmed, vec!["/".to_string()]);
        assert_eq!(outcome.failures.len(), 1);
        assert!(!cache.contains("/bad").await);
    }

    #[test]
    fn test_etag_is_sha256_of_markup() {
        let page = CachedPage::new("/", "abc".to_string());
        assert_eq!(
            page.etag,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
