//! Server-side rendering of catalog pages.
//!
//! A [`PageRenderer`] turns a route into a complete HTML document. The
//! [`RenderService`] owns the process-wide [`RenderCache`] and is handed to
//! whatever serves requests, so the cache lives from startup to shutdown
//! without being a global.

pub mod page;

use std::sync::Arc;

use crate::error::Result;
use crate::services::{CachedPage, PrewarmOutcome, RenderCache};

pub use page::CatalogPageRenderer;

/// Produces markup for a route.
pub trait PageRenderer: Send + Sync {
    fn render(&self, route: &str) -> Result<String>;
}

impl<F> PageRenderer for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn render(&self, route: &str) -> Result<String> {
        self(route)
    }
}

/// Request-facing rendering with memoized output.
pub struct RenderService {
    cache: Arc<RenderCache>,
    renderer: Arc<dyn PageRenderer>,
    prewarm_routes: Vec<String>,
}

impl RenderService {
    pub fn new(
        cache: Arc<RenderCache>,
        renderer: Arc<dyn PageRenderer>,
        prewarm_routes: Vec<String>,
    ) -> Self {
        Self {
            cache,
            renderer,
            prewarm_routes,
        }
    }

    /// Render the configured routes into the cache. Run before serving.
    pub async fn start(&self) -> PrewarmOutcome {
        self.cache
            .prewarm(&self.prewarm_routes, Arc::clone(&self.renderer))
            .await
    }

    /// Serve a route: the full request path including its query string.
    pub async fn handle(&self, route: &str) -> Result<Arc<CachedPage>> {
        self.cache
            .get_or_render(route, || self.renderer.render(route))
            .await
    }

    pub fn cache(&self) -> &Arc<RenderCache> {
        &self.cache
    }

    pub fn prewarm_routes(&self) -> &[String] {
        &self.prewarm_routes
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingRenderer {
        calls: AtomicUsize,
    }

    impl PageRenderer for CountingRenderer {
        fn render(&self, route: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{route} #{n}"))
        }
    }

    fn service(renderer: Arc<CountingRenderer>) -> RenderService {
        RenderService::new(
            Arc::new(RenderCache::new()),
            renderer,
            vec!["/".to_string(), "/2".to_string()],
        )
    }

    #[tokio::test]
    async fn test_prewarmed_routes_never_render_again() {
        let renderer = Arc::new(CountingRenderer {
            calls: AtomicUsize::new(0),
        });
        let service = service(Arc::clone(&renderer));

        let outcome = service.start().await;
        assert_eq!(outcome.warmed.len(), 2);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 2);

        for _ in 0..3 {
            service.handle("/").await.unwrap();
            service.handle("/2").await.unwrap();
        }
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unwarmed_route_is_filled_lazily() {
        let renderer = Arc::new(CountingRenderer {
            calls: AtomicUsize::new(0),
        });
        let service = service(Arc::clone(&renderer));

        assert!(!service.cache().contains("/9").await);
        let first = service.handle("/9").await.unwrap();
        let second = service.handle("/9").await.unwrap();

        assert_eq!(first.html, "/9 #0");
        assert_eq!(second.html, "/9 #0");
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }
}
