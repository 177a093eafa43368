// src/pipeline/render.rs

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Catalog, RenderConfig};
use crate::render::{CatalogPageRenderer, RenderService};
use crate::services::{CachedPage, RenderCache};

/// Start a render service (pre-warming its cache) and serve `routes` from it.
pub async fn run_render(
    catalog: Arc<Catalog>,
    config: &RenderConfig,
    routes: &[String],
) -> Result<Vec<Arc<CachedPage>>> {
    let renderer = CatalogPageRenderer::from_config(catalog, config)?;
    let service = RenderService::new(
        Arc::new(RenderCache::new()),
        Arc::new(renderer),
        config.prewarm_routes.clone(),
    );

    let outcome = service.start().await;
    if !outcome.failures.is_empty() {
        log::warn!(
            "{} pre-warm routes failed; they will render on first request",
            outcome.failures.len()
        );
    }

    let mut pages = Vec::with_capacity(routes.len());
    for route in routes {
        pages.push(service.handle(route).await?);
    }

    let stats = service.cache().stats();
    log::info!(
        "Render cache: {} hits, {} misses, {} renders",
        stats.hits,
        stats.misses,
        stats.renders
    );
    Ok(pages)
}
