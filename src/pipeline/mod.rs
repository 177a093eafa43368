//! Pipeline entry points for timetable operations.
//!
//! - `load_catalog`: Fetch and merge the configured catalog resources
//! - `run_search`: Apply search option updates and page through results
//! - `run_plan`: Put lectures into a timetable
//! - `run_render`: Pre-warm the render cache and serve routes from it

pub mod plan;
pub mod render;
pub mod search;

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Catalog, CatalogConfig};
use crate::services::CatalogLoader;

pub use plan::run_plan;
pub use render::run_render;
pub use search::run_search;

/// Load the working catalog described by the configuration.
pub async fn load_catalog(config: &CatalogConfig) -> Result<Arc<Catalog>> {
    let loader = CatalogLoader::from_config(config)?;
    log::info!(
        "Loading catalog from {}",
        config.local_dir.as_deref().unwrap_or(&config.base_url)
    );
    Ok(Arc::new(loader.load().await?))
}
