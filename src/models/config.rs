//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog resources and how to fetch them
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Search dialog behavior
    #[serde(default)]
    pub search: SearchConfig,

    /// Page rendering and cache pre-warm
    #[serde(default)]
    pub render: RenderConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.user_agent.trim().is_empty() {
            return Err(AppError::validation("catalog.user_agent is empty"));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(AppError::validation("catalog.timeout_secs must be > 0"));
        }
        if self.catalog.resources.is_empty() {
            return Err(AppError::validation("No catalog resources defined"));
        }
        if self.search.page_size == 0 {
            return Err(AppError::validation("search.page_size must be > 0"));
        }
        if self.render.page_size == 0 {
            return Err(AppError::validation("render.page_size must be > 0"));
        }
        if let Some(route) = self
            .render
            .prewarm_routes
            .iter()
            .find(|route| !route.starts_with('/'))
        {
            return Err(AppError::validation(format!(
                "render.prewarm_routes entry '{route}' must start with '/'"
            )));
        }
        Ok(())
    }
}

/// Where the catalog JSON resources live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL the resources are fetched from
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Read resources from this directory instead of over HTTP
    #[serde(default)]
    pub local_dir: Option<String>,

    /// Resource paths, merged in this order
    #[serde(default = "defaults::resources")]
    pub resources: Vec<String>,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            local_dir: None,
            resources: defaults::resources(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Search dialog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Rows revealed per "load more" step
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
        }
    }
}

/// Server-side rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Routes rendered into the cache before any request is served
    #[serde(default = "defaults::prewarm_routes")]
    pub prewarm_routes: Vec<String>,

    /// Rows per rendered page
    #[serde(default = "defaults::render_page_size")]
    pub page_size: usize,

    /// Document title
    #[serde(default = "defaults::title")]
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            prewarm_routes: defaults::prewarm_routes(),
            page_size: defaults::render_page_size(),
            title: defaults::title(),
        }
    }
}

mod defaults {
    // Catalog defaults
    pub fn base_url() -> String {
        "http://localhost:5173".into()
    }
    pub fn resources() -> Vec<String> {
        vec![
            "schedules-majors.json".into(),
            "schedules-liberal-arts.json".into(),
        ]
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; timetable/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Search defaults
    pub fn page_size() -> usize {
        100
    }

    // Render defaults
    pub fn prewarm_routes() -> Vec<String> {
        vec!["/".into(), "/2".into(), "/3".into(), "/4".into()]
    }
    pub fn render_page_size() -> usize {
        50
    }
    pub fn title() -> String {
        "Lecture Catalog".into()
    }
}
