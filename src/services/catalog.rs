// src/services/catalog.rs

//! Catalog loading.
//!
//! The catalog is published as several JSON arrays of lectures (majors and
//! liberal arts). Each resource is fetched at most once per loader, however
//! many times it is requested, and the results are merged in configured order.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future;

use crate::error::{AppError, Result};
use crate::models::{Catalog, CatalogConfig, Lecture};
use crate::services::SingleFlight;
use crate::utils::{http, resource_url};

/// A place catalog resources can be read from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one resource as a list of lectures.
    async fn fetch(&self, resource: &str) -> Result<Vec<Lecture>>;
}

/// Reads catalog resources over HTTP.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self, resource: &str) -> Result<Vec<Lecture>> {
        let url = resource_url(&self.base_url, resource)?;
        log::debug!("Fetching catalog resource {}", url);
        let body = http::fetch_text(&self.client, url.as_str()).await?;
        serde_json::from_str(&body).map_err(|e| AppError::catalog(resource, e))
    }
}

/// Reads catalog resources from files in a directory.
pub struct FileCatalogSource {
    root_dir: PathBuf,
}

impl FileCatalogSource {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self, resource: &str) -> Result<Vec<Lecture>> {
        let path = self.root_dir.join(resource.trim_start_matches('/'));
        log::debug!("Reading catalog resource {}", path.display());
        let bytes = tokio::fs::read(&path).await?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::catalog(resource, e))
    }
}

/// Loads and merges catalog resources, fetching each one only once.
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    resources: Vec<String>,
    flights: SingleFlight<String, Vec<Lecture>>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>, resources: Vec<String>) -> Self {
        Self {
            source,
            resources,
            flights: SingleFlight::new(),
        }
    }

    /// Build a loader from configuration: local directory if set, HTTP otherwise.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let source: Arc<dyn CatalogSource> = match &config.local_dir {
            Some(dir) => Arc::new(FileCatalogSource::new(dir)),
            None => {
                let client = http::create_async_client(config)?;
                Arc::new(HttpCatalogSource::new(client, &config.base_url))
            }
        };
        Ok(Self::new(source, config.resources.clone()))
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Fetch a single resource through the dedup layer.
    pub async fn fetch(&self, resource: &str) -> Result<Arc<Vec<Lecture>>> {
        self.flights
            .get_or_fetch(resource.to_string(), || self.source.fetch(resource))
            .await
    }

    /// Fetch every configured resource concurrently and merge them in order.
    pub async fn load(&self) -> Result<Catalog> {
        let parts = future::try_join_all(self.resources.iter().map(|r| self.fetch(r))).await?;

        let lectures: Vec<Lecture> = parts
            .iter()
            .flat_map(|part| part.iter().cloned())
            .collect();

        log::info!(
            "Loaded {} lectures from {} resources",
            lectures.len(),
            self.resources.len()
        );
        Ok(Catalog::new(lectures))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;

    use super::*;

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for CountingSource {
        async fn fetch(&self, resource: &str) -> Result<Vec<Lecture>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(vec![Lecture {
                id: format!("{resource}-1"),
                title: resource.to_string(),
                grade: 1,
                credits: "3".to_string(),
                major: "CS".to_string(),
                schedule: String::new(),
            }])
        }
    }

    fn resources() -> Vec<String> {
        vec!["majors.json".to_string(), "liberal-arts.json".to_string()]
    }

    #[tokio::test]
    async fn test_repeated_requests_are_coalesced() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let loader = CatalogLoader::new(source.clone(), resources());

        let results = future::join_all([
            loader.fetch("majors.json"),
            loader.fetch("liberal-arts.json"),
            loader.fetch("majors.json"),
            loader.fetch("liberal-arts.json"),
            loader.fetch("majors.json"),
            loader.fetch("liberal-arts.json"),
        ])
        .await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_merges_in_configured_order() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let loader = CatalogLoader::new(source.clone(), resources());

        let catalog = loader.load().await.unwrap();
        let ids: Vec<_> = catalog.lectures().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["majors.json-1", "liberal-arts.json-1"]);

        loader.load().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_file_source_reads_json() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("majors.json"),
            r#"[{"id":"CS101","title":"Intro","grade":1,"credits":"3","major":"CS","schedule":"Mon1,2"}]"#,
        )
        .unwrap();
        std::fs::write(tmp.path().join("liberal-arts.json"), "[]").unwrap();

        let loader = CatalogLoader::new(Arc::new(FileCatalogSource::new(tmp.path())), resources());
        let catalog = loader.load().await.unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lectures()[0].schedule, "Mon1,2");
    }

    #[tokio::test]
    async fn test_invalid_json_names_resource() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("majors.json"), "{not json").unwrap();

        let source = FileCatalogSource::new(tmp.path());
        let err = source.fetch("majors.json").await.unwrap_err();
        assert!(matches!(err, AppError::Catalog { ref resource, .. } if resource == "majors.json"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error_and_retried() {
        let tmp = TempDir::new().unwrap();
        let loader = CatalogLoader::new(
            Arc::new(FileCatalogSource::new(tmp.path())),
            vec!["majors.json".to_string()],
        );

        assert!(matches!(loader.load().await, Err(AppError::Io(_))));

        std::fs::write(tmp.path().join("majors.json"), "[]").unwrap();
        assert!(loader.load().await.unwrap().is_empty());
    }
}
