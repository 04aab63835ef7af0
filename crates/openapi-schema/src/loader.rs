//! Loading schema documents from the on-disk cache or their source URL

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{SchemaError, SchemaResult};
use crate::types::SchemaDocument;

/// Bounded wait for a schema fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where one document comes from and where its cached copy lives
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSource {
    /// Short name, used in cache file names and messages
    pub name: String,
    /// URL the document is fetched from
    pub url: String,
    /// Cache file holding the verbatim fetched text
    pub cache_file: PathBuf,
    /// Prefix applied to this document's paths when merging
    pub path_prefix: String,
}

/// Fetches schema documents and keeps the cache files up to date
pub struct SchemaLoader {
    client: reqwest::Client,
}

impl SchemaLoader {
    pub fn new() -> SchemaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| SchemaError::FetchError {
                url: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Load a document from its cache file, fetching it once when the cache
    /// file does not exist yet.
    pub async fn load(&self, source: &SchemaSource) -> SchemaResult<SchemaDocument> {
        if let Some(document) = Self::read_cache(&source.cache_file)? {
            return Ok(document);
        }

        info!(
            "Schema cache not found at {}, fetching from {}",
            source.cache_file.display(),
            source.url
        );
        self.refresh(source).await?;

        Self::read_cache(&source.cache_file)?.ok_or_else(|| {
            SchemaError::InvalidFormat(format!(
                "schema cache {} missing after refresh",
                source.cache_file.display()
            ))
        })
    }

    /// Fetch a document and overwrite its cache file with the verbatim text.
    /// Returns the number of paths in the fetched document.
    pub async fn refresh(&self, source: &SchemaSource) -> SchemaResult<usize> {
        url::Url::parse(&source.url)
            .map_err(|e| SchemaError::InvalidUrl(format!("{}: {}", source.url, e)))?;

        info!("Fetching schema from {}", source.url);

        let response = self
            .client
            .get(&source.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SchemaError::FetchError {
                url: source.url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SchemaError::HttpError {
                status: response.status().as_u16(),
                url: source.url.clone(),
            });
        }

        let content = response.text().await.map_err(|e| SchemaError::FetchError {
            url: source.url.clone(),
            message: e.to_string(),
        })?;

        let endpoint_count = Self::store(&source.url, &source.cache_file, &content)?;
        info!(
            "Saved schema {} to {} ({} endpoints)",
            source.name,
            source.cache_file.display(),
            endpoint_count
        );

        Ok(endpoint_count)
    }

    /// Validate fetched text and write it to `cache_file` unchanged
    fn store(url: &str, cache_file: &Path, content: &str) -> SchemaResult<usize> {
        if content.trim().is_empty() {
            return Err(SchemaError::EmptyResponse(url.to_string()));
        }

        let document = SchemaDocument::parse(content)?;

        if let Some(dir) = cache_file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(cache_file, content)?;

        Ok(document.paths().map(|p| p.len()).unwrap_or(0))
    }

    /// Read a cached document. A missing file is `Ok(None)`; unreadable or
    /// unparseable content is an error.
    pub fn read_cache(cache_file: &Path) -> SchemaResult<Option<SchemaDocument>> {
        let content = match std::fs::read_to_string(cache_file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache file at {}", cache_file.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        SchemaDocument::parse(&content)
            .map(Some)
            .map_err(|e| SchemaError::InvalidCache {
                path: cache_file.display().to_string(),
                message: e.to_string(),
            })
    }
}
