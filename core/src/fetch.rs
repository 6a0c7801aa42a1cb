//! Asset fetching from a directory or an HTTP(S) base URL
//!
//! Startup awaits fetches one at a time; there are no timeouts and an
//! in-flight request is never cancelled.

use std::path::PathBuf;

/// A locator could not be turned into bytes
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to read `{locator}`: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download `{locator}`: {message}")]
    Http { locator: String, message: String },
}

/// Source of asset bytes addressed by relative locators
pub trait AssetFetcher {
    fn fetch(&self, locator: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>>;
}

/// Reads assets below a local directory
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetFetcher for FsFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.root.join(locator);
        tracing::debug!("Reading {}", path.display());
        tokio::fs::read(&path).await.map_err(|source| FetchError::Io {
            locator: locator.to_string(),
            source,
        })
    }
}

/// Downloads assets relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, locator: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            locator.trim_start_matches('/')
        )
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url(locator);
        tracing::debug!("Downloading {}", url);

        let http_error = |e: reqwest::Error| FetchError::Http {
            locator: locator.to_string(),
            message: e.to_string(),
        };
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error)?;
        let bytes = response.bytes().await.map_err(http_error)?;
        Ok(bytes.to_vec())
    }
}

/// Asset root chosen from configuration
#[derive(Debug, Clone)]
pub enum AssetSource {
    Fs(FsFetcher),
    Http(HttpFetcher),
}

impl AssetSource {
    /// `http://` and `https://` roots download, anything else is a directory
    pub fn from_root(root: &str) -> Self {
        if root.starts_with("http://") || root.starts_with("https://") {
            AssetSource::Http(HttpFetcher::new(root))
        } else {
            AssetSource::Fs(FsFetcher::new(root))
        }
    }
}

impl AssetFetcher for AssetSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            AssetSource::Fs(fs) => fs.fetch(locator).await,
            AssetSource::Http(http) => http.fetch(locator).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_source_from_root() {
        assert!(matches!(AssetSource::from_root("assets"), AssetSource::Fs(_)));
        assert!(matches!(
            AssetSource::from_root("https://cdn.example.org/towerd"),
            AssetSource::Http(_)
        ));
    }

    #[test]
    fn test_http_url_joins_single_slash() {
        let http = HttpFetcher::new("http://localhost:8000/");
        assert_eq!(http.url("/audio/enemy-hit.wav"), "http://localhost:8000/audio/enemy-hit.wav");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_fs_fetch_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("audio/a.wav"), b"RIFF").unwrap();

        let fetcher = FsFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("audio/a.wav").await.unwrap(), b"RIFF");

        let err = fetcher.fetch("audio/missing.wav").await.unwrap_err();
        assert!(matches!(err, FetchError::Io { ref locator, .. } if locator == "audio/missing.wav"));
    }
}
