//! Fragment and stylesheet fetching.
//!
//! Fetches are the only suspension points of a patch cycle.

use std::future::Future;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url for `{path}`: {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request for `{path}` failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("`{path}` returned status {status}")]
    Status { path: String, status: u16 },
}

/// Fetch the rendered body for a server path.
pub trait Fetch {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// `reqwest`-backed fetcher rooted at the dev server origin.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: url::Url,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let base = url::Url::parse(base).map_err(|source| FetchError::Url {
            path: base.to_string(),
            source,
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn resolve(&self, path: &str) -> Result<url::Url, FetchError> {
        self.base.join(path).map_err(|source| FetchError::Url {
            path: path.to_string(),
            source,
        })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        let http_err = |source| FetchError::Http {
            path: path.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(http_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_origin() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:3000/app/").unwrap();
        assert_eq!(
            fetcher.resolve("/card").unwrap().as_str(),
            "http://127.0.0.1:3000/card"
        );
        assert_eq!(
            fetcher.resolve("/main.css").unwrap().as_str(),
            "http://127.0.0.1:3000/main.css"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            HttpFetcher::new("not a url"),
            Err(FetchError::Url { .. })
        ));
    }
}
