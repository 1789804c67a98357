//! Read access to the remote movie catalog.
//!
//! [`Catalog`] is the seam between the HTTP layer and the upstream service.  The production
//! implementation is [`TmdbClient`]; every call is a single request with no caching, retries or
//! client-side timeout.

mod tmdb;

use async_trait::async_trait;

use crate::model::{CatalogItem, CatalogListing};

pub use tmdb::TmdbClient;

/// Failures talking to the catalog or reading its responses.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced a response (connection, TLS, DNS, ...).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The catalog answered with a non-success status, including `404 Not Found`.
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    /// The response body did not have the expected shape.
    #[error("unexpected response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Read operations offered by the movie catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches the popular-movies listing in the order the catalog returns it.
    async fn fetch_popular_listing(&self) -> Result<CatalogListing, UpstreamError>;

    /// Fetches one movie by its catalog identifier.
    ///
    /// The identifier is forwarded as-is; an unknown identifier surfaces as
    /// [`UpstreamError::Status`] like any other rejected request.
    async fn fetch_item_detail(&self, id: &str) -> Result<CatalogItem, UpstreamError>;

    /// Downloads the poster image stored under `poster_path`.
    async fn fetch_poster_image(&self, poster_path: &str) -> Result<Vec<u8>, UpstreamError>;
}
