//! [`Catalog`] implementation backed by the TMDB REST API.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde::Deserialize;

use super::{Catalog, UpstreamError};
use crate::config::ServiceConfig;
use crate::model::{CatalogItem, CatalogListing};

const USER_AGENT: &str = concat!("movie_reports/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct PopularPage {
    results: Vec<MoviePayload>,
}

#[derive(Debug, Deserialize)]
struct MoviePayload {
    id: MovieId,
    title: String,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MovieId {
    Number(u64),
    Text(String),
}

impl From<MoviePayload> for CatalogItem {
    fn from(payload: MoviePayload) -> Self {
        let id = match payload.id {
            MovieId::Number(id) => id.to_string(),
            MovieId::Text(id) => id,
        };
        CatalogItem::new(id, payload.title, payload.release_date, payload.vote_average)
            .with_poster_path(payload.poster_path)
    }
}

/// HTTP client for the TMDB movie endpoints and image CDN.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    api_base_url: String,
    image_base_url: String,
    poster_size: String,
}

impl TmdbClient {
    /// Creates a client with its own connection pool.
    pub fn new(config: &ServiceConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| UpstreamError::Transport {
                url: config.api_base_url.clone(),
                source,
            })?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a client that shares an existing `reqwest` client.
    pub fn with_client(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_owned(),
            poster_size: config.poster_size.clone(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path)
    }

    /// Address of the poster stored under `poster_path` at the configured size tier.
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.image_base_url,
            self.poster_size,
            poster_path.trim_start_matches('/')
        )
    }

    async fn get(&self, url: &str, authenticated: bool) -> Result<Response, UpstreamError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if authenticated {
            request = request.query(&[("api_key", self.api_key.as_str())]);
        }

        // `without_url` keeps the API key out of error messages.
        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.to_owned(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, UpstreamError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.get(url, true)
            .await?
            .json::<T>()
            .await
            .map_err(|source| UpstreamError::Decode {
                url: url.to_owned(),
                source: source.without_url(),
            })
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn fetch_popular_listing(&self) -> Result<CatalogListing, UpstreamError> {
        let url = self.api_url("movie/popular");
        let page: PopularPage = self.get_json(&url).await?;
        debug!("Catalog returned {} popular movies", page.results.len());
        Ok(page.results.into_iter().map(CatalogItem::from).collect())
    }

    async fn fetch_item_detail(&self, id: &str) -> Result<CatalogItem, UpstreamError> {
        let url = self.api_url(&format!("movie/{}", urlencoding::encode(id)));
        let payload: MoviePayload = self.get_json(&url).await?;
        Ok(payload.into())
    }

    async fn fetch_poster_image(&self, poster_path: &str) -> Result<Vec<u8>, UpstreamError> {
        let url = self.poster_url(poster_path);
        let bytes = self
            .get(&url, false)
            .await?
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.clone(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}
