//! Service configuration shared by the catalog client and the HTTP layer.

use std::fmt;

/// Base address of the catalog REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Base address of the catalog image CDN.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Resolution tier requested for posters.
pub const DEFAULT_POSTER_SIZE: &str = "w500";

pub const DEFAULT_PUBLIC_HOST: &str = "localhost";

pub const DEFAULT_PORT: u16 = 3000;

/// Immutable settings loaded once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Secret key appended to every catalog API request.
    pub api_key: String,
    pub api_base_url: String,
    pub image_base_url: String,
    pub poster_size: String,
    /// Host name used in the links embedded in listing reports.
    pub public_host: String,
    /// Port the service listens on, also used in embedded links.
    pub port: u16,
}

impl ServiceConfig {
    /// Creates a configuration with the production endpoints and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_owned(),
            poster_size: DEFAULT_POSTER_SIZE.to_owned(),
            public_host: DEFAULT_PUBLIC_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    pub fn with_public_host(mut self, host: impl Into<String>) -> Self {
        self.public_host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Address of the detail report for the movie with the given id.
    pub fn movie_link(&self, id: &str) -> String {
        format!(
            "http://{}:{}/movies/{}",
            self.public_host,
            self.port,
            urlencoding::encode(id)
        )
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("image_base_url", &self.image_base_url)
            .field("poster_size", &self.poster_size)
            .field("public_host", &self.public_host)
            .field("port", &self.port)
            .finish()
    }
}
