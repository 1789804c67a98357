//! HTTP routes that turn catalog records into PDF responses.
//!
//! Each route performs its catalog calls in sequence, hands the records to the renderer on the
//! blocking pool and streams the finished document back.  Any failure is logged with its full
//! cause chain and collapsed into an opaque `500 Internal Server Error`.

use std::sync::Arc;

use log::{error, info};
use poem::http::StatusCode;
use poem::web::{Data, Path};
use poem::{get, handler, Endpoint, EndpointExt, Response, Route};

use crate::catalog::Catalog;
use crate::config::ServiceConfig;
use crate::error::{error_chain, ServiceError};
use crate::report::ReportRenderer;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Body returned for every failed request.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Everything a request needs, shared read-only between requests.
pub struct AppState {
    config: ServiceConfig,
    catalog: Arc<dyn Catalog>,
    renderer: ReportRenderer,
}

impl AppState {
    pub fn new(config: ServiceConfig, catalog: Arc<dyn Catalog>, renderer: ReportRenderer) -> Self {
        Self {
            config,
            catalog,
            renderer,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Builds the `/movies` and `/movies/:id` routes.
pub fn routes(state: Arc<AppState>) -> impl Endpoint {
    Route::new()
        .at("/movies", get(popular_movies))
        .at("/movies/:id", get(movie_detail))
        .data(state)
}

#[handler]
async fn popular_movies(Data(state): Data<&Arc<AppState>>) -> Response {
    respond("/movies", popular_movies_report(Arc::clone(state)).await)
}

#[handler]
async fn movie_detail(Path(id): Path<String>, Data(state): Data<&Arc<AppState>>) -> Response {
    let route = format!("/movies/{}", id);
    respond(&route, movie_detail_report(Arc::clone(state), id).await)
}

/// Fetches the popular listing and renders it with links back to the detail route.
pub async fn popular_movies_report(state: Arc<AppState>) -> Result<Vec<u8>, ServiceError> {
    let listing = state.catalog.fetch_popular_listing().await?;

    let bytes = tokio::task::spawn_blocking(move || {
        state
            .renderer
            .render_listing(&listing, |id| state.config.movie_link(id))
    })
    .await??;

    Ok(bytes)
}

/// Fetches one movie, then its poster when it has one, and renders the detail report.
pub async fn movie_detail_report(
    state: Arc<AppState>,
    id: String,
) -> Result<Vec<u8>, ServiceError> {
    let item = state.catalog.fetch_item_detail(&id).await?;
    let poster = match item.poster_path() {
        Some(poster_path) => Some(state.catalog.fetch_poster_image(poster_path).await?),
        None => None,
    };

    let bytes = tokio::task::spawn_blocking(move || {
        state.renderer.render_detail(&item, poster.as_deref())
    })
    .await??;

    Ok(bytes)
}

fn respond(route: &str, result: Result<Vec<u8>, ServiceError>) -> Response {
    match result {
        Ok(bytes) => {
            info!("GET {} -> {} byte report", route, bytes.len());
            Response::builder()
                .status(StatusCode::OK)
                .content_type(PDF_CONTENT_TYPE)
                .body(bytes)
        }
        Err(err) => {
            error!("GET {} failed: {}", route, error_chain(&err));
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .content_type("text/plain; charset=utf-8")
                .body(INTERNAL_ERROR_BODY)
        }
    }
}
