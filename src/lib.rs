//! Core entry point for the movie_reports crate.
//!
//! Fetches movie records from a TMDB-style catalog and renders them as PDF reports: a listing of
//! popular movies whose titles link to per-movie reports, and a detail report with the poster.

pub mod builder;
pub mod canvas;
pub mod catalog;
pub mod config;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod links;
pub mod model;
pub mod report;
pub mod richtext;
pub mod server;

pub use builder::{Overflow, PageSize, ReportBuilder};
pub use catalog::{Catalog, TmdbClient, UpstreamError};
pub use config::ServiceConfig;
pub use error::{RenderError, ServiceError};
pub use model::{CatalogItem, CatalogListing, LinkRegion, Rect};
pub use report::{render_detail_report, render_listing_report, ReportRenderer};
