pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod panel;
pub mod tasks;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};
use reqwest::Url;
use tower_http::trace::TraceLayer;

use crate::config::Config;

pub struct AppState {
    /// shared by every upstream call, panel and analytics alike.
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            // every aggregation releases its connections when it is done.
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { client })
    }
}

/// the gateway's routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/crafty", any(api::crafty))
        .route("/goaccess", any(api::goaccess))
        .route("/ping", get(api::ping))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub trait UrlExt {
    /// appends each of `segments` below this url, percent-encoding them.
    ///
    /// `None` if the url cannot have a path, like `mailto:` urls.
    fn join_segments(&self, segments: &[&str]) -> Option<Url>;
}

impl UrlExt for Url {
    fn join_segments(&self, segments: &[&str]) -> Option<Url> {
        let mut url = self.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(segments);

        Some(url)
    }
}
