use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use common::AnalyticsReport;
use reqwest::Url;
use serde::Deserialize;

use super::{AppState, parse_body};
use crate::{analytics, error::Error};

#[derive(Debug, Deserialize)]
pub struct GoaccessRequest {
    /// the real-time websocket, e.g. `wss://stats.example.com/ws`.
    pub base_url: String,
}

/// a simplified snapshot of goaccess' general stats.
pub async fn goaccess(
    State(state): AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalyticsReport>, Error> {
    let request: GoaccessRequest = parse_body(body)?;
    let url = Url::parse(&request.base_url).map_err(Error::InvalidUrl)?;

    let report = analytics::fetch(&state.client, &url).await?;

    Ok(Json(report))
}
