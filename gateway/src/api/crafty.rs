use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use common::PanelReport;
use serde::Deserialize;

use super::{AppState, parse_body};
use crate::{error::Error, panel};

#[derive(Debug, Deserialize)]
pub struct CraftyRequest {
    pub api_token: String,
    /// where the panel is hosted, without the api path.
    pub base_url: String,
}

/// combined stats of every server on a crafty panel.
pub async fn crafty(
    State(state): AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PanelReport>, Error> {
    let request: CraftyRequest = parse_body(body)?;
    let api = panel::api_root(&request.base_url).map_err(Error::InvalidUrl)?;

    let report = panel::aggregate(&state.client, &api, &request.api_token).await?;

    Ok(Json(report))
}
