type AppState = axum::extract::State<std::sync::Arc<crate::AppState>>;

mod crafty;
pub use crafty::crafty;

mod goaccess;
pub use goaccess::goaccess;

mod ping;
pub use ping::ping;

use axum::{body::Bytes, extract::rejection::BytesRejection};
use serde::de::DeserializeOwned;

use crate::error::Error;

/// parses a json body, whatever its content type.
fn parse_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, Error> {
    let body = body.map_err(Error::ReadBody)?;
    serde_json::from_slice(&body).map_err(Error::InvalidJson)
}
