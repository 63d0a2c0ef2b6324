//! reads a single snapshot from a goaccess real-time websocket.

use common::{AnalyticsReport, units::format_size};
use futures::StreamExt;
use reqwest::{Client, Url};
use reqwest_websocket::{CloseCode, Message, RequestBuilderExt, WebSocket};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not connect to {url}")]
    Connect {
        url: Url,
        #[source]
        source: reqwest_websocket::Error,
    },
    #[error("could not read from {url}")]
    Read {
        url: Url,
        #[source]
        source: reqwest_websocket::Error,
    },
    #[error("{url} closed the connection before sending any data")]
    Closed { url: Url },
    #[error("could not parse analytics message")]
    Decode(#[source] serde_json::Error),
}

/// the `general` panel of a goaccess report.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub total_requests: u64,
    pub valid_requests: u64,
    pub failed_requests: u64,
    pub unique_visitors: u64,
    pub unique_files: u64,
    /// in bytes.
    pub bandwidth: u64,
    pub unique_referrers: u64,
    pub unique_not_found: u64,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    general: Metrics,
}

impl From<Metrics> for AnalyticsReport {
    fn from(metrics: Metrics) -> Self {
        Self {
            total_requests: metrics.total_requests,
            valid_requests: metrics.valid_requests,
            failed_requests: metrics.failed_requests,
            unique_visitors: metrics.unique_visitors,
            unique_files: metrics.unique_files,
            // whole megabytes only.
            bandwidth: format_size((metrics.bandwidth / BYTES_PER_MB) as f64),
            unique_referrers: metrics.unique_referrers,
            unique_not_found: metrics.unique_not_found,
        }
    }
}

/// connects to `url`, reads one message and reshapes it into a report.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(client: &Client, url: &Url) -> Result<AnalyticsReport, Error> {
    let message = read_one(client, url).await?;

    let snapshot: Snapshot = serde_json::from_slice(&message).map_err(Error::Decode)?;

    Ok(snapshot.general.into())
}

/// reads the first data message, closing the socket afterwards whatever happened.
async fn read_one(client: &Client, url: &Url) -> Result<Vec<u8>, Error> {
    let connect_failed = |source| Error::Connect {
        url: url.clone(),
        source,
    };

    let mut websocket = client
        .get(url.clone())
        .upgrade()
        .send()
        .await
        .map_err(connect_failed)?
        .into_websocket()
        .await
        .map_err(connect_failed)?;
    tracing::debug!("connected");

    let message = next_data(&mut websocket, url).await;

    if let Err(err) = websocket.close(CloseCode::Normal, None).await {
        tracing::debug!("could not close websocket: {err}");
    }

    message
}

/// skips control frames, goaccess only ever sends text.
async fn next_data(websocket: &mut WebSocket, url: &Url) -> Result<Vec<u8>, Error> {
    while let Some(message) = websocket.next().await {
        let message = message.map_err(|source| Error::Read {
            url: url.clone(),
            source,
        })?;

        match message {
            Message::Text(text) => return Ok(text.into_bytes()),
            Message::Binary(bytes) => return Ok(bytes.to_vec()),
            Message::Close { .. } => break,
            _ => tracing::debug!("skipping control frame"),
        }
    }

    Err(Error::Closed { url: url.clone() })
}
