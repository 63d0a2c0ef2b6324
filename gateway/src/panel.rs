//! sums the stats of every server managed by a crafty panel.

use std::fmt;

use common::{
    PanelReport,
    units::{self, format_size, parse_size},
};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::instrument;
use url::ParseError;

use crate::UrlExt;

/// memory reported by servers that have not sent any stats yet.
const NOT_REPORTING: &str = "0";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{api} cannot have a path")]
    NotABase { api: Url },
    #[error("panel request failed")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not parse response from {url}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
    #[error("server {server_id} reported an invalid {field}")]
    Size {
        server_id: String,
        field: &'static str,
        #[source]
        source: units::Error,
    },
}

/// every panel response is wrapped in `{ "status": .., "data": .. }`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    server_id: ServerId,
}

/// older panels use numeric ids, newer ones use uuids.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ServerId {
    Text(String),
    Number(u64),
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(id) => f.write_str(id),
            Self::Number(id) => write!(f, "{id}"),
        }
    }
}

/// stats of a single server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStat {
    /// memory in use, e.g. `"1.2GB"`, or `"0"` if the server is not reporting yet.
    pub mem: String,
    pub world_size: String,
    #[serde(default)]
    pub online: u64,
    #[serde(default)]
    pub max: u64,
    #[serde(default)]
    pub cpu: f32,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub crashed: bool,
}

#[derive(Debug, Default)]
struct Totals {
    /// megabytes.
    mem: f64,
    /// megabytes.
    world_size: f64,
    players: u64,
    max_players: u64,
    cpu: f32,
    running: u64,
    crashed: u64,
}

impl Totals {
    fn add(&mut self, server_id: &str, stat: &ServerStat) -> Result<(), Error> {
        if stat.mem == NOT_REPORTING {
            tracing::debug!("server {server_id} is not reporting, skipping");
            return Ok(());
        }

        let size = |field, value: &str| {
            parse_size(value).map_err(|source| Error::Size {
                server_id: server_id.to_string(),
                field,
                source,
            })
        };
        let mem = size("mem", &stat.mem)?;
        let world_size = size("world_size", &stat.world_size)?;

        self.mem += mem;
        self.world_size += world_size;
        self.players += stat.online;
        self.max_players += stat.max;
        self.cpu += stat.cpu;

        if stat.running {
            self.running += 1;
        }
        if stat.crashed {
            self.crashed += 1;
        }

        Ok(())
    }

    /// `server_total` counts every listed server, reporting or not.
    fn into_report(self, server_total: u64) -> PanelReport {
        PanelReport {
            mem: format_size(self.mem),
            world_size: format_size(self.world_size),
            players: self.players,
            max_players: self.max_players,
            cpu: self.cpu,
            server_running: self.running,
            server_crashed: self.crashed,
            server_total,
            server_offline: server_total.saturating_sub(self.running),
        }
    }
}

/// the api root of a panel hosted at `base_url`.
pub fn api_root(base_url: &str) -> Result<Url, ParseError> {
    Url::parse(&format!("{}/api/v2/", base_url.trim_end_matches('/')))
}

/// fetches the stats of every server at `api`, one after the other, and sums them up.
///
/// any failed request aborts the whole aggregation.
#[instrument(skip_all, fields(api = %api))]
pub async fn aggregate(client: &Client, api: &Url, token: &str) -> Result<PanelReport, Error> {
    let servers: Vec<ServerEntry> = get(client, join(api, &["servers"])?, token).await?;
    tracing::debug!("panel lists {} servers", servers.len());

    let mut totals = Totals::default();
    for server in &servers {
        let server_id = server.server_id.to_string();
        let url = join(api, &["servers", &server_id, "stats"])?;

        let stat: ServerStat = get(client, url, token).await?;
        totals.add(&server_id, &stat)?;
    }

    Ok(totals.into_report(servers.len() as u64))
}

fn join(api: &Url, segments: &[&str]) -> Result<Url, Error> {
    api.join_segments(segments)
        .ok_or_else(|| Error::NotABase { api: api.clone() })
}

/// an authenticated GET, unwrapping the panel's response envelope.
async fn get<T: DeserializeOwned>(client: &Client, url: Url, token: &str) -> Result<T, Error> {
    tracing::debug!("GET {url}");

    let request_failed = |source| Error::Request {
        url: url.clone(),
        source,
    };

    let body = client
        .get(url.clone())
        .bearer_auth(token)
        .send()
        .await
        .and_then(Response::error_for_status)
        .map_err(request_failed)?
        .bytes()
        .await
        .map_err(request_failed)?;

    let envelope: Envelope<T> =
        serde_json::from_slice(&body).map_err(|source| Error::Decode { url, source })?;

    Ok(envelope.data)
}
