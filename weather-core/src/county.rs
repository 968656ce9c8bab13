//! County catalog: remote list, cached list, bundled list, in that order.
//!
//! The remote document may also carry an API key, which replaces the stored
//! one when it is not blank.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{config::Config, model::County};

const BUNDLED_COUNTIES: &str = include_str!("../assets/counties.json");

/// Where a resolved county list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountySource {
    Remote,
    Cached,
    Bundled,
}

/// The county list shipped with the binary.
pub fn bundled_counties() -> Vec<County> {
    serde_json::from_str(BUNDLED_COUNTIES).unwrap_or_else(|err| {
        tracing::error!(error = %err, "bundled county list is malformed");
        vec![County::default()]
    })
}

/// Document served at `counties_url`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, alias = "apiKey")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub version: Option<i64>,

    #[serde(default, rename = "updatedAt", alias = "updated_at")]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub counties: Vec<County>,
}

// A bare array is accepted as a document with counties only.
#[derive(Deserialize)]
#[serde(untagged)]
enum RemoteDocument {
    List(Vec<County>),
    Envelope(RemoteConfig),
}

impl From<RemoteDocument> for RemoteConfig {
    fn from(doc: RemoteDocument) -> Self {
        match doc {
            RemoteDocument::List(counties) => RemoteConfig { counties, ..RemoteConfig::default() },
            RemoteDocument::Envelope(config) => config,
        }
    }
}

pub fn parse_remote_config(body: &str) -> Result<RemoteConfig> {
    let doc: RemoteDocument =
        serde_json::from_str(body).context("Failed to parse remote config JSON")?;
    Ok(doc.into())
}

pub async fn fetch_remote_config(url: &str) -> Result<RemoteConfig> {
    let http = Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("Failed to build HTTP client")?;

    let body = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch remote config from {url}"))?
        .error_for_status()
        .with_context(|| format!("Remote config request to {url} was rejected"))?
        .text()
        .await
        .context("Failed to read remote config body")?;

    let remote = parse_remote_config(&body)?;
    tracing::debug!(
        version = ?remote.version,
        updated_at = ?remote.updated_at,
        counties = remote.counties.len(),
        "remote config fetched"
    );
    Ok(remote)
}

/// Pick the county list to use. Remote failures never propagate.
pub fn resolve_counties(
    remote: Option<Result<Vec<County>>>,
    cached: Option<Vec<County>>,
) -> (Vec<County>, CountySource) {
    match remote {
        Some(Ok(list)) if !list.is_empty() => return (list, CountySource::Remote),
        Some(Ok(_)) => tracing::warn!("remote county list is empty, falling back"),
        Some(Err(err)) => tracing::warn!(error = %err, "remote county list unavailable, falling back"),
        None => {}
    }

    match cached {
        Some(list) if !list.is_empty() => (list, CountySource::Cached),
        _ => (bundled_counties(), CountySource::Bundled),
    }
}

/// Refresh the county list and API key for `config` from its remote document.
///
/// A fresh remote list is cached into `config`; a blank remote key keeps the
/// stored one. Returns whether `config` changed and needs saving.
pub async fn refresh_counties(config: &mut Config) -> Result<(Vec<County>, bool)> {
    let remote = match config.counties_url.as_deref() {
        Some(url) => Some(fetch_remote_config(url).await),
        None => None,
    };

    let mut changed = false;
    let remote = remote.map(|fetched| {
        fetched.map(|doc| {
            changed |= config.adopt_remote_api_key(doc.api_key.as_deref());
            doc.counties
        })
    });

    let (counties, source) = resolve_counties(remote, config.cached_counties());
    tracing::debug!(?source, count = counties.len(), "county list resolved");

    if source == CountySource::Remote {
        config.set_cached_counties(&counties)?;
        changed = true;
    }

    Ok((counties, changed))
}

/// Find a county by display name or API key, ignoring ASCII case.
pub fn find_county<'a>(counties: &'a [County], query: &str) -> Option<&'a County> {
    let query = query.trim();
    counties
        .iter()
        .find(|c| c.name == query || c.key.eq_ignore_ascii_case(query))
}
