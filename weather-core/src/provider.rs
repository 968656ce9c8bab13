use crate::{
    Config, TimelineRequest,
    error::{ApiError, ApiResult},
    model::Timeline,
    provider::visualcrossing::VisualCrossingProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, future::Future};

pub(crate) mod dto;
pub mod visualcrossing;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_timeline(&self, request: &TimelineRequest) -> ApiResult<Timeline>;
}

/// The single request path: send, check status, read the body, transform it.
///
/// A 2xx response with an empty body is reported as [`ApiError::Unknown`].
pub async fn call_api<T, S, F>(send: S, transform: F) -> ApiResult<T>
where
    S: Future<Output = reqwest::Result<reqwest::Response>>,
    F: FnOnce(&str) -> ApiResult<T>,
{
    let res = send.await.map_err(|err| {
        let mapped = ApiError::from_transport(err);
        tracing::warn!(error = %mapped, detail = mapped.detail(), "request failed before a response arrived");
        mapped
    })?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %truncate_body(&body), "request rejected");
        return Err(ApiError::from_status(status.as_u16()));
    }

    let body = res.text().await?;
    if body.trim().is_empty() {
        return Err(ApiError::Unknown("回應內容為空".to_string()));
    }

    transform(&body)
}

/// Construct the timeline provider from the stored API key.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    Ok(Box::new(VisualCrossingProvider::new(api_key.to_owned())?))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
