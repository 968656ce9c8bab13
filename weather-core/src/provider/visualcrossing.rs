use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::{
    error::{ApiError, ApiResult},
    model::{Timeline, TimelineRequest},
    provider::{call_api, dto::TimelineDto},
};

use super::WeatherProvider;

pub const TIMELINE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String) -> ApiResult<Self> {
        Self::with_base_url(api_key, TIMELINE_URL)
    }

    /// Fails only when the TLS backend cannot be initialised.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(ApiError::from_transport)?;

        Ok(Self { api_key, base_url: base_url.into(), http })
    }

    /// `{base}/{location}/{start}/{end}`, with the location percent-encoded as one segment.
    fn timeline_url(&self, request: &TimelineRequest) -> ApiResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Unknown(format!("invalid base url {}: {e}", self.base_url)))?;

        let start = request.start.format("%Y-%m-%d").to_string();
        let end = request.end.format("%Y-%m-%d").to_string();

        url.path_segments_mut()
            .map_err(|_| ApiError::Unknown(format!("base url cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend([request.location.as_str(), start.as_str(), end.as_str()]);

        Ok(url)
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn get_timeline(&self, request: &TimelineRequest) -> ApiResult<Timeline> {
        let url = self.timeline_url(request)?;

        tracing::debug!(
            location = %request.location,
            start = %request.start,
            end = %request.end,
            unit_group = request.unit_group.as_str(),
            "requesting timeline"
        );

        let send = self
            .http
            .get(url)
            .query(&[
                ("unitGroup", request.unit_group.as_str()),
                ("include", request.include.as_str()),
                ("lang", request.lang.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send();

        let timeline = call_api(send, |body| {
            let dto: TimelineDto = serde_json::from_str(body)?;
            Ok(Timeline::from(dto))
        })
        .await?;

        tracing::info!(
            address = %timeline.resolved_address,
            days = timeline.days.len(),
            query_cost = timeline.query_cost,
            "timeline received"
        );

        Ok(timeline)
    }
}
