//! Error taxonomy for timeline API calls.
//!
//! Every failure on the request path collapses into one [`ApiError`] variant
//! whose `Display` text is the message shown to the user.

use std::error::Error as StdError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("請求格式錯誤 (400)")]
    BadRequest,

    #[error("API 金鑰無效或未授權 (401)")]
    Unauthorized,

    #[error("沒有存取權限 (403)")]
    Forbidden,

    #[error("找不到指定地點的資料 (404)")]
    NotFound,

    #[error("請求次數過多，請稍後再試 (429)")]
    RateLimited,

    #[error("伺服器發生錯誤 (500)")]
    ServerError,

    #[error("服務暫時無法使用 (503)")]
    ServiceUnavailable,

    #[error("連線失敗，HTTP 狀態碼 {0}")]
    Http(u16),

    #[error("資料解析失敗")]
    Parse(String),

    #[error("網路連線失敗，請檢查網路設定")]
    Network(String),

    #[error("安全連線失敗")]
    Tls(String),

    #[error("發生未知錯誤：{0}")]
    Unknown(String),
}

impl ApiError {
    /// Static mapping for non-2xx responses.
    pub fn from_status(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500 => Self::ServerError,
            503 => Self::ServiceUnavailable,
            other => Self::Http(other),
        }
    }

    /// Classify a transport-level failure by its kind.
    ///
    /// The request URL carries the API key, so it is stripped before any text is kept.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let detail = describe(&err);

        if is_body_failure(&err) {
            return Self::Network(detail);
        }
        if err.is_decode() {
            return Self::Parse(detail);
        }
        if chain_contains(&err, |cause| cause.is::<rustls::Error>()) {
            return Self::Tls(detail);
        }
        if err.is_connect() || err.is_timeout() || err.is_request() {
            return Self::Network(detail);
        }
        Self::Unknown(detail)
    }

    /// Underlying detail, for logs. Empty for status-mapped variants.
    pub fn detail(&self) -> &str {
        match self {
            Self::Parse(d) | Self::Network(d) | Self::Tls(d) | Self::Unknown(d) => d.as_str(),
            _ => "",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::ServiceUnavailable | Self::Network(_)
        )
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::from_transport(err)
    }
}

/// The error and its causes joined with `: `.
fn describe(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

// A body cut short mid-stream surfaces as a decode error wrapping a body error.
fn is_body_failure(err: &reqwest::Error) -> bool {
    err.is_body()
        || chain_contains(err, |cause| {
            cause
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_body)
        })
}

// io::Error's `source()` skips the value it wraps (rustls errors arrive that
// way), so `get_ref()` is inspected as well.
fn chain_contains(err: &reqwest::Error, matches: impl Fn(&(dyn StdError + 'static)) -> bool) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if matches(cause) {
            return true;
        }
        if let Some(inner) = cause
            .downcast_ref::<std::io::Error>()
            .and_then(|io| io.get_ref())
        {
            if matches(inner) {
                return true;
            }
        }
        source = cause.source();
    }
    false
}
