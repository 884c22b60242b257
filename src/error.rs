use axum::http::StatusCode;
use std::io;
use std::net::AddrParseError;
use std::time::Duration;
use thiserror::Error;

use crate::r#const::error_bodies;

// Unified error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] HttpClientError),

    #[error("Invalid shutdown timeout, must be between {min} and {max} seconds")]
    InvalidShutdownTimeout { min: u64, max: u64 },
}

impl From<AddrParseError> for AppError {
    fn from(err: AddrParseError) -> Self {
        Self::Config(ConfigError::InvalidListenAddress(err.to_string()))
    }
}

// HTTP客户端错误
#[derive(Debug, Error)]
#[error("HTTP client error: {0}")]
pub struct HttpClientError(pub String);

// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadError(#[from] io::Error),

    #[error("YAML parsing error: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid server listen address: {0}")]
    InvalidListenAddress(String),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

// 单次上游请求错误
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),
}

// 上游选择错误
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    #[error("No available upstream: every latency probe failed")]
    NoAvailableUpstream,

    #[error("All upstreams failed to answer the forwarded query")]
    AllUpstreamsFailed,
}

// 代理请求错误，最终映射为 HTTP 状态码
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Upstream selection failed: {0}")]
    Selection(#[from] SelectError),

    #[error("Forward to selected upstream {resolver} failed: {source}")]
    UnexpectedForwardFailure {
        resolver: String,
        #[source]
        source: FetchError,
    },
}

impl ProxyError {
    // 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Selection(SelectError::NoAvailableUpstream) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Selection(SelectError::AllUpstreamsFailed) => StatusCode::BAD_GATEWAY,
            Self::UnexpectedForwardFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // 返回给客户端的纯文本正文，不包含内部细节
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Selection(SelectError::NoAvailableUpstream) => {
                error_bodies::NO_AVAILABLE_UPSTREAM
            }
            Self::Selection(SelectError::AllUpstreamsFailed) => error_bodies::ALL_UPSTREAMS_FAILED,
            Self::UnexpectedForwardFailure { .. } => error_bodies::INTERNAL_SERVER_ERROR,
        }
    }
}
