// src/doh/sink.rs

use crate::config::SelectionStrategy;
use crate::error::ProxyError;
use std::fmt;
use tracing::{error, warn};

/// 请求处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SelectUpstream,
    Forward,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectUpstream => f.write_str("select_upstream"),
            Self::Forward => f.write_str("forward"),
        }
    }
}

/// 上报给错误接收器的事件，包含定位问题所需的上下文
#[derive(Debug, Clone)]
pub struct ProxyEvent {
    pub phase: Phase,
    pub strategy: SelectionStrategy,
    pub resolver: Option<String>,
    pub message: String,
}

impl ProxyEvent {
    pub fn from_error(err: &ProxyError, strategy: SelectionStrategy) -> Self {
        match err {
            ProxyError::Selection(_) => Self {
                phase: Phase::SelectUpstream,
                strategy,
                resolver: None,
                message: err.to_string(),
            },
            ProxyError::UnexpectedForwardFailure { resolver, .. } => Self {
                phase: Phase::Forward,
                strategy,
                resolver: Some(resolver.clone()),
                message: err.to_string(),
            },
        }
    }
}

/// 错误接收器。
///
/// 在响应路径上同步调用，实现不得阻塞；需要 I/O 的实现应自行派发到后台任务。
pub trait ErrorSink: Send + Sync {
    fn report(&self, event: ProxyEvent);
}

/// 默认实现：写入 tracing 日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, event: ProxyEvent) {
        let resolver = event.resolver.as_deref().unwrap_or("-");
        match event.phase {
            // 所有上游都不可用属于常规情况
            Phase::SelectUpstream => warn!(
                phase = %event.phase,
                strategy = %event.strategy,
                resolver,
                "{}",
                event.message
            ),
            // 已被判定为健康的上游在转发时失败
            Phase::Forward => error!(
                phase = %event.phase,
                strategy = %event.strategy,
                resolver,
                "Unexpected upstream failure: {}",
                event.message
            ),
        }
    }
}
