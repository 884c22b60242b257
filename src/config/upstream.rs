use crate::r#const::selector_limits;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use validator::Validate;

// 上游选择策略枚举
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    // 先探测延迟，再转发到最快的服务器
    #[default]
    Latency,
    // 同时转发到所有服务器，按池顺序取第一个成功响应
    Race,
}

impl SelectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Race => "race",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 上游选择配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct SelectorConfig {
    // 选择策略
    pub strategy: SelectionStrategy,
    // 健康探测超时（毫秒）
    #[validate(range(
        min = selector_limits::MIN_TIMEOUT_MS,
        max = selector_limits::MAX_TIMEOUT_MS,
        message = "Probe timeout is out of range"
    ))]
    pub probe_timeout_ms: u64,
    // 查询转发超时（毫秒）
    #[validate(range(
        min = selector_limits::MIN_TIMEOUT_MS,
        max = selector_limits::MAX_TIMEOUT_MS,
        message = "Forward timeout is out of range"
    ))]
    pub forward_timeout_ms: u64,
}

impl SelectorConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_millis(self.forward_timeout_ms)
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            strategy: SelectionStrategy::default(),
            probe_timeout_ms: selector_limits::DEFAULT_PROBE_TIMEOUT_MS,
            forward_timeout_ms: selector_limits::DEFAULT_FORWARD_TIMEOUT_MS,
        }
    }
}
