// 上游选择策略
//
// 两种策略共用同一个接口：
// - latency: 并发探测全部上游，选出延迟最低的服务器，由调用方转发真实查询
// - race: 把真实查询同时转发给全部上游，按池顺序返回第一个成功响应

mod latency;
mod race;

pub use latency::{pick_fastest, probe_url, LatencyProbeSelector, ProbeResult};
pub use race::RaceForwardSelector;

use crate::config::{SelectionStrategy, SelectorConfig};
use crate::error::SelectError;
use crate::upstream::{BoundedFetcher, InboundRequest, ResolverEndpoint};
use async_trait::async_trait;
use std::sync::Arc;

// 选择结果
#[derive(Debug)]
pub enum Selection {
    // 选出的上游，查询尚未转发
    Endpoint(ResolverEndpoint),
    // 已经转发并成功应答的上游及其响应
    Response {
        endpoint: ResolverEndpoint,
        response: reqwest::Response,
    },
}

impl Selection {
    pub fn endpoint(&self) -> &ResolverEndpoint {
        match self {
            Self::Endpoint(endpoint) => endpoint,
            Self::Response { endpoint, .. } => endpoint,
        }
    }
}

// 上游选择器特性
#[async_trait]
pub trait UpstreamSelector: Send + Sync {
    // 策略名称
    fn strategy(&self) -> SelectionStrategy;

    // 从服务器池中选择一个上游
    async fn select(
        &self,
        pool: &[ResolverEndpoint],
        inbound: &InboundRequest,
    ) -> Result<Selection, SelectError>;
}

// 根据配置创建选择器
pub fn create_selector(
    config: &SelectorConfig,
    fetcher: BoundedFetcher,
) -> Arc<dyn UpstreamSelector> {
    match config.strategy {
        SelectionStrategy::Latency => {
            Arc::new(LatencyProbeSelector::new(fetcher, config.probe_timeout()))
        }
        SelectionStrategy::Race => {
            Arc::new(RaceForwardSelector::new(fetcher, config.forward_timeout()))
        }
    }
}
