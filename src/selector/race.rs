use super::{Selection, UpstreamSelector};
use crate::config::SelectionStrategy;
use crate::error::SelectError;
use crate::metrics::{server_label, METRICS};
use crate::r#const::{error_labels, phase_labels};
use crate::upstream::{BoundedFetcher, InboundRequest, OutboundRequest, ResolverEndpoint};
use async_trait::async_trait;
use futures_util::stream::{FuturesOrdered, StreamExt};
use std::time::Duration;
use tracing::debug;

/// 竞速转发选择器。
///
/// 真实查询同时发给池中全部上游，结果按池顺序消费：返回池中最靠前的
/// 2xx 响应，而不是最先到达的响应。一旦池中更靠前的上游全部失败而当前
/// 上游成功，剩余请求立即被丢弃取消，结果与等待全部完成后再按顺序挑选相同。
pub struct RaceForwardSelector {
    fetcher: BoundedFetcher,
    forward_timeout: Duration,
}

impl RaceForwardSelector {
    pub fn new(fetcher: BoundedFetcher, forward_timeout: Duration) -> Self {
        Self {
            fetcher,
            forward_timeout,
        }
    }
}

#[async_trait]
impl UpstreamSelector for RaceForwardSelector {
    fn strategy(&self) -> SelectionStrategy {
        SelectionStrategy::Race
    }

    async fn select(
        &self,
        pool: &[ResolverEndpoint],
        inbound: &InboundRequest,
    ) -> Result<Selection, SelectError> {
        let mut attempts: FuturesOrdered<_> = pool
            .iter()
            .map(|endpoint| {
                let outbound = OutboundRequest::build(endpoint, inbound);
                let fetcher = &self.fetcher;
                let timeout = self.forward_timeout;
                async move {
                    let result = fetcher.send(outbound, timeout, phase_labels::RACE).await;
                    (endpoint, result)
                }
            })
            .collect();

        while let Some((endpoint, result)) = attempts.next().await {
            match result {
                Ok(response) if response.status().is_success() => {
                    debug!("Race won by {} ({})", endpoint, response.status());
                    return Ok(Selection::Response {
                        endpoint: endpoint.clone(),
                        response,
                    });
                }
                Ok(response) => {
                    METRICS
                        .upstream_errors_total()
                        .with_label_values(&[
                            error_labels::BAD_STATUS,
                            phase_labels::RACE,
                            &server_label(endpoint.as_str()),
                        ])
                        .inc();
                    debug!("Race candidate {} returned {}", endpoint, response.status());
                }
                Err(e) => {
                    debug!("Race candidate {} failed: {}", endpoint, e);
                }
            }
        }

        Err(SelectError::AllUpstreamsFailed)
    }
}
