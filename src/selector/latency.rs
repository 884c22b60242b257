use super::{Selection, UpstreamSelector};
use crate::config::SelectionStrategy;
use crate::error::SelectError;
use crate::metrics::{server_label, METRICS};
use crate::r#const::{error_labels, http_headers, phase_labels, probe};
use crate::upstream::{BoundedFetcher, InboundRequest, ResolverEndpoint};
use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::header;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// 单个上游的探测结果，`latency` 为 `None` 表示探测失败（视为无穷大）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub endpoint: ResolverEndpoint,
    pub latency: Option<Duration>,
}

/// 构建探测 URL：在上游基础 URL 上设置 `name=example.com&type=A`，
/// 已有的同名参数会被替换。
pub fn probe_url(endpoint: &ResolverEndpoint) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint.as_str())?;
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "name" && key != "type")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("name", probe::NAME)
        .append_pair("type", probe::TYPE);

    Ok(url)
}

/// 选出延迟严格最小的上游，相同延迟时取池中靠前者。
pub fn pick_fastest(results: &[ProbeResult]) -> Option<&ResolverEndpoint> {
    results
        .iter()
        .filter_map(|result| result.latency.map(|latency| (latency, &result.endpoint)))
        .min_by_key(|(latency, _)| *latency)
        .map(|(_, endpoint)| endpoint)
}

// 延迟探测选择器
pub struct LatencyProbeSelector {
    fetcher: BoundedFetcher,
    probe_timeout: Duration,
}

impl LatencyProbeSelector {
    pub fn new(fetcher: BoundedFetcher, probe_timeout: Duration) -> Self {
        Self {
            fetcher,
            probe_timeout,
        }
    }

    // 并发探测全部上游，等待所有探测完成
    pub async fn probe_all(&self, pool: &[ResolverEndpoint]) -> Vec<ProbeResult> {
        join_all(pool.iter().map(|endpoint| self.probe(endpoint))).await
    }

    async fn probe(&self, endpoint: &ResolverEndpoint) -> ProbeResult {
        let start_time = Instant::now();
        let latency = match self.send_probe(endpoint).await {
            Ok(()) => Some(start_time.elapsed()),
            Err(reason) => {
                debug!("Probe to {} failed: {}", endpoint, reason);
                None
            }
        };

        ProbeResult {
            endpoint: endpoint.clone(),
            latency,
        }
    }

    async fn send_probe(&self, endpoint: &ResolverEndpoint) -> Result<(), String> {
        let url = probe_url(endpoint).map_err(|e| format!("invalid URL: {}", e))?;
        let request = self
            .fetcher
            .client()
            .get(url)
            .header(header::ACCEPT, http_headers::content_types::DNS_JSON)
            .build()
            .map_err(|e| e.to_string())?;

        let response = self
            .fetcher
            .fetch(request, self.probe_timeout, phase_labels::PROBE)
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            METRICS
                .upstream_errors_total()
                .with_label_values(&[
                    error_labels::BAD_STATUS,
                    phase_labels::PROBE,
                    &server_label(endpoint.as_str()),
                ])
                .inc();
            return Err(format!("upstream returned {}", response.status()));
        }

        Ok(())
    }
}

#[async_trait]
impl UpstreamSelector for LatencyProbeSelector {
    fn strategy(&self) -> SelectionStrategy {
        SelectionStrategy::Latency
    }

    async fn select(
        &self,
        pool: &[ResolverEndpoint],
        _inbound: &InboundRequest,
    ) -> Result<Selection, SelectError> {
        let results = self.probe_all(pool).await;
        debug!("Probe results: {:?}", results);

        pick_fastest(&results)
            .cloned()
            .map(Selection::Endpoint)
            .ok_or(SelectError::NoAvailableUpstream)
    }
}
