use crate::error::FetchError;
use crate::metrics::{server_label, METRICS};
use crate::r#const::error_labels;
use crate::upstream::OutboundRequest;
use reqwest::{Client, Request, Response};
use std::time::{Duration, Instant};
use tracing::debug;

/// 带超时的单次上游请求。
///
/// 超时到期时丢弃进行中的请求 future，底层连接随之取消。
/// 组件内部不做重试，重试与回退策略由选择器决定。
#[derive(Clone)]
pub struct BoundedFetcher {
    client: Client,
}

impl BoundedFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// 发送请求；`phase` 仅用于指标标签。
    pub async fn fetch(
        &self,
        request: Request,
        timeout: Duration,
        phase: &'static str,
    ) -> Result<Response, FetchError> {
        let server = server_label(request.url().as_str());
        let start_time = Instant::now();

        METRICS
            .upstream_requests_total()
            .with_label_values(&[phase, &server])
            .inc();

        match tokio::time::timeout(timeout, self.client.execute(request)).await {
            Ok(Ok(response)) => {
                let duration = start_time.elapsed();
                METRICS
                    .upstream_duration_seconds()
                    .with_label_values(&[phase, &server])
                    .observe(duration.as_secs_f64());
                debug!(
                    "Upstream {} answered {} in {:?} ({})",
                    server,
                    response.status(),
                    duration,
                    phase
                );
                Ok(response)
            }
            Ok(Err(e)) => {
                METRICS
                    .upstream_errors_total()
                    .with_label_values(&[error_labels::NETWORK, phase, &server])
                    .inc();
                Err(FetchError::NetworkFailure(e))
            }
            Err(_) => {
                METRICS
                    .upstream_errors_total()
                    .with_label_values(&[error_labels::TIMEOUT, phase, &server])
                    .inc();
                Err(FetchError::Timeout(timeout))
            }
        }
    }

    /// 构建并发送改写后的出站请求。
    pub async fn send(
        &self,
        outbound: OutboundRequest,
        timeout: Duration,
        phase: &'static str,
    ) -> Result<Response, FetchError> {
        let request = outbound.into_request(&self.client)?;
        self.fetch(request, timeout, phase).await
    }
}
