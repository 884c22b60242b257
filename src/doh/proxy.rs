// src/doh/proxy.rs

use crate::doh::cors::{compose_response, error_response, preflight_response};
use crate::doh::sink::{ErrorSink, ProxyEvent, TracingSink};
use crate::error::{ProxyError, SelectError};
use crate::metrics::{server_label, METRICS};
use crate::r#const::{error_labels, phase_labels};
use crate::selector::{Selection, UpstreamSelector};
use crate::upstream::{BoundedFetcher, InboundRequest, OutboundRequest, ResolverEndpoint};
use axum::response::Response;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// 编排器运行参数
#[derive(Debug, Clone)]
pub struct ProxySettings {
    /// 最终转发的超时
    pub forward_timeout: Duration,
    /// 错误响应是否携带 CORS 头
    pub cors_on_errors: bool,
}

/// DoH 代理编排器
///
/// 每个请求依次经过：预检短路 → 选择上游 → 构建出站请求 → 转发 → 组装响应。
/// 请求之间不共享任何可变状态。
pub struct DoHProxy {
    pool: Vec<ResolverEndpoint>,
    selector: Arc<dyn UpstreamSelector>,
    fetcher: BoundedFetcher,
    sink: Arc<dyn ErrorSink>,
    settings: ProxySettings,
}

impl DoHProxy {
    pub fn new(
        pool: Vec<ResolverEndpoint>,
        selector: Arc<dyn UpstreamSelector>,
        fetcher: BoundedFetcher,
        settings: ProxySettings,
    ) -> Self {
        Self {
            pool,
            selector,
            fetcher,
            sink: Arc::new(TracingSink),
            settings,
        }
    }

    // 替换错误接收器
    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// 处理一个客户端请求，总是返回一个 HTTP 响应
    pub async fn handle(&self, inbound: InboundRequest) -> Response {
        METRICS
            .requests_total()
            .with_label_values(&[inbound.method.as_str()])
            .inc();

        // 预检请求不接触任何上游
        if inbound.is_preflight() {
            debug!("Answering CORS preflight for {}", inbound.path_and_query);
            return preflight_response();
        }

        let start_time = Instant::now();
        let result = self.forward(&inbound).await;
        METRICS
            .request_duration_seconds()
            .with_label_values(&[self.selector.strategy().as_str()])
            .observe(start_time.elapsed().as_secs_f64());

        match result {
            Ok(response) => response,
            Err(err) => {
                METRICS
                    .request_errors_total()
                    .with_label_values(&[error_label(&err)])
                    .inc();
                self.sink
                    .report(ProxyEvent::from_error(&err, self.selector.strategy()));
                error_response(&err, self.settings.cors_on_errors)
            }
        }
    }

    async fn forward(&self, inbound: &InboundRequest) -> Result<Response, ProxyError> {
        let selection = self.selector.select(&self.pool, inbound).await?;

        METRICS
            .upstream_selected_total()
            .with_label_values(&[
                self.selector.strategy().as_str(),
                &server_label(selection.endpoint().as_str()),
            ])
            .inc();

        let upstream = match selection {
            Selection::Response { endpoint, response } => {
                debug!("Relaying response from {}", endpoint);
                response
            }
            Selection::Endpoint(endpoint) => {
                debug!("Forwarding {} {} to {}", inbound.method, inbound.path_and_query, endpoint);
                let outbound = OutboundRequest::build(&endpoint, inbound);
                self.fetcher
                    .send(outbound, self.settings.forward_timeout, phase_labels::FORWARD)
                    .await
                    .map_err(|source| ProxyError::UnexpectedForwardFailure {
                        resolver: endpoint.to_string(),
                        source,
                    })?
            }
        };

        Ok(compose_response(upstream))
    }
}

fn error_label(err: &ProxyError) -> &'static str {
    match err {
        ProxyError::Selection(SelectError::NoAvailableUpstream) => {
            error_labels::NO_AVAILABLE_UPSTREAM
        }
        ProxyError::Selection(SelectError::AllUpstreamsFailed) => {
            error_labels::ALL_UPSTREAMS_FAILED
        }
        ProxyError::UnexpectedForwardFailure { .. } => error_labels::FORWARD_FAILURE,
    }
}
