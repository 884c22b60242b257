use axum::http::{header, StatusCode};
use axum::{routing::get, Router};
use once_cell::sync::Lazy;
use prometheus::{opts, HistogramVec, IntCounterVec, Registry};
use url::Url;

// 全局静态指标实例
pub static METRICS: Lazy<ProxyMetrics> = Lazy::new(ProxyMetrics::new);

// 上游指标使用的服务器标签：只保留 URL 的源（scheme://host:port），避免查询串带来的标签膨胀
pub fn server_label(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.origin().ascii_serialization(),
        Err(_) => url.to_string(),
    }
}

// DoH 代理性能指标
pub struct ProxyMetrics {
    registry: Registry,

    // 1. 客户端请求指标
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    request_errors_total: IntCounterVec,

    // 2. 上游 DoH 解析器指标
    upstream_requests_total: IntCounterVec,
    upstream_errors_total: IntCounterVec,
    upstream_duration_seconds: HistogramVec,
    upstream_selected_total: IntCounterVec,
}

impl Default for ProxyMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyMetrics {
    // 创建新的指标收集器
    pub fn new() -> Self {
        let registry = Registry::new();

        // 1. 客户端请求指标
        let requests_total = IntCounterVec::new(
            opts!(
                "dohrelay_requests_total",
                "Total DoH requests received by the proxy, classified by HTTP method"
            ),
            &["method"],
        )
        .unwrap();

        let request_duration_seconds = HistogramVec::new(
            prometheus::histogram_opts!(
                "dohrelay_request_duration_seconds",
                "Time until the response head is ready, classified by selection strategy",
                vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
            ),
            &["strategy"],
        )
        .unwrap();

        let request_errors_total = IntCounterVec::new(
            opts!(
                "dohrelay_request_errors_total",
                "Total DoH requests answered with an error status, classified by error type"
            ),
            &["error_type"],
        )
        .unwrap();

        // 2. 上游 DoH 解析器指标
        let upstream_requests_total = IntCounterVec::new(
            opts!(
                "dohrelay_upstream_requests_total",
                "Total requests sent to upstream DoH resolvers, classified by phase and server"
            ),
            &["phase", "server"],
        )
        .unwrap();

        let upstream_errors_total = IntCounterVec::new(
            opts!(
                "dohrelay_upstream_errors_total",
                "Total upstream DoH resolver errors, classified by error type, phase and server"
            ),
            &["error_type", "phase", "server"],
        )
        .unwrap();

        let upstream_duration_seconds = HistogramVec::new(
            prometheus::histogram_opts!(
                "dohrelay_upstream_duration_seconds",
                "Upstream response head latency in seconds, classified by phase and server",
                vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
            ),
            &["phase", "server"],
        )
        .unwrap();

        let upstream_selected_total = IntCounterVec::new(
            opts!(
                "dohrelay_upstream_selected_total",
                "Total times an upstream was chosen, classified by strategy and server"
            ),
            &["strategy", "server"],
        )
        .unwrap();

        // 创建指标实例
        let metrics = ProxyMetrics {
            registry,
            requests_total,
            request_duration_seconds,
            request_errors_total,
            upstream_requests_total,
            upstream_errors_total,
            upstream_duration_seconds,
            upstream_selected_total,
        };

        // 注册所有指标
        metrics.register_all_metrics();

        metrics
    }

    // 注册所有指标
    fn register_all_metrics(&self) {
        // 1. 客户端请求指标
        self.registry
            .register(Box::new(self.requests_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.request_duration_seconds.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.request_errors_total.clone()))
            .unwrap();

        // 2. 上游 DoH 解析器指标
        self.registry
            .register(Box::new(self.upstream_requests_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.upstream_errors_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.upstream_duration_seconds.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.upstream_selected_total.clone()))
            .unwrap();
    }

    // 导出所有指标为文本格式
    pub fn export_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = String::new();
        encoder.encode_utf8(&metric_families, &mut buffer)?;
        Ok(buffer)
    }

    // 下面是各个指标的getter方法，用于其他模块增加计数或设置值

    // 1. 客户端请求指标
    pub fn requests_total(&self) -> &IntCounterVec {
        &self.requests_total
    }

    pub fn request_duration_seconds(&self) -> &HistogramVec {
        &self.request_duration_seconds
    }

    pub fn request_errors_total(&self) -> &IntCounterVec {
        &self.request_errors_total
    }

    // 2. 上游 DoH 解析器指标
    pub fn upstream_requests_total(&self) -> &IntCounterVec {
        &self.upstream_requests_total
    }

    pub fn upstream_errors_total(&self) -> &IntCounterVec {
        &self.upstream_errors_total
    }

    pub fn upstream_duration_seconds(&self) -> &HistogramVec {
        &self.upstream_duration_seconds
    }

    pub fn upstream_selected_total(&self) -> &IntCounterVec {
        &self.upstream_selected_total
    }
}

// 提供指标导出路由
pub fn metrics_routes() -> Router {
    Router::new().route(
        "/metrics",
        get(|| async {
            match METRICS.export_metrics() {
                Ok(buffer) => (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
                    buffer,
                ),
                Err(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    format!("Failed to encode metrics: {}", e),
                ),
            }
        }),
    )
}
