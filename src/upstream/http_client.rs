use crate::config::HttpClientConfig;
use crate::error::{AppError, HttpClientError};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub struct HttpClient;

impl HttpClient {
    // 创建HTTP客户端
    //
    // 不设置整体请求超时：每次上游调用的期限由 BoundedFetcher 控制，
    // 而响应体在期限之后仍会继续流式转发给客户端。
    pub fn create(config: &HttpClientConfig) -> Result<Client, AppError> {
        debug!("Creating HTTP client for upstream, config: {:?}", config);

        // 创建客户端构建器
        let mut client_builder =
            reqwest::ClientBuilder::new().connect_timeout(Duration::from_secs(config.connect_timeout));

        // 允许无效证书，用于内部自签名证书
        if config.insecure {
            warn!("Upstream TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        // 配置TCP keepalive
        if let Some(ref keepalive) = config.keepalive {
            client_builder = client_builder.tcp_keepalive(Duration::from_secs(*keepalive as u64));
        }

        // 配置空闲连接超时
        if let Some(idle_timeout) = config.idle_timeout {
            client_builder = client_builder.pool_idle_timeout(Duration::from_secs(idle_timeout));
        }

        // 配置用户代理
        if let Some(ref agent) = config.agent {
            client_builder = client_builder.user_agent(agent);
        }

        // 创建基础HTTP客户端
        let client = client_builder.build().map_err(|e| {
            AppError::HttpError(HttpClientError(format!(
                "Failed to create HTTP client: {}",
                e
            )))
        })?;

        Ok(client)
    }
}
