use super::{validate_query_path, validate_socket_addr};
use crate::r#const::{body_limits, http_client_limits, server_defaults};
use serde::{Deserialize, Serialize};
use validator::Validate;

// HTTP客户端配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct HttpClientConfig {
    // 连接超时（秒）
    #[validate(range(
        min = http_client_limits::MIN_CONNECT_TIMEOUT,
        max = http_client_limits::MAX_CONNECT_TIMEOUT,
        message = "Connect timeout is out of range"
    ))]
    pub connect_timeout: u64,
    // 空闲连接超时（秒）（可选）
    #[validate(range(
        min = http_client_limits::MIN_IDLE_TIMEOUT,
        max = http_client_limits::MAX_IDLE_TIMEOUT,
        message = "Idle timeout is out of range"
    ))]
    pub idle_timeout: Option<u64>,
    // TCP Keepalive（秒）（可选）
    #[validate(range(
        min = http_client_limits::MIN_KEEPALIVE,
        max = http_client_limits::MAX_KEEPALIVE,
        message = "Keepalive is out of range"
    ))]
    pub keepalive: Option<u32>,
    // HTTP用户代理（可选）
    pub agent: Option<String>,
    // 允许无效证书，用于内部自签名证书
    pub insecure: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: http_client_limits::DEFAULT_CONNECT_TIMEOUT,
            idle_timeout: Some(http_client_limits::DEFAULT_IDLE_TIMEOUT),
            keepalive: Some(http_client_limits::DEFAULT_KEEPALIVE),
            agent: None,
            insecure: false,
        }
    }
}

// DoH 服务器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct ServerConfig {
    // HTTP监听地址
    #[validate(custom(
        function = "validate_socket_addr",
        message = "Invalid listen address"
    ))]
    pub listen: String,
    // DoH 请求路径
    #[validate(custom(function = "validate_query_path", message = "Path must start with '/'"))]
    pub path: String,
    // 错误响应是否携带 CORS 头
    pub cors_on_errors: bool,
    // POST 请求体大小上限（字节）
    #[validate(range(
        min = body_limits::MIN_BODY_SIZE,
        max = body_limits::MAX_BODY_SIZE,
        message = "Max body size is out of range"
    ))]
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: server_defaults::DEFAULT_HTTP_LISTEN.to_string(),
            path: server_defaults::DEFAULT_QUERY_PATH.to_string(),
            cors_on_errors: true,
            max_body_size: body_limits::DEFAULT_MAX_BODY_SIZE,
        }
    }
}

// 管理服务器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
pub struct AdminConfig {
    // 管理服务器监听地址
    #[validate(custom(
        function = "validate_socket_addr",
        message = "Invalid admin listen address"
    ))]
    pub listen: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            listen: server_defaults::DEFAULT_ADMIN_LISTEN.to_string(),
        }
    }
}
