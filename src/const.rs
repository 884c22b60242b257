// 应用常量定义

//
// 配置参数限制常量
//

// 应用关闭等待时间限制
pub mod shutdown_timeout {
    // 默认值
    pub const DEFAULT: u64 = 30;
    // 最小值
    pub const MIN: u64 = 1;
    // 最大值
    pub const MAX: u64 = 120;
}

// HTTP客户端配置限制
pub mod http_client_limits {
    // 默认连接超时（秒）
    pub const DEFAULT_CONNECT_TIMEOUT: u64 = 3;
    // 最小连接超时（秒）
    pub const MIN_CONNECT_TIMEOUT: u64 = 1;
    // 最大连接超时（秒）
    pub const MAX_CONNECT_TIMEOUT: u64 = 120;
    // 默认空闲超时（秒）
    pub const DEFAULT_IDLE_TIMEOUT: u64 = 10;
    // 最小空闲超时（秒）
    pub const MIN_IDLE_TIMEOUT: u64 = 5;
    // 最大空闲超时（秒）
    pub const MAX_IDLE_TIMEOUT: u64 = 1800;
    // 默认keepalive时间（秒）
    pub const DEFAULT_KEEPALIVE: u32 = 30;
    // 最小keepalive时间（秒）
    pub const MIN_KEEPALIVE: u32 = 5;
    // 最大keepalive时间（秒）
    pub const MAX_KEEPALIVE: u32 = 600;
}

// 上游选择超时限制（毫秒）
pub mod selector_limits {
    // 健康探测默认超时
    pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3000;
    // 查询转发默认超时
    pub const DEFAULT_FORWARD_TIMEOUT_MS: u64 = 5000;
    // 最小超时
    pub const MIN_TIMEOUT_MS: u64 = 10;
    // 最大超时
    pub const MAX_TIMEOUT_MS: u64 = 60_000;
}

// 请求体大小限制（字节）
pub mod body_limits {
    // 默认值，DNS 消息最大长度
    pub const DEFAULT_MAX_BODY_SIZE: usize = 65535;
    // 最小值
    pub const MIN_BODY_SIZE: usize = 512;
    // 最大值
    pub const MAX_BODY_SIZE: usize = 1024 * 1024;
}

//
// 健康探测常量
//

// 探测查询参数
pub mod probe {
    // 探测域名
    pub const NAME: &str = "example.com";
    // 探测记录类型
    pub const TYPE: &str = "A";
}

//
// 指标标签常量
//

// 上游请求阶段标签
pub mod phase_labels {
    // 健康探测
    pub const PROBE: &str = "probe";
    // 竞速转发
    pub const RACE: &str = "race";
    // 最终转发
    pub const FORWARD: &str = "forward";
}

// 错误类型标签
pub mod error_labels {
    // 请求超时
    pub const TIMEOUT: &str = "timeout";
    // 网络错误
    pub const NETWORK: &str = "network";
    // 上游返回非 2xx 状态
    pub const BAD_STATUS: &str = "bad_status";
    // 无可用上游
    pub const NO_AVAILABLE_UPSTREAM: &str = "no_available_upstream";
    // 所有上游失败
    pub const ALL_UPSTREAMS_FAILED: &str = "all_upstreams_failed";
    // 最终转发失败
    pub const FORWARD_FAILURE: &str = "forward_failure";
}

// 子系统名称
pub mod subsystem_names {
    // 管理服务器子系统
    pub const ADMIN_SERVER: &str = "admin_server";
    // DoH服务器子系统
    pub const DOH_SERVER: &str = "doh_server";
}

// 服务器默认值
pub mod server_defaults {
    // 默认DoH监听地址
    pub const DEFAULT_HTTP_LISTEN: &str = "127.0.0.1:8080";
    // 默认管理服务器监听地址
    pub const DEFAULT_ADMIN_LISTEN: &str = "127.0.0.1:9000";
    // 默认DoH路径
    pub const DEFAULT_QUERY_PATH: &str = "/dns-query";
}

// 上游默认值
pub mod upstream_defaults {
    // 环境变量名称
    pub const SERVERS_ENV: &str = "DOH_SERVERS";
    // 服务器列表分隔符
    pub const SEPARATOR: char = ',';
    // 默认DoH服务器
    pub const DEFAULT_DOH_SERVERS: &[&str] = &["https://dns.google", "https://cloudflare-dns.com"];
}

// HTTP头常量
pub mod http_headers {
    // 内容类型常量
    pub mod content_types {
        // DNS消息内容类型
        pub const DNS_MESSAGE: &str = "application/dns-message";
        // DNS JSON内容类型
        pub const DNS_JSON: &str = "application/dns-json";
    }

    // 逐跳头部，不转发给客户端
    pub const HOP_BY_HOP: &[&str] = &[
        "connection",
        "keep-alive",
        "proxy-connection",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
    ];
}

// CORS 头常量
pub mod cors {
    pub const ALLOW_ORIGIN: &str = "*";
    pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
    pub const ALLOW_HEADERS: &str = "*";
    pub const MAX_AGE: &str = "86400";
}

// 错误响应正文
pub mod error_bodies {
    // 探测全部失败
    pub const NO_AVAILABLE_UPSTREAM: &str = "No available DoH servers";
    // 竞速全部失败
    pub const ALL_UPSTREAMS_FAILED: &str = "All DoH servers failed";
    // 最终转发失败
    pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
}
