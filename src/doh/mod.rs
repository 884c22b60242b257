// src/doh/mod.rs
//
// DoH (DNS over HTTPS) 转发代理实现:
// - 单一路径，支持 GET、POST 和 OPTIONS
// - 请求内容不解析，按字节/JSON 原样转发到选中的上游
// - 所有成功响应和预检响应都带 CORS 头

// 子模块定义
pub mod cors;
pub mod handlers;
pub mod proxy;
pub mod server;
pub mod sink;
pub mod state;

// 公开导出
pub use proxy::{DoHProxy, ProxySettings};
pub use server::{create_router, DoHServer};
pub use sink::{ErrorSink, Phase, ProxyEvent, TracingSink};
