// 声明子模块
mod endpoint;
mod fetcher;
mod http_client;
mod rewriter;

// 重导出公共API
pub use endpoint::ResolverEndpoint;
pub use fetcher::BoundedFetcher;
pub use http_client::HttpClient;
pub use rewriter::{InboundRequest, OutboundRequest};
