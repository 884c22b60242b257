pub mod admin;
pub mod args;
pub mod config;
pub mod r#const;
pub mod doh;
pub mod error;
pub mod metrics;
pub mod selector;
pub mod upstream;

// 重导出常用组件
pub use admin::AdminServer;
pub use args::Args;
pub use config::{Config, SelectionStrategy};
pub use doh::{DoHProxy, DoHServer, ProxySettings};
pub use error::{AppError, FetchError, ProxyError, SelectError};
pub use r#const::subsystem_names;
pub use selector::{create_selector, Selection, UpstreamSelector};
pub use upstream::{BoundedFetcher, HttpClient, InboundRequest, OutboundRequest, ResolverEndpoint};
