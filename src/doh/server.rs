// src/doh/server.rs

use crate::doh::handlers::handle_doh;
use crate::doh::proxy::DoHProxy;
use crate::doh::state::AppState;
use crate::error::AppError;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_graceful_shutdown::SubsystemHandle;
use tracing::{error, info};

/// 创建 DoH 路由：单一路径，仅接受 GET、POST 和 OPTIONS
pub fn create_router(proxy: Arc<DoHProxy>, path: &str, max_body_size: usize) -> Router {
    // 创建应用程序状态
    let app_state = AppState { proxy };

    Router::new()
        .route(
            path,
            get(handle_doh).post(handle_doh).options(handle_doh),
        )
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(app_state)
}

/// DoH 服务器结构体
pub struct DoHServer {
    /// 监听地址
    bind_addr: SocketAddr,
    /// 请求路径
    path: String,
    /// 请求体大小上限
    max_body_size: usize,
    /// 代理编排器
    proxy: Arc<DoHProxy>,
}

impl DoHServer {
    /// 创建新的 DoH 服务器
    pub fn new(
        bind_addr: SocketAddr,
        path: impl Into<String>,
        max_body_size: usize,
        proxy: Arc<DoHProxy>,
    ) -> Self {
        Self {
            bind_addr,
            path: path.into(),
            max_body_size,
            proxy,
        }
    }

    /// 启动 DoH 服务器，收到关闭请求后停止接受新连接并等待进行中的请求完成
    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), AppError> {
        // 创建路由
        let app = create_router(self.proxy.clone(), &self.path, self.max_body_size);

        // 创建 TCP 监听器
        let listener = match TcpListener::bind(self.bind_addr).await {
            Ok(listener) => {
                info!("DoH server listening on {}{}", self.bind_addr, self.path);
                listener
            }
            Err(e) => {
                error!("Failed to bind DoH server: {}", e);
                return Err(AppError::Io(e));
            }
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            subsys.on_shutdown_requested().await;
            info!("Shutdown requested, DoH server is draining in-flight requests");
        });

        match server.await {
            Ok(()) => {
                info!("DoH server stopped");
                Ok(())
            }
            Err(e) => {
                error!("DoH server error: {}", e);
                Err(AppError::Io(e))
            }
        }
    }
}
