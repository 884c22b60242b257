// src/admin.rs

use crate::error::AppError;
use crate::metrics;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_graceful_shutdown::SubsystemHandle;
use tracing::{error, info};

// 管理服务器，提供健康检查和 Prometheus 指标
pub struct AdminServer {
    // 监听地址
    listen_addr: SocketAddr,
}

// 管理路由
pub fn admin_routes() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(metrics::metrics_routes())
}

impl AdminServer {
    // 创建新的管理服务器
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self { listen_addr }
    }

    // 运行服务器（用于优雅关闭集成）
    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), AppError> {
        let listener = TcpListener::bind(self.listen_addr).await?;
        info!("Admin server listening on {}", self.listen_addr);

        let server = axum::serve(listener, admin_routes()).with_graceful_shutdown(async move {
            subsys.on_shutdown_requested().await;
            info!("Received subsystem shutdown request, admin server is stopping");
        });

        match server.await {
            Ok(()) => {
                info!("Admin server stopped");
                Ok(())
            }
            Err(err) => {
                error!("Admin server error: {}", err);
                Err(AppError::Io(err))
            }
        }
    }
}

// 健康检查处理程序
async fn health_handler() -> &'static str {
    "OK"
}
