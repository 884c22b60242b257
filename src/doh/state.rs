// src/doh/state.rs

use crate::doh::proxy::DoHProxy;
use std::sync::Arc;

/// 应用程序状态结构体
#[derive(Clone)]
pub struct AppState {
    /// DoH 代理编排器
    pub proxy: Arc<DoHProxy>,
}
