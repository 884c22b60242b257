// src/doh/handlers.rs

use crate::doh::state::AppState;
use crate::r#const::cors;
use crate::upstream::InboundRequest;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::debug;

/// 处理 DoH 请求（GET / POST / OPTIONS）
///
/// 请求内容不做解析：JSON 查询参数、RFC 8484 的 `dns` 参数和 POST 正文都原样转发
pub async fn handle_doh(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // 路由会把 HEAD 交给 GET 处理器，这里统一拒绝，避免触发上游请求
    if !matches!(method, Method::GET | Method::POST | Method::OPTIONS) {
        debug!("Rejecting unsupported method {} for {}", method, uri);
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, cors::ALLOW_METHODS)],
        )
            .into_response();
    }

    let inbound = InboundRequest::new(method, &uri, &headers, body);
    state.proxy.handle(inbound).await
}
