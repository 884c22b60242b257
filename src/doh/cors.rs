// src/doh/cors.rs

use crate::error::ProxyError;
use crate::r#const::{cors, http_headers};
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};

/// 固定的 CORS 响应头集合
pub fn cors_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(cors::ALLOW_ORIGIN),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(cors::ALLOW_METHODS),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(cors::ALLOW_HEADERS),
        ),
        (
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(cors::MAX_AGE),
        ),
    ]
}

/// 写入 CORS 头，覆盖已有的同名头而不是追加
pub fn apply_cors(headers: &mut HeaderMap) {
    for (name, value) in cors_headers() {
        headers.insert(name, value);
    }
}

/// OPTIONS 预检响应：空正文，只有 CORS 头
pub fn preflight_response() -> Response {
    let mut response = Response::new(Body::empty());
    apply_cors(response.headers_mut());
    response
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    http_headers::HOP_BY_HOP.contains(&name.as_str())
}

/// 把上游响应转换为返回给客户端的响应。
///
/// 状态码、状态文本和端到端头部原样保留，随后覆盖 CORS 头；
/// 响应体直接流式转发，不做缓冲。
pub fn compose_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let reason = upstream
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .cloned();

    let mut headers = HeaderMap::with_capacity(upstream.headers().len() + 4);
    for (name, value) in upstream.headers() {
        if is_hop_by_hop(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    // 必须在复制上游头之后执行
    apply_cors(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    response
}

/// 错误响应：纯文本正文，按配置决定是否携带 CORS 头
pub fn error_response(err: &ProxyError, with_cors: bool) -> Response {
    let mut response = (
        err.status_code(),
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        err.public_message(),
    )
        .into_response();
    if with_cors {
        apply_cors(response.headers_mut());
    }
    response
}
