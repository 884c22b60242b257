use crate::r#const::http_headers;
use crate::upstream::ResolverEndpoint;
use axum::http::{header, HeaderMap, HeaderValue, Method, Uri};
use bytes::Bytes;
use reqwest::{Client, Request};

/// 客户端发来的 DoH 请求中与转发相关的部分。
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    // 原始路径与查询串，原样保留
    pub path_and_query: String,
    pub accept: Option<HeaderValue>,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Self {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        Self {
            method,
            path_and_query,
            accept: headers.get(header::ACCEPT).cloned(),
            content_type: headers.get(header::CONTENT_TYPE).cloned(),
            body,
        }
    }

    // CORS 预检请求
    pub fn is_preflight(&self) -> bool {
        self.method == Method::OPTIONS
    }
}

// 只有客户端明确要求 wire 格式时才改用 dns-message，`*/*` 等通配值按 JSON 处理
fn outbound_accept(inbound: &InboundRequest) -> &'static str {
    let wants_wire_format = inbound
        .accept
        .as_ref()
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .split(',')
                .any(|item| item.trim().starts_with(http_headers::content_types::DNS_MESSAGE))
        });

    if wants_wire_format {
        http_headers::content_types::DNS_MESSAGE
    } else {
        http_headers::content_types::DNS_JSON
    }
}

/// 发往某个上游的请求：目标 URL、方法、头部和可选请求体。
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// 根据客户端请求和选中的上游构建出站请求。
    ///
    /// - 目标 URL 为上游基础 URL 直接拼接客户端的路径和查询串
    /// - 客户端明确要求 wire 格式时 `Accept` 为 `application/dns-message`，否则一律为 `application/dns-json`
    /// - `Content-Type` 与请求体只随 POST 转发，GET 永远不带请求体
    pub fn build(endpoint: &ResolverEndpoint, inbound: &InboundRequest) -> Self {
        let url = format!("{}{}", endpoint.as_str(), inbound.path_and_query);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(outbound_accept(inbound)));

        let body = if inbound.method == Method::POST {
            if let Some(content_type) = &inbound.content_type {
                headers.insert(header::CONTENT_TYPE, content_type.clone());
            }
            Some(inbound.body.clone())
        } else {
            None
        };

        Self {
            method: inbound.method.clone(),
            url,
            headers,
            body,
        }
    }

    // 转换为 reqwest 请求，URL 无法解析时在此报错
    pub fn into_request(self, client: &Client) -> Result<Request, reqwest::Error> {
        let mut builder = client
            .request(self.method, &self.url)
            .headers(self.headers);
        if let Some(body) = self.body {
            builder = builder.body(body);
        }
        builder.build()
    }
}
