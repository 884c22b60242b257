use std::fmt;

/// 上游 DoH 服务器的基础 URL。
///
/// 内容按原样保存：转发时直接与客户端请求的路径和查询串拼接，
/// 因此这里不做任何规范化。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolverEndpoint(String);

impl ResolverEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self(base_url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ResolverEndpoint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ResolverEndpoint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
