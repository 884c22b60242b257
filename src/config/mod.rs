use crate::args::Args;
use crate::error::ConfigError;
use crate::r#const::upstream_defaults;
use crate::upstream::ResolverEndpoint;
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, path::Path, str::FromStr};
use tracing::debug;
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

pub mod core;
pub mod upstream;

pub use core::*;
pub use upstream::*;

// 配置结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// 自定义验证函数 - 验证Socket地址格式
pub fn validate_socket_addr(addr: &str) -> Result<(), ValidationError> {
    match SocketAddr::from_str(addr) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("invalid_socket_addr")),
    }
}

// 自定义验证函数 - 验证DoH路径格式
pub fn validate_query_path(path: &str) -> Result<(), ValidationError> {
    if !path.starts_with('/') {
        return Err(ValidationError::new("path_must_start_with_slash"));
    }
    Ok(())
}

// 自定义验证函数 - 验证上游URL格式
#[allow(clippy::ptr_arg)]
pub fn validate_upstream_urls(urls: &Vec<String>) -> Result<(), ValidationError> {
    for url in urls {
        match Url::parse(url) {
            Ok(parsed) if parsed.has_host() => {}
            _ => {
                let mut err = ValidationError::new("invalid_upstream_url");
                err.add_param("url".into(), url);
                return Err(err);
            }
        }
    }
    Ok(())
}

// 按逗号拆分服务器列表，不做裁剪，空条目交给验证处理
pub fn parse_server_list(raw: &str) -> Vec<String> {
    raw.split(upstream_defaults::SEPARATOR)
        .map(str::to_string)
        .collect()
}

// 应用配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct Config {
    // DoH 服务器配置
    #[validate(nested)]
    pub server: ServerConfig,
    // 管理服务器配置（可选）
    #[validate(nested)]
    pub admin: Option<AdminConfig>,
    // HTTP客户端配置
    #[validate(nested)]
    pub http_client: HttpClientConfig,
    // 上游选择配置
    #[validate(nested)]
    pub selector: SelectorConfig,
    // 上游 DoH 服务器列表
    #[validate(
        length(min = 1, message = "At least one upstream DoH server is required"),
        custom(
            function = "validate_upstream_urls",
            message = "Upstream servers must be absolute URLs"
        )
    )]
    pub upstreams: Vec<String>,
}

impl Config {
    // 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    // 读取并解析配置文件（不验证）
    pub fn parse_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        debug!("Loading configuration file: {:?}", path.as_ref());
        let content = fs::read_to_string(path).map_err(ConfigError::LoadError)?;
        let config: Config = serde_yaml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    // 合并配置文件、环境变量与命令行参数
    pub fn load(args: &Args) -> ConfigResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::parse_file(path)?,
            None => {
                debug!("No configuration file given, starting from defaults");
                Self::default()
            }
        };

        if let Some(servers) = &args.servers {
            config.upstreams = parse_server_list(servers);
            debug!(
                "Upstream servers overridden from command line or {}: {:?}",
                upstream_defaults::SERVERS_ENV,
                config.upstreams
            );
        }
        if let Some(strategy) = args.strategy {
            config.selector.strategy = strategy;
        }
        if let Some(listen) = &args.listen {
            config.server.listen = listen.clone();
        }

        config.validate()?;
        Ok(config)
    }

    // 验证配置有效性
    pub fn validate(&self) -> ConfigResult<()> {
        // 使用 validator 库进行验证
        if let Err(errors) = Validate::validate(self) {
            return Err(ConfigError::ValidationError(format_validation_errors(
                &errors,
            )));
        }
        Ok(())
    }

    // 上游服务器池
    pub fn endpoints(&self) -> Vec<ResolverEndpoint> {
        self.upstreams
            .iter()
            .cloned()
            .map(ResolverEndpoint::from)
            .collect()
    }
}

// 将 ValidationErrors 转换为友好的错误信息
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    // 格式化字段错误
    for (field, error_kind) in errors.errors() {
        match error_kind {
            validator::ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    match error.params.get("url") {
                        Some(url) => {
                            messages.push(format!("Field '{}': {} ({})", field, message, url))
                        }
                        None => messages.push(format!("Field '{}': {}", field, message)),
                    }
                }
            }
            validator::ValidationErrorsKind::Struct(struct_errors) => {
                messages.push(format!(
                    "Struct '{}' validation failed: {}",
                    field,
                    format_validation_errors(struct_errors)
                ));
            }
            validator::ValidationErrorsKind::List(list_errors) => {
                for (index, err) in list_errors {
                    messages.push(format!(
                        "List '{}' at index {}: {}",
                        field,
                        index,
                        format_validation_errors(err)
                    ));
                }
            }
        }
    }

    if messages.is_empty() {
        "Unknown validation error".to_string()
    } else {
        messages.join("\n")
    }
}

// 默认配置实现
impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            admin: None,
            http_client: HttpClientConfig::default(),
            selector: SelectorConfig::default(),
            upstreams: upstream_defaults::DEFAULT_DOH_SERVERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
