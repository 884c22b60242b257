use crate::config::SelectionStrategy;
use crate::error::AppError;
use crate::r#const::shutdown_timeout;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

// DNS-over-HTTPS 转发代理服务
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "dohrelay",
    author,
    version,
    about = "A lightweight DNS-over-HTTPS forwarding proxy\n\n\
             Key Features:\n\
             - Transparent forwarding: application/dns-json and RFC 8484 wire format, GET and POST\n\
             - Upstream selection: latency probe (fastest resolver wins) or race forward (pool order wins)\n\
             - Bounded upstream calls: per-request timeouts for probes and forwarded queries\n\
             - Browser friendly: permissive CORS headers and OPTIONS preflight short-circuit\n\
             - Usability: YAML configuration, DOH_SERVERS environment variable, Prometheus metrics"
)]
pub struct Args {
    // 配置文件路径（可选）
    #[arg(short, long, help = "Path to a YAML configuration file")]
    pub config: Option<PathBuf>,

    // 上游服务器列表，逗号分隔
    #[arg(
        short = 's',
        long = "servers",
        env = "DOH_SERVERS",
        help = "Comma-separated list of upstream DoH base URLs (overrides the configuration file)"
    )]
    pub servers: Option<String>,

    // 上游选择策略
    #[arg(long = "strategy", value_enum, help = "Upstream selection strategy")]
    pub strategy: Option<SelectionStrategy>,

    // DoH 监听地址
    #[arg(short = 'l', long = "listen", help = "DoH listen address, e.g. 127.0.0.1:8080")]
    pub listen: Option<String>,

    // 测试配置
    #[arg(
        short = 't',
        long = "test",
        action = ArgAction::SetTrue,
        help = "Test configuration for validity and exit"
    )]
    pub test_config: bool,

    // 启用调试日志
    #[arg(
        short = 'd',
        long = "debug",
        action = ArgAction::SetTrue,
        help = "Enable debug level logging for detailed output"
    )]
    pub debug: bool,

    // 关闭超时
    #[arg(
        long = "shutdown-timeout",
        help = "Maximum time in seconds to wait for complete shutdown",
        default_value_t = shutdown_timeout::DEFAULT
    )]
    pub shutdown_timeout: u64,
}

impl Args {
    // 解析命令行参数
    pub fn parse_args() -> Self {
        Args::parse()
    }

    // 验证参数
    pub fn validation(&self) -> Result<(), AppError> {
        if self.shutdown_timeout < shutdown_timeout::MIN
            || self.shutdown_timeout > shutdown_timeout::MAX
        {
            return Err(AppError::InvalidShutdownTimeout {
                min: shutdown_timeout::MIN,
                max: shutdown_timeout::MAX,
            });
        }
        Ok(())
    }
}
