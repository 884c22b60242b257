use dohrelay::{
    create_selector, subsystem_names, AdminServer, AppError, Args, BoundedFetcher, Config,
    DoHProxy, DoHServer, HttpClient, ProxySettings,
};
use mimalloc::MiMalloc;
use std::process;
use std::sync::Arc;
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// 使用 mimalloc 分配器提高内存效率
#[global_allocator]
static GLOBAL: MiMalloc = mimalloc::MiMalloc;

fn init_logging(args: &Args) {
    // 如果启用调试模式，输出调试信息，否则只输出 info 及以上级别；RUST_LOG 优先
    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_line_number(false)
        .with_env_filter(filter)
        .init();
}

// 程序入口
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志
    init_logging(&args);

    // 验证参数
    if let Err(e) = args.validation() {
        error!("Invalid command line arguments: {}", e);
        process::exit(1);
    }

    info!("Starting dohrelay DNS-over-HTTPS forwarding proxy");

    // 加载配置
    let config = match Config::load(&args) {
        Ok(config) => {
            info!(
                "Successfully loaded configuration, {} upstream servers, strategy: {}",
                config.upstreams.len(),
                config.selector.strategy
            );
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // 如果是测试模式，成功验证配置后退出
    if args.test_config {
        info!("Configuration validation successful");
        return Ok(());
    }

    // 创建应用组件
    let components = match create_components(config) {
        Ok(components) => components,
        Err(e) => {
            error!("Failed to create application components: {}", e);
            process::exit(1);
        }
    };

    // 创建优雅关闭顶层管理器
    let toplevel = Toplevel::new(|s| async move {
        // 启动DoH服务器子系统
        let doh_server = components.doh_server;
        s.start(SubsystemBuilder::new(
            subsystem_names::DOH_SERVER,
            move |s| async move { doh_server.run(s).await },
        ));
        // 启动管理服务器子系统
        if let Some(admin_server) = components.admin_server {
            s.start(SubsystemBuilder::new(
                subsystem_names::ADMIN_SERVER,
                move |s| async move { admin_server.run(s).await },
            ));
        }
    });

    // 等待关闭
    info!("All services started, waiting for requests...");
    match toplevel
        .catch_signals()
        .handle_shutdown_requests(tokio::time::Duration::from_secs(args.shutdown_timeout))
        .await
    {
        Ok(_) => {
            info!("Application gracefully shut down");
            Ok(())
        }
        Err(e) => {
            error!("Application shutdown error: {}", e);
            process::exit(1);
        }
    }
}

// 应用组件
struct AppComponents {
    // DoH 服务器
    doh_server: DoHServer,
    // 管理服务器（可选）
    admin_server: Option<AdminServer>,
}

// 创建应用组件
fn create_components(config: Config) -> Result<AppComponents, AppError> {
    // 创建上游HTTP客户端，连接复用由客户端连接池负责
    let client = HttpClient::create(&config.http_client)?;
    let fetcher = BoundedFetcher::new(client);

    // 创建上游选择器
    let selector = create_selector(&config.selector, fetcher.clone());
    info!(
        "Upstream selector initialized: {}, probe timeout: {}ms, forward timeout: {}ms",
        selector.strategy(),
        config.selector.probe_timeout_ms,
        config.selector.forward_timeout_ms
    );

    // 创建代理编排器
    let proxy = Arc::new(DoHProxy::new(
        config.endpoints(),
        selector,
        fetcher,
        ProxySettings {
            forward_timeout: config.selector.forward_timeout(),
            cors_on_errors: config.server.cors_on_errors,
        },
    ));

    // 创建 DoH 服务器
    let doh_server = DoHServer::new(
        config.server.listen.parse()?,
        config.server.path.clone(),
        config.server.max_body_size,
        proxy,
    );

    // 创建管理服务器
    let admin_server = match &config.admin {
        Some(admin_config) => Some(AdminServer::new(admin_config.listen.parse()?)),
        None => {
            info!("Admin server configuration not provided, admin server disabled");
            None
        }
    };

    info!(
        "DoH server initialized with HTTP: {}{}",
        config.server.listen, config.server.path
    );

    // 返回应用组件
    Ok(AppComponents {
        doh_server,
        admin_server,
    })
}
