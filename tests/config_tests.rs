use assert_matches::assert_matches;
use dohrelay::config::{parse_server_list, Config, SelectionStrategy};
use dohrelay::error::ConfigError;
use dohrelay::Args;
use std::io::Write;
use tempfile::NamedTempFile;

// 辅助函数：创建临时配置文件
fn create_temp_config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_basic_config_loading() {
    let config_content = r#"
server:
  listen: "127.0.0.1:8053"
selector:
  strategy: race
upstreams:
  - "https://dns.google/dns-query"
  - "https://cloudflare-dns.com/dns-query"
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(
        result.is_ok(),
        "Failed to load valid config: {:?}",
        result.err()
    );
    let config = result.unwrap();

    // 验证基本配置值
    assert_eq!(config.server.listen, "127.0.0.1:8053");
    assert_eq!(config.selector.strategy, SelectionStrategy::Race);
    assert_eq!(
        config.upstreams,
        vec![
            "https://dns.google/dns-query".to_string(),
            "https://cloudflare-dns.com/dns-query".to_string()
        ]
    );

    // 验证默认值
    assert_eq!(config.server.path, "/dns-query");
    assert!(config.server.cors_on_errors);
    assert_eq!(config.server.max_body_size, 65535);
    assert_eq!(config.selector.probe_timeout_ms, 3000);
    assert_eq!(config.selector.forward_timeout_ms, 5000);
    assert!(config.admin.is_none());
    assert_eq!(config.http_client.connect_timeout, 3);
    assert!(!config.http_client.insecure);
}

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.selector.strategy, SelectionStrategy::Latency);
    assert!(!config.upstreams.is_empty());
}

#[test]
fn test_full_config_loading() {
    let config_content = r#"
server:
  listen: "0.0.0.0:8443"
  path: "/resolve"
  cors_on_errors: false
  max_body_size: 4096
admin:
  listen: "127.0.0.1:9100"
http_client:
  connect_timeout: 5
  idle_timeout: 60
  keepalive: 30
  agent: "dohrelay-test"
  insecure: true
selector:
  strategy: latency
  probe_timeout_ms: 1500
  forward_timeout_ms: 2500
upstreams:
  - "https://dns.quad9.net/dns-query"
"#;

    let file = create_temp_config_file(config_content);
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.server.path, "/resolve");
    assert!(!config.server.cors_on_errors);
    assert_eq!(config.server.max_body_size, 4096);
    assert_eq!(config.admin.unwrap().listen, "127.0.0.1:9100");
    assert_eq!(config.http_client.idle_timeout, Some(60));
    assert_eq!(config.http_client.agent.as_deref(), Some("dohrelay-test"));
    assert!(config.http_client.insecure);
    assert_eq!(config.selector.probe_timeout().as_millis(), 1500);
    assert_eq!(config.selector.forward_timeout().as_millis(), 2500);
}

#[test]
fn test_empty_upstreams_rejected() {
    let config_content = r#"
upstreams: []
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert_matches!(result, Err(ConfigError::ValidationError(ref msg)) if msg.contains("upstreams"));
}

#[test]
fn test_invalid_upstream_url_rejected() {
    let config_content = r#"
upstreams:
  - "https://dns.google/dns-query"
  - "not a url"
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert_matches!(result, Err(ConfigError::ValidationError(ref msg)) if msg.contains("upstreams"));
}

#[test]
fn test_invalid_listen_address_rejected() {
    let config_content = r#"
server:
  listen: "not-an-address"
"#;

    let file = create_temp_config_file(config_content);
    assert_matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ValidationError(_))
    );
}

#[test]
fn test_invalid_query_path_rejected() {
    let config_content = r#"
server:
  path: "dns-query"
"#;

    let file = create_temp_config_file(config_content);
    assert_matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ValidationError(_))
    );
}

#[test]
fn test_timeout_limits() {
    // 超时过小
    let config_content = r#"
selector:
  probe_timeout_ms: 0
"#;
    let file = create_temp_config_file(config_content);
    assert!(Config::from_file(file.path()).is_err());

    // 超时过大
    let config_content = r#"
selector:
  forward_timeout_ms: 3600000
"#;
    let file = create_temp_config_file(config_content);
    assert!(Config::from_file(file.path()).is_err());

    // 空闲超时过小
    let config_content = r#"
http_client:
  idle_timeout: 1
"#;
    let file = create_temp_config_file(config_content);
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_unknown_strategy_rejected() {
    let config_content = r#"
selector:
  strategy: random
"#;

    let file = create_temp_config_file(config_content);
    assert_matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    );
}

#[test]
fn test_missing_config_file() {
    assert_matches!(
        Config::from_file("/nonexistent/dohrelay/config.yaml"),
        Err(ConfigError::LoadError(_))
    );
}

#[test]
fn test_parse_server_list() {
    assert_eq!(
        parse_server_list("https://a.example/dns-query,https://b.example/dns-query"),
        vec![
            "https://a.example/dns-query".to_string(),
            "https://b.example/dns-query".to_string()
        ]
    );

    // 条目按原样保留，不做裁剪
    assert_eq!(
        parse_server_list("https://a.example,,https://b.example"),
        vec![
            "https://a.example".to_string(),
            String::new(),
            "https://b.example".to_string()
        ]
    );
}

#[test]
fn test_empty_server_entry_fails_validation() {
    let config = Config {
        upstreams: parse_server_list("https://a.example/dns-query,"),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_load_applies_overrides() {
    let config_content = r#"
server:
  listen: "127.0.0.1:8053"
upstreams:
  - "https://file.example/dns-query"
"#;
    let file = create_temp_config_file(config_content);

    let args = Args {
        config: Some(file.path().to_path_buf()),
        servers: Some("https://a.example/dns-query,https://b.example/dns-query".to_string()),
        strategy: Some(SelectionStrategy::Race),
        listen: Some("127.0.0.1:5353".to_string()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    assert_eq!(config.server.listen, "127.0.0.1:5353");
    assert_eq!(config.selector.strategy, SelectionStrategy::Race);
    assert_eq!(
        config
            .endpoints()
            .iter()
            .map(|e| e.as_str().to_string())
            .collect::<Vec<_>>(),
        vec![
            "https://a.example/dns-query".to_string(),
            "https://b.example/dns-query".to_string()
        ]
    );
}

#[test]
fn test_load_without_file_uses_defaults() {
    let config = Config::load(&Args::default()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_rejects_invalid_server_override() {
    let args = Args {
        servers: Some("https://a.example,not-a-url".to_string()),
        ..Args::default()
    };
    assert_matches!(Config::load(&args), Err(ConfigError::ValidationError(_)));
}
