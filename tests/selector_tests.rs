use assert_matches::assert_matches;
use axum::http::{HeaderMap, Method, Uri};
use bytes::Bytes;
use dohrelay::config::{HttpClientConfig, SelectionStrategy, SelectorConfig};
use dohrelay::error::SelectError;
use dohrelay::selector::{
    create_selector, pick_fastest, probe_url, LatencyProbeSelector, ProbeResult,
    RaceForwardSelector, Selection, UpstreamSelector,
};
use dohrelay::upstream::{BoundedFetcher, HttpClient, InboundRequest, ResolverEndpoint};
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn create_fetcher() -> BoundedFetcher {
    let client = HttpClient::create(&HttpClientConfig::default()).unwrap();
    BoundedFetcher::new(client)
}

fn json_query() -> InboundRequest {
    let uri: Uri = "/dns-query?name=example.com&type=A".parse().unwrap();
    InboundRequest::new(Method::GET, &uri, &HeaderMap::new(), Bytes::new())
}

fn result(endpoint: &str, latency_ms: Option<u64>) -> ProbeResult {
    ProbeResult {
        endpoint: ResolverEndpoint::new(endpoint),
        latency: latency_ms.map(Duration::from_millis),
    }
}

// 挂载探测应答：探测请求落在上游根路径上
async fn mount_probe(server: &MockServer, status: u16, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("name", "example.com"))
        .and(query_param("type", "A"))
        .and(header("accept", "application/dns-json"))
        .respond_with(ResponseTemplate::new(status).set_delay(delay))
        .mount(server)
        .await;
}

// 挂载转发应答
async fn mount_answer(server: &MockServer, status: u16, body: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[test]
fn test_pick_fastest_minimum() {
    let results = vec![
        result("https://a.example", Some(120)),
        result("https://b.example", Some(40)),
        result("https://c.example", Some(80)),
    ];
    assert_eq!(
        pick_fastest(&results).map(|e| e.as_str()),
        Some("https://b.example")
    );
}

#[test]
fn test_pick_fastest_tie_prefers_pool_order() {
    let results = vec![
        result("https://a.example", Some(90)),
        result("https://b.example", Some(30)),
        result("https://c.example", Some(30)),
    ];
    assert_eq!(
        pick_fastest(&results).map(|e| e.as_str()),
        Some("https://b.example")
    );
}

#[test]
fn test_pick_fastest_skips_failed_probes() {
    let results = vec![
        result("https://a.example", None),
        result("https://b.example", Some(500)),
    ];
    assert_eq!(
        pick_fastest(&results).map(|e| e.as_str()),
        Some("https://b.example")
    );

    let all_failed = vec![result("https://a.example", None), result("https://b.example", None)];
    assert!(pick_fastest(&all_failed).is_none());
    assert!(pick_fastest(&[]).is_none());
}

#[test]
fn test_probe_url() {
    let url = probe_url(&ResolverEndpoint::new("https://dns.google/resolve")).unwrap();
    assert_eq!(
        url.as_str(),
        "https://dns.google/resolve?name=example.com&type=A"
    );

    // 已有的 name/type 参数被替换，其他参数保留
    let url = probe_url(&ResolverEndpoint::new(
        "https://dns.example/dns-query?name=other.org&ct=json&type=MX",
    ))
    .unwrap();
    assert_eq!(
        url.as_str(),
        "https://dns.example/dns-query?ct=json&name=example.com&type=A"
    );

    assert!(probe_url(&ResolverEndpoint::new("not a url")).is_err());
}

#[test]
fn test_create_selector_by_strategy() {
    let mut config = SelectorConfig::default();
    assert_eq!(
        create_selector(&config, create_fetcher()).strategy(),
        SelectionStrategy::Latency
    );

    config.strategy = SelectionStrategy::Race;
    assert_eq!(
        create_selector(&config, create_fetcher()).strategy(),
        SelectionStrategy::Race
    );
}

#[tokio::test]
async fn test_latency_selects_fastest() {
    let slow = MockServer::start().await;
    let fast = MockServer::start().await;
    mount_probe(&slow, 200, Duration::from_millis(300)).await;
    mount_probe(&fast, 200, Duration::ZERO).await;

    let selector = LatencyProbeSelector::new(create_fetcher(), Duration::from_secs(2));
    let pool = vec![
        ResolverEndpoint::new(slow.uri()),
        ResolverEndpoint::new(fast.uri()),
    ];

    let selection = selector.select(&pool, &json_query()).await.unwrap();
    assert_matches!(selection, Selection::Endpoint(ref e) if e.as_str() == fast.uri());
}

#[tokio::test]
async fn test_latency_probes_every_upstream() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(server)
            .await;
    }

    let selector = LatencyProbeSelector::new(create_fetcher(), Duration::from_secs(2));
    let pool = vec![
        ResolverEndpoint::new(first.uri()),
        ResolverEndpoint::new(second.uri()),
    ];

    let results = selector.probe_all(&pool).await;
    assert_eq!(results.len(), 2);
    // 结果保持池顺序
    assert_eq!(results[0].endpoint, pool[0]);
    assert_eq!(results[1].endpoint, pool[1]);
    assert!(results.iter().all(|r| r.latency.is_some()));
}

#[tokio::test]
async fn test_latency_skips_non_success_probe() {
    let broken = MockServer::start().await;
    let healthy = MockServer::start().await;
    mount_probe(&broken, 500, Duration::ZERO).await;
    mount_probe(&healthy, 200, Duration::from_millis(100)).await;

    let selector = LatencyProbeSelector::new(create_fetcher(), Duration::from_secs(2));
    let pool = vec![
        ResolverEndpoint::new(broken.uri()),
        ResolverEndpoint::new(healthy.uri()),
    ];

    let selection = selector.select(&pool, &json_query()).await.unwrap();
    assert_eq!(selection.endpoint().as_str(), healthy.uri());
}

#[tokio::test]
async fn test_latency_skips_timed_out_probe() {
    let stalled = MockServer::start().await;
    let healthy = MockServer::start().await;
    mount_probe(&stalled, 200, Duration::from_secs(3)).await;
    mount_probe(&healthy, 200, Duration::ZERO).await;

    let selector = LatencyProbeSelector::new(create_fetcher(), Duration::from_millis(300));
    let pool = vec![
        ResolverEndpoint::new(stalled.uri()),
        ResolverEndpoint::new(healthy.uri()),
    ];

    let started = std::time::Instant::now();
    let selection = selector.select(&pool, &json_query()).await.unwrap();
    assert_eq!(selection.endpoint().as_str(), healthy.uri());
    // 探测阶段受探测超时约束
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_latency_no_available_upstream() {
    let broken = MockServer::start().await;
    mount_probe(&broken, 502, Duration::ZERO).await;

    let selector = LatencyProbeSelector::new(create_fetcher(), Duration::from_millis(500));
    let pool = vec![
        ResolverEndpoint::new(broken.uri()),
        ResolverEndpoint::new("not a url"),
    ];

    let result = selector.select(&pool, &json_query()).await;
    assert_matches!(result, Err(SelectError::NoAvailableUpstream));
}

#[tokio::test]
async fn test_race_returns_pool_order_winner() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    // 池中靠前的上游更慢，但仍然胜出
    mount_answer(&first, 200, "first", Duration::from_millis(300)).await;
    mount_answer(&second, 200, "second", Duration::ZERO).await;

    let selector = RaceForwardSelector::new(create_fetcher(), Duration::from_secs(2));
    let pool = vec![
        ResolverEndpoint::new(first.uri()),
        ResolverEndpoint::new(second.uri()),
    ];

    let selection = selector.select(&pool, &json_query()).await.unwrap();
    match selection {
        Selection::Response { endpoint, response } => {
            assert_eq!(endpoint.as_str(), first.uri());
            assert_eq!(response.text().await.unwrap(), "first");
        }
        other => panic!("expected relayed response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_race_skips_failed_upstreams() {
    let broken = MockServer::start().await;
    let stalled = MockServer::start().await;
    let healthy = MockServer::start().await;
    mount_answer(&broken, 500, "oops", Duration::ZERO).await;
    mount_answer(&stalled, 200, "late", Duration::from_secs(3)).await;
    mount_answer(&healthy, 200, "ok", Duration::from_millis(50)).await;

    let selector = RaceForwardSelector::new(create_fetcher(), Duration::from_millis(500));
    let pool = vec![
        ResolverEndpoint::new(broken.uri()),
        ResolverEndpoint::new(stalled.uri()),
        ResolverEndpoint::new(healthy.uri()),
    ];

    let selection = selector.select(&pool, &json_query()).await.unwrap();
    assert_eq!(selection.endpoint().as_str(), healthy.uri());
}

#[tokio::test]
async fn test_race_forwards_query_to_every_upstream() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        Mock::given(method("GET"))
            .and(path("/dns-query"))
            .and(query_param("name", "example.com"))
            .and(query_param("type", "A"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(server)
            .await;
    }

    let selector = RaceForwardSelector::new(create_fetcher(), Duration::from_secs(1));
    let pool = vec![
        ResolverEndpoint::new(first.uri()),
        ResolverEndpoint::new(second.uri()),
    ];

    let result = selector.select(&pool, &json_query()).await;
    assert_matches!(result, Err(SelectError::AllUpstreamsFailed));
}
