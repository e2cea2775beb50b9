//! Integration tests using wiremock to simulate HTTP servers.

use lightnet::{
    CallOptions, Client, ConnectionStatus, Endpoint, Error, LogLevel, ProgressCallback, Upload,
    UploadKind,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestData {
    id: u32,
    name: String,
}

fn client_for(server: &MockServer) -> Client {
    Client::new(server.uri(), LogLevel::Off).unwrap()
}

fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name)?.to_str().ok()
}

async fn single_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

fn progress_recorder() -> (ProgressCallback, Arc<Mutex<Vec<f64>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (Arc::new(move |p| sink.lock().unwrap().push(p)), seen)
}

#[tokio::test]
async fn test_get_with_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(query_param("q", "a b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let endpoint = Endpoint::get("/api/ping").with_url_param("q", "a b");

    let body = client.request(&endpoint).await.unwrap();
    assert_eq!(&body[..], b"pong");

    let request = single_request(&mock_server).await;
    assert_eq!(request.url.query(), Some("q=a%20b"));
    assert_eq!(
        header(&request, "content-type"),
        Some("application/x-www-form-urlencoded; charset=utf-8")
    );
}

#[tokio::test]
async fn test_post_json_body() {
    let mock_server = MockServer::start().await;

    let response_data = TestData {
        id: 1,
        name: "New".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_json(json!({"name": "New", "tags": ["a", "b"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(&response_data))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let endpoint = Endpoint::post("/items")
        .with_body_param("name", "New")
        .with_body_param("tags", json!(["a", "b"]))
        .with_header("X-Request-Id", "abc123");

    let created: TestData = client.fetch(&endpoint).await.unwrap();
    assert_eq!(created, response_data);

    let request = single_request(&mock_server).await;
    assert_eq!(header(&request, "content-type"), Some("application/json"));
    assert_eq!(header(&request, "x-request-id"), Some("abc123"));
}

#[tokio::test]
async fn test_caller_content_type_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let endpoint = Endpoint::post("/items")
        .with_body_param("name", "x")
        .with_header("Content-Type", "application/vnd.api+json");
    client.request(&endpoint).await.unwrap();

    let request = single_request(&mock_server).await;
    assert_eq!(
        header(&request, "content-type"),
        Some("application/vnd.api+json")
    );
}

#[tokio::test]
async fn test_status_code_boundaries() {
    let mock_server = MockServer::start().await;

    for code in [200u16, 399, 400] {
        Mock::given(method("GET"))
            .and(path(format!("/status/{}", code)))
            .respond_with(ResponseTemplate::new(code).set_body_string("body"))
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);

    assert!(client.request(&Endpoint::get("/status/200")).await.is_ok());
    assert!(client.request(&Endpoint::get("/status/399")).await.is_ok());

    match client.request(&Endpoint::get("/status/400")).await {
        Err(Error::BadStatusCode { status, .. }) => assert_eq!(status.as_u16(), 400),
        other => panic!("Expected BadStatusCode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server exploded"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.request(&Endpoint::get("/test")).await;

    match result {
        Err(Error::BadStatusCode {
            status,
            raw_response,
        }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(raw_response, "Server exploded");
        }
        _ => panic!("Expected BadStatusCode, got {:?}", result),
    }
}

#[tokio::test]
async fn test_no_network_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .reachability(|| ConnectionStatus::Unavailable)
        .build()
        .unwrap();

    let result = client.request(&Endpoint::get("/test")).await;
    assert!(matches!(result, Err(Error::NoNetwork)));

    let upload = Upload::new(UploadKind::Image, vec![1u8, 2, 3]);
    let result = client.upload(&Endpoint::post("/photos"), &upload).await;
    assert!(matches!(result, Err(Error::NoNetwork)));
}

#[tokio::test]
async fn test_decoding_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.fetch::<TestData>(&Endpoint::get("/test")).await;

    match result {
        Err(Error::DecodingFailed {
            raw_response,
            serde_error,
        }) => {
            assert_eq!(raw_response, "invalid json");
            assert!(serde_error.contains("expected"));
        }
        _ => panic!("Expected DecodingFailed, got {:?}", result),
    }
}

#[tokio::test]
async fn test_empty_body_is_missing_data_when_decoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let raw = client.request(&Endpoint::get("/empty")).await.unwrap();
    assert!(raw.is_empty());

    let result = client.fetch::<TestData>(&Endpoint::get("/empty")).await;
    assert!(matches!(result, Err(Error::MissingData)));
}

#[tokio::test]
async fn test_transport_failure_is_no_response() {
    // Nothing listens on the discard port.
    let client = Client::new("http://127.0.0.1:9", LogLevel::Off).unwrap();
    let result = client.request(&Endpoint::get("/")).await;

    match result {
        Err(Error::NoResponse(Some(_))) | Err(Error::Timeout) => {}
        other => panic!("Expected NoResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_truncated_body_is_no_response() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        // Promise 100 bytes, deliver 3, then hang up.
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nabc")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = Client::new(format!("http://{}", addr), LogLevel::Off).unwrap();
    let result = client.request(&Endpoint::get("/x")).await;

    match result {
        Err(Error::NoResponse(Some(_))) => {}
        other => panic!("Expected NoResponse with a transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = CallOptions::new().timeout(Duration::from_millis(100));
    let result = client.request_with(&Endpoint::get("/slow"), options).await;

    assert!(matches!(result, Err(Error::Timeout)), "{:?}", result);
}

#[tokio::test]
async fn test_cancel_in_flight() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let options = CallOptions::new().cancel_token(token);
    let result = client.request_with(&Endpoint::get("/slow"), options).await;
    assert!(matches!(result, Err(Error::Cancelled)), "{:?}", result);
}

#[tokio::test]
async fn test_upload_sends_multipart_and_reports_progress() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let endpoint = Endpoint::post("/photos")
        .with_body_param("caption", "Sunrise")
        .with_header("Content-Type", "text/plain");
    let payload: Vec<u8> = (0..40_000u32).map(|i| (i % 251) as u8).collect();
    let upload = Upload::new(UploadKind::Image, payload.clone());

    let (callback, seen) = progress_recorder();
    let options = CallOptions::new().on_progress(callback);
    let body = client.upload_with(&endpoint, &upload, options).await.unwrap();
    assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap(), json!({"ok": true}));

    let request = single_request(&mock_server).await;
    let content_type = header(&request, "content-type").unwrap().to_string();
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .expect("multipart content type");
    assert!(boundary.starts_with("Boundary="));

    let text = String::from_utf8_lossy(&request.body);
    assert!(text.starts_with(&format!("--{}\r\n", boundary)));
    assert!(text.contains("Content-Disposition: form-data; name=\"caption\"\r\n\r\nSunrise\r\n"));
    assert!(text.contains(
        "Content-Disposition: form-data; name=\"file\"; filename=\"placeholder.jpeg\"\r\nContent-Type: image/jpeg\r\n\r\n"
    ));
    assert!(text.ends_with(&format!("--{}--\r\n", boundary)));
    assert!(request
        .body
        .windows(payload.len())
        .any(|window| window == payload.as_slice()));

    let seen = seen.lock().unwrap();
    assert!(seen.len() >= 3, "{:?}", seen);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last().copied(), Some(1.0));
}

#[tokio::test]
async fn test_upload_without_bytes_is_plain_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({"caption": "none"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let endpoint = Endpoint::post("/photos").with_body_param("caption", "none");
    let (callback, seen) = progress_recorder();

    client
        .upload_with(
            &endpoint,
            &Upload::empty(UploadKind::Video),
            CallOptions::new().on_progress(callback),
        )
        .await
        .unwrap();

    let request = single_request(&mock_server).await;
    assert_eq!(header(&request, "content-type"), Some("application/json"));
    // JSON bodies still stream through the observer when an upload was requested.
    assert_eq!(seen.lock().unwrap().last().copied(), Some(1.0));
}

#[tokio::test]
async fn test_concurrent_uploads_keep_their_own_progress() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let endpoint = Endpoint::post("/videos");

    let (first_cb, first_seen) = progress_recorder();
    let (second_cb, second_seen) = progress_recorder();
    let small = Upload::new(UploadKind::Video, vec![1u8; 100]);
    let large = Upload::new(UploadKind::Video, vec![2u8; 100_000]);

    let (a, b) = tokio::join!(
        client.upload_with(&endpoint, &small, CallOptions::new().on_progress(first_cb)),
        client.upload_with(&endpoint, &large, CallOptions::new().on_progress(second_cb)),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(*first_seen.lock().unwrap(), [1.0]);
    let second = second_seen.lock().unwrap();
    assert!(second.len() > 1);
    assert_eq!(second.last().copied(), Some(1.0));
}

#[tokio::test]
async fn test_base_path_prefix_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = Client::new(format!("{}/v1", mock_server.uri()), LogLevel::Off).unwrap();
    client.request(&Endpoint::get("/users/7")).await.unwrap();
}
