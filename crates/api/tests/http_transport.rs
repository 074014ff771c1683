use std::time::Duration;

use precast_api::{ApiError, ClientConfig, HttpApi, Transport};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One-shot HTTP server answering the first request with `response`.
/// Returns the base URL and a handle yielding the raw request (head and body).
async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let request = read_request(&mut sock).await;
        sock.write_all(response.as_bytes()).await.unwrap();
        sock.shutdown().await.ok();
        request
    });
    (format!("http://{}/api", addr), handle)
}

/// Read until the end of the head, then `content-length` bytes of body.
async fn read_request(sock: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let want = text[..end]
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + want {
                return text;
            }
        }
        let n = sock.read(&mut chunk).await.unwrap();
        if n == 0 {
            return String::from_utf8_lossy(&buf).to_string();
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn cfg(base_url: String) -> ClientConfig {
    ClientConfig { base_url, token: Some("t0k".into()), timeout: Duration::from_secs(5), ..Default::default() }
}

#[tokio::test]
async fn get_sends_query_and_bearer_and_parses_json() {
    let body = r#"{"data":[{"id":1}]}"#;
    let resp: &'static str = Box::leak(
        format!("HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}", body.len(), body)
            .into_boxed_str(),
    );
    let (base, server) = serve_once(resp).await;
    let api = HttpApi::new(&cfg(base)).unwrap();
    let out = api
        .get("/elements/7", &[("page".into(), "1".into()), ("hierarchy_id".into(), "3".into())])
        .await
        .unwrap();
    assert_eq!(out.status, 200);
    assert_eq!(out.body["data"][0]["id"], 1);
    let head = server.await.unwrap();
    assert!(head.starts_with("GET /api/elements/7?page=1&hierarchy_id=3 HTTP/1.1"), "{}", head);
    assert!(head.to_ascii_lowercase().contains("authorization: bearer t0k"));
}

#[tokio::test]
async fn post_sends_json_body() {
    let body = r#"{"id":31}"#;
    let resp: &'static str = Box::leak(
        format!("HTTP/1.1 201 Created\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}", body.len(), body)
            .into_boxed_str(),
    );
    let (base, server) = serve_once(resp).await;
    let api = HttpApi::new(&cfg(base)).unwrap();
    let payload = json!({ "vehicle_number": "KA-01", "items": [4, 5] });
    let out = api.post("/dispatch_orders/7", &payload).await.unwrap();
    assert_eq!(out.status, 201);
    assert_eq!(out.body["id"], 31);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/dispatch_orders/7 HTTP/1.1"), "{}", request);
    let lower = request.to_ascii_lowercase();
    assert!(lower.contains("content-type: application/json"), "{}", request);
    assert!(lower.contains("authorization: bearer t0k"));
    let (_, sent) = request.split_once("\r\n\r\n").unwrap();
    let sent: serde_json::Value = serde_json::from_str(sent).unwrap();
    assert_eq!(sent, payload);
}

#[tokio::test]
async fn error_status_is_a_response_not_an_error() {
    let body = r#"{"message":"DB down"}"#;
    let resp: &'static str = Box::leak(
        format!("HTTP/1.1 500 Internal Server Error\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}", body.len(), body)
            .into_boxed_str(),
    );
    let (base, _server) = serve_once(resp).await;
    let api = HttpApi::new(&cfg(base)).unwrap();
    let out = api.get("/elements/7", &[]).await.unwrap();
    assert_eq!(out.status, 500);
    let err = ApiError::from_status(out.status, &out.body);
    assert_eq!(err.user_message().as_deref(), Some("DB down"));
}

#[tokio::test]
async fn non_json_body_parses_to_null() {
    let (base, _server) =
        serve_once("HTTP/1.1 502 Bad Gateway\r\ncontent-length: 5\r\nconnection: close\r\n\r\noops!").await;
    let api = HttpApi::new(&cfg(base)).unwrap();
    let out = api.get("/x", &[]).await.unwrap();
    assert_eq!(out.status, 502);
    assert!(out.body.is_null());
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let (sock, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(sock);
    });
    let api = HttpApi::new(&ClientConfig {
        base_url: format!("http://{}", addr),
        timeout: Duration::from_millis(150),
        ..Default::default()
    })
    .unwrap();
    let err = api.get("/slow", &[]).await.unwrap_err();
    assert_eq!(err, ApiError::Timeout);
    assert_eq!(err.user_message().as_deref(), Some("Request timed out. Please try again later."));
}
