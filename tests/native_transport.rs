//! reqwest 传输 + 原生会话，对接本地的一次性 HTTP 服务
#![cfg(feature = "reqwest-client")]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use shawty::shared::Timestamp;
use shawty::{AuthStatus, ClientConfig, native_session};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn valid_token() -> String {
    let exp = Timestamp::now().as_unix_secs() + 3600;
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"ada@x.io","exp":{exp}}}"#))
    )
}

fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        api_base_url: format!("http://{addr}"),
        ..ClientConfig::from_env()
    }
}

/// 接受一个连接，返回固定响应；任务结果为收到的请求头
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];
        while !received.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&received).into_owned()
    });
    (addr, handle)
}

#[tokio::test]
async fn test_native_session_verifies_against_server() {
    let (addr, server) = serve_once(
        "200 OK",
        r#"{"id":7,"email":"ada@x.io","is_active":true,"is_superuser":true}"#,
    )
    .await;
    let token = valid_token();
    let manager = native_session(&config_for(addr), Some(token.clone())).unwrap();

    assert_eq!(manager.status(), AuthStatus::Unknown);
    assert_eq!(manager.verify_session().await, AuthStatus::Authenticated);
    assert!(manager.is_admin());
    assert_eq!(manager.user().unwrap().email, "ada@x.io");

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("get /users/me http/1.1"), "{request}");
    assert!(request.contains(&format!("authorization: bearer {}", token.to_lowercase())));
}

#[tokio::test]
async fn test_native_session_rejected_token_is_dropped() {
    let (addr, server) =
        serve_once("401 Unauthorized", r#"{"detail":"Not authenticated"}"#).await;
    let manager = native_session(&config_for(addr), Some(valid_token())).unwrap();

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert_eq!(manager.token(), None);
    server.await.unwrap();
}

#[tokio::test]
async fn test_native_session_unreachable_server() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let manager = native_session(&config_for(addr), Some(valid_token())).unwrap();

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert!(manager.user().is_none());
}

#[tokio::test]
async fn test_native_session_without_token_skips_network() {
    let manager = native_session(&ClientConfig::from_env(), None).unwrap();
    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
}
