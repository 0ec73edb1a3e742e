use super::*;
use crate::error::ApiError;
use crate::request::mock::{BASE_URL, MockHttpClient};
use crate::request::{HttpMethod, HttpResponse};
use crate::storage::MemoryTokenStore;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::time::Duration;

// =========================================================
// 辅助函数
// =========================================================

const ME: &str = "/users/me";

/// 安装测试日志订阅器，`RUST_LOG` 控制输出级别
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 生成一个 `exp = now + offset_secs` 的未签名令牌
fn token_expiring_in(sub: &str, offset_secs: i64) -> String {
    let exp = Timestamp::now().as_unix_secs() + offset_secs;
    let payload = format!(r#"{{"sub":"{sub}","exp":{exp}}}"#);
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}

fn valid_token(sub: &str) -> String {
    token_expiring_in(sub, 3600)
}

fn user_json(id: i64, email: &str) -> String {
    format!(r#"{{"id":{id},"email":"{email}","is_active":true,"is_superuser":false}}"#)
}

fn admin_json(id: i64, email: &str) -> String {
    format!(r#"{{"id":{id},"email":"{email}","is_active":true,"is_superuser":true}}"#)
}

fn create_manager(
    mock: &MockHttpClient,
    store: &MemoryTokenStore,
) -> SessionManager<MockHttpClient, MemoryTokenStore> {
    SessionManager::new(ApiClient::new(BASE_URL, mock.clone()), store.clone())
}

fn record_statuses(
    manager: &SessionManager<MockHttpClient, MemoryTokenStore>,
) -> Rc<RefCell<Vec<AuthStatus>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    manager.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.status));
    seen
}

// =========================================================
// 启动验证
// =========================================================

#[tokio::test]
async fn test_starts_unknown_even_with_stored_token() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(valid_token("a@x.io"));
    let manager = create_manager(&mock, &store);

    assert_eq!(manager.status(), AuthStatus::Unknown);
    assert!(manager.user().is_none());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_no_token_resolves_without_network() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert!(mock.requests().is_empty());
    assert!(manager.user().is_none());
}

#[tokio::test]
async fn test_empty_stored_token_counts_as_absent() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token("");
    let manager = create_manager(&mock, &store);

    assert_eq!(manager.token(), None);
    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_expired_token_fails_locally() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(token_expiring_in("a@x.io", -60));
    let manager = create_manager(&mock, &store);

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert!(mock.requests().is_empty());
    assert_eq!(store.peek(), None);
    assert_eq!(manager.token(), None);
}

#[tokio::test]
async fn test_unreadable_token_fails_locally() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token("not-a-jwt");
    let manager = create_manager(&mock, &store);

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert!(mock.requests().is_empty());
    assert_eq!(store.peek(), None);
}

#[tokio::test]
async fn test_token_without_expiry_is_checked_by_server() {
    init_tracing();
    let mock = MockHttpClient::new();
    let token = format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(r#"{"sub":"a@x.io"}"#)
    );
    let store = MemoryTokenStore::with_token(token.clone());
    let manager = create_manager(&mock, &store);
    mock.reply(HttpMethod::Get, ME, 200, &user_json(3, "a@x.io"));

    assert_eq!(manager.verify_session().await, AuthStatus::Authenticated);
    assert_eq!(mock.count(HttpMethod::Get, ME), 1);
    assert_eq!(store.peek(), Some(token));
}

#[tokio::test]
async fn test_valid_token_authenticates() {
    let mock = MockHttpClient::new();
    let token = valid_token("a@x.io");
    let store = MemoryTokenStore::with_token(token.clone());
    let manager = create_manager(&mock, &store);
    mock.reply(HttpMethod::Get, ME, 200, &user_json(7, "a@x.io"));

    assert_eq!(manager.verify_session().await, AuthStatus::Authenticated);

    let user = manager.user().unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.email, "a@x.io");
    assert_eq!(store.peek(), Some(token.clone()));

    let req = &mock.requests()[0];
    assert_eq!(req.header("Authorization"), Some(format!("Bearer {token}").as_str()));
    assert!(!manager.is_admin());
}

#[tokio::test]
async fn test_superuser_is_admin() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(valid_token("root@x.io"));
    let manager = create_manager(&mock, &store);
    mock.reply(HttpMethod::Get, ME, 200, &admin_json(1, "root@x.io"));

    manager.verify_session().await;
    assert!(manager.is_admin());
    assert!(manager.snapshot().is_admin());
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(valid_token("a@x.io"));
    let manager = create_manager(&mock, &store);
    mock.reply(HttpMethod::Get, ME, 401, r#"{"detail":"Could not validate credentials"}"#);

    let before = manager.generation();
    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);

    assert_eq!(store.peek(), None);
    assert_eq!(manager.token(), None);
    assert!(manager.user().is_none());
    assert!(manager.generation() > before);
}

#[tokio::test]
async fn test_malformed_profile_is_a_failure() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(valid_token("a@x.io"));
    let manager = create_manager(&mock, &store);
    mock.reply(HttpMethod::Get, ME, 200, r#"{"unexpected":true}"#);

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert_eq!(store.peek(), None);
}

#[tokio::test]
async fn test_network_error_is_a_failure() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(valid_token("a@x.io"));
    let manager = create_manager(&mock, &store);
    mock.fail(HttpMethod::Get, ME, ApiError::Network("connection refused".into()));

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert_eq!(store.peek(), None);
}

#[tokio::test]
async fn test_timeout_is_a_failure() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(valid_token("a@x.io"));
    let manager = create_manager(&mock, &store);
    mock.fail(HttpMethod::Get, ME, ApiError::Timeout(Duration::from_secs(15)));

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert!(manager.user().is_none());
}

// =========================================================
// 注销
// =========================================================

#[tokio::test]
async fn test_logout_is_immediate() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(valid_token("a@x.io"));
    let manager = create_manager(&mock, &store);
    mock.reply(HttpMethod::Get, ME, 200, &user_json(7, "a@x.io"));
    manager.verify_session().await;
    let sent = mock.requests().len();

    manager.logout();

    assert_eq!(manager.status(), AuthStatus::Unauthenticated);
    assert!(manager.user().is_none());
    assert_eq!(manager.token(), None);
    assert_eq!(store.peek(), None);
    assert_eq!(mock.requests().len(), sent);
}

// =========================================================
// 登录与注册
// =========================================================

#[tokio::test]
async fn test_login_end_to_end() {
    init_tracing();
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);
    manager.verify_session().await;
    let seen = record_statuses(&manager);

    let token = valid_token("a@x.io");
    mock.reply(
        HttpMethod::Post,
        "/auth/token",
        200,
        &format!(r#"{{"access_token":"{token}","token_type":"bearer"}}"#),
    );
    mock.reply(HttpMethod::Get, ME, 200, &user_json(7, "a@x.io"));

    assert_eq!(manager.login(" a@x.io ", "hunter22").await, Ok(()));

    assert_eq!(manager.status(), AuthStatus::Authenticated);
    assert_eq!(manager.user().unwrap().email, "a@x.io");
    assert_eq!(store.peek(), Some(token));
    assert_eq!(
        *seen.borrow(),
        vec![AuthStatus::Unknown, AuthStatus::Authenticated]
    );
    assert_eq!(mock.count(HttpMethod::Get, ME), 1);

    let login = &mock.requests()[0];
    assert_eq!(
        login.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        login.body.as_deref(),
        Some("username=a%40x.io&password=hunter22")
    );
}

#[tokio::test]
async fn test_login_failure_shows_server_detail() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);
    mock.reply(
        HttpMethod::Post,
        "/auth/token",
        401,
        r#"{"detail":"Incorrect email or password"}"#,
    );

    assert_eq!(
        manager.login("a@x.io", "wrong").await,
        Err("Incorrect email or password".to_string())
    );
    assert_eq!(store.peek(), None);
    assert_eq!(mock.count(HttpMethod::Get, ME), 0);
}

#[tokio::test]
async fn test_login_failure_without_detail_uses_fallback() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);
    mock.reply(HttpMethod::Post, "/auth/token", 500, "Internal Server Error");

    assert_eq!(
        manager.login("a@x.io", "pw").await,
        Err(LOGIN_FAILED.to_string())
    );
}

#[tokio::test]
async fn test_login_with_rejected_token_reports_error() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);
    let token = valid_token("a@x.io");
    mock.reply(
        HttpMethod::Post,
        "/auth/token",
        200,
        &format!(r#"{{"access_token":"{token}"}}"#),
    );
    mock.reply(HttpMethod::Get, ME, 403, r#"{"detail":"Inactive user"}"#);

    assert_eq!(
        manager.login("a@x.io", "pw").await,
        Err(SESSION_REJECTED.to_string())
    );
    assert_eq!(manager.status(), AuthStatus::Unauthenticated);
    assert_eq!(store.peek(), None);
}

#[tokio::test]
async fn test_register_does_not_touch_session() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);
    manager.verify_session().await;
    mock.reply(HttpMethod::Post, "/auth/register", 200, &user_json(9, "new@x.io"));

    assert_eq!(manager.register("new@x.io", "longenough").await, Ok(()));
    assert_eq!(manager.status(), AuthStatus::Unauthenticated);

    let req = &mock.requests()[0];
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["email"], "new@x.io");
}

#[tokio::test]
async fn test_register_failure_messages() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);
    mock.reply(
        HttpMethod::Post,
        "/auth/register",
        400,
        r#"{"detail":"Email already registered"}"#,
    );
    mock.fail(HttpMethod::Post, "/auth/register", ApiError::Network("down".into()));

    assert_eq!(
        manager.register("a@x.io", "pw").await,
        Err("Email already registered".to_string())
    );
    assert_eq!(
        manager.register("a@x.io", "pw").await,
        Err(REGISTER_FAILED.to_string())
    );
}

// =========================================================
// 竞态：最后发起的验证生效
// =========================================================

#[tokio::test]
async fn test_late_success_of_superseded_token_is_discarded() {
    init_tracing();
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);

    let release_a = mock.gate(HttpMethod::Get, ME);
    mock.reply(HttpMethod::Get, ME, 200, &user_json(2, "b@x.io"));

    let verify_a = manager.set_token(Some(valid_token("a@x.io")));
    futures::pin_mut!(verify_a);
    assert!(futures::poll!(verify_a.as_mut()).is_pending());
    assert_eq!(manager.status(), AuthStatus::Unknown);

    let token_b = valid_token("b@x.io");
    assert_eq!(
        manager.set_token(Some(token_b.clone())).await,
        AuthStatus::Authenticated
    );

    release_a
        .send(Ok(HttpResponse::new(200, user_json(1, "a@x.io"))))
        .unwrap();
    verify_a.await;

    assert_eq!(manager.status(), AuthStatus::Authenticated);
    assert_eq!(manager.user().unwrap().email, "b@x.io");
    assert_eq!(store.peek(), Some(token_b));
}

#[tokio::test]
async fn test_late_failure_of_superseded_token_keeps_new_session() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);

    let release_a = mock.gate(HttpMethod::Get, ME);
    mock.reply(HttpMethod::Get, ME, 200, &user_json(2, "b@x.io"));

    let verify_a = manager.set_token(Some(valid_token("a@x.io")));
    futures::pin_mut!(verify_a);
    assert!(futures::poll!(verify_a.as_mut()).is_pending());

    let token_b = valid_token("b@x.io");
    manager.set_token(Some(token_b.clone())).await;

    release_a
        .send(Ok(HttpResponse::new(401, r#"{"detail":"expired"}"#)))
        .unwrap();
    verify_a.await;

    assert_eq!(manager.status(), AuthStatus::Authenticated);
    assert_eq!(manager.token(), Some(token_b.clone()));
    assert_eq!(store.peek(), Some(token_b));
}

#[tokio::test]
async fn test_logout_during_verification_wins() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::with_token(valid_token("a@x.io"));
    let manager = create_manager(&mock, &store);
    let release = mock.gate(HttpMethod::Get, ME);

    let verify = manager.verify_session();
    futures::pin_mut!(verify);
    assert!(futures::poll!(verify.as_mut()).is_pending());

    manager.logout();
    release
        .send(Ok(HttpResponse::new(200, user_json(1, "a@x.io"))))
        .unwrap();

    assert_eq!(verify.await, AuthStatus::Unauthenticated);
    assert!(manager.user().is_none());
    assert_eq!(store.peek(), None);
}

// =========================================================
// 订阅
// =========================================================

#[tokio::test]
async fn test_unsubscribed_listener_is_not_called() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);

    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let id = manager.subscribe(move |_| *counter.borrow_mut() += 1);

    manager.verify_session().await;
    assert_eq!(*calls.borrow(), 1);

    manager.unsubscribe(id);
    manager.set_token(Some(token_expiring_in("a@x.io", -5))).await;
    assert_eq!(*calls.borrow(), 1);
}

#[tokio::test]
async fn test_listener_may_read_manager() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);

    let observed = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&observed);
    let reader = manager.clone();
    manager.subscribe(move |_| *sink.borrow_mut() = Some(reader.status()));

    manager.verify_session().await;
    assert_eq!(*observed.borrow(), Some(AuthStatus::Unauthenticated));
}

#[tokio::test]
async fn test_unchanged_snapshot_does_not_notify() {
    let mock = MockHttpClient::new();
    let store = MemoryTokenStore::new();
    let manager = create_manager(&mock, &store);
    manager.verify_session().await;
    let seen = record_statuses(&manager);

    manager.verify_session().await;
    manager.logout();

    assert!(seen.borrow().is_empty());
}
