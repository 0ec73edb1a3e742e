//! 端到端导航流程：会话管理器 + 路由守卫，使用脚本化的后端

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use shawty::guard::{self, GuardDecision};
use shawty::shared::Timestamp;
use shawty::{
    ApiClient, ApiResult, AuthStatus, HttpClient, HttpMethod, HttpRequest, HttpResponse, Location,
    MemoryTokenStore, SessionManager,
};
use std::cell::RefCell;
use std::rc::Rc;

const BASE_URL: &str = "http://api.test";
const PASSWORD: &str = "hunter22";

// =========================================================
// 脚本化后端
// =========================================================

#[derive(Clone, Default)]
struct ScriptedBackend {
    token: Rc<String>,
    superuser: bool,
    calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedBackend {
    fn new(superuser: bool) -> Self {
        let exp = Timestamp::now().as_unix_secs() + 3600;
        let token = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"7","exp":{exp}}}"#))
        );
        Self {
            token: Rc::new(token),
            superuser,
            calls: Rc::default(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ScriptedBackend {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let path = req.url.trim_start_matches(BASE_URL).to_string();
        self.calls
            .borrow_mut()
            .push(format!("{} {}", req.method.as_str(), path));

        let bearer = format!("Bearer {}", self.token);
        let resp = match (req.method, path.as_str()) {
            (HttpMethod::Post, "/auth/token") => {
                let body = req.body.unwrap_or_default();
                if body.contains(&format!("password={PASSWORD}")) {
                    HttpResponse::new(
                        200,
                        format!(
                            r#"{{"access_token":"{}","token_type":"bearer"}}"#,
                            self.token
                        ),
                    )
                } else {
                    HttpResponse::new(401, r#"{"detail":"Incorrect email or password"}"#)
                }
            }
            (HttpMethod::Get, "/users/me")
                if req.header("Authorization") == Some(bearer.as_str()) =>
            {
                HttpResponse::new(
                    200,
                    format!(
                        r#"{{"id":7,"email":"ada@x.io","is_active":true,"is_superuser":{}}}"#,
                        self.superuser
                    ),
                )
            }
            (HttpMethod::Get, "/users/me") => {
                HttpResponse::new(401, r#"{"detail":"Not authenticated"}"#)
            }
            _ => HttpResponse::new(404, r#"{"detail":"Not Found"}"#),
        };
        Ok(resp)
    }
}

fn decide(
    manager: &SessionManager<ScriptedBackend, MemoryTokenStore>,
    href: &str,
) -> GuardDecision {
    let location = Location::parse(href);
    guard::evaluate(&location.route(), &location, &manager.snapshot())
}

// =========================================================
// 流程测试
// =========================================================

#[tokio::test]
async fn test_deep_link_login_and_return() {
    let backend = ScriptedBackend::new(false);
    let store = MemoryTokenStore::new();
    let manager = SessionManager::new(ApiClient::new(BASE_URL, backend.clone()), store.clone());

    // 启动阶段：状态未知，任何守卫都不重定向
    assert_eq!(decide(&manager, "/links"), GuardDecision::Loading);
    assert_eq!(decide(&manager, "/login"), GuardDecision::Loading);
    assert_eq!(decide(&manager, "/"), GuardDecision::Allow);

    assert_eq!(manager.verify_session().await, AuthStatus::Unauthenticated);
    assert!(backend.calls().is_empty(), "no token means no network call");

    assert_eq!(
        decide(&manager, "/links"),
        GuardDecision::Redirect("/login?next=%2Flinks".to_string())
    );
    assert_eq!(decide(&manager, "/login?next=%2Flinks"), GuardDecision::Allow);

    manager.login("ada@x.io", PASSWORD).await.expect("login succeeds");
    assert_eq!(manager.status(), AuthStatus::Authenticated);
    assert_eq!(store.peek().as_deref(), Some(backend.token.as_str()));

    // 登录页把用户送回原来的目标
    assert_eq!(
        decide(&manager, "/login?next=%2Flinks"),
        GuardDecision::Redirect("/links".to_string())
    );
    assert_eq!(decide(&manager, "/links"), GuardDecision::Allow);
    assert_eq!(backend.calls(), vec!["POST /auth/token", "GET /users/me"]);
}

#[tokio::test]
async fn test_non_admin_is_sent_to_dashboard() {
    let backend = ScriptedBackend::new(false);
    let store = MemoryTokenStore::with_token(backend.token.as_str());
    let manager = SessionManager::new(ApiClient::new(BASE_URL, backend.clone()), store);

    assert_eq!(manager.verify_session().await, AuthStatus::Authenticated);
    assert_eq!(
        decide(&manager, "/admin/users"),
        GuardDecision::Redirect("/dashboard".to_string())
    );
}

#[tokio::test]
async fn test_admin_reaches_admin_pages() {
    let backend = ScriptedBackend::new(true);
    let store = MemoryTokenStore::with_token(backend.token.as_str());
    let manager = SessionManager::new(ApiClient::new(BASE_URL, backend), store);

    manager.verify_session().await;
    assert!(manager.is_admin());
    assert_eq!(decide(&manager, "/admin"), GuardDecision::Allow);
    assert_eq!(decide(&manager, "/admin/users"), GuardDecision::Allow);
}

#[tokio::test]
async fn test_wrong_password_keeps_user_on_login() {
    let backend = ScriptedBackend::new(false);
    let store = MemoryTokenStore::new();
    let manager = SessionManager::new(ApiClient::new(BASE_URL, backend.clone()), store.clone());
    manager.verify_session().await;

    let err = manager.login("ada@x.io", "nope").await.unwrap_err();
    assert_eq!(err, "Incorrect email or password");
    assert_eq!(manager.status(), AuthStatus::Unauthenticated);
    assert_eq!(store.peek(), None);
    assert_eq!(decide(&manager, "/login"), GuardDecision::Allow);
}

#[tokio::test]
async fn test_logout_locks_protected_pages_again() {
    let backend = ScriptedBackend::new(false);
    let store = MemoryTokenStore::with_token(backend.token.as_str());
    let manager = SessionManager::new(ApiClient::new(BASE_URL, backend.clone()), store.clone());
    manager.verify_session().await;
    assert_eq!(decide(&manager, "/settings"), GuardDecision::Allow);

    manager.logout();

    assert_eq!(store.peek(), None);
    assert_eq!(
        decide(&manager, "/settings"),
        GuardDecision::Redirect("/login?next=%2Fsettings".to_string())
    );
    // 注销不发起网络请求
    assert_eq!(backend.calls(), vec!["GET /users/me"]);
}

#[tokio::test]
async fn test_unlock_and_static_pages_are_open_while_loading() {
    let backend = ScriptedBackend::new(false);
    let manager = SessionManager::new(ApiClient::new(BASE_URL, backend), MemoryTokenStore::new());

    for href in ["/unlock/abc123", "/privacy", "/terms", "/faq", "/no/such/page"] {
        assert_eq!(decide(&manager, href), GuardDecision::Allow, "{href}");
    }
}
