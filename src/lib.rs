//! Shawty 客户端核心
//!
//! 与平台无关的部分：类型化 API 客户端、会话状态机、路由表与守卫。
//! 浏览器端（`frontend`）注入 fetch 传输与 localStorage 存储；
//! 原生构建使用 reqwest 传输与内存存储。

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;
pub mod task;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use guard::GuardDecision;
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use route::{AppRoute, Location, RouteAccess};
pub use session::{AuthStatus, SessionManager, SessionSnapshot};
pub use storage::{MemoryTokenStore, TokenStore};
pub use task::TaskScope;

pub use shawty_shared as shared;

// =========================================================
// 原生入口 (Native)
// =========================================================

#[cfg(all(feature = "reqwest-client", not(target_arch = "wasm32")))]
pub use request::ReqwestHttpClient;

#[cfg(all(feature = "reqwest-client", not(target_arch = "wasm32")))]
pub type NativeSession = SessionManager<ReqwestHttpClient, MemoryTokenStore>;

/// 使用 reqwest 传输与内存存储构造会话管理器
///
/// `token` 为预先取得的会话令牌（例如命令行参数）；构造后状态为 `Unknown`，
/// 需要调用 [`SessionManager::verify_session`]。
#[cfg(all(feature = "reqwest-client", not(target_arch = "wasm32")))]
pub fn native_session(config: &ClientConfig, token: Option<String>) -> ApiResult<NativeSession> {
    let http = ReqwestHttpClient::new(config.request_timeout)?;
    let store = match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    };
    tracing::debug!(base_url = %config.api_base_url, "building native session");
    Ok(SessionManager::new(ApiClient::from_config(config, http), store))
}
