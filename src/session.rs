//! 会话状态机
//!
//! 管理会话令牌、用户资料与三态认证状态：
//!
//! ```text
//!            start / token changed
//!   Unknown ───────────────────────► verify_session()
//!      ▲                                 │
//!      │ set_token(Some)      ┌──────────┴───────────┐
//!      │                      ▼                      ▼
//!      └──────────── Authenticated          Unauthenticated
//!                                         (logout, expiry, rejection)
//! ```
//!
//! 每次令牌变化都会递增 `generation`。验证开始时记录当时的 generation，
//! 完成时若 generation 已变化，则丢弃结果：最后**发起**的验证生效，
//! 而不是最后**返回**的验证。

use crate::api::ApiClient;
use crate::request::HttpClient;
use crate::storage::TokenStore;
use shawty_shared::{Credentials, RegisterRequest, Timestamp, UserRecord, token};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

const LOGIN_FAILED: &str = "Login failed";
const REGISTER_FAILED: &str = "Registration failed";
const SESSION_REJECTED: &str = "Your session could not be verified. Please try again.";

/// 认证状态
///
/// `Unknown` 是唯一安全的"加载中"状态：处于该状态时任何路由守卫都不能重定向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// 对外暴露的会话快照（不包含令牌本身）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub status: AuthStatus,
    pub user: Option<UserRecord>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(|u| u.is_superuser)
    }
}

pub type ListenerId = u64;
type Listener = Rc<dyn Fn(&SessionSnapshot)>;

struct SessionState {
    status: AuthStatus,
    token: Option<String>,
    user: Option<UserRecord>,
    generation: u64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: ListenerId,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            user: self.user.clone(),
        }
    }
}

/// 一次验证的结果
enum Verification {
    NoToken,
    Verified { token: String, user: UserRecord },
    Rejected,
}

struct Inner<C, S> {
    api: ApiClient<C>,
    store: S,
    state: RefCell<SessionState>,
}

/// 会话管理器
///
/// 显式构造后注入到视图层；克隆共享同一份状态。
pub struct SessionManager<C, S> {
    inner: Rc<Inner<C, S>>,
}

impl<C, S> Clone for SessionManager<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C, S> fmt::Debug for SessionManager<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("SessionManager")
            .field("status", &state.status)
            .field("generation", &state.generation)
            .field("has_token", &state.token.is_some())
            .finish()
    }
}

impl<C: HttpClient, S: TokenStore> SessionManager<C, S> {
    /// 从存储中读取令牌；无论是否找到令牌，初始状态都是 `Unknown`
    pub fn new(api: ApiClient<C>, store: S) -> Self {
        let token = store.load().filter(|t| !t.is_empty());
        let state = SessionState {
            status: AuthStatus::Unknown,
            token,
            user: None,
            generation: 0,
            listeners: Vec::new(),
            next_listener: 0,
        };
        Self {
            inner: Rc::new(Inner {
                api: api.with_token(None),
                store,
                state: RefCell::new(state),
            }),
        }
    }

    // --- 读取 ---

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().snapshot()
    }

    pub fn status(&self) -> AuthStatus {
        self.inner.state.borrow().status
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.inner.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.state.borrow().generation
    }

    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().snapshot().is_admin()
    }

    /// 携带当前令牌的 API 客户端，供页面加载数据
    pub fn api(&self) -> ApiClient<C> {
        self.inner.api.with_token(self.token())
    }

    /// 不携带令牌的 API 客户端，供公开页面使用
    pub fn public_api(&self) -> ApiClient<C> {
        self.inner.api.with_token(None)
    }

    // --- 订阅 ---

    /// 注册监听器；每次状态变化后以最新快照调用
    pub fn subscribe(&self, listener: impl Fn(&SessionSnapshot) + 'static) -> ListenerId {
        let mut state = self.inner.state.borrow_mut();
        let id = state.next_listener;
        state.next_listener += 1;
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner
            .state
            .borrow_mut()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    /// 调用监听器前先释放借用，监听器内部可以再次读取管理器
    fn notify(&self) {
        let (snapshot, listeners): (SessionSnapshot, Vec<Listener>) = {
            let state = self.inner.state.borrow();
            (
                state.snapshot(),
                state.listeners.iter().map(|(_, l)| Rc::clone(l)).collect(),
            )
        };
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// 执行 `mutate`，快照发生变化时通知监听器
    fn update(&self, mutate: impl FnOnce(&mut SessionState, &S)) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let before = state.snapshot();
            mutate(&mut state, &self.inner.store);
            state.snapshot() != before
        };
        if changed {
            self.notify();
        }
    }

    // --- 状态机 ---

    /// 验证当前令牌
    ///
    /// 启动时调用一次，之后每次令牌变化都会调用。永远不会返回错误：
    /// 所有失败都折叠为 `Unauthenticated`。返回调用结束时的状态。
    pub async fn verify_session(&self) -> AuthStatus {
        let (generation, token) = {
            let state = self.inner.state.borrow();
            (state.generation, state.token.clone())
        };

        let outcome = match token {
            None => Verification::NoToken,
            Some(token) if !token::is_usable_at(&token, Timestamp::now()) => {
                info!(generation, "session token expired or unreadable");
                Verification::Rejected
            }
            Some(token) => {
                let api = self.inner.api.with_token(Some(token.clone()));
                match api.current_user().await {
                    Ok(user) => Verification::Verified { token, user },
                    Err(err) => {
                        warn!(
                            generation,
                            http_status = ?err.status(),
                            error = %err,
                            "session verification failed"
                        );
                        Verification::Rejected
                    }
                }
            }
        };

        self.commit(generation, outcome);
        self.status()
    }

    /// 应用验证结果；generation 已过期的结果直接丢弃
    fn commit(&self, generation: u64, outcome: Verification) {
        let current = self.generation();
        if current != generation {
            debug!(generation, current, "discarding stale session verification");
            return;
        }

        self.update(|state, store| match outcome {
            Verification::NoToken => {
                state.user = None;
                state.status = AuthStatus::Unauthenticated;
            }
            Verification::Verified { token, user } => {
                store.save(&token);
                state.user = Some(user);
                state.status = AuthStatus::Authenticated;
            }
            Verification::Rejected => {
                store.clear();
                state.token = None;
                state.user = None;
                state.status = AuthStatus::Unauthenticated;
                // 清除令牌本身也是一次令牌变化
                state.generation += 1;
            }
        });
        info!(generation, status = ?self.status(), "session resolved");
    }

    /// 替换令牌并重新验证
    ///
    /// 非空令牌会被持久化，状态回到 `Unknown` 直到验证完成。
    pub async fn set_token(&self, token: Option<String>) -> AuthStatus {
        let token = token.filter(|t| !t.is_empty());
        self.update(|state, store| {
            state.generation += 1;
            state.user = None;
            if let Some(token) = &token {
                store.save(token);
                state.status = AuthStatus::Unknown;
            } else {
                store.clear();
            }
            state.token = token;
        });
        self.verify_session().await
    }

    /// 重新拉取当前用户（例如资料更新之后）
    pub async fn refresh(&self) -> AuthStatus {
        self.verify_session().await
    }

    /// 使用邮箱和密码登录
    ///
    /// 成功时只设置令牌，状态由令牌变化触发的验证决定。
    /// 失败时返回可直接展示的错误信息。
    pub async fn login(&self, email: &str, password: &str) -> Result<(), String> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let issued = match self.api().send(&credentials).await {
            Ok(issued) => issued,
            Err(err) => {
                warn!(error = %err, "login failed");
                return Err(err.user_message(LOGIN_FAILED));
            }
        };

        info!("access token issued");
        match self.set_token(Some(issued.access_token)).await {
            AuthStatus::Unauthenticated => Err(SESSION_REJECTED.to_string()),
            _ => Ok(()),
        }
    }

    /// 注册新账号；不影响当前会话
    pub async fn register(&self, email: &str, password: &str) -> Result<(), String> {
        let request = RegisterRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api().send(&request).await {
            Ok(user) => {
                info!(user_id = user.id, "account registered");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                Err(err.user_message(REGISTER_FAILED))
            }
        }
    }

    /// 同步注销：立即清除令牌与用户，不发起网络请求
    pub fn logout(&self) {
        self.update(|state, store| {
            store.clear();
            state.generation += 1;
            state.token = None;
            state.user = None;
            state.status = AuthStatus::Unauthenticated;
        });
        info!("logged out");
    }
}

#[cfg(test)]
mod tests;
