//! 认证模块
//!
//! 把核心库的 [`SessionManager`] 接入 Leptos 的响应式系统：
//! 管理器本身保存在本地存储的 `StoredValue` 中，状态变化通过订阅
//! 写入 `RwSignal<SessionSnapshot>`，路由服务与页面只读这个信号。

use crate::web::{FetchClient, LocalTokenStore};
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty::{ApiClient, ClientConfig, SessionManager, SessionSnapshot, TaskScope};
use std::future::Future;

pub type Session = SessionManager<FetchClient, LocalTokenStore>;
pub type Api = ApiClient<FetchClient>;

/// 认证上下文
///
/// 只包含 arena 句柄，`Copy` 后可以放进任意闭包。
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: StoredValue<Session, LocalStorage>,
    /// 会话快照（只读使用）
    pub snapshot: RwSignal<SessionSnapshot>,
}

impl AuthContext {
    /// 根据配置创建会话管理器并订阅其状态
    pub fn new(config: &ClientConfig) -> Self {
        let http = FetchClient::new(config.request_timeout);
        let store = LocalTokenStore::new(config.token_storage_key.clone());
        let manager = SessionManager::new(ApiClient::from_config(config, http), store);

        let snapshot = RwSignal::new(manager.snapshot());
        manager.subscribe(move |next| snapshot.set(next.clone()));

        Self {
            session: StoredValue::new_local(manager),
            snapshot,
        }
    }

    /// 会话管理器（共享同一份状态的克隆）
    pub fn session(&self) -> Session {
        self.session.get_value()
    }

    /// 携带当前令牌的 API 客户端
    pub fn api(&self) -> Api {
        self.session.with_value(Session::api)
    }

    /// 不携带令牌的 API 客户端
    pub fn public_api(&self) -> Api {
        self.session.with_value(Session::public_api)
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot.with(SessionSnapshot::is_authenticated)
    }

    pub fn is_admin(&self) -> bool {
        self.snapshot.with(SessionSnapshot::is_admin)
    }

    /// 获取会话快照信号（用于路由服务注入）
    pub fn snapshot_signal(&self) -> Signal<SessionSnapshot> {
        self.snapshot.into()
    }

    /// 重新拉取当前用户
    pub fn refresh(&self) {
        let session = self.session();
        spawn_local(async move {
            session.refresh().await;
        });
    }

    /// 注销并清除状态
    ///
    /// 导航将由路由服务的守卫自动处理。
    pub fn logout(&self) {
        self.session.with_value(Session::logout);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 启动时验证已保存的令牌
pub fn init_auth(ctx: &AuthContext) {
    let session = ctx.session();
    spawn_local(async move {
        let status = session.verify_session().await;
        logging::log!("[Auth] startup verification finished: {:?}", status);
    });
}

// =========================================================
// 页面级任务
// =========================================================

/// 页面任务作用域
///
/// 页面通过 [`PageTasks::spawn`] 发起数据加载；页面销毁时，
/// 尚未完成的任务被中止，不会再写入已销毁的信号。
#[derive(Clone, Copy)]
pub struct PageTasks {
    scope: StoredValue<TaskScope, LocalStorage>,
}

impl PageTasks {
    pub fn new() -> Self {
        let scope = StoredValue::new_local(TaskScope::new());
        on_cleanup(move || {
            scope.try_with_value(TaskScope::cancel);
        });
        Self { scope }
    }

    pub fn spawn(&self, fut: impl Future<Output = ()> + 'static) {
        let Some(task) = self.scope.try_with_value(|scope| scope.run(fut)) else {
            return;
        };
        spawn_local(async move {
            let _ = task.await;
        });
    }
}

impl Default for PageTasks {
    fn default() -> Self {
        Self::new()
    }
}
