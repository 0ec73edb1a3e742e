//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 守卫判定本身来自核心库的 `guard::evaluate`。

use leptos::logging;
use leptos::prelude::*;
use shawty::guard::{self, GuardDecision};
use shawty::{AppRoute, Location, SessionSnapshot};
use wasm_bindgen::prelude::*;

use crate::components::layout::FullScreenLoader;

/// 获取当前浏览器地址 (path + query)
fn current_location() -> Location {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return Location::default();
    };
    Location::new(
        location.pathname().unwrap_or_else(|_| "/".to_string()),
        location.search().unwrap_or_default(),
    )
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(href));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(href));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话快照信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前地址
    location: RwSignal<Location>,
    /// 会话快照（注入的信号，实现解耦）
    session: Signal<SessionSnapshot>,
}

impl RouterService {
    fn new(session: Signal<SessionSnapshot>) -> Self {
        Self {
            location: RwSignal::new(current_location()),
            session,
        }
    }

    /// 当前地址（响应式）
    pub fn location(&self) -> Location {
        self.location.get()
    }

    /// 当前路由（响应式）
    pub fn route(&self) -> AppRoute {
        self.location.with(Location::route)
    }

    /// 当前路由（不追踪依赖）
    pub fn route_untracked(&self) -> AppRoute {
        self.location.with_untracked(Location::route)
    }

    /// 读取当前地址的查询参数（响应式）
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.location.with(|loc| loc.query_param(name))
    }

    /// 推入新地址
    pub fn navigate(&self, href: &str) {
        let target = Location::parse(href);
        push_history_state(&target.href());
        self.location.set(target);
    }

    /// 替换当前地址（重定向不留下历史记录）
    pub fn replace(&self, href: &str) {
        let target = Location::parse(href);
        replace_history_state(&target.href());
        self.location.set(target);
    }

    /// 当前地址下的守卫判定（响应式）
    pub fn decision(&self) -> GuardDecision {
        let location = self.location.get();
        let session = self.session.get();
        guard::evaluate(&location.route(), &location, &session)
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let location = self.location;

        let closure = Closure::<dyn Fn()>::new(move || {
            location.set(current_location());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 地址或认证状态变化时执行守卫重定向
    ///
    /// `Loading` 期间不做任何事；状态确定后才会重定向。
    fn setup_guard_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            if let GuardDecision::Redirect(target) = router.decision() {
                logging::log!("[Router] guard redirect -> {}", target);
                router.replace(&target);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<SessionSnapshot>) -> RouterService {
    let router = RouterService::new(session);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_guard_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话快照信号
    session: Signal<SessionSnapshot>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 守卫放行时渲染对应页面；判定为加载中或即将重定向时渲染全屏加载动画。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let allowed = Memo::new(move |_| router.decision() == GuardDecision::Allow);
    let route = Memo::new(move |_| router.route());

    move || {
        if allowed.get() {
            matcher(route.get())
        } else {
            view! { <FullScreenLoader /> }.into_any()
        }
    }
}

/// 站内链接
///
/// 拦截点击，改用 History API 导航，不刷新页面。
#[component]
pub fn Link(
    /// 目标地址
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
