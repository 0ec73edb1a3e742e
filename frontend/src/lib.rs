//! Shawty 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `shawty::route` / `shawty::guard`: 路由定义与守卫（平台无关的领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话管理器与响应式系统的桥接
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod admin;
    pub mod admin_users;
    pub mod analytics;
    pub mod create_link_dialog;
    pub mod dashboard;
    pub mod home;
    mod icons;
    pub mod layout;
    pub mod links;
    pub mod login;
    pub mod pages;
    pub mod password;
    pub mod register;
    pub mod settings;
    pub mod unlock;
    pub mod verify;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::admin::AdminPage;
use crate::components::admin_users::AdminUsersPage;
use crate::components::analytics::AnalyticsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::home::HomePage;
use crate::components::links::LinksPage;
use crate::components::login::LoginPage;
use crate::components::pages::{FaqPage, NotFoundPage, PrivacyPage, TermsPage};
use crate::components::password::{ForgotPasswordPage, ResetPasswordPage};
use crate::components::register::RegisterPage;
use crate::components::settings::SettingsPage;
use crate::components::unlock::UnlockPage;
use crate::components::verify::VerifyEmailPage;

use leptos::prelude::*;
use shawty::{AppRoute, ClientConfig};

// 浏览器 API 封装：传输层、令牌存储、定时器、History 路由
pub(crate) mod web {
    pub mod browser;
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::FetchClient;
    pub use storage::LocalTokenStore;
    pub use timer::Debounce;
}

use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。守卫已经在 `RouterOutlet` 中执行。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::ResetPassword => view! { <ResetPasswordPage /> }.into_any(),
        AppRoute::VerifyEmail { token } => view! { <VerifyEmailPage token=token /> }.into_any(),
        AppRoute::Unlock { code } => view! { <UnlockPage code=code /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Links => view! { <LinksPage /> }.into_any(),
        AppRoute::Analytics => view! { <AnalyticsPage /> }.into_any(),
        AppRoute::Settings => view! { <SettingsPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        AppRoute::AdminUsers => view! { <AdminUsersPage /> }.into_any(),
        AppRoute::Privacy => view! { <PrivacyPage /> }.into_any(),
        AppRoute::Terms => view! { <TermsPage /> }.into_any(),
        AppRoute::Faq => view! { <FaqPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取构建期配置（API 地址、超时、令牌键名）
    let config = ClientConfig::from_build_env();

    // 2. 创建认证上下文
    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);

    // 3. 初始化认证状态（校验 LocalStorage 中的令牌）
    init_auth(&auth_ctx);

    view! {
        // 4. 路由器组件：注入会话快照信号实现守卫
        <Router session=auth_ctx.snapshot_signal()>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
