//! 公共布局组件：加载动画、通知、导航栏

use crate::auth::use_auth;
use crate::components::icons::*;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use shawty::AppRoute;

/// 全屏加载动画（认证状态未知时显示）
#[component]
pub fn FullScreenLoader() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 一条通知
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn ok(message: impl Into<String>) -> Option<Self> {
        Some(Self {
            message: message.into(),
            is_error: false,
        })
    }

    pub fn err(message: impl Into<String>) -> Option<Self> {
        Some(Self {
            message: message.into(),
            is_error: true,
        })
    }
}

/// 右上角通知提示框，3 秒后自动清除
#[component]
pub fn Toast(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    Effect::new(move |_| {
        if notice.get().is_some() {
            set_timeout(move || notice.set(None), std::time::Duration::from_secs(3));
        }
    });

    view! {
        {move || {
            notice
                .get()
                .map(|n| {
                    let class = if n.is_error {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    };
                    view! {
                        <div class="toast toast-top toast-end z-50">
                            <div class=class>
                                <span>{n.message}</span>
                            </div>
                        </div>
                    }
                })
        }}
    }
}

/// 表单内的错误提示
#[component]
pub fn ErrorAlert(message: RwSignal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|msg| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{msg}</span>
                </div>
            }
        })
    }
}

/// 公开页面的顶部导航
#[component]
pub fn PublicNavbar() -> impl IntoView {
    let auth = use_auth();

    view! {
        <div class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost text-xl gap-2">
                    <LinkIcon attr:class="h-5 w-5 text-primary" />
                    "Shawty"
                </Link>
            </div>
            <div class="flex-none gap-2">
                {move || {
                    if auth.is_authenticated() {
                        view! {
                            <Link to="/dashboard" class="btn btn-primary btn-sm">"Dashboard"</Link>
                        }
                            .into_any()
                    } else {
                        view! {
                            <Link to="/login" class="btn btn-ghost btn-sm">"Log in"</Link>
                            <Link to="/register" class="btn btn-primary btn-sm">"Sign up"</Link>
                        }
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}

/// 已登录页面的外壳：侧边导航 + 内容区
#[component]
pub fn AppShell(
    /// 页面标题
    #[prop(into)]
    title: String,
    children: Children,
) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let current = router.route_untracked();
    let nav_class = move |route: AppRoute| {
        if current == route {
            "active"
        } else {
            ""
        }
    };
    let admin_class = nav_class(AppRoute::Admin);
    let users_class = nav_class(AppRoute::AdminUsers);

    let display_name = move || {
        auth.snapshot
            .with(|s| s.user.as_ref().map(|u| u.display_name().to_string()))
            .unwrap_or_default()
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-sm px-4">
                <div class="flex-1 gap-2">
                    <Link to="/" class="btn btn-ghost text-xl gap-2">
                        <LinkIcon attr:class="h-5 w-5 text-primary" />
                        "Shawty"
                    </Link>
                </div>
                <div class="flex-none gap-2">
                    <span class="hidden md:inline text-sm opacity-70">{display_name}</span>
                    <button class="btn btn-outline btn-error btn-sm gap-2" on:click=move |_| auth.logout()>
                        <LogOut attr:class="h-4 w-4" />
                        "Log out"
                    </button>
                </div>
            </div>

            <div class="max-w-7xl mx-auto p-4 md:p-8 flex flex-col md:flex-row gap-6">
                <ul class="menu bg-base-100 rounded-box shadow w-full md:w-56 h-fit">
                    <li>
                        <Link to="/dashboard" class=nav_class(AppRoute::Dashboard)>
                            <LayoutDashboard attr:class="h-4 w-4" />
                            "Dashboard"
                        </Link>
                    </li>
                    <li>
                        <Link to="/links" class=nav_class(AppRoute::Links)>
                            <LinkIcon attr:class="h-4 w-4" />
                            "Links"
                        </Link>
                    </li>
                    <li>
                        <Link to="/analytics" class=nav_class(AppRoute::Analytics)>
                            <BarChart attr:class="h-4 w-4" />
                            "Analytics"
                        </Link>
                    </li>
                    <li>
                        <Link to="/settings" class=nav_class(AppRoute::Settings)>
                            <Settings attr:class="h-4 w-4" />
                            "Settings"
                        </Link>
                    </li>
                    <Show when=move || auth.is_admin()>
                        <li class="menu-title">"Admin"</li>
                        <li>
                            <Link to="/admin" class=admin_class>
                                <ShieldCheck attr:class="h-4 w-4" />
                                "Overview"
                            </Link>
                        </li>
                        <li>
                            <Link to="/admin/users" class=users_class>
                                <Users attr:class="h-4 w-4" />
                                "Users"
                            </Link>
                        </li>
                    </Show>
                </ul>

                <main class="flex-1 space-y-6">
                    <h1 class="text-2xl font-bold">{title}</h1>
                    {children()}
                </main>
            </div>
        </div>
    }
}
