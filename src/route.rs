//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问级别。

use std::fmt::Display;
use urlencoding::{decode, encode};

/// 路由的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// 任何人都可以访问
    Open,
    /// 只对未登录用户开放（登录、注册等）
    PublicOnly,
    /// 需要登录；`admin` 为 true 时还需要管理员权限
    Protected { admin: bool },
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页（匿名缩短链接）
    #[default]
    Home,
    Login,
    Register,
    ForgotPassword,
    /// 重置密码，令牌来自 `?token=`
    ResetPassword,
    /// 邮箱验证
    VerifyEmail { token: String },
    /// 输入密码解锁受保护的链接
    Unlock { code: String },
    /// 控制面板 (需要认证)
    Dashboard,
    Links,
    Analytics,
    Settings,
    /// 管理后台 (需要管理员)
    Admin,
    AdminUsers,
    Privacy,
    Terms,
    Faq,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（不含查询串）
    pub fn from_path(path: &str) -> Self {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        match trimmed {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword,
            "/dashboard" => Self::Dashboard,
            "/links" => Self::Links,
            "/analytics" => Self::Analytics,
            "/settings" => Self::Settings,
            "/admin" => Self::Admin,
            "/admin/users" => Self::AdminUsers,
            "/privacy" => Self::Privacy,
            "/terms" => Self::Terms,
            "/faq" => Self::Faq,
            other => Self::parse_dynamic(other).unwrap_or(Self::NotFound),
        }
    }

    /// 带参数的路由：`/verify/{token}`、`/unlock/{code}`
    fn parse_dynamic(path: &str) -> Option<Self> {
        let (prefix, param) = path.strip_prefix('/')?.split_once('/')?;
        if param.is_empty() || param.contains('/') {
            return None;
        }
        let param = decode(param).ok()?.into_owned();
        match prefix {
            "verify" => Some(Self::VerifyEmail { token: param }),
            "unlock" => Some(Self::Unlock { code: param }),
            _ => None,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword => "/reset-password".to_string(),
            Self::VerifyEmail { token } => format!("/verify/{}", encode(token)),
            Self::Unlock { code } => format!("/unlock/{}", encode(code)),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Links => "/links".to_string(),
            Self::Analytics => "/analytics".to_string(),
            Self::Settings => "/settings".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::AdminUsers => "/admin/users".to_string(),
            Self::Privacy => "/privacy".to_string(),
            Self::Terms => "/terms".to_string(),
            Self::Faq => "/faq".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Login
            | Self::Register
            | Self::ForgotPassword
            | Self::ResetPassword
            | Self::VerifyEmail { .. } => RouteAccess::PublicOnly,
            Self::Dashboard | Self::Links | Self::Analytics | Self::Settings => {
                RouteAccess::Protected { admin: false }
            }
            Self::Admin | Self::AdminUsers => RouteAccess::Protected { admin: true },
            Self::Home
            | Self::Unlock { .. }
            | Self::Privacy
            | Self::Terms
            | Self::Faq
            | Self::NotFound => RouteAccess::Open,
        }
    }

    /// 未登录访问受保护页面时的去向
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 已登录用户离开登录页、或权限不足时的默认去向
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// Location: path + 查询串
// =========================================================

/// 浏览器地址（不含 origin 与 hash）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    /// 不含开头的 `?`
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        let path = path.into();
        let query = query.into();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            query: query.trim_start_matches('?').to_string(),
        }
    }

    /// 解析 `"/path?query#hash"` 形式的地址
    pub fn parse(href: &str) -> Self {
        let without_hash = href.split('#').next().unwrap_or_default();
        match without_hash.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(without_hash, ""),
        }
    }

    pub fn route(&self) -> AppRoute {
        AppRoute::from_path(&self.path)
    }

    /// 读取查询参数；值按表单规则解码（`+` 视为空格）
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| decode(&value.replace('+', " ")).ok().map(|v| v.into_owned()))
    }

    /// 重新组合为 `path?query`
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

impl From<&AppRoute> for Location {
    fn from(route: &AppRoute) -> Self {
        Location::new(route.to_path(), "")
    }
}
