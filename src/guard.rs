//! 路由守卫
//!
//! 守卫是 `{status, user}` 与请求地址的纯函数。`Unknown` 状态下
//! 永远返回 `Loading`，由视图层渲染全屏加载动画。

use crate::route::{AppRoute, Location, RouteAccess};
use crate::session::{AuthStatus, SessionSnapshot};
use shawty_shared::UserRecord;
use urlencoding::encode;

/// 守卫的判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 认证状态未知，等待
    Loading,
    /// 替换当前地址并跳转
    Redirect(String),
    /// 渲染目标页面
    Allow,
}

/// 校验登录后的跳转目标
///
/// 只接受以 `/` 开头且不含 `//` 的站内路径，其余情况回落到控制面板。
pub fn valid_next_path(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.contains("//") => path.to_string(),
        _ => AppRoute::auth_success_redirect().to_path(),
    }
}

/// `/login?next=<encoded path>`
pub fn login_redirect(requested_path: &str) -> String {
    format!(
        "{}?next={}",
        AppRoute::auth_failure_redirect(),
        encode(requested_path)
    )
}

/// 受保护路由的守卫
pub fn protected_guard(
    status: AuthStatus,
    user: Option<&UserRecord>,
    requires_admin: bool,
    requested_path: &str,
) -> GuardDecision {
    match status {
        AuthStatus::Unknown => GuardDecision::Loading,
        AuthStatus::Unauthenticated => GuardDecision::Redirect(login_redirect(requested_path)),
        AuthStatus::Authenticated => {
            if requires_admin && !user.is_some_and(|u| u.is_superuser) {
                GuardDecision::Redirect(AppRoute::auth_success_redirect().to_path())
            } else {
                GuardDecision::Allow
            }
        }
    }
}

/// 仅限未登录用户的路由守卫
pub fn public_only_guard(status: AuthStatus, next: Option<&str>) -> GuardDecision {
    match status {
        AuthStatus::Unknown => GuardDecision::Loading,
        AuthStatus::Authenticated => GuardDecision::Redirect(valid_next_path(next)),
        AuthStatus::Unauthenticated => GuardDecision::Allow,
    }
}

/// 根据路由的访问级别选择守卫
///
/// 重定向到登录页时，`next` 只携带 path（不含查询串）。
pub fn evaluate(route: &AppRoute, location: &Location, session: &SessionSnapshot) -> GuardDecision {
    match route.access() {
        RouteAccess::Open => GuardDecision::Allow,
        RouteAccess::PublicOnly => {
            let next = location.query_param("next");
            public_only_guard(session.status, next.as_deref())
        }
        RouteAccess::Protected { admin } => {
            protected_guard(session.status, session.user.as_ref(), admin, &location.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_superuser: bool) -> UserRecord {
        UserRecord {
            id: 1,
            email: "a@x.io".into(),
            full_name: None,
            is_active: true,
            is_superuser,
            bio: None,
            created_at: None,
        }
    }

    fn snapshot(status: AuthStatus, user: Option<UserRecord>) -> SessionSnapshot {
        SessionSnapshot { status, user }
    }

    #[test]
    fn test_next_path_validation() {
        assert_eq!(valid_next_path(Some("/links")), "/links");
        assert_eq!(valid_next_path(Some("/analytics?range=7d")), "/analytics?range=7d");
        assert_eq!(valid_next_path(Some("//evil.com")), "/dashboard");
        assert_eq!(valid_next_path(Some("https://evil.com")), "/dashboard");
        assert_eq!(valid_next_path(Some("/a//b")), "/dashboard");
        assert_eq!(valid_next_path(Some("")), "/dashboard");
        assert_eq!(valid_next_path(None), "/dashboard");
    }

    #[test]
    fn test_protected_guard_never_redirects_while_unknown() {
        for admin in [false, true] {
            assert_eq!(
                protected_guard(AuthStatus::Unknown, None, admin, "/links"),
                GuardDecision::Loading
            );
        }
        assert_eq!(public_only_guard(AuthStatus::Unknown, None), GuardDecision::Loading);
    }

    #[test]
    fn test_unknown_status_waits_whatever_else_is_known() {
        let stale_admin = user(true);
        for admin in [false, true] {
            assert_eq!(
                protected_guard(AuthStatus::Unknown, Some(&stale_admin), admin, "/admin"),
                GuardDecision::Loading
            );
        }
        assert_eq!(
            public_only_guard(AuthStatus::Unknown, Some("/links")),
            GuardDecision::Loading
        );

        let sessions = [
            snapshot(AuthStatus::Unknown, None),
            snapshot(AuthStatus::Unknown, Some(user(false))),
            snapshot(AuthStatus::Unknown, Some(user(true))),
        ];
        let guarded = [
            "/links",
            "/settings?tab=password",
            "/admin",
            "/admin/users",
            "/login",
            "/login?next=%2Fadmin",
            "/login?next=%2F%2Fevil.com",
            "/register?next=%2Flinks",
            "/verify/abc",
        ];
        for session in &sessions {
            for href in guarded {
                let location = Location::parse(href);
                assert_eq!(
                    evaluate(&location.route(), &location, session),
                    GuardDecision::Loading,
                    "{href} with {session:?}"
                );
            }
        }
    }

    #[test]
    fn test_protected_guard_sends_anonymous_users_to_login() {
        assert_eq!(
            protected_guard(AuthStatus::Unauthenticated, None, false, "/links"),
            GuardDecision::Redirect("/login?next=%2Flinks".into())
        );
    }

    #[test]
    fn test_admin_route_rejects_regular_user() {
        let regular = user(false);
        assert_eq!(
            protected_guard(AuthStatus::Authenticated, Some(&regular), true, "/admin"),
            GuardDecision::Redirect("/dashboard".into())
        );
        let admin = user(true);
        assert_eq!(
            protected_guard(AuthStatus::Authenticated, Some(&admin), true, "/admin"),
            GuardDecision::Allow
        );
        assert_eq!(
            protected_guard(AuthStatus::Authenticated, Some(&regular), false, "/links"),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_public_only_guard_follows_next() {
        assert_eq!(
            public_only_guard(AuthStatus::Authenticated, Some("/links")),
            GuardDecision::Redirect("/links".into())
        );
        assert_eq!(
            public_only_guard(AuthStatus::Authenticated, Some("//evil.com")),
            GuardDecision::Redirect("/dashboard".into())
        );
        assert_eq!(
            public_only_guard(AuthStatus::Unauthenticated, Some("/links")),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_evaluate_dispatches_by_access() {
        let anonymous = snapshot(AuthStatus::Unauthenticated, None);
        let member = snapshot(AuthStatus::Authenticated, Some(user(false)));

        let links = Location::parse("/links?page=2");
        assert_eq!(
            evaluate(&links.route(), &links, &anonymous),
            GuardDecision::Redirect("/login?next=%2Flinks".into())
        );

        let login = Location::parse("/login?next=%2Fanalytics");
        assert_eq!(
            evaluate(&login.route(), &login, &member),
            GuardDecision::Redirect("/analytics".into())
        );
        assert_eq!(evaluate(&login.route(), &login, &anonymous), GuardDecision::Allow);

        let unlock = Location::parse("/unlock/abc");
        assert_eq!(
            evaluate(&unlock.route(), &unlock, &snapshot(AuthStatus::Unknown, None)),
            GuardDecision::Allow
        );
    }
}
