use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;
pub mod qr;
pub mod token;
pub mod validate;

pub use date::Timestamp;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "token";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// 后端保留的短链别名，不允许作为自定义别名
pub const RESERVED_ALIASES: &[&str] = &[
    "admin",
    "verify",
    "login",
    "dashboard",
    "api",
    "auth",
    "check",
    "unlock",
    "shorten",
    "analytics",
    "settings",
    "register",
    "links",
];

// =========================================================
// 用户 (Users)
// =========================================================

/// `/users/me` 返回的用户资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// 管理员标记
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl UserRecord {
    /// 展示名称：优先 full_name，否则取邮箱 @ 之前的部分
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// 资料更新；修改密码时必须同时提供 current_password
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

/// 只携带提示信息的响应，例如 `{"message": "URL deleted successfully"}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =========================================================
// 短链 (Short links)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub max_clicks: Option<i64>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ShortLink {
    pub fn is_protected(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// 拼接可分享的完整短链
    pub fn share_url(&self, origin: &str) -> String {
        format!("{}/{}", origin.trim_end_matches('/'), self.short_code)
    }

    /// 按短码或目标地址做不区分大小写的子串匹配；空查询匹配所有链接
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.short_code.to_lowercase().contains(&query)
            || self.original_url.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub password: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub max_clicks: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_clicks: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AliasAvailability {
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub original_url: String,
}

// =========================================================
// 统计与分析 (Analytics)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_clicks: i64,
    #[serde(default)]
    pub active_links: i64,
    #[serde(default)]
    pub recent_links: Vec<ShortLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub clicks: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub value: i64,
}

/// 用户分析面板的时间范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [Self::Day, Self::Week, Self::Month, Self::Quarter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsDashboard {
    #[serde(default)]
    pub chart_data: Vec<ChartPoint>,
    #[serde(default)]
    pub top_referrers: Vec<NamedCount>,
    #[serde(default)]
    pub top_devices: Vec<NamedCount>,
    #[serde(default)]
    pub top_countries: Vec<NamedCount>,
    #[serde(default)]
    pub top_links: Vec<ShortLink>,
    #[serde(default)]
    pub total_clicks: i64,
    #[serde(default)]
    pub avg_ctr: f64,
}

impl AnalyticsDashboard {
    /// 图表区间内的点击总数
    pub fn clicks_in_range(&self) -> i64 {
        self.chart_data.iter().map(|p| p.clicks).sum()
    }
}

// =========================================================
// 管理后台 (Admin)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: i64,
    #[serde(default)]
    pub total_urls: i64,
    #[serde(default)]
    pub total_clicks: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCreateUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub is_superuser: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// 管理后台分析概览的时间范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverviewRange {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "14d")]
    Fortnight,
    #[serde(rename = "30d")]
    Month,
}

impl OverviewRange {
    pub const ALL: [OverviewRange; 3] = [Self::Week, Self::Fortnight, Self::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Fortnight => "14d",
            Self::Month => "30d",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopUrl {
    pub short_code: String,
    #[serde(default)]
    pub clicks: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    #[serde(default)]
    pub chart_data: Vec<ChartPoint>,
    #[serde(default)]
    pub top_referrers: Vec<NamedCount>,
    #[serde(default)]
    pub top_devices: Vec<NamedCount>,
    #[serde(default)]
    pub top_urls: Vec<TopUrl>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_record_tolerates_missing_optional_fields() {
        let user: UserRecord =
            serde_json::from_str(r#"{"id": 7, "email": "ana@example.com", "extra": 1}"#).unwrap();
        assert!(user.is_active);
        assert!(!user.is_superuser);
        assert_eq!(user.display_name(), "ana");
    }

    #[test]
    fn short_link_from_server_payload() {
        let link: ShortLink = serde_json::from_str(
            r#"{
                "id": 1,
                "short_code": "abc123",
                "original_url": "https://example.com/a",
                "custom_alias": null,
                "password": "secret",
                "expires_at": null,
                "max_clicks": 10,
                "created_at": "2025-01-02T03:04:05.000006",
                "clicks": 3,
                "is_active": true
            }"#,
        )
        .unwrap();
        assert!(link.is_protected());
        assert_eq!(link.share_url("https://sho.rt/"), "https://sho.rt/abc123");
    }

    #[test]
    fn short_link_search_matches_code_or_destination() {
        let link: ShortLink = serde_json::from_str(
            r#"{"id":2,"short_code":"Promo24","original_url":"https://Example.com/summer-sale",
                "created_at":"2025-01-02T03:04:05.000001"}"#,
        )
        .unwrap();
        assert!(link.matches_query(""));
        assert!(link.matches_query("  promo "));
        assert!(link.matches_query("EXAMPLE.COM"));
        assert!(link.matches_query("summer"));
        assert!(!link.matches_query("winter"));
    }

    #[test]
    fn time_range_uses_wire_names() {
        assert_eq!(serde_json::to_string(&TimeRange::Day).unwrap(), "\"24h\"");
        assert_eq!(TimeRange::parse("90d"), Some(TimeRange::Quarter));
        assert_eq!(TimeRange::parse("1y"), None);
    }

    #[test]
    fn update_profile_skips_unset_fields() {
        let req = UpdateProfileRequest {
            bio: Some("hi".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"bio":"hi"}"#);
    }
}
