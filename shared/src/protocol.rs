use crate::{
    AdminCreateUser, AdminStats, AdminUpdateUser, AliasAvailability, AnalyticsDashboard,
    AnalyticsOverview, CreateLinkRequest, Credentials, DashboardStats, DeleteAccountRequest,
    ForgotPasswordRequest, MessageResponse, OverviewRange, RegisterRequest, ResetPasswordRequest,
    ShortLink, TimeRange, TokenResponse, UnlockRequest, UnlockResponse, UpdateLinkRequest,
    UpdateProfileRequest, UserRecord, VerifyEmailRequest,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use urlencoding::encode;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Encoded request body together with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(String),
    /// `application/x-www-form-urlencoded`
    Form(String),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string(value).map(RequestBody::Json)
    }

    pub fn form(pairs: &[(&str, &str)]) -> Self {
        let encoded = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        RequestBody::Form(encoded)
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(s) | RequestBody::Form(s) => Some(s),
        }
    }
}

/// Parses a JSON response body. An empty body is read as `null`, so endpoints
/// that answer with no content can use an `Option` response type.
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    if body.trim().is_empty() {
        serde_json::from_str("null")
    } else {
        serde_json::from_str(body)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// Path relative to the API base URL, including any query string.
    fn path(&self) -> String;

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::Empty)
    }

    fn parse_response(body: &str) -> Result<Self::Response, serde_json::Error> {
        decode_json(body)
    }
}

macro_rules! json_body {
    () => {
        fn body(&self) -> Result<RequestBody, serde_json::Error> {
            RequestBody::json(self)
        }
    };
}

// =========================================================
// Auth
// =========================================================

/// Exchange credentials for an access token. The token endpoint is an OAuth2
/// password form, so the email travels as `username`.
impl ApiRequest for Credentials {
    type Response = TokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/token".to_string()
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::form(&[
            ("username", self.email.as_str()),
            ("password", self.password.as_str()),
        ]))
    }
}

impl ApiRequest for RegisterRequest {
    type Response = UserRecord;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }

    json_body!();
}

impl ApiRequest for VerifyEmailRequest {
    type Response = Option<MessageResponse>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/auth/verify/{}", encode(&self.token))
    }
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = Option<MessageResponse>;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/forgot-password".to_string()
    }

    json_body!();
}

impl ApiRequest for ResetPasswordRequest {
    type Response = Option<MessageResponse>;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/reset-password".to_string()
    }

    json_body!();
}

// =========================================================
// Current user
// =========================================================

/// Fetch the user behind the bearer token
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = UserRecord;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/users/me".to_string()
    }
}

impl ApiRequest for UpdateProfileRequest {
    type Response = UserRecord;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        "/users/update".to_string()
    }

    json_body!();
}

impl ApiRequest for DeleteAccountRequest {
    type Response = Option<MessageResponse>;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        "/users/me".to_string()
    }

    json_body!();
}

// =========================================================
// Links
// =========================================================

/// Create a link without an account (landing page)
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct AnonymousShortenRequest(pub CreateLinkRequest);

impl ApiRequest for AnonymousShortenRequest {
    type Response = ShortLink;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/shorten".to_string()
    }

    json_body!();
}

/// Create a link owned by the current user
impl ApiRequest for CreateLinkRequest {
    type Response = ShortLink;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/shorten_auth".to_string()
    }

    json_body!();
}

#[derive(Debug, Clone)]
pub struct CheckAliasRequest {
    pub alias: String,
}

impl ApiRequest for CheckAliasRequest {
    type Response = AliasAvailability;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/check/{}", encode(&self.alias))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListLinksRequest {
    pub skip: u32,
    pub limit: u32,
}

impl Default for ListLinksRequest {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

impl ApiRequest for ListLinksRequest {
    type Response = Vec<ShortLink>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/urls?skip={}&limit={}", self.skip, self.limit)
    }
}

#[derive(Debug, Clone)]
pub struct EditLinkRequest {
    pub short_code: String,
    pub changes: UpdateLinkRequest,
}

impl ApiRequest for EditLinkRequest {
    type Response = ShortLink;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/urls/{}", encode(&self.short_code))
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(&self.changes)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteLinkRequest {
    pub short_code: String,
}

impl ApiRequest for DeleteLinkRequest {
    type Response = Option<MessageResponse>;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/urls/{}", encode(&self.short_code))
    }
}

#[derive(Debug, Clone)]
pub struct UnlockLinkRequest {
    pub short_code: String,
    pub password: String,
}

impl ApiRequest for UnlockLinkRequest {
    type Response = UnlockResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/unlock/{}", encode(&self.short_code))
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(&UnlockRequest {
            password: self.password.clone(),
        })
    }
}

// =========================================================
// Dashboard & analytics
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardStatsRequest;

impl ApiRequest for DashboardStatsRequest {
    type Response = DashboardStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/dashboard/stats".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsRequest {
    pub range: TimeRange,
}

impl ApiRequest for AnalyticsRequest {
    type Response = AnalyticsDashboard;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/analytics/dashboard?time_range={}", self.range.as_str())
    }
}

// =========================================================
// Admin
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct AdminStatsRequest;

impl ApiRequest for AdminStatsRequest {
    type Response = AdminStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/stats".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<UserRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/users".to_string()
    }
}

impl ApiRequest for AdminCreateUser {
    type Response = UserRecord;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/admin/users".to_string()
    }

    json_body!();
}

#[derive(Debug, Clone)]
pub struct EditUserRequest {
    pub user_id: i64,
    pub changes: AdminUpdateUser,
}

impl ApiRequest for EditUserRequest {
    type Response = UserRecord;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/admin/users/{}", self.user_id)
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(&self.changes)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteUserRequest {
    pub user_id: i64,
}

impl ApiRequest for DeleteUserRequest {
    type Response = Option<MessageResponse>;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/users/{}", self.user_id)
    }
}

/// Raw CSV text of the platform report
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CsvReport(pub String);

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportRequest;

impl ApiRequest for CsvReportRequest {
    type Response = CsvReport;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/reports/csv".to_string()
    }

    fn parse_response(body: &str) -> Result<Self::Response, serde_json::Error> {
        Ok(CsvReport(body.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsOverviewRequest {
    pub range: OverviewRange,
}

impl ApiRequest for AnalyticsOverviewRequest {
    type Response = AnalyticsOverview;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/admin/analytics/overview?range={}", self.range.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListAllLinksRequest;

impl ApiRequest for ListAllLinksRequest {
    type Response = Vec<ShortLink>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/urls".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct RemoveLinkRequest {
    pub short_code: String,
}

impl ApiRequest for RemoveLinkRequest {
    type Response = Option<MessageResponse>;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/urls/{}", encode(&self.short_code))
    }
}
