use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest};
use shawty_shared::protocol::{ApiRequest, CheckAliasRequest, CurrentUserRequest};
use shawty_shared::{HEADER_AUTHORIZATION, UserRecord};
use std::fmt;
use std::rc::Rc;

/// 类型化的 API 客户端
///
/// 持有后端根地址与（可选的）会话令牌；令牌存在时每个请求都携带
/// `Authorization: Bearer <token>`。克隆只复制 `Rc`，可以随意传入页面组件。
pub struct ApiClient<C> {
    base_url: String,
    token: Option<String>,
    http: Rc<C>,
}

impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            http: Rc::clone(&self.http),
        }
    }
}

impl<C> fmt::Debug for ApiClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: impl Into<String>, http: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            http: Rc::new(http),
        }
    }

    pub fn from_config(config: &ClientConfig, http: C) -> Self {
        Self::new(config.api_base_url.clone(), http)
    }

    /// 返回携带指定令牌的副本（共享同一个传输层）
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token,
            http: Rc::clone(&self.http),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送类型化请求并解析响应
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let body = request
            .body()
            .map_err(|e| ApiError::Encode(e.to_string()))?;

        let mut req = HttpRequest::new(&self.url(&request.path()), R::METHOD)
            .with_header("Accept", "application/json");
        if let Some(content_type) = body.content_type() {
            req = req.with_header("Content-Type", content_type);
        }
        if let Some(token) = &self.token {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}"));
        }
        let req = req.with_body(body.into_string());

        tracing::debug!(method = R::METHOD.as_str(), url = %req.url, "api request");
        let resp = self.http.send(req).await?;

        if !resp.ok() {
            let err = ApiError::from_response(&resp);
            tracing::debug!(status = resp.status, error = %err, "api request rejected");
            return Err(err);
        }

        R::parse_response(&resp.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 获取当前令牌对应的用户
    pub async fn current_user(&self) -> ApiResult<UserRecord> {
        self.send(&CurrentUserRequest).await
    }

    /// 别名是否可用
    pub async fn alias_available(&self, alias: &str) -> ApiResult<bool> {
        let resp = self
            .send(&CheckAliasRequest {
                alias: alias.to_string(),
            })
            .await?;
        Ok(resp.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use crate::request::mock::{BASE_URL, MockHttpClient};
    use shawty_shared::protocol::{ListLinksRequest, UnlockLinkRequest};

    fn client(mock: &MockHttpClient) -> ApiClient<MockHttpClient> {
        ApiClient::new(format!("{BASE_URL}/"), mock.clone())
    }

    #[tokio::test]
    async fn attaches_bearer_token_when_present() {
        let mock = MockHttpClient::new();
        mock.reply(HttpMethod::Get, "/urls?skip=0&limit=100", 200, "[]");
        mock.reply(HttpMethod::Get, "/urls?skip=0&limit=100", 200, "[]");

        let anonymous = client(&mock);
        anonymous.send(&ListLinksRequest::default()).await.unwrap();
        let authed = anonymous.with_token(Some("tok".into()));
        authed.send(&ListLinksRequest::default()).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].header("authorization"), None);
        assert_eq!(requests[1].header("Authorization"), Some("Bearer tok"));
        assert_eq!(requests[1].url, format!("{BASE_URL}/urls?skip=0&limit=100"));
    }

    #[tokio::test]
    async fn json_bodies_carry_content_type() {
        let mock = MockHttpClient::new();
        mock.reply(
            HttpMethod::Post,
            "/unlock/abc",
            200,
            r#"{"original_url":"https://example.com"}"#,
        );

        let resp = client(&mock)
            .send(&UnlockLinkRequest {
                short_code: "abc".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        assert_eq!(resp.original_url, "https://example.com");
        let req = &mock.requests()[0];
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"password":"pw"}"#));
    }

    #[tokio::test]
    async fn non_success_status_carries_server_detail() {
        let mock = MockHttpClient::new();
        mock.reply(
            HttpMethod::Post,
            "/unlock/abc",
            403,
            r#"{"detail":"Incorrect password"}"#,
        );

        let err = client(&mock)
            .send(&UnlockLinkRequest {
                short_code: "abc".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(err.user_message("Incorrect password"), "Incorrect password");
    }

    #[tokio::test]
    async fn malformed_success_payload_is_a_decode_error() {
        let mock = MockHttpClient::new();
        mock.reply(HttpMethod::Get, "/users/me", 200, "<html>");

        let err = client(&mock).current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn alias_probe() {
        let mock = MockHttpClient::new();
        mock.reply(HttpMethod::Get, "/check/promo", 200, r#"{"available":false}"#);

        assert!(!client(&mock).alias_available("promo").await.unwrap());
    }
}
