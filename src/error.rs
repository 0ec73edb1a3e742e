use crate::request::HttpResponse;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// 与后端交互时可能出现的错误
///
/// 会话管理器会把这些错误折叠为状态变化，页面组件则用
/// [`ApiError::user_message`] 展示给用户。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("network error: {0}")]
    Network(String),
    /// 请求超时
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// 非 2xx 响应
    #[error("request failed with status {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    /// 响应解析失败
    #[error("malformed response: {0}")]
    Decode(String),
    /// 请求体序列化失败
    #[error("could not encode request: {0}")]
    Encode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl ApiError {
    pub fn from_response(resp: &HttpResponse) -> Self {
        ApiError::Status {
            status: resp.status,
            detail: extract_detail(&resp.body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 服务端返回的错误描述
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// 优先使用服务端的 detail，否则使用调用方提供的通用提示
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Timeout(_) => "The server took too long to respond".to_string(),
            _ => self.detail().unwrap_or(fallback).to_string(),
        }
    }
}

/// 从错误响应体中提取 `detail`
///
/// 支持 `{"detail": "..."}` 以及校验失败时的
/// `{"detail": [{"msg": "..."}, ...]}` 两种形式。
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_form() {
        let err = ApiError::from_response(&HttpResponse::new(
            400,
            r#"{"detail":"Alias taken"}"#,
        ));
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message("Failed to create link"), "Alias taken");
        assert_eq!(err.to_string(), "request failed with status 400: Alias taken");
    }

    #[test]
    fn detail_validation_list_form() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"too short"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; too short")
        );
    }

    #[test]
    fn falls_back_without_detail() {
        let err = ApiError::from_response(&HttpResponse::new(500, "<html>oops</html>"));
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("Login failed"), "Login failed");
        assert_eq!(err.to_string(), "request failed with status 500");

        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.user_message("Registration failed"), "Registration failed");
    }
}
