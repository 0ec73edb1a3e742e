use crate::error::{ApiError, ApiResult};
use std::collections::HashMap;

pub use shawty_shared::protocol::HttpMethod;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    /// 按名称读取请求头（大小写不敏感）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性 (Trait)
///
/// (?Send) 是因为浏览器环境下 fetch 相关的 future 不是 Send 的。
/// 实现方负责请求超时，超时应返回 `ApiError::Timeout`。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 实现层: Reqwest 客户端 (Native)
// =========================================================

#[cfg(all(feature = "reqwest-client", not(target_arch = "wasm32")))]
pub use native::ReqwestHttpClient;

#[cfg(all(feature = "reqwest-client", not(target_arch = "wasm32")))]
mod native {
    use super::*;
    use std::time::Duration;

    #[derive(Clone)]
    pub struct ReqwestHttpClient {
        client: reqwest::Client,
        timeout: Duration,
    }

    impl ReqwestHttpClient {
        pub fn new(timeout: Duration) -> ApiResult<Self> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| ApiError::Network(format!("Reqwest Error: {e}")))?;
            Ok(Self { client, timeout })
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for ReqwestHttpClient {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            let method = match req.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Patch => reqwest::Method::PATCH,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, &req.url);

            for (k, v) in req.headers {
                builder = builder.header(k, v);
            }

            if let Some(body) = req.body {
                builder = builder.body(body);
            }

            let resp = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.timeout)
                } else {
                    ApiError::Network(format!("Reqwest Error: {e}"))
                }
            })?;

            let status = resp.status().as_u16();
            let body = resp.text().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.timeout)
                } else {
                    ApiError::Network(format!("Reqwest Body Error: {e}"))
                }
            })?;

            Ok(HttpResponse { status, body })
        }
    }
}

// =========================================================
// 测试替身: 记录请求并按路由返回预设响应
// =========================================================

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    pub const BASE_URL: &str = "http://api.test";

    pub type Reply = ApiResult<HttpResponse>;

    enum Scripted {
        Ready(Reply),
        Gated(oneshot::Receiver<Reply>),
    }

    #[derive(Default)]
    struct MockContext {
        log: RefCell<Vec<HttpRequest>>,
        routes: RefCell<HashMap<String, VecDeque<Scripted>>>,
    }

    /// 按 "METHOD /path" 排队响应；同一路由的多次请求依次消费队列
    #[derive(Clone, Default)]
    pub struct MockHttpClient {
        ctx: Rc<MockContext>,
    }

    fn route_key(method: HttpMethod, path: &str) -> String {
        format!("{} {}", method.as_str(), path)
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        fn push(&self, method: HttpMethod, path: &str, scripted: Scripted) {
            self.ctx
                .routes
                .borrow_mut()
                .entry(route_key(method, path))
                .or_default()
                .push_back(scripted);
        }

        pub fn reply(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
            self.push(
                method,
                path,
                Scripted::Ready(Ok(HttpResponse::new(status, body))),
            );
        }

        pub fn fail(&self, method: HttpMethod, path: &str, err: ApiError) {
            self.push(method, path, Scripted::Ready(Err(err)));
        }

        /// 返回一个发送端；请求会一直挂起直到测试通过它送出响应
        pub fn gate(&self, method: HttpMethod, path: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.push(method, path, Scripted::Gated(rx));
            tx
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.ctx.log.borrow().clone()
        }

        pub fn count(&self, method: HttpMethod, path: &str) -> usize {
            let url = format!("{BASE_URL}{path}");
            self.ctx
                .log
                .borrow()
                .iter()
                .filter(|r| r.method == method && r.url == url)
                .count()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            let path = req
                .url
                .strip_prefix(BASE_URL)
                .unwrap_or(&req.url)
                .to_string();
            let key = route_key(req.method, &path);
            self.ctx.log.borrow_mut().push(req);

            let scripted = self
                .ctx
                .routes
                .borrow_mut()
                .get_mut(&key)
                .and_then(|queue| queue.pop_front());

            match scripted {
                Some(Scripted::Ready(reply)) => reply,
                Some(Scripted::Gated(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(ApiError::Network("gate dropped".into()))),
                None => Ok(HttpResponse::new(404, r#"{"detail":"Not Found"}"#)),
            }
        }
    }
}
