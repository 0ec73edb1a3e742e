//! 浏览器 HTTP 传输
//!
//! 基于 `gloo-net` 的 fetch 封装，实现核心库的 [`HttpClient`] 特性。
//! 超时由 `gloo-timers` 计时，与请求竞速。

use futures::future::{Either, select};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use shawty::{ApiError, ApiResult, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use std::time::Duration;

/// fetch 传输
#[derive(Debug, Clone)]
pub struct FetchClient {
    timeout: Duration,
}

impl FetchClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn builder(req: &HttpRequest) -> RequestBuilder {
        let builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Patch => Request::patch(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };
        req.headers
            .iter()
            .fold(builder, |builder, (key, value)| builder.header(key, value))
    }

    async fn fetch(req: HttpRequest) -> ApiResult<HttpResponse> {
        let builder = Self::builder(&req);
        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Encode(e.to_string()))?;

        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse::new(status, body))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let millis = u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX);
        let fetch = Box::pin(Self::fetch(req));
        let timer = Box::pin(TimeoutFuture::new(millis));

        match select(fetch, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(ApiError::Timeout(self.timeout)),
        }
    }
}
