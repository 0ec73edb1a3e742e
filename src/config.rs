use shawty_shared::{DEFAULT_API_BASE_URL, DEFAULT_TOKEN_STORAGE_KEY};
use std::time::Duration;

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，如果环境变量中没有定义，则使用这些值
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const ENV_API_URL: &str = "SHAWTY_API_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SHAWTY_REQUEST_TIMEOUT_SECS";
pub const ENV_TOKEN_STORAGE_KEY: &str = "SHAWTY_TOKEN_KEY";

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 后端 API 根地址（不带结尾的 `/`）
    pub api_base_url: String,
    /// 单个请求的超时时间
    pub request_timeout: Duration,
    /// 持久化会话令牌时使用的键
    pub token_storage_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    /// 通过查找函数解析配置，读不到或无法解析的值使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = non_empty(ENV_API_URL)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let request_timeout = match non_empty(ENV_REQUEST_TIMEOUT_SECS).map(|v| v.parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => Duration::from_secs(secs),
            Some(_) => {
                tracing::warn!(
                    key = ENV_REQUEST_TIMEOUT_SECS,
                    "invalid request timeout, using default"
                );
                defaults.request_timeout
            }
            None => defaults.request_timeout,
        };

        let token_storage_key =
            non_empty(ENV_TOKEN_STORAGE_KEY).unwrap_or(defaults.token_storage_key);

        Self {
            api_base_url,
            request_timeout,
            token_storage_key,
        }
    }

    /// 从进程环境变量读取（原生构建）
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从编译期环境变量读取（浏览器构建没有进程环境）
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            match key {
                ENV_API_URL => option_env!("SHAWTY_API_URL"),
                ENV_REQUEST_TIMEOUT_SECS => option_env!("SHAWTY_REQUEST_TIMEOUT_SECS"),
                ENV_TOKEN_STORAGE_KEY => option_env!("SHAWTY_TOKEN_KEY"),
                _ => None,
            }
            .map(str::to_string)
        })
    }
}
