//! LocalStorage 封装模块
//!
//! 会话令牌以纯字符串保存（不经过 JSON 编码），与其他客户端共用同一个键。

use gloo_storage::{LocalStorage as BrowserStorage, Storage};
use leptos::logging;
use shawty::TokenStore;

/// 基于 localStorage 的令牌存储
#[derive(Debug, Clone)]
pub struct LocalTokenStore {
    key: String,
}

impl LocalTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenStore for LocalTokenStore {
    fn load(&self) -> Option<String> {
        BrowserStorage::raw()
            .get_item(&self.key)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) {
        if BrowserStorage::raw().set_item(&self.key, token).is_err() {
            logging::warn!("[Storage] failed to persist session token");
        }
    }

    fn clear(&self) {
        BrowserStorage::delete(&self.key);
    }
}
