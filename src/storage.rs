//! 会话令牌持久化
//!
//! 只保存一项数据：会话令牌。键不存在是合法状态（视为未登录）。

use std::cell::RefCell;
use std::rc::Rc;

/// 令牌存储特性
///
/// 浏览器端由 localStorage 实现，测试与原生环境使用 [`MemoryTokenStore`]。
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// 内存中的令牌存储；克隆后共享同一个槽位
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.save(&token.into());
        store
    }

    /// 查看当前保存的令牌
    pub fn peek(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.peek()
    }

    fn save(&self, token: &str) {
        *self.slot.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}
