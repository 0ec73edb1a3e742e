//! 定时器封装模块
//!
//! 基于 `gloo-timers` 的防抖工具。当视图销毁时，自动取消尚未触发的回调。

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// 防抖器
///
/// 每次 [`Debounce::call`] 都会取消上一次尚未触发的回调，
/// 只有最后一次调用在静默 `millis` 毫秒后执行。
#[derive(Clone, Copy)]
pub struct Debounce {
    pending: StoredValue<Option<Timeout>, LocalStorage>,
    millis: u32,
}

impl Debounce {
    pub fn new(millis: u32) -> Self {
        let pending = StoredValue::new_local(None::<Timeout>);
        on_cleanup(move || {
            pending.try_update_value(|slot| slot.take().map(Timeout::cancel));
        });
        Self { pending, millis }
    }

    pub fn call(&self, callback: impl FnOnce() + 'static) {
        let timeout = Timeout::new(self.millis, callback);
        // 替换即取消：Timeout 被 drop 时会清除定时器
        self.pending.try_update_value(|slot| *slot = Some(timeout));
    }

    pub fn cancel(&self) {
        self.pending.try_update_value(|slot| slot.take().map(Timeout::cancel));
    }
}
