//! 与视图生命周期绑定的异步任务
//!
//! 页面加载数据时通过 [`TaskScope::run`] 包装请求；视图销毁时调用
//! [`TaskScope::cancel`]，尚未完成的请求被中止，结果被丢弃。

use futures::future::{AbortHandle, Abortable};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

#[derive(Default)]
struct ScopeState {
    next_id: u64,
    handles: HashMap<u64, AbortHandle>,
    cancelled: bool,
}

/// 任务结束或被丢弃时从作用域中注销
struct Registration {
    state: Rc<RefCell<ScopeState>>,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.state.borrow_mut().handles.remove(&self.id);
    }
}

/// 一组可中止的 future；克隆共享同一个作用域
#[derive(Clone, Default)]
pub struct TaskScope {
    state: Rc<RefCell<ScopeState>>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在作用域内运行 `fut`
    ///
    /// 作用域被取消后返回 `None`（包括取消之后才调用 `run` 的情况）。
    pub fn run<F>(&self, fut: F) -> impl Future<Output = Option<F::Output>> + use<F>
    where
        F: Future,
    {
        let (handle, abort_reg) = AbortHandle::new_pair();
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            if state.cancelled {
                handle.abort();
            } else {
                state.handles.insert(id, handle);
            }
            id
        };
        let registration = Registration {
            state: Rc::clone(&self.state),
            id,
        };
        let task = Abortable::new(fut, abort_reg);
        async move {
            let result = task.await.ok();
            drop(registration);
            result
        }
    }

    /// 中止所有进行中的任务
    pub fn cancel(&self) {
        let handles = {
            let mut state = self.state.borrow_mut();
            state.cancelled = true;
            std::mem::take(&mut state.handles)
        };
        for handle in handles.into_values() {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;

    #[tokio::test]
    async fn test_completes_when_not_cancelled() {
        let scope = TaskScope::new();
        assert_eq!(scope.run(async { 42 }).await, Some(42));
        assert!(!scope.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_drops_in_flight_result() {
        let scope = TaskScope::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let task = scope.run(async move { rx.await.ok() });
        futures::pin_mut!(task);
        assert!(futures::poll!(task.as_mut()).is_pending());

        scope.cancel();
        let _ = tx.send(7);
        assert_eq!(task.await, None);
    }

    fn tracked(scope: &TaskScope) -> usize {
        scope.state.borrow().handles.len()
    }

    #[tokio::test]
    async fn test_finished_tasks_are_released() {
        let scope = TaskScope::new();
        for i in 0..1000 {
            assert_eq!(scope.run(async move { i }).await, Some(i));
        }
        assert_eq!(tracked(&scope), 0);
    }

    #[tokio::test]
    async fn test_pending_task_is_tracked_until_done_or_dropped() {
        let scope = TaskScope::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let task = scope.run(async move { rx.await.ok() });
        futures::pin_mut!(task);
        assert!(futures::poll!(task.as_mut()).is_pending());
        assert_eq!(tracked(&scope), 1);

        let _ = tx.send(3);
        assert_eq!(task.await, Some(Some(3)));
        assert_eq!(tracked(&scope), 0);

        let never = scope.run(futures::future::pending::<()>());
        assert_eq!(tracked(&scope), 1);
        drop(never);
        assert_eq!(tracked(&scope), 0);
    }

    #[tokio::test]
    async fn test_run_after_cancel_never_resolves_value() {
        let scope = TaskScope::new();
        scope.cancel();
        assert_eq!(scope.clone().run(async { "late" }).await, None);
        assert!(scope.is_cancelled());
    }
}
