//! 环绕步骤的链路续接句柄

use crate::error::InterceptorResult;
use parking_lot::Mutex;
use std::fmt;

type ProceedFn = Box<dyn FnOnce() -> InterceptorResult<()> + Send>;

/// 环绕步骤拿到的链路续接句柄
///
/// 流水线执行到一个声明了 around 步骤的拦截器时，会把剩余链路
/// （后续拦截器加上目标动作）打包成一个句柄，追加在参数列表末尾
/// 传给处理函数。处理函数调用 [`InterceptorStack::next`] 继续执行
/// 剩余链路；不调用则剩余链路被跳过。
pub struct InterceptorStack {
    next: Mutex<Option<ProceedFn>>,
}

impl InterceptorStack {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> InterceptorResult<()> + Send + 'static,
    {
        Self {
            next: Mutex::new(Some(Box::new(f))),
        }
    }

    /// 继续执行剩余链路
    ///
    /// 注意：此方法只能调用一次
    pub fn next(&self) -> InterceptorResult<()> {
        let f = self.next.lock().take();
        match f {
            Some(f) => f(),
            None => panic!("InterceptorStack::next() can only be called once"),
        }
    }

    /// 剩余链路是否已被执行
    pub fn continued(&self) -> bool {
        self.next.lock().is_none()
    }
}

impl fmt::Debug for InterceptorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorStack")
            .field("continued", &self.continued())
            .finish()
    }
}
