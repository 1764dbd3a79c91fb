//! 步骤调度器
//!
//! 定位并调用拦截器上声明的生命周期步骤，
//! 把三种结果（有返回值 / 执行完成 / 未声明）规范化为显式的枚举，
//! 让流水线可以独立判断"这一步有没有跑"和"这一步有没有产生值"。

use crate::error::{InterceptorError, InterceptorResult};
use crate::interceptor::Interceptor;
use crate::step::{StepArgs, StepFn, StepKind, StepValue};
use std::fmt;

/// 步骤调用结果
pub enum StepOutcome {
    /// 步骤执行并返回了值，值原样传出
    Returned(StepValue),
    /// 步骤执行完成，声明时即无返回值
    Completed,
    /// 拦截器未声明该步骤，什么都没有执行
    Skipped,
}

impl StepOutcome {
    /// 该步骤是否实际执行了
    pub fn ran(&self) -> bool {
        !matches!(self, StepOutcome::Skipped)
    }

    /// 取出返回值（仅 `Returned` 有值）
    pub fn into_value(self) -> Option<StepValue> {
        match self {
            StepOutcome::Returned(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Debug for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Returned(_) => write!(f, "Returned(..)"),
            StepOutcome::Completed => write!(f, "Completed"),
            StepOutcome::Skipped => write!(f, "Skipped"),
        }
    }
}

/// 步骤调度器
///
/// 无状态，跨请求不持有任何数据，可从多个请求处理线程并发调用
#[derive(Debug, Default, Clone, Copy)]
pub struct StepInvoker;

impl StepInvoker {
    /// 创建步骤调度器
    pub fn new() -> Self {
        Self
    }

    /// 尝试调用拦截器上指定的生命周期步骤
    ///
    /// - 步骤未声明：返回 [`StepOutcome::Skipped`]，不调用任何代码
    /// - 参数个数与声明不符：返回参数错误，处理函数完全不会被调用
    /// - 处理函数报错：错误原样向上传递，不做包装转换
    pub fn try_invoke(
        &self,
        interceptor: &Interceptor,
        kind: StepKind,
        args: &StepArgs,
    ) -> InterceptorResult<StepOutcome> {
        let Some(handler) = interceptor.step(kind)? else {
            return Ok(StepOutcome::Skipped);
        };

        if handler.arity() != args.len() {
            return Err(InterceptorError::ArgumentCountMismatch {
                interceptor: interceptor.name().to_string(),
                kind,
                expected: handler.arity(),
                actual: args.len(),
            });
        }

        match handler.func() {
            StepFn::Void(f) => {
                f(args)?;
                Ok(StepOutcome::Completed)
            }
            StepFn::Value(f) => Ok(StepOutcome::Returned(f(args)?)),
        }
    }
}
