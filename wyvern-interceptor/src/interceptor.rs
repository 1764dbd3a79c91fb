//! 拦截器定义
//!
//! 拦截器是一组按生命周期步骤注册的处理函数加上元信息（名称、优先级）。
//! 实例的创建与销毁由外部容器负责，这里只承载步骤表，
//! 调度层对拦截器自身的状态不做任何假设。

use crate::error::InterceptorResult;
use crate::step::{StepHandler, StepKind, StepTable};
use std::fmt;

/// 默认优先级，数值越小越先执行
pub const DEFAULT_PRIORITY: i32 = 100;

/// 拦截器
///
/// 通过 [`Interceptor::builder`] 构建：
///
/// ```ignore
/// use wyvern_interceptor::prelude::*;
///
/// let auth = Interceptor::builder("auth")
///     .priority(10)
///     .on(StepKind::Before, 0, |_args| {
///         // 前置检查
///         Ok(())
///     })
///     .on(StepKind::Around, 1, |args| {
///         let stack: &InterceptorStack = args.require(0)?;
///         stack.next()
///     })
///     .build();
/// ```
pub struct Interceptor {
    name: String,
    priority: i32,
    steps: StepTable,
}

impl Interceptor {
    /// 创建拦截器构建器
    pub fn builder(name: impl Into<String>) -> InterceptorBuilder {
        InterceptorBuilder {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            steps: StepTable::new(),
        }
    }

    /// 拦截器名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 拦截器优先级
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// 定位指定生命周期步骤的处理函数
    ///
    /// 语义见 [`StepTable::find`]：未声明返回 `None`，
    /// 重复声明返回配置错误
    pub fn step(&self, kind: StepKind) -> InterceptorResult<Option<&StepHandler>> {
        self.steps.find(kind, &self.name)
    }

    /// 校验步骤表配置
    ///
    /// 对三个生命周期步骤各做一次查找，任何重复声明都会在这里暴露。
    /// 建议在应用启动时调用，而不是等到首个请求
    pub fn validate(&self) -> InterceptorResult<()> {
        for kind in [StepKind::Before, StepKind::Around, StepKind::After] {
            self.step(kind)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("declared_steps", &self.steps.len())
            .finish()
    }
}

/// 拦截器构建器
pub struct InterceptorBuilder {
    name: String,
    priority: i32,
    steps: StepTable,
}

impl InterceptorBuilder {
    /// 设置优先级（默认 100，数值越小越先执行）
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 声明一个无返回值的步骤处理函数
    pub fn on<F>(mut self, kind: StepKind, arity: usize, f: F) -> Self
    where
        F: Fn(&crate::step::StepArgs) -> InterceptorResult<()> + Send + Sync + 'static,
    {
        self.steps.declare(StepHandler::void(kind, arity, f));
        self
    }

    /// 声明一个有返回值的步骤处理函数
    pub fn on_returning<F>(mut self, kind: StepKind, arity: usize, f: F) -> Self
    where
        F: Fn(&crate::step::StepArgs) -> InterceptorResult<crate::step::StepValue>
            + Send
            + Sync
            + 'static,
    {
        self.steps.declare(StepHandler::returning(kind, arity, f));
        self
    }

    /// 直接声明一个步骤处理函数
    pub fn declare(mut self, handler: StepHandler) -> Self {
        self.steps.declare(handler);
        self
    }

    /// 构建拦截器
    ///
    /// 构建本身不校验重复声明，见 [`Interceptor::validate`]
    pub fn build(self) -> Interceptor {
        Interceptor {
            name: self.name,
            priority: self.priority,
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterceptorError;

    #[test]
    fn test_builder_defaults() {
        let interceptor = Interceptor::builder("audit").build();
        assert_eq!(interceptor.name(), "audit");
        assert_eq!(interceptor.priority(), DEFAULT_PRIORITY);
        assert!(interceptor.step(StepKind::Before).unwrap().is_none());
    }

    #[test]
    fn test_builder_declares_steps() {
        let interceptor = Interceptor::builder("audit")
            .priority(5)
            .on(StepKind::Before, 0, |_| Ok(()))
            .on_returning(StepKind::After, 0, |_| Ok(Box::new(1u8) as _))
            .build();

        assert_eq!(interceptor.priority(), 5);
        assert!(interceptor.step(StepKind::Before).unwrap().is_some());
        assert!(interceptor.step(StepKind::After).unwrap().is_some());
        assert!(interceptor.step(StepKind::Around).unwrap().is_none());
        interceptor.validate().unwrap();
    }

    #[test]
    fn test_validate_reports_duplicates() {
        let interceptor = Interceptor::builder("broken")
            .on(StepKind::Before, 0, |_| Ok(()))
            .on(StepKind::Before, 0, |_| Ok(()))
            .build();

        let err = interceptor.validate().unwrap_err();
        assert!(matches!(
            err,
            InterceptorError::DuplicateStep {
                kind: StepKind::Before,
                ..
            }
        ));
    }
}
