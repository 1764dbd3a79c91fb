//! 生命周期步骤定义
//!
//! 步骤（Step）对应请求处理生命周期中的一个阶段。
//! 拦截器按阶段声明处理函数，由 [`crate::invoker::StepInvoker`] 统一调度。

use crate::error::{InterceptorError, InterceptorResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 生命周期步骤类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// 目标动作执行前
    Before,
    /// 环绕目标动作执行，可控制链路是否继续
    Around,
    /// 目标动作执行后
    After,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Before => write!(f, "before"),
            StepKind::Around => write!(f, "around"),
            StepKind::After => write!(f, "after"),
        }
    }
}

/// 步骤返回值
///
/// 动态类型，由调用方按需向下转型
pub type StepValue = Box<dyn Any + Send + Sync>;

/// 步骤调用的位置参数列表
///
/// 参数按位置传递，动态类型；处理函数通过 [`StepArgs::require`]
/// 做类型安全的向下转型。参数值由外部容器（或流水线）提供。
#[derive(Clone, Default)]
pub struct StepArgs {
    values: Vec<Arc<dyn Any + Send + Sync>>,
}

impl StepArgs {
    /// 创建空参数列表
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个参数（构建器风格）
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// 追加一个参数
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(Arc::new(value));
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 尝试获取指定位置的参数
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index).and_then(|v| v.downcast_ref::<T>())
    }

    /// 获取指定位置的参数，缺失或类型不符时返回参数错误
    pub fn require<T: Any>(&self, index: usize) -> InterceptorResult<&T> {
        self.get(index)
            .ok_or(InterceptorError::ArgumentType { index })
    }

    /// 复制当前参数并在末尾追加一个已装箱的值
    pub(crate) fn extended_with(&self, value: Arc<dyn Any + Send + Sync>) -> Self {
        let mut values = self.values.clone();
        values.push(value);
        Self { values }
    }
}

impl fmt::Debug for StepArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepArgs").field("len", &self.len()).finish()
    }
}

/// 步骤处理函数体
///
/// 有无返回值在声明时就已固定，调度器据此把"执行完成但无返回值"
/// 规范化为显式的哨兵结果，而不是语言层面的空值
pub enum StepFn {
    /// 无返回值的处理函数
    Void(Box<dyn Fn(&StepArgs) -> InterceptorResult<()> + Send + Sync>),
    /// 有返回值的处理函数
    Value(Box<dyn Fn(&StepArgs) -> InterceptorResult<StepValue> + Send + Sync>),
}

/// 单个已声明的步骤处理函数
pub struct StepHandler {
    kind: StepKind,
    arity: usize,
    func: StepFn,
}

impl StepHandler {
    /// 声明一个无返回值的步骤处理函数
    ///
    /// `arity` 是处理函数期望的位置参数个数，调度器在调用前校验
    pub fn void<F>(kind: StepKind, arity: usize, f: F) -> Self
    where
        F: Fn(&StepArgs) -> InterceptorResult<()> + Send + Sync + 'static,
    {
        Self {
            kind,
            arity,
            func: StepFn::Void(Box::new(f)),
        }
    }

    /// 声明一个有返回值的步骤处理函数
    pub fn returning<F>(kind: StepKind, arity: usize, f: F) -> Self
    where
        F: Fn(&StepArgs) -> InterceptorResult<StepValue> + Send + Sync + 'static,
    {
        Self {
            kind,
            arity,
            func: StepFn::Value(Box::new(f)),
        }
    }

    /// 步骤类型
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// 期望的参数个数
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn func(&self) -> &StepFn {
        &self.func
    }
}

impl fmt::Debug for StepHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepHandler")
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .field(
                "returns_value",
                &matches!(self.func, StepFn::Value(_)),
            )
            .finish()
    }
}

/// 拦截器声明的步骤表
///
/// 声明阶段不做去重校验，重复声明在查找时才会被发现，
/// 因此一张配置错误的表也能构建出来，错误在首次使用时暴露
#[derive(Default)]
pub struct StepTable {
    handlers: Vec<StepHandler>,
}

impl StepTable {
    /// 创建空步骤表
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明一个步骤处理函数
    pub fn declare(&mut self, handler: StepHandler) {
        self.handlers.push(handler);
    }

    /// 查找指定步骤的处理函数
    ///
    /// - 恰好一个匹配：返回 `Some(handler)`
    /// - 没有匹配：返回 `None`（不是错误）
    /// - 多于一个匹配：配置错误，错误信息中带上步骤类型与拦截器名称
    ///
    /// 纯查找，无副作用，可安全地重复调用
    pub fn find(&self, kind: StepKind, owner: &str) -> InterceptorResult<Option<&StepHandler>> {
        let mut matches = self.handlers.iter().filter(|h| h.kind == kind);
        let first = matches.next();
        if matches.next().is_some() {
            return Err(InterceptorError::DuplicateStep {
                interceptor: owner.to_string(),
                kind,
            });
        }
        Ok(first)
    }

    /// 已声明的步骤个数
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// 是否没有声明任何步骤
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for StepTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepTable")
            .field("handlers", &self.handlers)
            .finish()
    }
}
