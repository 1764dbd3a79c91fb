//! 拦截器错误类型

use crate::step::StepKind;
use thiserror::Error;

/// 拦截器执行结果
pub type InterceptorResult<T> = Result<T, InterceptorError>;

/// 拦截器调度过程中的错误
///
/// 配置类错误（重复步骤、参数不匹配）是程序错误，应当在启动校验或
/// 首次请求时大声失败；步骤自身的错误原样向上传递，由流水线的调用方
/// 决定如何中止剩余链路并转换为请求失败。
#[derive(Debug, Error)]
pub enum InterceptorError {
    /// 同一拦截器对同一生命周期步骤声明了多个处理函数
    #[error("interceptor '{interceptor}' declares more than one {kind} step")]
    DuplicateStep {
        interceptor: String,
        kind: StepKind,
    },

    /// 调用参数个数与步骤声明不一致
    #[error(
        "{kind} step of interceptor '{interceptor}' expects {expected} argument(s), got {actual}"
    )]
    ArgumentCountMismatch {
        interceptor: String,
        kind: StepKind,
        expected: usize,
        actual: usize,
    },

    /// 步骤参数缺失或类型与处理函数期望不一致
    #[error("step argument {index} is missing or has an unexpected type")]
    ArgumentType { index: usize },

    /// 步骤处理函数自身返回的错误，原样向上传递
    #[error(transparent)]
    Step(#[from] anyhow::Error),
}
