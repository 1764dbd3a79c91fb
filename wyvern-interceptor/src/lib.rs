//! Wyvern Interceptor - 拦截器生命周期调度
//!
//! 提供类似 Spring HandlerInterceptor 的拦截器能力，支持：
//! - before / around / after 三个生命周期步骤
//! - 步骤表在注册期声明，在查找期校验（同一步骤至多一个处理函数）
//! - 三态调用结果（有返回值 / 执行完成 / 未声明）
//! - 按优先级排序的流水线执行，around 步骤可控制链路是否继续
//! - 通过 inventory 实现编译时自动注册

pub mod error;
pub mod interceptor;
pub mod invoker;
pub mod pipeline;
pub mod registry;
pub mod stack;
pub mod step;

// 重新导出核心类型
pub use error::{InterceptorError, InterceptorResult};
pub use interceptor::{Interceptor, InterceptorBuilder};
pub use invoker::{StepInvoker, StepOutcome};
pub use pipeline::InterceptorPipeline;
pub use registry::{build_pipeline_from_inventory, global_pipeline, InterceptorRegistration};
pub use stack::InterceptorStack;
pub use step::{StepArgs, StepFn, StepHandler, StepKind, StepTable, StepValue};

// 导出 inventory 供注册使用
pub use inventory;

/// 预导入模块
pub mod prelude {
    pub use crate::error::{InterceptorError, InterceptorResult};
    pub use crate::interceptor::{Interceptor, InterceptorBuilder};
    pub use crate::invoker::{StepInvoker, StepOutcome};
    pub use crate::pipeline::InterceptorPipeline;
    pub use crate::registry::{
        build_pipeline_from_inventory, global_pipeline, InterceptorRegistration,
    };
    pub use crate::stack::InterceptorStack;
    pub use crate::step::{StepArgs, StepHandler, StepKind, StepValue};
}
