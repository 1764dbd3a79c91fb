//! 拦截器编译时注册机制
//!
//! 使用 inventory 在编译期自动收集拦截器注册信息，
//! 应用启动时据此构建全局流水线

use crate::error::InterceptorResult;
use crate::interceptor::Interceptor;
use crate::pipeline::InterceptorPipeline;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// 拦截器注册信息
///
/// 通过 `inventory::submit!` 提交：
///
/// ```ignore
/// use wyvern_interceptor::{Interceptor, InterceptorRegistration, StepKind};
///
/// fn create_audit() -> Interceptor {
///     Interceptor::builder("audit")
///         .on(StepKind::Before, 0, |_| Ok(()))
///         .build()
/// }
///
/// wyvern_interceptor::inventory::submit! {
///     InterceptorRegistration::new("audit", create_audit)
/// }
/// ```
pub struct InterceptorRegistration {
    /// 拦截器名称
    pub name: &'static str,

    /// 创建拦截器实例的函数
    pub create: fn() -> Interceptor,
}

impl InterceptorRegistration {
    /// 创建新的注册信息
    pub const fn new(name: &'static str, create: fn() -> Interceptor) -> Self {
        Self { name, create }
    }
}

inventory::collect!(InterceptorRegistration);

/// 获取所有注册的拦截器注册信息
pub fn get_all_interceptor_registrations() -> impl Iterator<Item = &'static InterceptorRegistration>
{
    inventory::iter::<InterceptorRegistration>.into_iter()
}

/// 从 inventory 收集的注册信息构建流水线
///
/// 构建完成后立即做一次配置校验，
/// 重复的步骤声明在这里就会失败，而不是等到首个请求
pub fn build_pipeline_from_inventory() -> InterceptorResult<InterceptorPipeline> {
    let mut pipeline = InterceptorPipeline::new();

    tracing::info!("🔍 Discovering interceptors from inventory...");

    for registration in get_all_interceptor_registrations() {
        let interceptor = (registration.create)();
        tracing::info!("✅ Auto-registered interceptor: {}", registration.name);
        pipeline.register(interceptor);
    }

    pipeline.validate()?;

    tracing::info!(
        "✅ Interceptor discovery completed: {} interceptor(s) registered",
        pipeline.len()
    );

    Ok(pipeline)
}

/// 全局拦截器流水线
///
/// 首次访问时构建，加载所有通过 inventory 注册的拦截器。
/// 配置错误会中止应用启动。
static GLOBAL_PIPELINE: Lazy<Arc<InterceptorPipeline>> = Lazy::new(|| {
    match build_pipeline_from_inventory() {
        Ok(pipeline) => Arc::new(pipeline),
        Err(e) => {
            tracing::error!("❌ Interceptor configuration invalid: {}", e);
            panic!("interceptor configuration invalid: {e}");
        }
    }
});

/// 获取全局拦截器流水线
pub fn global_pipeline() -> &'static Arc<InterceptorPipeline> {
    &GLOBAL_PIPELINE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepKind;

    fn create_registered() -> Interceptor {
        Interceptor::builder("registered")
            .on(StepKind::Before, 0, |_| Ok(()))
            .build()
    }

    inventory::submit! {
        InterceptorRegistration::new("registered", create_registered)
    }

    #[test]
    fn test_inventory_collects_registrations() {
        let names: Vec<_> = get_all_interceptor_registrations()
            .map(|r| r.name)
            .collect();
        assert!(names.contains(&"registered"));
    }

    #[test]
    fn test_build_pipeline_from_inventory() {
        let pipeline = build_pipeline_from_inventory().unwrap();
        assert!(!pipeline.is_empty());
    }

    #[test]
    fn test_global_pipeline_is_shared() {
        let first = Arc::clone(global_pipeline());
        let second = Arc::clone(global_pipeline());
        assert!(Arc::ptr_eq(&first, &second));
    }
}
