//! 演示拦截器
//!
//! 通过 inventory 提交注册信息，首次访问全局流水线时自动装配。
//! 两个拦截器展示了三种生命周期步骤的用法：
//! - request-logging：before / after 记录请求路径
//! - timing：around 测量剩余链路耗时

use std::time::Instant;
use wyvern_interceptor::prelude::*;

/// 请求日志拦截器
fn create_request_logging() -> Interceptor {
    Interceptor::builder("request-logging")
        .priority(10)
        .on(StepKind::Before, 1, |args| {
            let path: &String = args.require(0)?;
            tracing::info!("➡️  {}", path);
            Ok(())
        })
        .on(StepKind::After, 1, |args| {
            let path: &String = args.require(0)?;
            tracing::info!("⬅️  {} completed", path);
            Ok(())
        })
        .build()
}

/// 计时拦截器
///
/// around 步骤的最后一个参数是链路续接句柄，
/// 调用 next() 前后的时间差即剩余链路（含目标动作）的耗时
fn create_timing() -> Interceptor {
    Interceptor::builder("timing")
        .priority(20)
        .on(StepKind::Around, 2, |args| {
            let path: &String = args.require(0)?;
            let stack: &InterceptorStack = args.require(1)?;
            let started = Instant::now();
            let result = stack.next();
            tracing::info!("⏱️  {} took {:?}", path, started.elapsed());
            result
        })
        .build()
}

wyvern_interceptor::inventory::submit! {
    InterceptorRegistration::new("request-logging", create_request_logging)
}

wyvern_interceptor::inventory::submit! {
    InterceptorRegistration::new("timing", create_timing)
}
