//! 拦截器流水线
//!
//! 按优先级排序的拦截器序列。提供两种驱动方式：
//! [`InterceptorPipeline::run_step`] 对单个生命周期步骤做扁平遍历，
//! [`InterceptorPipeline::execute`] 围绕目标动作执行完整的嵌套链路。

use crate::error::InterceptorResult;
use crate::interceptor::Interceptor;
use crate::invoker::{StepInvoker, StepOutcome};
use crate::stack::InterceptorStack;
use crate::step::{StepArgs, StepKind};
use std::any::Any;
use std::sync::Arc;

/// 链路末端的目标动作
type Action = Box<dyn FnOnce() -> InterceptorResult<()> + Send>;

/// 拦截器流水线
///
/// 请求作用域之外不持有任何可变状态：注册在启动阶段完成，
/// 之后的执行是只读遍历，可从多个请求处理线程并发使用
#[derive(Debug, Default)]
pub struct InterceptorPipeline {
    interceptors: Vec<Arc<Interceptor>>,
}

impl InterceptorPipeline {
    /// 创建空流水线
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册拦截器，并按优先级重新排序
    pub fn register(&mut self, interceptor: Interceptor) {
        self.register_arc(Arc::new(interceptor));
    }

    /// 注册已共享的拦截器实例
    pub fn register_arc(&mut self, interceptor: Arc<Interceptor>) {
        tracing::debug!("Registering interceptor: {}", interceptor.name());
        self.interceptors.push(interceptor);
        self.interceptors.sort_by_key(|i| i.priority());
    }

    /// 已注册的拦截器数量
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// 是否没有注册任何拦截器
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// 校验所有拦截器的步骤表配置
    ///
    /// 配置错误应当在启动时暴露，而不是等到首个请求
    pub fn validate(&self) -> InterceptorResult<()> {
        for interceptor in &self.interceptors {
            interceptor.validate()?;
        }
        Ok(())
    }

    /// 单独执行一个生命周期步骤
    ///
    /// 依次对每个拦截器调用该步骤并收集三态结果；
    /// 任何一个步骤出错即中止遍历，错误向上传递
    pub fn run_step(
        &self,
        kind: StepKind,
        args: &StepArgs,
    ) -> InterceptorResult<Vec<StepOutcome>> {
        let invoker = StepInvoker::new();
        let mut outcomes = Vec::with_capacity(self.interceptors.len());
        for interceptor in &self.interceptors {
            outcomes.push(invoker.try_invoke(interceptor, kind, args)?);
        }
        Ok(outcomes)
    }

    /// 围绕目标动作执行完整的拦截器链
    ///
    /// 对链路中的每个拦截器依次执行：
    /// 1. before 步骤（参数为 `args` 本身）
    /// 2. around 步骤（参数为 `args` 加上追加在末尾的
    ///    [`InterceptorStack`] 续接句柄）；未声明 around 时自动下行
    /// 3. after 步骤（剩余链路返回后执行）
    ///
    /// 任何一步出错即中止剩余链路，错误向上传递
    pub fn execute<F>(&self, args: StepArgs, action: F) -> InterceptorResult<()>
    where
        F: FnOnce() -> InterceptorResult<()> + Send + 'static,
    {
        let chain: Arc<[Arc<Interceptor>]> = self.interceptors.clone().into();
        run_from(chain, 0, Arc::new(args), Box::new(action))
    }
}

fn run_from(
    chain: Arc<[Arc<Interceptor>]>,
    index: usize,
    args: Arc<StepArgs>,
    action: Action,
) -> InterceptorResult<()> {
    let Some(interceptor) = chain.get(index) else {
        return action();
    };
    let interceptor = Arc::clone(interceptor);
    let invoker = StepInvoker::new();

    invoker.try_invoke(&interceptor, StepKind::Before, &args)?;

    if interceptor.step(StepKind::Around)?.is_some() {
        let next_chain = Arc::clone(&chain);
        let next_args = Arc::clone(&args);
        let stack = Arc::new(InterceptorStack::new(move || {
            run_from(next_chain, index + 1, next_args, action)
        }));
        let around_args = args.extended_with(stack as Arc<dyn Any + Send + Sync>);
        invoker.try_invoke(&interceptor, StepKind::Around, &around_args)?;
    } else {
        run_from(Arc::clone(&chain), index + 1, Arc::clone(&args), action)?;
    }

    invoker.try_invoke(&interceptor, StepKind::After, &args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterceptorError;
    use anyhow::anyhow;
    use parking_lot::Mutex;

    /// 记录执行顺序的共享日志
    fn trace_log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn tracing_interceptor(name: &str, priority: i32, log: &Arc<Mutex<Vec<String>>>) -> Interceptor {
        let before_log = Arc::clone(log);
        let around_log = Arc::clone(log);
        let after_log = Arc::clone(log);
        let before_name = format!("{name}:before");
        let around_name = name.to_string();
        let after_name = format!("{name}:after");

        Interceptor::builder(name)
            .priority(priority)
            .on(StepKind::Before, 0, move |_| {
                before_log.lock().push(before_name.clone());
                Ok(())
            })
            .on(StepKind::Around, 1, move |args| {
                let stack: &InterceptorStack = args.require(0)?;
                around_log.lock().push(format!("{around_name}:around"));
                stack.next()
            })
            .on(StepKind::After, 0, move |_| {
                after_log.lock().push(after_name.clone());
                Ok(())
            })
            .build()
    }

    #[test]
    fn test_execute_nests_steps_in_priority_order() {
        let log = trace_log();
        let mut pipeline = InterceptorPipeline::new();
        // 注册顺序与优先级相反，执行顺序必须由优先级决定
        pipeline.register(tracing_interceptor("inner", 20, &log));
        pipeline.register(tracing_interceptor("outer", 10, &log));

        let action_log = Arc::clone(&log);
        pipeline
            .execute(StepArgs::new(), move || {
                action_log.lock().push("action".to_string());
                Ok(())
            })
            .unwrap();

        assert_eq!(
            log.lock().as_slice(),
            [
                "outer:before",
                "outer:around",
                "inner:before",
                "inner:around",
                "action",
                "inner:after",
                "outer:after",
            ]
        );
    }

    #[test]
    fn test_around_can_skip_remaining_chain() {
        let log = trace_log();
        let mut pipeline = InterceptorPipeline::new();

        let gate = Interceptor::builder("gate")
            .priority(1)
            .on(StepKind::Around, 1, |_args| {
                // 不调用 stack.next()，剩余链路被跳过
                Ok(())
            })
            .build();
        pipeline.register(gate);
        pipeline.register(tracing_interceptor("downstream", 2, &log));

        let action_log = Arc::clone(&log);
        pipeline
            .execute(StepArgs::new(), move || {
                action_log.lock().push("action".to_string());
                Ok(())
            })
            .unwrap();

        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_interceptor_without_around_descends_automatically() {
        let log = trace_log();
        let mut pipeline = InterceptorPipeline::new();

        let before_log = Arc::clone(&log);
        pipeline.register(
            Interceptor::builder("plain")
                .on(StepKind::Before, 0, move |_| {
                    before_log.lock().push("plain:before".to_string());
                    Ok(())
                })
                .build(),
        );

        let action_log = Arc::clone(&log);
        pipeline
            .execute(StepArgs::new(), move || {
                action_log.lock().push("action".to_string());
                Ok(())
            })
            .unwrap();

        assert_eq!(log.lock().as_slice(), ["plain:before", "action"]);
    }

    #[test]
    fn test_step_error_aborts_remaining_chain() {
        let log = trace_log();
        let mut pipeline = InterceptorPipeline::new();

        pipeline.register(
            Interceptor::builder("failing")
                .priority(1)
                .on(StepKind::Before, 0, |_| Err(anyhow!("denied").into()))
                .build(),
        );
        pipeline.register(tracing_interceptor("downstream", 2, &log));

        let action_log = Arc::clone(&log);
        let err = pipeline
            .execute(StepArgs::new(), move || {
                action_log.lock().push("action".to_string());
                Ok(())
            })
            .unwrap_err();

        assert_eq!(err.to_string(), "denied");
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_run_step_collects_tri_state_outcomes() {
        let mut pipeline = InterceptorPipeline::new();
        pipeline.register(
            Interceptor::builder("with-before")
                .priority(1)
                .on(StepKind::Before, 0, |_| Ok(()))
                .build(),
        );
        pipeline.register(Interceptor::builder("without-before").priority(2).build());

        let outcomes = pipeline
            .run_step(StepKind::Before, &StepArgs::new())
            .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], StepOutcome::Completed));
        assert!(matches!(outcomes[1], StepOutcome::Skipped));
    }

    #[test]
    fn test_validate_surfaces_configuration_errors() {
        let mut pipeline = InterceptorPipeline::new();
        pipeline.register(
            Interceptor::builder("broken")
                .on(StepKind::After, 0, |_| Ok(()))
                .on(StepKind::After, 0, |_| Ok(()))
                .build(),
        );

        let err = pipeline.validate().unwrap_err();
        assert!(matches!(err, InterceptorError::DuplicateStep { .. }));
    }

    #[test]
    fn test_arguments_are_visible_to_every_step() {
        let mut pipeline = InterceptorPipeline::new();
        pipeline.register(
            Interceptor::builder("inspecting")
                .on(StepKind::Before, 1, |args| {
                    let path: &String = args.require(0)?;
                    assert_eq!(path, "/orders/42");
                    Ok(())
                })
                .on(StepKind::Around, 2, |args| {
                    let path: &String = args.require(0)?;
                    assert_eq!(path, "/orders/42");
                    let stack: &InterceptorStack = args.require(1)?;
                    stack.next()
                })
                .build(),
        );

        let args = StepArgs::new().with(String::from("/orders/42"));
        pipeline.execute(args, || Ok(())).unwrap();
    }
}
