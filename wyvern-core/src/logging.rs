//! 日志系统初始化
//!
//! 基于 tracing / tracing-subscriber 的日志配置，
//! 支持通过构建器或环境变量控制日志级别与输出格式

use crate::error::{ApplicationError, ApplicationResult};
use std::str::FromStr;
use tracing_subscriber::{fmt, EnvFilter};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 紧凑格式（默认）
    Compact,
    /// 完整格式（带目标模块路径）
    Full,
    /// JSON 格式（适合生产环境日志采集）
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "full" => Ok(LogFormat::Full),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// 日志配置
///
/// 使用构建器风格配置，调用 [`LoggingConfig::init`] 完成初始化：
///
/// ```ignore
/// use wyvern_core::logging::{LogFormat, LogLevel, LoggingConfig};
///
/// LoggingConfig::new()
///     .level(LogLevel::Debug)
///     .format(LogFormat::Full)
///     .init()?;
/// ```
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别（默认：Info）
    pub level: LogLevel,

    /// 日志格式（默认：Compact）
    pub format: LogFormat,

    /// 是否显示目标（模块路径）（默认：false）
    pub show_target: bool,

    /// 自定义过滤器，例如 "wyvern_web=debug,tower=warn"
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            show_target: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    /// 创建新的日志配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置日志级别
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// 设置日志格式
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// 设置是否显示目标模块路径
    pub fn show_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    /// 设置自定义过滤器
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// 从环境变量读取配置
    ///
    /// 依次识别 RUST_LOG（过滤器）、WYVERN_LOG_LEVEL、WYVERN_LOG_FORMAT
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            config.filter = Some(rust_log);
        }

        if let Ok(level) = std::env::var("WYVERN_LOG_LEVEL") {
            if let Ok(level) = level.parse() {
                config.level = level;
            }
        }

        if let Ok(format) = std::env::var("WYVERN_LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                config.format = format;
            }
        }

        config
    }

    /// 初始化日志系统
    pub fn init(self) -> ApplicationResult<()> {
        let env_filter = match &self.filter {
            Some(filter) => EnvFilter::try_new(filter)
                .unwrap_or_else(|_| EnvFilter::new(self.level.to_string())),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.to_string())),
        };

        let builder = fmt().with_env_filter(env_filter).with_target(self.show_target);

        match self.format {
            LogFormat::Compact => builder
                .compact()
                .try_init()
                .map_err(|e| ApplicationError::LoggingInitFailed(e.to_string()))?,
            LogFormat::Full => builder
                .try_init()
                .map_err(|e| ApplicationError::LoggingInitFailed(e.to_string()))?,
            LogFormat::Json => builder
                .json()
                .try_init()
                .map_err(|e| ApplicationError::LoggingInitFailed(e.to_string()))?,
        }

        Ok(())
    }
}
