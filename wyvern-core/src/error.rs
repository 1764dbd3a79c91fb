//! 统一的错误处理类型
//!
//! 框架自身的错误使用 thiserror 定义具体分类；
//! 应用代码推荐直接使用 anyhow::Result，并通过 .context() 附加上下文信息。

use std::path::PathBuf;
use thiserror::Error;

/// 框架启动与配置阶段的错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 日志系统初始化失败（通常是重复初始化）
    #[error("failed to initialize logging: {0}")]
    LoggingInitFailed(String),

    /// 配置文件读取失败
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 框架级 Result 别名
pub type ApplicationResult<T> = std::result::Result<T, ApplicationError>;

// 应用层统一使用 anyhow::Result，符合 Rust 社区最佳实践
pub use anyhow::Result;
