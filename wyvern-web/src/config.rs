//! 下载相关配置

use crate::constants::{DEFAULT_DOWNLOAD_BUFFER_SIZE, DOWNLOAD_BUFFER_SIZE};
use serde::Deserialize;
use std::path::Path;
use wyvern_core::config;
use wyvern_core::error::ApplicationResult;

/// 下载配置
///
/// TOML 示例：
///
/// ```toml
/// buffer-size = 16384
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DownloadSettings {
    /// 拷贝缓冲区大小（字节）
    pub buffer_size: usize,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
        }
    }
}

impl DownloadSettings {
    /// 从 TOML 文件加载，文件缺失时使用默认值
    ///
    /// 环境变量 `WYVERN_DOWNLOAD_BUFFER_SIZE` 可覆盖文件中的取值
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let mut settings: Self = config::load_toml_or_default(path)?;

        if let Some(value) = config::env_override(DOWNLOAD_BUFFER_SIZE) {
            match value.parse() {
                Ok(size) => settings.buffer_size = size,
                Err(_) => {
                    tracing::warn!(
                        value = %value,
                        "Ignoring invalid download buffer size override"
                    );
                }
            }
        }

        Ok(settings)
    }
}
