//! 框架配置常量定义

// ==================== 下载配置 ====================

/// 下载拷贝缓冲区大小配置键
pub const DOWNLOAD_BUFFER_SIZE: &str = "download.buffer-size";

/// 默认拷贝缓冲区大小（字节）
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 8 * 1024;

/// 流式响应体通道容量（块数）
pub const DEFAULT_DOWNLOAD_CHANNEL_CAPACITY: usize = 8;
