//! # Wyvern Web
//!
//! Wyvern 框架的 Web 响应层，基于 Axum 构建
//!
//! ## 核心特性
//!
//! - **流式下载** - 有界缓冲区分块拷贝，响应体大小不受内存限制
//! - **下载策略族** - 字节源 / 文件 / 内存三种下载形式，统一的 Download 契约
//! - **响应端抽象** - 只依赖设置响应头与写出字节两个能力
//! - **Axum 集成** - 阻塞拷贝在工作线程上执行，经通道流式交给 HTTP 层

pub mod config;
pub mod constants;
pub mod download;
pub mod response;
pub mod sink;

// 重新导出常用类型
pub use config::DownloadSettings;
pub use download::{BytesDownload, Download, DownloadError, FileDownload, StreamDownload};
pub use response::pipeline_error_response;
pub use sink::ResponseSink;

/// 预导入模块
pub mod prelude {
    pub use crate::config::DownloadSettings;
    pub use crate::download::{
        BytesDownload, Download, DownloadError, FileDownload, StreamDownload,
    };
    pub use crate::response::pipeline_error_response;
    pub use crate::sink::ResponseSink;

    pub use axum;
    pub use axum::http::StatusCode;
    pub use axum::response::{IntoResponse, Response};
}
