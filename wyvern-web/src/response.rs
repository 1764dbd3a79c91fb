//! Axum 响应适配
//!
//! 把下载类型转换为 axum 响应：响应头来自下载自身的元信息，
//! 响应体由阻塞拷贝循环在 spawn_blocking 工作线程上驱动，
//! 经由有界通道以流的形式交给 HTTP 层，大响应体不会阻塞事件循环，
//! 也不会整体驻留内存。

use crate::constants::DEFAULT_DOWNLOAD_CHANNEL_CAPACITY;
use crate::download::{BytesDownload, Download, DownloadError, FileDownload};
use crate::sink::ResponseSink;
use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use std::io;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use wyvern_interceptor::InterceptorError;

/// 把响应体字节送入通道的响应端
///
/// 响应头在构建响应时已经由下载的元信息设置，
/// 写出过程中的头调用在这里不再生效
struct ChannelSink {
    tx: mpsc::Sender<Result<Bytes, DownloadError>>,
}

impl ResponseSink for ChannelSink {
    fn set_header(&mut self, _name: &str, _value: &str) {}

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(chunk)))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response receiver dropped"))
    }
}

/// 在工作线程上驱动阻塞写出，返回流式响应体
fn streaming_body<D>(mut download: D) -> Body
where
    D: Download + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Result<Bytes, DownloadError>>(DEFAULT_DOWNLOAD_CHANNEL_CAPACITY);

    tokio::task::spawn_blocking(move || {
        let mut sink = ChannelSink { tx: tx.clone() };
        if let Err(e) = download.write_to(&mut sink) {
            tracing::error!("❌ Download streaming failed: {}", e);
            let _ = tx.blocking_send(Err(e));
        }
    });

    Body::from_stream(ReceiverStream::new(rx))
}

/// 统一的 JSON 错误响应体
fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "error": status.as_u16(),
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}

/// 把拦截器错误转换为请求失败响应
///
/// 配置错误与步骤错误都以 500 呈现，细节只进日志不进响应体
pub fn pipeline_error_response(err: &InterceptorError) -> Response {
    tracing::error!("❌ Interceptor pipeline failed: {}", err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "request processing failed",
    )
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        tracing::error!("❌ Download failed: {}", self);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "download failed")
    }
}

impl IntoResponse for FileDownload {
    fn into_response(self) -> Response {
        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, self.content_type())
            .header(header::CONTENT_DISPOSITION, self.disposition());
        if let Some(len) = self.size_hint() {
            builder = builder.header(header::CONTENT_LENGTH, len);
        }

        match builder.body(streaming_body(self)) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("❌ Failed to build download response: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "download failed")
            }
        }
    }
}

impl IntoResponse for BytesDownload {
    fn into_response(self) -> Response {
        let builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, self.content_type())
            .header(header::CONTENT_DISPOSITION, self.disposition())
            .header(header::CONTENT_LENGTH, self.data().len());

        match builder.body(Body::from(self.into_data())) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("❌ Failed to build download response: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "download failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_bytes_download_into_response() {
        let response = BytesDownload::new(&b"hello"[..], "text/plain", "hello.txt").into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=hello.txt"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_file_download_streams_large_body() {
        let dir = std::env::temp_dir().join("wyvern-web-response-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("blob.bin");
        let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &payload).unwrap();

        let download = FileDownload::open(&path, "application/octet-stream")
            .unwrap()
            .with_buffer_size(1024);
        let response = download.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            &payload.len().to_string()
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], &payload[..]);
    }

    #[tokio::test]
    async fn test_pipeline_error_response_is_500() {
        let err = InterceptorError::Step(anyhow!("boom"));
        let response = pipeline_error_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
