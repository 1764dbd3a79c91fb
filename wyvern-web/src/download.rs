//! 下载策略族
//!
//! 提供三种下载形式：任意字节源的流式下载、文件下载与内存字节下载。
//! 所有形式都通过有界缓冲区分块拷贝写出响应体，
//! 内存占用与响应体大小无关。

use crate::constants::DEFAULT_DOWNLOAD_BUFFER_SIZE;
use crate::sink::ResponseSink;
use bytes::Bytes;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content-type 响应头名称
pub const CONTENT_TYPE_HEADER: &str = "Content-type";

/// Content-disposition 响应头名称
pub const CONTENT_DISPOSITION_HEADER: &str = "Content-disposition";

/// Content-Length 响应头名称
pub const CONTENT_LENGTH_HEADER: &str = "Content-Length";

/// 下载写出过程中的错误
///
/// 任何一种都意味着当前响应不可恢复：已写出的字节无法收回，
/// 调用方不应对同一个响应重试
#[derive(Debug, Error)]
pub enum DownloadError {
    /// 下载文件打开失败
    #[error("failed to open download file '{path}'")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 字节源读取失败
    #[error("failed to read download source")]
    Read(#[source] io::Error),

    /// 响应体写出失败
    #[error("failed to write response body")]
    Write(#[source] io::Error),
}

/// 下载策略的公共契约
pub trait Download {
    /// MIME 类型
    fn content_type(&self) -> &str;

    /// 文件名，由设置 Content-disposition 的下载形式使用
    fn file_name(&self) -> &str;

    /// 响应体字节数，已知时用于 Content-Length
    fn size_hint(&self) -> Option<u64> {
        None
    }

    /// 将响应头与全部响应体字节写出到响应端
    ///
    /// 响应头在任何响应体字节之前设置
    fn write_to(&mut self, sink: &mut dyn ResponseSink) -> Result<(), DownloadError>;
}

/// 分块拷贝：用固定大小的中间缓冲区把字节源全部写到响应端
///
/// 返回写出的总字节数
fn copy_to_sink<R: Read + ?Sized>(
    source: &mut R,
    sink: &mut dyn ResponseSink,
    buffer_size: usize,
) -> Result<u64, DownloadError> {
    // 缓冲区容量至少为 1，否则读取永远返回 0
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut written = 0u64;

    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DownloadError::Read(e)),
        };
        sink.write_body(&buffer[..read]).map_err(DownloadError::Write)?;
        written += read as u64;
    }

    Ok(written)
}

/// 流式下载
///
/// 最小的下载形式：设置 Content-type 后把字节源全部拷贝到响应端。
/// 字节源以可变借用传入，写出期间由本类型独占使用；
/// 源的关闭（释放）仍由调用方负责。
pub struct StreamDownload<'a, R: Read> {
    source: &'a mut R,
    content_type: String,
    file_name: String,
    buffer_size: usize,
}

impl<'a, R: Read> StreamDownload<'a, R> {
    /// 创建流式下载
    pub fn new(
        source: &'a mut R,
        content_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            content_type: content_type.into(),
            file_name: file_name.into(),
            buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
        }
    }

    /// 设置拷贝缓冲区大小
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

impl<R: Read> Download for StreamDownload<'_, R> {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn write_to(&mut self, sink: &mut dyn ResponseSink) -> Result<(), DownloadError> {
        sink.set_header(CONTENT_TYPE_HEADER, &self.content_type);
        copy_to_sink(&mut *self.source, sink, self.buffer_size)?;
        Ok(())
    }
}

/// 文件下载
///
/// 持有已打开的文件句柄，设置 Content-type、Content-disposition 与
/// Content-Length 后分块写出。文件由本类型拥有，随值析构关闭。
#[derive(Debug)]
pub struct FileDownload {
    file: File,
    content_type: String,
    file_name: String,
    attachment: bool,
    buffer_size: usize,
}

impl FileDownload {
    /// 用已打开的文件创建下载，默认以附件形式提供
    pub fn new(file: File, content_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            file,
            content_type: content_type.into(),
            file_name: file_name.into(),
            attachment: true,
            buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
        }
    }

    /// 打开路径指向的文件并创建下载，文件名取自路径
    pub fn open(path: &Path, content_type: impl Into<String>) -> Result<Self, DownloadError> {
        let file = File::open(path).map_err(|source| DownloadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file, content_type, file_name))
    }

    /// 以内联形式提供（浏览器就地展示而不是保存）
    pub fn inline(mut self) -> Self {
        self.attachment = false;
        self
    }

    /// 设置拷贝缓冲区大小
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub(crate) fn disposition(&self) -> String {
        let kind = if self.attachment { "attachment" } else { "inline" };
        format!("{}; filename={}", kind, self.file_name)
    }
}

impl Download for FileDownload {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn size_hint(&self) -> Option<u64> {
        self.file.metadata().ok().map(|m| m.len())
    }

    fn write_to(&mut self, sink: &mut dyn ResponseSink) -> Result<(), DownloadError> {
        sink.set_header(CONTENT_TYPE_HEADER, &self.content_type);
        sink.set_header(CONTENT_DISPOSITION_HEADER, &self.disposition());
        if let Some(len) = self.size_hint() {
            sink.set_header(CONTENT_LENGTH_HEADER, &len.to_string());
        }
        copy_to_sink(&mut self.file, sink, self.buffer_size)?;
        Ok(())
    }
}

/// 内存字节下载
///
/// 响应体已全部在内存中，单次写出
pub struct BytesDownload {
    data: Bytes,
    content_type: String,
    file_name: String,
    attachment: bool,
}

impl BytesDownload {
    /// 创建内存字节下载，默认以附件形式提供
    pub fn new(
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            file_name: file_name.into(),
            attachment: true,
        }
    }

    /// 以内联形式提供
    pub fn inline(mut self) -> Self {
        self.attachment = false;
        self
    }

    /// 响应体字节
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub(crate) fn into_data(self) -> Bytes {
        self.data
    }

    pub(crate) fn disposition(&self) -> String {
        let kind = if self.attachment { "attachment" } else { "inline" };
        format!("{}; filename={}", kind, self.file_name)
    }
}

impl Download for BytesDownload {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn write_to(&mut self, sink: &mut dyn ResponseSink) -> Result<(), DownloadError> {
        sink.set_header(CONTENT_TYPE_HEADER, &self.content_type);
        sink.set_header(CONTENT_DISPOSITION_HEADER, &self.disposition());
        sink.set_header(CONTENT_LENGTH_HEADER, &self.data.len().to_string());
        sink.write_body(&self.data).map_err(DownloadError::Write)
    }
}
