//! 响应输出抽象

/// 下载写出的响应端
///
/// 下载类型只依赖响应端的两个能力：设置响应头与写出响应体字节。
/// 具体实现可以是 HTTP 响应、测试缓冲区或者任何字节汇。
pub trait ResponseSink {
    /// 设置响应头
    ///
    /// 必须在写出任何响应体字节之前调用
    fn set_header(&mut self, name: &str, value: &str);

    /// 写出一段响应体字节
    ///
    /// 实现方保证写出顺序与调用顺序一致；
    /// 连接中断等底层故障以 I/O 错误的形式返回
    fn write_body(&mut self, chunk: &[u8]) -> std::io::Result<()>;
}
