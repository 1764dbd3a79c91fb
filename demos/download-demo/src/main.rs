mod interceptors;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wyvern_core::prelude::*;
use wyvern_interceptor::prelude::*;
use wyvern_web::prelude::*;

// ==================== 应用状态 ====================

#[derive(Clone)]
struct AppState {
    settings: DownloadSettings,
    report_path: PathBuf,
}

// ==================== 处理函数 ====================

/// GET /download/report
///
/// 文件下载：动作在完整拦截器链内执行，
/// 响应体由阻塞拷贝循环在工作线程上流式写出
async fn download_report(State(state): State<AppState>) -> Response {
    let args = StepArgs::new().with(String::from("/download/report"));
    let slot: Arc<Mutex<Option<FileDownload>>> = Arc::new(Mutex::new(None));

    let produced = Arc::clone(&slot);
    let path = state.report_path.clone();
    let buffer_size = state.settings.buffer_size;
    let result = global_pipeline().execute(args, move || {
        let download = FileDownload::open(&path, "text/csv")
            .map_err(anyhow::Error::new)?
            .with_buffer_size(buffer_size);
        *produced.lock() = Some(download);
        Ok(())
    });

    match result {
        Err(e) => pipeline_error_response(&e),
        Ok(()) => match slot.lock().take() {
            Some(download) => download.into_response(),
            // around 步骤未续接链路，目标动作被跳过
            None => StatusCode::FORBIDDEN.into_response(),
        },
    }
}

/// GET /download/hello
///
/// 内存字节下载：单独驱动 before 步骤，展示扁平遍历与三态结果
async fn download_hello() -> Response {
    let args = StepArgs::new().with(String::from("/download/hello"));
    match global_pipeline().run_step(StepKind::Before, &args) {
        Ok(outcomes) => {
            let ran = outcomes.iter().filter(|o| o.ran()).count();
            tracing::debug!("{}/{} before step(s) ran", ran, outcomes.len());
        }
        Err(e) => return pipeline_error_response(&e),
    }

    BytesDownload::new(&b"hello from wyvern\n"[..], "text/plain", "hello.txt")
        .inline()
        .into_response()
}

// ==================== 主程序 ====================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::from_env().init()?;

    println!("🐉 Wyvern Download Demo");
    println!("=======================\n");

    let config_file = if Path::new("demos/download-demo/wyvern.toml").exists() {
        "demos/download-demo/wyvern.toml"
    } else {
        "wyvern.toml"
    };
    let settings = DownloadSettings::load(Path::new(config_file))?;
    println!("⚙️  Copy buffer size: {} bytes", settings.buffer_size);

    // 首次访问即构建并校验流水线，配置错误在这里就会中止启动
    let pipeline = global_pipeline();
    println!("🔗 Interceptor pipeline: {} interceptor(s)\n", pipeline.len());

    let report_path = std::env::temp_dir().join("wyvern-demo-report.csv");
    std::fs::write(&report_path, b"id,name\n1,Alice\n2,Bob\n")
        .context("failed to prepare demo report file")?;

    let state = AppState {
        settings,
        report_path,
    };

    let app = Router::new()
        .route("/download/report", get(download_report))
        .route("/download/hello", get(download_hello))
        .with_state(state);

    println!("📋 可用的端点：\n");
    println!("  GET /download/report - CSV 文件下载（流式，完整拦截器链）");
    println!("  GET /download/hello  - 内存字节下载（内联展示）\n");

    let addr = "0.0.0.0:8080";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    println!("🚀 Listening on http://{addr}\n");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
