/// 日志工具模块
///
/// 提供日志初始化和批处理日志输出的辅助函数
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// 初始化 tracing 日志，默认级别 info，可通过 RUST_LOG 覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(chunk_size: usize, reverse_order: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 分批对话模拟模式");
    info!("📊 每批条目数: {}", chunk_size);
    if reverse_order {
        info!("🔃 倒序派发（落盘顺序不变）");
    }
    info!("{}", "=".repeat(60));
}

/// 记录条目加载信息
pub fn log_items_loaded(total: usize, chunk_size: usize) {
    info!("✓ 找到 {} 个待处理的条目", total);
    info!("📋 将以每批 {} 个的方式处理", chunk_size);
    info!("💡 每批完成并落盘后再开始下一批\n");
}

/// 记录批次开始信息
pub fn log_chunk_start(chunk_num: usize, total_chunks: usize, chunk_len: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", chunk_num, total_chunks);
    info!("📄 本批条目: {} 个 / 共 {} 个", chunk_len, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_chunk_complete(chunk_num: usize, processed: usize, resumed: usize) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 批完成: 新处理 {}，沿用 {}",
        chunk_num, processed, resumed
    );
    info!("{}", "─".repeat(60));
}

/// 记录批次失败信息
pub fn log_chunk_failed(chunk_num: usize, err: &AppError) {
    error!("❌ 第 {} 批失败，本批结果不落盘: {}", chunk_num, err);
}

/// 每批落盘后的进度
pub fn log_progress(done: usize, total: usize) {
    info!("Processed {} / {}", done, total);
}

/// 打印最终统计信息
pub fn print_final_stats(processed: usize, resumed: usize, total: usize, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 新处理: {}/{}", processed, total);
    info!("⏭️ 沿用检查点: {}", resumed);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
