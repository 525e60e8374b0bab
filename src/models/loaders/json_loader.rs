use crate::error::{AppError, AppResult};
use crate::models::work_item::WorkItem;
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件加载全部条目，保持文件中的顺序
pub async fn load_work_items(path: impl AsRef<Path>) -> AppResult<Vec<WorkItem>> {
    let path = path.as_ref();
    let path_display = path.display().to_string();

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::source_unavailable(&path_display, format!("无法读取文件: {}", e)))?;

    let items: Vec<WorkItem> = serde_json::from_str(&content)
        .map_err(|e| AppError::source_unavailable(&path_display, format!("无法解析JSON: {}", e)))?;

    tracing::info!("成功加载 {} 个条目: {}", items.len(), path_display);

    Ok(items)
}
