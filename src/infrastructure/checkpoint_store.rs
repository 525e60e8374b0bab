//! 检查点存储 - 基础设施层
//!
//! 持有唯一可变的共享状态：结果表。表在内存中按行号随机访问，
//! 每次 flush 时整表重写到磁盘。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::result_row::{ResultRow, HEADER, ID_COLUMN, SECOND_RESPONSE_COLUMN};

/// 数据行相对条目索引的偏移（第 0 行是表头）
pub const HEADER_OFFSET: usize = 1;

const SHEET_NAME: &str = "Responses";

/// 磁盘上的表格式
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
}

/// 表中的一行，和条目按索引一一对应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointRow {
    cells: Vec<String>,
}

impl CheckpointRow {
    pub fn item_id(&self) -> &str {
        self.cell(ID_COLUMN)
    }

    pub fn second_response(&self) -> &str {
        self.cell(SECOND_RESPONSE_COLUMN)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn to_result_row(&self) -> ResultRow {
        ResultRow::from_cells(&self.cells)
    }

    fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

/// 检查点存储
///
/// 职责：
/// - 打开已有的结果表（续跑）或创建只含表头的新表
/// - 按条目索引读写行，不改变已有行的顺序
/// - 整表原子落盘
///
/// 只有编排层在一个批次全部完成后才会写入，因此不需要加锁。
pub struct CheckpointStore {
    path: PathBuf,
    rows: Vec<Vec<String>>,
}

impl CheckpointStore {
    /// 打开结果表
    ///
    /// 文件不存在或无法解析时创建新表，不会返回错误。
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let rows = match fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<Sheet>(&content) {
                Ok(sheet) if !sheet.rows.is_empty() => {
                    info!(
                        "📂 已加载检查点 {}，共 {} 行数据",
                        path.display(),
                        sheet.rows.len() - HEADER_OFFSET
                    );
                    sheet.rows
                }
                Ok(_) => {
                    warn!("⚠️ 检查点 {} 为空表，重新创建", path.display());
                    fresh_rows()
                }
                Err(e) => {
                    warn!("⚠️ 检查点 {} 无法解析，重新创建: {}", path.display(), e);
                    fresh_rows()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("📄 未找到检查点 {}，创建新表", path.display());
                fresh_rows()
            }
            Err(e) => {
                warn!("⚠️ 检查点 {} 无法读取，重新创建: {}", path.display(), e);
                fresh_rows()
            }
        };

        Self { path, rows }
    }

    /// 表头行
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// 已写入的数据行数（含空行）
    pub fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(HEADER_OFFSET)
    }

    /// 按条目索引取行，未写入过的位置返回 None
    pub fn row_at(&self, index: usize) -> Option<CheckpointRow> {
        self.rows
            .get(index + HEADER_OFFSET)
            .filter(|cells| !cells.is_empty())
            .map(|cells| CheckpointRow {
                cells: cells.clone(),
            })
    }

    /// 续跑判定：行中的 id 与条目一致且第二轮回复非空
    pub fn is_complete(&self, index: usize, expected_id: &str) -> bool {
        self.row_at(index)
            .is_some_and(|row| row.item_id() == expected_id && !row.second_response().is_empty())
    }

    /// 写入（覆盖）指定条目的行，中间缺失的行以空行补齐
    pub fn write(&mut self, index: usize, row: &ResultRow) {
        let position = index + HEADER_OFFSET;
        if self.rows.len() <= position {
            self.rows.resize_with(position + 1, Vec::new);
        }
        self.rows[position] = row.to_cells();
    }

    /// 整表落盘
    ///
    /// 先写入同目录下的临时文件并 fsync，再重命名，中途崩溃或断电不会破坏上一次落盘的内容。
    pub async fn flush(&self) -> AppResult<()> {
        let path_display = self.path.display().to_string();

        let sheet = Sheet {
            name: SHEET_NAME.to_string(),
            rows: self.rows.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&sheet).map_err(|e| {
            AppError::checkpoint_write(&path_display, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::checkpoint_write(&path_display, e))?;
        }

        atomic_write(&self.path, &bytes).await?;

        debug!("检查点已落盘: {} ({} 字节)", path_display, bytes.len());
        Ok(())
    }
}

/// 写临时文件 → sync_all → rename → 尽力 fsync 父目录
async fn atomic_write(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let tmp_path = tmp_path_for(path);
    let tmp_display = tmp_path.display().to_string();

    let mut file = fs::File::create(&tmp_path)
        .await
        .map_err(|e| AppError::checkpoint_write(&tmp_display, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| AppError::checkpoint_write(&tmp_display, e))?;
    file.sync_all()
        .await
        .map_err(|e| AppError::checkpoint_write(&tmp_display, e))?;
    drop(file);

    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| AppError::checkpoint_write(path.display().to_string(), e))?;

    // rename 的持久化依赖父目录 fsync，失败不影响本次结果
    #[cfg(unix)]
    {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if let Ok(dir) = fs::File::open(parent).await {
            let _ = dir.sync_all().await;
        }
    }

    Ok(())
}

fn fresh_rows() -> Vec<Vec<String>> {
    vec![HEADER.iter().map(|h| h.to_string()).collect()]
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, second: &str) -> ResultRow {
        ResultRow {
            grade: "7".to_string(),
            standard: "7.NS.3".to_string(),
            item_id: id.to_string(),
            content: "{}".to_string(),
            selected_option: "-".to_string(),
            initial_response: "hi".to_string(),
            user_message: "help".to_string(),
            second_response: second.to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_missing_creates_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::open(dir.path().join("output.json")).await;

        assert_eq!(store.header(), HEADER.map(String::from).as_slice());
        assert_eq!(store.data_len(), 0);
        assert!(store.row_at(0).is_none());
    }

    #[tokio::test]
    async fn test_open_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        tokio::fs::write(&path, "garbage").await.unwrap();

        let store = CheckpointStore::open(&path).await;
        assert_eq!(store.data_len(), 0);
    }

    #[tokio::test]
    async fn test_write_pads_and_keeps_positions() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CheckpointStore::open(dir.path().join("output.json")).await;

        store.write(2, &row("c", "done"));
        assert_eq!(store.data_len(), 3);
        assert!(store.row_at(0).is_none());
        assert!(store.row_at(1).is_none());
        assert_eq!(store.row_at(2).unwrap().item_id(), "c");

        store.write(0, &row("a", "done"));
        assert_eq!(store.row_at(0).unwrap().item_id(), "a");
        assert_eq!(store.row_at(2).unwrap().item_id(), "c");
    }

    #[tokio::test]
    async fn test_is_complete_predicate() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CheckpointStore::open(dir.path().join("output.json")).await;

        store.write(0, &row("a", "done"));
        store.write(1, &row("b", ""));

        assert!(store.is_complete(0, "a"));
        // id 不一致
        assert!(!store.is_complete(0, "z"));
        // 第二轮回复为空
        assert!(!store.is_complete(1, "b"));
        // 从未写入
        assert!(!store.is_complete(5, "a"));
    }

    #[tokio::test]
    async fn test_atomic_write_replaces_longer_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        tokio::fs::write(&path, "x".repeat(4096)).await.unwrap();

        tokio_test::assert_ok!(atomic_write(&path, b"{}").await);

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"{}");
        assert!(!tmp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn test_flush_overwrites_previous_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");

        let mut store = CheckpointStore::open(&path).await;
        store.write(0, &row("a", &"long answer ".repeat(200)));
        store.flush().await.unwrap();

        store.write(0, &row("a", "short"));
        store.flush().await.unwrap();

        let reopened = CheckpointStore::open(&path).await;
        assert_eq!(reopened.row_at(0).unwrap().second_response(), "short");
        assert!(!tmp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn test_flush_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("output.json");

        let mut store = CheckpointStore::open(&path).await;
        store.write(0, &row("a", "done"));
        store.write(1, &row("b", "done"));
        tokio_test::assert_ok!(store.flush().await);
        // 重复 flush 是安全的
        tokio_test::assert_ok!(store.flush().await);

        assert!(!tmp_path_for(&path).exists());

        let reopened = CheckpointStore::open(&path).await;
        assert_eq!(reopened.data_len(), 2);
        assert_eq!(reopened.row_at(1).unwrap().to_result_row(), row("b", "done"));
        assert!(reopened.is_complete(0, "a"));
    }
}
