//! 结果行
//!
//! 每个条目对应结果表中的一行，列顺序由 [`HEADER`] 固定。

/// 结果表表头
pub const HEADER: [&str; 8] = [
    "grade",
    "standard",
    "generatedContentId",
    "generatedContent",
    "selectedOption",
    "initialResponse",
    "userMessage",
    "secondResponse",
];

/// 未模拟历史交互时 selectedOption 列的占位符
pub const NO_SELECTED_OPTION: &str = "-";

/// 条目 id 所在列
pub const ID_COLUMN: usize = 2;
/// 第二轮回复所在列（断点续跑判定依据）
pub const SECOND_RESPONSE_COLUMN: usize = 7;

/// 单个条目的处理结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    pub grade: String,
    pub standard: String,
    pub item_id: String,
    pub content: String,
    pub selected_option: String,
    pub initial_response: String,
    pub user_message: String,
    pub second_response: String,
}

impl ResultRow {
    /// 按表头顺序展开为单元格
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.grade.clone(),
            self.standard.clone(),
            self.item_id.clone(),
            self.content.clone(),
            self.selected_option.clone(),
            self.initial_response.clone(),
            self.user_message.clone(),
            self.second_response.clone(),
        ]
    }

    /// 从单元格还原，缺失的列按空字符串处理
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            grade: cell(0),
            standard: cell(1),
            item_id: cell(ID_COLUMN),
            content: cell(3),
            selected_option: cell(4),
            initial_response: cell(5),
            user_message: cell(6),
            second_response: cell(SECOND_RESPONSE_COLUMN),
        }
    }
}
