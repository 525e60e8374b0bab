//! 条目处理上下文
//!
//! 封装"我正在处理第几个条目"这一信息，仅用于日志

use std::fmt::Display;

/// 条目处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 条目在输入列表中的原始索引（从0开始）
    pub index: usize,

    /// 条目 ID
    pub item_id: String,

    /// 条目总数
    pub total: usize,
}

impl ItemCtx {
    pub fn new(index: usize, item_id: impl Into<String>, total: usize) -> Self {
        Self {
            index,
            item_id: item_id.into(),
            total,
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[条目 #{}/{} id={}]",
            self.index + 1,
            self.total,
            self.item_id
        )
    }
}
