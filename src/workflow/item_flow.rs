//! 条目处理流程 - 流程层
//!
//! 核心职责：定义"一个条目"的完整处理流程
//!
//! 流程顺序：
//! 1. 续跑判定（已完成则原样返回，不发请求）
//! 2. 解析题目 → 选择场景
//! 3. 第一轮对话 → 选择话术 → 第二轮对话
//! 4. 组装结果行
//!
//! 流程不写检查点，结果交给编排层统一合并。

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::infrastructure::CheckpointStore;
use crate::models::{ResultRow, WorkItem, NO_SELECTED_OPTION};
use crate::services::scenario::{choose_scenario, choose_user_message};
use crate::services::{ConversationClient, ScenarioSource};
use crate::utils::logging::truncate_text;
use crate::workflow::item_ctx::ItemCtx;

/// 单个条目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    /// 原始索引
    pub index: usize,
    pub row: ResultRow,
    /// 是否沿用了检查点中的结果
    pub resumed: bool,
}

/// 条目处理流程
///
/// - 不持有检查点，只在续跑判定时借用
/// - 不重试，对话失败原样返回给编排层
pub struct ItemFlow {
    client: Arc<dyn ConversationClient>,
    scenario: Arc<dyn ScenarioSource>,
    verbose_logging: bool,
}

impl ItemFlow {
    pub fn new(
        client: Arc<dyn ConversationClient>,
        scenario: Arc<dyn ScenarioSource>,
        verbose_logging: bool,
    ) -> Self {
        Self {
            client,
            scenario,
            verbose_logging,
        }
    }

    pub async fn run(
        &self,
        item: &WorkItem,
        ctx: &ItemCtx,
        store: &CheckpointStore,
    ) -> AppResult<ItemOutcome> {
        // ========== 续跑判定 ==========
        if store.is_complete(ctx.index, &item.id) {
            if let Some(existing) = store.row_at(ctx.index) {
                info!("{} ⏭️ 已完成，跳过", ctx);
                return Ok(ItemOutcome {
                    index: ctx.index,
                    row: existing.to_result_row(),
                    resumed: true,
                });
            }
        }

        let content = item.parse_content()?;
        let context = item.conversation_context()?;

        // ========== 场景选择 ==========
        let scenario = choose_scenario(&*self.scenario, &item.id, &content)?;
        match &scenario.selected_option {
            Some(option) => info!("{} 🎭 模拟答错历史: {}", ctx, option.descriptor()),
            None => info!("{} 🎭 不附带历史交互", ctx),
        }

        // ========== 第一轮 ==========
        let initial_response = self
            .client
            .initial_turn(item, &context, &scenario.interaction_history)
            .await
            .inspect_err(|e| warn!("{} ⚠️ 第一轮对话失败: {}", ctx, e))?;
        self.log_response(ctx, "第一轮", &initial_response);

        // ========== 第二轮 ==========
        let user_message = choose_user_message(&*self.scenario);
        let second_response = self
            .client
            .follow_up_turn(item, &context, &scenario.interaction_history, user_message)
            .await
            .inspect_err(|e| warn!("{} ⚠️ 第二轮对话失败: {}", ctx, e))?;
        self.log_response(ctx, "第二轮", &second_response);

        let row = ResultRow {
            grade: item.grade(),
            standard: item.standard.clone(),
            item_id: item.id.clone(),
            content: serialize_item(item),
            selected_option: scenario
                .selected_option
                .map(|option| option.descriptor())
                .unwrap_or_else(|| NO_SELECTED_OPTION.to_string()),
            initial_response,
            user_message: user_message.to_string(),
            second_response,
        };

        info!("{} ✓ 对话完成", ctx);

        Ok(ItemOutcome {
            index: ctx.index,
            row,
            resumed: false,
        })
    }

    fn log_response(&self, ctx: &ItemCtx, turn: &str, response: &str) {
        if self.verbose_logging {
            info!("{} {}回复: {}", ctx, turn, truncate_text(response, 80));
        }
    }
}

/// generatedContent 列保存整个条目的格式化 JSON
fn serialize_item(item: &WorkItem) -> String {
    serde_json::to_string_pretty(item).unwrap_or_else(|_| item.content.clone())
}
