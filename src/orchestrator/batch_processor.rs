//! 批量条目处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量条目的调度和检查点落盘。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建 GraphQL 客户端、随机源和条目流程
//! 2. **批量加载**：读取全部条目（`Vec<WorkItem>`），打开检查点
//! 3. **分批处理**：按固定大小分批，批内并发，批间严格串行
//! 4. **顺序还原**：批内结果按原始索引排序后再合并
//! 5. **逐批落盘**：每批合并后整表写盘，并输出进度
//!
//! ## 失败语义
//!
//! 批内任一条目失败，整批不合并、不落盘，运行立即结束；
//! 之前已落盘的批次保持不变，下次运行从检查点续跑。

use futures::future::try_join_all;
use std::sync::Arc;
use tracing::warn;

use crate::clients::GraphqlClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::CheckpointStore;
use crate::models::{load_work_items, WorkItem};
use crate::services::{ConversationClient, GraphqlConversation, RandomScenario, ScenarioSource};
use crate::utils::logging;
use crate::workflow::{ItemCtx, ItemFlow, ItemOutcome};

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 条目总数
    pub total: usize,
    /// 本次新处理的条目数
    pub processed: usize,
    /// 沿用检查点的条目数
    pub resumed: usize,
    /// 每次落盘时该批的条目数
    pub flushed_chunks: Vec<usize>,
}

/// 批量编排器
///
/// 批内条目由同一个 future 并发轮询（`try_join_all`），不派生任务，
/// 因此条目流程只需要借用检查点做续跑判定。
pub struct BatchOrchestrator {
    flow: ItemFlow,
    chunk_size: usize,
    reverse_order: bool,
}

impl BatchOrchestrator {
    pub fn new(flow: ItemFlow, chunk_size: usize, reverse_order: bool) -> Self {
        Self {
            flow,
            chunk_size: chunk_size.max(1),
            reverse_order,
        }
    }

    /// 派发顺序：原始顺序，或倒序（最新的条目先处理）
    pub fn dispatch_order(&self, total: usize) -> Vec<usize> {
        if self.reverse_order {
            (0..total).rev().collect()
        } else {
            (0..total).collect()
        }
    }

    /// 处理全部条目
    pub async fn run(
        &self,
        items: &[WorkItem],
        store: &mut CheckpointStore,
    ) -> AppResult<RunSummary> {
        let total = items.len();
        let order = self.dispatch_order(total);
        let total_chunks = order.len().div_ceil(self.chunk_size);

        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        for (chunk_idx, chunk) in order.chunks(self.chunk_size).enumerate() {
            let chunk_num = chunk_idx + 1;
            logging::log_chunk_start(chunk_num, total_chunks, chunk.len(), total);

            let mut outcomes = match self.process_chunk(items, chunk, store).await {
                Ok(outcomes) => outcomes,
                Err(e) => {
                    logging::log_chunk_failed(chunk_num, &e);
                    return Err(e);
                }
            };

            // 还原原始顺序后再合并
            outcomes.sort_by_key(|outcome| outcome.index);

            let mut processed = 0;
            let mut resumed = 0;
            for outcome in &outcomes {
                store.write(outcome.index, &outcome.row);
                if outcome.resumed {
                    resumed += 1;
                } else {
                    processed += 1;
                }
            }

            store.flush().await?;

            summary.processed += processed;
            summary.resumed += resumed;
            summary.flushed_chunks.push(outcomes.len());

            logging::log_chunk_complete(chunk_num, processed, resumed);
            logging::log_progress(summary.processed + summary.resumed, total);
        }

        Ok(summary)
    }

    /// 并发处理一批条目，任一失败则整批失败
    async fn process_chunk(
        &self,
        items: &[WorkItem],
        chunk: &[usize],
        store: &CheckpointStore,
    ) -> AppResult<Vec<ItemOutcome>> {
        let total = items.len();
        let tasks = chunk.iter().map(move |&index| {
            let item = &items[index];
            let ctx = ItemCtx::new(index, item.id.as_str(), total);
            async move { self.flow.run(item, &ctx, store).await }
        });

        try_join_all(tasks).await
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: BatchOrchestrator,
}

impl App {
    /// 初始化应用，使用 GraphQL 对话服务和配置中的随机种子
    pub fn initialize(config: Config) -> AppResult<Self> {
        let client = GraphqlClient::new(&config)?;
        let conversation = Arc::new(GraphqlConversation::new(client));
        let scenario = Arc::new(RandomScenario::new(config.random_seed));
        Ok(Self::with_services(config, conversation, scenario))
    }

    /// 使用指定的对话服务和随机源初始化应用
    pub fn with_services(
        config: Config,
        client: Arc<dyn ConversationClient>,
        scenario: Arc<dyn ScenarioSource>,
    ) -> Self {
        logging::log_startup(config.chunk_size, config.reverse_order);

        let flow = ItemFlow::new(client, scenario, config.verbose_logging);
        let orchestrator = BatchOrchestrator::new(flow, config.chunk_size, config.reverse_order);

        Self {
            config,
            orchestrator,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        let items = load_work_items(&self.config.input_path).await?;

        if items.is_empty() {
            warn!("⚠️ 输入中没有条目，程序结束");
            return Ok(RunSummary::default());
        }

        logging::log_items_loaded(items.len(), self.config.chunk_size);

        let mut store = CheckpointStore::open(&self.config.output_path).await;
        let summary = self.orchestrator.run(&items, &mut store).await?;

        logging::print_final_stats(
            summary.processed,
            summary.resumed,
            summary.total,
            &self.config.output_path,
        );

        Ok(summary)
    }
}
