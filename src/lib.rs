//! # Tutor Conversation Runner
//!
//! 对预生成的数学题逐条模拟两轮辅导对话，并把结果写入可续跑的结果表
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有唯一可变状态（结果表），只暴露读写与落盘能力
//! - `CheckpointStore` - 打开或新建结果表，按条目索引读写，整表原子落盘
//!
//! ### ② 客户端与业务能力层（Clients / Services）
//! - `clients/` - GraphQL 请求构建与发送
//! - `services/` - `ConversationClient` 对话能力、`ScenarioSource` 随机场景
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个条目"的完整处理流程
//! - `ItemFlow` - 续跑判定 → 场景选择 → 两轮对话 → 结果行
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 分批并发、顺序还原、逐批落盘
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::CheckpointStore;
pub use models::{ResultRow, WorkItem};
pub use orchestrator::{App, BatchOrchestrator, RunSummary};
pub use services::{ConversationClient, FixedScenario, RandomScenario, ScenarioSource};
pub use workflow::{ItemCtx, ItemFlow, ItemOutcome};
