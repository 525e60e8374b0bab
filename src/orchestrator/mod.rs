//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责分批调度和检查点落盘，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<WorkItem>，分批、排序、合并、落盘)
//!     ↓
//! workflow::ItemFlow (处理单个 WorkItem)
//!     ↓
//! services (能力层：conversation / scenario)
//!     ↓
//! clients (GraphQL 请求)
//! ```
//!
//! ## 设计原则
//!
//! 1. **唯一写者**：只有编排层在整批完成后写检查点
//! 2. **批间串行**：上一批落盘后才派发下一批
//! 3. **无业务逻辑**：只做调度和统计，不做具体对话

pub mod batch_processor;

pub use batch_processor::{App, BatchOrchestrator, RunSummary};
