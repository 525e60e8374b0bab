#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use tutor_conversation_runner::models::ConversationContext;
use tutor_conversation_runner::{AppError, AppResult, ConversationClient, WorkItem};

/// 测试用对话客户端：固定回复 ACK1 / ACK2，可按条目 id 注入失败和延迟
#[derive(Default)]
pub struct StubClient {
    failing: Mutex<HashSet<String>>,
    delays_ms: Mutex<HashMap<String, u64>>,
    initial_calls: Mutex<Vec<String>>,
    follow_up_calls: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, item_id: &str) {
        self.failing.lock().unwrap().insert(item_id.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn delay(&self, item_id: &str, ms: u64) {
        self.delays_ms.lock().unwrap().insert(item_id.to_string(), ms);
    }

    /// 第一轮调用过的条目 id（按调用顺序）
    pub fn initial_calls(&self) -> Vec<String> {
        self.initial_calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.initial_calls.lock().unwrap().len() + self.follow_up_calls.lock().unwrap().len()
    }

    /// 第二轮完成的条目 id（按完成顺序）
    pub fn completion_order(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.initial_calls.lock().unwrap().clear();
        self.follow_up_calls.lock().unwrap().clear();
        self.completed.lock().unwrap().clear();
    }

    fn delay_for(&self, item_id: &str) -> Option<u64> {
        self.delays_ms.lock().unwrap().get(item_id).copied()
    }
}

#[async_trait]
impl ConversationClient for StubClient {
    async fn initial_turn(
        &self,
        item: &WorkItem,
        _context: &ConversationContext,
        _interaction_history: &str,
    ) -> AppResult<String> {
        self.initial_calls.lock().unwrap().push(item.id.clone());
        if let Some(ms) = self.delay_for(&item.id) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if self.failing.lock().unwrap().contains(&item.id) {
            return Err(AppError::request_failed("stub", format!("forced failure for {}", item.id)));
        }
        Ok("ACK1".to_string())
    }

    async fn follow_up_turn(
        &self,
        item: &WorkItem,
        _context: &ConversationContext,
        _interaction_history: &str,
        _user_message: &str,
    ) -> AppResult<String> {
        self.follow_up_calls.lock().unwrap().push(item.id.clone());
        self.completed.lock().unwrap().push(item.id.clone());
        Ok("ACK2".to_string())
    }
}

/// 带一个正确选项和一个错误选项的条目
pub fn work_item(id: &str, standard: &str) -> WorkItem {
    WorkItem {
        id: id.to_string(),
        standard: standard.to_string(),
        content: r#"{"question":"6 x 7?","answer_options":[
            {"id":"A","answer":"41","correct":true,"explanation":""},
            {"id":"B","answer":"42","correct":false,"explanation":"close"}
        ]}"#
        .to_string(),
        context: None,
    }
}

pub fn work_items(ids: &[&str]) -> Vec<WorkItem> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| work_item(id, &format!("{}.NS.{}", i + 3, i + 1)))
        .collect()
}

pub async fn write_input(path: &Path, items: &[WorkItem]) {
    let json = serde_json::to_string_pretty(items).unwrap();
    tokio::fs::write(path, json).await.unwrap();
}
