//! 场景选择服务 - 业务能力层
//!
//! 只负责"随机决定对话场景"：是否模拟一次答错的历史交互、第二轮发送哪句话。
//! 随机源通过构造函数注入，测试时可以固定结果。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{AnswerOption, ItemContent};

/// 第二轮对话的固定话术
pub const USER_MESSAGES: [&str; 12] = [
    "Can you assist me in solving this?",
    "Could you guide me through this math problem to find the correct answer?",
    "I need help understanding this math question, can you explain it?",
    "What steps should I follow to solve this math problem?",
    "Can you break down this math problem for me?",
    "I'm stuck on this math question, can you help?",
    "Could you provide a detailed explanation for this math problem?",
    "What is the best approach to solve this math question?",
    "Can you walk me through the solution to this math problem?",
    "How do I find the correct answer to this math question?",
    "What is correct answer to this question?",
    "Suggest please correct answer to this question",
];

/// 随机源
pub trait ScenarioSource: Send + Sync {
    /// 是否附带一次答错的历史交互
    fn include_history(&self) -> bool;

    /// 在 `[0, len)` 中均匀选择一个下标
    fn pick_index(&self, len: usize) -> usize;
}

/// 基于 `StdRng` 的随机源，可指定种子复现
pub struct RandomScenario {
    rng: Mutex<StdRng>,
}

impl RandomScenario {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// 有种子用种子，否则用系统熵
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl ScenarioSource for RandomScenario {
    fn include_history(&self) -> bool {
        self.with_rng(|rng| rng.gen_bool(0.5))
    }

    fn pick_index(&self, len: usize) -> usize {
        self.with_rng(|rng| rng.gen_range(0..len))
    }
}

/// 固定结果的随机源
#[derive(Debug, Clone, Copy)]
pub struct FixedScenario {
    pub include_history: bool,
    pub message_index: usize,
}

impl ScenarioSource for FixedScenario {
    fn include_history(&self) -> bool {
        self.include_history
    }

    fn pick_index(&self, len: usize) -> usize {
        self.message_index % len
    }
}

/// 一次对话的场景
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    /// 模拟答错时选中的选项
    pub selected_option: Option<AnswerOption>,
    /// 历史交互片段，空字符串表示无
    pub interaction_history: String,
}

/// 按随机源决定是否附带答错历史
///
/// 附带时选择列表中第一个错误选项；没有错误选项属于前置条件不满足。
pub fn choose_scenario(
    source: &dyn ScenarioSource,
    item_id: &str,
    content: &ItemContent,
) -> AppResult<Scenario> {
    if !source.include_history() {
        return Ok(Scenario::default());
    }

    let option = content.first_incorrect_option().ok_or_else(|| {
        AppError::precondition_violation(item_id, "需要模拟答错，但没有错误选项")
    })?;

    Ok(Scenario {
        interaction_history: interaction_history(option),
        selected_option: Some(option.clone()),
    })
}

/// 从话术目录中均匀选择一句
pub fn choose_user_message(source: &dyn ScenarioSource) -> &'static str {
    USER_MESSAGES[source.pick_index(USER_MESSAGES.len())]
}

fn interaction_history(option: &AnswerOption) -> String {
    format!("Student selected answer {}", option.descriptor())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> ItemContent {
        serde_json::from_str(
            r#"{"question":"6 x 7?","answer_options":[
                {"id":"A","answer":"41","correct":true},
                {"id":"B","answer":"42","correct":false}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fixed_source_includes_history() {
        let source = FixedScenario {
            include_history: true,
            message_index: 0,
        };
        let scenario = choose_scenario(&source, "q1", &content()).unwrap();

        assert_eq!(scenario.selected_option.unwrap().descriptor(), "B) 42");
        assert!(scenario.interaction_history.contains("B) 42"));
        assert_eq!(choose_user_message(&source), USER_MESSAGES[0]);
    }

    #[test]
    fn test_without_history() {
        let source = FixedScenario {
            include_history: false,
            message_index: 11,
        };
        let scenario = choose_scenario(&source, "q1", &content()).unwrap();

        assert_eq!(scenario, Scenario::default());
        assert_eq!(choose_user_message(&source), USER_MESSAGES[11]);
    }

    #[test]
    fn test_no_incorrect_option_is_precondition_violation() {
        let source = FixedScenario {
            include_history: true,
            message_index: 0,
        };
        let all_correct: ItemContent = serde_json::from_str(
            r#"{"question":"q","answer_options":[{"id":"A","answer":"1","correct":true}]}"#,
        )
        .unwrap();

        let err = choose_scenario(&source, "q9", &all_correct).unwrap_err();
        assert!(matches!(err, AppError::PreconditionViolation { ref item_id, .. } if item_id == "q9"));
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let a = RandomScenario::seeded(7);
        let b = RandomScenario::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.include_history(), b.include_history());
            assert_eq!(a.pick_index(USER_MESSAGES.len()), b.pick_index(USER_MESSAGES.len()));
        }
    }

    #[test]
    fn test_random_index_in_range() {
        let source = RandomScenario::from_entropy();
        for _ in 0..100 {
            assert!(source.pick_index(USER_MESSAGES.len()) < USER_MESSAGES.len());
        }
    }
}
