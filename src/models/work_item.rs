use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};

/// 无法从 standard 中提取年级时使用的值
pub const UNKNOWN_GRADE: &str = "Unknown";

static GRADE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("年级正则表达式无效"));

/// 预生成的题目条目，整个运行期间只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub standard: String,
    /// 序列化的题目与选项（JSON 字符串）
    pub content: String,
    /// 序列化的年级 / 课程 / 领域 / 标准标识（JSON 字符串）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl WorkItem {
    /// 解析题目内容
    pub fn parse_content(&self) -> AppResult<ItemContent> {
        serde_json::from_str(&self.content).map_err(|source| AppError::InvalidContent {
            item_id: self.id.clone(),
            source,
        })
    }

    /// 从 standard 中提取年级
    pub fn grade(&self) -> String {
        extract_grade(&self.standard)
    }

    /// 构造对话服务所需的上下文
    ///
    /// 缺失的字段回退到提取出的年级和条目自身的 standard。
    pub fn conversation_context(&self) -> AppResult<ConversationContext> {
        let mut ctx = match self.context.as_deref() {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str::<ConversationContext>(raw)
                .map_err(|source| AppError::InvalidContent {
                    item_id: self.id.clone(),
                    source,
                })?,
            _ => ConversationContext::default(),
        };

        if ctx.grade.is_empty() {
            ctx.grade = self.grade();
        }
        if ctx.standard_id.is_empty() {
            ctx.standard_id = self.standard.clone();
        }
        Ok(ctx)
    }
}

/// 题目内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemContent {
    pub question: String,
    #[serde(default)]
    pub answer_options: Vec<AnswerOption>,
}

impl ItemContent {
    /// 按列表顺序找到第一个错误选项
    pub fn first_incorrect_option(&self) -> Option<&AnswerOption> {
        self.answer_options.iter().find(|option| !option.correct)
    }
}

/// 答案选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub answer: String,
    pub correct: bool,
    #[serde(default)]
    pub explanation: String,
}

impl AnswerOption {
    /// 结果表中使用的选项描述，如 `B) 42`
    pub fn descriptor(&self) -> String {
        format!("{}) {}", self.id, self.answer)
    }
}

/// 对话服务需要的标识
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    #[serde(default, deserialize_with = "deserialize_nullable_id")]
    pub grade: String,
    #[serde(default, deserialize_with = "deserialize_nullable_id")]
    pub course: String,
    #[serde(default, deserialize_with = "deserialize_nullable_id")]
    pub domain_id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_id")]
    pub standard_id: String,
}

/// 提取 standard 中第一段连续数字作为年级
pub fn extract_grade(standard: &str) -> String {
    GRADE_PATTERN
        .find(standard)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_GRADE.to_string())
}

// 数据库导出的 id 可能是字符串也可能是整数
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or an integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

// context 中的字段还可能是 null，按缺失处理
fn deserialize_nullable_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct NullableIdVisitor;

    impl<'de> Visitor<'de> for NullableIdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("null, a string or an integer")
        }

        fn visit_none<E>(self) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }

        fn visit_unit<E>(self) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }

        fn visit_some<D>(self, deserializer: D) -> Result<String, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserialize_id(deserializer)
        }
    }

    deserializer.deserialize_option(NullableIdVisitor)
}
