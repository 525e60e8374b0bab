/// GraphQL 请求构建器
///
/// 把结构化参数拼成 generateContentV2 mutation，调用方不接触协议文本
use crate::models::ConversationContext;

const PLATFORM_ID: &str = "d7ff5012-d689-4a84-8aa6-012b63fa0783";
const SUBJECT: &str = "Math";
const CONTENT_TYPE_ID: &str = "DMs from the Dead v2 - Text Message";
const INITIAL_GENERATOR_ID: &str = "Tutor Conversation - Text Message - Initial";
const CONTINUING_GENERATOR_ID: &str = "Tutor Conversation - Text Message - Continuing";

/// 对话轮次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// 第一轮
    Initial,
    /// 后续轮
    Continuing,
}

impl TurnKind {
    pub fn generator_id(self) -> &'static str {
        match self {
            TurnKind::Initial => INITIAL_GENERATOR_ID,
            TurnKind::Continuing => CONTINUING_GENERATOR_ID,
        }
    }
}

/// 一次对话请求的全部参数
#[derive(Debug, Clone)]
pub struct ConversationRequest<'a> {
    pub turn: TurnKind,
    pub generated_content_id: &'a str,
    pub context: &'a ConversationContext,
    /// 为空表示不附带历史交互
    pub interaction_history: &'a str,
    /// 仅后续轮使用
    pub user_message: Option<&'a str>,
}

impl<'a> ConversationRequest<'a> {
    pub fn initial(
        generated_content_id: &'a str,
        context: &'a ConversationContext,
        interaction_history: &'a str,
    ) -> Self {
        Self {
            turn: TurnKind::Initial,
            generated_content_id,
            context,
            interaction_history,
            user_message: None,
        }
    }

    pub fn continuing(
        generated_content_id: &'a str,
        context: &'a ConversationContext,
        interaction_history: &'a str,
        user_message: &'a str,
    ) -> Self {
        Self {
            turn: TurnKind::Continuing,
            generated_content_id,
            context,
            interaction_history,
            user_message: Some(user_message),
        }
    }

    /// 生成 GraphQL 查询文本
    pub fn build_query(&self) -> String {
        let mut attributes = Vec::new();
        if let Some(message) = self.user_message {
            attributes.push(attribute("userMessage", message));
        }
        attributes.push(attribute("generatedContentId", self.generated_content_id));
        if !self.interaction_history.is_empty() {
            attributes.push(attribute("userInteractionHistory", self.interaction_history));
        }

        format!(
            r#"mutation ChatWithFigure {{
  generateContentV2(
    input: {{
      attributes: [
        {attributes}
      ]
      extendedAttributes: [{{ platformId: {platform_id} }}]
      subject: {subject}
      grade: {grade}
      course: {course}
      domainId: {domain_id}
      standardId: {standard_id}
      isSyncGeneration: true
      contentTypeId: {content_type_id}
      contentGeneratorId: {generator_id}
    }}
  ) {{
    content
  }}
}}"#,
            attributes = attributes.join(",\n        "),
            platform_id = literal(PLATFORM_ID),
            subject = literal(SUBJECT),
            grade = literal(&self.context.grade),
            course = literal(&self.context.course),
            domain_id = literal(&self.context.domain_id),
            standard_id = literal(&self.context.standard_id),
            content_type_id = literal(CONTENT_TYPE_ID),
            generator_id = literal(self.turn.generator_id()),
        )
    }
}

fn attribute(name: &str, value: &str) -> String {
    format!(
        "{{ attributeName: {}, attributeValue: {} }}",
        literal(name),
        literal(value)
    )
}

/// 转义为 GraphQL 字符串字面量（JSON 字符串语法是其子集）
fn literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
