use serde::Deserialize;
use serde_json::Value;

/// generateContentV2 的 GraphQL 响应信封
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub data: Option<GenerateContentResponseData>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}

impl GenerateContentResponse {
    /// 响应信封中是否带有应用层错误
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponseData {
    #[serde(default)]
    pub generate_content_v2: Option<GenerateContentV2>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentV2 {
    /// 内容本身是一个 JSON 文档
    pub content: String,
}

/// content 字段解析后的结构
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContent {
    #[serde(default)]
    pub user_message: Option<MessagePart>,
    pub figure_response: MessagePart,
}

#[derive(Debug, Deserialize)]
pub struct MessagePart {
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}
