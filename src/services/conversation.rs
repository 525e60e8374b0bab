//! 对话服务 - 业务能力层
//!
//! 只负责"和内容生成服务对话一轮"的能力，不关心流程、不做重试

use async_trait::async_trait;
use tracing::debug;

use crate::clients::{ConversationRequest, GraphqlClient};
use crate::error::AppResult;
use crate::models::{ConversationContext, WorkItem};

/// 对话客户端
///
/// 两轮调用都返回生成服务回复的文本，失败时返回 `RequestFailed`。
#[async_trait]
pub trait ConversationClient: Send + Sync {
    /// 第一轮对话
    async fn initial_turn(
        &self,
        item: &WorkItem,
        context: &ConversationContext,
        interaction_history: &str,
    ) -> AppResult<String>;

    /// 第二轮对话，附带用户消息
    async fn follow_up_turn(
        &self,
        item: &WorkItem,
        context: &ConversationContext,
        interaction_history: &str,
        user_message: &str,
    ) -> AppResult<String>;
}

/// 基于 GraphQL 的对话服务
pub struct GraphqlConversation {
    client: GraphqlClient,
}

impl GraphqlConversation {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConversationClient for GraphqlConversation {
    async fn initial_turn(
        &self,
        item: &WorkItem,
        context: &ConversationContext,
        interaction_history: &str,
    ) -> AppResult<String> {
        debug!("条目 {} 发起第一轮对话", item.id);
        let query = ConversationRequest::initial(&item.id, context, interaction_history).build_query();
        self.client.generate_content(&query).await
    }

    async fn follow_up_turn(
        &self,
        item: &WorkItem,
        context: &ConversationContext,
        interaction_history: &str,
        user_message: &str,
    ) -> AppResult<String> {
        debug!("条目 {} 发起第二轮对话", item.id);
        let query =
            ConversationRequest::continuing(&item.id, context, interaction_history, user_message)
                .build_query();
        self.client.generate_content(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reply(text: &str) -> ResponseTemplate {
        let content = json!({ "figureResponse": { "content": text } }).to_string();
        ResponseTemplate::new(200)
            .set_body_json(json!({ "data": { "generateContentV2": { "content": content } } }))
    }

    #[tokio::test]
    async fn test_turns_use_their_generators() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Text Message - Initial"))
            .respond_with(reply("first"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("Text Message - Continuing"))
            .and(body_string_contains("Can you help?"))
            .respond_with(reply("second"))
            .mount(&server)
            .await;

        let client = GraphqlClient::new(&Config::new(server.uri(), "t")).unwrap();
        let conversation = GraphqlConversation::new(client);
        let item = WorkItem {
            id: "gc-1".to_string(),
            standard: "7.NS.3".to_string(),
            content: "{}".to_string(),
            context: None,
        };
        let ctx = item.conversation_context().unwrap();

        let first = conversation.initial_turn(&item, &ctx, "").await.unwrap();
        let second = conversation
            .follow_up_turn(&item, &ctx, "", "Can you help?")
            .await
            .unwrap();

        assert_eq!(first, "first");
        assert_eq!(second, "second");
    }
}
