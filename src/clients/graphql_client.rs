/// GraphQL API 客户端
///
/// 封装与内容生成服务的 HTTP 交互
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ConversationContent, GenerateContentResponse};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

/// GraphQL 客户端
#[derive(Clone)]
pub struct GraphqlClient {
    http: Client,
    url: String,
    token: String,
}

impl GraphqlClient {
    /// 创建新的 GraphQL 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::request_failed(&config.graphql_url, e))?;

        Ok(Self {
            http,
            url: config.graphql_url.clone(),
            token: config.graphql_id_token.clone(),
        })
    }

    /// 执行 generateContentV2 并返回人物回复的文本
    ///
    /// 网络错误、非 2xx 状态、响应中的 errors 以及无法解析的内容都视为请求失败。
    pub async fn generate_content(&self, query: &str) -> AppResult<String> {
        debug!("发送 GraphQL 请求，查询长度: {} 字符", query.len());

        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.token)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| self.fail(format!("网络请求失败: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.fail(format!("读取响应失败 (status {}): {}", status, e)))?;

        if !status.is_success() {
            return Err(self.fail(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| self.fail(format!("响应不是合法的 JSON ({}): {}", e, body)))?;

        if envelope.has_errors() {
            let errors = serde_json::to_string(&envelope.errors).unwrap_or_default();
            return Err(self.fail(format!("服务返回错误: {}", errors)));
        }

        let content = envelope
            .data
            .and_then(|data| data.generate_content_v2)
            .map(|generated| generated.content)
            .ok_or_else(|| self.fail(format!("响应缺少 generateContentV2: {}", body)))?;

        let conversation: ConversationContent = serde_json::from_str(&content)
            .map_err(|e| self.fail(format!("无法解析生成内容 ({}): {}", e, content)))?;

        debug!("GraphQL 请求成功");

        Ok(conversation.figure_response.content)
    }

    /// 记录失败诊断信息并构造错误
    fn fail(&self, details: String) -> AppError {
        error!("❌ GraphQL 请求失败 ({}): {}", self.url, details);
        AppError::request_failed(&self.url, details)
    }
}
