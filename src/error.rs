//! 应用程序错误类型
//!
//! 所有层共用一个 [`AppError`]，批处理的失败语义依赖这些分类：
//! 启动期错误（配置、输入）直接终止运行；条目级错误（请求、前置条件、内容）
//! 使所在批次整体失败。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入条目无法读取或解析
    #[error("输入源不可用 ({path}): {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// 必需的环境变量缺失
    #[error("缺少必需配置: {var_name}")]
    ConfigurationMissing { var_name: String },

    /// 环境变量存在但无法解析
    #[error("配置 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    ConfigurationInvalid {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 对话服务调用失败（网络错误、HTTP 错误或响应中的 errors）
    #[error("请求失败 ({endpoint}): {details}")]
    RequestFailed { endpoint: String, details: String },

    /// 场景构造的前置条件不满足
    #[error("前置条件不满足 (条目 {item_id}): {reason}")]
    PreconditionViolation { item_id: String, reason: String },

    /// 条目 content 字段无法解析
    #[error("条目 {item_id} 的内容无法解析: {source}")]
    InvalidContent {
        item_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// 检查点文件写入失败
    #[error("写入检查点失败 ({path}): {source}")]
    CheckpointWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建输入源错误
    pub fn source_unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        AppError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建配置缺失错误
    pub fn configuration_missing(var_name: impl Into<String>) -> Self {
        AppError::ConfigurationMissing {
            var_name: var_name.into(),
        }
    }

    /// 创建请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, details: impl ToString) -> Self {
        AppError::RequestFailed {
            endpoint: endpoint.into(),
            details: details.to_string(),
        }
    }

    /// 创建前置条件错误
    pub fn precondition_violation(item_id: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::PreconditionViolation {
            item_id: item_id.into(),
            reason: reason.into(),
        }
    }

    /// 创建检查点写入错误
    pub fn checkpoint_write(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::CheckpointWrite {
            path: path.into(),
            source,
        }
    }

    /// 是否为条目级错误（会使所在批次失败，但下次运行可恢复）
    pub fn is_item_failure(&self) -> bool {
        matches!(
            self,
            AppError::RequestFailed { .. }
                | AppError::PreconditionViolation { .. }
                | AppError::InvalidContent { .. }
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_missing_display() {
        let err = AppError::configuration_missing("GRAPHQL_URL");
        assert_eq!(err.to_string(), "缺少必需配置: GRAPHQL_URL");
    }

    #[test]
    fn test_item_failure_classification() {
        assert!(AppError::request_failed("http://x", "boom").is_item_failure());
        assert!(AppError::precondition_violation("1", "no wrong option").is_item_failure());
        assert!(!AppError::source_unavailable("in.json", "missing").is_item_failure());
        assert!(!AppError::configuration_missing("GRAPHQL_ID_TOKEN").is_item_failure());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppError>();
    }
}
