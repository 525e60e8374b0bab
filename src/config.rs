use crate::error::{AppError, AppResult};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 对话服务配置 ---
    /// GraphQL 服务地址
    pub graphql_url: String,
    /// 以 x-api-key 发送的令牌
    pub graphql_id_token: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 批处理配置 ---
    /// 输入条目文件
    pub input_path: String,
    /// 检查点（结果表）文件
    pub output_path: String,
    /// 每批同时处理的条目数量
    pub chunk_size: usize,
    /// 是否倒序派发（最新的条目先处理，落盘顺序不变）
    pub reverse_order: bool,
    /// 随机种子，None 时使用系统熵
    pub random_seed: Option<u64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

const DEFAULT_INPUT_PATH: &str = "scripts/generated-content.json";
const DEFAULT_OUTPUT_PATH: &str = "output.json";
const DEFAULT_CHUNK_SIZE: usize = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

impl Config {
    /// 使用给定的服务地址和令牌创建配置，其余选项取默认值
    pub fn new(graphql_url: impl Into<String>, graphql_id_token: impl Into<String>) -> Self {
        Self {
            graphql_url: graphql_url.into(),
            graphql_id_token: graphql_id_token.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            input_path: DEFAULT_INPUT_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            reverse_order: false,
            random_seed: None,
            verbose_logging: false,
        }
    }

    /// 从环境变量加载配置
    ///
    /// `GRAPHQL_URL` 和 `GRAPHQL_ID_TOKEN` 必须存在，缺失时在启动阶段报错。
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置（便于测试，不依赖进程环境）
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空字符串按缺失处理
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let graphql_url =
            get("GRAPHQL_URL").ok_or_else(|| AppError::configuration_missing("GRAPHQL_URL"))?;
        let graphql_id_token = get("GRAPHQL_ID_TOKEN")
            .ok_or_else(|| AppError::configuration_missing("GRAPHQL_ID_TOKEN"))?;

        let mut config = Self::new(graphql_url, graphql_id_token);

        if let Some(v) = get("INPUT_PATH") {
            config.input_path = v;
        }
        if let Some(v) = get("OUTPUT_PATH") {
            config.output_path = v;
        }
        if let Some(v) = get("CHUNK_SIZE") {
            config.chunk_size = parse_var("CHUNK_SIZE", &v, "正整数")?;
            if config.chunk_size == 0 {
                return Err(AppError::ConfigurationInvalid {
                    var_name: "CHUNK_SIZE".to_string(),
                    value: v,
                    expected_type: "正整数".to_string(),
                });
            }
        }
        if let Some(v) = get("REVERSE_ORDER") {
            config.reverse_order = parse_var("REVERSE_ORDER", &v, "bool")?;
        }
        if let Some(v) = get("RANDOM_SEED") {
            config.random_seed = Some(parse_var("RANDOM_SEED", &v, "u64")?);
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = get("VERBOSE_LOGGING") {
            config.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(var_name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::ConfigurationInvalid {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}
