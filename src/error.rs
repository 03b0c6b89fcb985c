//! 错误类型
//!
//! 两条出题路径的错误策略不同：
//! - 出题失败（`GenerationError`）会上抛给状态机，强制用户重新选择科目
//! - 建议生成失败在 `TipsGenerator` 内部被吞掉，替换为固定文案，因此没有对应的错误类型

use thiserror::Error;

/// LLM 客户端错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败（网络、鉴权、请求构建等）
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },

    /// 服务返回了非 2xx 状态码
    #[error("LLM API返回错误状态 (模型: {model}): {status} {body}")]
    BadStatus {
        model: String,
        status: u16,
        body: String,
    },

    /// 返回结果为空
    #[error("LLM返回结果为空 (模型: {model})")]
    EmptyResponse { model: String },
}

impl LlmError {
    /// 创建 API 调用失败错误
    pub fn api_call_failed(model: impl Into<String>, source: impl std::fmt::Display) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            message: source.to_string(),
        }
    }
}

/// 出题失败
///
/// 任何一种都会让当前会话回到科目选择
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("题目生成请求失败: {0}")]
    Service(#[from] LlmError),

    #[error("题目生成服务返回了空内容")]
    EmptyResponse,

    #[error("题目 JSON 解析失败: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("题目缺少字段: {0}")]
    MissingField(&'static str),

    #[error("题目选项数量应为 4，实际为 {0}")]
    OptionCount(usize),

    #[error("无法识别的正确答案: {0:?}")]
    InvalidAnswerLabel(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 缺少 API Key
    #[error("未配置 LLM API Key (请设置 LLM_API_KEY / GEMINI_API_KEY / API_KEY)")]
    MissingApiKey,

    /// 未知的 LLM 服务类型
    #[error("未知的 LLM 服务类型: {0} (可选: gemini, openai)")]
    UnknownProvider(String),

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 出题结果类型
pub type GenerationResult<T> = Result<T, GenerationError>;

/// LLM 调用结果类型
pub type LlmResult<T> = Result<T, LlmError>;
