//! 基础设施层：文本生成客户端
//!
//! 上层只依赖 [`TextGenerator`]，不关心背后是 Gemini 还是兼容 OpenAI 的服务

pub mod gemini_client;
pub mod openai_client;

use std::future::Future;

use serde_json::Value as JsonValue;

use crate::config::{Config, LlmProvider};
use crate::error::LlmResult;

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiClient;

/// 一次生成请求
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    /// 用户提示词
    pub prompt: String,
    /// 要求返回 JSON 时的结构约束（JSON Schema，小写类型名）
    pub response_schema: Option<JsonValue>,
    /// 采样温度，None 时用服务端默认值
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: JsonValue) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// 文本生成能力
pub trait TextGenerator: Send + Sync {
    /// 发送请求，返回模型回复的文本（已去除首尾空白）
    fn complete(&self, request: &CompletionRequest)
        -> impl Future<Output = LlmResult<String>> + Send;

    /// 模型名称（仅用于日志）
    fn model_name(&self) -> &str;
}

/// 按配置选出的具体客户端
pub enum LlmBackend {
    Gemini(GeminiClient),
    OpenAi(OpenAiClient),
}

impl LlmBackend {
    pub fn from_config(config: &Config) -> LlmResult<Self> {
        Ok(match config.llm_provider {
            LlmProvider::Gemini => LlmBackend::Gemini(GeminiClient::new(config)?),
            LlmProvider::OpenAi => LlmBackend::OpenAi(OpenAiClient::new(config)?),
        })
    }
}

impl TextGenerator for LlmBackend {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        match self {
            LlmBackend::Gemini(client) => client.complete(request).await,
            LlmBackend::OpenAi(client) => client.complete(request).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            LlmBackend::Gemini(client) => client.model_name(),
            LlmBackend::OpenAi(client) => client.model_name(),
        }
    }
}
