//! 兼容 OpenAI 接口的客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型（Azure、Doubao、本地推理服务等）
//!
//! 这类服务不一定支持结构化输出，结构约束以系统消息的形式传给模型。
//! 请求只发一次：关闭 `async-openai` 自带的指数退避重试，超时由自己构建的 HTTP 客户端控制

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use backoff::ExponentialBackoff;
use tracing::{debug, warn};

use crate::clients::{CompletionRequest, TextGenerator};
use crate::config::Config;
use crate::error::{LlmError, LlmResult};

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_tokens: u32,
}

impl OpenAiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> LlmResult<Self> {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::api_call_failed(&config.llm_model_name, e))?;

        let client = Client::with_config(openai_config)
            .with_http_client(http)
            .with_backoff(single_attempt());

        Ok(Self {
            client,
            model_name: config.llm_model_name.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn build_messages(&self, request: &CompletionRequest) -> LlmResult<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::new();

        if let Some(sys_msg) = schema_instruction(request) {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg.as_str())
                .build()
                .map_err(|e| LlmError::api_call_failed(&self.model_name, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.as_str())
            .build()
            .map_err(|e| LlmError::api_call_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        Ok(messages)
    }
}

/// 退避时长上限为 0：第一次失败后不再重试
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

/// 把结构约束写成系统消息
fn schema_instruction(request: &CompletionRequest) -> Option<String> {
    request.response_schema.as_ref().map(|schema| {
        format!(
            "Respond with a single JSON object and nothing else. \
             It must match this JSON schema:\n{}",
            serde_json::to_string_pretty(schema).unwrap_or_default()
        )
    })
}

impl TextGenerator for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", request.prompt.len());

        let messages = self.build_messages(request)?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model_name)
            .messages(messages)
            .max_tokens(self.max_tokens);
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }
        let chat_request = args
            .build()
            .map_err(|e| LlmError::api_call_failed(&self.model_name, e))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::api_call_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| LlmError::EmptyResponse {
                model: self.model_name.clone(),
            })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
