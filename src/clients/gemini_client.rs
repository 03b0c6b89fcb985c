//! Gemini 客户端
//!
//! 直接调用 `models/{model}:generateContent`，
//! 需要结构化输出时带上 `responseMimeType` 和 `responseSchema`

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::clients::{CompletionRequest, TextGenerator};
use crate::config::Config;
use crate::error::{LlmError, LlmResult};

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
    max_tokens: u32,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config) -> LlmResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::api_call_failed(&config.llm_model_name, e))?;

        Ok(Self {
            http,
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.llm_model_name.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }

    fn build_body(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let schema = request.response_schema.as_ref().map(to_gemini_schema);
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: Some(self.max_tokens),
                response_mime_type: schema.as_ref().map(|_| "application/json".to_string()),
                response_schema: schema,
            },
        }
    }
}

impl TextGenerator for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        debug!("调用 Gemini API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", request.prompt.len());

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini API 调用失败: {}", e);
                LlmError::api_call_failed(&self.model_name, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API 返回错误状态: {}", status);
            return Err(LlmError::BadStatus {
                model: self.model_name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::api_call_failed(&self.model_name, e))?;

        debug!("Gemini API 调用成功");

        parsed
            .text()
            .ok_or_else(|| LlmError::EmptyResponse {
                model: self.model_name.clone(),
            })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// 把标准 JSON Schema 的类型名转换成 Gemini 的写法（`"object"` → `"OBJECT"`）
pub fn to_gemini_schema(schema: &JsonValue) -> JsonValue {
    match schema {
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", JsonValue::String(t)) => JsonValue::String(t.to_uppercase()),
                        // 名为 type 的字段本身是对象，照常递归
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

// ========== 请求 / 响应结构 ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// 拼接第一个候选的所有文本片段
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}
