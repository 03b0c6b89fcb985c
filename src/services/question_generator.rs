//! 出题服务 - 业务能力层
//!
//! 只负责"按科目生成一道题"，失败直接上抛，不重试、不缓存

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info};

use crate::clients::{CompletionRequest, TextGenerator};
use crate::error::{GenerationError, GenerationResult};
use crate::models::{QuizQuestion, RawQuestion, Subject};
use crate::utils::logging::truncate_text;

/// 整段文本被 ``` 代码块包裹
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("代码块正则无效")
});

/// 出题服务
pub struct QuestionGenerator<G> {
    client: Arc<G>,
    temperature: f32,
}

impl<G: TextGenerator> QuestionGenerator<G> {
    pub fn new(client: Arc<G>, temperature: f32) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// 生成一道题
    ///
    /// 网络失败、返回非 JSON、结构校验失败都会返回 [`GenerationError`]
    pub async fn generate(&self, subject: Subject) -> GenerationResult<QuizQuestion> {
        info!("🤖 正在生成 {} 题目 (模型: {})", subject, self.client.model_name());

        let request = CompletionRequest::new(build_question_prompt(subject))
            .with_schema(question_schema())
            .with_temperature(self.temperature);

        let result = match self.client.complete(&request).await {
            Ok(text) => parse_question(&text),
            Err(e) => Err(GenerationError::from(e)),
        };

        match &result {
            Ok(question) => {
                info!("✓ 题目生成成功，正确答案: {}", question.correct_answer());
                debug!("题干: {}", truncate_text(question.question(), 80));
            }
            Err(e) => error!("❌ 题目生成失败: {}", e),
        }

        result
    }
}

/// 出题提示词
pub fn build_question_prompt(subject: Subject) -> String {
    format!(
        "Generate one SAT-style multiple-choice question for the {} section. \
         The question should be challenging and representative of the real test. \
         Provide 4 options labeled A, B, C, and D. \
         Also provide the correct answer and a detailed explanation.",
        subject.name()
    )
}

/// 题目的结构约束
pub fn question_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "question": {
                "type": "string",
                "description": "The main text of the SAT-style question."
            },
            "options": {
                "type": "array",
                "description": "An array of 4 strings representing the multiple-choice options (A, B, C, D).",
                "items": { "type": "string" }
            },
            "correctAnswer": {
                "type": "string",
                "description": "The letter of the correct answer (e.g., 'B')."
            },
            "explanation": {
                "type": "string",
                "description": "A detailed explanation of why the correct answer is right and the others are wrong."
            }
        },
        "required": ["question", "options", "correctAnswer", "explanation"]
    })
}

/// 解析、校验并规范化模型返回的文本
pub fn parse_question(text: &str) -> GenerationResult<QuizQuestion> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let raw: RawQuestion = serde_json::from_str(body)?;
    QuizQuestion::from_raw(raw)
}

/// 去掉 ```json ... ``` 包裹（不支持结构化输出的服务经常这样返回）
fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => text,
    }
}
