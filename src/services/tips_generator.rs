//! 提升建议服务 - 业务能力层
//!
//! 答错后请求模型给出复习建议。这里的失败不会上抛：
//! 拿不到建议只影响体验，拿不到题目才会打断会话

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::{CompletionRequest, TextGenerator};
use crate::models::Subject;

/// 请求失败时的固定建议
pub const FALLBACK_TIPS: &str = "Could not load improvement tips. Make sure to review the explanation carefully to understand the correct answer.";

/// 提升建议服务
pub struct TipsGenerator<G> {
    client: Arc<G>,
}

impl<G: TextGenerator> TipsGenerator<G> {
    pub fn new(client: Arc<G>) -> Self {
        Self { client }
    }

    /// 获取提升建议，任何错误都会被替换为 [`FALLBACK_TIPS`]
    pub async fn get_tips(
        &self,
        subject: Subject,
        question: &str,
        user_answer: &str,
        correct_answer: &str,
    ) -> String {
        info!("🤖 正在生成提升建议 (答案: {} / 正确: {})", user_answer, correct_answer);

        let request =
            CompletionRequest::new(build_tips_prompt(subject, question, user_answer, correct_answer));

        match self.client.complete(&request).await {
            Ok(tips) if !tips.trim().is_empty() => tips,
            Ok(_) => {
                warn!("⚠️ 提升建议为空，使用默认文案");
                FALLBACK_TIPS.to_string()
            }
            Err(e) => {
                warn!("⚠️ 获取提升建议失败，使用默认文案: {}", e);
                FALLBACK_TIPS.to_string()
            }
        }
    }
}

/// 提升建议提示词
pub fn build_tips_prompt(
    subject: Subject,
    question: &str,
    user_answer: &str,
    correct_answer: &str,
) -> String {
    format!(
        r#"As an expert SAT tutor, a student is practicing for the {} section and made a mistake.

Question: "{}"
Their incorrect answer was: "{}"
The correct answer was: "{}"

Please provide specific, actionable advice on what concepts the student should review to avoid this type of mistake in the future. Keep the advice concise, encouraging, and focused on 1-2 key concepts. Start with a phrase like "To improve on questions like this...".
"#,
        subject.name(),
        question,
        user_answer,
        correct_answer
    )
}
