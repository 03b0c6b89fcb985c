use serde::Serialize;

/// 答对时的固定鼓励语
pub const CORRECT_ENCOURAGEMENT: &str = "Great job! You've mastered this concept.";

/// 一次作答后的反馈
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub is_correct: bool,
    pub explanation: String,
    pub improvement_tips: String,
}

impl Feedback {
    /// 答对：解析 + 固定鼓励语，不需要请求模型
    pub fn correct(explanation: impl Into<String>) -> Self {
        Self {
            is_correct: true,
            explanation: explanation.into(),
            improvement_tips: CORRECT_ENCOURAGEMENT.to_string(),
        }
    }

    /// 答错：解析 + 模型给出的建议
    pub fn incorrect(explanation: impl Into<String>, tips: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            explanation: explanation.into(),
            improvement_tips: tips.into(),
        }
    }
}

/// 本次会话的得分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: u32,
    pub incorrect: u32,
}

impl Score {
    pub fn record(&mut self, is_correct: bool) {
        if is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// 正确率（0.0-1.0），还没作答时为 None
    pub fn accuracy(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.correct as f64 / total as f64),
        }
    }
}
