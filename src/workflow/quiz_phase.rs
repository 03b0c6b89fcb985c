use std::fmt::Display;

/// 答题阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuizPhase {
    /// 空闲：未选科目，或刚选完科目、马上出题
    #[default]
    Idle,
    /// 正在出题
    LoadingQuestion,
    /// 等待作答
    Answering,
    /// 答错后正在获取建议
    LoadingFeedback,
    /// 展示反馈
    DisplayingFeedback,
}

impl Display for QuizPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuizPhase::Idle => "IDLE",
            QuizPhase::LoadingQuestion => "LOADING_QUESTION",
            QuizPhase::Answering => "ANSWERING",
            QuizPhase::LoadingFeedback => "LOADING_FEEDBACK",
            QuizPhase::DisplayingFeedback => "DISPLAYING_FEEDBACK",
        };
        write!(f, "{}", name)
    }
}
