//! 答题会话 - 流程层
//!
//! 会话状态只在这里被修改，每一次修改都对应一个具名的状态转换。
//! 出题和获取建议是异步的：转换函数只负责发出"票据"（ticket），
//! 真正的请求由编排层执行，结果再带着票据回来。
//!
//! 每张票据都记录了发出时的 epoch。选择科目、重置、发出新请求都会让 epoch 前进，
//! 所以用户中途换科目或重置之后，迟到的响应会被直接丢弃。

use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::models::{Feedback, QuizQuestion, Score, Subject, OPTION_LABELS};
use crate::workflow::quiz_phase::QuizPhase;

/// 出题失败时展示给用户的提示
pub const GENERATION_ERROR_MESSAGE: &str =
    "Sorry, we couldn't generate a question. Please try again.";

/// 出题票据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    pub subject: Subject,
}

/// 获取建议的票据，带着请求需要的全部信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipsTicket {
    epoch: u64,
    pub subject: Subject,
    pub question: String,
    pub user_answer: char,
    pub correct_answer: char,
}

/// 提交答案的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 当前不能提交（不在作答阶段或还没选答案）
    Ignored,
    /// 答对，反馈已经生成
    Correct,
    /// 答错，需要去获取建议
    NeedsTips(TipsTicket),
}

/// 答题会话
#[derive(Debug, Default)]
pub struct QuizSession {
    phase: QuizPhase,
    subject: Option<Subject>,
    question: Option<QuizQuestion>,
    selected_answer: Option<char>,
    feedback: Option<Feedback>,
    score: Score,
    error: Option<String>,
    epoch: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== 状态转换 ==========

    /// 选择科目：清零得分，进入"已选科目的 Idle"，并立即出题
    ///
    /// 每次选择恰好发出一张出题票据
    pub fn select_subject(&mut self, subject: Subject) -> FetchTicket {
        info!("📚 选择科目: {}", subject);
        self.epoch += 1;
        self.subject = Some(subject);
        self.score = Score::default();
        self.question = None;
        self.selected_answer = None;
        self.feedback = None;
        self.error = None;
        self.phase = QuizPhase::Idle;

        self.issue_fetch(subject)
    }

    /// Idle 且已选科目时出题，其他情况返回 None
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.phase != QuizPhase::Idle {
            return None;
        }
        let subject = self.subject?;
        Some(self.issue_fetch(subject))
    }

    fn issue_fetch(&mut self, subject: Subject) -> FetchTicket {
        self.epoch += 1;
        self.phase = QuizPhase::LoadingQuestion;
        self.question = None;
        self.selected_answer = None;
        self.feedback = None;
        self.error = None;
        debug!("发出出题请求 (epoch {})", self.epoch);

        FetchTicket {
            epoch: self.epoch,
            subject,
        }
    }

    /// 出题结果回来了
    ///
    /// 票据过期时什么都不做并返回 false
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<QuizQuestion, GenerationError>,
    ) -> bool {
        if !self.is_current(ticket.epoch, QuizPhase::LoadingQuestion) {
            debug!("丢弃过期的出题响应 (epoch {} / 当前 {})", ticket.epoch, self.epoch);
            return false;
        }

        match result {
            Ok(question) => {
                self.question = Some(question);
                self.selected_answer = None;
                self.feedback = None;
                self.phase = QuizPhase::Answering;
            }
            Err(e) => {
                // 出题失败：回到科目选择，不原地重试
                warn!("⚠️ 出题失败，返回科目选择: {}", e);
                self.error = Some(GENERATION_ERROR_MESSAGE.to_string());
                self.subject = None;
                self.question = None;
                self.phase = QuizPhase::Idle;
            }
        }
        true
    }

    /// 选择答案，只在作答阶段有效，可以反复修改
    pub fn select_answer(&mut self, letter: char) -> bool {
        if self.phase != QuizPhase::Answering || !OPTION_LABELS.contains(&letter) {
            return false;
        }
        self.selected_answer = Some(letter);
        true
    }

    /// 提交答案
    pub fn submit_answer(&mut self) -> SubmitOutcome {
        if self.phase != QuizPhase::Answering {
            return SubmitOutcome::Ignored;
        }
        let (Some(selected), Some(question), Some(subject)) =
            (self.selected_answer, self.question.as_ref(), self.subject)
        else {
            return SubmitOutcome::Ignored;
        };

        let is_correct = selected == question.correct_answer();
        self.score.record(is_correct);

        if is_correct {
            info!("✅ 回答正确 ({})", selected);
            self.feedback = Some(Feedback::correct(question.explanation()));
            self.phase = QuizPhase::DisplayingFeedback;
            return SubmitOutcome::Correct;
        }

        info!("❌ 回答错误 ({}，正确答案 {})", selected, question.correct_answer());
        let ticket = TipsTicket {
            epoch: self.epoch + 1,
            subject,
            question: question.question().to_string(),
            user_answer: selected,
            correct_answer: question.correct_answer(),
        };
        self.epoch += 1;
        self.phase = QuizPhase::LoadingFeedback;
        SubmitOutcome::NeedsTips(ticket)
    }

    /// 建议回来了
    pub fn complete_feedback(&mut self, ticket: &TipsTicket, tips: String) -> bool {
        if !self.is_current(ticket.epoch, QuizPhase::LoadingFeedback) {
            debug!("丢弃过期的建议响应 (epoch {} / 当前 {})", ticket.epoch, self.epoch);
            return false;
        }
        let Some(question) = self.question.as_ref() else {
            return false;
        };

        self.feedback = Some(Feedback::incorrect(question.explanation(), tips));
        self.phase = QuizPhase::DisplayingFeedback;
        true
    }

    /// 下一题：展示反馈时，或 Idle 且仍有科目时
    pub fn next_question(&mut self) -> Option<FetchTicket> {
        match self.phase {
            QuizPhase::DisplayingFeedback => {
                let subject = self.subject?;
                Some(self.issue_fetch(subject))
            }
            QuizPhase::Idle => self.begin_fetch(),
            _ => None,
        }
    }

    /// 重置：任何阶段都可以，回到未选科目的 Idle
    pub fn reset(&mut self) {
        info!("🔄 重置会话");
        self.epoch += 1;
        self.subject = None;
        self.question = None;
        self.selected_answer = None;
        self.feedback = None;
        self.error = None;
        self.phase = QuizPhase::Idle;
    }

    fn is_current(&self, epoch: u64, phase: QuizPhase) -> bool {
        self.epoch == epoch && self.phase == phase
    }

    // ========== 只读查询 ==========

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn subject(&self) -> Option<Subject> {
        self.subject
    }

    pub fn question(&self) -> Option<&QuizQuestion> {
        self.question.as_ref()
    }

    pub fn selected_answer(&self) -> Option<char> {
        self.selected_answer
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 已经提交过答案（选项不可再改，显示对错）
    pub fn is_answered(&self) -> bool {
        matches!(
            self.phase,
            QuizPhase::LoadingFeedback | QuizPhase::DisplayingFeedback
        )
    }

    /// 还没有选科目（区别于"已选科目、马上出题"）
    pub fn needs_subject(&self) -> bool {
        self.subject.is_none()
    }
}
