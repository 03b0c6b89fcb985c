//! 答题控制器 - 编排层
//!
//! 唯一持有 [`QuizSession`] 的地方：意图进来，转换成状态转换和待执行的任务；
//! 任务结果回来，再交给会话去应用。任务本身不碰会话，可以放到独立的 tokio 任务里跑。

use std::sync::Arc;

use tracing::debug;

use crate::clients::TextGenerator;
use crate::error::GenerationResult;
use crate::models::QuizQuestion;
use crate::presentation::Intent;
use crate::services::{QuestionGenerator, TipsGenerator};
use crate::workflow::{FetchTicket, QuizSession, SubmitOutcome, TipsTicket};

/// 待执行的异步任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    FetchQuestion(FetchTicket),
    FetchTips(TipsTicket),
}

/// 任务结果，带着原来的票据
#[derive(Debug)]
pub enum Completion {
    Question(FetchTicket, GenerationResult<QuizQuestion>),
    Tips(TipsTicket, String),
}

/// 两个生成服务，共用同一个客户端
pub struct Generators<G> {
    questions: Arc<QuestionGenerator<G>>,
    tips: Arc<TipsGenerator<G>>,
}

impl<G> Clone for Generators<G> {
    fn clone(&self) -> Self {
        Self {
            questions: Arc::clone(&self.questions),
            tips: Arc::clone(&self.tips),
        }
    }
}

impl<G: TextGenerator> Generators<G> {
    pub fn new(client: Arc<G>, question_temperature: f32) -> Self {
        Self {
            questions: Arc::new(QuestionGenerator::new(
                Arc::clone(&client),
                question_temperature,
            )),
            tips: Arc::new(TipsGenerator::new(client)),
        }
    }

    /// 执行一个任务
    pub async fn run(&self, job: Job) -> Completion {
        match job {
            Job::FetchQuestion(ticket) => {
                let result = self.questions.generate(ticket.subject).await;
                Completion::Question(ticket, result)
            }
            Job::FetchTips(ticket) => {
                let tips = self
                    .tips
                    .get_tips(
                        ticket.subject,
                        &ticket.question,
                        &ticket.user_answer.to_string(),
                        &ticket.correct_answer.to_string(),
                    )
                    .await;
                Completion::Tips(ticket, tips)
            }
        }
    }
}

/// 答题控制器
pub struct QuizController<G> {
    session: QuizSession,
    generators: Generators<G>,
}

impl<G: TextGenerator> QuizController<G> {
    pub fn new(client: Arc<G>, question_temperature: f32) -> Self {
        Self {
            session: QuizSession::new(),
            generators: Generators::new(client, question_temperature),
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// 生成服务的句柄，交给后台任务使用
    pub fn generators(&self) -> Generators<G> {
        self.generators.clone()
    }

    /// 处理意图，需要请求模型时返回任务
    pub fn handle(&mut self, intent: Intent) -> Option<Job> {
        debug!("处理意图: {:?} (阶段: {})", intent, self.session.phase());

        match intent {
            Intent::SelectSubject(subject) => {
                Some(Job::FetchQuestion(self.session.select_subject(subject)))
            }
            Intent::SelectAnswer(letter) => {
                self.session.select_answer(letter);
                None
            }
            Intent::Submit => match self.session.submit_answer() {
                SubmitOutcome::NeedsTips(ticket) => Some(Job::FetchTips(ticket)),
                SubmitOutcome::Correct | SubmitOutcome::Ignored => None,
            },
            Intent::NextQuestion => self.session.next_question().map(Job::FetchQuestion),
            Intent::Reset => {
                self.session.reset();
                None
            }
            Intent::Help | Intent::Quit => None,
        }
    }

    /// 应用任务结果，过期的结果会被丢弃（返回 false）
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Question(ticket, result) => self.session.complete_fetch(&ticket, result),
            Completion::Tips(ticket, tips) => self.session.complete_feedback(&ticket, tips),
        }
    }

    /// 顺序执行：处理意图，等任务完成，再应用结果
    ///
    /// 返回是否发起过请求
    pub async fn dispatch(&mut self, intent: Intent) -> bool {
        match self.handle(intent) {
            Some(job) => {
                let completion = self.generators.run(job).await;
                self.apply(completion);
                true
            }
            None => false,
        }
    }
}
