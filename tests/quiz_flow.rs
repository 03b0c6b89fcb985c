use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use sat_genius::clients::{CompletionRequest, LlmBackend, TextGenerator};
use sat_genius::error::{GenerationError, LlmError, LlmResult};
use sat_genius::models::Score;
use sat_genius::orchestrator::QuizController;
use sat_genius::services::{QuestionGenerator, FALLBACK_TIPS};
use sat_genius::workflow::GENERATION_ERROR_MESSAGE;
use sat_genius::{Config, Intent, QuizPhase, Subject};
use tokio_test::{assert_err, assert_ok};

const QUESTION_JSON: &str = r#"{
    "question": "If 3x + 2 = 11, what is x?",
    "options": ["2", "B. 3", "4", "5"],
    "correctAnswer": "b) 3",
    "explanation": "3x = 9, so x = 3."
}"#;

/// 按顺序返回预设回复，并记录收到的请求
struct ScriptedGenerator {
    replies: Mutex<VecDeque<LlmResult<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGenerator {
    fn new(replies: Vec<LlmResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(offline()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn offline() -> LlmError {
    LlmError::ApiCallFailed {
        model: "scripted".to_string(),
        message: "connection refused".to_string(),
    }
}

fn ok(text: &str) -> LlmResult<String> {
    Ok(text.to_string())
}

#[tokio::test]
async fn test_select_subject_fetches_exactly_one_question() {
    let generator = ScriptedGenerator::new(vec![ok(QUESTION_JSON)]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    assert!(controller.dispatch(Intent::SelectSubject(Subject::Math)).await);

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("for the Math section"));
    assert!(requests[0].response_schema.is_some());
    assert_eq!(requests[0].temperature, Some(1.0));

    let session = controller.session();
    assert_eq!(session.phase(), QuizPhase::Answering);
    let question = session.question().unwrap();
    assert_eq!(question.correct_answer(), 'B');
    assert_eq!(question.options()[0], "A. 2");
    assert_eq!(question.options()[1], "B. 3");
}

#[tokio::test]
async fn test_correct_answer_needs_no_tips_call() {
    let generator = ScriptedGenerator::new(vec![ok(QUESTION_JSON)]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    controller.dispatch(Intent::SelectSubject(Subject::Math)).await;
    assert!(!controller.dispatch(Intent::SelectAnswer('B')).await);
    assert!(!controller.dispatch(Intent::Submit).await);

    assert_eq!(generator.requests().len(), 1);
    let session = controller.session();
    assert_eq!(session.phase(), QuizPhase::DisplayingFeedback);
    assert_eq!(session.score(), Score { correct: 1, incorrect: 0 });
    assert!(session.feedback().unwrap().is_correct);
}

#[tokio::test]
async fn test_incorrect_answer_requests_tips() {
    let generator = ScriptedGenerator::new(vec![
        ok(QUESTION_JSON),
        ok("To improve on questions like this, isolate the variable first."),
    ]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    controller.dispatch(Intent::SelectSubject(Subject::Math)).await;
    controller.dispatch(Intent::SelectAnswer('A')).await;
    assert!(controller.dispatch(Intent::Submit).await);

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    let tips_prompt = &requests[1].prompt;
    assert!(tips_prompt.contains("practicing for the Math section"));
    assert!(tips_prompt.contains("Question: \"If 3x + 2 = 11, what is x?\""));
    assert!(tips_prompt.contains("Their incorrect answer was: \"A\""));
    assert!(tips_prompt.contains("The correct answer was: \"B\""));
    assert!(requests[1].response_schema.is_none());

    let session = controller.session();
    assert_eq!(session.score(), Score { correct: 0, incorrect: 1 });
    let feedback = session.feedback().unwrap();
    assert!(!feedback.is_correct);
    assert_eq!(feedback.explanation, "3x = 9, so x = 3.");
    assert_eq!(
        feedback.improvement_tips,
        "To improve on questions like this, isolate the variable first."
    );
}

#[tokio::test]
async fn test_tips_failure_falls_back() {
    let generator = ScriptedGenerator::new(vec![ok(QUESTION_JSON), Err(offline())]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    controller.dispatch(Intent::SelectSubject(Subject::Math)).await;
    controller.dispatch(Intent::SelectAnswer('D')).await;
    controller.dispatch(Intent::Submit).await;

    let session = controller.session();
    assert_eq!(session.phase(), QuizPhase::DisplayingFeedback);
    assert_eq!(session.error(), None);
    assert_eq!(session.feedback().unwrap().improvement_tips, FALLBACK_TIPS);
}

#[tokio::test]
async fn test_generation_failure_returns_to_subject_choice() {
    let generator = ScriptedGenerator::new(vec![ok("I cannot do that.")]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    controller
        .dispatch(Intent::SelectSubject(Subject::ReadingWriting))
        .await;

    // 不重试
    assert_eq!(generator.requests().len(), 1);
    let session = controller.session();
    assert_eq!(session.phase(), QuizPhase::Idle);
    assert!(session.needs_subject());
    assert_eq!(session.error(), Some(GENERATION_ERROR_MESSAGE));
    assert_eq!(session.question(), None);

    // 没有科目时"下一题"不会发请求
    assert!(!controller.dispatch(Intent::NextQuestion).await);
    assert_eq!(generator.requests().len(), 1);
}

#[tokio::test]
async fn test_question_generator_validation() {
    let generator = ScriptedGenerator::new(vec![
        ok(r#"{"question":"q","options":["1","2","3","4"],"correctAnswer":"A"}"#),
        ok(r#"{"question":"q","options":["1","2","3"],"correctAnswer":"A","explanation":"e"}"#),
        Err(offline()),
        ok(QUESTION_JSON),
    ]);
    let questions = QuestionGenerator::new(Arc::clone(&generator), 0.5);

    let missing = questions.generate(Subject::Math).await;
    assert!(matches!(missing, Err(GenerationError::MissingField("explanation"))));

    let three = questions.generate(Subject::Math).await;
    assert!(matches!(three, Err(GenerationError::OptionCount(3))));

    let offline = questions.generate(Subject::Math).await;
    assert!(matches!(offline, Err(GenerationError::Service(_))));
    assert_err!(offline);

    let q = assert_ok!(questions.generate(Subject::Math).await);
    assert_eq!(q.correct_answer(), 'B');
    assert_eq!(generator.requests()[0].temperature, Some(0.5));
}

#[tokio::test]
async fn test_next_question_keeps_score() {
    let generator = ScriptedGenerator::new(vec![ok(QUESTION_JSON), ok(QUESTION_JSON)]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    controller.dispatch(Intent::SelectSubject(Subject::Math)).await;
    controller.dispatch(Intent::SelectAnswer('B')).await;
    controller.dispatch(Intent::Submit).await;
    assert!(controller.dispatch(Intent::NextQuestion).await);

    assert_eq!(generator.requests().len(), 2);
    let session = controller.session();
    assert_eq!(session.phase(), QuizPhase::Answering);
    assert_eq!(session.feedback(), None);
    assert_eq!(session.selected_answer(), None);
    assert_eq!(session.score().correct, 1);
}

#[tokio::test]
async fn test_subject_change_resets_score() {
    let generator = ScriptedGenerator::new(vec![
        ok(QUESTION_JSON),
        ok("tips"),
        ok(QUESTION_JSON),
    ]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    controller.dispatch(Intent::SelectSubject(Subject::Math)).await;
    controller.dispatch(Intent::SelectAnswer('C')).await;
    controller.dispatch(Intent::Submit).await;
    assert_eq!(controller.session().score().incorrect, 1);

    controller.dispatch(Intent::Reset).await;
    controller
        .dispatch(Intent::SelectSubject(Subject::ReadingWriting))
        .await;
    assert_eq!(controller.session().score(), Score::default());
    assert_eq!(controller.session().subject(), Some(Subject::ReadingWriting));
}

#[tokio::test]
async fn test_late_question_after_reset_is_ignored() {
    let generator = ScriptedGenerator::new(vec![ok(QUESTION_JSON)]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);
    let generators = controller.generators();

    let job = controller
        .handle(Intent::SelectSubject(Subject::Math))
        .unwrap();
    assert_eq!(controller.session().phase(), QuizPhase::LoadingQuestion);

    // 请求还在路上，用户重置了
    controller.handle(Intent::Reset);

    let completion = tokio::spawn(async move { generators.run(job).await })
        .await
        .unwrap();
    assert!(!controller.apply(completion));

    let session = controller.session();
    assert_eq!(session.phase(), QuizPhase::Idle);
    assert!(session.needs_subject());
    assert_eq!(session.question(), None);
}

#[tokio::test]
async fn test_late_tips_after_subject_change_is_ignored() {
    let generator = ScriptedGenerator::new(vec![ok(QUESTION_JSON), ok("late tips")]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    controller.dispatch(Intent::SelectSubject(Subject::Math)).await;
    controller.handle(Intent::SelectAnswer('A'));
    let tips_job = controller.handle(Intent::Submit).unwrap();
    assert_eq!(controller.session().phase(), QuizPhase::LoadingFeedback);

    // 换科目，新的出题任务还没执行
    let fetch_job = controller
        .handle(Intent::SelectSubject(Subject::ReadingWriting))
        .unwrap();

    let late = controller.generators().run(tips_job).await;
    assert!(!controller.apply(late));
    assert_eq!(controller.session().feedback(), None);
    assert_eq!(controller.session().phase(), QuizPhase::LoadingQuestion);

    // 新任务正常应用（脚本已用完，得到出题失败）
    let fresh = controller.generators().run(fetch_job).await;
    assert!(controller.apply(fresh));
    assert_eq!(controller.session().error(), Some(GENERATION_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_intents_outside_their_phase_are_ignored() {
    let generator = ScriptedGenerator::new(vec![]);
    let mut controller = QuizController::new(Arc::clone(&generator), 1.0);

    assert!(controller.handle(Intent::SelectAnswer('A')).is_none());
    assert!(controller.handle(Intent::Submit).is_none());
    assert!(controller.handle(Intent::NextQuestion).is_none());
    assert!(controller.handle(Intent::Help).is_none());
    assert!(generator.requests().is_empty());
    assert_eq!(controller.session().phase(), QuizPhase::Idle);
}

/// 真实调用模型，需要配置 API Key：
/// ```bash
/// LLM_API_KEY=... cargo test test_live_question -- --ignored --nocapture
/// ```
#[tokio::test]
#[ignore]
async fn test_live_question() {
    let config = Config::load().expect("加载配置失败");
    let backend = Arc::new(LlmBackend::from_config(&config).expect("创建客户端失败"));
    let questions = QuestionGenerator::new(backend, config.question_temperature);

    let question = questions
        .generate(Subject::Math)
        .await
        .expect("生成题目失败");

    println!("{}", question.question());
    for option in question.options() {
        println!("  {}", option);
    }
    println!("正确答案: {}", question.correct_answer());
}
