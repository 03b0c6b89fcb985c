pub mod quiz_phase;
pub mod quiz_session;

pub use quiz_phase::QuizPhase;
pub use quiz_session::{
    FetchTicket, QuizSession, SubmitOutcome, TipsTicket, GENERATION_ERROR_MESSAGE,
};
