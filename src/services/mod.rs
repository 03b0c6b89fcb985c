pub mod question_generator;
pub mod tips_generator;

pub use question_generator::QuestionGenerator;
pub use tips_generator::{TipsGenerator, FALLBACK_TIPS};
