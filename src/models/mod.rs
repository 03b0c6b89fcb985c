pub mod feedback;
pub mod question;
pub mod subject;

pub use feedback::{Feedback, Score, CORRECT_ENCOURAGEMENT};
pub use question::{QuizQuestion, RawQuestion, OPTION_LABELS};
pub use subject::Subject;
