pub mod answer;
pub mod difficulty;
pub mod phase;
pub mod question;

pub use answer::AnswerMap;
pub use difficulty::Difficulty;
pub use phase::AssessmentPhase;
pub use question::{Question, RawQuestion, OPTION_COUNT};
