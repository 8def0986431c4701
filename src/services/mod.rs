pub mod fallback;
pub mod llm_service;
pub mod question_bank;
pub mod scorer;

pub use fallback::fallback_questions;
pub use llm_service::LlmService;
pub use question_bank::{QuestionBank, QuestionGenerator, QuestionSource};
pub use scorer::{score, Grade, QuestionResult, ScoreReport};
