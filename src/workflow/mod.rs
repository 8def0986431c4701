pub mod answer_collector;
pub mod assessment;

pub use answer_collector::{AnswerCollector, SubmitPolicy};
pub use assessment::{Assessment, Phase, Progress};
