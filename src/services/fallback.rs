use crate::models::Question;

/// 内置兜底题库
///
/// 未配置 API Key 或在线出题失败时使用，内容固定
pub fn fallback_questions() -> Vec<Question> {
    vec![
        Question::new(
            "fallback-1",
            "What is the time complexity of searching in a balanced Binary Search Tree (BST)?",
            ["O(n)", "O(log n)", "O(1)", "O(n log n)"],
            1,
            "Data Structures",
        ),
        Question::new(
            "fallback-2",
            "Which HTTP method is idempotent and used to update a resource?",
            ["POST", "PUT", "PATCH", "DELETE"],
            1,
            "Web Protocols",
        ),
        Question::new(
            "fallback-3",
            "In React, what is the primary purpose of the useEffect hook?",
            [
                "To manage state",
                "To handle side effects",
                "To memorize values",
                "To create context",
            ],
            1,
            "React",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{Difficulty, RawQuestion};
    use crate::services::{QuestionBank, QuestionSource};

    #[test]
    fn test_fallback_batch_is_valid() {
        let questions = fallback_questions();
        assert_eq!(questions.len(), 3);
        for q in questions {
            let raw = RawQuestion {
                question_text: q.question_text,
                options: q.options,
                correct_index: q.correct_index,
                topic: q.topic,
            };
            assert!(raw.validate().is_ok());
        }
    }

    #[test]
    fn test_offline_bank_serves_fallback_for_every_difficulty() {
        let bank = QuestionBank::from_config(&Config::default());
        for difficulty in Difficulty::ALL {
            let questions = tokio_test::block_on(bank.generate(difficulty));
            assert_eq!(questions, fallback_questions());
        }
    }
}
