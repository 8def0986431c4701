use std::sync::atomic::{AtomicUsize, Ordering};

use tech_prep::models::{AssessmentPhase, Difficulty, Question};
use tech_prep::services::{fallback_questions, Grade, QuestionSource};
use tech_prep::{Assessment, AssessmentError, Config, QuestionBank, SubmitPolicy};

/// 固定返回 5 道题并记录调用次数
struct StubSource {
    calls: AtomicUsize,
}

impl StubSource {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuestionSource for StubSource {
    async fn generate(&self, _difficulty: Difficulty) -> Vec<Question> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (0..5)
            .map(|i| {
                Question::new(
                    format!("gen-1700000000000-{}", i),
                    format!("Stub question {}", i),
                    ["w", "x", "y", "z"],
                    i % 4,
                    "System Design",
                )
            })
            .collect()
    }
}

fn offline_config() -> Config {
    Config {
        llm_api_key: None,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_no_credential_returns_fallback_batch() {
    let bank = QuestionBank::from_config(&offline_config());
    assert!(!bank.is_online());

    let questions = bank.generate(Difficulty::Mid).await;
    assert_eq!(questions, fallback_questions());

    let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["fallback-1", "fallback-2", "fallback-3"]);
    assert_eq!(
        questions[0].question_text,
        "What is the time complexity of searching in a balanced Binary Search Tree (BST)?"
    );
    assert_eq!(questions[1].correct_option(), "PUT");
    assert_eq!(questions[2].topic, "React");
}

#[tokio::test]
async fn test_three_correct_two_wrong_is_good_effort() {
    let source = StubSource::new();
    let mut assessment = Assessment::new(SubmitPolicy::Strict);

    assert!(assessment.start(&source, Difficulty::Mid).await);
    assert_eq!(assessment.phase(), AssessmentPhase::InProgress);
    assert_eq!(assessment.questions().len(), 5);

    let questions: Vec<Question> = assessment.questions().to_vec();
    for (i, q) in questions.iter().enumerate() {
        let choice = if i < 3 {
            q.correct_index
        } else {
            (q.correct_index + 1) % 4
        };
        assessment.select_for(&q.id, choice).unwrap();
    }
    assessment.submit().unwrap();
    assert_eq!(assessment.phase(), AssessmentPhase::Completed);

    let report = assessment.report().unwrap();
    assert_eq!(report.correct_count, 3);
    assert_eq!(report.total_count, 5);
    assert_eq!(report.percentage, 60);
    assert_eq!(report.grade(), Grade::GoodEffort);
    assert_eq!(report.grade().label(), "Good Effort");
}

#[tokio::test]
async fn test_lenient_partial_submit_marks_skipped() {
    let source = StubSource::new();
    let mut assessment = Assessment::new(SubmitPolicy::Lenient);
    assessment.start(&source, Difficulty::Junior).await;

    let questions: Vec<Question> = assessment.questions().to_vec();
    for q in questions.iter().take(3) {
        assessment.select_for(&q.id, q.correct_index).unwrap();
    }
    assessment.submit().unwrap();

    let report = assessment.report().unwrap();
    assert_eq!(report.correct_count, 3);
    assert_eq!(report.percentage, 60);
    let skipped: Vec<bool> = report.results.iter().map(|r| r.is_skipped).collect();
    assert_eq!(skipped, vec![false, false, false, true, true]);
    assert!(report.results[3..].iter().all(|r| !r.is_correct && r.selected_index.is_none()));
}

#[tokio::test]
async fn test_strict_partial_submit_is_rejected() {
    let source = StubSource::new();
    let mut assessment = Assessment::new(SubmitPolicy::Strict);
    assessment.start(&source, Difficulty::Senior).await;
    assessment.select(0).unwrap();

    assert_eq!(
        assessment.submit(),
        Err(AssessmentError::IncompleteSubmission {
            answered: 1,
            total: 5
        })
    );
    assert_eq!(assessment.phase(), AssessmentPhase::InProgress);
}

#[tokio::test]
async fn test_retry_after_completed_resets_session() {
    let source = StubSource::new();
    let mut assessment = Assessment::new(SubmitPolicy::Lenient);

    for _ in 0..2 {
        assessment.start(&source, Difficulty::Mid).await;
        assessment.select(2).unwrap();
        assessment.submit().unwrap();
        assessment.retry().unwrap();

        assert_eq!(assessment.phase(), AssessmentPhase::Idle);
        assert!(assessment.questions().is_empty());
        assert!(assessment.answers().is_none());
    }
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_start_while_loading_is_ignored() {
    let source = StubSource::new();
    let mut assessment = Assessment::default();

    assert_eq!(assessment.begin(Difficulty::Senior), Some(Difficulty::Senior));
    assert!(!assessment.start(&source, Difficulty::Junior).await);
    assert_eq!(source.calls(), 0);
    assert_eq!(assessment.phase(), AssessmentPhase::Loading);
    assert_eq!(assessment.difficulty(), Some(Difficulty::Senior));

    assessment.finish_loading(source.generate(Difficulty::Senior).await);
    assert_eq!(assessment.phase(), AssessmentPhase::InProgress);
    assert!(!assessment.start(&source, Difficulty::Junior).await);
    assert_eq!(source.calls(), 1);
}
