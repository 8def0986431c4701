//! 评分 - 纯函数，不持有状态

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::models::{AnswerMap, Question};

/// 成绩等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    Excellent,
    GoodEffort,
    NeedsImprovement,
}

impl Grade {
    /// ≥80 优秀，60–79 良好，<60 待提高
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => Grade::Excellent,
            60..=79 => Grade::GoodEffort,
            _ => Grade::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::GoodEffort => "Good Effort",
            Grade::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 单题判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub is_correct: bool,
    /// 未作答
    pub is_skipped: bool,
    pub selected_index: Option<usize>,
    pub correct_index: usize,
}

/// 成绩单
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub correct_count: usize,
    pub total_count: usize,
    /// 四舍五入后的百分比，0–100
    pub percentage: u32,
    pub results: Vec<QuestionResult>,
}

impl ScoreReport {
    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage)
    }

    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skipped).count()
    }
}

/// 计算成绩
///
/// 只看 `questions` 中出现的题目，`answers` 里多余的键被忽略。
/// 空批次的百分比记为 0
pub fn score(questions: &[Question], answers: &AnswerMap) -> ScoreReport {
    let results: Vec<QuestionResult> = questions
        .iter()
        .map(|q| {
            let selected_index = answers.get(&q.id);
            QuestionResult {
                question_id: q.id.clone(),
                is_correct: selected_index == Some(q.correct_index),
                is_skipped: selected_index.is_none(),
                selected_index,
                correct_index: q.correct_index,
            }
        })
        .collect();

    let correct_count = results.iter().filter(|r| r.is_correct).count();
    let total_count = questions.len();

    ScoreReport {
        correct_count,
        total_count,
        percentage: percentage(correct_count, total_count),
        results,
    }
}

/// 四舍五入（.5 向上）
fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        warn!("⚠️ 题目数量为 0，百分比记为 0");
        return 0;
    }
    ((correct * 200 + total) / (total * 2)) as u32
}
