//! 作答收集器
//!
//! 只在 InProgress 阶段存在，由状态机持有

use tracing::debug;

use crate::error::AssessmentError;
use crate::models::{AnswerMap, Question, OPTION_COUNT};

/// 提交策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// 全部作答后才允许提交
    #[default]
    Strict,
    /// 允许部分提交，未作答按错误计
    Lenient,
}

/// 作答收集器：作答记录 + 当前题目游标
#[derive(Debug, Clone)]
pub struct AnswerCollector {
    question_ids: Vec<String>,
    answers: AnswerMap,
    cursor: usize,
    policy: SubmitPolicy,
}

impl AnswerCollector {
    pub fn new(questions: &[Question], policy: SubmitPolicy) -> Self {
        Self {
            question_ids: questions.iter().map(|q| q.id.clone()).collect(),
            answers: AnswerMap::new(),
            cursor: 0,
            policy,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn total(&self) -> usize {
        self.question_ids.len()
    }

    pub fn answered_count(&self) -> usize {
        self.question_ids
            .iter()
            .filter(|id| self.answers.is_answered(id))
            .count()
    }

    pub fn current_question_id(&self) -> Option<&str> {
        self.question_ids.get(self.cursor).map(String::as_str)
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.question_ids.len()
    }

    /// 为指定题目记录选择（后写覆盖）
    pub fn select(&mut self, question_id: &str, option_index: usize) -> Result<(), AssessmentError> {
        if option_index >= OPTION_COUNT {
            return Err(AssessmentError::OptionOutOfRange {
                index: option_index,
                max_index: OPTION_COUNT - 1,
            });
        }
        if !self.question_ids.iter().any(|id| id == question_id) {
            return Err(AssessmentError::UnknownQuestion {
                question_id: question_id.to_string(),
            });
        }

        debug!("记录作答: {} → {}", question_id, option_index);
        self.answers.record(question_id, option_index);
        Ok(())
    }

    /// 为当前题目记录选择
    pub fn select_current(&mut self, option_index: usize) -> Result<(), AssessmentError> {
        let id = self
            .current_question_id()
            .map(str::to_string)
            .ok_or(AssessmentError::QuestionOutOfRange {
                index: self.cursor,
                max_index: 0,
            })?;
        self.select(&id, option_index)
    }

    /// 下一题，到末尾时停住
    pub fn next(&mut self) {
        if !self.is_last() {
            self.cursor += 1;
        }
    }

    /// 上一题，到开头时停住
    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// 跳到指定题目（0-based）
    pub fn jump(&mut self, index: usize) -> Result<(), AssessmentError> {
        if index >= self.question_ids.len() {
            return Err(AssessmentError::QuestionOutOfRange {
                index,
                max_index: self.question_ids.len().saturating_sub(1),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// 提交按钮是否可用
    pub fn can_submit(&self) -> bool {
        match self.policy {
            SubmitPolicy::Strict => self.answered_count() == self.total(),
            SubmitPolicy::Lenient => true,
        }
    }

    /// 校验提交条件并冻结作答记录
    pub fn into_answers(self) -> Result<AnswerMap, (Self, AssessmentError)> {
        if !self.can_submit() {
            let err = AssessmentError::IncompleteSubmission {
                answered: self.answered_count(),
                total: self.total(),
            };
            return Err((self, err));
        }
        Ok(self.answers)
    }
}
