use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 作答记录：题目 ID → 所选选项索引
///
/// 没有记录即视为跳过，与选择了第 0 项不同
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, usize>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录选择，覆盖同一题之前的选择
    pub fn record(&mut self, question_id: impl Into<String>, option_index: usize) {
        self.0.insert(question_id.into(), option_index);
    }

    pub fn get(&self, question_id: &str) -> Option<usize> {
        self.0.get(question_id).copied()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(id, idx)| (id.as_str(), *idx))
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_same_answer_twice_is_idempotent() {
        let mut answers = AnswerMap::new();
        answers.record("q1", 2);
        let snapshot = answers.clone();
        answers.record("q1", 2);
        assert_eq!(answers, snapshot);
    }

    #[test]
    fn test_record_overwrites_instead_of_appending() {
        let mut answers = AnswerMap::new();
        answers.record("q1", 2);
        answers.record("q1", 0);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get("q1"), Some(0));
    }

    #[test]
    fn test_missing_key_is_not_zero() {
        let answers: AnswerMap = [("q1", 0)].into_iter().collect();
        assert!(answers.is_answered("q1"));
        assert!(!answers.is_answered("q2"));
        assert_eq!(answers.get("q2"), None);
    }
}
