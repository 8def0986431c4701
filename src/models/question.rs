use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// 每道题固定的选项数量
pub const OPTION_COUNT: usize = 4;

/// 单选题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// 批次内唯一的题目 ID
    pub id: String,
    pub question_text: String,
    /// 恰好 4 个互不相同的选项
    pub options: Vec<String>,
    /// 正确选项索引（0-based）
    pub correct_index: usize,
    pub topic: String,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        question_text: impl Into<String>,
        options: [&str; OPTION_COUNT],
        correct_index: usize,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question_text: question_text.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_index,
            topic: topic.into(),
        }
    }

    /// 获取正确选项的文本
    pub fn correct_option(&self) -> &str {
        self.options
            .get(self.correct_index)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// LLM 返回的题目结构（不带 ID）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub topic: String,
}

impl RawQuestion {
    /// 校验结构约束，失败时返回原因
    pub fn validate(&self) -> Result<(), String> {
        if self.question_text.trim().is_empty() {
            return Err("题干为空".to_string());
        }
        if self.options.len() != OPTION_COUNT {
            return Err(format!(
                "选项数量为 {}，必须为 {}",
                self.options.len(),
                OPTION_COUNT
            ));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err("存在空选项".to_string());
        }
        for (i, option) in self.options.iter().enumerate() {
            if self.options[i + 1..].contains(option) {
                return Err(format!("选项重复: {}", option));
            }
        }
        if self.correct_index >= self.options.len() {
            return Err(format!(
                "正确答案索引 {} 超出范围 [0, {}]",
                self.correct_index,
                self.options.len() - 1
            ));
        }
        Ok(())
    }

    /// 校验并分配 ID
    ///
    /// `position` 仅用于错误信息（1-based）
    pub fn into_question(self, id: String, position: usize) -> Result<Question, LlmError> {
        self.validate()
            .map_err(|reason| LlmError::InvalidQuestion { position, reason })?;

        Ok(Question {
            id,
            question_text: self.question_text,
            options: self.options,
            correct_index: self.correct_index,
            topic: self.topic,
        })
    }
}
