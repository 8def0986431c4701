//! 出题服务 - 业务能力层
//!
//! 对外承诺：永远返回一批可用的题目。在线出题的任何失败
//! （网络、超时、JSON 不合法、缺少 API Key）都在内部收敛为内置题库

use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, LlmError};
use crate::models::{Difficulty, Question, RawQuestion};
use crate::services::fallback::fallback_questions;
use crate::services::llm_service::LlmService;
use crate::utils::truncate_text;

/// 题目来源
///
/// 签名上不可失败，状态机只依赖这一能力
#[allow(async_fn_in_trait)]
pub trait QuestionSource {
    async fn generate(&self, difficulty: Difficulty) -> Vec<Question>;
}

/// 在线出题能力（可失败）
#[allow(async_fn_in_trait)]
pub trait QuestionGenerator {
    async fn generate_questions(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> AppResult<Vec<RawQuestion>>;
}

/// 带兜底的题库
pub struct QuestionBank<G> {
    /// `None` 表示未配置 API Key
    generator: Option<G>,
    question_count: usize,
    max_attempts: usize,
    timeout: Duration,
}

impl QuestionBank<LlmService> {
    /// 按配置创建题库，未配置 API Key 时只使用内置题库
    pub fn from_config(config: &Config) -> Self {
        Self::new(LlmService::from_config(config), config)
    }
}

impl<G: QuestionGenerator> QuestionBank<G> {
    pub fn new(generator: Option<G>, config: &Config) -> Self {
        Self {
            generator,
            question_count: config.question_count.max(1),
            max_attempts: config.llm_max_attempts.max(1),
            timeout: config.llm_timeout(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.generator.is_some()
    }

    /// 单次在线出题：请求 → 校验数量 → 逐题校验并分配 ID
    async fn try_generate(&self, generator: &G, difficulty: Difficulty) -> AppResult<Vec<Question>> {
        let raw = tokio::time::timeout(
            self.timeout,
            generator.generate_questions(difficulty, self.question_count),
        )
        .await
        .map_err(|_| LlmError::Timeout {
            secs: self.timeout.as_secs(),
        })??;

        if raw.len() != self.question_count {
            return Err(LlmError::WrongBatchSize {
                expected: self.question_count,
                actual: raw.len(),
            }
            .into());
        }

        let stamp = chrono::Utc::now().timestamp_millis();
        let questions = raw
            .into_iter()
            .enumerate()
            .map(|(index, q)| q.into_question(format!("gen-{}-{}", stamp, index), index + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(questions)
    }
}

impl<G: QuestionGenerator> QuestionSource for QuestionBank<G> {
    async fn generate(&self, difficulty: Difficulty) -> Vec<Question> {
        let Some(generator) = &self.generator else {
            warn!("⚠️ 未配置 API Key，使用内置题库");
            return fallback_questions();
        };

        for attempt in 1..=self.max_attempts {
            info!(
                "🤖 正在生成 {} 道 {} 题目 (第 {}/{} 次)",
                self.question_count, difficulty, attempt, self.max_attempts
            );

            match self.try_generate(generator, difficulty).await {
                Ok(questions) => {
                    info!("✓ 在线出题成功，共 {} 道", questions.len());
                    for q in &questions {
                        info!("  [{}] {}", q.topic, truncate_text(&q.question_text, 60));
                    }
                    return questions;
                }
                Err(e) => {
                    warn!("⚠️ 第 {} 次出题失败: {}", attempt, e);
                }
            }
        }

        error!(
            "❌ 在线出题失败 (已尝试 {} 次)，使用内置题库",
            self.max_attempts
        );
        fallback_questions()
    }
}
