//! 测评状态机 - 流程层
//!
//! 核心职责：持有当前阶段和阶段内的全部数据，是唯一的数据来源
//!
//! 阶段流转：
//! 1. Idle → (begin) → Loading
//! 2. Loading → (finish_loading) → InProgress，空批次进入 Error
//! 3. InProgress → (submit) → Completed
//! 4. Completed / Error → (retry) → Idle

use tracing::{error, info, warn};

use crate::error::AssessmentError;
use crate::models::{AnswerMap, AssessmentPhase, Difficulty, Question};
use crate::services::{score, QuestionSource, ScoreReport};
use crate::workflow::answer_collector::{AnswerCollector, SubmitPolicy};

/// 阶段及其数据
///
/// 每个阶段只携带该阶段合法的数据
#[derive(Debug, Clone)]
pub enum Phase {
    Idle,
    Loading {
        difficulty: Difficulty,
    },
    InProgress {
        difficulty: Difficulty,
        questions: Vec<Question>,
        collector: AnswerCollector,
    },
    Completed {
        difficulty: Difficulty,
        questions: Vec<Question>,
        answers: AnswerMap,
    },
    Error {
        reason: String,
    },
}

impl Phase {
    pub fn kind(&self) -> AssessmentPhase {
        match self {
            Phase::Idle => AssessmentPhase::Idle,
            Phase::Loading { .. } => AssessmentPhase::Loading,
            Phase::InProgress { .. } => AssessmentPhase::InProgress,
            Phase::Completed { .. } => AssessmentPhase::Completed,
            Phase::Error { .. } => AssessmentPhase::Error,
        }
    }
}

/// 答题进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 当前题号（1-based）
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    /// 进度百分比（按题号）
    pub percent: u32,
}

/// 测评会话
#[derive(Debug, Clone)]
pub struct Assessment {
    phase: Phase,
    policy: SubmitPolicy,
}

impl Default for Assessment {
    fn default() -> Self {
        Self::new(SubmitPolicy::default())
    }
}

impl Assessment {
    pub fn new(policy: SubmitPolicy) -> Self {
        Self {
            phase: Phase::Idle,
            policy,
        }
    }

    pub fn phase(&self) -> AssessmentPhase {
        self.phase.kind()
    }

    pub fn state(&self) -> &Phase {
        &self.phase
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match &self.phase {
            Phase::Loading { difficulty }
            | Phase::InProgress { difficulty, .. }
            | Phase::Completed { difficulty, .. } => Some(*difficulty),
            Phase::Idle | Phase::Error { .. } => None,
        }
    }

    /// 当前批次题目，生成完成前为空
    pub fn questions(&self) -> &[Question] {
        match &self.phase {
            Phase::InProgress { questions, .. } | Phase::Completed { questions, .. } => questions,
            _ => &[],
        }
    }

    /// 当前作答记录
    pub fn answers(&self) -> Option<&AnswerMap> {
        match &self.phase {
            Phase::InProgress { collector, .. } => Some(collector.answers()),
            Phase::Completed { answers, .. } => Some(answers),
            _ => None,
        }
    }

    pub fn collector(&self) -> Option<&AnswerCollector> {
        match &self.phase {
            Phase::InProgress { collector, .. } => Some(collector),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            Phase::InProgress {
                questions,
                collector,
                ..
            } => questions.get(collector.cursor()),
            _ => None,
        }
    }

    pub fn progress(&self) -> Option<Progress> {
        let collector = self.collector()?;
        let total = collector.total();
        let current = collector.cursor() + 1;
        Some(Progress {
            current,
            total,
            answered: collector.answered_count(),
            percent: ((current * 200 + total) / (total.max(1) * 2)) as u32,
        })
    }

    // ========== 阶段转换 ==========

    /// Idle → Loading
    ///
    /// 其他阶段下为空操作并返回 `None`，防止重复发起出题请求
    pub fn begin(&mut self, difficulty: Difficulty) -> Option<Difficulty> {
        if !matches!(self.phase, Phase::Idle) {
            warn!("⚠️ 当前阶段 {} 忽略开始请求", self.phase());
            return None;
        }

        info!("📝 开始测评，难度: {}", difficulty);
        self.phase = Phase::Loading { difficulty };
        Some(difficulty)
    }

    /// Loading → InProgress（空批次进入 Error）
    pub fn finish_loading(&mut self, questions: Vec<Question>) {
        let Phase::Loading { difficulty } = self.phase else {
            warn!("⚠️ 当前阶段 {} 忽略出题结果", self.phase());
            return;
        };

        if questions.is_empty() {
            self.fail_loading("题目生成结果为空");
            return;
        }

        info!("✓ 题目已就绪，共 {} 道", questions.len());
        let collector = AnswerCollector::new(&questions, self.policy);
        self.phase = Phase::InProgress {
            difficulty,
            questions,
            collector,
        };
    }

    /// Loading → Error
    pub fn fail_loading(&mut self, reason: impl Into<String>) {
        if !matches!(self.phase, Phase::Loading { .. }) {
            return;
        }
        let reason = reason.into();
        error!("❌ 测评初始化失败: {}", reason);
        self.phase = Phase::Error { reason };
    }

    /// 开始测评：begin → 出题 → finish_loading
    ///
    /// 返回是否真正发起了出题请求
    pub async fn start<S: QuestionSource>(&mut self, source: &S, difficulty: Difficulty) -> bool {
        let Some(difficulty) = self.begin(difficulty) else {
            return false;
        };
        let questions = source.generate(difficulty).await;
        self.finish_loading(questions);
        true
    }

    fn collector_mut(&mut self, action: &'static str) -> Result<&mut AnswerCollector, AssessmentError> {
        let phase = self.phase();
        match &mut self.phase {
            Phase::InProgress { collector, .. } => Ok(collector),
            _ => Err(AssessmentError::InvalidTransition { phase, action }),
        }
    }

    /// 为当前题目选择选项
    pub fn select(&mut self, option_index: usize) -> Result<(), AssessmentError> {
        self.collector_mut("select")?.select_current(option_index)
    }

    /// 为指定题目选择选项
    pub fn select_for(&mut self, question_id: &str, option_index: usize) -> Result<(), AssessmentError> {
        self.collector_mut("select")?.select(question_id, option_index)
    }

    pub fn next(&mut self) -> Result<(), AssessmentError> {
        self.collector_mut("next")?.next();
        Ok(())
    }

    pub fn prev(&mut self) -> Result<(), AssessmentError> {
        self.collector_mut("prev")?.prev();
        Ok(())
    }

    /// 跳到指定题目（0-based）
    pub fn jump(&mut self, index: usize) -> Result<(), AssessmentError> {
        self.collector_mut("jump")?.jump(index)
    }

    /// InProgress → Completed
    ///
    /// 严格模式下未全部作答时拒绝，阶段保持不变
    pub fn submit(&mut self) -> Result<(), AssessmentError> {
        let (difficulty, questions, collector) =
            match std::mem::replace(&mut self.phase, Phase::Idle) {
                Phase::InProgress {
                    difficulty,
                    questions,
                    collector,
                } => (difficulty, questions, collector),
                other => {
                    let phase = other.kind();
                    self.phase = other;
                    return Err(AssessmentError::InvalidTransition {
                        phase,
                        action: "submit",
                    });
                }
            };

        match collector.into_answers() {
            Ok(answers) => {
                info!(
                    "📤 提交答卷: 已答 {}/{}",
                    answers.len().min(questions.len()),
                    questions.len()
                );
                self.phase = Phase::Completed {
                    difficulty,
                    questions,
                    answers,
                };
                Ok(())
            }
            Err((collector, err)) => {
                warn!("⚠️ 拒绝提交: {}", err);
                self.phase = Phase::InProgress {
                    difficulty,
                    questions,
                    collector,
                };
                Err(err)
            }
        }
    }

    /// Completed / Error → Idle，丢弃题目和作答
    pub fn retry(&mut self) -> Result<(), AssessmentError> {
        match self.phase {
            Phase::Completed { .. } | Phase::Error { .. } | Phase::Idle => {
                info!("🔄 返回首页");
                self.phase = Phase::Idle;
                Ok(())
            }
            _ => Err(AssessmentError::InvalidTransition {
                phase: self.phase(),
                action: "retry",
            }),
        }
    }

    /// 成绩单，仅 Completed 阶段可用
    pub fn report(&self) -> Option<ScoreReport> {
        match &self.phase {
            Phase::Completed {
                questions, answers, ..
            } => Some(score(questions, answers)),
            _ => None,
        }
    }
}
