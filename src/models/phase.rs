use std::fmt;

/// 测评阶段（不带数据的判别值，用于渲染和日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssessmentPhase {
    Idle,
    Loading,
    InProgress,
    Completed,
    Error,
}

impl AssessmentPhase {
    pub fn name(self) -> &'static str {
        match self {
            AssessmentPhase::Idle => "IDLE",
            AssessmentPhase::Loading => "LOADING",
            AssessmentPhase::InProgress => "IN_PROGRESS",
            AssessmentPhase::Completed => "COMPLETED",
            AssessmentPhase::Error => "ERROR",
        }
    }
}

impl fmt::Display for AssessmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
