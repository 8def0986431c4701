use thiserror::Error;

use crate::models::AssessmentPhase;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 测评流程错误
    #[error("测评错误: {0}")]
    Assessment(#[from] AssessmentError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求超时
    #[error("LLM 请求超时 ({secs}秒)")]
    Timeout { secs: u64 },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// JSON 解析失败
    #[error("无法解析LLM返回的题目 JSON: {source}")]
    JsonParseFailed {
        #[source]
        source: serde_json::Error,
    },
    /// 题目数量不符
    #[error("LLM返回 {actual} 道题目，期望 {expected} 道")]
    WrongBatchSize { expected: usize, actual: usize },
    /// 单道题目不满足结构约束
    #[error("第 {position} 道题目不合法: {reason}")]
    InvalidQuestion { position: usize, reason: String },
}

/// 测评流程错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    /// 当前阶段不允许该操作
    #[error("当前阶段 {phase} 不允许操作: {action}")]
    InvalidTransition {
        phase: AssessmentPhase,
        action: &'static str,
    },
    /// 严格模式下存在未作答题目
    #[error("还有题目未作答: 已答 {answered}/{total}")]
    IncompleteSubmission { answered: usize, total: usize },
    /// 题目 ID 不属于当前批次
    #[error("题目不存在: {question_id}")]
    UnknownQuestion { question_id: String },
    /// 选项索引超出范围
    #[error("选项索引 {index} 超出范围 [0, {max_index}]")]
    OptionOutOfRange { index: usize, max_index: usize },
    /// 题目索引超出范围
    #[error("题目索引 {index} 超出范围 [0, {max_index}]")]
    QuestionOutOfRange { index: usize, max_index: usize },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Llm(LlmError::JsonParseFailed { source: err })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建非法阶段转换错误
    pub fn invalid_transition(phase: AssessmentPhase, action: &'static str) -> Self {
        AppError::Assessment(AssessmentError::InvalidTransition { phase, action })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
