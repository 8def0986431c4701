//! # TechPrep
//!
//! 技术面试模拟测评：按难度生成一批单选题，收集作答并评分
//!
//! ## 架构设计
//!
//! ### ① 数据模型（Models）
//! - `models/` - 题目、难度、作答记录、测评阶段
//!
//! ### ② 业务能力层（Services）
//! - `LlmService` - 在线出题能力（OpenAI 兼容接口）
//! - `QuestionBank` - 带兜底的题库，对外永不失败
//! - `scorer` - 评分纯函数和等级划分
//!
//! ### ③ 流程层（Workflow）
//! - `Assessment` - 测评状态机，唯一的数据来源
//! - `AnswerCollector` - 答题阶段的作答收集和导航
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 终端界面，把输入翻译成意图并渲染当前阶段
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, AssessmentError};
pub use models::{AnswerMap, AssessmentPhase, Difficulty, Question};
pub use orchestrator::App;
pub use services::{score, Grade, QuestionBank, QuestionSource, ScoreReport};
pub use workflow::{Assessment, SubmitPolicy};
