//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 终端界面：读取用户输入，转交状态机，按阶段渲染界面。
//! 本层不做业务判断
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (终端输入 / 界面)
//!     ↓
//! workflow::Assessment (状态机 + 作答收集)
//!     ↓
//! services (能力层：出题 / 评分)
//! ```

pub mod app;
pub mod intent;
pub mod screens;

pub use app::{App, Flow};
pub use intent::Intent;
