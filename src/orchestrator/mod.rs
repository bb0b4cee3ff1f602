//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次导入的流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 检查目标仓库、创建 Canvas 客户端
//! - 选择课程与测验
//! - 拉取题目、查询题组、整理顺序
//! - 输出全局统计信息
//!
//! ### `quiz_processor` - 单个测验处理器
//! - 准备题目目录与评测目录
//! - 遍历题目（`Vec<PlacedQuestion>`），复用同一个 QuestionFlow
//! - 组装并写出 `infoAssessment.json`
//!
//! ## 层次关系
//!
//! ```text
//! app (课程 / 测验选择)
//!     ↓
//! quiz_processor (处理 Vec<PlacedQuestion>)
//!     ↓
//! workflow::QuestionFlow (处理单道题)
//!     ↓
//! services (能力层：sanitize / images / render / assemble / warn)
//!     ↓
//! infrastructure (基础设施：OutputTree)
//! ```

pub mod app;
pub mod quiz_processor;

// 重新导出主要类型
pub use app::{App, Selection};
pub use quiz_processor::{process_quiz, ImportOptions, QuestionStats, QuizOutcome};
