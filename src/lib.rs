//! # Canvas Quiz Import
//!
//! 把 Canvas LMS 的测验转换为 PrairieLearn 评测的命令行工具
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有输出目录，只暴露能力
//! - `OutputTree` - PrairieLearn 仓库，负责不重名目录与文件写入
//!
//! ### ② 外部客户端（Clients）
//! - `clients/` - Canvas REST API：分页拉取、题组查询、图片下载
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单道题或单个测验
//! - `reconcile` - 题目与题组的顺序整理
//! - `extract_images` - 远程图片本地化
//! - `render` - 按题型生成 question.html / server.py
//! - `AssessmentAssembler` - 组装 infoAssessment.json
//! - `WarnWriter` - 写 warn.txt 能力
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整转换流程
//! - `QuestionCtx` - 上下文封装（测验 + 题目序号）
//! - `QuestionFlow` - 流程编排（标题 → 目录 → 图片 → 渲染 → warn）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/app` - 选择课程与测验，整理题目顺序
//! - `orchestrator/quiz_processor` - 单个测验处理器，遍历题目列表
//!
//! 操作员交互通过 `operator::Operator` 注入，终端实现基于 dialoguer。
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod operator;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use cli::Cli;
pub use clients::CanvasClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::OutputTree;
pub use operator::{Operator, TerminalOperator};
pub use orchestrator::{process_quiz, App, ImportOptions, Selection};
pub use workflow::{ProcessResult, QuestionCtx, QuestionFlow};
