//! 单个测验处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责把一个已整理好顺序的测验转换为 PrairieLearn 评测。
//!
//! ## 核心功能
//!
//! 1. **准备目录**：`questions/<测验>` 与不重名的评测目录
//! 2. **遍历题目**：按最终位置依次交给 `QuestionFlow`
//! 3. **组装评测**：题组成员合并为备选题池
//! 4. **写出评测**：`infoAssessment.json`
//! 5. **统计输出**：记录转换/跳过/需复查数量

use crate::infrastructure::{create_unique_dir, write_json, OutputTree};
use crate::models::QuizRecord;
use crate::operator::Operator;
use crate::services::{
    file_name_only, AssessmentAssembler, AssessmentSettings, AssetFetcher, Reconciled, WarnWriter,
};
use crate::workflow::{ProcessResult, QuestionCtx, QuestionFlow};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// 评测文件名
pub const ASSESSMENT_FILE: &str = "infoAssessment.json";

/// 导入选项（来自命令行）
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// 目标课程实例
    pub course_instance: String,
    /// 写入每道题 info.json 的主题
    pub topic: String,
    pub settings: AssessmentSettings,
}

/// 题目处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QuestionStats {
    pub converted: usize,
    pub skipped: usize,
    /// 有降级输出的题目
    pub flagged: usize,
}

/// 测验处理结果
#[derive(Debug)]
pub struct QuizOutcome {
    /// 评测目录
    pub assessment_dir: PathBuf,
    pub stats: QuestionStats,
}

/// 处理单个测验
///
/// # 参数
/// - `tree`: 输出的 PrairieLearn 仓库
/// - `fetcher`: 图片下载能力
/// - `operator`: 操作员
/// - `warn_writer`: 降级记录
/// - `quiz`: Canvas 测验
/// - `reconciled`: 已整理顺序的题目与题组
/// - `options`: 导入选项
pub async fn process_quiz<F: AssetFetcher, O: Operator>(
    tree: &OutputTree,
    fetcher: &F,
    operator: &mut O,
    warn_writer: WarnWriter,
    quiz: &QuizRecord,
    reconciled: &Reconciled,
    options: &ImportOptions,
) -> Result<QuizOutcome> {
    let quiz_slug = file_name_only(&quiz.title);
    let questions_dir = tree.questions_dir(&quiz_slug)?;
    let assessments_dir = tree.assessments_dir(&options.course_instance)?;
    let (assessment_name, assessment_dir) = create_unique_dir(&assessments_dir, &quiz_slug)?;

    log_quiz_start(quiz, &assessment_name, reconciled);

    let flow = QuestionFlow::new(fetcher, warn_writer);
    let base_ctx = QuestionCtx::new(
        quiz.id,
        quiz_slug,
        questions_dir,
        options.topic.clone(),
        reconciled.questions.len(),
    );
    let mut assembler = AssessmentAssembler::new();
    let mut stats = QuestionStats::default();

    // ========== 按最终位置遍历题目 ==========
    for (index, question) in reconciled.questions.iter().enumerate() {
        let ctx = base_ctx.at(index + 1);

        match flow.run(operator, question, &ctx).await? {
            ProcessResult::Converted {
                alternative,
                flagged,
            } => {
                let group = question.group_id.and_then(|id| reconciled.group(id));
                assembler.push(alternative, group);
                stats.converted += 1;
                if flagged {
                    stats.flagged += 1;
                }
            }
            ProcessResult::Skipped => {
                stats.skipped += 1;
            }
        }
    }

    let assessment = assembler.finish(quiz, &options.settings);
    write_json(&assessment_dir.join(ASSESSMENT_FILE), &assessment)?;

    log_quiz_complete(&stats, reconciled.questions.len());

    Ok(QuizOutcome {
        assessment_dir,
        stats,
    })
}

// ========== 日志辅助函数 ==========

fn log_quiz_start(quiz: &QuizRecord, assessment_name: &str, reconciled: &Reconciled) {
    info!("[测验 {}] 开始转换", quiz.id);
    info!("[测验 {}] 名称: {}", quiz.id, quiz.title);
    info!("[测验 {}] 评测目录: {}", quiz.id, assessment_name);
    info!(
        "[测验 {}] 题目总数: {}，题组: {}",
        quiz.id,
        reconciled.questions.len(),
        reconciled.groups.len()
    );
}

fn log_quiz_complete(stats: &QuestionStats, total: usize) {
    info!(
        "题目统计: 转换 {}, 跳过 {}, 需复查 {}, 总计 {}",
        stats.converted, stats.skipped, stats.flagged, total
    );
}
