//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整转换流程
//!
//! 流程顺序：
//! 1. 清理题干 → 询问标题（留空跳过）
//! 2. 创建题目目录 → 写 info.json
//! 3. 下载图片 → 渲染 question.html / server.py
//! 4. 降级情况提醒操作员并写入 warn.txt

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::infrastructure::{create_unique_dir, write_json, write_text};
use crate::models::{Alternative, QuestionInfo};
use crate::operator::{Operator, QuestionPreview};
use crate::services::{
    clean_question_text, extract_images, file_name_only, render, AssetFetcher, PlacedQuestion,
    WarnWriter,
};
use crate::utils::truncate_text;
use crate::workflow::question_ctx::QuestionCtx;

/// 题目处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 已转换，返回评测中的题目引用
    Converted {
        alternative: Alternative,
        /// 有降级输出，需要人工复查
        flagged: bool,
    },
    /// 操作员跳过
    Skipped,
}

/// 题目处理流程
///
/// - 编排单道题的转换步骤
/// - 不持有网络资源，只依赖下载能力
/// - 操作员交互通过 `Operator` 注入
pub struct QuestionFlow<'a, F: AssetFetcher> {
    fetcher: &'a F,
    warn_writer: WarnWriter,
}

impl<'a, F: AssetFetcher> QuestionFlow<'a, F> {
    /// 创建新的题目处理流程
    pub fn new(fetcher: &'a F, warn_writer: WarnWriter) -> Self {
        Self {
            fetcher,
            warn_writer,
        }
    }

    pub async fn run<O: Operator>(
        &self,
        operator: &mut O,
        question: &PlacedQuestion,
        ctx: &QuestionCtx,
    ) -> Result<ProcessResult> {
        let record = &question.record;
        let text = clean_question_text(&record.question_text);
        debug!("{} 题目 {} ({}): {}", ctx, record.id, record.question_type, truncate_text(&text, 60));

        let preview = QuestionPreview {
            question_id: record.id,
            text: &text,
            answers: record.answers.iter().map(|a| a.text.as_str()).collect(),
        };
        let Some(title) = operator.question_title(&preview)? else {
            info!("{} ⏭️ 跳过题目 {}", ctx, record.id);
            return Ok(ProcessResult::Skipped);
        };

        let (question_slug, question_dir) =
            create_unique_dir(&ctx.questions_dir, &file_name_only(&title))?;
        info!("{} 📁 题目 {} → {}", ctx, record.id, question_slug);

        let body = extract_images(self.fetcher, &question_dir, &text)
            .await
            .with_context(|| format!("题目 {} 的图片下载失败", record.id))?;
        let rendered = render(record, &body);

        for notice in &rendered.notices {
            let message = notice.to_string();
            warn!("{} ⚠️ 题目 {}: {}", ctx, record.id, message);
            operator.acknowledge(&message)?;
            self.warn_writer
                .write(ctx.quiz_id, record.id, &message)
                .with_context(|| format!("无法写入 {}", self.warn_writer.path()))?;
        }

        let info_json = QuestionInfo::new(&title, &ctx.topic, rendered.manual_grading);
        write_json(&question_dir.join("info.json"), &info_json)?;
        write_text(&question_dir.join("question.html"), &rendered.html)?;
        if let Some(script) = &rendered.server_script {
            write_text(&question_dir.join("server.py"), script)?;
        }

        Ok(ProcessResult::Converted {
            alternative: Alternative {
                id: format!("{}/{}", ctx.quiz_slug, question_slug),
                points: question.points,
            },
            flagged: !rendered.notices.is_empty(),
        })
    }
}
