//! 题目处理上下文
//!
//! 封装"我正在处理哪个测验的第几题"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 题目处理上下文
///
/// 包含处理单个题目所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// Canvas 测验 ID
    pub quiz_id: u64,

    /// 测验目录名，也是题目引用 id 的前缀
    pub quiz_slug: String,

    /// `questions/<quiz_slug>` 目录
    pub questions_dir: PathBuf,

    /// 题目在测验中的序号（从1开始）
    pub question_index: usize,

    /// 题目总数（仅用于日志显示）
    pub total: usize,

    /// 写入 info.json 的主题
    pub topic: String,
}

impl QuestionCtx {
    /// 创建新的题目上下文
    pub fn new(
        quiz_id: u64,
        quiz_slug: String,
        questions_dir: PathBuf,
        topic: String,
        total: usize,
    ) -> Self {
        Self {
            quiz_id,
            quiz_slug,
            questions_dir,
            question_index: 0,
            total,
            topic,
        }
    }

    /// 切换到第 `question_index` 道题
    pub fn at(&self, question_index: usize) -> Self {
        Self {
            question_index,
            ..self.clone()
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[测验 {} 题目 {}/{}]",
            self.quiz_slug, self.question_index, self.total
        )
    }
}
