//! 操作员交互
//!
//! 流程只依赖 `Operator` 这个能力：终端下由 `TerminalOperator` 实现，
//! 测试中可以换成预先写好回答的实现。

pub mod terminal;

pub use terminal::TerminalOperator;

use anyhow::Result;

/// 展示给操作员的题目
#[derive(Debug, Clone)]
pub struct QuestionPreview<'a> {
    pub question_id: u64,
    /// 已清理的题干
    pub text: &'a str,
    pub answers: Vec<&'a str>,
}

/// 操作员能力
pub trait Operator {
    /// 询问题目标题，空标题表示跳过该题
    fn question_title(&mut self, preview: &QuestionPreview<'_>) -> Result<Option<String>>;

    /// 提示降级情况，等待操作员确认后继续
    fn acknowledge(&mut self, message: &str) -> Result<()>;

    /// 从列表中选择一项，返回索引
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize>;
}

/// 把标题输入规范化：去掉首尾空白，空字符串视为跳过
pub fn normalize_title(input: &str) -> Option<String> {
    let title = input.trim();
    (!title.is_empty()).then(|| title.to_string())
}
