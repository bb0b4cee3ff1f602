use super::{normalize_title, Operator, QuestionPreview};
use anyhow::Result;
use dialoguer::{Input, Select};

/// 终端交互
pub struct TerminalOperator {
    clear_screen: bool,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self { clear_screen: true }
    }

    /// 不清屏（便于保留滚动记录）
    pub fn without_clear(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn clears_screen(&self) -> bool {
        self.clear_screen
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for TerminalOperator {
    fn question_title(&mut self, preview: &QuestionPreview<'_>) -> Result<Option<String>> {
        if self.clear_screen {
            print!("\x1bc");
        }
        println!("正在处理题目 {}...", preview.question_id);
        println!("{}", preview.text);
        println!();
        for answer in &preview.answers {
            println!(" - {}", answer);
        }
        println!();

        let input: String = Input::new()
            .with_prompt("题目标题（留空跳过）")
            .allow_empty(true)
            .interact_text()?;
        Ok(normalize_title(&input))
    }

    fn acknowledge(&mut self, message: &str) -> Result<()> {
        let _: String = Input::new()
            .with_prompt(format!("{}（按回车继续）", message))
            .allow_empty(true)
            .interact_text()?;
        Ok(())
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        let selection = Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?;
        Ok(selection)
    }
}
