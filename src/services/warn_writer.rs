//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 警告写入服务
///
/// 降级输出的题目（不支持的题型等）记录到文件，便于导入后人工复查。
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 写入指定文件
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.warn_file_path
    }

    /// 写入警告信息
    ///
    /// # 参数
    /// - `quiz_id`: Canvas 测验 ID
    /// - `question_id`: Canvas 题目 ID
    /// - `reason`: 原因
    pub fn write(&self, quiz_id: u64, question_id: u64, reason: &str) -> Result<()> {
        debug!("写入警告: 测验 {} | 题目 {} | {}", quiz_id, question_id, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)?;

        let warn_msg = format!(
            "{} | 测验 {} | 题目 {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            quiz_id,
            question_id,
            reason
        );

        file.write_all(warn_msg.as_bytes())?;

        Ok(())
    }
}
