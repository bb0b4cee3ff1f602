//! 输出目录 - 基础设施层
//!
//! 持有 PrairieLearn 仓库根目录，只暴露"建目录、写文件"的能力

use crate::error::{AppError, AppResult, BusinessError};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// PrairieLearn 仓库的标记文件
pub const COURSE_MARKER: &str = "infoCourse.json";

/// 输出目录
///
/// 职责：
/// - 校验目标目录是 PrairieLearn 仓库
/// - 创建不重名的题目 / 评测目录
/// - 不认识 Canvas 的题目
pub struct OutputTree {
    root: PathBuf,
}

impl OutputTree {
    /// 打开 PrairieLearn 仓库，缺少 `infoCourse.json` 时报错
    pub fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        if !root.join(COURSE_MARKER).is_file() {
            return Err(BusinessError::NotPrairieLearnRepo {
                path: root.display().to_string(),
            }
            .into());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `questions/<quiz>`，不存在时创建
    pub fn questions_dir(&self, quiz_slug: &str) -> AppResult<PathBuf> {
        let dir = self.root.join("questions").join(quiz_slug);
        ensure_dir(&dir)?;
        Ok(dir)
    }

    /// `courseInstances/<instance>/assessments`，不存在时创建
    pub fn assessments_dir(&self, course_instance: &str) -> AppResult<PathBuf> {
        let dir = self
            .root
            .join("courseInstances")
            .join(course_instance)
            .join("assessments");
        ensure_dir(&dir)?;
        Ok(dir)
    }
}

/// 创建目录（含父目录），已存在时不做处理
pub fn ensure_dir(dir: &Path) -> AppResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| AppError::create_dir_failed(dir.display().to_string(), e))
}

/// 在 `parent` 下创建一个不重名的目录
///
/// 依次尝试 `base`、`base_1`、`base_2`……
///
/// # 返回
/// 返回 (实际目录名, 目录路径)
pub fn create_unique_dir(parent: &Path, base: &str) -> AppResult<(String, PathBuf)> {
    let mut suffix = 0;
    loop {
        let name = if suffix == 0 {
            base.to_string()
        } else {
            format!("{}_{}", base, suffix)
        };
        let path = parent.join(&name);
        match std::fs::create_dir(&path) {
            Ok(()) => {
                debug!("创建目录: {}", path.display());
                return Ok((name, path));
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(AppError::create_dir_failed(path.display().to_string(), e)),
        }
    }
}

/// 写入格式化的 JSON（两格缩进）
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let content = serde_json::to_string_pretty(value)?;
    write_text(path, &content)
}

pub fn write_text(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|e| AppError::write_failed(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_requires_marker() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            OutputTree::open(dir.path()),
            Err(AppError::Business(BusinessError::NotPrairieLearnRepo { .. }))
        ));

        std::fs::write(dir.path().join(COURSE_MARKER), "{}").unwrap();
        assert!(OutputTree::open(dir.path()).is_ok());
    }

    #[test]
    fn test_unique_dir_suffixes() {
        let dir = tempfile::tempdir().unwrap();

        let (first, _) = create_unique_dir(dir.path(), "Ohm").unwrap();
        let (second, _) = create_unique_dir(dir.path(), "Ohm").unwrap();
        let (third, path) = create_unique_dir(dir.path(), "Ohm").unwrap();

        assert_eq!(first, "Ohm");
        assert_eq!(second, "Ohm_1");
        assert_eq!(third, "Ohm_2");
        assert!(path.is_dir());
    }

    #[test]
    fn test_layout_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(COURSE_MARKER), "{}").unwrap();
        let tree = OutputTree::open(dir.path()).unwrap();

        let questions = tree.questions_dir("Quiz1").unwrap();
        let assessments = tree.assessments_dir("Fall2024").unwrap();

        assert!(questions.ends_with("questions/Quiz1"));
        assert!(assessments.ends_with("courseInstances/Fall2024/assessments"));
        assert!(questions.is_dir() && assessments.is_dir());
    }
}
