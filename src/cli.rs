//! 命令行参数

use crate::models::AssessmentType;
use crate::operator::TerminalOperator;
use crate::orchestrator::{ImportOptions, Selection};
use crate::services::AssessmentSettings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "canvas-quiz-import")]
#[command(about = "把 Canvas 测验导入为 PrairieLearn 评测")]
pub struct Cli {
    /// PrairieLearn 课程仓库根目录（必须包含 infoCourse.json）
    #[arg(long)]
    pub pl_repo: PathBuf,

    /// 目标课程实例
    #[arg(long)]
    pub pl_course_instance: String,

    /// 配置文件
    #[arg(short = 'c', long, default_value = "config.toml")]
    pub config_file_name: PathBuf,

    /// Canvas 测验 id，不指定时从列表选择
    #[arg(short = 'q', long)]
    pub quiz_id: Option<u64>,

    /// Canvas 课程 id，不指定时从列表选择
    #[arg(long)]
    pub course_id: Option<u64>,

    /// 评测类型，不指定时限时测验为 Exam，否则为 Homework
    #[arg(short = 't', long, value_enum)]
    pub assessment_type: Option<AssessmentType>,

    #[arg(short = 's', long, default_value = "Quiz")]
    pub assessment_set: String,

    #[arg(short = 'n', long, default_value = "")]
    pub assessment_number: String,

    /// 写入每道题 info.json 的主题
    #[arg(long, default_value = "None")]
    pub topic: String,

    /// 显示详细日志
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// 每道题之前不清屏
    #[arg(long)]
    pub no_clear: bool,
}

impl Cli {
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            course_instance: self.pl_course_instance.clone(),
            topic: self.topic.clone(),
            settings: AssessmentSettings {
                assessment_type: self.assessment_type,
                set: self.assessment_set.clone(),
                number: self.assessment_number.clone(),
            },
        }
    }

    pub fn operator(&self) -> TerminalOperator {
        let operator = TerminalOperator::new();
        if self.no_clear {
            operator.without_clear()
        } else {
            operator
        }
    }

    pub fn selection(&self) -> Selection {
        Selection {
            course_id: self.course_id,
            quiz_id: self.quiz_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from([
            "canvas-quiz-import",
            "--pl-repo",
            "/tmp/pl",
            "--pl-course-instance",
            "Sp26",
        ])
        .unwrap();

        assert_eq!(cli.config_file_name, PathBuf::from("config.toml"));
        assert_eq!(cli.assessment_set, "Quiz");
        assert_eq!(cli.assessment_number, "");
        assert_eq!(cli.topic, "None");
        assert!(cli.assessment_type.is_none());
        assert!(!cli.verbose);
        assert!(!cli.no_clear);
        assert!(cli.operator().clears_screen());

        let selection = cli.selection();
        assert!(selection.course_id.is_none() && selection.quiz_id.is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "canvas-quiz-import",
            "--pl-repo",
            "/tmp/pl",
            "--pl-course-instance",
            "Sp26",
            "-q",
            "42",
            "--course-id",
            "7",
            "-t",
            "exam",
            "-s",
            "Homework",
            "-n",
            "3",
            "-v",
            "--no-clear",
        ])
        .unwrap();

        let options = cli.import_options();
        assert_eq!(options.course_instance, "Sp26");
        assert_eq!(options.settings.assessment_type, Some(AssessmentType::Exam));
        assert_eq!(options.settings.set, "Homework");
        assert_eq!(options.settings.number, "3");
        assert_eq!(cli.selection().quiz_id, Some(42));
        assert_eq!(cli.selection().course_id, Some(7));
        assert!(cli.verbose);
        assert!(!cli.operator().clears_screen());
    }

    #[test]
    fn test_repo_is_required() {
        assert!(Cli::try_parse_from(["canvas-quiz-import", "--pl-course-instance", "Sp26"]).is_err());
    }
}
