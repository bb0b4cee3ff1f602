//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块负责一次完整导入的生命周期：
//!
//! 1. **应用初始化**：检查目标仓库，创建 Canvas 客户端
//! 2. **选择课程与测验**：命令行指定时直接获取，否则由操作员从列表选择
//! 3. **整理题目**：拉取全部题目，查询题组，计算最终顺序
//! 4. **向下委托**：交给 `quiz_processor` 转换并写出评测
//! 5. **全局统计**：输出最终的转换结果
//!
//! 整个过程是顺序执行的，每一步都等上一步完成。

use crate::clients::CanvasClient;
use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::infrastructure::OutputTree;
use crate::models::{CourseRecord, QuizRecord};
use crate::operator::Operator;
use crate::orchestrator::quiz_processor::{self, ImportOptions, QuizOutcome};
use crate::services::{reconcile, resolve_groups, WarnWriter};
use crate::utils::logging;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// 本次导入的目标
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub course_id: Option<u64>,
    pub quiz_id: Option<u64>,
}

/// 应用主结构
pub struct App {
    config: Config,
    options: ImportOptions,
    selection: Selection,
    tree: OutputTree,
    client: CanvasClient,
}

impl App {
    /// 初始化应用
    ///
    /// 目标目录必须是 PrairieLearn 课程仓库，检查在任何网络请求之前完成。
    ///
    /// # 参数
    /// - `config`: 程序配置
    /// - `pl_repo`: PrairieLearn 仓库根目录
    /// - `options`: 导入选项
    /// - `selection`: 命令行指定的课程/测验
    pub fn initialize(
        config: Config,
        pl_repo: &Path,
        options: ImportOptions,
        selection: Selection,
    ) -> Result<Self> {
        let tree = OutputTree::open(pl_repo)?;
        logging::log_startup(&config.api_url, tree.root(), &options.course_instance);

        let client = CanvasClient::new(&config);

        Ok(Self {
            config,
            options,
            selection,
            tree,
            client,
        })
    }

    /// 运行应用主逻辑
    ///
    /// # 返回
    /// 返回本次导入的评测目录与统计
    pub async fn run<O: Operator>(&self, operator: &mut O) -> Result<QuizOutcome> {
        let course = self.select_course(operator).await?;
        info!(
            "📚 课程: {} - {} / {}",
            course.id,
            course.term_name(),
            course.course_code
        );

        let quiz = self.select_quiz(operator, course.id).await?;
        info!("📝 测验: {} - {}", quiz.id, quiz.title);

        let questions = self
            .client
            .questions(course.id, quiz.id)
            .await
            .with_context(|| format!("获取测验 {} 的题目失败", quiz.id))?;
        logging::log_questions_loaded(questions.len());

        let groups = self.client.quiz_groups(course.id, quiz.id);
        let cache = resolve_groups(&questions, &groups).await?;
        let reconciled = reconcile(questions, &cache);

        let warn_writer = WarnWriter::with_path(&self.config.warn_file);
        let outcome = quiz_processor::process_quiz(
            &self.tree,
            &self.client,
            operator,
            warn_writer,
            &quiz,
            &reconciled,
            &self.options,
        )
        .await?;

        logging::print_final_stats(
            &outcome.stats,
            &outcome.assessment_dir,
            &self.config.warn_file,
        );

        Ok(outcome)
    }

    /// 选择课程
    async fn select_course<O: Operator>(&self, operator: &mut O) -> Result<CourseRecord> {
        if let Some(course_id) = self.selection.course_id {
            return Ok(self.client.course(course_id).await?);
        }

        info!("\n📁 正在获取可用课程...");
        let courses = self.client.courses().await?;
        let items: Vec<String> = courses
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}: {} - {} / {}", i, c.id, c.term_name(), c.course_code))
            .collect();
        let index = choose(operator, "选择课程", "课程", &items)?;
        Ok(courses[index].clone())
    }

    /// 选择测验
    async fn select_quiz<O: Operator>(&self, operator: &mut O, course_id: u64) -> Result<QuizRecord> {
        if let Some(quiz_id) = self.selection.quiz_id {
            let quiz = self.client.quiz(course_id, quiz_id).await?;
            if !quiz.is_graded_assignment() {
                warn!("⚠️ 测验 {} 的类型是 {}，仍按计分测验导入", quiz.id, quiz.quiz_type);
            }
            return Ok(quiz);
        }

        info!("\n📁 正在获取课程 {} 的测验...", course_id);
        let quizzes = self.client.quizzes(course_id).await?;
        let items: Vec<String> = quizzes
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}: {} - {}", i, q.id, q.title))
            .collect();
        let index = choose(operator, "选择测验", "测验", &items)?;
        Ok(quizzes[index].clone())
    }
}

/// 让操作员从列表中选择一项
///
/// 空列表和越界的索引都是错误。
pub fn choose<O: Operator>(
    operator: &mut O,
    prompt: &str,
    what: &str,
    items: &[String],
) -> Result<usize> {
    check_selectable(what, items.len())?;
    let index = operator.select(prompt, items)?;
    check_index(index, items.len())?;
    Ok(index)
}

fn check_selectable(what: &str, len: usize) -> AppResult<()> {
    if len == 0 {
        return Err(BusinessError::NothingToSelect {
            what: what.to_string(),
        }
        .into());
    }
    Ok(())
}

fn check_index(index: usize, len: usize) -> AppResult<()> {
    if index >= len {
        return Err(BusinessError::IndexOutOfRange {
            index,
            max_index: len - 1,
        }
        .into());
    }
    Ok(())
}
