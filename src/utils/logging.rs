/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::orchestrator::QuestionStats;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 设置了 `RUST_LOG` 时以它为准，否则按 `verbose` 选择 debug 或 info。
/// 重复初始化会被忽略。
///
/// # 参数
/// - `verbose`: 是否显示详细日志
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// 记录程序启动信息
///
/// # 参数
/// - `api_url`: Canvas API 根地址
/// - `pl_repo`: PrairieLearn 仓库
/// - `course_instance`: 目标课程实例
pub fn log_startup(api_url: &str, pl_repo: &Path, course_instance: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Canvas 测验导入 PrairieLearn");
    info!("🌐 Canvas: {}", api_url);
    info!("📂 仓库: {}", pl_repo.display());
    info!("🏫 课程实例: {}", course_instance);
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
pub fn log_questions_loaded(total: usize) {
    info!("✓ 找到 {} 道题目", total);
    info!("💡 每道题需要输入标题，留空跳过\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 题目统计
/// - `assessment_dir`: 评测目录
/// - `warn_file`: 降级记录文件
pub fn print_final_stats(stats: &QuestionStats, assessment_dir: &Path, warn_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 导入完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 转换: {}", stats.converted);
    info!("⏭️ 跳过: {}", stats.skipped);
    info!("⚠️ 需复查: {}", stats.flagged);
    info!("{}", "=".repeat(60));
    info!("\n评测已写入: {}", assessment_dir.display());
    if stats.flagged > 0 {
        info!("需复查的题目记录在: {}", warn_file);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("欧姆定律的应用", 4), "欧姆定律...");
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "info");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
