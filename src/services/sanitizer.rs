//! 题干清理服务 - 业务能力层
//!
//! 只去掉 `<link>` 和 `<script>`，不是完整的 HTML 清理器。

use regex::Regex;
use std::sync::LazyLock;

static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<link[^>]*>").expect("link pattern"));

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script[^>]*>.*?</script>").expect("script pattern"));

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\W_]+").expect("word pattern"));

/// 去掉题干中的 `<link>` 标签和 `<script>` 块
///
/// 一些 Canvas 插件会往每道题里注入样式和脚本，考场网络会拦截这些外部资源。
pub fn clean_question_text(text: &str) -> String {
    let text = LINK_TAG.replace_all(text, "");
    SCRIPT_BLOCK.replace_all(&text, "").into_owned()
}

/// 把标题转换为只含字母数字的目录名
///
/// 结果为空时返回 `untitled`。
pub fn file_name_only(name: &str) -> String {
    let cleaned = NON_WORD.replace_all(name, "");
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_links_and_scripts() {
        let html = r#"<link rel="stylesheet" href="https://cdn.example.com/dp.css"><p>What is 2+2?</p><script src="x.js"></script><script>
            var a = 1;
        </script>"#;
        assert_eq!(clean_question_text(html), "<p>What is 2+2?</p>");
    }

    #[test]
    fn test_script_match_is_not_greedy() {
        let html = "<script>a()</script><p>keep</p><script>b()</script>";
        assert_eq!(clean_question_text(html), "<p>keep</p>");
    }

    #[test]
    fn test_file_name_only() {
        assert_eq!(file_name_only("Week 3: Ohm's Law_v2"), "Week3OhmsLawv2");
        assert_eq!(file_name_only("?!"), "untitled");
    }
}
