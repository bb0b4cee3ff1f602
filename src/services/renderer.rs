//! 题型渲染服务 - 业务能力层
//!
//! 把一道 Canvas 题目转换成 PrairieLearn 的 `question.html`，计算题额外生成
//! `server.py`。每种题型一个处理函数，新增题型只需在 `QuestionKind` 中加一项。

use crate::models::{AnswerRecord, QuestionKind, QuestionRecord};
use crate::services::generator;
use std::fmt::{self, Write};

/// 需要提醒操作员的降级情况
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNotice {
    /// 不支持的题型，输出原始 JSON
    UnsupportedQuestionType(String),
    /// 不支持的数值答案类型，输出无约束的数字输入框
    UnsupportedNumericalAnswer(String),
    /// 计算题没有公式，无法确定答案名
    MissingFormula,
}

impl fmt::Display for RenderNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderNotice::UnsupportedQuestionType(tag) => write!(f, "不支持的题型: {}", tag),
            RenderNotice::UnsupportedNumericalAnswer(tag) => {
                write!(f, "不支持的数值答案类型: {}", tag)
            }
            RenderNotice::MissingFormula => write!(f, "计算题缺少公式"),
        }
    }
}

/// 渲染结果
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// question.html 内容
    pub html: String,
    /// server.py 内容（仅计算题）
    pub server_script: Option<String>,
    /// 需要人工评分
    pub manual_grading: bool,
    pub notices: Vec<RenderNotice>,
}

/// 数值题答案的几种形式
#[derive(Debug, Clone, PartialEq)]
enum NumericalAnswer {
    Exact { value: f64, margin: f64 },
    Range { start: f64, end: f64 },
    Precision { approximate: f64, digits: f64 },
    Unknown(String),
}

impl From<&AnswerRecord> for NumericalAnswer {
    fn from(answer: &AnswerRecord) -> Self {
        match answer.numerical_answer_type.as_deref() {
            Some("exact_answer") => NumericalAnswer::Exact {
                value: answer.exact.unwrap_or_default(),
                margin: answer.margin.unwrap_or_default(),
            },
            Some("range_answer") => NumericalAnswer::Range {
                start: answer.start.unwrap_or_default(),
                end: answer.end.unwrap_or_default(),
            },
            Some("precision_answer") => NumericalAnswer::Precision {
                approximate: answer.approximate.unwrap_or_default(),
                digits: answer.precision.unwrap_or_default(),
            },
            Some(other) => NumericalAnswer::Unknown(other.to_string()),
            None => NumericalAnswer::Unknown("(缺失)".to_string()),
        }
    }
}

/// 渲染一道题
///
/// # 参数
/// - `question`: Canvas 题目
/// - `body`: 已清理、已提取图片的题干
///
/// # 返回
/// 返回 HTML、可选的生成脚本和需要提醒操作员的事项
pub fn render(question: &QuestionRecord, body: &str) -> Rendered {
    let mut out = Rendered::default();

    let Some(kind) = QuestionKind::from_tag(&question.question_type) else {
        out.notices.push(RenderNotice::UnsupportedQuestionType(
            question.question_type.clone(),
        ));
        question_panel(&mut out.html, body);
        out.html.push_str(&raw_dump(question));
        feedback_panel(&mut out.html, question);
        return out;
    };

    out.manual_grading = kind.is_manually_graded();

    let text = match kind {
        QuestionKind::Calculated => substitute_params(question, body),
        _ => body.to_string(),
    };

    if !kind.embeds_inputs_in_body() {
        question_panel(&mut out.html, &text);
    }

    match kind {
        QuestionKind::TextOnly => {}
        QuestionKind::Essay => {
            out.html
                .push_str("<pl-rich-text-editor file-name=\"answer.html\"></pl-rich-text-editor>\n");
        }
        QuestionKind::MultipleAnswers => {
            choice_group(&mut out.html, "pl-checkbox", "checkbox", &question.answers)
        }
        QuestionKind::MultipleChoice => {
            choice_group(&mut out.html, "pl-multiple-choice", "mc", &question.answers)
        }
        QuestionKind::Numerical => numerical(&mut out, question),
        QuestionKind::Calculated => calculated(&mut out, question),
        QuestionKind::ShortAnswer => {
            let correct = question
                .answers
                .first()
                .map(|a| a.text.as_str())
                .unwrap_or_default();
            let _ = writeln!(
                out.html,
                "<pl-string-input answers-name=\"input\" correct-answer=\"{}\"></pl-string-input>",
                escape_attr(correct)
            );
        }
        QuestionKind::FillInMultipleBlanks => {
            let filled = fill_in_blanks(&text, &question.answers);
            out.html.push_str(&filled);
            out.html.push('\n');
        }
        QuestionKind::Matching => matching(&mut out.html, question),
        QuestionKind::MultipleDropdowns => {
            let filled = dropdowns(&text, &question.answers);
            out.html.push_str(&filled);
            out.html.push('\n');
        }
    }

    feedback_panel(&mut out.html, question);
    out
}

/// 题干外层的 `<pl-question-panel>`，题干不是以 `<p>` 开头时补一个段落
fn question_panel(html: &mut String, text: &str) {
    let include_paragraph = !text.trim().starts_with("<p>");
    html.push_str("<pl-question-panel>\n");
    if include_paragraph {
        html.push_str("<p>\n");
    }
    html.push_str(text);
    html.push('\n');
    if include_paragraph {
        html.push_str("</p>\n");
    }
    html.push_str("</pl-question-panel>\n");
}

/// 单选 / 多选，权重非 0 即为正确选项
fn choice_group(html: &mut String, element: &str, answers_name: &str, answers: &[AnswerRecord]) {
    let _ = writeln!(html, "<{} answers-name=\"{}\">", element, answers_name);
    for answer in answers {
        if answer.weight != 0.0 {
            html.push_str("  <pl-answer correct=\"true\">");
        } else {
            html.push_str("  <pl-answer>");
        }
        html.push_str(&answer.text);
        html.push_str("</pl-answer>\n");
    }
    let _ = writeln!(html, "</{}>", element);
}

fn numerical(out: &mut Rendered, question: &QuestionRecord) {
    let answer = question
        .answers
        .first()
        .map(NumericalAnswer::from)
        .unwrap_or_else(|| NumericalAnswer::Unknown("(无答案)".to_string()));

    match answer {
        NumericalAnswer::Exact { value, margin }
            if (value - value.trunc()).abs() < 0.001 && margin == 0.0 =>
        {
            let _ = writeln!(
                out.html,
                "<pl-integer-input answers-name=\"value\" correct-answer=\"{}\"></pl-integer-input>",
                value.trunc() as i64
            );
        }
        NumericalAnswer::Exact { value, margin } => {
            let _ = writeln!(
                out.html,
                "<pl-number-input answers-name=\"value\" correct-answer=\"{}\" atol=\"{}\"></pl-number-input>",
                value, margin
            );
        }
        NumericalAnswer::Range { start, end } => {
            let average = (start + end) / 2.0;
            let margin = (end - average).abs();
            let _ = writeln!(
                out.html,
                "<pl-number-input answers-name=\"value\" correct-answer=\"{}\" atol=\"{}\"></pl-number-input>",
                average, margin
            );
        }
        NumericalAnswer::Precision {
            approximate,
            digits,
        } => {
            let _ = writeln!(
                out.html,
                "<pl-number-input answers-name=\"value\" correct-answer=\"{}\" comparison=\"sigfig\" digits=\"{}\"></pl-number-input>",
                approximate, digits
            );
        }
        NumericalAnswer::Unknown(tag) => {
            out.notices
                .push(RenderNotice::UnsupportedNumericalAnswer(tag));
            out.html
                .push_str("<pl-number-input answers-name=\"value\"></pl-number-input>\n");
        }
    }
}

/// 计算题：题干中的 `[x]` 换成 `{{params.x}}`
fn substitute_params(question: &QuestionRecord, body: &str) -> String {
    question
        .variables
        .iter()
        .fold(body.to_string(), |text, variable| {
            text.replace(
                &format!("[{}]", variable.name),
                &format!("{{{{params.{}}}}}", variable.name),
            )
        })
}

fn calculated(out: &mut Rendered, question: &QuestionRecord) {
    let Some(answer) = generator::answer_name(&question.formulas) else {
        out.notices.push(RenderNotice::MissingFormula);
        out.html
            .push_str("<pl-number-input answers-name=\"value\"></pl-number-input>\n");
        return;
    };

    let _ = writeln!(
        out.html,
        "<pl-number-input answers-name=\"{}\" comparison=\"decdig\" digits=\"{}\"></pl-number-input>",
        answer,
        question.formula_decimal_places.unwrap_or_default()
    );
    out.server_script = Some(generator::server_script(
        &question.variables,
        &question.formulas,
        &answer,
    ));
}

/// 按 blank_id 分组，保持首次出现的顺序
fn group_by_blank(answers: &[AnswerRecord]) -> Vec<(&str, Vec<&AnswerRecord>)> {
    let mut blanks: Vec<(&str, Vec<&AnswerRecord>)> = Vec::new();
    for answer in answers {
        let Some(blank_id) = answer.blank_id.as_deref() else {
            continue;
        };
        match blanks.iter_mut().find(|(id, _)| *id == blank_id) {
            Some((_, members)) => members.push(answer),
            None => blanks.push((blank_id, vec![answer])),
        }
    }
    blanks
}

/// 每个 `[blank]` 换成行内文本输入框，第一个答案作为标准答案
fn fill_in_blanks(text: &str, answers: &[AnswerRecord]) -> String {
    group_by_blank(answers)
        .into_iter()
        .fold(text.to_string(), |text, (blank_id, members)| {
            let correct = members.first().map(|a| a.text.as_str()).unwrap_or_default();
            text.replace(
                &format!("[{}]", blank_id),
                &format!(
                    "<pl-string-input answers-name=\"{}\" correct-answer=\"{}\" remove-spaces=\"true\" ignore-case=\"true\" display=\"inline\"></pl-string-input>",
                    blank_id,
                    escape_attr(correct)
                ),
            )
        })
}

/// 每个 `[blank]` 换成下拉单选，权重大于 0 的选项为正确答案
fn dropdowns(text: &str, answers: &[AnswerRecord]) -> String {
    group_by_blank(answers)
        .into_iter()
        .fold(text.to_string(), |text, (blank_id, members)| {
            let mut dropdown = format!(
                "<pl-multiple-choice display=\"dropdown\" hide-letter-keys=\"true\" answers-name=\"{}\">\n",
                blank_id
            );
            for answer in members {
                dropdown.push_str("  <pl-answer");
                if answer.weight > 0.0 {
                    dropdown.push_str(" correct=\"true\"");
                }
                let _ = writeln!(dropdown, ">{}</pl-answer>", answer.text);
            }
            dropdown.push_str("</pl-multiple-choice>");
            text.replace(&format!("[{}]", blank_id), &dropdown)
        })
}

fn matching(html: &mut String, question: &QuestionRecord) {
    html.push_str("<pl-matching answers-name=\"match\">\n");
    for answer in &question.answers {
        let match_id = answer.match_id.map(|id| id.to_string()).unwrap_or_default();
        let _ = writeln!(
            html,
            "  <pl-statement match=\"m{}\">{}</pl-statement>",
            match_id, answer.text
        );
    }
    for option in &question.matches {
        let _ = writeln!(
            html,
            "  <pl-option name=\"m{}\">{}</pl-option>",
            option.match_id, option.text
        );
    }
    html.push_str("</pl-matching>\n");
}

/// 答案解析面板：HTML 版本优先，否则用纯文本版本
fn feedback_panel(html: &mut String, question: &QuestionRecord) {
    let pick = |rich: &str, plain: &str| -> Option<String> {
        if !rich.is_empty() {
            Some(rich.to_string())
        } else if !plain.is_empty() {
            Some(plain.to_string())
        } else {
            None
        }
    };
    let correct = pick(&question.correct_comments_html, &question.correct_comments);
    let neutral = pick(&question.neutral_comments_html, &question.neutral_comments);
    if correct.is_none() && neutral.is_none() {
        return;
    }

    html.push_str("<pl-answer-panel>\n<p>\n");
    for comment in correct.iter().chain(neutral.iter()) {
        html.push_str(comment);
        html.push('\n');
    }
    html.push_str("</p>\n</pl-answer-panel>\n");
}

fn raw_dump(question: &QuestionRecord) -> String {
    serde_json::to_string_pretty(question).unwrap_or_else(|_| format!("{:#?}", question))
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
