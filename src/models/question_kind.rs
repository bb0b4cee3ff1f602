/// 支持转换的 Canvas 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    /// 纯文本说明
    TextOnly,
    /// 问答题
    Essay,
    /// 多选题
    MultipleAnswers,
    /// 单选题 / 判断题
    MultipleChoice,
    /// 数值题
    Numerical,
    /// 计算题（随机参数）
    Calculated,
    /// 简答填空
    ShortAnswer,
    /// 多空填空
    FillInMultipleBlanks,
    /// 匹配题
    Matching,
    /// 多下拉框
    MultipleDropdowns,
}

static KIND_BY_TAG: phf::Map<&'static str, QuestionKind> = phf::phf_map! {
    "text_only_question" => QuestionKind::TextOnly,
    "essay_question" => QuestionKind::Essay,
    "multiple_answers_question" => QuestionKind::MultipleAnswers,
    "true_false_question" => QuestionKind::MultipleChoice,
    "multiple_choice_question" => QuestionKind::MultipleChoice,
    "numerical_question" => QuestionKind::Numerical,
    "calculated_question" => QuestionKind::Calculated,
    "short_answer_question" => QuestionKind::ShortAnswer,
    "fill_in_multiple_blanks_question" => QuestionKind::FillInMultipleBlanks,
    "matching_question" => QuestionKind::Matching,
    "multiple_dropdowns_question" => QuestionKind::MultipleDropdowns,
};

impl QuestionKind {
    /// 从 Canvas 的 `question_type` 解析题型，未知题型返回 None
    pub fn from_tag(tag: &str) -> Option<Self> {
        KIND_BY_TAG.get(tag).copied()
    }

    /// 需要人工评分
    pub fn is_manually_graded(self) -> bool {
        matches!(self, QuestionKind::TextOnly | QuestionKind::Essay)
    }

    /// 题干里嵌入了作答控件，不包裹在 question panel 中
    pub fn embeds_inputs_in_body(self) -> bool {
        matches!(
            self,
            QuestionKind::FillInMultipleBlanks | QuestionKind::MultipleDropdowns
        )
    }
}
