pub mod canvas;
pub mod prairielearn;
pub mod question_kind;

pub use canvas::{
    AnswerRecord, CourseRecord, FormulaRecord, GroupRecord, MatchRecord, QuestionRecord,
    QuizRecord, VariableRecord,
};
pub use prairielearn::{
    AccessRule, Alternative, AlternativePool, AssessmentInfo, AssessmentType, QuestionInfo, Zone,
    ZoneEntry,
};
pub use question_kind::QuestionKind;
