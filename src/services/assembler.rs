//! 评测组装服务 - 业务能力层
//!
//! 收集每道已转换题目的引用，题组成员合并到同一个备选题池，
//! 最后生成 `infoAssessment.json` 的内容。

use crate::models::{
    AccessRule, Alternative, AlternativePool, AssessmentInfo, AssessmentType, GroupRecord,
    QuizRecord, Zone, ZoneEntry,
};
use std::collections::HashMap;
use uuid::Uuid;

/// 评测的附加设置（来自命令行）
#[derive(Debug, Clone, Default)]
pub struct AssessmentSettings {
    /// 指定类型，为空时根据是否限时推断
    pub assessment_type: Option<AssessmentType>,
    pub set: String,
    pub number: String,
}

/// 按顺序收集 zone 条目
///
/// 题组的备选题池在第一道成员题出现时创建，之后的成员追加到同一个池中。
#[derive(Debug, Default)]
pub struct AssessmentAssembler {
    entries: Vec<ZoneEntry>,
    pool_slots: HashMap<u64, usize>,
}

impl AssessmentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一道题的引用
    ///
    /// # 参数
    /// - `alternative`: 题目引用
    /// - `group`: 所属题组（没有时直接加入 zone）
    pub fn push(&mut self, alternative: Alternative, group: Option<&GroupRecord>) {
        let Some(group) = group else {
            self.entries.push(ZoneEntry::Question(alternative));
            return;
        };

        let slot = match self.pool_slots.get(&group.id) {
            Some(&slot) => slot,
            None => {
                self.entries.push(ZoneEntry::Pool(AlternativePool {
                    number_choose: group.pick_count,
                    points: group.question_points,
                    alternatives: Vec::new(),
                }));
                let slot = self.entries.len() - 1;
                self.pool_slots.insert(group.id, slot);
                slot
            }
        };

        if let Some(ZoneEntry::Pool(pool)) = self.entries.get_mut(slot) {
            pool.alternatives.push(alternative);
        }
    }

    /// 生成评测描述
    pub fn finish(self, quiz: &QuizRecord, settings: &AssessmentSettings) -> AssessmentInfo {
        AssessmentInfo {
            uuid: Uuid::new_v4(),
            assessment_type: assessment_type(quiz, settings.assessment_type),
            title: quiz.title.clone(),
            text: quiz.description.clone(),
            set: settings.set.clone(),
            number: settings.number.clone(),
            allow_access: vec![access_rule(quiz)],
            zones: vec![Zone {
                questions: self.entries,
            }],
            comment: format!("Imported from Canvas, quiz {}", quiz.id),
        }
    }
}

/// 指定了类型就用指定的，否则限时测验为 Exam，其余为 Homework
pub fn assessment_type(quiz: &QuizRecord, requested: Option<AssessmentType>) -> AssessmentType {
    requested.unwrap_or(if quiz.is_timed() {
        AssessmentType::Exam
    } else {
        AssessmentType::Homework
    })
}

/// 访问规则只包含 Canvas 中实际设置了的字段
pub fn access_rule(quiz: &QuizRecord) -> AccessRule {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
    AccessRule {
        credit: 100,
        password: non_empty(&quiz.access_code),
        start_date: non_empty(&quiz.unlock_at),
        end_date: non_empty(&quiz.lock_at),
        time_limit_min: quiz.time_limit.filter(|m| *m > 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alternative(id: &str) -> Alternative {
        Alternative {
            id: format!("Quiz1/{}", id),
            points: 1.0,
        }
    }

    fn group(id: u64) -> GroupRecord {
        GroupRecord {
            id,
            name: "Pool".to_string(),
            pick_count: 1,
            question_points: 3.0,
            position: 2,
        }
    }

    fn quiz(value: serde_json::Value) -> QuizRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_group_members_share_one_pool() {
        let pool = group(5);
        let mut assembler = AssessmentAssembler::new();
        assembler.push(alternative("A"), None);
        assembler.push(alternative("B"), Some(&pool));
        assembler.push(alternative("C"), Some(&pool));
        assembler.push(alternative("D"), None);

        assert_eq!(
            assembler.entries,
            vec![
                ZoneEntry::Question(alternative("A")),
                ZoneEntry::Pool(AlternativePool {
                    number_choose: 1,
                    points: 3.0,
                    alternatives: vec![alternative("B"), alternative("C")],
                }),
                ZoneEntry::Question(alternative("D")),
            ]
        );
    }

    #[test]
    fn test_type_inference_and_override() {
        let timed = quiz(json!({"id": 1, "title": "T", "time_limit": 30}));
        let untimed = quiz(json!({"id": 2, "title": "U", "time_limit": null}));

        assert_eq!(assessment_type(&timed, None), AssessmentType::Exam);
        assert_eq!(assessment_type(&untimed, None), AssessmentType::Homework);
        assert_eq!(
            assessment_type(&timed, Some(AssessmentType::Homework)),
            AssessmentType::Homework
        );
    }

    #[test]
    fn test_access_rule_fields() {
        let q = quiz(json!({
            "id": 1,
            "title": "T",
            "access_code": "",
            "unlock_at": "2024-01-08T08:00:00Z",
            "lock_at": null,
            "time_limit": 45
        }));
        let rule = access_rule(&q);
        assert_eq!(rule.password, None);
        assert_eq!(rule.start_date.as_deref(), Some("2024-01-08T08:00:00Z"));
        assert_eq!(rule.end_date, None);
        assert_eq!(rule.time_limit_min, Some(45));
    }

    #[test]
    fn test_finish_builds_single_zone() {
        let q = quiz(json!({"id": 77, "title": "Quiz 1", "description": "<p>Intro</p>"}));
        let mut assembler = AssessmentAssembler::new();
        assembler.push(alternative("A"), None);

        let info = assembler.finish(
            &q,
            &AssessmentSettings {
                assessment_type: None,
                set: "Quiz".to_string(),
                number: "1".to_string(),
            },
        );

        assert_eq!(info.zones.len(), 1);
        assert_eq!(info.zones[0].questions.len(), 1);
        assert_eq!(info.comment, "Imported from Canvas, quiz 77");
        assert_eq!(info.assessment_type, AssessmentType::Homework);
        assert_eq!(info.allow_access, vec![AccessRule::default()]);
    }
}
