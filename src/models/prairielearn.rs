//! PrairieLearn 端的描述文件（info.json / infoAssessment.json）

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 标记题目来源的固定标签
pub const PROVENANCE_TAG: &str = "fromcanvas";

/// 题目描述 `info.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionInfo {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub format: String,
    pub title: String,
    pub topic: String,
    pub tags: Vec<String>,
    #[serde(rename = "gradingMethod", skip_serializing_if = "Option::is_none")]
    pub grading_method: Option<String>,
}

impl QuestionInfo {
    pub fn new(title: impl Into<String>, topic: impl Into<String>, manual_grading: bool) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            format: "v3".to_string(),
            title: title.into(),
            topic: topic.into(),
            tags: vec![PROVENANCE_TAG.to_string()],
            grading_method: manual_grading.then(|| "Manual".to_string()),
        }
    }
}

/// 评测类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum AssessmentType {
    Exam,
    Homework,
}

/// 访问规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRule {
    pub credit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(rename = "timeLimitMin", skip_serializing_if = "Option::is_none")]
    pub time_limit_min: Option<u32>,
}

impl Default for AccessRule {
    fn default() -> Self {
        Self {
            credit: 100,
            password: None,
            start_date: None,
            end_date: None,
            time_limit_min: None,
        }
    }
}

/// 单道题的引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: String,
    pub points: f64,
}

/// 备选题池：从 alternatives 中抽取 number_choose 道
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativePool {
    #[serde(rename = "numberChoose")]
    pub number_choose: u32,
    pub points: f64,
    pub alternatives: Vec<Alternative>,
}

/// zone 中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneEntry {
    Pool(AlternativePool),
    Question(Alternative),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub questions: Vec<ZoneEntry>,
}

/// 评测描述 `infoAssessment.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentInfo {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub assessment_type: AssessmentType,
    pub title: String,
    pub text: String,
    pub set: String,
    pub number: String,
    #[serde(rename = "allowAccess")]
    pub allow_access: Vec<AccessRule>,
    pub zones: Vec<Zone>,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_access_rule_omits_unsourced_fields() {
        let rule = AccessRule {
            time_limit_min: Some(30),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({"credit": 100, "timeLimitMin": 30})
        );
    }

    #[test]
    fn test_zone_entry_shapes() {
        let pool = ZoneEntry::Pool(AlternativePool {
            number_choose: 1,
            points: 2.0,
            alternatives: vec![Alternative {
                id: "Quiz1/Q1".to_string(),
                points: 2.0,
            }],
        });
        let value = serde_json::to_value(&pool).unwrap();
        assert_eq!(value["numberChoose"], json!(1));
        assert_eq!(value["alternatives"][0]["id"], json!("Quiz1/Q1"));
    }

    #[test]
    fn test_question_info_manual_flag() {
        let info = QuestionInfo::new("Essay", "None", true);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["type"], json!("v3"));
        assert_eq!(value["tags"], json!(["fromcanvas"]));
        assert_eq!(value["gradingMethod"], json!("Manual"));

        let auto = serde_json::to_value(QuestionInfo::new("MC", "None", false)).unwrap();
        assert!(auto.get("gradingMethod").is_none());
    }
}
