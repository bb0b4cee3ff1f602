//! Canvas REST API 返回的原始记录
//!
//! Canvas 经常对缺省字段返回 `null`，这里统一容忍。

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 课程
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_code: String,
    #[serde(default)]
    pub term: Option<TermRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl CourseRecord {
    /// 学期名，缺失时返回占位文本
    pub fn term_name(&self) -> &str {
        match &self.term {
            Some(term) if !term.name.is_empty() => &term.name,
            _ => "NO TERM",
        }
    }
}

/// 测验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quiz_type: String,
    /// 限时（分钟）
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub access_code: Option<String>,
    #[serde(default)]
    pub unlock_at: Option<String>,
    #[serde(default)]
    pub lock_at: Option<String>,
}

impl QuizRecord {
    /// 只有 "assignment" 类型的测验会计入成绩
    pub fn is_graded_assignment(&self) -> bool {
        self.quiz_type == "assignment"
    }

    pub fn is_timed(&self) -> bool {
        self.time_limit.is_some_and(|m| m > 0)
    }
}

/// 题目组（备选题池）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// 从组中抽取的题目数
    #[serde(default, deserialize_with = "lenient_u32")]
    pub pick_count: u32,
    /// 每道成员题的分值
    #[serde(default, deserialize_with = "null_as_default")]
    pub question_points: f64,
    #[serde(deserialize_with = "lenient_i64")]
    pub position: i64,
}

impl GroupRecord {
    /// 解析 Canvas 返回的题组，没有位置的题组视为不存在
    pub fn from_value(value: Value) -> Result<Option<Self>, serde_json::Error> {
        match value.get("position") {
            None | Some(Value::Null) => Ok(None),
            Some(_) => serde_json::from_value(value).map(Some),
        }
    }
}

/// 题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u64,
    #[serde(default)]
    pub quiz_group_id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points_possible: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct_comments: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct_comments_html: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub neutral_comments: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub neutral_comments_html: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answers: Vec<AnswerRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Vec<VariableRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub formulas: Vec<FormulaRecord>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub formula_decimal_places: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<MatchRecord>,
    /// 其余字段原样保留，用于不支持题型的原始输出
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 答案，字段随题型不同而不同
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numerical_answer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<u64>,
}

/// 计算题变量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max: f64,
    /// 小数位数，0 或缺失表示整数
    #[serde(default, deserialize_with = "lenient_u32")]
    pub scale: u32,
}

/// 计算题公式，形如 `z = x + y`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaRecord {
    pub formula: String,
}

/// 匹配题的选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

// `null` 按默认值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 整数字段可能以 `2`、`2.0`、`"2"` 或 `null` 的形式出现
fn lenient_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let number = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(whole_number),
        Some(other) => {
            return Err(<D::Error as de::Error>::custom(format!(
                "expected an integer, found {}",
                other
            )))
        }
    };
    let number = number.ok_or_else(|| <D::Error as de::Error>::custom("expected an integer"))?;
    T::try_from(number)
        .map(Some)
        .map_err(|_| <D::Error as de::Error>::custom(format!("integer {} out of range", number)))
}

fn whole_number(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(lenient_integer(deserializer)?.unwrap_or_default())
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    lenient_integer(deserializer)
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    lenient_integer(deserializer)?
        .ok_or_else(|| <D::Error as de::Error>::custom("missing integer"))
}
