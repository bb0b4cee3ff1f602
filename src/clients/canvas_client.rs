/// Canvas API 客户端
///
/// 封装所有与 Canvas REST API 相关的调用逻辑
use crate::config::Config;
use crate::error::{AppError, AppResult, BusinessError};
use crate::models::{CourseRecord, GroupRecord, QuestionRecord, QuizRecord};
use crate::services::{AssetFetcher, FetchedAsset, GroupSource};
use regex::Regex;
use reqwest::header::{CONTENT_TYPE, LINK};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static LINK_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).expect("link pattern"));

/// Canvas API 客户端
pub struct CanvasClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl CanvasClient {
    /// 创建新的 Canvas 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
        }
    }

    /// 请求一个资源的所有分页
    ///
    /// 沿着 `Link` 头中的 `next` 一直请求到最后一页，
    /// 每页的数组元素按顺序展开。
    ///
    /// # 参数
    /// - `path`: 相对于 API 根地址的路径
    pub async fn request(&self, path: &str) -> AppResult<Vec<Value>> {
        let mut url = format!("{}{}", self.api_url, path);
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            debug!("GET {} (第 {} 页)", url, page);
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?
                .error_for_status()?;

            let links = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .map(parse_link_header)
                .unwrap_or_default();

            match response.json::<Value>().await? {
                Value::Array(items) => records.extend(items),
                other => records.push(other),
            }

            let Some(next) = next_page(&links) else {
                break;
            };
            url = next.to_string();
            page += 1;
        }

        Ok(records)
    }

    /// 请求单个对象，404 或空对象返回 None
    async fn request_optional(&self, path: &str) -> AppResult<Option<Value>> {
        let url = format!("{}{}", self.api_url, path);
        debug!("GET {}", url);
        let response = self.http.get(&url).bearer_auth(&self.token).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let value: Value = response.error_for_status()?.json().await?;
        let empty = match &value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        Ok((!empty).then_some(value))
    }

    async fn request_typed<T: DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        self.request(path)
            .await?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .collect()
    }

    /// 当前用户可用的课程
    pub async fn courses(&self) -> AppResult<Vec<CourseRecord>> {
        self.request_typed("/courses?include[]=term&state[]=available")
            .await
    }

    pub async fn course(&self, course_id: u64) -> AppResult<CourseRecord> {
        let value = self
            .request_optional(&format!("/courses/{}?include[]=term", course_id))
            .await?
            .ok_or_else(|| BusinessError::NotFound {
                what: "课程".to_string(),
                id: course_id,
            })?;
        Ok(serde_json::from_value(value)?)
    }

    /// 课程下计分的测验（quiz_type 为 assignment）
    pub async fn quizzes(&self, course_id: u64) -> AppResult<Vec<QuizRecord>> {
        let quizzes: Vec<QuizRecord> = self
            .request_typed(&format!("/courses/{}/quizzes", course_id))
            .await?;
        Ok(quizzes
            .into_iter()
            .filter(QuizRecord::is_graded_assignment)
            .collect())
    }

    pub async fn quiz(&self, course_id: u64, quiz_id: u64) -> AppResult<QuizRecord> {
        let value = self
            .request_optional(&format!("/courses/{}/quizzes/{}", course_id, quiz_id))
            .await?
            .ok_or_else(|| BusinessError::NotFound {
                what: "测验".to_string(),
                id: quiz_id,
            })?;
        Ok(serde_json::from_value(value)?)
    }

    /// 测验的全部题目（线上顺序）
    pub async fn questions(&self, course_id: u64, quiz_id: u64) -> AppResult<Vec<QuestionRecord>> {
        self.request_typed(&format!(
            "/courses/{}/quizzes/{}/questions?per_page=100",
            course_id, quiz_id
        ))
        .await
    }

    pub async fn group(
        &self,
        course_id: u64,
        quiz_id: u64,
        group_id: u64,
    ) -> AppResult<Option<GroupRecord>> {
        let value = self
            .request_optional(&format!(
                "/courses/{}/quizzes/{}/groups/{}",
                course_id, quiz_id, group_id
            ))
            .await?;
        match value {
            Some(v) => Ok(GroupRecord::from_value(v)?),
            None => Ok(None),
        }
    }

    /// 绑定到某个测验的题组查询
    pub fn quiz_groups(&self, course_id: u64, quiz_id: u64) -> QuizGroups<'_> {
        QuizGroups {
            client: self,
            course_id,
            quiz_id,
        }
    }
}

impl AssetFetcher for CanvasClient {
    async fn fetch_asset(&self, url: &str) -> AppResult<FetchedAsset> {
        debug!("下载图片: {}", url);
        let response = self.http.get(url).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AppError::missing_header(url, "Content-Type"))?;
        let bytes = response.bytes().await?.to_vec();
        Ok(FetchedAsset {
            bytes,
            content_type,
        })
    }
}

/// 某个测验的题组
pub struct QuizGroups<'a> {
    client: &'a CanvasClient,
    course_id: u64,
    quiz_id: u64,
}

impl GroupSource for QuizGroups<'_> {
    async fn fetch_group(&self, group_id: u64) -> AppResult<Option<GroupRecord>> {
        self.client
            .group(self.course_id, self.quiz_id, group_id)
            .await
    }
}

/// 解析 `Link` 头，返回 rel → URL
pub fn parse_link_header(header: &str) -> HashMap<String, String> {
    LINK_ENTRY
        .captures_iter(header)
        .map(|cap| (cap[2].to_string(), cap[1].to_string()))
        .collect()
}

/// 下一页的地址；已经是最后一页时返回 None
fn next_page(links: &HashMap<String, String>) -> Option<&str> {
    if let (Some(current), Some(last)) = (links.get("current"), links.get("last")) {
        if current == last {
            return None;
        }
    }
    links.get("next").map(String::as_str)
}
