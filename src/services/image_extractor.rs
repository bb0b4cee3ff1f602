//! 图片提取服务 - 业务能力层
//!
//! Canvas 题干里的图片仍然指向 Canvas 服务器，这里把它们下载到题目的
//! `clientFilesQuestion` 目录，并替换为 `<pl-figure>`。

use crate::error::{AppError, AppResult};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

/// 题目本地资源目录名
pub const CLIENT_FILES_DIR: &str = "clientFilesQuestion";

static IMAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<p>)?(<img[^>]*src="([^"]+)"[^>]*>)(</p>)?"#).expect("img pattern")
});

static ALT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"alt="([^"]*)""#).expect("alt pattern"));

/// 下载得到的资源
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// 下载远程资源的能力
#[allow(async_fn_in_trait)]
pub trait AssetFetcher {
    async fn fetch_asset(&self, url: &str) -> AppResult<FetchedAsset>;
}

/// 题干中匹配到的一个 `<img>`
#[derive(Debug)]
struct ImageMatch {
    /// 含外层 `<p>` 的完整匹配
    full: String,
    img_tag: String,
    url: String,
    /// `<p>` 恰好只包住这张图片
    wrapped: bool,
}

/// 根据 Content-Type 推断文件扩展名
///
/// Canvas 的图片 URL 不带扩展名，只能从响应头判断。
pub fn image_file_extension(content_type: &str) -> String {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/x-icon" => "ico".to_string(),
        "image/svg+xml" => "svg".to_string(),
        other => other
            .split_once('/')
            .map(|(_, subtype)| subtype.to_string())
            .unwrap_or_else(|| other.to_string()),
    }
}

/// 下载题干中的远程图片并替换为 `<pl-figure>`
///
/// # 参数
/// - `fetcher`: 资源下载器
/// - `question_dir`: 题目输出目录
/// - `text`: 已清理的题干
///
/// # 返回
/// 返回替换后的题干。同一 URL 重复出现时只替换第一次出现的位置。
pub async fn extract_images<F: AssetFetcher>(
    fetcher: &F,
    question_dir: &Path,
    text: &str,
) -> AppResult<String> {
    let matches: Vec<ImageMatch> = IMAGE_TAG
        .captures_iter(text)
        .filter_map(|cap| {
            Some(ImageMatch {
                full: cap.get(0)?.as_str().to_string(),
                img_tag: cap.get(2)?.as_str().to_string(),
                url: cap.get(3)?.as_str().to_string(),
                wrapped: cap.get(1).is_some() && cap.get(4).is_some(),
            })
        })
        .collect();

    let mut output = text.to_string();
    let mut image_count = 0;

    for image in matches {
        if !image.url.starts_with("http") {
            debug!("跳过本地图片: {}", image.url);
            continue;
        }

        let assets_dir = question_dir.join(CLIENT_FILES_DIR);
        tokio::fs::create_dir_all(&assets_dir)
            .await
            .map_err(|e| AppError::create_dir_failed(assets_dir.display().to_string(), e))?;

        let asset = fetcher.fetch_asset(&image.url).await?;

        image_count += 1;
        let file_name = format!(
            "image_{}.{}",
            image_count,
            image_file_extension(&asset.content_type)
        );
        let file_path = assets_dir.join(&file_name);
        tokio::fs::write(&file_path, &asset.bytes)
            .await
            .map_err(|e| AppError::write_failed(file_path.display().to_string(), e))?;
        info!("🖼️ 已保存图片 {} ({} 字节)", file_name, asset.bytes.len());

        let alt_attribute = ALT_ATTR
            .captures(&image.img_tag)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
            .filter(|alt| !alt.is_empty())
            .map(|alt| format!(r#" alt="{}""#, alt))
            .unwrap_or_default();

        let target = if image.wrapped {
            &image.full
        } else {
            &image.img_tag
        };
        output = output.replacen(
            target.as_str(),
            &format!(
                r#"<pl-figure file-name="{}"{}></pl-figure>"#,
                file_name, alt_attribute
            ),
            1,
        );
    }

    Ok(output)
}
