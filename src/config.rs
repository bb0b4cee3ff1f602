use crate::error::{AppError, AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Canvas API 根地址，例如 https://canvas.example.edu/api/v1
    pub api_url: String,
    /// Canvas 访问令牌
    pub access_token: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 需要人工复查的题目写入此文件
    pub warn_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            access_token: String::new(),
            verbose_logging: false,
            warn_file: "warn.txt".to_string(),
        }
    }
}

impl Config {
    /// 从 TOML 文件加载配置，再用环境变量覆盖
    ///
    /// 文件不存在时只使用默认值和环境变量。
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let base = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                AppError::File(FileError::ReadFailed {
                    path: path.display().to_string(),
                    source: e,
                })
            })?;
            Self::from_toml_str(&content).map_err(|e| {
                AppError::Config(ConfigError::ParseFailed {
                    path: path.display().to_string(),
                    source: e,
                })
            })?
        } else {
            Self::default()
        };

        let config = base.with_env();
        config.validate()?;
        Ok(config)
    }

    /// 解析 TOML 内容
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 环境变量优先于文件中的值
    pub fn with_env(self) -> Self {
        Self {
            api_url: std::env::var("CANVAS_API_URL").unwrap_or(self.api_url),
            access_token: std::env::var("CANVAS_ACCESS_TOKEN").unwrap_or(self.access_token),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            warn_file: std::env::var("WARN_FILE").unwrap_or(self.warn_file),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(AppError::missing_config("api_url", "CANVAS_API_URL"));
        }
        if self.access_token.trim().is_empty() {
            return Err(AppError::missing_config("access_token", "CANVAS_ACCESS_TOKEN"));
        }
        Ok(())
    }
}
