use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// Canvas API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Canvas API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 非 2xx 响应
    #[error("API返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应缺少必需的头
    #[error("响应缺少 {header} 头: {endpoint}")]
    MissingHeader { endpoint: String, header: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 目标目录不是 PrairieLearn 仓库
    #[error("目录 {path} 不是 PrairieLearn 仓库（缺少 infoCourse.json）")]
    NotPrairieLearnRepo { path: String },
    /// 没有可选择的条目
    #[error("没有可选择的{what}")]
    NothingToSelect { what: String },
    /// 选择的索引超出范围
    #[error("索引 {index} 超出范围 [0, {max_index}]")]
    IndexOutOfRange { index: usize, max_index: usize },
    /// 请求的资源不存在
    #[error("未找到{what}: {id}")]
    NotFound { what: String, id: u64 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必需的配置项缺失
    #[error("缺少配置项 {key}（可在配置文件或环境变量 {env_var} 中设置）")]
    MissingValue { key: String, env_var: String },
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        match err.status() {
            Some(status) => AppError::Api(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
            }),
            None => AppError::Api(ApiError::RequestFailed {
                endpoint,
                source: Box::new(err),
            }),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建目录创建失败错误
    pub fn create_dir_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::CreateDirFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入失败错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建缺少响应头错误
    pub fn missing_header(endpoint: impl Into<String>, header: impl Into<String>) -> Self {
        AppError::Api(ApiError::MissingHeader {
            endpoint: endpoint.into(),
            header: header.into(),
        })
    }

    /// 创建缺少配置项错误
    pub fn missing_config(key: impl Into<String>, env_var: impl Into<String>) -> Self {
        AppError::Config(ConfigError::MissingValue {
            key: key.into(),
            env_var: env_var.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_error_display() {
        let err: AppError = BusinessError::NotPrairieLearnRepo {
            path: "/tmp/repo".to_string(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.starts_with("业务错误"));
        assert!(msg.contains("infoCourse.json"));
    }

    #[test]
    fn test_missing_config_mentions_env_var() {
        let err = AppError::missing_config("access_token", "CANVAS_ACCESS_TOKEN");
        assert!(err.to_string().contains("CANVAS_ACCESS_TOKEN"));
    }
}
