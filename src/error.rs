use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 网络抓取错误
    #[error("抓取错误: {0}")]
    Fetch(#[from] FetchError),
    /// 文档解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 数据库错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 网络抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 请求超时（单独区分，调用方据此决定是否继续）
    #[error("请求超时: {url}")]
    Timeout { url: String },
    /// 网络请求失败
    #[error("请求失败 ({url}): {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务器返回非 2xx 状态码
    #[error("服务器返回状态码 {status} ({url})")]
    BadStatus { url: String, status: u16 },
}

/// 文档解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 缺少必需的元素
    #[error("missing <{element}> element")]
    MissingElement { element: String },
    /// 日期无法解析
    #[error("unparsable vote date '{raw}'")]
    InvalidDate { raw: String },
    /// 不是合法的 XML
    #[error("malformed vote XML: {reason}")]
    MalformedXml { reason: String },
}

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 数据库操作失败
    #[error("数据库操作失败: {0}")]
    Database(#[from] sqlx::Error),
    /// JSON 序列化失败
    #[error("JSON 序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 读取出的数据无效
    #[error("数据库中的 {column} 无效: {value}")]
    InvalidColumn { column: String, value: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 时区名称无效
    #[error("无效的时区: {0}")]
    InvalidTimeZone(String),
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(StoreError::Database(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Store(StoreError::Serialization(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建请求超时错误
    pub fn timeout(url: impl Into<String>) -> Self {
        AppError::Fetch(FetchError::Timeout { url: url.into() })
    }

    /// 创建缺少元素错误
    pub fn missing_element(element: impl Into<String>) -> Self {
        AppError::Parse(ParseError::MissingElement {
            element: element.into(),
        })
    }

    /// 创建日期解析错误
    pub fn invalid_date(raw: impl Into<String>) -> Self {
        AppError::Parse(ParseError::InvalidDate { raw: raw.into() })
    }

    /// 创建 XML 格式错误
    pub fn malformed_xml(reason: impl ToString) -> Self {
        AppError::Parse(ParseError::MalformedXml {
            reason: reason.to_string(),
        })
    }

    /// 是否为请求超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Fetch(FetchError::Timeout { .. }))
    }
}

/// 保存投票记录失败
///
/// 校验失败携带完整的错误信息列表，会原样写进失败报告
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Store(#[from] AppError),
}

impl SaveError {
    /// 转换为报告中使用的错误信息
    pub fn messages(&self) -> Vec<String> {
        match self {
            SaveError::Validation(messages) => messages.clone(),
            SaveError::Store(e) => vec![e.to_string()],
        }
    }
}

impl From<sqlx::Error> for SaveError {
    fn from(err: sqlx::Error) -> Self {
        SaveError::Store(err.into())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
