use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 调用方传入的数据不合法
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// 调用方未能解析的 ID
    #[error("资源不存在: {0}")]
    NotFound(#[from] NotFoundError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 输入校验错误
///
/// 这类错误在使用数据之前就被拒绝，绝不会被默认值悄悄替换
#[derive(Debug, Error)]
pub enum InputError {
    /// 难度配比中某个比例为负、大于 1 或不是有限数
    #[error("难度配比 {tier} 的比例 {value} 不在 [0, 1] 范围内")]
    FractionOutOfRange { tier: &'static str, value: f64 },
    /// 难度配比三项之和为 0
    #[error("难度配比之和必须大于 0")]
    EmptyAllocation,
    /// 请求的题目数量为负
    #[error("请求题目数量不能为负: {count}")]
    NegativeRequestedCount { count: i64 },
    /// 选择题的正确选项索引越界
    #[error("题目 {question_id} 的正确选项索引 {index} 超出范围 [0, {option_count})")]
    CorrectIndexOutOfRange {
        question_id: String,
        index: usize,
        option_count: usize,
    },
    /// 正则表达式编译失败
    #[error("正则表达式无效: {0}")]
    Pattern(#[from] regex::Error),
}

/// 资源不存在错误
///
/// 属于调用方契约违规，必须立即暴露
#[derive(Debug, Error)]
pub enum NotFoundError {
    #[error("题目不存在: {id}")]
    Question { id: String },
    #[error("课程不存在: {id}")]
    Lecture { id: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
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
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
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
    /// 阈值或权重不合法
    #[error("配置项 {key} 的值 {value} 不合法")]
    InvalidValue { key: String, value: f64 },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::Json(err))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: err,
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Input(InputError::Pattern(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建题目不存在错误
    pub fn question_not_found(id: impl Into<String>) -> Self {
        AppError::NotFound(NotFoundError::Question { id: id.into() })
    }

    /// 创建课程不存在错误
    pub fn lecture_not_found(id: impl Into<String>) -> Self {
        AppError::NotFound(NotFoundError::Lecture { id: id.into() })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(path: impl Into<String>, source: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为调用方未解析 ID 导致的错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// 是否为输入校验错误
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AppError::Input(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
