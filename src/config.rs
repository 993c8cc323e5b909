use crate::error::{AppError, AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;

/// 判分阈值
///
/// 数值来自经验调参，没有推导依据，保持可覆盖而不是写死
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// 关键词覆盖率阈值
    pub keyword_overlap_threshold: f64,
    /// 编辑距离相似度阈值
    pub similarity_threshold: f64,
    /// 参与关键词匹配的最短词长（字符数）
    pub min_token_chars: usize,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            keyword_overlap_threshold: 0.65,
            similarity_threshold: 0.75,
            min_token_chars: 2,
        }
    }
}

/// 选题打分权重
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// 从未做过的题目的基础分
    pub unseen_score: f64,
    /// 错误率权重
    pub weakness_weight: f64,
    /// 间隔重复：每天加分
    pub spacing_per_day: f64,
    /// 间隔重复加分上限
    pub spacing_cap: f64,
    /// 练习不足加分
    pub practice_bonus: f64,
    /// 每次作答扣减的练习加分
    pub practice_decay: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            unseen_score: 100.0,
            weakness_weight: 80.0,
            spacing_per_day: 2.0,
            spacing_cap: 20.0,
            practice_bonus: 10.0,
            practice_decay: 2.0,
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时生成的练习数量
    pub max_concurrent_sessions: usize,
    /// 每次练习的题目数量
    pub session_size: usize,
    /// 题库 TOML 文件
    pub question_bank_file: String,
    /// 题库目录；设置后加载目录下全部题库，忽略 `question_bank_file`
    pub question_bank_dir: Option<String>,
    /// 作答历史 TOML 文件
    pub responses_file: String,
    /// 生成练习的课程 ID
    pub lecture_id: String,
    /// 学习者快照缓存有效期（秒）
    pub cache_ttl_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 算法参数 ---
    pub grading: GradingConfig,
    pub ranking: RankingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_sessions: 8,
            session_size: 10,
            question_bank_file: "data/question_bank.toml".to_string(),
            question_bank_dir: None,
            responses_file: "data/responses.toml".to_string(),
            lecture_id: "rust-101".to_string(),
            cache_ttl_secs: 300,
            verbose_logging: false,
            grading: GradingConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

/// 读取并解析环境变量，不存在时返回 None
fn env_parse<T: std::str::FromStr>(var_name: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果设置了 `ADAPTIVE_QUIZ_CONFIG`，先读取该 TOML 文件，再用其他环境变量覆盖
    pub fn from_env() -> AppResult<Self> {
        let base = match std::env::var("ADAPTIVE_QUIZ_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::File(FileError::TomlParseFailed { source, .. }) => {
                AppError::toml_parse_failed(path.display().to_string(), source)
            }
            other => other,
        })
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> AppResult<Self> {
        if let Some(v) = env_parse("MAX_CONCURRENT_SESSIONS")? {
            self.max_concurrent_sessions = v;
        }
        if let Some(v) = env_parse("SESSION_SIZE")? {
            self.session_size = v;
        }
        if let Some(v) = env_parse("QUESTION_BANK_FILE")? {
            self.question_bank_file = v;
        }
        if let Some(v) = env_parse::<String>("QUESTION_BANK_DIR")? {
            self.question_bank_dir = Some(v);
        }
        if let Some(v) = env_parse("RESPONSES_FILE")? {
            self.responses_file = v;
        }
        if let Some(v) = env_parse("LECTURE_ID")? {
            self.lecture_id = v;
        }
        if let Some(v) = env_parse("CACHE_TTL_SECS")? {
            self.cache_ttl_secs = v;
        }
        if let Some(v) = env_parse("VERBOSE_LOGGING")? {
            self.verbose_logging = v;
        }
        self.validate()?;
        Ok(self)
    }

    /// 校验阈值和权重
    pub fn validate(&self) -> AppResult<()> {
        let unit_interval = [
            (
                "grading.keyword_overlap_threshold",
                self.grading.keyword_overlap_threshold,
            ),
            (
                "grading.similarity_threshold",
                self.grading.similarity_threshold,
            ),
        ];
        for (key, value) in unit_interval {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                }
                .into());
            }
        }

        let r = &self.ranking;
        let weights = [
            ("ranking.unseen_score", r.unseen_score),
            ("ranking.weakness_weight", r.weakness_weight),
            ("ranking.spacing_per_day", r.spacing_per_day),
            ("ranking.spacing_cap", r.spacing_cap),
            ("ranking.practice_bonus", r.practice_bonus),
            ("ranking.practice_decay", r.practice_decay),
        ];
        for (key, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                }
                .into());
            }
        }

        if self.max_concurrent_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrent_sessions".to_string(),
                value: 0.0,
            }
            .into());
        }

        Ok(())
    }
}
