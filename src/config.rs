use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::workflow::SubmitPolicy;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    /// 未配置时所有出题请求直接走内置题库
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次请求超时（秒）
    pub llm_timeout_secs: u64,
    /// 每次出题最多尝试次数
    pub llm_max_attempts: usize,
    // --- 测评配置 ---
    /// 每批生成的题目数量
    pub question_count: usize,
    /// 是否要求全部作答后才能提交
    pub strict_submit: bool,
    // --- 日志配置 ---
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 会话日志文件（可选）
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: None,
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-3-flash-preview".to_string(),
            llm_timeout_secs: 60,
            llm_max_attempts: 1,
            question_count: 5,
            strict_submit: true,
            verbose_logging: false,
            log_file: None,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 若设置了 `TECH_PREP_CONFIG`，先读取该 TOML 文件，再用环境变量覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var("TECH_PREP_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(path.trim())?,
            _ => Self::default(),
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用给定的变量查找函数覆盖字段
    pub fn with_env_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .or_else(|| lookup("LLM_API_KEY"))
            .or(self.llm_api_key);

        Ok(Self {
            llm_api_key: api_key.filter(|k| !k.trim().is_empty()),
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_timeout_secs: parse_var(&lookup, "LLM_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.llm_timeout_secs),
            llm_max_attempts: parse_var::<usize, _>(&lookup, "LLM_MAX_ATTEMPTS", "usize")?
                .unwrap_or(self.llm_max_attempts)
                .max(1),
            question_count: parse_var::<usize, _>(&lookup, "QUESTION_COUNT", "usize")?
                .unwrap_or(self.question_count)
                .max(1),
            strict_submit: parse_var(&lookup, "STRICT_SUBMIT", "bool")?
                .unwrap_or(self.strict_submit),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            log_file: lookup("LOG_FILE").or(self.log_file),
        })
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn submit_policy(&self) -> SubmitPolicy {
        if self.strict_submit {
            SubmitPolicy::Strict
        } else {
            SubmitPolicy::Lenient
        }
    }
}

fn parse_var<T, F>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
