use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认的配置文件名（存在时才会加载）
pub const DEFAULT_CONFIG_FILE: &str = "sat_genius.toml";

/// LLM 服务类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini 原生接口（支持 responseSchema）
    Gemini,
    /// 兼容 OpenAI 的 chat/completions 接口
    #[serde(alias = "open_ai")]
    OpenAi,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "open_ai" | "openai-compatible" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl LlmProvider {
    /// 各服务的默认接口地址
    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LlmProvider::OpenAi => "https://api.openai.com/v1",
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 出题时的采样温度
    pub question_temperature: f32,
    /// 单次回复的最大 token 数
    pub max_tokens: u32,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            llm_provider: LlmProvider::Gemini,
            llm_api_key: String::new(),
            llm_api_base_url: LlmProvider::Gemini.default_base_url().to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            question_temperature: 1.0,
            max_tokens: 2048,
            request_timeout_secs: 60,
        }
    }
}

/// 配置文件内容，所有字段可选，缺省时沿用下层的值
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub verbose_logging: Option<bool>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: Option<String>,
    pub llm_model_name: Option<String>,
    pub question_temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// 完整加载流程：默认值 → 配置文件 → 环境变量，最后校验
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("QUIZ_CONFIG").ok();
        let base = match path.as_deref() {
            Some(p) => Self::default().merge_file(&Self::read_file(Path::new(p))?),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::default().merge_file(&Self::read_file(Path::new(DEFAULT_CONFIG_FILE))?)
            }
            None => Self::default(),
        };

        let config = base.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 读取并解析 TOML 配置文件
    pub fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用配置文件覆盖当前值
    pub fn merge_file(self, file: &FileConfig) -> Self {
        let llm_provider = file.llm_provider.unwrap_or(self.llm_provider);
        // 换了服务但没指定地址时，地址跟着服务走
        let llm_api_base_url = match (&file.llm_api_base_url, file.llm_provider) {
            (Some(url), _) => url.clone(),
            (None, Some(provider)) if provider != self.llm_provider => {
                provider.default_base_url().to_string()
            }
            (None, _) => self.llm_api_base_url,
        };

        Self {
            verbose_logging: file.verbose_logging.unwrap_or(self.verbose_logging),
            llm_provider,
            llm_api_key: file.llm_api_key.clone().unwrap_or(self.llm_api_key),
            llm_api_base_url,
            llm_model_name: file.llm_model_name.clone().unwrap_or(self.llm_model_name),
            question_temperature: file
                .question_temperature
                .unwrap_or(self.question_temperature),
            max_tokens: file.max_tokens.unwrap_or(self.max_tokens),
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(self.request_timeout_secs),
        }
    }

    /// 用环境变量覆盖当前值
    ///
    /// `lookup` 便于测试时注入变量表
    pub fn merge_env<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_provider = match lookup("LLM_PROVIDER") {
            Some(v) => v.parse()?,
            None => self.llm_provider,
        };
        let llm_api_base_url = match lookup("LLM_API_BASE_URL") {
            Some(url) => url,
            None if llm_provider != self.llm_provider => {
                llm_provider.default_base_url().to_string()
            }
            None => self.llm_api_base_url,
        };
        let llm_api_key = lookup("LLM_API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .or_else(|| lookup("API_KEY"))
            .unwrap_or(self.llm_api_key);

        Ok(Self {
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            llm_provider,
            llm_api_key,
            llm_api_base_url,
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            question_temperature: parse_var(&lookup, "QUESTION_TEMPERATURE", "f32")?
                .unwrap_or(self.question_temperature),
            max_tokens: parse_var(&lookup, "LLM_MAX_TOKENS", "u32")?.unwrap_or(self.max_tokens),
            request_timeout_secs: parse_var(&lookup, "LLM_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
        })
    }

    /// 校验必填项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = Config::default()
            .merge_env(env(&[
                ("LLM_API_KEY", "k1"),
                ("LLM_MODEL_NAME", "gemini-2.0-flash"),
                ("QUESTION_TEMPERATURE", "0.7"),
                ("VERBOSE_LOGGING", "true"),
            ]))
            .unwrap();

        assert_eq!(config.llm_api_key, "k1");
        assert_eq!(config.llm_model_name, "gemini-2.0-flash");
        assert_eq!(config.question_temperature, 0.7);
        assert!(config.verbose_logging);
        assert_eq!(config.llm_provider, LlmProvider::Gemini);
    }

    #[test]
    fn test_api_key_fallback_order() {
        let config = Config::default()
            .merge_env(env(&[("API_KEY", "plain"), ("GEMINI_API_KEY", "gemini")]))
            .unwrap();
        assert_eq!(config.llm_api_key, "gemini");
    }

    #[test]
    fn test_switching_provider_switches_base_url() {
        let config = Config::default()
            .merge_env(env(&[("LLM_PROVIDER", "openai")]))
            .unwrap();
        assert_eq!(config.llm_provider, LlmProvider::OpenAi);
        assert_eq!(config.llm_api_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_bad_number_is_reported() {
        let err = Config::default()
            .merge_env(env(&[("LLM_MAX_TOKENS", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "LLM_MAX_TOKENS"));
    }

    #[test]
    fn test_unknown_provider() {
        let err = Config::default()
            .merge_env(env(&[("LLM_PROVIDER", "claude-by-fax")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider(_)));
    }

    #[test]
    fn test_file_then_env() {
        let file: FileConfig = toml::from_str(
            r#"
            llm_provider = "openai"
            llm_api_base_url = "http://localhost:8080/v1"
            llm_model_name = "qwen"
            max_tokens = 512
            "#,
        )
        .unwrap();

        let config = Config::default()
            .merge_file(&file)
            .merge_env(env(&[("LLM_MODEL_NAME", "llama")]))
            .unwrap();

        assert_eq!(config.llm_provider, LlmProvider::OpenAi);
        assert_eq!(config.llm_api_base_url, "http://localhost:8080/v1");
        assert_eq!(config.llm_model_name, "llama");
        assert_eq!(config.max_tokens, 512);
    }

    #[test]
    fn test_empty_key_fails_validation() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::MissingApiKey)
        ));
    }
}
