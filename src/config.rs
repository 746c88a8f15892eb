use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const HF_API_TOKEN_ENV: &str = "HF_API_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "@context")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub llm_config: LlmConfig,
    #[serde(default)]
    pub translation_config: TranslationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding `index.html` and the `static/` assets
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

/// Completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub llm_provider: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub llm_api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_llm_provider() -> String {
    "openai_llm".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    256
}

fn default_system_prompt() -> String {
    "You are a helpful multilingual assistant.".to_string()
}

impl LlmConfig {
    /// Configured key, or `OPENAI_API_KEY` when the config leaves it unset
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret(self.llm_api_key.as_deref(), OPENAI_API_KEY_ENV)
    }
}

/// Translation model service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_translation_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    /// `src->tgt` to model identifier
    #[serde(default = "default_language_models")]
    pub language_models: HashMap<String, String>,
}

fn default_translation_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_language_models() -> HashMap<String, String> {
    [
        ("en->hi", "Helsinki-NLP/opus-mt-en-hi"),
        ("hi->en", "Helsinki-NLP/opus-mt-hi-en"),
        ("en->ja", "Helsinki-NLP/opus-mt-en-jap"),
        ("ja->en", "Helsinki-NLP/opus-mt-ja-en"),
    ]
    .into_iter()
    .map(|(pair, model)| (pair.to_string(), model.to_string()))
    .collect()
}

impl TranslationConfig {
    pub fn resolve_api_token(&self) -> Option<String> {
        resolve_secret(self.api_token.as_deref(), HF_API_TOKEN_ENV)
    }
}

fn resolve_secret(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .map(str::trim)
        // An unresolved ${VAR} placeholder counts as unset
        .filter(|v| !v.is_empty() && !v.starts_with("${"))
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.trim().is_empty()))
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = load_text_file(path)?;

        let path_lower = path.to_lowercase();
        let is_yaml = path_lower.ends_with(".yaml") || path_lower.ends_with(".yml");
        Self::parse(&content, is_yaml)
    }

    /// Load the first candidate file that exists.
    ///
    /// Missing files are skipped; a file that exists but fails to parse is an
    /// error. Returns `None` when no candidate exists.
    pub fn load_first(paths: &[String]) -> Result<Option<(Self, String)>> {
        for path in paths {
            if !Path::new(path).exists() {
                debug!("No config file at {}", path);
                continue;
            }
            let config = Self::load(path)
                .with_context(|| format!("Failed to load configuration from {}", path))?;
            return Ok(Some((config, path.clone())));
        }
        Ok(None)
    }

    /// Parse JSON-LD or YAML content after `${VAR}` substitution
    pub fn parse(content: &str, is_yaml: bool) -> Result<Self> {
        let content = substitute_env_vars(content);
        if content.trim().is_empty() {
            anyhow::bail!("Configuration is empty");
        }

        let config: Config = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            // @context is kept only for round-tripping
            serde_json::from_str(&content)?
        };
        Ok(config)
    }
}

/// Replace `${VAR_NAME}` with the environment value, leaving unknown names intact
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static pattern is valid");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Read a text file, dropping a UTF-8 BOM and falling back to GBK
fn load_text_file(file_path: &str) -> Result<String> {
    let bytes = fs::read(file_path)?;
    let (content, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
    if !had_errors {
        return Ok(content.into_owned());
    }
    let (content, _, _) = encoding_rs::GBK.decode(&bytes);
    Ok(content.into_owned())
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_llm_provider(),
            base_url: default_llm_base_url(),
            llm_api_key: None,
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: default_translation_base_url(),
            api_token: None,
            language_models: default_language_models(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = Config::parse("{}", false).unwrap();
        assert_eq!(config.system_config.port, 8000);
        assert_eq!(config.llm_config.llm_provider, "openai_llm");
        assert!((config.llm_config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.translation_config.language_models.len(), 4);
        assert_eq!(
            config.translation_config.language_models.get("en->ja").map(String::as_str),
            Some("Helsinki-NLP/opus-mt-en-jap")
        );
    }

    #[test]
    fn test_jsonld_context_is_accepted() {
        let content = r#"{
            "@context": {"@vocab": "https://polyglot.example.org/config#"},
            "system_config": {"port": 9100},
            "translation_config": {"language_models": {"en->de": "Helsinki-NLP/opus-mt-en-de"}}
        }"#;
        let config = Config::parse(content, false).unwrap();
        assert!(config.context.is_some());
        assert_eq!(config.system_config.port, 9100);
        assert_eq!(config.system_config.host, "0.0.0.0");
        assert_eq!(config.translation_config.language_models.len(), 1);
    }

    #[test]
    fn test_yaml_config() {
        let content = "llm_config:\n  llm_provider: ollama_llm\n  base_url: http://localhost:11434/v1\n  model: llama3\n";
        let config = Config::parse(content, true).unwrap();
        assert_eq!(config.llm_config.llm_provider, "ollama_llm");
        assert_eq!(config.llm_config.model, "llama3");
        assert_eq!(config.llm_config.max_tokens, 256);
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("POLYGLOT_TEST_SUBST_KEY", "sk-test");
        let out = substitute_env_vars(r#"{"a": "${POLYGLOT_TEST_SUBST_KEY}", "b": "${POLYGLOT_TEST_UNSET_VAR}"}"#);
        assert_eq!(out, r#"{"a": "sk-test", "b": "${POLYGLOT_TEST_UNSET_VAR}"}"#);
    }

    #[test]
    fn test_placeholder_secret_counts_as_unset() {
        assert_eq!(resolve_secret(Some("${POLYGLOT_TEST_UNSET_VAR}"), "POLYGLOT_TEST_UNSET_VAR"), None);
        assert_eq!(resolve_secret(Some(" key "), "POLYGLOT_TEST_UNSET_VAR").as_deref(), Some("key"));
        std::env::set_var("POLYGLOT_TEST_FALLBACK_KEY", "from-env");
        assert_eq!(resolve_secret(None, "POLYGLOT_TEST_FALLBACK_KEY").as_deref(), Some("from-env"));
    }

    #[test]
    fn test_empty_config_rejected() {
        assert!(Config::parse("   ", false).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load("does/not/exist.jsonld").is_err());
    }

    fn write_temp_config(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("polyglot-{}-{}", std::process::id(), name));
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_load_first_skips_missing_files() {
        let good = write_temp_config("good.jsonld", r#"{"system_config": {"port": 9100}}"#);
        let paths = vec!["does/not/exist.jsonld".to_string(), good.clone()];

        let (config, loaded_from) = Config::load_first(&paths).unwrap().unwrap();

        assert_eq!(config.system_config.port, 9100);
        assert_eq!(loaded_from, good);
        fs::remove_file(good).unwrap();
    }

    #[test]
    fn test_load_first_stops_on_malformed_file() {
        let broken = write_temp_config("broken.jsonld", r#"{"system_config": {"port": 9100,}}"#);
        let fallback = write_temp_config("fallback.jsonld", "{}");
        let paths = vec![broken.clone(), fallback.clone()];

        let err = Config::load_first(&paths).err().expect("trailing comma must not be ignored");

        assert!(err.to_string().contains(&broken));
        fs::remove_file(broken).unwrap();
        fs::remove_file(fallback).unwrap();
    }

    #[test]
    fn test_load_first_with_no_files() {
        let paths = vec!["does/not/exist.jsonld".to_string()];
        assert!(Config::load_first(&paths).unwrap().is_none());
    }
}
