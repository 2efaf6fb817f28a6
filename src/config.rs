//! Runtime configuration read from the process environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::ModelSettings;
use crate::fallback::RandomSource;
use crate::llm::{DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when unset or blank; every analysis then fails with a 500.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: ModelSettings,
    pub upstream_timeout: Duration,
    pub random: RandomSource,
    pub bind_addr: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup, so tests need not touch the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("OPENROUTER_API_KEY");
        let timeout_secs: u64 = parse_or(get("UPSTREAM_TIMEOUT_SECS"), "UPSTREAM_TIMEOUT_SECS", 30)?;
        let random = match get("FALLBACK_SEED") {
            Some(seed) => RandomSource::Seeded(
                seed.parse()
                    .with_context(|| format!("FALLBACK_SEED must be an unsigned integer, got {:?}", seed))?,
            ),
            None => RandomSource::default(),
        };

        Ok(Self {
            api_key,
            api_url: get("OPENROUTER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: ModelSettings {
                model: get("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature: parse_or(get("OPENROUTER_TEMPERATURE"), "OPENROUTER_TEMPERATURE", DEFAULT_TEMPERATURE)?,
                max_tokens: parse_or(get("OPENROUTER_MAX_TOKENS"), "OPENROUTER_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            },
            upstream_timeout: Duration::from_secs(timeout_secs),
            random,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            static_dir: get("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        })
    }
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", name, v)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.api_url, "https://openrouter.ai/api/v1/chat/completions");
        assert_eq!(cfg.model.model, "openai/gpt-4o");
        assert_eq!(cfg.model.temperature, 0.7);
        assert_eq!(cfg.model.max_tokens, 1000);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(30));
        assert_eq!(cfg.random, RandomSource::Entropy);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.static_dir, "static");
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("OPENROUTER_API_KEY", "sk-or-123"),
            ("OPENROUTER_MODEL", "anthropic/claude-3-haiku"),
            ("OPENROUTER_MAX_TOKENS", "500"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("FALLBACK_SEED", "1234"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("sk-or-123"));
        assert_eq!(cfg.model.model, "anthropic/claude-3-haiku");
        assert_eq!(cfg.model.max_tokens, 500);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(5));
        assert_eq!(cfg.random, RandomSource::Seeded(1234));
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_blank_key_is_absent() {
        let cfg = config(&[("OPENROUTER_API_KEY", "   ")]).unwrap();
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_bad_numbers_are_errors() {
        assert!(config(&[("UPSTREAM_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("OPENROUTER_TEMPERATURE", "warm")]).is_err());
        assert!(config(&[("FALLBACK_SEED", "-1")]).is_err());
    }
}
