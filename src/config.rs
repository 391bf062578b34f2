use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::api_connection::endpoints::{DEFAULT_MODEL, OPENROUTER_CHAT_URL};

pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_DATA_FILE: &str = "fridge_chef.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ChefConfig {
    pub api_key_env_var: String,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    pub data_file: PathBuf,
}

impl Default for ChefConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            api_url: OPENROUTER_CHAT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl ChefConfig {
    /// Reads `CHEF_*` variables (after `.env` has been loaded by the caller),
    /// keeping defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup("CHEF_API_URL") {
            config.api_url = url;
        }
        if let Some(model) = lookup("CHEF_MODEL") {
            config.model = model;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "CHEF_TIMEOUT_SECS")? {
            if secs == 0 {
                anyhow::bail!("CHEF_TIMEOUT_SECS must be greater than zero");
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(temperature) = parse_var::<f32>(&lookup, "CHEF_TEMPERATURE")? {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = parse_var::<u32>(&lookup, "CHEF_MAX_TOKENS")? {
            config.max_tokens = max_tokens;
        }
        if let Some(path) = lookup("CHEF_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: '{}'", key, raw))
        })
        .transpose()
}
