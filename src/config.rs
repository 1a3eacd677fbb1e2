use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Label of the inline button that requests another topic
    #[serde(default = "default_next_button_label")]
    pub next_button_label: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_topics_path")]
    pub topics_path: PathBuf,
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_next_button_label() -> String {
    "Следующая тема".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_webhook_path() -> String {
    "/".to_string()
}

fn default_topics_path() -> PathBuf {
    PathBuf::from("topics.txt")
}

fn default_rules_path() -> PathBuf {
    PathBuf::from("rules.txt")
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_url: default_api_url(),
            next_button_label: default_next_button_label(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            topics_path: default_topics_path(),
            rules_path: default_rules_path(),
        }
    }
}

impl Config {
    /// Load the TOML file at `path` (all defaults if it does not exist),
    /// then apply `BOTTOKEN` and `PORT` from the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override file values with environment variables. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("BOTTOKEN") {
            self.telegram.bot_token = token;
        }

        if let Some(port) = non_empty("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }

        Ok(())
    }

    /// Webhook route, always starting with `/`. Route parameter and
    /// wildcard syntax is rejected.
    pub fn webhook_path(&self) -> Result<String> {
        let path = self.server.webhook_path.trim();
        if path.contains(['{', '}', '*']) {
            anyhow::bail!("Invalid webhook_path {:?}: must be a literal path", path);
        }
        if path.starts_with('/') {
            Ok(path.to_string())
        } else {
            Ok(format!("/{}", path))
        }
    }

    /// Socket address the webhook server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
