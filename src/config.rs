use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::comments;

const DEFAULT_ENV_PREFIX: &str = "HN_PAGER";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub hackernews: HackerNewsConfig,
    #[serde(default)]
    pub ui: UIConfig,
    #[serde(default)]
    pub debug: DebugConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HackerNewsConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            page_size: default_page_size(),
            timeout: default_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    format!("hn-pager/{}", crate::VERSION)
}

fn default_page_size() -> usize {
    30
}

fn default_timeout() -> Duration {
    Duration::from_secs(20)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UIConfig {
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
    #[serde(default)]
    pub comment_width: usize,
    #[serde(default = "default_status_lifetime", with = "humantime_serde")]
    pub status_lifetime: Duration,
    #[serde(default = "default_true")]
    pub shuffle_categories: bool,
    #[serde(default = "default_true")]
    pub mark_as_read: bool,
    #[serde(default = "default_pager")]
    pub pager: Vec<String>,
    #[serde(default = "default_moderators")]
    pub moderators: Vec<String>,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            comment_width: 0,
            status_lifetime: default_status_lifetime(),
            shuffle_categories: true,
            mark_as_read: true,
            pager: default_pager(),
            moderators: default_moderators(),
        }
    }
}

fn default_indent_size() -> usize {
    comments::DEFAULT_INDENT_SIZE
}

fn default_status_lifetime() -> Duration {
    Duration::from_secs(1)
}

fn default_true() -> bool {
    true
}

fn default_pager() -> Vec<String> {
    vec!["less".into(), "-R".into()]
}

fn default_moderators() -> Vec<String> {
    comments::DEFAULT_MODERATORS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DebugConfig {
    #[serde(default)]
    pub mock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("hn-pager").join("hn-pager.log"))
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        let from_file = read_config_file(path)?;
        cfg = merge_config(cfg, from_file);
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.hackernews.user_agent.is_empty() {
        base.hackernews.user_agent = other.hackernews.user_agent;
    }
    if other.hackernews.page_size != 0 {
        base.hackernews.page_size = other.hackernews.page_size;
    }
    if !other.hackernews.timeout.is_zero() {
        base.hackernews.timeout = other.hackernews.timeout;
    }

    if other.ui.indent_size != 0 {
        base.ui.indent_size = other.ui.indent_size;
    }
    base.ui.comment_width = other.ui.comment_width;
    base.ui.status_lifetime = other.ui.status_lifetime;
    base.ui.shuffle_categories = other.ui.shuffle_categories;
    base.ui.mark_as_read = other.ui.mark_as_read;
    if !other.ui.pager.is_empty() {
        base.ui.pager = other.ui.pager;
    }
    base.ui.moderators = other.ui.moderators;

    base.debug.mock = other.debug.mock;

    if !other.log.level.is_empty() {
        base.log.level = other.log.level;
    }
    if other.log.file.is_some() {
        base.log.file = other.log.file;
    }

    base
}

fn apply_env(cfg: &mut Config, prefix: &str) {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(cfg, &key, value);
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "hackernews.user_agent" => cfg.hackernews.user_agent = value,
        "hackernews.page_size" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.hackernews.page_size = parsed;
            }
        }
        "hackernews.timeout" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.hackernews.timeout = duration;
            }
        }
        "ui.indent_size" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.ui.indent_size = parsed;
            }
        }
        "ui.comment_width" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.ui.comment_width = parsed;
            }
        }
        "ui.status_lifetime" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.ui.status_lifetime = duration;
            }
        }
        "ui.shuffle_categories" => cfg.ui.shuffle_categories = truthy(&value),
        "ui.mark_as_read" => cfg.ui.mark_as_read = truthy(&value),
        "ui.pager" => cfg.ui.pager = split_list(&value),
        "ui.moderators" => cfg.ui.moderators = split_list(&value),
        "debug.mock" => cfg.debug.mock = truthy(&value),
        "log.level" => cfg.log.level = value,
        "log.file" => cfg.log.file = Some(PathBuf::from(value)),
        _ => {}
    }
}

fn truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "True")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn default_path() -> Option<PathBuf> {
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hn-pager").join("config.yaml"))
}
