use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::page::ScrollMargins;

pub const DEFAULT_NAVIGATION_EVENTS: &[&str] =
    &["turbo:render", "turbo:load", "pjax:end", "soft-nav:end"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevimConfig {
    /// How long a typed repeat count waits for its command.
    pub count_timeout: Duration,
    pub ready_poll_interval: Duration,
    pub ready_poll_attempts: u32,
    pub scroll_margins: ScrollMargins,
    /// In-page route transitions that trigger a session check.
    pub navigation_events: Vec<String>,
}

impl Default for RevimConfig {
    fn default() -> Self {
        Self {
            count_timeout: Duration::from_millis(1000),
            ready_poll_interval: Duration::from_millis(100),
            ready_poll_attempts: 50,
            scroll_margins: ScrollMargins {
                top: 80,
                bottom: 40,
            },
            navigation_events: DEFAULT_NAVIGATION_EVENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RevimConfig {
    pub fn is_navigation_event(&self, name: &str) -> bool {
        self.navigation_events.iter().any(|e| e == name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    count_timeout_ms: Option<u64>,
    ready_poll_interval_ms: Option<u64>,
    ready_poll_attempts: Option<u32>,
    scroll_margin_top: Option<u32>,
    scroll_margin_bottom: Option<u32>,
    navigation_events: Option<Vec<String>>,
}

pub fn config_path() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("revim");
    path.push("config.toml");
    path
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Parse config file contents; unset fields keep their defaults.
pub fn parse_config(contents: &str) -> Result<RevimConfig, toml::de::Error> {
    let file: ConfigFile = toml::from_str(contents)?;
    let defaults = RevimConfig::default();

    Ok(RevimConfig {
        count_timeout: file
            .count_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.count_timeout),
        ready_poll_interval: file
            .ready_poll_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.ready_poll_interval),
        ready_poll_attempts: file
            .ready_poll_attempts
            .unwrap_or(defaults.ready_poll_attempts),
        scroll_margins: ScrollMargins {
            top: file
                .scroll_margin_top
                .unwrap_or(defaults.scroll_margins.top),
            bottom: file
                .scroll_margin_bottom
                .unwrap_or(defaults.scroll_margins.bottom),
        },
        navigation_events: file
            .navigation_events
            .unwrap_or(defaults.navigation_events),
    })
}

/// Load config from `~/.config/revim/config.toml`, falling back to defaults.
pub fn load_config() -> RevimConfig {
    let path = config_path();

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return RevimConfig::default(),
    };

    match parse_config(&contents) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
            RevimConfig::default()
        }
    }
}
