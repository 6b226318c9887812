use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use funnel_core::LoadingTimings;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "funnel.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_filter: String,
    pub clear_screen: bool,
    pub timings: LoadingTimings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            clear_screen: true,
            timings: LoadingTimings::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    log_filter: Option<String>,
    clear_screen: Option<bool>,
    progress_period_ms: Option<u64>,
    hand_off_delay_ms: Option<u64>,
    message_period_ms: Option<u64>,
    testimonial_period_ms: Option<u64>,
}

/// Defaults, then the TOML file, then environment overrides. An explicit `path` must
/// exist; the implicit `funnel.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let file_cfg = parse_file_config(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            apply_file_config(&mut settings, file_cfg);
        }
        Err(err) if required || err.kind() != std::io::ErrorKind::NotFound => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;

    settings
        .timings
        .validate()
        .context("invalid loading timings")?;
    Ok(settings)
}

fn parse_file_config(raw: &str) -> anyhow::Result<FileConfig> {
    Ok(toml::from_str::<FileConfig>(raw)?)
}

fn apply_file_config(settings: &mut Settings, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.clear_screen {
        settings.clear_screen = v;
    }
    if let Some(v) = file_cfg.progress_period_ms {
        settings.timings.progress_period = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.hand_off_delay_ms {
        settings.timings.hand_off_delay = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.message_period_ms {
        settings.timings.message_period = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.testimonial_period_ms {
        settings.timings.testimonial_period = Duration::from_millis(v);
    }
}

fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("FUNNEL_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = lookup("APP__CLEAR_SCREEN") {
        settings.clear_screen = parse_bool(&v)
            .with_context(|| format!("APP__CLEAR_SCREEN must be true or false, got '{v}'"))?;
    }

    let periods = [
        ("APP__PROGRESS_PERIOD_MS", &mut settings.timings.progress_period),
        ("APP__HAND_OFF_DELAY_MS", &mut settings.timings.hand_off_delay),
        ("APP__MESSAGE_PERIOD_MS", &mut settings.timings.message_period),
        ("APP__TESTIMONIAL_PERIOD_MS", &mut settings.timings.testimonial_period),
    ];
    for (key, slot) in periods {
        if let Some(v) = lookup(key) {
            let millis = v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{key} must be a whole number of milliseconds"))?;
            *slot = Duration::from_millis(millis);
        }
    }

    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
