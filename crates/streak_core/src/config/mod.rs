use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "STREAKCHART_CONFIG_PATH";

/// ANSI codes for the six graph intensity levels: level 0 is "no
/// completion", levels 1-5 scale with the day's count. Empty codes render
/// uncolored glyphs.
#[derive(Debug, Clone)]
pub struct Palette {
    pub levels: [&'static str; 6],
    pub reset: &'static str,
}

impl Palette {
    pub fn paint(&self, level: usize, glyph: &str) -> String {
        let code = self.levels[level.min(self.levels.len() - 1)];
        if code.is_empty() {
            glyph.to_string()
        } else {
            format!("{}{}{}", code, glyph, self.reset)
        }
    }

    pub fn is_plain(&self) -> bool {
        self.levels.iter().all(|code| code.is_empty())
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    let name = canonical_theme_name_option(theme).unwrap_or_else(|| "default".to_string());
    match name.as_str() {
        "default" => Palette {
            levels: [
                "\x1b[38;5;238m",
                "\x1b[38;5;22m",
                "\x1b[38;5;28m",
                "\x1b[38;5;34m",
                "\x1b[38;5;40m",
                "\x1b[38;5;46m",
            ],
            reset: "\x1b[0m",
        },
        "noir" => Palette {
            levels: [
                "\x1b[38;5;238m",
                "\x1b[38;5;94m",
                "\x1b[38;5;130m",
                "\x1b[38;5;166m",
                "\x1b[38;5;202m",
                "\x1b[38;5;208m",
            ],
            reset: "\x1b[0m",
        },
        _ => Palette {
            levels: ["", "", "", "", "", ""],
            reset: "",
        },
    }
}

fn canonical_theme_name_option(theme: Option<&str>) -> Option<String> {
    theme.and_then(canonical_theme_name)
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        return Some("default".into());
    }

    match trimmed {
        "green" | "light" | "vanilla" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" | "orange" => Some("noir".to_string()),
        "plain" | "none" | "no_color" | "nocolor" => Some("plain".to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(crate::storage::shared_dir()?.join(CONFIG_FILE_NAME))
}

/// Total load: a missing file is defaults, an unreadable one is defaults
/// plus the error for diagnostics. Mirrors the cache's decode-as-absent
/// policy so startup never fails on configuration.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    Ok(normalize_config_theme(config))
}

fn normalize_config_theme(mut config: Config) -> Config {
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    config
}
