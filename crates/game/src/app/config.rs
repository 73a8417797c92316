use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use engine::{LoopConfig, DEFAULT_FADE_COLOR, DEFAULT_FADE_SECONDS};
use serde::Deserialize;
use tracing::{info, warn};

use super::scenes;

pub(crate) const CONFIG_PATH_ENV_VAR: &str = "WILDWOOD_CONFIG";
pub(crate) const FADE_SECONDS_ENV_VAR: &str = "WILDWOOD_FADE_SECONDS";
pub(crate) const START_SCENE_ENV_VAR: &str = "WILDWOOD_START_SCENE";

type ConfigResult<T> = Result<T, String>;

/// On-disk settings. Every field is optional; missing ones keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    window_title: Option<String>,
    window_width: Option<u32>,
    window_height: Option<u32>,
    /// `0` turns the cap off.
    max_render_fps: Option<u32>,
    fade_seconds: Option<f32>,
    fade_color: Option<[u8; 3]>,
    start_scene: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GameSettings {
    pub(crate) window_title: String,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) max_render_fps: Option<u32>,
    pub(crate) fade_seconds: f32,
    pub(crate) fade_color: [u8; 3],
    pub(crate) start_scene: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            window_title: "Wildwood".to_string(),
            window_width: 960,
            window_height: 540,
            max_render_fps: Some(60),
            fade_seconds: DEFAULT_FADE_SECONDS,
            fade_color: DEFAULT_FADE_COLOR,
            start_scene: scenes::MENU.to_string(),
        }
    }
}

impl GameSettings {
    /// Defaults, then the optional config file, then env overrides.
    pub(crate) fn load() -> Self {
        let mut settings = Self::default();
        if let Some(path) = env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from) {
            match load_config_file(&path) {
                Ok(file) => {
                    info!(path = %path.display(), "config_loaded");
                    settings.apply_file(file);
                }
                Err(error) => warn!(
                    path = %path.display(),
                    error = error.as_str(),
                    "config file unusable; falling back to defaults"
                ),
            }
        }
        settings.apply_env_overrides(|name| env::var(name).ok());
        settings
    }

    pub(crate) fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            window_title: self.window_title.clone(),
            window_width: self.window_width,
            window_height: self.window_height,
            max_render_fps: self.max_render_fps,
            ..LoopConfig::default()
        }
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(title) = file.window_title {
            self.window_title = title;
        }
        if let Some(width) = file.window_width.filter(|width| *width > 0) {
            self.window_width = width;
        }
        if let Some(height) = file.window_height.filter(|height| *height > 0) {
            self.window_height = height;
        }
        if let Some(fps) = file.max_render_fps {
            self.max_render_fps = (fps > 0).then_some(fps);
        }
        if let Some(seconds) = file.fade_seconds {
            match valid_fade_seconds(seconds) {
                Some(seconds) => self.fade_seconds = seconds,
                None => warn!(value = seconds, "invalid fade_seconds in config file; ignored"),
            }
        }
        if let Some(color) = file.fade_color {
            self.fade_color = color;
        }
        if let Some(scene) = file.start_scene.as_deref().and_then(non_empty_scene_name) {
            self.start_scene = scene.to_string();
        }
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(FADE_SECONDS_ENV_VAR) {
            match parse_fade_seconds(&raw) {
                Some(seconds) => self.fade_seconds = seconds,
                None => warn!(
                    env_var = FADE_SECONDS_ENV_VAR,
                    value = raw.as_str(),
                    "invalid fade-seconds env var value; falling back to config"
                ),
            }
        }
        if let Some(raw) = lookup(START_SCENE_ENV_VAR) {
            match non_empty_scene_name(&raw) {
                Some(scene) => self.start_scene = scene.to_string(),
                None => warn!(
                    env_var = START_SCENE_ENV_VAR,
                    "empty start-scene env var value; falling back to config"
                ),
            }
        }
    }
}

fn parse_fade_seconds(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().and_then(valid_fade_seconds)
}

fn valid_fade_seconds(seconds: f32) -> Option<f32> {
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

fn non_empty_scene_name(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn load_config_file(path: &Path) -> ConfigResult<ConfigFile> {
    let raw = fs::read_to_string(path).map_err(|error| format!("read config: {error}"))?;
    parse_config_json(&raw)
}

fn parse_config_json(raw: &str) -> ConfigResult<ConfigFile> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, ConfigFile>(&mut deserializer) {
        Ok(file) => Ok(file),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse config json: {source}"))
            } else {
                Err(format!("parse config json at {path}: {source}"))
            }
        }
    }
}
