//! Engine configuration — tweakable scrolling options and persistence.
//!
//! Options are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/pulse-scroll/config.toml` (default
//! `~/.config/pulse-scroll/config.toml`).  Unknown keys and malformed
//! values are skipped so an old config never prevents startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Errors from explicit config-file I/O.  The lenient [`ScrollConfig::load`]
/// path swallows these and falls back to defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ───────────────────────────────────────── options ───────────

/// All scrolling options, flat, with the documented defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Frame ticks per second the embedder should aim for. [Hz]
    pub frame_rate: u32,
    /// Duration of one scroll command's animation. [ms]
    pub animation_time_ms: u64,
    /// Pixels one wheel notch scrolls.
    pub step_size: f64,

    /// Shape animation progress with the pulse curve instead of linear time.
    pub pulse_algorithm: bool,
    /// Ratio of pulse "tail" to "acceleration" — input rescale factor.
    pub pulse_scale: f64,

    /// Window within which repeated input is accelerated. [ms]
    pub acceleration_delta_ms: u64,
    /// Cap on the acceleration factor.  `1.0` disables acceleration.
    pub acceleration_max: f64,

    /// Handle scroll keys (arrows, page keys, Home/End, Space).
    pub keyboard_support: bool,
    /// Pixels per arrow-key press.
    pub arrow_scroll: f64,

    /// Smooth touchpad input too; when `false`, input classified as a
    /// touchpad falls back to native scrolling.
    pub touchpad_support: bool,
    /// Keep `background-attachment: fixed` untouched; when `false`, the
    /// host is asked to switch fixed backgrounds to scrolling ones.
    pub fixed_background: bool,
    /// Selector string; a matching document disables wheel and keyboard
    /// handling entirely.  Empty = never excluded.
    pub excluded: String,

    /// Enable the middle-mouse drag-scroll mode.
    pub middle_mouse: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            animation_time_ms: 400,
            step_size: 120.0,
            pulse_algorithm: true,
            pulse_scale: 4.0,
            acceleration_delta_ms: 20,
            acceleration_max: 1.0,
            keyboard_support: true,
            arrow_scroll: 50.0,
            touchpad_support: true,
            fixed_background: true,
            excluded: String::new(),
            middle_mouse: true,
        }
    }
}

impl ScrollConfig {
    /// One scroll command's animation duration.
    pub fn animation_time(&self) -> Duration {
        Duration::from_millis(self.animation_time_ms)
    }

    /// Interval between frame ticks for timer-driven embedders
    /// (fallback when no vsync-aligned callback exists).
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.frame_rate.max(1)))
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path()).unwrap_or_default()
    }

    /// Load config from `path`.  Missing file is an error here; malformed
    /// lines inside an existing file are skipped.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&contents))
    }

    /// Persist current config to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path())
    }

    /// Persist current config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, self.serialise()).map_err(write_err)
    }

    fn parse(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "frame_rate" => {
                    if let Ok(v) = value.parse::<u32>() {
                        // Keep this bounded so frame intervals stay sane.
                        cfg.frame_rate = v.clamp(10, 240);
                    }
                }
                "animation_time_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.animation_time_ms = v.clamp(50, 5_000);
                    }
                }
                "step_size" => {
                    if let Ok(v) = value.parse::<f64>() {
                        cfg.step_size = v.clamp(1.0, 1_000.0);
                    }
                }
                "pulse_algorithm" => cfg.pulse_algorithm = value == "true",
                "pulse_scale" => {
                    if let Ok(v) = value.parse::<f64>() {
                        cfg.pulse_scale = v.clamp(1.0, 16.0);
                    }
                }
                "acceleration_delta_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.acceleration_delta_ms = v;
                    }
                }
                "acceleration_max" => {
                    if let Ok(v) = value.parse::<f64>() {
                        cfg.acceleration_max = v.max(1.0);
                    }
                }
                "keyboard_support" => cfg.keyboard_support = value == "true",
                "arrow_scroll" => {
                    if let Ok(v) = value.parse::<f64>() {
                        cfg.arrow_scroll = v.clamp(1.0, 500.0);
                    }
                }
                "touchpad_support" => cfg.touchpad_support = value == "true",
                "fixed_background" => cfg.fixed_background = value == "true",
                "excluded" => cfg.excluded = value.to_string(),
                "middle_mouse" => cfg.middle_mouse = value == "true",
                _ => {}
            }
        }

        cfg
    }

    fn serialise(&self) -> String {
        let lines = vec![
            "# pulse-scroll configuration".to_string(),
            String::new(),
            "# Scrolling core".to_string(),
            format!("frame_rate = {}", self.frame_rate),
            format!("animation_time_ms = {}", self.animation_time_ms),
            format!("step_size = {}", self.step_size),
            String::new(),
            "# Pulse easing".to_string(),
            format!("pulse_algorithm = {}", self.pulse_algorithm),
            format!("pulse_scale = {}", self.pulse_scale),
            String::new(),
            "# Acceleration".to_string(),
            format!("acceleration_delta_ms = {}", self.acceleration_delta_ms),
            format!("acceleration_max = {}", self.acceleration_max),
            String::new(),
            "# Keyboard".to_string(),
            format!("keyboard_support = {}", self.keyboard_support),
            format!("arrow_scroll = {}", self.arrow_scroll),
            String::new(),
            "# Other".to_string(),
            format!("touchpad_support = {}", self.touchpad_support),
            format!("fixed_background = {}", self.fixed_background),
            format!("excluded = \"{}\"", self.excluded),
            format!("middle_mouse = {}", self.middle_mouse),
            String::new(),
        ];
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/pulse-scroll/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("pulse-scroll").join("config.toml")
}
