//! Clock configuration
//!
//! Layered as defaults → optional JSON file → `SOWAI_*` environment.
//! Durations are humantime strings (`"333ms"`, `"1s"`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sowai_core::{BatchShape, ClockError, ClockResult};
use sowai_time::CadenceConfig;

/// Upper bound on the idle sleep so shutdown is noticed promptly
pub const MAX_IDLE_SLEEP: Duration = Duration::from_millis(250);

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "SOWAI_CONFIG";

/// Full clock configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClockConfig {
    /// Period of digit regeneration
    #[serde(with = "humantime_str")]
    pub generation_interval: Duration,
    /// Period of frame presentation
    #[serde(with = "humantime_str")]
    pub render_interval: Duration,
    /// Sleep quantum when idle
    #[serde(with = "humantime_str")]
    pub idle_sleep: Duration,
    /// Generator batch geometry
    #[serde(flatten)]
    pub shape: BatchShape,
    /// Generator model artifact
    pub model_path: PathBuf,
    /// Largest integer upscale of the composite frame
    pub max_scale: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        let cadence = CadenceConfig::default();
        ClockConfig {
            generation_interval: cadence.generation_interval,
            render_interval: cadence.render_interval,
            idle_sleep: cadence.idle_sleep,
            shape: BatchShape::default(),
            model_path: PathBuf::from("generator.onnx"),
            max_scale: 5,
        }
    }
}

impl ClockConfig {
    /// Defaults, then `SOWAI_CONFIG` file if set, then environment overrides
    pub fn load() -> ClockResult<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> ClockResult<Self> {
        serde_json::from_str(json).map_err(|e| ClockError::InvalidConfig(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ClockResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ClockError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Apply `SOWAI_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ClockResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SOWAI_GENERATION_INTERVAL") {
            self.generation_interval = parse_duration("SOWAI_GENERATION_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("SOWAI_RENDER_INTERVAL") {
            self.render_interval = parse_duration("SOWAI_RENDER_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("SOWAI_IDLE_SLEEP") {
            self.idle_sleep = parse_duration("SOWAI_IDLE_SLEEP", &v)?;
        }
        if let Some(v) = lookup("SOWAI_MODEL_PATH") {
            self.model_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SOWAI_MAX_SCALE") {
            self.max_scale = v.trim().parse().map_err(|_| {
                ClockError::InvalidConfig(format!("SOWAI_MAX_SCALE: not an integer: {:?}", v))
            })?;
        }
        Ok(())
    }

    /// Reject settings the scheduler cannot honor
    pub fn validate(&self) -> ClockResult<()> {
        if self.generation_interval.is_zero() || self.render_interval.is_zero() {
            return Err(ClockError::InvalidConfig(
                "generation and render intervals must be non-zero".into(),
            ));
        }
        if self.idle_sleep.is_zero() || self.idle_sleep > MAX_IDLE_SLEEP {
            return Err(ClockError::InvalidConfig(format!(
                "idle sleep must be within (0, {}]",
                humantime::format_duration(MAX_IDLE_SLEEP)
            )));
        }
        if self.max_scale == 0 {
            return Err(ClockError::InvalidConfig("max scale must be at least 1".into()));
        }
        self.shape.validate()
    }

    /// Cadence portion of the configuration
    pub fn cadence(&self) -> CadenceConfig {
        CadenceConfig {
            generation_interval: self.generation_interval,
            render_interval: self.render_interval,
            idle_sleep: self.idle_sleep,
        }
    }
}

fn parse_duration(key: &str, value: &str) -> ClockResult<Duration> {
    humantime::parse_duration(value.trim())
        .map_err(|e| ClockError::InvalidConfig(format!("{}: {}", key, e)))
}

mod humantime_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
