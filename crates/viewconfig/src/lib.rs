use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level viewer configuration as stored in `cubeview.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewerConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub surface: SurfaceSection,
    #[serde(default)]
    pub animation: AnimationSection,
    #[serde(default)]
    pub scene: SceneSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub start_paused: bool,
}

/// Requested drawable attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceSection {
    /// Bits per colour channel.
    pub color_bits: u8,
    pub double_buffer: bool,
    pub depth_bits: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationSection {
    #[serde(
        deserialize_with = "deserialize_interval",
        serialize_with = "serialize_interval"
    )]
    pub interval: Duration,
    pub step_degrees: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneSection {
    pub clear_color: [f32; 4],
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            window: WindowSection::default(),
            surface: SurfaceSection::default(),
            animation: AnimationSection::default(),
            scene: SceneSection::default(),
        }
    }
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "3D Viewer".to_string(),
            width: 640,
            height: 520,
            start_paused: false,
        }
    }
}

impl Default for SurfaceSection {
    fn default() -> Self {
        Self {
            color_bits: 8,
            double_buffer: true,
            depth_bits: 16,
        }
    }
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(33),
            step_degrees: 2.0,
        }
    }
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            clear_color: [0.05, 0.07, 0.12, 1.0],
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 40.0,
            distance: 6.0,
        }
    }
}

/// Accepts either a human-readable duration (`"33ms"`, `"1s"`) or a bare
/// integer number of milliseconds.
fn deserialize_interval<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of milliseconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            parse_interval(v).map_err(E::custom)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_millis(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("interval must be non-negative"));
            }
            Ok(Duration::from_millis(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("interval must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v / 1000.0))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn serialize_interval<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

/// Parses an animation interval the same way the config file does.
pub fn parse_interval(raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("interval must not be empty".to_string());
    }
    if let Ok(millis) = trimmed.parse::<u64>() {
        return Ok(Duration::from_millis(millis));
    }
    humantime::parse_duration(trimmed).map_err(|err| format!("invalid interval '{trimmed}': {err}"))
}

impl ViewerConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: ViewerConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(
                "window width and height must be greater than zero".into(),
            ));
        }

        if !matches!(self.surface.color_bits, 8 | 10) {
            return Err(ConfigError::Invalid(format!(
                "surface.color_bits must be 8 or 10 (got {})",
                self.surface.color_bits
            )));
        }

        if !matches!(self.surface.depth_bits, 16 | 24 | 32) {
            return Err(ConfigError::Invalid(format!(
                "surface.depth_bits must be 16, 24 or 32 (got {})",
                self.surface.depth_bits
            )));
        }

        if self.animation.interval.is_zero() {
            return Err(ConfigError::Invalid(
                "animation.interval must be greater than zero".into(),
            ));
        }

        let step = self.animation.step_degrees;
        if !(step > 0.0 && step <= 360.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.step_degrees must be in (0, 360] (got {step})"
            )));
        }

        let scene = &self.scene;
        if !(scene.fov_y_degrees > 0.0 && scene.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "scene.fov_y_degrees must be in (0, 180) (got {})",
                scene.fov_y_degrees
            )));
        }

        if !(scene.near > 0.0 && scene.near < scene.far) {
            return Err(ConfigError::Invalid(format!(
                "scene planes must satisfy 0 < near < far (got near={}, far={})",
                scene.near, scene.far
            )));
        }

        if scene.distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "scene.distance must be greater than zero".into(),
            ));
        }

        if scene
            .clear_color
            .iter()
            .any(|component| !(0.0..=1.0).contains(component))
        {
            return Err(ConfigError::Invalid(
                "scene.clear_color components must be within [0, 1]".into(),
            ));
        }

        Ok(())
    }
}
