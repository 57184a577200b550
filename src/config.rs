//! Engine configuration: thresholds, stage size, artifact encoding.
//!
//! Defaults match the interactive tool: a 5-unit creation threshold and an
//! 800-unit wide stage. Hosts may override them from JSON or from
//! `REGION_*` environment variables.

use image::ImageFormat;
use serde::Deserialize;

/// Encoding used for crop artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    #[default]
    Png,
    Jpeg,
}

impl ArtifactFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            ArtifactFormat::Png => ImageFormat::Png,
            ArtifactFormat::Jpeg => ImageFormat::Jpeg,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactFormat::Png => "image/png",
            ArtifactFormat::Jpeg => "image/jpeg",
        }
    }

    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ArtifactFormat::Png),
            "jpeg" | "jpg" => Ok(ArtifactFormat::Jpeg),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Regions must be strictly larger than this on both axes.
    pub min_extent: f64,
    pub stage_width: f64,
    /// Stage height used before any image has been loaded.
    pub fallback_stage_height: f64,
    pub artifact_format: ArtifactFormat,
    pub mask_opacity: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_extent: 5.0,
            stage_width: 800.0,
            fallback_stage_height: 1000.0,
            artifact_format: ArtifactFormat::Png,
            mask_opacity: 0.5,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()
    }

    /// Defaults overridden by any `REGION_*` variables present in the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("REGION_MIN_EXTENT") {
            config.min_extent = parse_number("REGION_MIN_EXTENT", &v)?;
        }
        if let Some(v) = lookup("REGION_STAGE_WIDTH") {
            config.stage_width = parse_number("REGION_STAGE_WIDTH", &v)?;
        }
        if let Some(v) = lookup("REGION_ARTIFACT_FORMAT") {
            config.artifact_format = ArtifactFormat::parse(&v)?;
        }
        if let Some(v) = lookup("REGION_MASK_OPACITY") {
            config.mask_opacity = parse_number("REGION_MASK_OPACITY", &v)? as f32;
        }

        let config = config.validate()?;
        log::debug!("[CONFIG] Loaded {:?}", config);
        Ok(config)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !self.min_extent.is_finite() || self.min_extent < 0.0 {
            return Err(ConfigError::OutOfRange {
                key: "min_extent",
                value: self.min_extent,
            });
        }
        if !self.stage_width.is_finite() || self.stage_width <= 0.0 {
            return Err(ConfigError::OutOfRange {
                key: "stage_width",
                value: self.stage_width,
            });
        }
        if !self.fallback_stage_height.is_finite() || self.fallback_stage_height <= 0.0 {
            return Err(ConfigError::OutOfRange {
                key: "fallback_stage_height",
                value: self.fallback_stage_height,
            });
        }
        if !(0.0..=1.0).contains(&self.mask_opacity) {
            return Err(ConfigError::OutOfRange {
                key: "mask_opacity",
                value: f64::from(self.mask_opacity),
            });
        }
        Ok(self)
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::NotANumber {
            key,
            value: value.to_string(),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a number: '{value}'")]
    NotANumber { key: &'static str, value: String },

    #[error("{key} out of range: {value}")]
    OutOfRange { key: &'static str, value: f64 },

    #[error("Unknown artifact format '{0}' (expected png or jpeg)")]
    UnknownFormat(String),

    #[error("Invalid config JSON: {0}")]
    Json(String),
}
