//! Configuration types for SVG import.
//!
//! All import behaviour is controlled through [`ImportConfig`], built via its
//! [`ImportConfigBuilder`] or deserialised from a partial JSON options record.
//! Any field the caller leaves out keeps its documented default, so
//! `{"unitPx": 2}` is a complete, valid configuration.

use crate::error::ImportError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Configuration for one SVG import.
///
/// Built via [`ImportConfig::builder()`] or using [`ImportConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_svg2path::ImportConfig;
///
/// let config = ImportConfig::builder()
///     .unit_px(2.0)
///     .skip_tiny_segments_px(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_elements, 100_000);
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// Bake transforms into coordinates. Default: true.
    ///
    /// The extractor always bakes transforms today; the flag is carried
    /// through to the flatten stage for extractors that defer them.
    pub flatten_transforms: bool,

    /// Scale applied to every resolved document length. Default: 1.0.
    pub unit_px: f64,

    /// Maximum number of elements in the source tree. Default: 100 000.
    ///
    /// Exceeding it is fatal: the validator aborts the run.
    pub max_elements: usize,

    /// Maximum number of command letters in one extracted path. Default: 100 000.
    pub max_commands_per_path: usize,

    /// Minimum distance between consecutive emitted points. Default: 0.25.
    ///
    /// Also a lower bound for the significance floor applied by the validator.
    pub skip_tiny_segments_px: f64,

    /// How paint values are canonicalised. Default: [`ColorResolution::Full`].
    pub color_resolution: ColorResolution,

    /// Receives one event per stage boundary. Default: None.
    #[serde(skip)]
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            flatten_transforms: true,
            unit_px: 1.0,
            max_elements: 100_000,
            max_commands_per_path: 100_000,
            skip_tiny_segments_px: 0.25,
            color_resolution: ColorResolution::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ImportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportConfig")
            .field("flatten_transforms", &self.flatten_transforms)
            .field("unit_px", &self.unit_px)
            .field("max_elements", &self.max_elements)
            .field("max_commands_per_path", &self.max_commands_per_path)
            .field("skip_tiny_segments_px", &self.skip_tiny_segments_px)
            .field("color_resolution", &self.color_resolution)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ImportProgressCallback>"),
            )
            .finish()
    }
}

impl ImportConfig {
    /// Create a new builder for `ImportConfig`.
    pub fn builder() -> ImportConfigBuilder {
        ImportConfigBuilder {
            config: Self::default(),
        }
    }

    /// Merge a partial JSON options record over the defaults and validate it.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        let config: ImportConfig = serde_json::from_str(json)
            .map_err(|e| ImportError::InvalidConfig(format!("options record: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Turn this config back into a builder, e.g. to layer CLI flags on top of
    /// a config file.
    pub fn into_builder(self) -> ImportConfigBuilder {
        ImportConfigBuilder { config: self }
    }

    fn validate(&self) -> Result<(), ImportError> {
        if !self.unit_px.is_finite() || self.unit_px <= 0.0 {
            return Err(ImportError::InvalidConfig(format!(
                "unitPx must be a positive number, got {}",
                self.unit_px
            )));
        }
        if self.max_elements == 0 {
            return Err(ImportError::InvalidConfig("maxElements must be ≥ 1".into()));
        }
        if self.max_commands_per_path == 0 {
            return Err(ImportError::InvalidConfig(
                "maxCommandsPerPath must be ≥ 1".into(),
            ));
        }
        if !self.skip_tiny_segments_px.is_finite() || self.skip_tiny_segments_px < 0.0 {
            return Err(ImportError::InvalidConfig(format!(
                "skipTinySegmentsPx must be ≥ 0, got {}",
                self.skip_tiny_segments_px
            )));
        }
        Ok(())
    }
}

/// Builder for [`ImportConfig`].
pub struct ImportConfigBuilder {
    config: ImportConfig,
}

impl fmt::Debug for ImportConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ImportConfigBuilder {
    pub fn flatten_transforms(mut self, v: bool) -> Self {
        self.config.flatten_transforms = v;
        self
    }

    pub fn unit_px(mut self, px: f64) -> Self {
        self.config.unit_px = px;
        self
    }

    pub fn max_elements(mut self, n: usize) -> Self {
        self.config.max_elements = n;
        self
    }

    pub fn max_commands_per_path(mut self, n: usize) -> Self {
        self.config.max_commands_per_path = n;
        self
    }

    pub fn skip_tiny_segments_px(mut self, px: f64) -> Self {
        self.config.skip_tiny_segments_px = px;
        self
    }

    pub fn color_resolution(mut self, mode: ColorResolution) -> Self {
        self.config.color_resolution = mode;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(Arc::clone(&cb));
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ImportConfig, ImportError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How `fill`/`stroke` values are turned into `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorResolution {
    /// Full CSS color grammar: hex, `rgb()`, `hsl()`, every named color. (default)
    #[default]
    Full,
    /// Degraded fallback: only black, white, red, green and blue are known;
    /// anything else passes through unchanged.
    Basic,
}
