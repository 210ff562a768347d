//! Viewer configuration.
//!
//! Loaded once at startup from YAML, optionally overridden from the
//! environment, then validated. Missing sections take their defaults, which
//! reproduce the factory camera settings.
//!
//! ```yaml
//! display: { width: 1920, height: 1080 }
//! palettes: [jet, tab20b, gist_ncar]
//! default_palette_index: 0
//! default_interpolation: hybrid
//! overlay: { enabled_by_default: true }
//! acquisition: { fault_fill: last_good, max_attempts: 5 }
//! ```

use crate::acquire::{FaultFill, RetryPolicy};
use crate::controller::{default_binding_names, Action, KeyBindings};
use renderer::{BilateralParams, Interpolation, Palette};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thermal_common::{ThermalError, ThermalResult};
use tracing::debug;

/// Factory palette order.
pub const DEFAULT_PALETTES: &[&str] = &[
    "jet", "tab20b", "gist_ncar", "Set1", "prism", "tab20b_r", "brg_r", "bwr", "seismic",
    "coolwarm", "PiYG_r", "tab10", "tab20", "gnuplot2", "brg",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub display: DisplayConfig,
    /// Ordered palette names; the interaction controller cycles through them.
    pub palettes: Vec<String>,
    pub default_palette_index: usize,
    pub default_interpolation: InterpolationSetting,
    pub filter: FilterConfig,
    pub overlay: OverlayConfig,
    pub acquisition: AcquisitionConfig,
    /// Key name to action.
    pub bindings: BTreeMap<String, Action>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            palettes: DEFAULT_PALETTES.iter().map(|s| s.to_string()).collect(),
            default_palette_index: 0,
            default_interpolation: InterpolationSetting::Name("hybrid".to_string()),
            filter: FilterConfig::default(),
            overlay: OverlayConfig::default(),
            acquisition: AcquisitionConfig::default(),
            bindings: default_binding_names(),
        }
    }
}

/// Output surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Interpolation given by name (`hybrid`) or cycling index (`6`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterpolationSetting {
    Index(usize),
    Name(String),
}

impl InterpolationSetting {
    pub fn resolve(&self) -> ThermalResult<Interpolation> {
        match self {
            InterpolationSetting::Index(i) => i.to_string().parse(),
            InterpolationSetting::Name(name) => name.parse(),
        }
    }
}

impl From<Interpolation> for InterpolationSetting {
    fn from(value: Interpolation) -> Self {
        InterpolationSetting::Name(value.key().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled_by_default: bool,
    pub window_size: u32,
    pub sigma_color: f32,
    pub sigma_spatial: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let params = BilateralParams::default();
        Self {
            enabled_by_default: false,
            window_size: params.window_size,
            sigma_color: params.sigma_color,
            sigma_spatial: params.sigma_spatial,
        }
    }
}

impl FilterConfig {
    pub fn params(&self) -> BilateralParams {
        BilateralParams {
            window_size: self.window_size,
            sigma_color: self.sigma_color,
            sigma_spatial: self.sigma_spatial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled_by_default: bool,
    /// Top-left corner of the text, in pixels.
    pub anchor: (i32, i32),
    /// TrueType font. The built-in bitmap font is used when unset.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled_by_default: false,
            anchor: renderer::overlay::DEFAULT_ANCHOR,
            font_path: None,
            font_size: 13.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub fault_fill: FaultFill,
    /// Retry budget for retry storms. Unset retries forever.
    pub max_attempts: Option<u32>,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            fault_fill: FaultFill::Zero,
            max_attempts: None,
            initial_delay_ms: 50,
            max_delay_ms: 2000,
        }
    }
}

impl AcquisitionConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.initial_delay_ms)),
        }
    }
}

impl ViewerConfig {
    /// Load from a YAML file. Does not validate.
    pub fn from_file(path: &Path) -> ThermalResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)
            .map_err(|e| ThermalError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded viewer configuration");
        Ok(config)
    }

    /// Parse YAML. Does not validate.
    pub fn from_yaml(content: &str) -> ThermalResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ThermalError::Config(e.to_string()))
    }

    /// Apply `THERMAL_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Unparsable values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(width) = lookup("THERMAL_WIDTH").and_then(|v| v.parse().ok()) {
            self.display.width = width;
        }
        if let Some(height) = lookup("THERMAL_HEIGHT").and_then(|v| v.parse().ok()) {
            self.display.height = height;
        }
        if let Some(index) = lookup("THERMAL_PALETTE_INDEX").and_then(|v| v.parse().ok()) {
            self.default_palette_index = index;
        }
        if let Some(value) = lookup("THERMAL_INTERPOLATION") {
            if let Ok(interp) = value.parse::<Interpolation>() {
                self.default_interpolation = interp.into();
            }
        }
        if let Some(value) = lookup("THERMAL_OVERLAY") {
            match value.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.overlay.enabled_by_default = true,
                "0" | "false" | "no" | "off" => self.overlay.enabled_by_default = false,
                _ => {}
            }
        }
        if let Some(path) = lookup("THERMAL_FONT") {
            if !path.is_empty() {
                self.overlay.font_path = Some(PathBuf::from(path));
            }
        }
    }

    /// Check everything that would otherwise fail later at startup.
    pub fn validate(&self) -> ThermalResult<()> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ThermalError::Config(format!(
                "display size {}x{} is empty",
                self.display.width, self.display.height
            )));
        }

        if self.palettes.is_empty() {
            return Err(ThermalError::Config("palette list is empty".to_string()));
        }
        for name in &self.palettes {
            Palette::by_name(name)
                .map_err(|_| ThermalError::Config(format!("unknown palette '{}'", name)))?;
        }
        if self.default_palette_index >= self.palettes.len() {
            return Err(ThermalError::Config(format!(
                "default_palette_index {} is out of range for {} palettes",
                self.default_palette_index,
                self.palettes.len()
            )));
        }

        self.default_interpolation
            .resolve()
            .map_err(|e| ThermalError::Config(e.to_string()))?;

        if self.overlay.font_size <= 0.0 || !self.overlay.font_size.is_finite() {
            return Err(ThermalError::Config(format!(
                "overlay font_size must be positive, got {}",
                self.overlay.font_size
            )));
        }

        if self.acquisition.max_attempts == Some(0) {
            return Err(ThermalError::Config(
                "acquisition max_attempts must be at least 1".to_string(),
            ));
        }

        KeyBindings::from_config(&self.bindings)?;

        Ok(())
    }

    pub fn interpolation(&self) -> ThermalResult<Interpolation> {
        self.default_interpolation.resolve()
    }

    pub fn key_bindings(&self) -> ThermalResult<KeyBindings> {
        KeyBindings::from_config(&self.bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid() {
        let config = ViewerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.palettes.len(), 15);
        assert_eq!(config.interpolation().unwrap(), Interpolation::Hybrid);
        assert!(!config.overlay.enabled_by_default);
        assert_eq!(config.overlay.anchor, (30, 18));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ViewerConfig::from_yaml(
            "display: { width: 640, height: 480 }\ndefault_interpolation: 2\n",
        )
        .unwrap();
        assert_eq!(config.display.width, 640);
        assert_eq!(config.interpolation().unwrap(), Interpolation::Area);
        assert_eq!(config.filter.window_size, 15);
        assert_eq!(config.bindings.len(), 7);
    }

    #[test]
    fn test_yaml_sections() {
        let yaml = r#"
palettes: [gray, hot_r]
default_palette_index: 1
default_interpolation: lanczos
overlay:
  enabled_by_default: true
  anchor: [4, 5]
acquisition:
  fault_fill: last_good
  max_attempts: 3
  initial_delay_ms: 0
bindings:
  n: palette_next
  q: exit
"#;
        let config = ViewerConfig::from_yaml(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.overlay.anchor, (4, 5));
        assert_eq!(config.acquisition.fault_fill, FaultFill::LastGood);
        assert_eq!(config.acquisition.retry_policy().max_attempts, Some(3));
        assert_eq!(config.key_bindings().unwrap().len(), 2);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ViewerConfig::default();
        config.palettes.clear();
        assert!(config.validate().unwrap_err().is_config_error());

        let mut config = ViewerConfig::default();
        config.palettes.push("viridis_but_not".to_string());
        assert!(matches!(config.validate(), Err(ThermalError::Config(_))));

        let mut config = ViewerConfig::default();
        config.default_palette_index = 15;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.display.height = 0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.default_interpolation = InterpolationSetting::Name("sinc".to_string());
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.bindings.insert("ctrl".to_string(), Action::Exit);
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.bindings.insert("ESC".to_string(), Action::ToggleFilter);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let err = ViewerConfig::from_yaml("display: [1, 2").unwrap_err();
        assert!(err.is_config_error());
        let err = ViewerConfig::from_yaml("bindings: { d: fly_away }").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("THERMAL_WIDTH", "800"),
            ("THERMAL_HEIGHT", "not-a-number"),
            ("THERMAL_PALETTE_INDEX", "3"),
            ("THERMAL_INTERPOLATION", "bicubic"),
            ("THERMAL_OVERLAY", "true"),
            ("THERMAL_FONT", "/usr/share/fonts/mono.ttf"),
        ]
        .into_iter()
        .collect();

        let mut config = ViewerConfig::default();
        config.apply_env_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.display.width, 800);
        assert_eq!(config.display.height, 1080);
        assert_eq!(config.default_palette_index, 3);
        assert_eq!(config.interpolation().unwrap(), Interpolation::Bicubic);
        assert!(config.overlay.enabled_by_default);
        assert_eq!(
            config.overlay.font_path.as_deref(),
            Some(Path::new("/usr/share/fonts/mono.ttf"))
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thermal.yaml");
        std::fs::write(&path, "default_palette_index: 2\n").unwrap();
        assert_eq!(ViewerConfig::from_file(&path).unwrap().default_palette_index, 2);

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(ViewerConfig::from_file(&missing), Err(ThermalError::Io(_))));
    }
}
