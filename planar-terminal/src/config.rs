/// Loading of planar.toml
///
/// Every field is optional; a missing file or section falls back to the
/// defaults below.
use planar_core::{ControllerSettings, InputEvent, InteractiveState, ViewportParams};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "planar.toml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub surface: SurfaceConfig,
    pub controls: ControlsConfig,
    pub keys: KeyConfig,
    pub frame: FrameConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    pub zoom_step: f32,
    pub angle_step_degrees: f32,
    pub test_mode: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.1,
            angle_step_degrees: 180.0 / 16.0,
            test_mode: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyConfig {
    pub zoom_in: char,
    pub zoom_out: char,
    pub reset: char,
    pub rotate_left: char,
    pub rotate_right: char,
    pub cycle_mode: char,
    pub toggle_test: char,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            zoom_in: '=',
            zoom_out: '-',
            reset: '0',
            rotate_left: '[',
            rotate_right: ']',
            cycle_mode: 'o',
            toggle_test: 't',
        }
    }
}

impl KeyConfig {
    /// Decode a pressed key into a controller event.
    pub fn event_for(&self, key: char) -> Option<InputEvent> {
        [
            (self.zoom_in, InputEvent::ZoomIn),
            (self.zoom_out, InputEvent::ZoomOut),
            (self.reset, InputEvent::Reset),
            (self.rotate_left, InputEvent::RotateLeft),
            (self.rotate_right, InputEvent::RotateRight),
            (self.cycle_mode, InputEvent::CycleProjectionMode),
            (self.toggle_test, InputEvent::ToggleTestMode),
        ]
        .into_iter()
        .find_map(|(bound, event)| (bound == key).then_some(event))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    pub fps: u32,
    pub log_file: PathBuf,
    /// Log every vertex mapping at debug level.
    pub trace_vertices: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            log_file: PathBuf::from("planar.log"),
            trace_vertices: false,
        }
    }
}

impl AppConfig {
    /// Load from `path` if given, else `planar.toml` in the working
    /// directory if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface must be non-empty, got {}x{}",
                self.surface.width, self.surface.height
            )));
        }
        if !self.controls.zoom_step.is_finite() || self.controls.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be greater than 1, got {}",
                self.controls.zoom_step
            )));
        }
        if !self.controls.angle_step_degrees.is_finite() {
            return Err(ConfigError::Invalid("angle_step_degrees must be finite".to_string()));
        }
        if self.frame.fps == 0 {
            return Err(ConfigError::Invalid("fps must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn viewport(&self) -> ViewportParams {
        ViewportParams::new(self.surface.width, self.surface.height)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            zoom_step: self.controls.zoom_step,
            angle_step: self.controls.angle_step_degrees.to_radians(),
        }
    }

    pub fn initial_state(&self) -> InteractiveState {
        InteractiveState {
            test_mode: self.controls.test_mode,
            ..InteractiveState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.viewport(), ViewportParams::new(640, 640));
        let settings = config.controller_settings();
        assert!((settings.angle_step - std::f32::consts::PI / 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::parse(
            r#"
            [surface]
            width = 800

            [keys]
            cycle_mode = "m"
            "#,
        )
        .unwrap();
        assert_eq!(config.surface.width, 800);
        assert_eq!(config.surface.height, 640);
        assert_eq!(config.keys.event_for('m'), Some(InputEvent::CycleProjectionMode));
        assert_eq!(config.keys.event_for('o'), None);
    }

    #[test]
    fn test_default_key_bindings() {
        let keys = KeyConfig::default();
        assert_eq!(keys.event_for('='), Some(InputEvent::ZoomIn));
        assert_eq!(keys.event_for(']'), Some(InputEvent::RotateRight));
        assert_eq!(keys.event_for('t'), Some(InputEvent::ToggleTestMode));
        assert_eq!(keys.event_for('x'), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = AppConfig::parse("[controls]\nzoom_step = 1.0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = AppConfig::parse("[surface]\nwidth = 0\n").unwrap();
        assert!(config.validate().is_err());

        assert!(matches!(
            AppConfig::parse("[surface]\nwidth = \"wide\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[controls]\ntest_mode = false\n[frame]\nfps = 60").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert!(!config.initial_state().test_mode);
        assert_eq!(config.frame.fps, 60);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        match AppConfig::load(Some(&missing)) {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
