use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use crate::key_utils::convert;
use crate::orbit::OrbitSettings;

/// Environment variable pointing to the folder which holds all config files.
pub const CONFIG_DIR_ENV: &str = "ORBIT_CONFIG_DIR";
pub const DEFAULT_CONFIG_DIR: &str = "config";

const GRAPHICS_FILE: &str = "graphics.toml";
const INPUT_FILE: &str = "input.toml";
const ORBIT_FILE: &str = "orbit.toml";

// =================================================================================================
//
//                                            Global
//
// =================================================================================================

#[derive(Resource, Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct GlobalConfig {
    pub graphics_config: GraphicsConfig,
    pub input_config: InputConfig,
    pub orbit_config: OrbitSettings,
}

impl GlobalConfig {

    /// Loads a configuration file and deserializes it into the specified type.
    ///
    /// # Arguments
    /// - `path`: The file path of the configuration file to load.
    ///
    /// # Returns
    /// - `Ok(T)`: The deserialized configuration data.
    /// - `Err(ConfigError)`: The file could not be read or is no valid TOML for `T`.
    pub fn load<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
        let content = read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Same as [`GlobalConfig::load`] but falls back to `T::default()` and logs a warning.
    fn load_or_default<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
        Self::load(path).unwrap_or_else(|err| {
            warn!("{err}, using defaults");
            T::default()
        })
    }

    /// Returns the config folder, taken from `ORBIT_CONFIG_DIR` or `config/` otherwise.
    pub fn config_dir() -> PathBuf {
        std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR))
    }

    /// Creates a new `GlobalConfig` instance and loads all configuration files from
    /// [`GlobalConfig::config_dir`].
    pub fn new() -> Self {
        Self::from_dir(&Self::config_dir())
    }

    /// Loads graphics, input and orbit configuration from `dir`. Missing or broken files
    /// are replaced by their defaults.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            graphics_config: Self::load_or_default(&dir.join(GRAPHICS_FILE)),
            input_config: Self::load_or_default(&dir.join(INPUT_FILE)),
            orbit_config: Self::load_or_default(&dir.join(ORBIT_FILE)),
        }
    }

    /// Saves a specified file with his name.
    fn save<T: Serialize>(data: &T, path: &Path) -> std::io::Result<()> {
        let toml_string = toml::to_string_pretty(data)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        write(path, toml_string)
    }

    /// Writes every config file which does not exist yet in `dir`, using the values of `self`.
    /// Existing files are never touched.
    pub fn write_missing(&self, dir: &Path) -> std::io::Result<()> {
        create_dir_all(dir)?;
        let graphics = dir.join(GRAPHICS_FILE);
        if !graphics.exists() {
            Self::save(&self.graphics_config, &graphics)?;
        }
        let input = dir.join(INPUT_FILE);
        if !input.exists() {
            Self::save(&self.input_config, &input)?;
        }
        let orbit = dir.join(ORBIT_FILE);
        if !orbit.exists() {
            Self::save(&self.orbit_config, &orbit)?;
        }
        Ok(())
    }

}

// =================================================================================================
//
//                                            Graphics
//
// =================================================================================================

/// Serializable graphics configuration for windowing.
/// Stores a human-readable resolution string (e.g. `"1270x720"`) and toggles for
/// fullscreen and vertical sync.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GraphicsConfig {
    /// Window resolution string in the form `"<width>x<height>"`.
    pub window_resolution: String,

    /// Whether to start in fullscreen mode.
    pub fullscreen: bool,
    /// Whether to enable vertical sync.
    pub vsync: bool,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            window_resolution: String::from("1270x720"),
            fullscreen: false,
            vsync: true,
        }
    }
}

impl GraphicsConfig {

    /// Parses and returns the configured window width in pixels.
    ///
    /// Falls back to `1280` if parsing fails.
    pub fn get_window_width(&self) -> u32 {
        let (width, _) = parse_resolution(self.window_resolution.as_str())
            .unwrap_or((1280, 720));
        width
    }

    /// Parses and returns the configured window height in pixels.
    ///
    /// Falls back to `720` if parsing fails.
    pub fn get_window_height(&self) -> u32 {
        let (_, height) = parse_resolution(self.window_resolution.as_str())
            .unwrap_or((1280, 720));
        height
    }
}

// =================================================================================================
//
//                                            Input
//
// =================================================================================================

/// Serializable input configuration for the demo host.
/// Stores human-readable key strings (e.g. "F1", "X") that are later converted into
/// engine `KeyCode`s at runtime.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Toggle developer inspector overlay.
    pub inspector: String,
    /// Switch the X input channel between bound and unbound.
    pub freeze_x: String,
    /// Switch the Y input channel between bound and unbound.
    pub freeze_y: String,
    /// Toggle smoothing on every orbit controller.
    pub toggle_smoothing: String,

    /// Mouse pixels are multiplied with this before they reach the input slots.
    pub mouse_scale: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            inspector: String::from("F1"),
            freeze_x: String::from("X"),
            freeze_y: String::from("Y"),
            toggle_smoothing: String::from("S"),

            mouse_scale: 0.1,
        }
    }
}

impl InputConfig {
    pub fn get_inspector_key(&self) -> KeyCode {
        convert(self.inspector.as_str()).unwrap_or(KeyCode::F1)
    }

    pub fn get_freeze_x_key(&self) -> KeyCode {
        convert(self.freeze_x.as_str()).unwrap_or(KeyCode::KeyX)
    }

    pub fn get_freeze_y_key(&self) -> KeyCode {
        convert(self.freeze_y.as_str()).unwrap_or(KeyCode::KeyY)
    }

    pub fn get_toggle_smoothing_key(&self) -> KeyCode {
        convert(self.toggle_smoothing.as_str()).unwrap_or(KeyCode::KeyS)
    }

}

// =================================================================================================
//
//                                         Internal Func
//
// =================================================================================================

/// Parses a resolution string in the form `"<width>x<height>"` (case-insensitive `x`)
/// into a pair of positive dimensions.
///
/// Accepts optional surrounding whitespace and trims each side. Width and
/// height must parse to numbers greater than zero; otherwise an error string
/// is returned.
///
/// # Parameters
/// * `s` - Input string like `"1280x720"` or `"1920X1080"`.
fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w_str, h_str) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Wrong Format: '{}'. Example z. B. 1280x720", s))?;

    let w: u32 = w_str.trim().parse()
        .map_err(|_| format!("Width is not a number: '{}'", w_str.trim()))?;
    let h: u32 = h_str.trim().parse()
        .map_err(|_| format!("Height is not a number: '{}'", h_str.trim()))?;

    if w == 0 || h == 0 {
        return Err("Width / Height needs a positive number like > 0".into());
    }
    Ok((w, h))
}
