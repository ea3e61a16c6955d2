// Configuration management
//
// User-facing settings persisted as TOML next to the executable. A
// missing or unreadable file silently falls back to defaults so a broken
// config never blocks a launch.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Default configuration file path
const CONFIG_FILE: &str = "emulator_config.toml";

/// Emulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    pub video: VideoConfig,
    pub audio: AudioConfig,
    pub screenshot: ScreenshotConfig,
    pub hotkeys: HotkeyConfig,
}

/// Video settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Window scale (1-8)
    pub scale: u32,
    /// Enable VSync
    pub vsync: bool,
    /// Target FPS (60 for NTSC)
    pub fps: u32,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Master volume (0.0-1.0)
    pub volume: f32,
    /// Output sample rate in Hz
    pub sample_rate: u32,
}

/// Screenshot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotConfig {
    pub directory: PathBuf,
    /// Include a timestamp in the filename
    pub include_timestamp: bool,
}

/// Hotkey names (decoded by the window shell)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    pub reset: String,
    pub screenshot: String,
    pub pause: String,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            video: VideoConfig {
                scale: 3,
                vsync: true,
                fps: 60,
            },
            audio: AudioConfig {
                enabled: true,
                volume: 0.8,
                sample_rate: 44_100,
            },
            screenshot: ScreenshotConfig {
                directory: PathBuf::from("screenshots"),
                include_timestamp: true,
            },
            hotkeys: HotkeyConfig {
                reset: "F8".to_string(),
                screenshot: "F9".to_string(),
                pause: "P".to_string(),
            },
        }
    }
}

impl EmulatorConfig {
    /// Load the configuration, falling back to defaults on any failure
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Load from the standard path
    pub fn load() -> Result<Self, io::Error> {
        let contents = fs::read_to_string(CONFIG_FILE)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Persist to the standard path
    pub fn save(&self) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(CONFIG_FILE, contents)
    }
}
