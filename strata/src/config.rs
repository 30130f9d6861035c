//! Server configuration, loaded from a JSON5 file with a generated default
//! on first run.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use base64::{Engine, prelude::BASE64_STANDARD};
use serde::Deserialize;
use strata_protocol::CompressionInfo;

const DEFAULT_CONFIG_STR: &str = include_str!("default_config.json5");

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub server_address: SocketAddr,
    pub online_mode: bool,
    pub encryption: bool,
    pub motd: String,
    pub max_players: u32,
    pub view_distance: u8,
    pub simulation_distance: u8,
    pub enforce_secure_chat: bool,
    pub compression_threshold: Option<u32>,
    pub favicon_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Loads `path`, writing the bundled default file there first if it
    /// doesn't exist yet.
    ///
    /// # Panics
    /// Panics if the file cannot be read/written, or its contents don't
    /// parse as valid JSON5 matching this shape — a deliberately fatal
    /// startup error, matching the reference server's `load_or_create`.
    #[must_use]
    pub fn load_or_create(path: &Path) -> Self {
        let config_str = if path.exists() {
            fs::read_to_string(path).expect("failed to read server config")
        } else {
            let parent = path.parent().expect("config path has no parent directory");
            fs::create_dir_all(parent).expect("failed to create config directory");
            fs::write(path, DEFAULT_CONFIG_STR).expect("failed to write default config");
            DEFAULT_CONFIG_STR.to_owned()
        };

        let config: Self = serde_json5::from_str(&config_str).expect("failed to parse server config");
        config.validate().expect("invalid server config");
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.view_distance == 0 || self.view_distance > 32 {
            return Err("view_distance must be between 1 and 32".to_owned());
        }
        if self.simulation_distance == 0 || self.simulation_distance > 32 {
            return Err("simulation_distance must be between 1 and 32".to_owned());
        }
        if let Some(threshold) = self.compression_threshold
            && threshold < 256
        {
            return Err("compression_threshold must be at least 256".to_owned());
        }
        Ok(())
    }

    #[must_use]
    pub fn compression(&self) -> Option<CompressionInfo> {
        self.compression_threshold.map(|threshold| CompressionInfo {
            threshold: std::num::NonZeroU32::new(threshold).expect("validated above to be nonzero"),
            level: 4,
        })
    }

    const FAVICON_PREFIX: &str = "data:image/png;base64,";

    #[must_use]
    pub fn load_favicon(&self) -> Option<String> {
        let path = self.favicon_path.as_ref()?;
        let bytes = fs::read(path).ok()?;
        Some(format!("{}{}", Self::FAVICON_PREFIX, BASE64_STANDARD.encode(bytes)))
    }
}
