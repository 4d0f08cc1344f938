use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Cross-region inference profile used when the config does not name one.
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-6";

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8750";
const DEFAULT_STATION_MINUTES: u32 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcoeConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Station countdown duration.
    #[serde(default = "default_station_minutes")]
    pub station_minutes: u32,
    pub created_at: jiff::Timestamp,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_station_minutes() -> u32 {
    DEFAULT_STATION_MINUTES
}

impl Default for EcoeConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            region: default_region(),
            model_id: default_model_id(),
            listen_addr: default_listen_addr(),
            station_minutes: default_station_minutes(),
            created_at: jiff::Timestamp::now(),
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.ecoe.server"))
}

fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config, writing defaults on first run.
pub fn load_or_init() -> eyre::Result<EcoeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let config = EcoeConfig::default();
        save_config(&config)?;
        tracing::info!(path = %path.display(), "wrote default config");
        return Ok(config);
    }
    load_config()
}

pub fn load_config() -> eyre::Result<EcoeConfig> {
    let path = config_path()?;
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: EcoeConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})."
        ));
    }

    // v0 → v1: stamp the version; all v1 fields carry serde defaults.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1");
    }

    // Future migrations go here:
    // if from_version < 2 { ... }

    Ok(json)
}

pub fn save_config(config: &EcoeConfig) -> eyre::Result<()> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
