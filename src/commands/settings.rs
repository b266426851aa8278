use crate::{
    DEFAULT_POLL_INTERVAL, DEFAULT_PORT, DEFAULT_PROTOCOL_VERSION, DEFAULT_TIMEOUT, LOG_ONLY,
    POLL_INTERVAL_MAX_SECS, TIMEOUT_MAX_MS, TIMEOUT_MIN_MS, commands::status::ProbeOptions,
};

use std::{
    io::{self, ErrorKind},
    path::Path,
    time::Duration,
};

use constcat::concat;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, warn};

const SETTINGS: &str = "settings.json";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    #[serde(deserialize_with = "timeout_deserializer")]
    pub timeout_ms: u64,
    pub protocol_version: i32,
    #[serde(deserialize_with = "interval_deserializer")]
    pub poll_interval_secs: u64,
}

fn timeout_deserializer<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(i64::deserialize(deserializer)?.clamp(TIMEOUT_MIN_MS as i64, TIMEOUT_MAX_MS as i64) as u64)
}

fn interval_deserializer<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(i64::deserialize(deserializer)?.clamp(1, POLL_INTERVAL_MAX_SECS as i64) as u64)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
        }
    }
}

impl Settings {
    /// Reads `settings.json` from `local_env_dir`. A missing or unreadable file is replaced with the defaults.
    pub fn init(local_env_dir: Option<&Path>) -> Self {
        let Some(settings_path) = local_env_dir.map(|dir| dir.join(SETTINGS)) else {
            warn!("Used default app settings");
            return Self::default();
        };

        let mut not_found = false;
        let res = match std::fs::read(&settings_path) {
            Ok(data) => serde_json::from_slice::<Self>(&data).map_err(|err| {
                error!("{err}, in {SETTINGS}");
            }),
            Err(err) => {
                if err.kind() == ErrorKind::NotFound {
                    not_found = true;
                    info!(name: LOG_ONLY, "{}", concat!(SETTINGS, " not found"))
                } else {
                    error!("Failed to read {SETTINGS}");
                    error!(name: LOG_ONLY, "{err}, reading file: {}", settings_path.display())
                };
                Err(())
            }
        };

        match res {
            Ok(settings) => {
                info!(name: LOG_ONLY, "Settings loaded!");
                settings
            }
            Err(()) => {
                let settings = Self::default();
                if let Err(err) = settings.write(&settings_path) {
                    error!(name: LOG_ONLY, "{err}, failed to write file: {}", settings_path.display())
                } else if not_found {
                    info!(name: LOG_ONLY, "Settings file created at: {}", settings_path.display())
                } else {
                    info!("New {SETTINGS} created")
                }
                settings
            }
        }
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        info!(name: LOG_ONLY, "{SETTINGS} saved!");
        Ok(())
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions::new(self.host.as_str(), self.port)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_protocol_version(self.protocol_version)
    }
}
