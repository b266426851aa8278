pub mod commands {
    pub mod settings;
    pub mod status;
    pub mod watch;
}
pub mod models {
    pub mod cli;
    pub mod json_data;
}
pub mod utils {
    pub mod codec;
    pub mod display;
    pub mod subscriber;
    pub mod transport;
}

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const CRATE_VER: &str = env!("CARGO_PKG_VERSION");

/// Events with this name are written to the log file but never printed
pub const LOG_ONLY: &str = "log_only";

pub const DEFAULT_PORT: u16 = 25565;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// 1.21.1
pub const DEFAULT_PROTOCOL_VERSION: i32 = 767;

pub const TIMEOUT_MIN_MS: u64 = 100;
pub const TIMEOUT_MAX_MS: u64 = 60_000;
pub const POLL_INTERVAL_MAX_SECS: u64 = 3600;

const LOCAL_DATA: &str = "LOCALAPPDATA";
const XDG_DATA: &str = "XDG_DATA_HOME";

/// Platform data directory, `%LOCALAPPDATA%` on windows and the XDG data directory elsewhere
fn local_data_dir() -> Option<PathBuf> {
    std::env::var_os(LOCAL_DATA)
        .or_else(|| std::env::var_os(XDG_DATA))
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|home| Path::new(&home).join(".local").join("share"))
        })
}

/// Returns the app directory inside of the local data directory, creating it if it does not exist yet
pub fn try_init_app_dir() -> io::Result<PathBuf> {
    let mut dir = local_data_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not find a local data directory")
    })?;
    dir.push(CRATE_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
