use std::{fmt, io, path::PathBuf};

mod auth;
mod registry;
mod tracks;

pub use auth::TokenManager;
pub use registry::PlaylistRegistryManager;
pub use registry::merge_registry;
pub use tracks::TrackTableManager;
pub use tracks::merge_track_table;

#[derive(Debug)]
pub enum StoreError {
    IoError(io::Error),
    SerdeError(serde_json::Error),
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerdeError(err)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "io error: {}", e),
            StoreError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Default location of the local database tables:
/// `<data_local_dir>/spotim3u/db`.
pub fn default_db_root() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotim3u/db");
    path
}
