//! Key manager configuration.
//!
//! The key manager is driven by three settings supplied by the hosting
//! server's configuration layer: whether key management is enabled at
//! all, the command used to obtain the cluster passphrase, and the data
//! directory under which the key store directories live.

use std::path::{Path, PathBuf};

/// Directory holding the authoritative wrapped keys, relative to the
/// data directory.
pub const KMGR_DIR: &str = "cryptokeys";

/// Staging directory used during passphrase rotation. Its existence at
/// startup means the last rotation did not complete.
pub const KMGR_TMP_DIR: &str = "cryptokeys_tmp";

/// Configuration for the key manager
#[derive(Debug, Clone)]
pub struct KmgrConfig {
    /// Whether key management is enabled for this cluster
    pub enabled: bool,
    /// Command executed to obtain the cluster passphrase. `%p` is
    /// substituted with a prompt string, `%%` with a literal `%`.
    pub passphrase_command: String,
    /// Cluster data directory containing the key store
    pub data_dir: PathBuf,
}

impl KmgrConfig {
    /// Create a new configuration with key management enabled
    pub fn new<P: AsRef<Path>>(data_dir: P, passphrase_command: &str) -> Self {
        Self {
            enabled: true,
            passphrase_command: passphrase_command.to_string(),
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the live key store directory
    pub fn key_dir(&self) -> PathBuf {
        self.data_dir.join(KMGR_DIR)
    }

    /// Path of the rotation staging directory
    pub fn tmp_dir(&self) -> PathBuf {
        self.data_dir.join(KMGR_TMP_DIR)
    }
}
