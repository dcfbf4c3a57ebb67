/*!
 * Error Handling for the Cluster Key Manager
 *
 * Provides the error taxonomy shared by all key management operations,
 * with numeric error codes for operator-facing diagnostics.
 */

use thiserror::Error;

/// Result type used throughout the key manager.
pub type KmgrResult<T> = Result<T, KmgrError>;

/// Error type for all key management operations
#[derive(Debug, Error)]
pub enum KmgrError {
    /// Key management is disabled or a required backend is missing.
    /// Surfaced immediately; the operation performs no state change.
    #[error("configuration error: {operation} - {cause}")]
    ConfigurationError {
        operation: String,
        cause: String,
        error_code: u32,
    },

    /// The supplied passphrase is below the minimum length. Raised
    /// before any derivation or file I/O takes place.
    #[error("passphrase must be at least {minimum} bytes, got {length}")]
    WeakPassphrase { length: usize, minimum: usize },

    /// Unwrap verification failed. A wrong passphrase and corrupted
    /// ciphertext are deliberately indistinguishable.
    #[error("cluster passphrase does not match expected passphrase")]
    PassphraseMismatch,

    /// The on-disk key store has a file count or size anomaly outside
    /// the recognized crash-recovery patterns.
    #[error("corrupted key store \"{path}\": {cause}")]
    CorruptStore {
        path: String,
        cause: String,
        error_code: u32,
    },

    /// An OS-level filesystem failure. Fatal to the current operation;
    /// fatal to startup when raised during recovery.
    #[error("could not {operation} \"{path}\": {source}")]
    Filesystem {
        operation: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The passphrase command could not be executed or did not succeed.
    #[error("passphrase command failed: {cause}")]
    PassphraseCommand { cause: String, error_code: u32 },

    /// The secure random source is unavailable. Non-recoverable, key
    /// material cannot be faked.
    #[error("random number generation failed: {cause}")]
    RandomSource { cause: String },

    /// Other key management failure.
    #[error("key management error: {operation} - {cause}")]
    KeyManagement {
        operation: String,
        cause: String,
        error_code: u32,
    },
}

/// Error code constants for different error categories
pub mod error_codes {
    // Configuration errors: 1000-1999
    pub const FEATURE_DISABLED: u32 = 1001;
    pub const BACKEND_UNAVAILABLE: u32 = 1002;

    // Key codec errors: 2000-2999
    pub const KEY_DERIVATION_FAILED: u32 = 2001;
    pub const KEY_WRAP_FAILED: u32 = 2002;
    pub const KEY_UNWRAP_FAILED: u32 = 2003;
    pub const INVALID_KEY_LENGTH: u32 = 2004;

    // Store errors: 3000-3999
    pub const STORE_INVALID_IDENTIFIER: u32 = 3001;
    pub const STORE_TOO_MANY_KEYS: u32 = 3002;
    pub const STORE_SIZE_MISMATCH: u32 = 3003;
    pub const STORE_INCOMPLETE: u32 = 3004;

    // Passphrase command errors: 4000-4999
    pub const COMMAND_SPAWN_FAILED: u32 = 4001;
    pub const COMMAND_EXITED_NONZERO: u32 = 4002;

    // Rotation errors: 5000-5999
    pub const ROTATION_FAILED: u32 = 5001;
}

impl KmgrError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            KmgrError::ConfigurationError { error_code, .. } => *error_code,
            KmgrError::WeakPassphrase { .. } => 4101,
            KmgrError::PassphraseMismatch => 2003,
            KmgrError::CorruptStore { error_code, .. } => *error_code,
            KmgrError::Filesystem { .. } => 9001,
            KmgrError::PassphraseCommand { error_code, .. } => *error_code,
            KmgrError::RandomSource { .. } => 9002,
            KmgrError::KeyManagement { error_code, .. } => *error_code,
        }
    }

    /// Create a configuration error
    pub fn configuration(operation: &str, cause: &str, error_code: u32) -> Self {
        KmgrError::ConfigurationError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    /// Create a corrupt-store error for the given directory or file
    pub fn corrupt_store(path: &std::path::Path, cause: &str, error_code: u32) -> Self {
        KmgrError::CorruptStore {
            path: path.display().to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    /// Create a filesystem error wrapping an I/O failure
    pub fn filesystem(
        operation: &'static str,
        path: &std::path::Path,
        source: std::io::Error,
    ) -> Self {
        KmgrError::Filesystem {
            operation,
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a key management error
    pub fn key_management(operation: &str, cause: &str, error_code: u32) -> Self {
        KmgrError::KeyManagement {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }
}
