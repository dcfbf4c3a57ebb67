/*!
 * kmgr - Cluster Key Manager
 *
 * This crate manages the key hierarchy of a database cluster. A key
 * encryption key (KEK) and an HMAC key are derived from an
 * operator-supplied passphrase and used to wrap a small, fixed set of
 * internal data encryption keys (DEKs). The wrapped DEKs live on disk,
 * one fixed-size file per key, and are unwrapped into a read-only
 * in-memory key ring at process startup.
 *
 * The passphrase can be rotated at any time: all DEKs are rewrapped
 * under the new KEK, staged into a sibling directory and committed with
 * an atomic directory rename. A crash at any point during rotation is
 * repaired deterministically on the next startup, so the cluster always
 * comes back with either the old key set or the new one, never a mix.
 */

/// AEAD primitive used to wrap and unwrap key material
pub mod aead;

/// Passphrase-to-KEK derivation and key wrap/unwrap
pub mod codec;

/// Key manager configuration
pub mod config;

/// Common error types for key management operations
pub mod error;

/// Runtime key ring holding unwrapped DEKs
pub mod keyring;

/// External passphrase command invocation
pub mod passphrase;

/// Passphrase rotation and crash recovery
pub mod rotation;

/// On-disk wrapped key store
pub mod store;

/// Secure memory handling utilities
pub mod secure_memory;

/// Utilities for cryptographic operations
pub mod utils;

pub use codec::{PlainKey, WrappedKey};
pub use config::KmgrConfig;
pub use error::{KmgrError, KmgrResult};
pub use keyring::KeyRing;

/// Commonly used types and operations.
pub mod prelude {
    pub use crate::codec::{
        derive_keys, generate_key, unwrap_key, verify_passphrase, wrap_key, KekMaterial,
        PlainKey, WrappedKey, MAX_INTERNAL_KEYS, SQL_KEY_ID,
    };
    pub use crate::config::KmgrConfig;
    pub use crate::error::{KmgrError, KmgrResult};
    pub use crate::keyring::{bootstrap, initialize, KeyRing};
    pub use crate::rotation::{recover_incomplete_rotation, rotate_passphrase};
    pub use crate::secure_memory::{with_secure_scope, SecureBytes};
}
