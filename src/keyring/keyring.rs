use log::{debug, info};

use crate::codec::{
    derive_keys, generate_key, verify_passphrase, wrap_key, PlainKey, WrappedKey,
    INTERNAL_KEY_LENGTHS, MAX_INTERNAL_KEYS,
};
use crate::config::KmgrConfig;
use crate::error::{error_codes, KmgrError, KmgrResult};
use crate::passphrase::run_passphrase_command;
use crate::rotation::recover_incomplete_rotation;
use crate::store;

/// The runtime table of unwrapped internal keys.
///
/// Constructed by `initialize` and handed to consumers by reference;
/// there is no global instance. No field is mutated after construction,
/// so shared reads need no synchronization. Key material is zeroed when
/// the ring is dropped at shutdown.
pub struct KeyRing {
    keys: Vec<PlainKey>,
}

impl KeyRing {
    pub(crate) fn new(keys: Vec<PlainKey>) -> Self {
        debug_assert_eq!(keys.len(), MAX_INTERNAL_KEYS);
        Self { keys }
    }

    /// Look up an internal key by identifier.
    ///
    /// The caller must pass a defined identifier; an out-of-range value
    /// is a programming error and panics.
    pub fn get(&self, id: usize) -> &PlainKey {
        assert!(id < MAX_INTERNAL_KEYS, "invalid key identifier {}", id);
        &self.keys[id]
    }

    /// Number of keys in the ring
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the ring is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyRing({} keys)", self.keys.len())
    }
}

/// First-time setup of the key manager. Must be called exactly once in
/// the lifetime of a cluster.
///
/// Generates a fresh internal key for every defined identifier, wraps
/// the set under a KEK derived from the operator passphrase and
/// persists it to the live key store directory.
pub fn bootstrap(config: &KmgrConfig) -> KmgrResult<()> {
    if !config.enabled {
        return Err(KmgrError::configuration(
            "bootstrap",
            "key management is not enabled",
            error_codes::FEATURE_DISABLED,
        ));
    }

    let passphrase = run_passphrase_command(&config.passphrase_command)?;
    let kek = derive_keys(&passphrase)?;

    let mut wrapped: Vec<WrappedKey> = Vec::with_capacity(MAX_INTERNAL_KEYS);
    for &len in INTERNAL_KEY_LENGTHS {
        let key = generate_key(len)?;
        wrapped.push(wrap_key(&kek, &key)?);
    }

    store::write_all(&config.key_dir(), &wrapped)?;

    info!("key manager bootstrapped with {} internal keys", wrapped.len());
    Ok(())
}

/// Load and unwrap the internal keys at process startup.
///
/// Repairs any interrupted rotation first, then reads the wrapped key
/// set, re-derives the KEK from the operator-supplied passphrase and
/// unwraps every key into a new `KeyRing`. A verification failure on
/// any key is reported as a passphrase mismatch, whether the cause is a
/// wrong passphrase or corrupted ciphertext.
pub fn initialize(config: &KmgrConfig) -> KmgrResult<KeyRing> {
    if !config.enabled {
        return Err(KmgrError::configuration(
            "initialize",
            "key management is not enabled",
            error_codes::FEATURE_DISABLED,
        ));
    }

    debug!("starting up key management system");

    // Recover the failure of the last passphrase rotation if necessary.
    recover_incomplete_rotation(config)?;

    let key_dir = config.key_dir();
    let (slots, count) = store::read_all(&key_dir)?;
    if count != MAX_INTERNAL_KEYS {
        return Err(KmgrError::corrupt_store(
            &key_dir,
            &format!("found {} of {} key files", count, MAX_INTERNAL_KEYS),
            error_codes::STORE_INCOMPLETE,
        ));
    }
    // count == MAX_INTERNAL_KEYS guarantees every slot is filled.
    let wrapped: Vec<WrappedKey> = slots.into_iter().flatten().collect();

    let passphrase = run_passphrase_command(&config.passphrase_command)?;
    let keys = verify_passphrase(&passphrase, &wrapped)?;

    Ok(KeyRing::new(keys))
}
