//! Full lifecycle of a cluster's key manager: bootstrap, restart,
//! passphrase rotation, and recovery from a crash between the staging
//! write and the commit.

use kmgr::codec::AEAD_KEY_LEN;
use kmgr::prelude::*;
use kmgr::store;
use tempfile::tempdir;

fn pass_cmd(passphrase: &str) -> String {
    format!("printf %s {}", passphrase)
}

// Padded to satisfy the 64-byte minimum passphrase length.
fn old_passphrase() -> String {
    "correct-horse-battery-staple-".repeat(3)
}

fn new_passphrase() -> String {
    "new-passphrase-value-".repeat(4)
}

#[test]
fn test_cluster_key_lifecycle_with_crashed_rotation() {
    let data_dir = tempdir().unwrap();
    let config = KmgrConfig::new(data_dir.path(), &pass_cmd(&old_passphrase()));

    // Cluster install: generate, wrap and persist the internal keys.
    bootstrap(&config).unwrap();

    // Process restart with the same passphrase: the ring exposes one
    // key of the expected length at the SQL key identifier.
    let keyring = initialize(&config).unwrap();
    assert_eq!(keyring.len(), MAX_INTERNAL_KEYS);
    assert_eq!(keyring.get(SQL_KEY_ID).len(), AEAD_KEY_LEN);

    // Rotation towards the new passphrase, crashing immediately after
    // the staging write completes and before the commit: simulated by
    // performing only the staging step by hand.
    let kek = derive_keys(new_passphrase().as_bytes()).unwrap();
    let staged: Vec<WrappedKey> = (0..MAX_INTERNAL_KEYS)
        .map(|id| wrap_key(&kek, keyring.get(id)).unwrap())
        .collect();
    store::write_all(&config.tmp_dir(), &staged).unwrap();
    assert!(config.key_dir().exists());
    assert!(config.tmp_dir().exists());

    // Next startup resolves to the newly wrapped keys, so the old
    // passphrase must now fail verification.
    assert!(matches!(
        initialize(&config),
        Err(KmgrError::PassphraseMismatch)
    ));
    assert!(!config.tmp_dir().exists());

    // Supplying the new passphrase succeeds and recovers the same DEKs.
    let config_new = KmgrConfig {
        passphrase_command: pass_cmd(&new_passphrase()),
        ..config
    };
    let recovered = initialize(&config_new).unwrap();
    assert_eq!(recovered.get(SQL_KEY_ID), keyring.get(SQL_KEY_ID));
}

#[test]
fn test_administrative_rotation_is_safe_to_repeat() {
    let data_dir = tempdir().unwrap();
    let config = KmgrConfig::new(data_dir.path(), &pass_cmd(&old_passphrase()));
    bootstrap(&config).unwrap();
    let keyring = initialize(&config).unwrap();

    // With no pending rotation the trigger is a recovery no-op
    // followed by a full rotation; invoking it twice in a row under
    // the same passphrase command must also work.
    rotate_passphrase(&config, &keyring).unwrap();
    rotate_passphrase(&config, &keyring).unwrap();

    let reloaded = initialize(&config).unwrap();
    assert_eq!(reloaded.get(SQL_KEY_ID), keyring.get(SQL_KEY_ID));
}
