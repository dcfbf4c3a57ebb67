use std::fs;

use log::info;

use crate::codec::{derive_keys, wrap_key, MAX_INTERNAL_KEYS};
use crate::config::KmgrConfig;
use crate::error::{error_codes, KmgrError, KmgrResult};
use crate::keyring::KeyRing;
use crate::passphrase::run_passphrase_command;
use crate::rotation::recover_incomplete_rotation;
use crate::store;

/// Rotate the cluster passphrase
///
/// Obtains a new passphrase from the configured passphrase command,
/// rewraps every key in the ring under the KEK it derives, stages the
/// new wrapped set in the staging directory and commits it with an
/// atomic directory swap. The caller must already have reloaded the
/// passphrase command to produce the new passphrase.
///
/// Any failure before the commit leaves the live directory untouched:
/// the new material only ever lands in the staging directory, which the
/// next recovery pass discards if it is incomplete. Concurrent
/// rotations are not supported; callers serialize invocations with an
/// external lock.
pub fn rotate_passphrase(config: &KmgrConfig, keyring: &KeyRing) -> KmgrResult<()> {
    if !config.enabled {
        return Err(KmgrError::configuration(
            "rotate_passphrase",
            "key management is not enabled",
            error_codes::FEATURE_DISABLED,
        ));
    }

    // Never start a rotation from an already-inconsistent state.
    recover_incomplete_rotation(config)?;

    let passphrase = run_passphrase_command(&config.passphrase_command)?;
    let kek = derive_keys(&passphrase)?;

    let mut new_keys = Vec::with_capacity(MAX_INTERNAL_KEYS);
    for id in 0..MAX_INTERNAL_KEYS {
        new_keys.push(wrap_key(&kek, keyring.get(id))?);
    }

    let live = config.key_dir();
    let staging = config.tmp_dir();
    store::write_all(&staging, &new_keys)?;

    // Commit. From here on no new information is written; the swap
    // either completes or the next startup's recovery pass finishes it.
    fs::remove_dir_all(&live)
        .map_err(|e| KmgrError::filesystem("remove directory", &live, e))?;
    fs::rename(&staging, &live)
        .map_err(|e| KmgrError::filesystem("rename directory", &staging, e))?;

    info!("cluster passphrase rotated");
    Ok(())
}
