use std::fs;

use log::{debug, info};

use crate::codec::MAX_INTERNAL_KEYS;
use crate::config::KmgrConfig;
use crate::error::{KmgrError, KmgrResult};
use crate::store;

/// Repair the aftermath of an interrupted passphrase rotation
///
/// Called at every startup and before every rotation attempt. The
/// resolution is decided from the existence of the live and staging
/// directories and, when both exist, from the number of complete key
/// files in staging:
///
/// - live only: steady state, nothing to do;
/// - staging only: the commit removed the live directory but crashed
///   before the rename finished, so staging is authoritative;
/// - both, staging complete: staging was fully written but the live
///   directory was never removed, so staging wins;
/// - both, staging incomplete: the staging write itself crashed, so
///   staging is discarded and the live keys are kept.
///
/// Key files are written whole and synced individually, so a file that
/// exists with the right size is a fully staged key; completeness of
/// the staging directory therefore reduces to counting files.
///
/// Every resolution is logged at operator level because it decides
/// which passphrase the operator must supply next. A failed removal or
/// rename here is fatal: the process cannot continue with an
/// undetermined key state. Running this twice in a row is a no-op the
/// second time.
pub fn recover_incomplete_rotation(config: &KmgrConfig) -> KmgrResult<()> {
    let live = config.key_dir();
    let staging = config.tmp_dir();

    // The last rotation completed; nothing to do.
    if !staging.exists() {
        return Ok(());
    }

    if !live.exists() {
        debug!("only the staging directory exists, promoting the newly wrapped keys");

        fs::rename(&staging, &live)
            .map_err(|e| KmgrError::filesystem("rename directory", &staging, e))?;
        info!(
            "cryptographic keys wrapped by the new passphrase are chosen; \
             the last passphrase rotation failed in the middle"
        );
        return Ok(());
    }

    // Both directories exist: decide by how much of the staging write
    // completed before the crash.
    let (_, staged_count) = store::read_all(&staging)?;

    if staged_count == MAX_INTERNAL_KEYS {
        debug!("staging is complete, promoting the newly wrapped keys over the live set");

        fs::remove_dir_all(&live)
            .map_err(|e| KmgrError::filesystem("remove directory", &live, e))?;
        fs::rename(&staging, &live)
            .map_err(|e| KmgrError::filesystem("rename directory", &staging, e))?;
        info!(
            "cryptographic keys wrapped by the new passphrase are chosen; \
             the last passphrase rotation failed in the middle"
        );
    } else {
        debug!(
            "staging holds {} of {} keys, discarding it and keeping the live set",
            staged_count, MAX_INTERNAL_KEYS
        );

        fs::remove_dir_all(&staging)
            .map_err(|e| KmgrError::filesystem("remove directory", &staging, e))?;
        info!(
            "cryptographic keys wrapped by the old passphrase are kept; \
             the last passphrase rotation failed in the middle"
        );
    }

    Ok(())
}
