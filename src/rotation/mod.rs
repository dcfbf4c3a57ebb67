/*!
 * Passphrase rotation and crash recovery
 *
 * Rotation rewraps every internal key under a KEK derived from a new
 * passphrase, stages the new set in a sibling directory and commits it
 * by removing the live directory and renaming the staging directory
 * into place. The commit is a pure swap: no new information is written
 * after staging, so a crash at any point leaves a state the recovery
 * pass can classify from directory existence and staging file count
 * alone.
 */

mod recovery;
mod rotation;

pub use recovery::recover_incomplete_rotation;
pub use rotation::rotate_passphrase;
