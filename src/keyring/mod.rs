/*!
 * Runtime key ring
 *
 * The key ring holds the unwrapped internal keys for the lifetime of
 * the process. It is built once during startup, after crash recovery
 * and passphrase verification, and is read-only from then on, so it can
 * be shared freely across threads.
 */

mod keyring;

pub use keyring::*;
