/*!
 * Key codec: passphrase-derived KEK material and key wrap/unwrap
 *
 * The key encryption key (KEK) and its companion MAC key are derived
 * from the cluster passphrase and exist only for the duration of a
 * wrap, unwrap or verify operation. Wrapped and plaintext keys are
 * distinct types, so a wrapped key can never be handed to a consumer
 * expecting raw key bytes.
 */

mod codec;

pub use codec::*;

#[cfg(test)]
mod tests;
