/*!
 * Authenticated encryption for key wrapping
 *
 * This module implements the AEAD construction used to wrap and unwrap
 * internal keys: AES-256-CTR encryption with a random IV followed by an
 * HMAC-SHA512 tag over the IV and ciphertext (encrypt-then-MAC).
 */

mod aead;

pub use aead::*;

#[cfg(test)]
mod tests;
