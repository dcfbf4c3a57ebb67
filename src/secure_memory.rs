//! Secure Memory Handling Utilities
//!
//! Containers and helpers that bound the lifetime of sensitive material
//! in memory. KEK subkeys, plaintext DEKs staged during rewrap and
//! passphrase buffers are all zeroed as soon as they go out of scope.
//! This is a hardening measure on top of the protocol, not a
//! correctness requirement of it.

use std::fmt;
use std::ops::Deref;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A byte buffer for sensitive data that is zeroed when dropped.
///
/// Used for passphrases read from the passphrase command and other
/// transient secrets. The contents never appear in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes {
    inner: Vec<u8>,
}

impl SecureBytes {
    /// Create a new secure buffer taking ownership of the given bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { inner: data }
    }

    /// Borrow the contained bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Length of the contained data in bytes
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop all bytes beyond `len`, zeroing the discarded tail
    pub fn truncate(&mut self, len: usize) {
        if len < self.inner.len() {
            self.inner[len..].zeroize();
            self.inner.truncate(len);
        }
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBytes([REDACTED; {} bytes])", self.inner.len())
    }
}

/// Run a closure over mutable sensitive data, zeroing the data when the
/// closure returns or panics.
pub fn with_secure_scope<T, F, R>(data: &mut T, f: F) -> R
where
    T: Zeroize,
    F: FnOnce(&mut T) -> R,
{
    struct ScopeGuard<'a, T: Zeroize> {
        data: &'a mut T,
    }

    impl<'a, T: Zeroize> Drop for ScopeGuard<'a, T> {
        fn drop(&mut self) {
            self.data.zeroize();
        }
    }

    let guard = ScopeGuard { data };
    let result = f(guard.data);
    drop(guard);
    result
}
