use rand::{rngs::OsRng, RngCore};

use crate::error::KmgrError;

/// Fill the given buffer with bytes from the OS random source
///
/// Key material cannot be faked, so an unavailable random source is
/// reported as a non-recoverable error rather than silently degraded.
pub fn fill_random(buf: &mut [u8]) -> Result<(), KmgrError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| KmgrError::RandomSource {
            cause: e.to_string(),
        })
}

/// Generate random bytes of the specified length
pub fn random_bytes(length: usize) -> Result<Vec<u8>, KmgrError> {
    let mut bytes = vec![0u8; length];
    fill_random(&mut bytes)?;
    Ok(bytes)
}

/// Constant-time comparison of two byte slices to avoid timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}
