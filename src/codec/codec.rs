use hkdf::Hkdf;
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::aead::{
    ciphertext_size, AeadCipher, AEAD_ENC_KEY_LEN, AEAD_MAC_KEY_LEN,
};
use crate::error::{error_codes, KmgrError, KmgrResult};
use crate::utils;

/// Length of an internal DEK: an encryption subkey and a MAC subkey,
/// consumed together by the data-path AEAD.
pub const AEAD_KEY_LEN: usize = AEAD_ENC_KEY_LEN + AEAD_MAC_KEY_LEN;

/// Maximum length of a key the key manager can store
pub const MAX_KEY_LEN: usize = 128;

/// Maximum length of a wrapped key
pub const MAX_WRAPPED_KEY_LEN: usize = ciphertext_size(MAX_KEY_LEN);

/// Identifier of the SQL internal key
pub const SQL_KEY_ID: usize = 0;

/// Lengths of the internal keys, indexed by key identifier. Adding an
/// internal key means appending its length here; the rest of the
/// protocol is driven by this table.
pub const INTERNAL_KEY_LENGTHS: &[usize] = &[AEAD_KEY_LEN];

/// Number of internal keys managed by the key manager
pub const MAX_INTERNAL_KEYS: usize = INTERNAL_KEY_LENGTHS.len();

/// HKDF info labels for the two KEK subkeys
const KEK_ENC_INFO: &[u8] = b"cluster-kek-encryption-key";
const KEK_MAC_INFO: &[u8] = b"cluster-kek-mac-key";

/// An unwrapped (plaintext) internal key.
///
/// Holds raw key bytes in a fixed-capacity buffer and zeroes them on
/// drop. Instances are created by `generate_key` or by unwrapping, and
/// are never mutated afterwards.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PlainKey {
    buf: [u8; MAX_KEY_LEN],
    len: usize,
}

impl PlainKey {
    /// Create a plaintext key from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> KmgrResult<Self> {
        if bytes.len() > MAX_KEY_LEN {
            return Err(KmgrError::key_management(
                "plain_key",
                &format!(
                    "key of {} bytes exceeds maximum of {}",
                    bytes.len(),
                    MAX_KEY_LEN
                ),
                error_codes::INVALID_KEY_LENGTH,
            ));
        }
        let mut key = Self {
            buf: [0u8; MAX_KEY_LEN],
            len: bytes.len(),
        };
        key.buf[..bytes.len()].copy_from_slice(bytes);
        Ok(key)
    }

    /// The raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Logical key length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the key is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Encryption half of a combined DEK
    ///
    /// Only meaningful for keys of `AEAD_KEY_LEN` bytes, which carry an
    /// encryption subkey followed by a MAC subkey.
    pub fn enc_subkey(&self) -> &[u8] {
        &self.buf[..AEAD_ENC_KEY_LEN]
    }

    /// MAC half of a combined DEK
    pub fn mac_subkey(&self) -> &[u8] {
        &self.buf[AEAD_ENC_KEY_LEN..self.len]
    }
}

impl PartialEq for PlainKey {
    fn eq(&self, other: &Self) -> bool {
        utils::constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl Eq for PlainKey {}

impl std::fmt::Debug for PlainKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlainKey([REDACTED; {} bytes])", self.len)
    }
}

/// A wrapped internal key: opaque ciphertext with its embedded IV and
/// authentication tag, as read from or written to the key store.
#[derive(Clone, PartialEq, Eq)]
pub struct WrappedKey {
    buf: [u8; MAX_WRAPPED_KEY_LEN],
    len: usize,
}

impl WrappedKey {
    /// Create a wrapped key from ciphertext bytes
    pub fn from_bytes(bytes: &[u8]) -> KmgrResult<Self> {
        if bytes.len() > MAX_WRAPPED_KEY_LEN {
            return Err(KmgrError::key_management(
                "wrapped_key",
                &format!(
                    "wrapped key of {} bytes exceeds maximum of {}",
                    bytes.len(),
                    MAX_WRAPPED_KEY_LEN
                ),
                error_codes::INVALID_KEY_LENGTH,
            ));
        }
        let mut key = Self {
            buf: [0u8; MAX_WRAPPED_KEY_LEN],
            len: bytes.len(),
        };
        key.buf[..bytes.len()].copy_from_slice(bytes);
        Ok(key)
    }

    /// The ciphertext bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Ciphertext length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the wrapped key is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::fmt::Debug for WrappedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WrappedKey({} bytes)", self.len)
    }
}

/// KEK material derived from the cluster passphrase.
///
/// Ephemeral by design: never persisted, zeroed on drop. Create one
/// per wrap/unwrap/verify operation and let it fall out of scope.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KekMaterial {
    enc: [u8; AEAD_ENC_KEY_LEN],
    mac: [u8; AEAD_MAC_KEY_LEN],
}

impl std::fmt::Debug for KekMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KekMaterial([REDACTED])")
    }
}

/// Derive the KEK encryption and MAC subkeys from a passphrase
///
/// Deterministic: the same passphrase always yields the same pair, and
/// the two subkeys use domain-separated HKDF-SHA512 expansions so they
/// are independent of one another.
pub fn derive_keys(passphrase: &[u8]) -> KmgrResult<KekMaterial> {
    let hk = Hkdf::<Sha512>::new(None, passphrase);

    let mut material = KekMaterial {
        enc: [0u8; AEAD_ENC_KEY_LEN],
        mac: [0u8; AEAD_MAC_KEY_LEN],
    };
    hk.expand(KEK_ENC_INFO, &mut material.enc).map_err(|e| {
        KmgrError::key_management(
            "derive_keys",
            &e.to_string(),
            error_codes::KEY_DERIVATION_FAILED,
        )
    })?;
    hk.expand(KEK_MAC_INFO, &mut material.mac).map_err(|e| {
        KmgrError::key_management(
            "derive_keys",
            &e.to_string(),
            error_codes::KEY_DERIVATION_FAILED,
        )
    })?;

    Ok(material)
}

/// Generate a fresh internal key of the given length from the OS
/// random source
pub fn generate_key(len: usize) -> KmgrResult<PlainKey> {
    if len > MAX_KEY_LEN {
        return Err(KmgrError::key_management(
            "generate_key",
            &format!("key of {} bytes exceeds maximum of {}", len, MAX_KEY_LEN),
            error_codes::INVALID_KEY_LENGTH,
        ));
    }
    let mut key = PlainKey {
        buf: [0u8; MAX_KEY_LEN],
        len,
    };
    utils::fill_random(&mut key.buf[..len])?;
    Ok(key)
}

/// Wrap a plaintext key under the given KEK material
pub fn wrap_key(kek: &KekMaterial, plain: &PlainKey) -> KmgrResult<WrappedKey> {
    let cipher = AeadCipher::new(&kek.enc, &kek.mac)?;
    let out = cipher.encrypt(plain.as_bytes())?;
    WrappedKey::from_bytes(&out)
}

/// Unwrap a wrapped key under the given KEK material
///
/// Fails closed with a generic verification failure on any tag
/// mismatch; partial plaintext is never produced.
pub fn unwrap_key(kek: &KekMaterial, wrapped: &WrappedKey) -> KmgrResult<PlainKey> {
    let cipher = AeadCipher::new(&kek.enc, &kek.mac)?;
    let mut plain = cipher.decrypt(wrapped.as_bytes())?;
    let key = PlainKey::from_bytes(&plain);
    plain.zeroize();
    key
}

/// Verify a passphrase by unwrapping every given key under the KEK it
/// derives
///
/// Returns the unwrapped keys on success. A failure on any key means
/// the passphrase does not match the one the keys were wrapped under,
/// or the ciphertext was corrupted; the two cases are indistinguishable
/// by design.
pub fn verify_passphrase(
    passphrase: &[u8],
    wrapped: &[WrappedKey],
) -> KmgrResult<Vec<PlainKey>> {
    let kek = derive_keys(passphrase)?;

    let mut keys = Vec::with_capacity(wrapped.len());
    for w in wrapped {
        match unwrap_key(&kek, w) {
            Ok(key) => keys.push(key),
            Err(KmgrError::PassphraseMismatch) => return Err(KmgrError::PassphraseMismatch),
            Err(e) => return Err(e),
        }
    }
    Ok(keys)
}
