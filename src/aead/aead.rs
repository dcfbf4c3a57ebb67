use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{error_codes, KmgrError, KmgrResult};
use crate::utils;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type HmacSha512 = Hmac<Sha512>;

/// Length of the AES-256 encryption subkey in bytes
pub const AEAD_ENC_KEY_LEN: usize = 32;

/// Length of the HMAC-SHA512 MAC subkey in bytes
pub const AEAD_MAC_KEY_LEN: usize = 64;

/// Length of the HMAC-SHA512 authentication tag in bytes
pub const AEAD_TAG_LEN: usize = 64;

/// Length of the AES-CTR initialization vector in bytes
pub const AEAD_IV_LEN: usize = 16;

/// Size of the ciphertext produced for a plaintext of `len` bytes.
///
/// The output layout is `tag || iv || encrypted data`.
pub const fn ciphertext_size(len: usize) -> usize {
    AEAD_TAG_LEN + AEAD_IV_LEN + len
}

/// Size of the plaintext recovered from a ciphertext of `len` bytes
pub const fn plaintext_size(len: usize) -> usize {
    len - AEAD_TAG_LEN - AEAD_IV_LEN
}

/// AEAD cipher for wrapping and unwrapping key material
///
/// Holds the encryption and MAC subkeys for the duration of a wrap or
/// unwrap operation. Both subkeys are zeroed when the cipher is
/// dropped, so a cipher should be created per operation and discarded
/// promptly.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AeadCipher {
    enc_key: [u8; AEAD_ENC_KEY_LEN],
    mac_key: [u8; AEAD_MAC_KEY_LEN],
}

impl std::fmt::Debug for AeadCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadCipher")
            .field("enc_key", &"[REDACTED]")
            .field("mac_key", &"[REDACTED]")
            .finish()
    }
}

impl AeadCipher {
    /// Create a new AEAD cipher from an encryption subkey and a MAC
    /// subkey
    pub fn new(enc_key: &[u8], mac_key: &[u8]) -> KmgrResult<Self> {
        if enc_key.len() != AEAD_ENC_KEY_LEN {
            return Err(KmgrError::key_management(
                "aead_init",
                &format!(
                    "encryption key must be {} bytes, got {}",
                    AEAD_ENC_KEY_LEN,
                    enc_key.len()
                ),
                error_codes::INVALID_KEY_LENGTH,
            ));
        }
        if mac_key.len() != AEAD_MAC_KEY_LEN {
            return Err(KmgrError::key_management(
                "aead_init",
                &format!(
                    "MAC key must be {} bytes, got {}",
                    AEAD_MAC_KEY_LEN,
                    mac_key.len()
                ),
                error_codes::INVALID_KEY_LENGTH,
            ));
        }

        let mut cipher = Self {
            enc_key: [0u8; AEAD_ENC_KEY_LEN],
            mac_key: [0u8; AEAD_MAC_KEY_LEN],
        };
        cipher.enc_key.copy_from_slice(enc_key);
        cipher.mac_key.copy_from_slice(mac_key);
        Ok(cipher)
    }

    /// Encrypt and authenticate the given plaintext
    ///
    /// Returns `tag || iv || encrypted data`, which is exactly
    /// `ciphertext_size(plaintext.len())` bytes. A fresh random IV is
    /// generated for every call.
    pub fn encrypt(&self, plaintext: &[u8]) -> KmgrResult<Vec<u8>> {
        let mut iv = [0u8; AEAD_IV_LEN];
        utils::fill_random(&mut iv)?;

        let mut enc = plaintext.to_vec();
        let mut ctr = Aes256Ctr::new((&self.enc_key).into(), (&iv).into());
        ctr.apply_keystream(&mut enc);

        let tag = self.compute_tag(&iv, &enc)?;

        let mut out = Vec::with_capacity(ciphertext_size(plaintext.len()));
        out.extend_from_slice(&tag);
        out.extend_from_slice(&iv);
        out.extend_from_slice(&enc);
        Ok(out)
    }

    /// Verify and decrypt the given ciphertext
    ///
    /// Fails closed: a tag mismatch yields a generic verification
    /// failure and no plaintext. The tag is checked in constant time
    /// before any decryption happens.
    pub fn decrypt(&self, ciphertext: &[u8]) -> KmgrResult<Vec<u8>> {
        if ciphertext.len() < AEAD_TAG_LEN + AEAD_IV_LEN {
            return Err(KmgrError::PassphraseMismatch);
        }

        let expected_tag = &ciphertext[..AEAD_TAG_LEN];
        let iv = &ciphertext[AEAD_TAG_LEN..AEAD_TAG_LEN + AEAD_IV_LEN];
        let enc = &ciphertext[AEAD_TAG_LEN + AEAD_IV_LEN..];

        let tag = self.compute_tag(iv, enc)?;
        if !utils::constant_time_eq(&tag, expected_tag) {
            return Err(KmgrError::PassphraseMismatch);
        }

        let mut plain = enc.to_vec();
        let mut iv_buf = [0u8; AEAD_IV_LEN];
        iv_buf.copy_from_slice(iv);
        let mut ctr = Aes256Ctr::new((&self.enc_key).into(), (&iv_buf).into());
        ctr.apply_keystream(&mut plain);
        Ok(plain)
    }

    fn compute_tag(&self, iv: &[u8], enc: &[u8]) -> KmgrResult<[u8; AEAD_TAG_LEN]> {
        let mut mac = HmacSha512::new_from_slice(&self.mac_key).map_err(|e| {
            KmgrError::key_management(
                "aead_mac",
                &e.to_string(),
                error_codes::INVALID_KEY_LENGTH,
            )
        })?;
        mac.update(iv);
        mac.update(enc);

        let mut tag = [0u8; AEAD_TAG_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        Ok(tag)
    }
}
