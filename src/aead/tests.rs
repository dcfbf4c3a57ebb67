use super::*;
use crate::error::KmgrError;
use crate::utils;

fn test_cipher() -> AeadCipher {
    let enc_key = utils::random_bytes(AEAD_ENC_KEY_LEN).unwrap();
    let mac_key = utils::random_bytes(AEAD_MAC_KEY_LEN).unwrap();
    AeadCipher::new(&enc_key, &mac_key).unwrap()
}

#[test]
fn test_encrypt_decrypt_round_trip() {
    let cipher = test_cipher();
    let plaintext = b"internal data encryption key material";

    let ciphertext = cipher.encrypt(plaintext).unwrap();
    assert_eq!(ciphertext.len(), ciphertext_size(plaintext.len()));
    assert_eq!(plaintext_size(ciphertext.len()), plaintext.len());

    let decrypted = cipher.decrypt(&ciphertext).unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn test_fresh_iv_per_encryption() {
    let cipher = test_cipher();
    let ct1 = cipher.encrypt(b"same plaintext").unwrap();
    let ct2 = cipher.encrypt(b"same plaintext").unwrap();
    assert_ne!(ct1, ct2);
}

#[test]
fn test_tampered_ciphertext_rejected() {
    let cipher = test_cipher();
    let mut ciphertext = cipher.encrypt(b"sensitive bytes").unwrap();

    let last = ciphertext.len() - 1;
    ciphertext[last] ^= 0x01;

    assert!(matches!(
        cipher.decrypt(&ciphertext),
        Err(KmgrError::PassphraseMismatch)
    ));
}

#[test]
fn test_tampered_tag_rejected() {
    let cipher = test_cipher();
    let mut ciphertext = cipher.encrypt(b"sensitive bytes").unwrap();
    ciphertext[0] ^= 0x80;

    assert!(cipher.decrypt(&ciphertext).is_err());
}

#[test]
fn test_tampered_iv_rejected() {
    let cipher = test_cipher();
    let mut ciphertext = cipher.encrypt(b"sensitive bytes").unwrap();
    ciphertext[AEAD_TAG_LEN] ^= 0x01;

    assert!(cipher.decrypt(&ciphertext).is_err());
}

#[test]
fn test_wrong_key_rejected() {
    let cipher = test_cipher();
    let other = test_cipher();

    let ciphertext = cipher.encrypt(b"sensitive bytes").unwrap();
    assert!(matches!(
        other.decrypt(&ciphertext),
        Err(KmgrError::PassphraseMismatch)
    ));
}

#[test]
fn test_truncated_ciphertext_rejected() {
    let cipher = test_cipher();
    let ciphertext = cipher.encrypt(b"short").unwrap();
    assert!(cipher.decrypt(&ciphertext[..AEAD_TAG_LEN]).is_err());
}

#[test]
fn test_invalid_key_lengths() {
    let enc_key = [0u8; AEAD_ENC_KEY_LEN];
    let mac_key = [0u8; AEAD_MAC_KEY_LEN];

    assert!(AeadCipher::new(&enc_key[..16], &mac_key).is_err());
    assert!(AeadCipher::new(&enc_key, &mac_key[..32]).is_err());
    assert!(AeadCipher::new(&enc_key, &mac_key).is_ok());
}
