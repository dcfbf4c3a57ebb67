use super::*;
use crate::error::KmgrError;

const PASSPHRASE: &[u8] = b"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
const OTHER_PASSPHRASE: &[u8] =
    b"fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

#[test]
fn test_derive_keys_deterministic() {
    let kek1 = derive_keys(PASSPHRASE).unwrap();
    let kek2 = derive_keys(PASSPHRASE).unwrap();

    let key = generate_key(AEAD_KEY_LEN).unwrap();
    let wrapped = wrap_key(&kek1, &key).unwrap();

    // Material derived twice from the same passphrase unwraps what the
    // first derivation wrapped.
    let unwrapped = unwrap_key(&kek2, &wrapped).unwrap();
    assert_eq!(unwrapped, key);
}

#[test]
fn test_wrap_unwrap_round_trip() {
    let kek = derive_keys(PASSPHRASE).unwrap();
    let key = generate_key(AEAD_KEY_LEN).unwrap();

    let wrapped = wrap_key(&kek, &key).unwrap();
    assert_eq!(wrapped.len(), crate::aead::ciphertext_size(AEAD_KEY_LEN));
    assert!(wrapped.len() <= MAX_WRAPPED_KEY_LEN);

    let unwrapped = unwrap_key(&kek, &wrapped).unwrap();
    assert_eq!(unwrapped, key);
    assert_eq!(unwrapped.len(), AEAD_KEY_LEN);
}

#[test]
fn test_wrong_passphrase_rejected() {
    let kek = derive_keys(PASSPHRASE).unwrap();
    let other_kek = derive_keys(OTHER_PASSPHRASE).unwrap();

    let key = generate_key(AEAD_KEY_LEN).unwrap();
    let wrapped = wrap_key(&kek, &key).unwrap();

    assert!(matches!(
        unwrap_key(&other_kek, &wrapped),
        Err(KmgrError::PassphraseMismatch)
    ));
}

#[test]
fn test_generate_key_lengths() {
    let key = generate_key(AEAD_KEY_LEN).unwrap();
    assert_eq!(key.len(), AEAD_KEY_LEN);

    let other = generate_key(AEAD_KEY_LEN).unwrap();
    assert_ne!(key, other);

    assert!(generate_key(MAX_KEY_LEN).is_ok());
    assert!(generate_key(MAX_KEY_LEN + 1).is_err());
}

#[test]
fn test_combined_dek_subkey_split() {
    let key = generate_key(AEAD_KEY_LEN).unwrap();

    assert_eq!(key.enc_subkey().len(), crate::aead::AEAD_ENC_KEY_LEN);
    assert_eq!(key.mac_subkey().len(), crate::aead::AEAD_MAC_KEY_LEN);

    let mut rejoined = key.enc_subkey().to_vec();
    rejoined.extend_from_slice(key.mac_subkey());
    assert_eq!(rejoined, key.as_bytes());
}

#[test]
fn test_verify_passphrase() {
    let kek = derive_keys(PASSPHRASE).unwrap();

    let mut keys = Vec::new();
    let mut wrapped = Vec::new();
    for &len in INTERNAL_KEY_LENGTHS {
        let key = generate_key(len).unwrap();
        wrapped.push(wrap_key(&kek, &key).unwrap());
        keys.push(key);
    }

    let unwrapped = verify_passphrase(PASSPHRASE, &wrapped).unwrap();
    assert_eq!(unwrapped, keys);

    assert!(matches!(
        verify_passphrase(OTHER_PASSPHRASE, &wrapped),
        Err(KmgrError::PassphraseMismatch)
    ));
}

#[test]
fn test_key_debug_is_redacted() {
    let key = generate_key(AEAD_KEY_LEN).unwrap();
    let rendered = format!("{:?}", key);
    assert!(rendered.contains("REDACTED"));
    assert!(!rendered.contains("buf"));
}

#[test]
fn test_plain_key_capacity_enforced() {
    assert!(PlainKey::from_bytes(&[0u8; MAX_KEY_LEN]).is_ok());
    assert!(PlainKey::from_bytes(&[0u8; MAX_KEY_LEN + 1]).is_err());
    assert!(WrappedKey::from_bytes(&[0u8; MAX_WRAPPED_KEY_LEN + 1]).is_err());
}
