//! Password-based encryption of the threads payload
//!
//! AES-256-CBC with PKCS#7 padding. The key is derived with
//! PBKDF2-HMAC-SHA1, 100 000 iterations, from the UTF-8 password and a random
//! 16-byte salt. These parameters must match the browser-side decryptor and
//! must not change: files produced with other values cannot be opened there.
//!
//! Salt, IV and ciphertext are stored as standard padded base64.

use crate::error::{ConvertError, Result};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// PBKDF2 iteration count expected by the viewer
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// AES key size in bits
pub const KEY_SIZE_BITS: u32 = 256;

/// Algorithm label written to the parameter record
pub const ALGORITHM: &str = "AES-CBC";

pub const SALT_LEN: usize = 16;
pub const IV_LEN: usize = 16;

const KEY_LEN: usize = (KEY_SIZE_BITS / 8) as usize;

/// Public parameters needed to decrypt a blob. Not secret.
///
/// Serialized field names are the ones the viewer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionParams {
    pub salt: String,
    pub iv: String,
    pub iterations: u32,
    pub key_size: u32,
    pub algorithm: String,
}

impl EncryptionParams {
    pub fn new(salt: &[u8; SALT_LEN], iv: &[u8; IV_LEN]) -> Self {
        Self {
            salt: general_purpose::STANDARD.encode(salt),
            iv: general_purpose::STANDARD.encode(iv),
            iterations: PBKDF2_ITERATIONS,
            key_size: KEY_SIZE_BITS,
            algorithm: ALGORITHM.to_string(),
        }
    }
}

/// Base64 ciphertext together with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub ciphertext: String,
    pub params: EncryptionParams,
}

/// Derive the 256-bit AES key
pub fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha1>(password.as_bytes(), salt, iterations, &mut key);
    key
}

/// Encrypt with a fresh random salt and IV
pub fn encrypt_data(plaintext: &str, password: &str) -> Result<EncryptedPayload> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .and_then(|_| OsRng.try_fill_bytes(&mut iv))
        .map_err(|e| ConvertError::Crypto(format!("Random generator failed: {}", e)))?;

    encrypt_with_params(plaintext, password, &salt, &iv)
}

/// Deterministic core: same inputs always give the same ciphertext
pub fn encrypt_with_params(
    plaintext: &str,
    password: &str,
    salt: &[u8; SALT_LEN],
    iv: &[u8; IV_LEN],
) -> Result<EncryptedPayload> {
    let key = derive_key(password, salt, PBKDF2_ITERATIONS);
    let cipher = Aes256CbcEnc::new_from_slices(&key, iv)
        .map_err(|e| ConvertError::Crypto(format!("Cipher init failed: {}", e)))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    Ok(EncryptedPayload {
        ciphertext: general_purpose::STANDARD.encode(ciphertext),
        params: EncryptionParams::new(salt, iv),
    })
}

/// Inverse of [`encrypt_data`], mirroring what the viewer does
pub fn decrypt_data(ciphertext: &str, password: &str, params: &EncryptionParams) -> Result<String> {
    if params.algorithm != ALGORITHM || params.key_size != KEY_SIZE_BITS {
        return Err(ConvertError::Crypto(format!(
            "Unsupported cipher {} with {}-bit key",
            params.algorithm, params.key_size
        )));
    }

    let salt = decode_field("salt", &params.salt)?;
    let iv = decode_field("iv", &params.iv)?;
    if iv.len() != IV_LEN {
        return Err(ConvertError::Crypto(format!(
            "iv must be {} bytes, got {}",
            IV_LEN,
            iv.len()
        )));
    }
    let ciphertext = decode_field("ciphertext", ciphertext.trim())?;

    let key = derive_key(password, &salt, params.iterations);
    let cipher = Aes256CbcDec::new_from_slices(&key, &iv)
        .map_err(|e| ConvertError::Crypto(format!("Cipher init failed: {}", e)))?;
    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| ConvertError::Crypto("Bad padding (wrong password?)".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|_| ConvertError::Crypto("Decrypted data is not UTF-8 (wrong password?)".to_string()))
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(value)
        .map_err(|e| ConvertError::Crypto(format!("Invalid base64 in {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correct horse battery";
    const SALT: [u8; SALT_LEN] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
    const IV: [u8; IV_LEN] = [
        16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
    ];

    // Produced independently with PBKDF2-HMAC-SHA1 + AES-256-CBC/PKCS#7
    const KNOWN_PLAINTEXT: &str = "{\"10\":[{\"post_id\":1,\"content\":\"Impfung ü\"}]}";
    const KNOWN_CIPHERTEXT: &str =
        "plVilS76sfDivK+p0KNngmVlbE1KEvlZGle3QsDGQxvY3W6TSV27B0xxb4kpYCWu";

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_derive_key_known_answer() {
        let key = derive_key(PASSWORD, &SALT, PBKDF2_ITERATIONS);
        assert_eq!(
            hex(&key),
            "8ed519133637a82940603deea3553d71a8a81c5cdc47105eb0d3836f00215501"
        );
    }

    #[test]
    fn test_encrypt_known_answer() {
        let payload = encrypt_with_params(KNOWN_PLAINTEXT, PASSWORD, &SALT, &IV).unwrap();
        assert_eq!(payload.ciphertext, KNOWN_CIPHERTEXT);
        assert_eq!(payload.params.salt, "AAECAwQFBgcICQoLDA0ODw==");
        assert_eq!(payload.params.iv, "EBESExQVFhcYGRobHB0eHw==");
    }

    #[test]
    fn test_encrypt_is_deterministic_for_fixed_salt_and_iv() {
        let a = encrypt_with_params("same text", PASSWORD, &SALT, &IV).unwrap();
        let b = encrypt_with_params("same text", PASSWORD, &SALT, &IV).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_trip_empty_and_multibyte() {
        let long = "x".repeat(1000);
        for plaintext in ["", "plain ascii", "ワクチン 💉 Ärzte", long.as_str()] {
            let payload = encrypt_data(plaintext, PASSWORD).unwrap();
            let decrypted = decrypt_data(&payload.ciphertext, PASSWORD, &payload.params).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_empty_plaintext_is_one_padding_block() {
        let payload = encrypt_with_params("", PASSWORD, &SALT, &IV).unwrap();
        let raw = general_purpose::STANDARD.decode(&payload.ciphertext).unwrap();
        assert_eq!(raw.len(), 16);
    }

    #[test]
    fn test_fresh_salt_and_iv_every_call() {
        let a = encrypt_data("payload", PASSWORD).unwrap();
        let b = encrypt_data("payload", PASSWORD).unwrap();
        assert_ne!(a.params.salt, b.params.salt);
        assert_ne!(a.params.iv, b.params.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_params_record_shape() {
        let params = EncryptionParams::new(&SALT, &IV);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "salt": "AAECAwQFBgcICQoLDA0ODw==",
                "iv": "EBESExQVFhcYGRobHB0eHw==",
                "iterations": 100000,
                "keySize": 256,
                "algorithm": "AES-CBC"
            })
        );
    }

    #[test]
    fn test_wrong_password_does_not_recover_plaintext() {
        let payload = encrypt_with_params(KNOWN_PLAINTEXT, PASSWORD, &SALT, &IV).unwrap();
        let result = decrypt_data(&payload.ciphertext, "not the password", &payload.params);
        assert!(result.map(|text| text != KNOWN_PLAINTEXT).unwrap_or(true));
    }

    #[test]
    fn test_invalid_base64_is_crypto_error() {
        let params = EncryptionParams::new(&SALT, &IV);
        let result = decrypt_data("***not base64***", PASSWORD, &params);
        assert!(matches!(result, Err(ConvertError::Crypto(_))));
    }
}
