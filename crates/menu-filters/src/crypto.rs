//! URL-safe parameter encryption for the `enc` / `dec` filters.
//!
//! # Token format
//!
//! ```text
//! base64url( 0x01 || nonce(24) || ciphertext+tag )
//! ```
//!
//! XChaCha20-Poly1305 with a random nonce per call, so encrypting the same
//! value twice yields different tokens. The version byte is bound as
//! associated data.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 24;

const TOKEN_VERSION: u8 = 1;

/// Symmetric cipher keyed once at startup and shared by `enc` and `dec`.
pub struct FieldCipher {
    cipher: XChaCha20Poly1305,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    /// Build a cipher from raw key bytes.
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(key.into()),
        }
    }

    /// Build a cipher from a URL-safe base64 key as stored in configuration.
    pub fn from_encoded_key(encoded: &SecretString) -> Result<Self, CipherError> {
        let bytes = Zeroizing::new(
            URL_SAFE
                .decode(encoded.expose_secret().trim())
                .map_err(|_| CipherError::InvalidKey)?,
        );
        let key: &[u8; KEY_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CipherError::InvalidKey)?;
        Ok(Self::new(key))
    }

    /// Generate a fresh random key, URL-safe base64 encoded.
    pub fn generate_key() -> String {
        let key = XChaCha20Poly1305::generate_key(&mut OsRng);
        URL_SAFE.encode(key.as_slice())
    }

    /// Encrypt `plaintext` into a URL-safe token.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: &[TOKEN_VERSION],
                },
            )
            .map_err(|_| CipherError::Encrypt)?;

        let mut blob = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        blob.push(TOKEN_VERSION);
        blob.extend_from_slice(nonce.as_slice());
        blob.extend_from_slice(&ciphertext);

        Ok(URL_SAFE.encode(blob))
    }

    /// Reverse [`FieldCipher::encrypt`]. Fails on bad base64, truncated or
    /// tampered tokens, a different key, or non-UTF-8 plaintext.
    pub fn decrypt(&self, token: &str) -> Result<String, CipherError> {
        let blob = URL_SAFE.decode(token.trim())?;

        let (version, rest) = blob.split_first().ok_or(CipherError::Truncated)?;
        if *version != TOKEN_VERSION {
            return Err(CipherError::UnsupportedVersion(*version));
        }
        if rest.len() < NONCE_LEN {
            return Err(CipherError::Truncated);
        }
        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(
                XNonce::from_slice(nonce_bytes),
                Payload {
                    msg: ciphertext,
                    aad: &[TOKEN_VERSION],
                },
            )
            .map_err(|_| CipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::NotUtf8)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("encryption key must be {KEY_LEN} bytes of URL-safe base64")]
    InvalidKey,
    #[error("token is not valid URL-safe base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token is too short")]
    Truncated,
    #[error("unsupported token version {0}")]
    UnsupportedVersion(u8),
    #[error("encryption failed")]
    Encrypt,
    #[error("token failed authentication (tampered or encrypted under another key)")]
    Decrypt,
    #[error("decrypted value is not valid UTF-8")]
    NotUtf8,
}
