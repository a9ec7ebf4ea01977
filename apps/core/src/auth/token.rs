//! Bearer tokens.
//!
//! A token is the JSON claims sealed with AES-256-GCM: a random 12-byte
//! nonce is prepended to the ciphertext and the result is base64 (URL-safe,
//! unpadded) encoded. The key is the SHA-256 digest of the configured secret.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::models::User;

const NONCE_SIZE: usize = 12;

/// Token lifetime.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Identity carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

/// Seals and opens tokens with a key derived from the secret.
#[derive(Clone)]
pub struct TokenKeys {
    key: [u8; 32],
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    /// Issues a token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        self.seal(&Claims::for_user(user))
    }

    pub fn seal(&self, claims: &Claims) -> Result<String, AppError> {
        let plaintext = serde_json::to_vec(claims)
            .map_err(|e| AppError::Internal(format!("Token encoding failure: {}", e)))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher()
            .encrypt(nonce, plaintext.as_ref())
            .map_err(|e| AppError::Internal(format!("Encryption failure: {}", e)))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);

        Ok(general_purpose::URL_SAFE_NO_PAD.encode(combined))
    }

    /// Opens and checks a token. Any failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let invalid = || AppError::Unauthorized("Invalid token".to_string());

        let decoded = general_purpose::URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| invalid())?;

        if decoded.len() < NONCE_SIZE {
            return Err(invalid());
        }

        let nonce = Nonce::from_slice(&decoded[..NONCE_SIZE]);
        let plaintext = self
            .cipher()
            .decrypt(nonce, &decoded[NONCE_SIZE..])
            .map_err(|_| invalid())?;

        let claims: Claims = serde_json::from_slice(&plaintext).map_err(|_| invalid())?;
        if claims.is_expired() {
            return Err(AppError::Unauthorized("Token expired".to_string()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: i64) -> Claims {
        Claims {
            sub: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            exp,
        }
    }

    #[test]
    fn test_seal_and_verify() {
        let keys = TokenKeys::new("secret");
        let original = claims(Utc::now().timestamp() + 60);

        let token = keys.seal(&original).expect("seal failed");
        assert!(!token.contains('='));
        assert_eq!(keys.verify(&token).expect("verify failed"), original);
    }

    #[test]
    fn test_nonce_is_random() {
        let keys = TokenKeys::new("secret");
        let c = claims(Utc::now().timestamp() + 60);
        assert_ne!(keys.seal(&c).unwrap(), keys.seal(&c).unwrap());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenKeys::new("one")
            .seal(&claims(Utc::now().timestamp() + 60))
            .unwrap();
        assert!(matches!(
            TokenKeys::new("two").verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_and_garbage_tokens() {
        let keys = TokenKeys::new("secret");
        let expired = keys.seal(&claims(Utc::now().timestamp() - 1)).unwrap();
        assert!(matches!(keys.verify(&expired), Err(AppError::Unauthorized(m)) if m == "Token expired"));

        assert!(keys.verify("not a token").is_err());
        assert!(keys.verify("").is_err());
        assert!(keys.verify("AAAA").is_err());
    }
}
