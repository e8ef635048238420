use std::collections::HashMap;
use std::sync::Arc;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use crate::{Result, Error, KVReader, KVWriter, BatchExporter, Storage};

/// Encrypts a plaintext string using AES-256-GCM and a 32-byte key.
///
/// Returns a hex-encoded string containing the nonce followed by the ciphertext.
pub fn encrypt(plaintext: &str, key: &[u8]) -> Result<String> {
    if key.len() != 32 {
        return Err(Error::Internal("Key must be 32 bytes".to_string()));
    }
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| Error::Internal(e.to_string()))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng); // 96 bits / 12 bytes
    let ciphertext = cipher.encrypt(&nonce, plaintext.as_bytes()).map_err(|e| Error::Internal(e.to_string()))?;

    let mut combined = nonce.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(hex::encode(combined))
}

/// Decrypts a hex-encoded ciphertext string using AES-256-GCM and a 32-byte key.
///
/// The `cipher_hex` must be the output of [`encrypt`], containing the 12-byte
/// nonce followed by the ciphertext.
pub fn decrypt(cipher_hex: &str, key: &[u8]) -> Result<String> {
    if key.len() != 32 {
        return Err(Error::Internal("Key must be 32 bytes".to_string()));
    }
    let combined = hex::decode(cipher_hex).map_err(|e| Error::Internal(e.to_string()))?;
    if combined.len() < 12 {
        return Err(Error::Internal("Ciphertext too short".to_string()));
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| Error::Internal(e.to_string()))?;
    let (nonce_bytes, ciphertext) = combined.split_at(12);
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext_bytes = cipher.decrypt(nonce, ciphertext).map_err(|_| Error::Internal("decryption failed (wrong key or tampered data)".to_string()))?;
    String::from_utf8(plaintext_bytes).map_err(|e| Error::Internal(e.to_string()))
}

/// Parses a 64-character hex string into a 32-byte key.
pub fn parse_key(key_hex: &str) -> Result<Vec<u8>> {
    let key = hex::decode(key_hex.trim()).map_err(|e| Error::Internal(format!("invalid vault key: {}", e)))?;
    if key.len() != 32 {
        return Err(Error::Internal("Key must be 32 bytes".to_string()));
    }
    Ok(key)
}

/// Storage wrapper that encrypts every value at rest.
///
/// Values are serialized to JSON text, encrypted, and stored in the inner
/// backend as hex strings. Reads that fail to decrypt surface as errors, which
/// the mirror turns into slice defaults.
pub struct VaultStorage {
    inner: Arc<dyn Storage>,
    master_key: Vec<u8>,
}

impl VaultStorage {
    pub fn new(inner: Arc<dyn Storage>, master_key: &[u8]) -> Result<Self> {
        if master_key.len() != 32 {
            return Err(Error::Internal("Key must be 32 bytes".to_string()));
        }
        Ok(Self {
            inner,
            master_key: master_key.to_vec(),
        })
    }

    fn open(&self, sealed: &serde_json::Value) -> Result<serde_json::Value> {
        let cipher_hex = sealed.as_str().ok_or_else(|| Error::Internal("Vault data is not a string".to_string()))?;
        let plaintext = decrypt(cipher_hex, &self.master_key)?;
        Ok(serde_json::from_str(&plaintext)?)
    }
}

impl KVReader for VaultStorage {
    fn get(&self, namespace: &str, key: &str) -> Result<serde_json::Value> {
        let sealed = self.inner.get(namespace, key)?;
        self.open(&sealed)
    }
}

impl KVWriter for VaultStorage {
    fn set(&self, namespace: &str, key: &str, value: serde_json::Value) -> Result<()> {
        let cipher_hex = encrypt(&serde_json::to_string(&value)?, &self.master_key)?;
        self.inner.set(namespace, key, serde_json::Value::String(cipher_hex))
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<()> {
        self.inner.delete(namespace, key)
    }
}

impl BatchExporter for VaultStorage {
    fn dump(&self, namespace: &str) -> Result<HashMap<String, serde_json::Value>> {
        self.inner
            .dump(namespace)?
            .into_iter()
            .map(|(key, sealed)| -> Result<(String, serde_json::Value)> {
                Ok((key, self.open(&sealed)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemStorage;
    use serde_json::json;

    const KEY: &[u8; 32] = b"thisis32byteslongsecretkey123456";

    #[test]
    fn test_encrypt_decrypt() {
        let plaintext = "Hello, Shopfront!";
        let ciphertext = encrypt(plaintext, KEY).unwrap();
        assert_ne!(ciphertext, plaintext);
        let decrypted = decrypt(&ciphertext, KEY).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_decrypt_with_wrong_key() {
        let other = b"another32byteslongsecretkey65432";
        let ciphertext = encrypt("Secret message", KEY).unwrap();
        assert!(decrypt(&ciphertext, other).is_err());
    }

    #[test]
    fn test_parse_key() {
        let hex_key = hex::encode(KEY);
        assert_eq!(parse_key(&hex_key).unwrap(), KEY.to_vec());
        assert!(parse_key("abcd").is_err());
        assert!(parse_key("not hex").is_err());
    }

    #[test]
    fn test_vault_storage_encrypts_at_rest() {
        let inner = Arc::new(MemStorage::ephemeral());
        let vault = VaultStorage::new(inner.clone(), KEY).unwrap();

        let user = json!({"user": {"id": "u1", "email": "a@b.c"}, "isAuthenticated": true});
        vault.set("shop", "auth", user.clone()).unwrap();

        assert_eq!(vault.get("shop", "auth").unwrap(), user);
        assert_eq!(vault.dump("shop").unwrap()["auth"], user);

        let raw = inner.get("shop", "auth").unwrap();
        assert!(raw.is_string());
        assert!(!raw.as_str().unwrap().contains("a@b.c"));
    }

    #[test]
    fn test_vault_rejects_plain_values() {
        let inner = Arc::new(MemStorage::ephemeral());
        inner.set("shop", "darkMode", json!(true)).unwrap();
        let vault = VaultStorage::new(inner, KEY).unwrap();

        assert!(matches!(vault.get("shop", "darkMode"), Err(Error::Internal(_))));
    }
}
