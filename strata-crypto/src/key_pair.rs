//! Per-listener RSA keypair used for the login encryption challenge.

use rsa::RsaPrivateKey;
use rsa::pkcs8::EncodePublicKey;
use thiserror::Error;

/// Vanilla has used a 1024-bit RSA key for the login challenge since its
/// introduction; clients don't negotiate a different size.
pub const RSA_KEY_BITS: usize = 1024;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("RSA operation failed: {0}")]
    Rsa(#[from] rsa::Error),
    #[error("encrypted shared secret had length {0}, expected 16")]
    BadSharedSecretLength(usize),
}

/// A keypair generated fresh for each listener lifetime, plus its
/// DER-encoded `SubjectPublicKeyInfo` — the form sent to clients.
pub struct KeyPair {
    private_key: RsaPrivateKey,
    public_key_der: Box<[u8]>,
}

impl KeyPair {
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS).expect("key generation cannot fail for a valid bit size");
        let public_key_der = rsa::RsaPublicKey::from(&private_key)
            .to_public_key_der()
            .expect("a freshly generated key always encodes")
            .into_vec()
            .into_boxed_slice();
        Self {
            private_key,
            public_key_der,
        }
    }

    #[must_use]
    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key_der
    }

    /// Decrypts an RSA-PKCS1v15-encrypted blob (the shared secret or the
    /// echoed verify token) under the private key.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.private_key
            .decrypt(rsa::Pkcs1v15Encrypt, ciphertext)
            .map_err(CryptoError::from)
    }

    /// Decrypts and validates the shared secret sent in `EncryptionResponse`.
    pub fn decrypt_shared_secret(&self, ciphertext: &[u8]) -> Result<[u8; 16], CryptoError> {
        let decrypted = self.decrypt(ciphertext)?;
        decrypted
            .try_into()
            .map_err(|v: Vec<u8>| CryptoError::BadSharedSecretLength(v.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length_shared_secret() {
        let key_pair = KeyPair::generate();
        // Encrypt a 4-byte "secret" — valid RSA, wrong post-decrypt length.
        let mut rng = rand::rng();
        let public_key = rsa::RsaPublicKey::from(&key_pair.private_key);
        let ciphertext = public_key.encrypt(&mut rng, rsa::Pkcs1v15Encrypt, b"abcd").unwrap();

        let result = key_pair.decrypt_shared_secret(&ciphertext);
        assert!(matches!(result, Err(CryptoError::BadSharedSecretLength(4))));
    }
}
