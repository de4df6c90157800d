//! Authenticated column cipher for tabula.
//!
//! [`Keyring`] implements [`ColumnCipher`] with a shared key and optional
//! per-column keys. Keys are 32 bytes, supplied raw or derived from a
//! passphrase with PBKDF2-HMAC-SHA256.
//!
//! # Format
//!
//! ```text
//! version (1) | nonce (16) | ciphertext (n) | tag (32)
//! ```
//!
//! The plaintext is XORed with an HMAC-SHA256 keystream over
//! `nonce || block counter`; the tag is HMAC-SHA256 over everything before it.
//! Encryption and authentication use separate subkeys derived from the column
//! key. A fresh random nonce is drawn for every value, so encrypting the same
//! plaintext twice gives different ciphertexts.

use std::collections::HashMap;
use std::fmt;

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use tabula_core::{CipherError, CipherErrorKind, ColumnCipher, KeySelector};

type HmacSha256 = Hmac<Sha256>;

/// Key length in bytes.
pub const KEY_LEN: usize = 32;
/// Nonce length in bytes.
pub const NONCE_LEN: usize = 16;
/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 32;
/// PBKDF2 iteration count used by [`Key::from_passphrase`].
pub const DEFAULT_PBKDF2_ROUNDS: u32 = 100_000;
/// Shortest salt [`Key::derive`] accepts.
pub const MIN_SALT_LEN: usize = 8;

const VERSION: u8 = 1;
const HEADER_LEN: usize = 1 + NONCE_LEN;
const BLOCK_LEN: usize = 32;

/// Secret key material. `Debug` output never shows the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Use `bytes` as the key; it must be exactly [`KEY_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CipherError> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| key_error(format!("key must be {} bytes, got {}", KEY_LEN, bytes.len())))?;
        Ok(Self(key))
    }

    /// Derive a key from a passphrase with PBKDF2-HMAC-SHA256.
    pub fn derive(passphrase: &str, salt: &[u8], rounds: u32) -> Result<Self, CipherError> {
        if passphrase.is_empty() {
            return Err(key_error("passphrase is empty".to_string()));
        }
        if salt.len() < MIN_SALT_LEN {
            return Err(key_error(format!(
                "salt must be at least {} bytes",
                MIN_SALT_LEN
            )));
        }
        if rounds == 0 {
            return Err(key_error("PBKDF2 needs at least one round".to_string()));
        }
        let mut key = [0u8; KEY_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, rounds, &mut key);
        Ok(Self(key))
    }

    /// [`Key::derive`] with [`DEFAULT_PBKDF2_ROUNDS`].
    pub fn from_passphrase(passphrase: &str, salt: &[u8]) -> Result<Self, CipherError> {
        Self::derive(passphrase, salt, DEFAULT_PBKDF2_ROUNDS)
    }

    /// A key from the thread-local CSPRNG.
    pub fn random() -> Self {
        let mut key = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        Self(key)
    }

    fn subkey(&self, label: &[u8]) -> Result<[u8; KEY_LEN], CipherError> {
        let mut mac = new_mac(&self.0)?;
        mac.update(label);
        let mut subkey = [0u8; KEY_LEN];
        subkey.copy_from_slice(&mac.finalize().into_bytes());
        Ok(subkey)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(<redacted>)")
    }
}

/// A shared key plus per-column keys, usable as a [`ColumnCipher`].
#[derive(Debug, Clone, Default)]
pub struct Keyring {
    shared: Option<Key>,
    columns: HashMap<String, Key>,
}

impl Keyring {
    /// An empty keyring; every operation fails until a key is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// A keyring with `key` as the shared key.
    pub fn with_shared(key: Key) -> Self {
        Self {
            shared: Some(key),
            columns: HashMap::new(),
        }
    }

    pub fn set_shared(&mut self, key: Key) {
        self.shared = Some(key);
    }

    /// Register the key used for `column` under [`KeySelector::PerColumn`].
    pub fn add_column_key(&mut self, column: impl Into<String>, key: Key) {
        let column = column.into();
        tracing::debug!(column = %column, "Registered column key");
        self.columns.insert(column, key);
    }

    pub fn remove_column_key(&mut self, column: &str) -> bool {
        self.columns.remove(column).is_some()
    }

    pub fn has_column_key(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    fn key_for(&self, selector: KeySelector, column: &str) -> Result<&Key, CipherError> {
        let key = match selector {
            KeySelector::Shared => self.shared.as_ref(),
            KeySelector::PerColumn => self.columns.get(column),
        };
        key.ok_or_else(|| CipherError {
            kind: CipherErrorKind::MissingKey,
            column: Some(column.to_string()),
            message: match selector {
                KeySelector::Shared => "no shared key".to_string(),
                KeySelector::PerColumn => "no key registered for this column".to_string(),
            },
        })
    }
}

impl ColumnCipher for Keyring {
    fn encrypt(
        &self,
        plain: &[u8],
        key: KeySelector,
        column: &str,
    ) -> Result<Vec<u8>, CipherError> {
        let key = self.key_for(key, column)?;
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        seal(key, &nonce, plain)
    }

    fn decrypt(
        &self,
        cipher: &[u8],
        key: KeySelector,
        column: &str,
    ) -> Result<Vec<u8>, CipherError> {
        let key = self.key_for(key, column)?;
        open(key, cipher).map_err(|mut e| {
            e.column = Some(column.to_string());
            e
        })
    }
}

fn seal(key: &Key, nonce: &[u8; NONCE_LEN], plain: &[u8]) -> Result<Vec<u8>, CipherError> {
    let enc_key = key.subkey(b"tabula column encryption")?;
    let mac_key = key.subkey(b"tabula column authentication")?;

    let mut out = Vec::with_capacity(HEADER_LEN + plain.len() + TAG_LEN);
    out.push(VERSION);
    out.extend_from_slice(nonce);
    out.extend_from_slice(plain);
    apply_keystream(&enc_key, nonce, &mut out[HEADER_LEN..])?;

    let mut mac = new_mac(&mac_key)?;
    mac.update(&out);
    out.extend_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn open(key: &Key, sealed: &[u8]) -> Result<Vec<u8>, CipherError> {
    if sealed.len() < HEADER_LEN + TAG_LEN {
        return Err(corrupt(format!("ciphertext too short ({} bytes)", sealed.len())));
    }
    if sealed[0] != VERSION {
        return Err(corrupt(format!("unknown format version {}", sealed[0])));
    }
    let (body, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    let mac_key = key.subkey(b"tabula column authentication")?;
    let mut mac = new_mac(&mac_key)?;
    mac.update(body);
    mac.verify_slice(tag).map_err(|_| CipherError {
        kind: CipherErrorKind::Authentication,
        column: None,
        message: "tag mismatch (wrong key or modified ciphertext)".to_string(),
    })?;

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&body[1..HEADER_LEN]);
    let enc_key = key.subkey(b"tabula column encryption")?;
    let mut plain = body[HEADER_LEN..].to_vec();
    apply_keystream(&enc_key, &nonce, &mut plain)?;
    Ok(plain)
}

/// XOR `data` with HMAC(key, nonce || counter) blocks.
fn apply_keystream(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    data: &mut [u8],
) -> Result<(), CipherError> {
    for (counter, chunk) in data.chunks_mut(BLOCK_LEN).enumerate() {
        let mut mac = new_mac(key)?;
        mac.update(nonce);
        mac.update(&(counter as u64).to_be_bytes());
        let block = mac.finalize().into_bytes();
        for (byte, k) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= k;
        }
    }
    Ok(())
}

fn new_mac(key: &[u8]) -> Result<HmacSha256, CipherError> {
    <HmacSha256 as Mac>::new_from_slice(key).map_err(|e| key_error(e.to_string()))
}

fn key_error(message: String) -> CipherError {
    CipherError {
        kind: CipherErrorKind::Key,
        column: None,
        message,
    }
}

fn corrupt(message: String) -> CipherError {
    CipherError {
        kind: CipherErrorKind::Corrupt,
        column: None,
        message,
    }
}
