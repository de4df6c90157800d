//! The column-cipher capability.

use serde::{Deserialize, Serialize};

use crate::error::CipherError;

/// Which key a cipher should use for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySelector {
    /// The cipher's shared default key.
    #[default]
    Shared,
    /// A key registered for this specific column.
    PerColumn,
}

/// Transparent per-column encryption.
///
/// `column` names the column being processed so per-column keys can be looked
/// up; shared-key ciphers may ignore it. Implementations must fail with a
/// [`CipherError`] on corrupt or unauthenticated input rather than return
/// garbage.
pub trait ColumnCipher: Send + Sync {
    fn encrypt(
        &self,
        plain: &[u8],
        key: KeySelector,
        column: &str,
    ) -> Result<Vec<u8>, CipherError>;

    fn decrypt(
        &self,
        cipher: &[u8],
        key: KeySelector,
        column: &str,
    ) -> Result<Vec<u8>, CipherError>;
}
