// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master password.
//!
//! The salt is server-wide and fixed, not per-record: the derived key must
//! be reconstructible from the password alone on every request, because no
//! key is ever persisted. Same password and salt always yield the same
//! 32-byte key.

use std::num::NonZeroU32;

use lockbox_core::LockboxError;
use ring::pbkdf2;
use zeroize::Zeroizing;

/// Derive a 32-byte symmetric key from the master password.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory
/// zeroing on drop. Callers hold it only for the duration of a single
/// encrypt/decrypt call.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; 32]>, LockboxError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| LockboxError::Vault("PBKDF2 iteration count must be non-zero".to_string()))?;

    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        key.as_mut(),
    );

    Ok(key)
}
