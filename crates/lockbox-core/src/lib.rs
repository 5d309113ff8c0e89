// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lockbox secrets vault.
//!
//! This crate provides the error enum and domain types shared by the
//! vault, storage, and gateway crates. It has no I/O and no crypto of
//! its own.

pub mod error;
pub mod types;

pub use error::LockboxError;
pub use types::{ActivityAction, ActivityEntry, Category, CredentialRecord, MasterCredential};
