// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `lockbox-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within
//! the storage crate.

pub use lockbox_core::types::{
    ActivityAction, ActivityEntry, Category, CredentialRecord, MasterCredential,
};
