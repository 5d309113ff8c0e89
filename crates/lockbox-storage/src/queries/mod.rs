// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations, grouped by entity.

pub mod activity;
pub mod categories;
pub mod credentials;
pub mod master;
