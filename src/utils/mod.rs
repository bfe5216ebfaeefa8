// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and business logic.

pub mod bytes;
pub mod file_name;
pub mod viewport;

/// Human-readable byte sizes with binary units.
pub use bytes::format_bytes;
/// Filesystem-safe stems for exported files.
pub use file_name::sanitize_stem;
