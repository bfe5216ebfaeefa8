// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod actions;
pub mod form;
pub mod notice;
pub mod photo_picker;
pub mod preview;
