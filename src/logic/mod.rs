// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic: card rendering, rasterization, and export delivery.

pub mod card;
pub mod dispatch;
pub mod export;
pub mod raster;
