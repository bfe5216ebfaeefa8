// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Transient confirmation toast.

use std::time::{Duration, Instant};

use eframe::egui;

/// A message that hides itself after a fixed delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    expires_at: Instant,
}

impl Notice {
    pub fn new(text: impl Into<String>, now: Instant, lifetime: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: now + lifetime,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Time left before the notice disappears.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

/// Draw the toast in the top-right corner.
pub fn view(ctx: &egui::Context, notice: &Notice) {
    egui::Area::new(egui::Id::new("success_notice"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-24.0, 24.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(16, 185, 129))
                .inner_margin(egui::Margin::symmetric(20, 12))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} {}",
                            egui_phosphor::regular::CHECK,
                            notice.text
                        ))
                        .color(egui::Color32::WHITE)
                        .strong(),
                    );
                });
        });
}
