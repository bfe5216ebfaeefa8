// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring egui/eframe to launch the tag card UI.

use eframe::egui;
use egui_phosphor::Variant;

use crate::config::CampaignConfig;
use crate::mvu::Platform;
use crate::ui::TagCardApp;
use crate::utils::viewport::{ViewportSize, ViewportTracker};

const WINDOW_SIZE: [f32; 2] = [1024.0, 860.0];

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run() -> eframe::Result<()> {
    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let config = CampaignConfig::bundled();
    let platform = Platform::desktop();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size([400.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tag Card",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            let viewport = ViewportTracker::new(ViewportSize::new(WINDOW_SIZE[0], WINDOW_SIZE[1]));
            Ok(Box::new(TagCardApp::new(config, platform, viewport)))
        }),
    )
}
