// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for composing a tag card.
//! Handles layout, viewport tracking, and wiring to the export pipeline.

pub mod components;

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::CampaignConfig;
use crate::logic::card::CARD_WIDTH;
use crate::models::form::Field;
use crate::mvu::{self, AppModel, Command, Msg, Platform};
use crate::ui::components::{actions, form, notice, photo_picker, preview};
use crate::utils::viewport::{
    LayoutMode, Subscription, ViewportProvider, ViewportSize, ViewportTracker,
};

/// Poll interval for worker results while commands are in flight.
const WORK_POLL: Duration = Duration::from_millis(100);

/// Stateful egui application for filling in and exporting a tag card.
pub struct TagCardApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
    viewport: ViewportTracker,
    resized: Rc<Cell<Option<ViewportSize>>>,
    _viewport_sub: Subscription,
}

impl TagCardApp {
    pub fn new(config: CampaignConfig, platform: Platform, viewport: ViewportTracker) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let platform = platform.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, &platform);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        let resized = Rc::new(Cell::new(Some(viewport.current())));
        let sink = Rc::clone(&resized);
        let viewport_sub = viewport.subscribe(Box::new(move |size| sink.set(Some(size))));

        Self {
            model: AppModel::new(config),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
            viewport,
            resized,
            _viewport_sub: viewport_sub,
        }
    }
}

impl eframe::App for TagCardApp {
    // Required by eframe 0.34; all rendering happens in `update`, which eframe still calls.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame: drains worker results, applies queued messages,
    /// dispatches new commands, then renders the panels.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }
        if let Some(size) = self.resized.take() {
            self.inbox.push(Msg::ViewportResized(size));
        }
        self.inbox.push(Msg::Tick(Instant::now()));

        // Edits and blurs from one frame must apply in order.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        if let Some(image) = self.model.preview.take_decoded() {
            let texture = ctx.load_texture("tag-card-preview", image, egui::TextureOptions::LINEAR);
            self.model.preview.set_texture(texture);
        }

        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(WORK_POLL);
        }
        if let Some(n) = &self.model.notice {
            ctx.request_repaint_after(n.remaining(Instant::now()));
            notice::view(ctx, n);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Create Your NHF Identity Tag");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                });
            });
            ui.label(
                egui::RichText::new(
                    "Perfect for WhatsApp Status (9:16). Fill in your details below.",
                )
                .small()
                .color(egui::Color32::from_gray(110)),
            );
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let size = ui.max_rect().size();
            self.viewport.observe(ViewportSize::new(size.x, size.y));
            if self.resized.get().is_some() {
                ctx.request_repaint();
            }

            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| match self.model.layout {
                LayoutMode::Wide => {
                    ui.columns(2, |cols| {
                        self.render_form(&mut cols[0]);
                        self.render_preview(&mut cols[1]);
                        cols[1].add_space(12.0);
                        self.render_actions(&mut cols[1]);
                    });
                }
                LayoutMode::Compact => {
                    self.render_preview(ui);
                    ui.add_space(12.0);
                    self.render_actions(ui);
                    ui.add_space(16.0);
                    self.render_form(ui);
                }
            });
        });
    }
}

impl TagCardApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Photo upload followed by the text inputs.
    fn render_form(&mut self, ui: &mut egui::Ui) {
        let enabled = self.model.phase.is_idle();
        let state = self.model.form.state();

        let photo_msgs = photo_picker::view(
            ui,
            state.photo.as_ref(),
            self.model.form.errors().get(Field::Photo),
            self.model.config.max_upload_bytes,
            enabled && !self.model.picking,
        );
        self.inbox.extend(photo_msgs.into_iter().map(Msg::Photo));
        ui.add_space(12.0);

        let form_msgs = form::view(
            ui,
            &self.model.form,
            &self.model.config.labels,
            self.model.layout,
            enabled,
        );
        self.inbox.extend(form_msgs.into_iter().map(Msg::Form));
    }

    /// Card preview, centered and capped at the card's natural width.
    fn render_preview(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width().clamp(120.0, CARD_WIDTH);
        let msgs = ui
            .vertical_centered(|ui| {
                preview::view(ui, &self.model.preview, self.model.revision, width)
            })
            .inner;
        self.inbox.extend(msgs.into_iter().map(Msg::Preview));
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        let requested = actions::view(
            ui,
            self.model.phase,
            !self.model.form.errors().is_empty(),
            self.model.layout,
        );
        self.inbox
            .extend(requested.into_iter().map(Msg::ExportRequested));
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Something went wrong")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            let display = if self.model.pending_commands > 0 {
                format!("{}  ({} working…)", text, self.model.pending_commands)
            } else {
                text.to_string()
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0))
                        .on_hover_text(format!(
                            "{} task(s) running in background",
                            self.model.pending_commands
                        ));
                }
            });
        }
    }
}
