// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::sync::Arc;
use std::time::Instant;

use eframe::egui;

use crate::config::CampaignConfig;
use crate::logic::dispatch::{
    self, DispatchOutcome, Downloader, FolderDownloader, NoNativeShare, ShareTarget,
};
use crate::logic::export::{
    ExportAction, ExportArtifact, ExportError, ExportPhase, ExportRequest, SharePayload,
    rasterize_artifact,
};
use crate::logic::card::render_card;
use crate::logic::raster::{RasterOptions, Rasterizer, SvgRasterizer};
use crate::models::form::validate;
use crate::models::photo::{Photo, UploadError, load_photo};
use crate::ui::components::form::{self, FormModel, FormMsg};
use crate::ui::components::notice::Notice;
use crate::ui::components::photo_picker::PhotoMsg;
use crate::ui::components::preview::{self, PreviewCommand, PreviewKey, PreviewModel, PreviewMsg};
use crate::utils::viewport::{LayoutMode, ViewportSize};

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Campaign copy and limits.
    pub config: CampaignConfig,
    /// Field values and per-field errors.
    pub form: FormModel,
    /// Where the export pipeline currently is.
    pub phase: ExportPhase,
    /// Transient success toast.
    pub notice: Option<Notice>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    pub layout: LayoutMode,
    /// Bumped whenever the card would render differently; keys the preview.
    pub revision: u64,
    pub preview: PreviewModel,
    /// A file dialog is open.
    pub picking: bool,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn new(config: CampaignConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    Form(FormMsg),
    Photo(PhotoMsg),
    Preview(PreviewMsg),
    PhotoLoaded(Result<Photo, UploadError>),
    PhotoPickCancelled,
    ExportRequested(ExportAction),
    Rasterized {
        action: ExportAction,
        payload: SharePayload,
        result: Result<ExportArtifact, ExportError>,
    },
    Dispatched(Result<DispatchOutcome, ExportError>),
    Tick(Instant),
    ViewportResized(ViewportSize),
    DismissError,
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickPhoto {
        max_bytes: u64,
    },
    RenderPreview {
        revision: u64,
        scale: f32,
        svg: String,
    },
    Rasterize(ExportRequest),
    Dispatch {
        action: ExportAction,
        artifact: ExportArtifact,
        payload: SharePayload,
    },
}

/// Platform collaborators used by commands.
#[derive(Clone)]
pub struct Platform {
    pub rasterizer: Arc<dyn Rasterizer>,
    pub share: Arc<dyn ShareTarget>,
    pub downloader: Arc<dyn Downloader>,
}

impl Platform {
    /// resvg with system fonts, no native share sheet, saves into the download folder.
    pub fn desktop() -> Self {
        let downloader = FolderDownloader::user_downloads();
        log::info!("Downloads go to {}", downloader.dir().display());
        Self {
            rasterizer: Arc::new(SvgRasterizer::with_system_fonts()),
            share: Arc::new(NoNativeShare),
            downloader: Arc::new(downloader),
        }
    }
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::Form(m) => apply_form(model, m),
        Msg::Photo(PhotoMsg::RequestPick) => {
            if model.phase.is_idle() && !model.picking {
                model.picking = true;
                cmds.push(Command::PickPhoto {
                    max_bytes: model.config.max_upload_bytes,
                });
            }
        }
        Msg::Photo(PhotoMsg::Remove) => apply_form(model, FormMsg::PhotoRemoved),
        Msg::Preview(m) => {
            if let Some(PreviewCommand::Render(key)) =
                preview::update(&mut model.preview, m, model.revision)
            {
                cmds.push(Command::RenderPreview {
                    revision: key.revision,
                    scale: key.scale(),
                    svg: render_card(model.form.state(), &model.config.card).svg,
                });
            }
        }
        Msg::PhotoLoaded(Ok(photo)) => {
            model.picking = false;
            log::info!(
                "Accepted photo {} ({}x{})",
                photo.file_name,
                photo.width,
                photo.height
            );
            let status = format!("Photo loaded: {}", photo.file_name);
            apply_form(model, FormMsg::PhotoAccepted(photo));
            surface_event(model, status, false);
        }
        Msg::PhotoLoaded(Err(err)) => {
            model.picking = false;
            log::warn!("Rejected photo upload: {err}");
            surface_event(model, err.to_string(), true);
        }
        Msg::PhotoPickCancelled => model.picking = false,
        Msg::ExportRequested(action) => start_export(model, action, cmds),
        Msg::Rasterized {
            action,
            payload,
            result,
        } => {
            if model.phase != ExportPhase::Rasterizing {
                log::warn!("Ignoring rasterization result outside of an export");
                return;
            }
            match result {
                Ok(artifact) => {
                    log::debug!(
                        "Rasterized {} ({}x{}, {} bytes)",
                        artifact.file_name,
                        artifact.width,
                        artifact.height,
                        artifact.png.len()
                    );
                    enter(model, ExportPhase::Dispatching);
                    cmds.push(Command::Dispatch {
                        action,
                        artifact,
                        payload,
                    });
                }
                Err(err) => fail_export(model, err),
            }
        }
        Msg::Dispatched(result) => {
            if model.phase != ExportPhase::Dispatching {
                log::warn!("Ignoring dispatch result outside of an export");
                return;
            }
            match result {
                Ok(DispatchOutcome::Cancelled) => {
                    log::debug!("Share cancelled by user");
                    enter(model, ExportPhase::Idle);
                }
                Ok(outcome) => {
                    let (notice, status) = match &outcome {
                        DispatchOutcome::Downloaded(path) => (
                            "Tag generated and saved successfully!",
                            format!("Saved to {}", path.display()),
                        ),
                        _ => ("Tag shared successfully!", "Tag shared.".to_string()),
                    };
                    log::info!("Export finished: {outcome:?}");
                    enter(model, ExportPhase::Succeeded);
                    model.notice = Some(Notice::new(
                        notice,
                        Instant::now(),
                        model.config.notice_duration(),
                    ));
                    surface_event(model, status, false);
                    enter(model, ExportPhase::Idle);
                }
                Err(err) => fail_export(model, err),
            }
        }
        Msg::Tick(now) => {
            if model.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
                model.notice = None;
            }
        }
        Msg::ViewportResized(size) => {
            let layout = size.layout();
            if layout != model.layout {
                log::debug!("Layout switched to {layout:?} at {}px", size.width);
                model.layout = layout;
            }
        }
        Msg::DismissError => model.error = None,
    }
}

/// Execute a command on a worker thread and return the resulting message.
pub fn run_command(cmd: Command, platform: &Platform) -> Msg {
    match cmd {
        Command::PickPhoto { max_bytes } => {
            let file = rfd::FileDialog::new()
                .set_title("Select profile photo")
                .add_filter("Images", &["png", "jpg", "jpeg", "webp", "gif", "bmp"])
                .pick_file();
            match file {
                Some(path) => Msg::PhotoLoaded(load_photo(&path, max_bytes)),
                None => Msg::PhotoPickCancelled,
            }
        }
        Command::RenderPreview {
            revision,
            scale,
            svg,
        } => {
            let result = platform
                .rasterizer
                .rasterize(&svg, RasterOptions { scale })
                .map(|image| {
                    egui::ColorImage::from_rgba_unmultiplied(
                        [image.width as usize, image.height as usize],
                        &image.rgba,
                    )
                })
                .map_err(|err| err.to_string());
            Msg::Preview(PreviewMsg::Rendered {
                key: PreviewKey::new(revision, scale),
                result,
            })
        }
        Command::Rasterize(request) => Msg::Rasterized {
            action: request.action,
            result: rasterize_artifact(platform.rasterizer.as_ref(), &request),
            payload: request.payload,
        },
        Command::Dispatch {
            action,
            artifact,
            payload,
        } => Msg::Dispatched(dispatch::dispatch(
            action,
            &artifact,
            &payload,
            platform.share.as_ref(),
            platform.downloader.as_ref(),
        )),
    }
}

fn apply_form(model: &mut AppModel, msg: FormMsg) {
    if form::update(&mut model.form, msg) {
        model.revision += 1;
    }
}

/// Validate, then hand the captured card to the rasterization stage.
fn start_export(model: &mut AppModel, action: ExportAction, cmds: &mut Vec<Command>) {
    if !model.phase.is_idle() {
        log::debug!("Export already running, ignoring {action:?}");
        return;
    }

    enter(model, ExportPhase::Validating);
    let errors = validate(model.form.state(), &model.config.labels);
    if !errors.is_empty() {
        log::debug!("Export blocked by {} missing field(s)", errors.len());
        model.form.set_errors(errors);
        model.status = Some("Please fill in all required fields.".into());
        enter(model, ExportPhase::Idle);
        return;
    }
    model.form.set_errors(Default::default());

    let request = ExportRequest::capture(action, model.form.state(), &model.config);
    enter(model, ExportPhase::Rasterizing);
    cmds.push(Command::Rasterize(request));
}

fn fail_export(model: &mut AppModel, err: ExportError) {
    log::error!("Export failed: {err}");
    enter(model, ExportPhase::Failed);
    surface_event(model, err.to_string(), true);
    enter(model, ExportPhase::Idle);
}

fn enter(model: &mut AppModel, phase: ExportPhase) {
    log::debug!("Export phase {:?} -> {:?}", model.phase, phase);
    model.phase = phase;
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}
