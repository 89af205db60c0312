//! Storyreel - storyboard and video editor
//!
//! Entry point: logging, configuration, the generation runtime and the
//! egui frame loop that feeds user input to the editor.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use eframe::egui;
use storyreel_ai::{FalImageGenerator, GenerationDispatcher};
use storyreel_core::EditorConfig;
use storyreel_editor::{Editor, EditorCommand};
use storyreel_playback::ClockPlayer;
use storyreel_timeline::Gesture;
use storyreel_ui::{
    read_shortcuts, show_library, show_notices, show_storyboard, show_timeline, show_viewer,
    LibraryPanelState, Theme,
};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Stills the editor opens with.
fn sample_media() -> Vec<String> {
    (1..=6)
        .map(|seed| format!("https://picsum.photos/seed/{seed}/300/200"))
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Storyreel starting...");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = EditorConfig::load_or_default(config_path.as_deref())
        .context("failed to load editor config")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("storyreel-gen")
        .enable_all()
        .build()
        .context("failed to start generation runtime")?;

    let mut editor = Editor::new(config.clone(), ClockPlayer::new(), sample_media())?;
    match FalImageGenerator::from_config(&config.generation) {
        Ok(generator) => {
            let dispatcher = GenerationDispatcher::new(runtime.handle().clone(), Arc::new(generator));
            editor = editor.with_dispatcher(dispatcher);
        }
        Err(e) => warn!(error = %e, "Image generation disabled"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1360.0, 820.0])
            .with_title("Storyreel"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Storyreel",
        options,
        Box::new(move |cc| Ok(Box::new(StoryreelApp::new(cc, editor, runtime)))),
    )?;

    Ok(())
}

struct StoryreelApp {
    editor: Editor<ClockPlayer>,
    library_panel: LibraryPanelState,
    started: Instant,
    last_frame: Instant,
    // Kept alive for in-flight generation requests.
    _runtime: Runtime,
}

impl StoryreelApp {
    fn new(cc: &eframe::CreationContext<'_>, editor: Editor<ClockPlayer>, runtime: Runtime) -> Self {
        Theme::apply(&cc.egui_ctx);
        let now = Instant::now();
        Self {
            editor,
            library_panel: LibraryPanelState::default(),
            started: now,
            last_frame: now,
            _runtime: runtime,
        }
    }

    /// Whether anything changes without user input.
    fn is_animating(&self) -> bool {
        let state = self.editor.state();
        self.editor.is_playing()
            || state.is_generating()
            || !state.notices.is_empty()
            || *self.editor.engine().gesture() != Gesture::Idle
    }
}

impl eframe::App for StoryreelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        // Long stalls (window dragged, machine asleep) must not jump playback.
        let dt = now.duration_since(self.last_frame).as_secs_f64().min(0.25);
        self.last_frame = now;
        self.editor.tick(dt);

        let mut commands: Vec<EditorCommand> = read_shortcuts(ctx);
        let time = now.duration_since(self.started).as_secs_f64();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Edit", |ui| {
                    if ui.button("Undo").clicked() {
                        commands.push(EditorCommand::Undo);
                        ui.close_menu();
                    }
                    if ui.button("Redo").clicked() {
                        commands.push(EditorCommand::Redo);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Delete selected clips").clicked() {
                        commands.push(EditorCommand::DeleteSelected);
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Zoom in").clicked() {
                        commands.push(EditorCommand::ZoomIn);
                        ui.close_menu();
                    }
                    if ui.button("Zoom out").clicked() {
                        commands.push(EditorCommand::ZoomOut);
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    for (keys, action) in storyreel_ui::shortcuts::SHORTCUTS {
                        ui.label(format!("{keys:<22} {action}"));
                    }
                });
            });
        });

        egui::SidePanel::left("library_panel")
            .resizable(true)
            .default_width(240.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                commands.extend(show_library(
                    ui,
                    &self.editor.state().library,
                    &mut self.library_panel,
                ));
            });

        egui::SidePanel::right("storyboard_panel")
            .resizable(true)
            .default_width(300.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                commands.extend(show_storyboard(
                    ui,
                    self.editor.state(),
                    self.editor.can_generate(),
                ));
            });

        let gesture_active = *self.editor.engine().gesture() != Gesture::Idle;
        egui::TopBottomPanel::bottom("timeline_panel")
            .resizable(true)
            .min_height(160.0)
            .default_height(320.0)
            .show(ctx, |ui| {
                commands.extend(show_timeline(ui, self.editor.state(), gesture_active));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            commands.extend(show_viewer(ui, &self.editor, time));
        });

        commands.extend(show_notices(ctx, &self.editor.state().notices));

        for command in commands {
            // Failures are posted as notices by the editor.
            let _ = self.editor.dispatch(command);
        }

        if self.is_animating() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
