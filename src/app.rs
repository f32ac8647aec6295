use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::cli::Cli;
use crate::config::ViewerConfig;
use crate::core::{Clock, GpuContext};
use crate::editor::Editor;
use crate::gizmo::GizmoMode;
use crate::loaders::is_supported_model;
use crate::selection::EngineCapabilities;
use crate::{ui, viewport};

/// Window-side state created once the event loop resumes.
struct Surface {
    window: Arc<Window>,
    gpu: GpuContext,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
}

pub struct App {
    editor: Editor,
    clock: Clock,
    surface: Option<Surface>,
    window_size: (u32, u32),
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => ViewerConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(intensity) = cli.light_intensity {
            config.light_intensity = intensity;
        }

        let capabilities = EngineCapabilities { editing: !cli.view_only };
        let mut editor = Editor::new(&config, capabilities);
        for path in &cli.models {
            // A bad start-up model is reported in the UI rather than aborting.
            let _ = editor.import_file(path);
        }

        Ok(Self {
            editor,
            clock: Clock::new(),
            surface: None,
            window_size: (cli.width, cli.height),
        })
    }

    fn create_surface(&self, event_loop: &ActiveEventLoop) -> Result<Surface> {
        let (width, height) = self.window_size;
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title("Scene Editor")
                    .with_inner_size(winit::dpi::LogicalSize::new(width, height)),
            )
            .context("creating window")?;
        let window = Arc::new(window);
        let gpu = pollster::block_on(GpuContext::new(window.clone())).context("initializing GPU")?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Surface {
            window,
            gpu,
            egui_ctx,
            egui_state,
        })
    }

    fn import_dropped(&mut self, path: PathBuf) {
        if is_supported_model(&path) {
            let _ = self.editor.import_file(&path);
        } else {
            log::info!("ignoring dropped file {}", path.display());
        }
    }

    fn redraw(&mut self) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        let dt = self.clock.tick();
        self.editor.update(dt);

        let editor = &mut self.editor;
        let fps = self.clock.fps();

        let raw_input = surface.egui_state.take_egui_input(&surface.window);
        let mut load_requested = false;
        let full_output = surface.egui_ctx.run(raw_input, |ctx| {
            egui::TopBottomPanel::top("controls").show(ctx, |ui| {
                let mut lighting = *editor.lighting();
                if ui::lighting_panel(ui, &mut lighting) {
                    editor.set_lighting(lighting);
                }
                load_requested |= ui::import_panel(ui, editor.status()).clicked();
                if editor.engine.capabilities().editing {
                    if let Some(mode) = ui::gizmo_mode_panel(ui, editor.gizmo.mode()) {
                        editor.set_gizmo_mode(mode);
                    }
                }
            });

            egui::SidePanel::right("selection").show(ctx, |ui| {
                for edit in ui::selection_panel(ui, &editor.engine) {
                    editor.apply_field_edit(edit.field, edit.axis, edit.value);
                }
                ui.separator();
                ui.label(egui::RichText::new(format!("{:.0} fps", fps)).weak());
            });

            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| viewport::show(ui, editor));

            if !ctx.wants_keyboard_input() {
                let keys = [(egui::Key::T, 't'), (egui::Key::R, 'r'), (egui::Key::S, 's')];
                for (key, shortcut) in keys {
                    if ctx.input(|i| i.key_pressed(key)) {
                        if let Some(mode) = GizmoMode::from_key(shortcut) {
                            editor.set_gizmo_mode(mode);
                        }
                    }
                }
            }
        });

        surface
            .egui_state
            .handle_platform_output(&surface.window, full_output.platform_output);
        let pixels_per_point = full_output.pixels_per_point;
        let primitives = surface.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        if let Err(e) = surface.gpu.render(
            self.editor.scene.background,
            &primitives,
            &full_output.textures_delta,
            pixels_per_point,
        ) {
            log::error!("render error: {}", e);
        }

        if load_requested {
            if let Some(path) = ui::pick_model_file() {
                let _ = self.editor.import_file(&path);
            }
        }
    }
}

/// Escape quits unless egui used the key, e.g. to leave a focused field.
fn quits(key: PhysicalKey, state: ElementState, consumed_by_ui: bool) -> bool {
    !consumed_by_ui && state == ElementState::Pressed && key == PhysicalKey::Code(KeyCode::Escape)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        match self.create_surface(event_loop) {
            Ok(surface) => {
                self.clock.reset();
                self.surface = Some(surface);
            }
            Err(e) => {
                log::error!("{:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let consumed = match &mut self.surface {
            Some(surface) => surface.egui_state.on_window_event(&surface.window, &event).consumed,
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } if quits(event.physical_key, event.state, consumed) => {
                event_loop.exit()
            }
            WindowEvent::Resized(size) => {
                if let Some(surface) = &mut self.surface {
                    surface.gpu.resize(size);
                }
            }
            WindowEvent::DroppedFile(path) => self.import_dropped(path),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(surface) = &self.surface {
            surface.window.request_redraw();
        }
    }
}
