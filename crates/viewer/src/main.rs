//! Wander - first-person walk-through of a procedurally generated terrain.

mod assets;
mod time;

use anyhow::Result;
use input::InputState;
use procgen::{HeightFieldConfig, TerrainMeshData};
use renderer::{CameraController, Renderer, RendererError};
use std::sync::Arc;
use time::Time;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

/// Everything the viewer owns once the window exists.
struct ViewerState {
    time: Time,
    input: InputState,
    camera: CameraController,
    renderer: Renderer,
    running: bool,
}

impl ViewerState {
    async fn new(window: Arc<Window>) -> Result<Self> {
        let scene = assets::load_scene_textures(&assets::default_assets_dir())?;
        let mut renderer = Renderer::new(window.clone(), &scene).await?;

        let config = HeightFieldConfig::default();
        let mesh = TerrainMeshData::generate(&config);
        renderer.push_mesh(&mesh);

        let size = window.inner_size();
        let camera = CameraController::new(size.width, size.height);

        Ok(Self {
            time: Time::new(),
            input: InputState::new(),
            camera,
            renderer,
            running: true,
        })
    }

    /// Engage pointer lock: grab + hide the cursor, then switch input focus.
    /// Locked grab is not available everywhere (X11), so fall back to
    /// Confined.
    fn grab_cursor(&mut self) {
        let window = &self.renderer.window;
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.input.lock();
            }
            Err(e) => log::warn!("cursor grab failed: {}", e),
        }
    }

    /// Release pointer lock and restore the cursor.
    fn release_cursor(&mut self) {
        let window = &self.renderer.window;
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("cursor release failed: {}", e);
        }
        window.set_cursor_visible(true);
        self.input.unlock();
    }

    fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
            }
            WindowEvent::Resized(new_size) => {
                self.renderer.resize(new_size);
                self.camera.set_aspect(new_size.width, new_size.height);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if !self.input.is_locked() {
                    self.grab_cursor();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape && state == ElementState::Pressed {
                    self.release_cursor();
                } else {
                    self.input.process_keyboard(key, state);
                }
            }
            WindowEvent::RedrawRequested => {
                self.update_and_render();
                self.renderer.window.request_redraw();
            }
            _ => {}
        }
    }

    fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta);
        }
    }

    fn update_and_render(&mut self) {
        self.time.update();

        self.camera.moving = {
            let flags = self.input.movement_flags();
            renderer::Moving {
                forward: flags.forward,
                backward: flags.backward,
                left: flags.left,
                right: flags.right,
            }
        };
        let look = self.input.take_mouse_delta();
        self.camera.process_mouse(look.x, look.y);
        self.camera.update(self.time.delta_seconds());

        match self.renderer.render(&self.camera) {
            Ok(()) => {}
            // Lost/outdated surfaces recover on reconfigure; do it via resize.
            Err(RendererError::Surface(wgpu::SurfaceError::Lost))
            | Err(RendererError::Surface(wgpu::SurfaceError::Outdated)) => {
                let size = self.renderer.size;
                self.renderer.resize(size);
            }
            Err(RendererError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("surface out of memory, exiting");
                self.running = false;
            }
            Err(e) => log::warn!("render error: {}", e),
        }
    }
}

/// Application handler for winit.
struct App {
    state: Option<ViewerState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Wander")
                .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(ViewerState::new(window.clone())) {
                Ok(state) => {
                    self.state = Some(state);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize viewer: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            state.handle_window_event(event);
            if !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Wander (click to lock cursor, WASD + mouse, Escape to release)");

    let event_loop = EventLoop::new()?;
    // Poll continuously; Wait would delay RedrawRequested after input.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
