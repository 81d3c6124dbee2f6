use anyhow::{anyhow, Context};
use std::{sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    exercise::Exercise,
    gfx::{
        camera::{Camera, CameraController, FlyCamera},
        rendering::RenderEngine,
        scene::{draw_scene, DrawList, MatrixStack},
    },
};

/// Window, camera and renderer around one [`Exercise`].
pub struct ExerciseApp<E: Exercise> {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState<E>,
}

struct AppState<E: Exercise> {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    exercise: E,
    camera: FlyCamera,
    controller: CameraController,
    matrix_stack: MatrixStack,
    draw_list: DrawList,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl<E: Exercise> ExerciseApp<E> {
    pub fn new(exercise: E) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        let config = exercise.config();
        let aspect = config.width as f32 / config.height.max(1) as f32;
        let camera = FlyCamera::new(&config.camera, aspect);
        let controller =
            CameraController::new(config.camera.move_speed, config.camera.rotation_speed);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                exercise,
                camera,
                controller,
                matrix_stack: MatrixStack::with_capacity(8),
                draw_list: DrawList::new(),
                last_frame: Instant::now(),
                error: None,
            },
        })
    }

    /// Runs the event loop until the window closes or a fatal error occurs.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => {
                log::info!("{} closed", self.app_state.config.title);
                Ok(())
            }
        }
    }
}

impl<E: Exercise> AppState<E> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
            )
            .context("failed to create window")?;
        let window = Arc::new(window);
        log::info!("window created: {}", self.config.title);

        if self.config.grab_cursor {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
            if let Err(err) = grabbed {
                log::warn!("could not grab cursor: {err}");
            }
            window.set_cursor_visible(false);
        }

        let PhysicalSize { width, height } = window.inner_size();
        let mut renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.clear_color,
        ))
        .context("failed to initialise renderer")?;
        self.camera.resize_projection(width, height);

        self.exercise
            .build(&mut renderer)
            .context("failed to build scene")?;
        if let Some(scene) = self.exercise.scene() {
            renderer
                .check_scene(scene)
                .context("scene refers to a mesh that was never uploaded")?;
            log::info!(
                "scene built with {} nodes, {} meshes",
                scene.len(),
                renderer.mesh_count()
            );
        }

        self.render_engine = Some(renderer);
        self.window = Some(window);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn handle_key_event(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        if code == KeyCode::Escape {
            event_loop.exit();
            return;
        }
        if self.controller.process_keyed_events(event) {
            return;
        }
        if event.state == ElementState::Pressed && !event.repeat {
            if let Err(err) = self.exercise.handle_key(code) {
                self.fail(event_loop, err);
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.controller.update_camera(&mut self.camera);
        if let Err(err) = self.exercise.update(dt) {
            self.fail(event_loop, err);
            return;
        }

        self.draw_list.clear();
        if let Some(scene) = self.exercise.scene() {
            let view_projection = self.camera.build_view_projection_matrix();
            if let Err(err) = draw_scene(
                scene,
                &mut self.matrix_stack,
                view_projection,
                &mut self.draw_list,
            ) {
                self.fail(event_loop, err.into());
                return;
            }
        }
        log::trace!("frame dt={dt:.4}s, {} draw calls", self.draw_list.len());

        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        match render_engine.render_frame(&self.draw_list, self.exercise.highlighted_node()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(window) = self.window.as_ref() {
                    let PhysicalSize { width, height } = window.inner_size();
                    render_engine.resize(width, height);
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow!("GPU out of memory"));
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timeout, retrying next frame");
            }
            Err(err) => {
                log::warn!("surface error: {err}");
            }
        }
    }
}

impl<E: Exercise> ApplicationHandler for AppState<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.render_engine.is_none() {
            return;
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key_event(event_loop, &event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if self.window.is_none() {
            return;
        }
        self.controller.process_events(&event, &mut self.camera);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
