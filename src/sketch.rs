//! Sketch orchestration: builder, event loop, and per-frame update.
//!
//! [`Sketch`] is the builder; [`SketchState`] is the explicit context struct
//! that holds every piece of mutable per-frame state (fields, projector,
//! clock, camera, input) so the update path can be exercised in tests
//! without a window or a GPU. The winit `ApplicationHandler` is a thin
//! driver around the two.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::clock::FrameClock;
use crate::error::SketchError;
use crate::field::{FieldConfig, ParticleField, DEFAULT_INSTANCE_COUNT};
use crate::gpu::camera::OrbitCamera;
use crate::gpu::GpuState;
use crate::input::{Input, MouseButton};
use crate::projector::{GroundPlane, PointerProjector};
use crate::texture::SpriteTexture;

/// Handle for stopping a running sketch from outside the event loop.
///
/// Cloneable and thread-safe; the loop checks it once per frame and tears
/// down deterministically when it fires.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a fresh, un-fired handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the sketch to stop after the current frame.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// All mutable per-frame state, independent of windowing and the GPU.
#[derive(Debug)]
pub struct SketchState {
    fields: Vec<ParticleField>,
    projector: PointerProjector,
    clock: FrameClock,
    camera: OrbitCamera,
    input: Input,
}

impl SketchState {
    fn new(fields: Vec<ParticleField>, plane: GroundPlane) -> Self {
        Self {
            fields,
            projector: PointerProjector::new(plane),
            clock: FrameClock::new(),
            camera: OrbitCamera::new(),
            input: Input::new(),
        }
    }

    /// The fields being drawn.
    pub fn fields(&self) -> &[ParticleField] {
        &self.fields
    }

    /// The shared camera.
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// The frame clock.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// The pointer projector.
    pub fn projector(&self) -> &PointerProjector {
        &self.projector
    }

    /// Advance the clock one step and push fresh time/pointer values into
    /// every field. All uniform state is current when this returns, before
    /// any draw is issued.
    pub fn advance_frame(&mut self) -> f32 {
        let elapsed = self.clock.tick();
        let pointer = self.projector.point();
        for field in &mut self.fields {
            let scaled = elapsed * field.config().time_scale;
            field.update_uniforms(scaled, pointer);
        }
        elapsed
    }

    /// Project a pointer position (NDC) onto the ground plane. Misses leave
    /// the previous point in place.
    pub fn handle_pointer_move(&mut self, ndc: Vec2) {
        self.projector.project(ndc, &self.camera);
    }

    /// Recompute the camera aspect for a new viewport size.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        self.input.set_window_size(width, height);
    }

    /// Orbit the camera by one cursor-drag delta, in pixels. Callers pass
    /// each event's delta exactly once.
    pub fn handle_drag(&mut self, delta: Vec2) {
        self.camera.yaw -= delta.x * 0.005;
        self.camera.pitch = (self.camera.pitch + delta.y * 0.005).clamp(-1.5, 1.5);
    }

    /// Zoom the camera by one scroll amount. Positive zooms in.
    pub fn handle_zoom(&mut self, scroll: f32) {
        if scroll != 0.0 {
            self.camera.distance = (self.camera.distance - scroll * 0.3).clamp(0.5, 20.0);
        }
    }
}

/// Builder for an interactive particle-field sketch.
pub struct Sketch {
    field_configs: Vec<FieldConfig>,
    instance_count: u32,
    plane: GroundPlane,
    sprite: SpriteTexture,
    title: String,
    cancel: CancelHandle,
}

impl Sketch {
    /// Create an empty sketch. At least one field must be added before
    /// running.
    pub fn new() -> Self {
        Self {
            field_configs: Vec::new(),
            instance_count: DEFAULT_INSTANCE_COUNT,
            plane: GroundPlane::default(),
            sprite: SpriteTexture::default(),
            title: "ringfield".to_string(),
            cancel: CancelHandle::new(),
        }
    }

    /// Add a particle field.
    pub fn with_field(mut self, config: FieldConfig) -> Self {
        self.field_configs.push(config);
        self
    }

    /// Set the per-field instance count.
    pub fn with_instance_count(mut self, count: u32) -> Self {
        self.instance_count = count;
        self
    }

    /// Set the pointer reference plane.
    pub fn with_plane(mut self, plane: GroundPlane) -> Self {
        self.plane = plane;
        self
    }

    /// Set the sprite texture sampled by every field.
    pub fn with_texture(mut self, sprite: SpriteTexture) -> Self {
        self.sprite = sprite;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Handle that stops the sketch from another thread. May be taken
    /// before or after `run` starts.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Validate the configuration and build the per-frame state.
    pub fn build_state(&self) -> Result<SketchState, SketchError> {
        if self.field_configs.is_empty() {
            return Err(SketchError::NoFields);
        }
        let fields = self
            .field_configs
            .iter()
            .map(|config| ParticleField::new(config.clone(), self.instance_count))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SketchState::new(fields, self.plane))
    }

    /// Run the sketch. Blocks until the window closes, Escape is pressed,
    /// or the cancel handle fires.
    pub fn run(self) -> Result<(), SketchError> {
        let state = self.build_state()?;
        log::info!(
            "starting sketch: {} field(s), {} instances each",
            state.fields().len(),
            self.instance_count
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            window: None,
            gpu: None,
            state,
            sprite: self.sprite,
            title: self.title,
            cancel: self.cancel,
            result: Ok(()),
        };
        event_loop.run_app(&mut app)?;
        app.result
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    state: SketchState,
    sprite: SpriteTexture,
    title: String,
    cancel: CancelHandle,
    result: Result<(), SketchError>,
}

impl App {
    /// Drop GPU resources and the window, in that order. Safe to call
    /// more than once.
    fn dispose(&mut self) {
        self.gpu = None;
        self.window = None;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("window creation failed: {}", e);
                self.result = Err(e.into());
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.state.handle_resize(size.width, size.height);

        match pollster::block_on(GpuState::new(
            window.clone(),
            self.state.fields(),
            &self.sprite,
        )) {
            Ok(gpu) => {
                self.window = Some(window);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                self.result = Err(e.into());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.state.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                self.dispose();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state.is_pressed()
                {
                    self.dispose();
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(physical_size) => {
                self.state
                    .handle_resize(physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::CursorMoved { .. } => {
                // Take the delta so it is applied once per event, not once
                // per handler entry.
                let delta = self.state.input.take_mouse_delta();
                if self.state.input.mouse_held(MouseButton::Left) {
                    self.state.handle_drag(delta);
                }
                let ndc = self.state.input.mouse_ndc();
                self.state.handle_pointer_move(ndc);
            }
            WindowEvent::MouseWheel { .. } => {
                let scroll = self.state.input.take_scroll_delta();
                self.state.handle_zoom(scroll);
            }
            WindowEvent::RedrawRequested => {
                if self.cancel.is_cancelled() {
                    self.dispose();
                    event_loop.exit();
                    return;
                }

                self.state.advance_frame();
                self.state.input.begin_frame();

                if let Some(gpu) = &mut self.gpu {
                    match gpu.render(&self.state.camera, self.state.fields()) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            let size = winit::dpi::PhysicalSize {
                                width: gpu.config.width,
                                height: gpu.config.height,
                            };
                            gpu.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("surface out of memory, stopping");
                            self.dispose();
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::color_from_hex;

    fn two_ring_sketch() -> Sketch {
        Sketch::new()
            .with_field(
                FieldConfig::new(1.0, 2.0)
                    .with_color(color_from_hex("#f7b373").unwrap())
                    .with_amplitude(1.0),
            )
            .with_field(
                FieldConfig::new(1.0, 2.0)
                    .with_color(color_from_hex("#88b3ce").unwrap())
                    .with_sprite_size(0.5)
                    .with_amplitude(3.0),
            )
            .with_instance_count(256)
    }

    #[test]
    fn test_empty_sketch_rejected() {
        let err = Sketch::new().build_state().unwrap_err();
        assert!(matches!(err, SketchError::NoFields));
    }

    #[test]
    fn test_invalid_field_rejected() {
        let err = Sketch::new()
            .with_field(FieldConfig::new(2.0, 1.0))
            .build_state()
            .unwrap_err();
        assert!(matches!(err, SketchError::Config(_)));
    }

    #[test]
    fn test_advance_frame_scales_time_per_field() {
        let sketch = two_ring_sketch().with_field(
            FieldConfig::new(1.0, 2.0).with_time_scale(0.25),
        );
        let mut state = sketch.build_state().unwrap();

        for _ in 0..10 {
            state.advance_frame();
        }

        let elapsed = state.clock().elapsed();
        assert!((elapsed - 0.5).abs() < 1e-5);
        for field in state.fields() {
            let expected = elapsed * field.config().time_scale;
            assert_eq!(field.uniforms().time, expected, "stale field time");
        }
    }

    #[test]
    fn test_pointer_propagates_next_frame() {
        let mut state = two_ring_sketch().build_state().unwrap();
        state.handle_resize(1280, 720);

        state.handle_pointer_move(Vec2::ZERO);
        let point = state.projector().point();
        assert!(point.y.abs() < 1e-4);

        state.advance_frame();
        for field in state.fields() {
            assert_eq!(field.uniforms().pointer, point);
        }
    }

    #[test]
    fn test_resize_sets_exact_aspect() {
        let mut state = two_ring_sketch().build_state().unwrap();
        state.handle_resize(1920, 1080);
        assert_eq!(state.camera().aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn test_pointer_miss_keeps_value_in_uniforms() {
        let mut state = two_ring_sketch().build_state().unwrap();
        state.handle_resize(1280, 720);

        state.handle_pointer_move(Vec2::ZERO);
        let good = state.projector().point();

        // Near the top of the viewport the ray leaves the bounded plane.
        state.handle_pointer_move(Vec2::new(0.0, 0.95));
        state.advance_frame();

        for field in state.fields() {
            assert_eq!(field.uniforms().pointer, good);
        }
    }

    #[test]
    fn test_camera_deltas_apply_once() {
        let mut state = two_ring_sketch().build_state().unwrap();
        let yaw = state.camera().yaw;
        let distance = state.camera().distance;

        state.handle_drag(Vec2::new(10.0, 0.0));
        assert!((state.camera().yaw - (yaw - 0.05)).abs() < 1e-6);

        state.handle_zoom(1.0);
        assert!((state.camera().distance - (distance - 0.3)).abs() < 1e-6);

        // Once an event's delta has been taken, re-entering the handlers
        // with the drained values must not move the camera again.
        let (yaw, distance) = (state.camera().yaw, state.camera().distance);
        let drained = state.input.take_mouse_delta();
        state.handle_drag(drained);
        let drained = state.input.take_scroll_delta();
        state.handle_zoom(drained);
        assert_eq!(state.camera().yaw, yaw);
        assert_eq!(state.camera().distance, distance);
    }

    #[test]
    fn test_cancel_handle() {
        let sketch = two_ring_sketch();
        let handle = sketch.cancel_handle();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
        // Clones observe the same flag.
        assert!(sketch.cancel_handle().is_cancelled());
    }

    #[test]
    fn test_default_time_scale_matches_source_motion() {
        let mut state = two_ring_sketch().build_state().unwrap();
        state.advance_frame();
        // One default tick (0.05) scaled by the default 0.5.
        for field in state.fields().iter().take(2) {
            assert!((field.uniforms().time - 0.025).abs() < 1e-6);
        }
    }
}
