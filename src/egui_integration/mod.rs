//! egui GUI integration.
//!
//! Couples egui-winit input handling with the egui_glow painter so the debug
//! overlay renders straight into the window's GL context.

use std::sync::Arc;

use egui::ViewportId;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::error::{RenderError, RenderResult};

/// glow-backed egui integration
pub struct GlowEguiIntegration {
    /// egui context (shared state for UI)
    ctx: egui::Context,
    /// egui-winit state for input handling
    winit_state: egui_winit::State,
    /// egui_glow painter for drawing
    painter: egui_glow::Painter,
    /// Cached paint jobs from last frame
    paint_jobs: Vec<egui::ClippedPrimitive>,
    /// Cached textures delta
    textures_delta: egui::TexturesDelta,
}

impl GlowEguiIntegration {
    /// Create a new egui integration instance
    pub fn new(window: &Window, gl: Arc<glow::Context>) -> RenderResult<Self> {
        let ctx = egui::Context::default();

        let winit_state = egui_winit::State::new(
            ctx.clone(),
            ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
        );

        let painter = egui_glow::Painter::new(gl, "", None)
            .map_err(|e| RenderError::UiInit(e.to_string()))?;

        Ok(Self {
            ctx,
            winit_state,
            painter,
            paint_jobs: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
        })
    }

    /// Handle a winit window event. Returns true if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.winit_state.on_window_event(window, event);
        response.consumed
    }

    /// Begin a new egui frame
    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.winit_state.take_egui_input(window);
        self.ctx.begin_frame(raw_input);
    }

    /// End the egui frame and tessellate the UI for painting
    pub fn end_frame(&mut self, window: &Window) {
        let full_output = self.ctx.end_frame();

        self.winit_state
            .handle_platform_output(window, full_output.platform_output);

        self.paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.textures_delta = full_output.textures_delta;
    }

    /// Paint the tessellated UI over the current framebuffer
    pub fn paint(&mut self, screen_width: u32, screen_height: u32) {
        let textures_delta = std::mem::take(&mut self.textures_delta);
        self.painter.paint_and_update_textures(
            [screen_width, screen_height],
            self.ctx.pixels_per_point(),
            &self.paint_jobs,
            &textures_delta,
        );
    }

    /// Free GPU resources held by the painter
    pub fn destroy(&mut self) {
        self.painter.destroy();
    }

    /// Get the egui context
    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Check if egui wants keyboard input
    pub fn wants_keyboard_input(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Check if egui wants pointer input
    pub fn wants_pointer_input(&self) -> bool {
        self.ctx.wants_pointer_input()
    }
}
