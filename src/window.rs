//! Window and OpenGL context creation.
//!
//! Builds a winit window together with a 3.3 core profile context via glutin,
//! then loads the GL function pointers into a shared [`glow::Context`].

use std::num::NonZeroU32;
use std::sync::Arc;

use glow::HasContext as _;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasRawWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window as WinitWindow, WindowBuilder};

use crate::error::{RenderError, RenderResult};
use crate::ViewerConfig;

/// A window with a current OpenGL context.
pub struct GlWindow {
    // Surface and context drop before the window they were created against.
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: WinitWindow,
    gl: Arc<glow::Context>,
}

impl GlWindow {
    /// Create the window, pick a config, and make a 3.3 core context current.
    pub fn new(event_loop: &EventLoop<()>, config: &ViewerConfig) -> RenderResult<Self> {
        let window_builder = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let mut template = ConfigTemplateBuilder::new().with_depth_size(24);
        if config.msaa_samples > 0 {
            template = template.with_multisampling(config.msaa_samples);
        }

        // Prefer the config with the most samples that still satisfies the
        // template.
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|best, next| {
                        if next.num_samples() > best.num_samples() {
                            next
                        } else {
                            best
                        }
                    })
                    .expect("at least one GL config matches the template")
            })
            .map_err(|e| RenderError::WindowCreation(e.to_string()))?;
        let window = window.ok_or_else(|| {
            RenderError::WindowCreation("display builder returned no window".into())
        })?;
        log::debug!("Picked GL config with {} samples", gl_config.num_samples());

        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));
        let not_current = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .map_err(|e| RenderError::ContextCreation(e.to_string()))?
        };

        let surface_attributes = window.build_surface_attributes(Default::default());
        let surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &surface_attributes)
                .map_err(|e| RenderError::ContextCreation(e.to_string()))?
        };
        let context = not_current
            .make_current(&surface)
            .map_err(|e| RenderError::ContextCreation(e.to_string()))?;

        if config.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = surface.set_swap_interval(&context, interval) {
                log::warn!("Failed to enable vsync: {}", e);
            }
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s))
        };
        unsafe {
            log::info!(
                "OpenGL {} on {}",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER)
            );
        }

        Ok(Self {
            surface,
            context,
            window,
            gl: Arc::new(gl),
        })
    }

    /// Shared handle to the GL function table.
    pub fn gl(&self) -> Arc<glow::Context> {
        Arc::clone(&self.gl)
    }

    pub fn window(&self) -> &WinitWindow {
        &self.window
    }

    /// Current framebuffer dimensions in physical pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Resize the surface and viewport. Zero dimensions are ignored, which
    /// covers minimized windows.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
            unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
        }
    }

    /// Present the frame.
    pub fn swap_buffers(&self) {
        if let Err(e) = self.surface.swap_buffers(&self.context) {
            log::error!("Failed to swap buffers: {}", e);
        }
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
