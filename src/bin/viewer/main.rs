//! Interactive model viewer
//!
//! Run with:
//!   cargo run --bin viewer
//!   cargo run --bin viewer -- path/to/model.obj
//!
//! Controls:
//!   WASD        - Move camera
//!   Space/Shift - Move up/down
//!   Right Mouse - Look around
//!   Scroll      - Zoom (field of view)
//!   F1          - Toggle debug UI
//!   Escape/Q    - Exit

mod ui;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use glow::HasContext as _;
use meshview::resources::cube_geometry;
use meshview::scene::{Camera, CameraInput, DirectionalLight, FlyController, PointLight, Transform};
use meshview::{
    GlWindow, GlowEguiIntegration, Mesh, Model, RenderResult, Shader, Texture, TextureData,
    TextureKind, ViewerConfig,
};
use winit::event::{DeviceEvent, ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::keyboard::{KeyCode, PhysicalKey};

const VERTEX_SHADER: &str = include_str!("phong.vert");
const FRAGMENT_SHADER: &str = include_str!("phong.frag");

/// Application state for input handling and scene controls
pub struct AppState {
    pub camera: Camera,
    pub camera_input: CameraInput,
    pub controller: FlyController,
    pub dir_light: DirectionalLight,
    pub point_light: PointLight,
    pub model_transform: Transform,
    /// Specular exponent for the whole model
    pub shininess: f32,
    pub wireframe: bool,
    pub auto_rotate: bool,
    last_frame: Instant,
    cursor_grabbed: bool,
    /// egui integration
    egui: Option<GlowEguiIntegration>,
    /// Whether debug UI is visible
    pub show_debug_ui: bool,
    /// Frame time history for averaging
    frame_times: VecDeque<f32>,
    /// Current FPS (averaged)
    pub fps: f32,
}

impl AppState {
    fn new() -> Self {
        Self {
            camera: Camera::default(),
            camera_input: CameraInput::new(),
            controller: FlyController::default(),
            dir_light: DirectionalLight::default(),
            point_light: PointLight::default(),
            model_transform: Transform::default(),
            shininess: 32.0,
            wireframe: false,
            auto_rotate: false,
            last_frame: Instant::now(),
            cursor_grabbed: false,
            egui: None,
            show_debug_ui: true,
            frame_times: VecDeque::with_capacity(60),
            fps: 0.0,
        }
    }

    fn update_fps(&mut self, dt: f32) {
        // Keep last 60 frame times for averaging
        if self.frame_times.len() >= 60 {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);

        // Calculate average FPS
        if !self.frame_times.is_empty() {
            let avg_dt: f32 = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
            self.fps = 1.0 / avg_dt;
        }
    }
}

fn main() {
    env_logger::init();

    // An optional positional arg names the OBJ file to load
    let args: Vec<String> = std::env::args().collect();
    let model_path = args.get(1).cloned();

    println!("Starting Model Viewer");
    println!();
    println!("Controls:");
    println!("  WASD        - Move camera");
    println!("  Space/Shift - Move up/down");
    println!("  Right Mouse - Look around");
    println!("  Scroll      - Zoom");
    println!("  F1          - Toggle debug UI");
    println!("  Escape/Q    - Exit");
    println!();

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let config = ViewerConfig::default();

    let window = match GlWindow::new(&event_loop, &config) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Failed to open window: {}", e);
            return;
        }
    };
    let gl = window.gl();

    unsafe {
        gl.enable(glow::DEPTH_TEST);
        if config.msaa_samples > 0 {
            gl.enable(glow::MULTISAMPLE);
        }
    }

    let shader = match Shader::from_sources(&gl, VERTEX_SHADER, FRAGMENT_SHADER) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to build shader: {}", e);
            return;
        }
    };

    let model = match &model_path {
        Some(path) => match Model::load_obj(&gl, path) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Failed to load '{}': {}", path, e);
                return;
            }
        },
        None => {
            println!("No model path given, showing the built-in cube");
            match builtin_cube(&gl) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Failed to build cube: {}", e);
                    return;
                }
            }
        }
    };

    println!(
        "Model '{}': {} meshes, {} vertices, {} triangles",
        model.name(),
        model.meshes().len(),
        model.vertex_count(),
        model.triangle_count()
    );
    println!();

    let mut state = AppState::new();
    state.camera.set_aspect(config.width as f32, config.height as f32);
    state.controller.sync_with_camera(&state.camera);

    state.egui = match GlowEguiIntegration::new(window.window(), window.gl()) {
        Ok(egui) => {
            println!("egui debug UI initialized (press F1 to toggle)");
            Some(egui)
        }
        Err(e) => {
            log::warn!("Debug UI unavailable: {}", e);
            None
        }
    };

    event_loop
        .run(move |event, elwt: &EventLoopWindowTarget<()>| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => {
                    // Pass events to egui first
                    let egui_consumed = match &mut state.egui {
                        Some(egui) => egui.on_window_event(window.window(), &event),
                        None => false,
                    };

                    // Only handle event if egui didn't consume it
                    if !egui_consumed {
                        handle_window_event(&event, &mut state, &window, &shader, &model, elwt);
                    } else {
                        // Still need to handle certain events even if egui consumed them
                        match &event {
                            WindowEvent::CloseRequested => elwt.exit(),
                            WindowEvent::Resized(size) => {
                                window.resize(size.width, size.height);
                                state.camera.set_aspect(size.width as f32, size.height as f32);
                            }
                            WindowEvent::RedrawRequested => {
                                render_frame(&window, &shader, &model, &mut state);
                            }
                            _ => {}
                        }
                    }
                }
                Event::DeviceEvent { event, .. } => {
                    // Don't process mouse motion if egui wants pointer input
                    let egui_wants_pointer = state
                        .egui
                        .as_ref()
                        .map(|egui| egui.wants_pointer_input())
                        .unwrap_or(false);

                    if !egui_wants_pointer {
                        handle_device_event(&event, &mut state);
                    }
                }
                Event::LoopExiting => {
                    // Free egui's GPU resources while the GL context is alive
                    if let Some(egui) = &mut state.egui {
                        egui.destroy();
                    }
                    state.egui = None;
                }
                Event::AboutToWait => {
                    // Calculate delta time
                    let now = Instant::now();
                    let dt = (now - state.last_frame).as_secs_f32();
                    state.last_frame = now;

                    // Update FPS counter
                    state.update_fps(dt);

                    // Update camera (skip if egui wants keyboard)
                    let egui_wants_keyboard = state
                        .egui
                        .as_ref()
                        .map(|egui| egui.wants_keyboard_input())
                        .unwrap_or(false);

                    if !egui_wants_keyboard {
                        state
                            .controller
                            .update(&mut state.camera, &state.camera_input, dt);
                    }

                    if state.auto_rotate {
                        state.model_transform.rotate_axis(Vec3::Y, dt * 0.5);
                    }

                    // Reset per-frame input deltas
                    state.camera_input.reset_deltas();

                    // Request redraw
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .expect("Event loop failed");
}

/// Textured unit cube shown when no model path is given
fn builtin_cube(gl: &Arc<glow::Context>) -> RenderResult<Model> {
    let (vertices, indices) = cube_geometry();
    let checker = TextureData::checkerboard(256, [200, 200, 200, 255], [90, 90, 90, 255]);
    let texture = Arc::new(Texture::create(
        gl,
        &checker,
        TextureKind::Diffuse,
        PathBuf::from("builtin:checkerboard"),
    )?);
    let mesh = Mesh::new(gl, vertices, indices, vec![texture])?.with_name("cube");

    Ok(Model::from_meshes(vec![mesh], "cube"))
}

/// Render a frame with egui overlay
fn render_frame(window: &GlWindow, shader: &Shader, model: &Model, state: &mut AppState) {
    let (width, height) = window.dimensions();
    if width == 0 || height == 0 {
        // Minimized
        return;
    }

    // Build the UI first so it sees this frame's input
    if state.show_debug_ui {
        if let Some(mut egui) = state.egui.take() {
            egui.begin_frame(window.window());
            ui::build_debug_ui(egui.context(), state, model);
            egui.end_frame(window.window());
            state.egui = Some(egui);
        }
    }

    let gl = window.gl();
    unsafe {
        // egui's painter leaves depth testing off, turn it back on
        gl.enable(glow::DEPTH_TEST);
        gl.polygon_mode(
            glow::FRONT_AND_BACK,
            if state.wireframe { glow::LINE } else { glow::FILL },
        );
        gl.clear_color(0.1, 0.1, 0.1, 1.0);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
    }

    shader.use_program();
    shader.set_mat4("projection", &state.camera.projection_matrix());
    shader.set_mat4("view", &state.camera.view_matrix());
    shader.set_vec3("viewPos", state.camera.position);
    state.dir_light.apply(shader, "dirLight");
    state.point_light.apply(shader, "pointLight");
    shader.set_float("material.shininess", state.shininess);
    shader.set_mat4("model", &state.model_transform.matrix());
    model.draw(shader);

    // Paint the overlay with filled polygons regardless of the wireframe
    // toggle
    if state.show_debug_ui {
        if let Some(egui) = &mut state.egui {
            unsafe { gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL) };
            egui.paint(width, height);
        }
    }

    window.swap_buffers();
}

fn handle_window_event(
    event: &WindowEvent,
    state: &mut AppState,
    window: &GlWindow,
    shader: &Shader,
    model: &Model,
    elwt: &EventLoopWindowTarget<()>,
) {
    match event {
        WindowEvent::CloseRequested => {
            println!("Close requested, shutting down...");
            elwt.exit();
        }
        WindowEvent::Resized(size) => {
            window.resize(size.width, size.height);
            state.camera.set_aspect(size.width as f32, size.height as f32);
        }
        WindowEvent::RedrawRequested => {
            render_frame(window, shader, model, state);
        }
        WindowEvent::KeyboardInput { event, .. } => {
            let pressed = event.state == ElementState::Pressed;

            if let PhysicalKey::Code(key) = event.physical_key {
                match key {
                    KeyCode::Escape | KeyCode::KeyQ if pressed => {
                        elwt.exit();
                    }
                    KeyCode::F1 if pressed && !event.repeat => {
                        state.show_debug_ui = !state.show_debug_ui;
                        println!(
                            "Debug UI: {}",
                            if state.show_debug_ui { "visible" } else { "hidden" }
                        );
                    }
                    KeyCode::KeyW => state.camera_input.forward = pressed,
                    KeyCode::KeyS => state.camera_input.backward = pressed,
                    KeyCode::KeyA => state.camera_input.left = pressed,
                    KeyCode::KeyD => state.camera_input.right = pressed,
                    KeyCode::Space => state.camera_input.up = pressed,
                    KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                        state.camera_input.down = pressed
                    }
                    _ => {}
                }
            }
        }
        WindowEvent::MouseInput {
            state: btn_state,
            button,
            ..
        } => {
            if *button == MouseButton::Right {
                let pressed = *btn_state == ElementState::Pressed;
                state.camera_input.mouse_look_active = pressed;

                // Grab/release cursor
                if pressed && !state.cursor_grabbed {
                    let _ = window
                        .window()
                        .set_cursor_grab(winit::window::CursorGrabMode::Confined);
                    window.window().set_cursor_visible(false);
                    state.cursor_grabbed = true;
                } else if !pressed && state.cursor_grabbed {
                    let _ = window
                        .window()
                        .set_cursor_grab(winit::window::CursorGrabMode::None);
                    window.window().set_cursor_visible(true);
                    state.cursor_grabbed = false;
                }
            }
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let scroll = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
            };
            state.camera_input.scroll_delta += scroll;
        }
        WindowEvent::Focused(false) => {
            // Release all keys when window loses focus
            state.camera_input = CameraInput::new();
            if state.cursor_grabbed {
                let _ = window
                    .window()
                    .set_cursor_grab(winit::window::CursorGrabMode::None);
                window.window().set_cursor_visible(true);
                state.cursor_grabbed = false;
            }
        }
        _ => {}
    }
}

fn handle_device_event(event: &DeviceEvent, state: &mut AppState) {
    if let DeviceEvent::MouseMotion { delta } = event {
        if state.camera_input.mouse_look_active {
            state.camera_input.mouse_delta.x += delta.0 as f32;
            state.camera_input.mouse_delta.y += delta.1 as f32;
        }
    }
}
