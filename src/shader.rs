//! GLSL shader program wrapper.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext as _;

use crate::error::{RenderError, RenderResult};

/// A linked GLSL program with name-keyed uniform setters.
///
/// Setters look the location up on every call. A name the program does not
/// have (or that the linker optimized out) resolves to no location and the
/// set is silently skipped; that is what lets one draw path feed shaders that
/// declare only a subset of the material samplers.
pub struct Shader {
    program: glow::Program,
    gl: Arc<glow::Context>,
}

impl Shader {
    /// Compile both stages from source and link them into a program.
    ///
    /// Compile and link failures carry the GL info log.
    pub fn from_sources(
        gl: &Arc<glow::Context>,
        vertex_src: &str,
        fragment_src: &str,
    ) -> RenderResult<Self> {
        unsafe {
            let vertex = compile_stage(gl, glow::VERTEX_SHADER, "vertex", vertex_src)?;
            let fragment =
                match compile_stage(gl, glow::FRAGMENT_SHADER, "fragment", fragment_src) {
                    Ok(shader) => shader,
                    Err(e) => {
                        gl.delete_shader(vertex);
                        return Err(e);
                    }
                };

            let program = gl
                .create_program()
                .map_err(RenderError::ResourceAllocation)?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);

            // The stage objects are no longer needed once linked.
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(RenderError::ProgramLink(log));
            }

            Ok(Self {
                program,
                gl: Arc::clone(gl),
            })
        }
    }

    /// Make this program the active one.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.program));
        }
    }

    pub fn set_int(&self, name: &str, value: i32) {
        unsafe {
            let location = self.gl.get_uniform_location(self.program, name);
            self.gl.uniform_1_i32(location.as_ref(), value);
        }
    }

    pub fn set_float(&self, name: &str, value: f32) {
        unsafe {
            let location = self.gl.get_uniform_location(self.program, name);
            self.gl.uniform_1_f32(location.as_ref(), value);
        }
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) {
        unsafe {
            let location = self.gl.get_uniform_location(self.program, name);
            self.gl
                .uniform_3_f32(location.as_ref(), value.x, value.y, value.z);
        }
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) {
        unsafe {
            let location = self.gl.get_uniform_location(self.program, name);
            self.gl
                .uniform_matrix_4_f32_slice(location.as_ref(), false, &value.to_cols_array());
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.program);
        }
    }
}

unsafe fn compile_stage(
    gl: &glow::Context,
    stage: u32,
    stage_name: &'static str,
    source: &str,
) -> RenderResult<glow::Shader> {
    let shader = gl
        .create_shader(stage)
        .map_err(RenderError::ResourceAllocation)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(RenderError::ShaderCompilation {
            stage: stage_name,
            log,
        });
    }

    Ok(shader)
}
