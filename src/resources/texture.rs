//! Texture loading and GPU texture objects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glow::HasContext as _;
use image::GenericImageView;

use crate::error::{RenderError, RenderResult};

/// Role a texture plays in a mesh's material.
///
/// The variant decides the uniform name stem used when the texture is bound
/// for drawing, so the set is closed: a texture that is none of these cannot
/// take part in the draw protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    /// Uniform name stem, exactly as the fragment shader spells it.
    pub fn uniform_prefix(&self) -> &'static str {
        match self {
            Self::Diffuse => "texture_diffuse",
            Self::Specular => "texture_specular",
            Self::Normal => "texture_normal",
            Self::Height => "texture_height",
        }
    }
}

/// Decoded image data on the CPU side, always RGBA8.
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub name: String,
}

impl TextureData {
    /// Load and decode an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let img = image::open(path).map_err(|e| RenderError::TextureDecode {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (width, height) = img.dimensions();
        let data = img.to_rgba8().into_raw();

        Ok(Self {
            width,
            height,
            data,
            name,
        })
    }

    /// Create a 1x1 solid color texture.
    pub fn solid_color(color: [u8; 4], name: &str) -> Self {
        Self {
            width: 1,
            height: 1,
            data: color.to_vec(),
            name: name.to_string(),
        }
    }

    /// Plain white, the fallback for missing or undecodable files.
    pub fn white() -> Self {
        Self::solid_color([255, 255, 255, 255], "white")
    }

    /// Create a checkerboard texture with 8x8-pixel cells.
    pub fn checkerboard(size: u32, color1: [u8; 4], color2: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let is_even = ((x / 8) + (y / 8)) % 2 == 0;
                let color = if is_even { color1 } else { color2 };
                data.extend_from_slice(&color);
            }
        }

        Self {
            width: size,
            height: size,
            data,
            name: "checkerboard".to_string(),
        }
    }
}

/// A texture living on the GPU: the GL object, its material role, and the
/// source path it was loaded from.
///
/// The path doubles as the identity key for de-duplication; meshes share
/// textures through `Arc` and never own them outright. The GL object is
/// deleted when the last reference drops.
pub struct Texture {
    handle: glow::Texture,
    pub kind: TextureKind,
    pub path: PathBuf,
    gl: Arc<glow::Context>,
}

impl Texture {
    /// Upload decoded image data and create the GL texture object.
    ///
    /// Wrap mode is repeat on both axes, filtering is trilinear with
    /// generated mipmaps.
    pub fn create(
        gl: &Arc<glow::Context>,
        data: &TextureData,
        kind: TextureKind,
        path: PathBuf,
    ) -> RenderResult<Self> {
        let handle = unsafe {
            let handle = gl
                .create_texture()
                .map_err(RenderError::ResourceAllocation)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(handle));

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );

            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                data.width as i32,
                data.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(&data.data),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);

            handle
        };

        log::debug!(
            "Uploaded texture '{}' ({}x{}, {:?})",
            data.name,
            data.width,
            data.height,
            kind
        );

        Ok(Self {
            handle,
            kind,
            path,
            gl: Arc::clone(gl),
        })
    }

    /// The raw GL texture object, for binding.
    pub fn handle(&self) -> glow::Texture {
        self.handle
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.handle);
        }
    }
}
