//! Decoded textures and texture creation utilities.
//!
//! This module provides [`Texture`], the decoded RGBA data the renderer uploads,
//! and helpers for creating the placeholder texture materials use until their
//! real maps arrive.

use std::fmt;

use anyhow::*;
use image::{GenericImageView, ImageFormat, load_from_memory_with_format};

/// A decoded RGBA8 texture.
///
/// Textures are shared between materials through `Arc<Texture>`; the same
/// decoded image may fill several slots (e.g. normal and specular map).
#[derive(Clone, PartialEq)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Texture {
    /// Name of the texture materials start out with.
    pub const PLACEHOLDER_NAME: &'static str = "default texture";
    /// Edge length of the placeholder the scenes and the binding applier create.
    pub const PLACEHOLDER_SIZE: u32 = 64;

    /// Create the default checkerboard texture.
    ///
    /// Materials keep this texture as long as their diffuse map did not load,
    /// so a failed load degrades to a visible placeholder rather than nothing.
    pub fn create_placeholder(size: u32) -> Texture {
        let size = size.max(2);
        let cell = (size / 8).max(1);
        let mut rgba = Vec::with_capacity(size as usize * size as usize * 4);
        for y in 0..size {
            for x in 0..size {
                // white/light grey, the same look as the engine's default material
                let light = ((x / cell) + (y / cell)) % 2 == 0;
                let value = if light { 255 } else { 204 };
                rgba.extend_from_slice(&[value, value, value, 255]);
            }
        }
        Texture {
            name: Self::PLACEHOLDER_NAME.to_string(),
            width: size,
            height: size,
            rgba,
        }
    }

    /// Load a texture from raw byte data (image file contents).
    ///
    /// # Arguments
    ///
    /// * `bytes` represent raw image file data (PNG, JPEG, etc.)
    /// * `label` is used as the texture name, usually the locator it was loaded from
    /// * `format` is an optional file extension hint (e.g., "jpg"). If None, auto-detect.
    pub fn from_bytes(bytes: &[u8], label: &str, format: Option<&str>) -> Result<Self> {
        let img = match format.and_then(ImageFormat::from_extension) {
            None => image::load_from_memory(bytes)?,
            Some(fmt) => load_from_memory_with_format(bytes, fmt)?,
        };
        Ok(Self::from_image(&img, label))
    }

    pub fn from_image(img: &image::DynamicImage, label: &str) -> Self {
        let (width, height) = img.dimensions();
        Self {
            name: label.to_string(),
            width,
            height,
            rgba: img.to_rgba8().into_raw(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == Self::PLACEHOLDER_NAME
    }
}

// Pixel data is left out on purpose, it would flood assertion output.
impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
