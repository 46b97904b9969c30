// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! GPU textures. The sprite shader only ever creates one of them: a 1x1 opaque white texture that
//! stays bound while nothing else is, so untextured sprites are drawn with their tint color.

use crate::{driver::GraphicsDriver, error::ShaderError};
use std::{marker::PhantomData, rc::Rc};

/// The pixel of the default texture: opaque white.
pub const DEFAULT_TEXTURE_PIXEL: [u8; 4] = [255, 255, 255, 255];

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PixelKind {
    /// Four 8-bit normalized channels.
    RGBA8,
}

impl PixelKind {
    pub fn size_bytes(self) -> usize {
        match self {
            Self::RGBA8 => 4,
        }
    }
}

/// The texture minification filter specifies the sampling function which is used whenever the
/// pixel being textured maps to an area greater than one texture element.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum MinificationFilter {
    /// Returns the value of the texture element that is nearest to the center of the pixel
    /// being textured.
    Nearest,
    /// Returns the weighted average of the four texture elements that are closest to the
    /// center of the pixel being textured.
    #[default]
    Linear,
}

/// The texture magnification function is used when the pixel being textured maps to an area
/// less than or equal to one texture element.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum MagnificationFilter {
    /// Returns the value of the texture element that is nearest to the center of the pixel
    /// being textured.
    Nearest,
    /// Returns the weighted average of the four texture elements that are closest to the
    /// center of the pixel being textured.
    #[default]
    Linear,
}

/// A 2D texture living on GPU. The texture object is freed when this value is dropped.
pub struct Texture<D: GraphicsDriver> {
    driver: Rc<D>,
    id: D::Texture,
    width: u32,
    height: u32,
    pixel_kind: PixelKind,
    // Force compiler to not implement Send and Sync, because OpenGL is not thread-safe.
    thread_mark: PhantomData<*const u8>,
}

impl<D: GraphicsDriver> Texture<D> {
    /// Creates a 1x1 RGBA8 texture filled with [`DEFAULT_TEXTURE_PIXEL`], linearly filtered in
    /// both directions.
    pub fn new_default(driver: &Rc<D>) -> Result<Self, ShaderError> {
        Self::from_rgba8(
            driver,
            1,
            1,
            &DEFAULT_TEXTURE_PIXEL,
            MinificationFilter::Linear,
            MagnificationFilter::Linear,
        )
    }

    fn from_rgba8(
        driver: &Rc<D>,
        width: u32,
        height: u32,
        pixels: &[u8],
        min_filter: MinificationFilter,
        mag_filter: MagnificationFilter,
    ) -> Result<Self, ShaderError> {
        let expected = width as usize * height as usize * PixelKind::RGBA8.size_bytes();
        if pixels.len() != expected {
            return Err(ShaderError::PreconditionViolation(format!(
                "texture data has {} bytes, but {}x{} RGBA8 image requires {}",
                pixels.len(),
                width,
                height,
                expected
            )));
        }

        let texture = Self {
            driver: driver.clone(),
            id: driver.create_texture()?,
            width,
            height,
            pixel_kind: PixelKind::RGBA8,
            thread_mark: PhantomData,
        };

        driver.upload_texture_2d_rgba8(texture.id, width, height, pixels);
        driver.set_texture_filters(texture.id, min_filter, mag_filter);

        Ok(texture)
    }

    /// Binds the texture to the given texture unit.
    pub fn bind(&self, unit: u32) {
        self.driver.bind_texture_2d(unit, Some(self.id));
    }

    pub fn id(&self) -> D::Texture {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_kind(&self) -> PixelKind {
        self.pixel_kind
    }
}

impl<D: GraphicsDriver> Drop for Texture<D> {
    fn drop(&mut self) {
        self.driver.delete_texture(self.id);
    }
}
