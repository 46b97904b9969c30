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

//! Uniforms of the sprite program.
//!
//! Shader compilers are free to eliminate unused uniforms, so a uniform that can't be found is not
//! an error: its location stays unset and every write to it is silently skipped.

use crate::{
    core::algebra::{Matrix4, Vector4},
    driver::GraphicsDriver,
};
use fxhash::FxHashMap;
use std::{cell::RefCell, rc::Rc};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

/// Uniforms a sprite renderer sets. The names are the contract between the renderer and shader
/// authors.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, IntoStaticStr, EnumIter, EnumCount)]
#[repr(usize)]
pub enum SpriteUniform {
    /// `mat4 projectionMatrix`
    #[strum(serialize = "projectionMatrix")]
    ProjectionMatrix,
    /// `vec4 posTransform`
    #[strum(serialize = "posTransform")]
    PosTransform,
    /// `vec4 texTransform`
    #[strum(serialize = "texTransform")]
    TexTransform,
    /// `float rotation`
    #[strum(serialize = "rotation")]
    Rotation,
    /// `vec4 color`, RGBA.
    #[strum(serialize = "color")]
    Color,
}

impl SpriteUniform {
    /// Name of the uniform in GLSL source.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Uniform locations of a linked program. Sprite uniforms are resolved once, right after linking;
/// any other uniform is resolved on first use and cached.
pub struct UniformRegistry<D: GraphicsDriver> {
    driver: Rc<D>,
    program: D::Program,
    sprite_locations: [Option<D::UniformLocation>; SpriteUniform::COUNT],
    named_locations: RefCell<FxHashMap<String, Option<D::UniformLocation>>>,
}

impl<D: GraphicsDriver> UniformRegistry<D> {
    /// Resolves every [`SpriteUniform`] of the linked program.
    pub fn resolve(driver: &Rc<D>, program: D::Program) -> Self {
        let mut sprite_locations: [Option<D::UniformLocation>; SpriteUniform::COUNT] =
            Default::default();

        for uniform in SpriteUniform::iter() {
            sprite_locations[uniform as usize] = driver.uniform_location(program, uniform.name());
        }

        Self {
            driver: driver.clone(),
            program,
            sprite_locations,
            named_locations: Default::default(),
        }
    }

    /// Returns `None` if the linked program does not use the uniform.
    pub fn location(&self, uniform: SpriteUniform) -> Option<&D::UniformLocation> {
        self.sprite_locations[uniform as usize].as_ref()
    }

    /// Looks up an arbitrary uniform by name. The result, including a miss, is cached.
    pub fn location_by_name(&self, name: &str) -> Option<D::UniformLocation> {
        let mut locations = self.named_locations.borrow_mut();
        if let Some(cached_location) = locations.get(name) {
            cached_location.clone()
        } else {
            let location = self.driver.uniform_location(self.program, name);

            locations.insert(name.to_owned(), location.clone());

            location
        }
    }

    #[inline]
    pub fn set_matrix4(&self, uniform: SpriteUniform, value: &Matrix4<f32>) {
        if let Some(location) = self.location(uniform) {
            self.driver.set_uniform_matrix4(self.program, location, value);
        }
    }

    #[inline]
    pub fn set_vector4(&self, uniform: SpriteUniform, value: &Vector4<f32>) {
        if let Some(location) = self.location(uniform) {
            self.driver.set_uniform_vector4(self.program, location, value);
        }
    }

    #[inline]
    pub fn set_f32(&self, uniform: SpriteUniform, value: f32) {
        if let Some(location) = self.location(uniform) {
            self.driver.set_uniform_f32(self.program, location, value);
        }
    }

    pub fn set_matrix4_by_name(&self, name: &str, value: &Matrix4<f32>) {
        if let Some(location) = self.location_by_name(name) {
            self.driver.set_uniform_matrix4(self.program, &location, value);
        }
    }

    pub fn set_vector4_by_name(&self, name: &str, value: &Vector4<f32>) {
        if let Some(location) = self.location_by_name(name) {
            self.driver.set_uniform_vector4(self.program, &location, value);
        }
    }

    pub fn set_f32_by_name(&self, name: &str, value: f32) {
        if let Some(location) = self.location_by_name(name) {
            self.driver.set_uniform_f32(self.program, &location, value);
        }
    }
}
