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

#![warn(missing_docs)]

//! Graphics driver is the explicit handle to a graphics context. It exposes exactly the calls the
//! sprite shader needs, so the rest of the crate never touches global GAPI state directly.
//!
//! All methods must be called on the thread that owns the context. Implementations are not
//! expected to be `Send` or `Sync`.

use crate::{
    core::algebra::{Matrix4, Vector4},
    shader::ShaderStage,
    texture::{MagnificationFilter, MinificationFilter},
};
use std::fmt::Debug;

/// A narrow interface over a context-bound graphics API.
///
/// Object creation returns `Err` with a driver-provided message when the driver is unable to
/// allocate an object. Everything else is fire-and-forget, the same way the underlying API works.
pub trait GraphicsDriver {
    /// Handle of a shader object.
    type Shader: Copy + Debug + PartialEq;
    /// Handle of a program object.
    type Program: Copy + Debug + PartialEq;
    /// Handle of a texture object.
    type Texture: Copy + Debug + PartialEq;
    /// Location of a uniform inside a linked program.
    type UniformLocation: Clone + Debug;

    /// Creates an empty shader object of the given stage.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;

    /// Replaces the source of the shader object.
    fn shader_source(&self, shader: Self::Shader, source: &str);

    /// Compiles the shader object.
    fn compile_shader(&self, shader: Self::Shader);

    /// Returns `true` if the last compilation was successful.
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;

    /// Returns compiler output for the shader object. Could be non-empty even on success.
    fn shader_info_log(&self, shader: Self::Shader) -> String;

    /// Frees the shader object.
    fn delete_shader(&self, shader: Self::Shader);

    /// Creates an empty program object.
    fn create_program(&self) -> Result<Self::Program, String>;

    /// Attaches a compiled shader to the program.
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);

    /// Binds a vertex attribute name to a fixed input slot. Must be called before linking.
    fn bind_attribute_location(&self, program: Self::Program, index: u32, name: &str);

    /// Links the program.
    fn link_program(&self, program: Self::Program);

    /// Returns `true` if the last link was successful.
    fn program_link_status(&self, program: Self::Program) -> bool;

    /// Returns linker output for the program.
    fn program_info_log(&self, program: Self::Program) -> String;

    /// Frees the program object.
    fn delete_program(&self, program: Self::Program);

    /// Looks up a uniform of a linked program. `None` means that the uniform does not exist or
    /// was optimized out by the shader compiler.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    /// Makes the program current. Must reach the context on every call, even if the program
    /// looks current already.
    fn use_program(&self, program: Option<Self::Program>);

    /// Uploads a 4x4 matrix to the uniform of the given program.
    fn set_uniform_matrix4(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        value: &Matrix4<f32>,
    );

    /// Uploads a 4-component vector to the uniform of the given program.
    fn set_uniform_vector4(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        value: &Vector4<f32>,
    );

    /// Uploads a scalar to the uniform of the given program.
    fn set_uniform_f32(&self, program: Self::Program, location: &Self::UniformLocation, value: f32);

    /// Creates an empty texture object.
    fn create_texture(&self) -> Result<Self::Texture, String>;

    /// Fills a 2D texture with tightly packed RGBA8 pixels.
    fn upload_texture_2d_rgba8(
        &self,
        texture: Self::Texture,
        width: u32,
        height: u32,
        pixels: &[u8],
    );

    /// Sets sampling filters of a 2D texture.
    fn set_texture_filters(
        &self,
        texture: Self::Texture,
        min_filter: MinificationFilter,
        mag_filter: MagnificationFilter,
    );

    /// Binds a 2D texture (or nothing) to the texture unit. Must reach the context on every call.
    fn bind_texture_2d(&self, unit: u32, texture: Option<Self::Texture>);

    /// Frees the texture object.
    fn delete_texture(&self, texture: Self::Texture);
}
