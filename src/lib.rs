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

//! Shader program management for a 2D sprite renderer.
//!
//! The crate compiles a vertex/fragment shader pair, optionally bridging legacy GLSL ES sources
//! to the desktop core profile, links them with the fixed sprite attribute layout, resolves the
//! uniforms a sprite renderer sets every draw and owns a 1x1 white texture that is bound whenever
//! the program is activated, so untextured sprites render as flat colored quads.
//!
//! Every GPU object talks to the driver through an explicit [`driver::GraphicsDriver`] handle.
//! [`gl::GlDriver`] is the OpenGL implementation on top of `glow`.

pub use fyrox_core as core;

pub mod driver;
pub mod error;
pub mod gl;
pub mod modernizer;
pub mod program;
pub mod projection;
pub mod settings;
pub mod shader;
pub mod sprite_shader;
pub mod texture;
pub mod uniform;

#[cfg(test)]
pub(crate) mod test_util;

pub use crate::{
    driver::GraphicsDriver,
    error::ShaderError,
    gl::GlDriver,
    modernizer::ShaderDialect,
    settings::SpriteShaderSettings,
    shader::{ShaderSource, ShaderStage},
    sprite_shader::SpriteShader,
    uniform::SpriteUniform,
};
