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

//! In-memory graphics driver that records every call. Used by tests to check the exact sequence of
//! driver calls without a GPU.

use crate::{
    core::algebra::{Matrix4, Vector4},
    driver::GraphicsDriver,
    shader::ShaderStage,
    texture::{MagnificationFilter, MinificationFilter},
    uniform::SpriteUniform,
};
use fxhash::FxHashMap;
use std::cell::{Cell, RefCell};
use strum::IntoEnumIterator;

#[derive(Clone, Debug, PartialEq)]
pub enum DriverCall {
    CreateShader(ShaderStage, u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    BindAttributeLocation(u32, u32, String),
    LinkProgram(u32),
    DeleteProgram(u32),
    UniformLocation(u32, String),
    UseProgram(Option<u32>),
    SetMatrix4(u32, u32, Matrix4<f32>),
    SetVector4(u32, u32, Vector4<f32>),
    SetF32(u32, u32, f32),
    CreateTexture(u32),
    UploadTexture2D {
        texture: u32,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    SetTextureFilters(u32, MinificationFilter, MagnificationFilter),
    BindTexture2D(u32, Option<u32>),
    DeleteTexture(u32),
}

/// Shader sources containing `#error` fail to compile, the same way a real GLSL compiler
/// handles the directive.
pub struct RecordingDriver {
    calls: RefCell<Vec<DriverCall>>,
    next_id: Cell<u32>,
    sources: RefCell<FxHashMap<u32, String>>,
    active_uniforms: Vec<String>,
    link_error: Option<String>,
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::with_active_uniforms(
            &SpriteUniform::iter()
                .map(|uniform| uniform.name())
                .collect::<Vec<_>>(),
        )
    }
}

impl RecordingDriver {
    pub const COMPILE_ERROR_LOG: &'static str = "0:6(1): error: #error missing semicolon";

    /// Linked programs expose only the given uniforms.
    pub fn with_active_uniforms(names: &[&str]) -> Self {
        Self {
            calls: Default::default(),
            next_id: Cell::new(1),
            sources: Default::default(),
            active_uniforms: names.iter().map(|name| name.to_string()).collect(),
            link_error: None,
        }
    }

    /// Every link fails with the given log.
    pub fn with_link_error(log: &str) -> Self {
        Self {
            link_error: Some(log.to_owned()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn submitted_source(&self, shader: u32) -> Option<String> {
        self.sources.borrow().get(&shader).cloned()
    }

    /// Last matrix uploaded to any uniform.
    pub fn last_matrix4(&self) -> Option<Matrix4<f32>> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            DriverCall::SetMatrix4(_, _, matrix) => Some(*matrix),
            _ => None,
        })
    }

    fn record(&self, call: DriverCall) {
        self.calls.borrow_mut().push(call);
    }

    fn make_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl GraphicsDriver for RecordingDriver {
    type Shader = u32;
    type Program = u32;
    type Texture = u32;
    type UniformLocation = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let id = self.make_id();
        self.record(DriverCall::CreateShader(stage, id));
        Ok(id)
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        self.sources.borrow_mut().insert(shader, source.to_owned());
        self.record(DriverCall::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: Self::Shader) {
        self.record(DriverCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        self.sources
            .borrow()
            .get(&shader)
            .is_some_and(|source| !source.contains("#error"))
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            Self::COMPILE_ERROR_LOG.to_owned()
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        self.record(DriverCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        let id = self.make_id();
        self.record(DriverCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        self.record(DriverCall::AttachShader(program, shader));
    }

    fn bind_attribute_location(&self, program: Self::Program, index: u32, name: &str) {
        self.record(DriverCall::BindAttributeLocation(
            program,
            index,
            name.to_owned(),
        ));
    }

    fn link_program(&self, program: Self::Program) {
        self.record(DriverCall::LinkProgram(program));
    }

    fn program_link_status(&self, _program: Self::Program) -> bool {
        self.link_error.is_none()
    }

    fn program_info_log(&self, _program: Self::Program) -> String {
        self.link_error.clone().unwrap_or_default()
    }

    fn delete_program(&self, program: Self::Program) {
        self.record(DriverCall::DeleteProgram(program));
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        self.record(DriverCall::UniformLocation(program, name.to_owned()));
        self.active_uniforms
            .iter()
            .position(|active| active == name)
            .map(|index| index as u32)
    }

    fn use_program(&self, program: Option<Self::Program>) {
        self.record(DriverCall::UseProgram(program));
    }

    fn set_uniform_matrix4(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        value: &Matrix4<f32>,
    ) {
        self.record(DriverCall::SetMatrix4(program, *location, *value));
    }

    fn set_uniform_vector4(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        value: &Vector4<f32>,
    ) {
        self.record(DriverCall::SetVector4(program, *location, *value));
    }

    fn set_uniform_f32(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        value: f32,
    ) {
        self.record(DriverCall::SetF32(program, *location, value));
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        let id = self.make_id();
        self.record(DriverCall::CreateTexture(id));
        Ok(id)
    }

    fn upload_texture_2d_rgba8(
        &self,
        texture: Self::Texture,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) {
        self.record(DriverCall::UploadTexture2D {
            texture,
            width,
            height,
            pixels: pixels.to_vec(),
        });
    }

    fn set_texture_filters(
        &self,
        texture: Self::Texture,
        min_filter: MinificationFilter,
        mag_filter: MagnificationFilter,
    ) {
        self.record(DriverCall::SetTextureFilters(texture, min_filter, mag_filter));
    }

    fn bind_texture_2d(&self, unit: u32, texture: Option<Self::Texture>) {
        self.record(DriverCall::BindTexture2D(unit, texture));
    }

    fn delete_texture(&self, texture: Self::Texture) {
        self.record(DriverCall::DeleteTexture(texture));
    }
}
