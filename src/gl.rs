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

//! OpenGL implementation of [`GraphicsDriver`] on top of `glow`.

use crate::{
    core::{
        algebra::{Matrix4, Vector4},
        log::Log,
    },
    driver::GraphicsDriver,
    shader::ShaderStage,
    texture::{MagnificationFilter, MinificationFilter},
};
use glow::HasContext;
use std::{cell::RefCell, marker::PhantomData};

pub(crate) trait ToGlConstant {
    fn into_gl(self) -> u32;
}

impl ToGlConstant for ShaderStage {
    fn into_gl(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl ToGlConstant for MinificationFilter {
    fn into_gl(self) -> u32 {
        match self {
            Self::Nearest => glow::NEAREST,
            Self::Linear => glow::LINEAR,
        }
    }
}

impl ToGlConstant for MagnificationFilter {
    fn into_gl(self) -> u32 {
        match self {
            Self::Nearest => glow::NEAREST,
            Self::Linear => glow::LINEAR,
        }
    }
}

const MAX_TEXTURE_UNITS: usize = 32;

/// Mirror of the context state. `None` means the bound object is unknown, so the next bind is
/// always issued.
#[derive(Default)]
struct GlState {
    program: Option<Option<glow::Program>>,
    active_unit: Option<u32>,
    textures: [Option<Option<glow::Texture>>; MAX_TEXTURE_UNITS],
}

/// GL calls required to bind a texture to a unit.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
struct TextureBindOps {
    activate_unit: bool,
    bind_texture: bool,
}

impl GlState {
    /// Records the program and returns `true` if `glUseProgram` has to be issued.
    fn set_program(&mut self, program: Option<glow::Program>, force: bool) -> bool {
        let issue = force || self.program != Some(program);
        self.program = Some(program);
        issue
    }

    /// Records the binding and returns the calls to issue, or `None` if the unit does not exist.
    fn set_texture(
        &mut self,
        unit_index: u32,
        texture: Option<glow::Texture>,
        force: bool,
    ) -> Option<TextureBindOps> {
        let binding = self.textures.get_mut(unit_index as usize)?;

        let bind_texture = force || *binding != Some(texture);
        *binding = Some(texture);

        let activate_unit = force || self.active_unit != Some(unit_index);
        self.active_unit = Some(unit_index);

        Some(TextureBindOps {
            activate_unit,
            bind_texture,
        })
    }

    fn invalidate(&mut self) {
        *self = Default::default();
    }

    fn forget_program(&mut self, program: glow::Program) {
        if self.program == Some(Some(program)) {
            self.program = None;
        }
    }

    fn forget_texture(&mut self, texture: glow::Texture) {
        for binding in self.textures.iter_mut() {
            if *binding == Some(Some(texture)) {
                *binding = None;
            }
        }
    }
}

/// Wraps a `glow` context that is already current on the calling thread.
///
/// Program and texture bindings are cached to skip redundant state changes when uniforms are
/// written or textures are uploaded. Explicit binds ([`GraphicsDriver::use_program`],
/// [`GraphicsDriver::bind_texture_2d`]) are always issued. Code that changes the context through
/// [`Self::gl`] must call [`Self::invalidate_resource_bindings_cache`] afterwards.
pub struct GlDriver {
    gl: glow::Context,
    state: RefCell<GlState>,
    // Force compiler to not implement Send and Sync, because OpenGL is not thread-safe.
    thread_mark: PhantomData<*const u8>,
}

impl GlDriver {
    /// Takes ownership of the context. The context must stay current for the whole lifetime of
    /// the driver.
    pub fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            state: Default::default(),
            thread_mark: PhantomData,
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Forgets every cached binding, so the next program and texture binds are issued to the
    /// context unconditionally.
    pub fn invalidate_resource_bindings_cache(&self) {
        self.state.borrow_mut().invalidate();
    }

    fn set_program(&self, program: Option<glow::Program>, force: bool) {
        if self.state.borrow_mut().set_program(program, force) {
            unsafe {
                self.gl.use_program(program);
            }
        }
    }

    fn set_texture(&self, unit_index: u32, texture: Option<glow::Texture>, force: bool) {
        let ops = self.state.borrow_mut().set_texture(unit_index, texture, force);

        let Some(ops) = ops else {
            Log::warn(format!(
                "Attempt to bind a texture to unit {unit_index}, but only {MAX_TEXTURE_UNITS} \
                units are supported. The binding is ignored."
            ));
            return;
        };

        unsafe {
            if ops.activate_unit {
                self.gl.active_texture(glow::TEXTURE0 + unit_index);
            }
            if ops.bind_texture {
                self.gl.bind_texture(glow::TEXTURE_2D, texture);
            }
        }
    }
}

impl GraphicsDriver for GlDriver {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Texture = glow::Texture;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(stage.into_gl()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn bind_attribute_location(&self, program: Self::Program, index: u32, name: &str) {
        unsafe { self.gl.bind_attrib_location(program, index, name) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        self.state.borrow_mut().forget_program(program);
        unsafe { self.gl.delete_program(program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        self.set_program(program, true);
    }

    #[inline(always)]
    fn set_uniform_matrix4(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        value: &Matrix4<f32>,
    ) {
        self.set_program(Some(program), false);
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(Some(location), false, value.as_slice());
        }
    }

    #[inline(always)]
    fn set_uniform_vector4(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        value: &Vector4<f32>,
    ) {
        self.set_program(Some(program), false);
        unsafe {
            self.gl.uniform_4_f32(Some(location), value.x, value.y, value.z, value.w);
        }
    }

    #[inline(always)]
    fn set_uniform_f32(
        &self,
        program: Self::Program,
        location: &Self::UniformLocation,
        value: f32,
    ) {
        self.set_program(Some(program), false);
        unsafe {
            self.gl.uniform_1_f32(Some(location), value);
        }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { self.gl.create_texture() }
    }

    fn upload_texture_2d_rgba8(
        &self,
        texture: Self::Texture,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) {
        self.set_texture(0, Some(texture), false);
        unsafe {
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn set_texture_filters(
        &self,
        texture: Self::Texture,
        min_filter: MinificationFilter,
        mag_filter: MagnificationFilter,
    ) {
        self.set_texture(0, Some(texture), false);
        unsafe {
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                min_filter.into_gl() as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                mag_filter.into_gl() as i32,
            );
        }
    }

    fn bind_texture_2d(&self, unit: u32, texture: Option<Self::Texture>) {
        self.set_texture(unit, texture, true);
    }

    fn delete_texture(&self, texture: Self::Texture) {
        self.state.borrow_mut().forget_texture(texture);
        unsafe { self.gl.delete_texture(texture) }
    }
}
