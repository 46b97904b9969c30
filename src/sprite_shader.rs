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

//! The sprite shader program: a linked vertex/fragment pair, its uniforms and the default texture.

use crate::{
    core::{
        algebra::{Matrix4, Vector4},
        color::Color,
        log::Log,
    },
    driver::GraphicsDriver,
    error::ShaderError,
    program::{Program, SPRITE_ATTRIBUTE_INDICES, SPRITE_ATTRIBUTE_NAMES},
    projection::{make_ortho_projection, DepthRange},
    settings::SpriteShaderSettings,
    shader::{ShaderSource, ShaderStage, ShaderUnit},
    texture::Texture,
    uniform::{SpriteUniform, UniformRegistry},
};
use std::rc::Rc;
use strum::IntoEnumIterator;

/// Texture unit the default texture is bound to.
pub const DEFAULT_TEXTURE_UNIT: u32 = 0;

const PROGRAM_NAME: &str = "SpriteShader";

/// Shader program used to draw sprites.
///
/// Every GPU object it creates is released when it is dropped, including objects created by a
/// construction attempt that failed half way. [`Self::cleanup`] consumes the shader, so it can't
/// be used or cleaned up again afterwards.
///
/// All methods must be called on the thread that owns the graphics context.
pub struct SpriteShader<D: GraphicsDriver> {
    // Field order is release order.
    default_texture: Texture<D>,
    uniforms: UniformRegistry<D>,
    program: Program<D>,
    depth_range: DepthRange,
}

impl<D: GraphicsDriver> SpriteShader<D> {
    /// Builds the shader from [`crate::settings::DEFAULT_VERTEX_SHADER`] and
    /// [`crate::settings::DEFAULT_FRAGMENT_SHADER`].
    pub fn new_default(driver: &Rc<D>) -> Result<Self, ShaderError> {
        Self::from_settings(driver, &SpriteShaderSettings::default())
    }

    /// Builds the shader from a pair of paths or `file://` URLs.
    pub fn new(
        driver: &Rc<D>,
        vertex_locator: &str,
        fragment_locator: &str,
    ) -> Result<Self, ShaderError> {
        Self::from_settings(
            driver,
            &SpriteShaderSettings {
                vertex_shader: vertex_locator.to_owned(),
                fragment_shader: fragment_locator.to_owned(),
                ..Default::default()
            },
        )
    }

    pub fn from_settings(
        driver: &Rc<D>,
        settings: &SpriteShaderSettings,
    ) -> Result<Self, ShaderError> {
        let compiler = settings.compiler();

        let vertex = compiler.compile_from_locator(
            driver,
            PROGRAM_NAME,
            &settings.vertex_shader,
            ShaderStage::Vertex,
        )?;
        let fragment = compiler.compile_from_locator(
            driver,
            PROGRAM_NAME,
            &settings.fragment_shader,
            ShaderStage::Fragment,
        )?;

        Self::from_units(driver, vertex, fragment, settings.depth_range)
    }

    /// Builds the shader from sources that are already in memory.
    pub fn from_sources(
        driver: &Rc<D>,
        vertex_source: &ShaderSource,
        fragment_source: &ShaderSource,
        settings: &SpriteShaderSettings,
    ) -> Result<Self, ShaderError> {
        if vertex_source.stage() != ShaderStage::Vertex
            || fragment_source.stage() != ShaderStage::Fragment
        {
            return Err(ShaderError::PreconditionViolation(format!(
                "expected vertex and fragment sources, got {:?} and {:?}",
                vertex_source.stage(),
                fragment_source.stage()
            )));
        }

        let compiler = settings.compiler();
        let vertex = compiler.compile(driver, PROGRAM_NAME, vertex_source)?;
        let fragment = compiler.compile(driver, PROGRAM_NAME, fragment_source)?;

        Self::from_units(driver, vertex, fragment, settings.depth_range)
    }

    fn from_units(
        driver: &Rc<D>,
        vertex: ShaderUnit<D>,
        fragment: ShaderUnit<D>,
        depth_range: DepthRange,
    ) -> Result<Self, ShaderError> {
        let program = Program::link(
            driver,
            PROGRAM_NAME,
            vertex,
            vec![fragment],
            &SPRITE_ATTRIBUTE_NAMES,
            &SPRITE_ATTRIBUTE_INDICES,
        )?;

        let uniforms = UniformRegistry::resolve(driver, program.id());
        for uniform in SpriteUniform::iter() {
            if uniforms.location(uniform).is_none() {
                Log::info(format!(
                    "{PROGRAM_NAME} does not use uniform {}, writes to it will be skipped.",
                    uniform.name()
                ));
            }
        }

        let default_texture = Texture::new_default(driver)?;

        Ok(Self {
            default_texture,
            uniforms,
            program,
            depth_range,
        })
    }

    /// Makes the program current and binds the default texture to [`DEFAULT_TEXTURE_UNIT`].
    pub fn bind(&self) {
        self.program.bind();
        self.default_texture.bind(DEFAULT_TEXTURE_UNIT);
    }

    /// Fits the projection to a viewport of the given size with the origin in its top-left
    /// corner.
    pub fn project(&self, width: u32, height: u32) {
        self.project_ortho(0.0, 0.0, width as f32, height as f32);
    }

    /// Fits the projection to the rectangle, `(x, y)` being its top-left corner. A degenerate
    /// rectangle leaves the current projection untouched.
    pub fn project_ortho(&self, x: f32, y: f32, w: f32, h: f32) {
        match make_ortho_projection(x, y, w, h, self.depth_range) {
            Some(projection) => self.set_projection_matrix(&projection),
            None => Log::warn(format!(
                "Unable to build sprite projection for rectangle ({x}, {y}, {w}, {h}) \
                and depth range {:?}. The projection is left unchanged.",
                self.depth_range
            )),
        }
    }

    pub fn set_projection_matrix(&self, projection: &Matrix4<f32>) {
        self.uniforms.set_matrix4(SpriteUniform::ProjectionMatrix, projection);
    }

    pub fn set_pos_transform(&self, transform: &Vector4<f32>) {
        self.uniforms.set_vector4(SpriteUniform::PosTransform, transform);
    }

    pub fn set_tex_transform(&self, transform: &Vector4<f32>) {
        self.uniforms.set_vector4(SpriteUniform::TexTransform, transform);
    }

    pub fn set_rotation(&self, rotation: f32) {
        self.uniforms.set_f32(SpriteUniform::Rotation, rotation);
    }

    /// Sets the tint as normalized RGBA.
    pub fn set_color(&self, color: &Vector4<f32>) {
        self.uniforms.set_vector4(SpriteUniform::Color, color);
    }

    /// Sets the tint from an 8-bit color, without any color space conversion.
    pub fn set_srgb_color(&self, color: Color) {
        self.set_color(&color.as_frgba());
    }

    /// Handle of the linked program.
    pub fn program(&self) -> D::Program {
        self.program.id()
    }

    pub fn uniforms(&self) -> &UniformRegistry<D> {
        &self.uniforms
    }

    pub fn default_texture(&self) -> &Texture<D> {
        &self.default_texture
    }

    pub fn depth_range(&self) -> DepthRange {
        self.depth_range
    }

    /// Releases the texture, the program and both shader objects.
    pub fn cleanup(self) {}
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::{DriverCall, RecordingDriver};

    const VERTEX: &str = "#ifdef GL_ES\nprecision mediump float;\n#endif\n\
        attribute vec2 inPos;\n\
        attribute vec2 inTexCoord;\n\
        varying vec2 texCoord;\n\
        uniform mat4 projectionMatrix;\n\
        uniform vec4 posTransform;\n\
        uniform vec4 texTransform;\n\
        uniform float rotation;\n\
        void main() {\n\
        texCoord = texTransform.xy + inTexCoord * texTransform.zw;\n\
        vec2 pos = posTransform.xy + inPos * posTransform.zw;\n\
        gl_Position = projectionMatrix * vec4(pos, 0.0, 1.0);\n\
        }";

    const FRAGMENT: &str = "#ifdef GL_ES\nprecision mediump float;\n#endif\n\
        uniform sampler2D tex;\n\
        uniform vec4 color;\n\
        varying vec2 texCoord;\n\
        void main() { gl_FragColor = texture2D(tex, texCoord) * color; }";

    fn make_shader(driver: &Rc<RecordingDriver>) -> SpriteShader<RecordingDriver> {
        SpriteShader::from_sources(
            driver,
            &ShaderSource::new(VERTEX, ShaderStage::Vertex),
            &ShaderSource::new(FRAGMENT, ShaderStage::Fragment),
            &Default::default(),
        )
        .unwrap()
    }

    fn write_temp_file(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "fyrox_sprite_shader_{}_{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_owned()
    }

    #[test]
    fn test_construction() {
        let driver = Rc::new(RecordingDriver::default());
        let shader = make_shader(&driver);

        let calls = driver.calls();
        let program = shader.program();
        assert!(calls.contains(&DriverCall::BindAttributeLocation(
            program,
            0,
            "inPos".to_owned()
        )));
        assert!(calls.contains(&DriverCall::BindAttributeLocation(
            program,
            1,
            "inTexCoord".to_owned()
        )));
        for uniform in [
            "projectionMatrix",
            "posTransform",
            "texTransform",
            "rotation",
            "color",
        ] {
            assert!(calls.contains(&DriverCall::UniformLocation(program, uniform.to_owned())));
        }
        assert_eq!(shader.default_texture().width(), 1);
        assert_eq!(shader.default_texture().height(), 1);

        let vertex = shader.program.vertex_shader().id();
        let submitted = driver.submitted_source(vertex).unwrap();
        assert!(submitted.starts_with("#version 150\n\n"));
        assert!(submitted.contains("in vec2 inPos;"));
        assert!(submitted.contains("out vec2 texCoord;"));
    }

    #[test]
    fn test_bind() {
        let driver = Rc::new(RecordingDriver::default());
        let shader = make_shader(&driver);
        driver.clear_calls();

        shader.bind();

        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::UseProgram(Some(shader.program())),
                DriverCall::BindTexture2D(0, Some(shader.default_texture().id())),
            ]
        );
    }

    #[test]
    fn test_every_bind_reissues_program_and_texture() {
        let driver = Rc::new(RecordingDriver::default());
        let shader = make_shader(&driver);
        driver.clear_calls();

        shader.bind();
        shader.bind();

        let program = shader.program();
        let texture = shader.default_texture().id();
        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::UseProgram(Some(program)),
                DriverCall::BindTexture2D(0, Some(texture)),
                DriverCall::UseProgram(Some(program)),
                DriverCall::BindTexture2D(0, Some(texture)),
            ]
        );
    }

    #[test]
    fn test_project_ortho_flips_vertically() {
        let driver = Rc::new(RecordingDriver::default());
        let shader = make_shader(&driver);
        driver.clear_calls();

        shader.project_ortho(0.0, 0.0, 800.0, 600.0);

        let projection = driver.last_matrix4().unwrap();
        let top = projection * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let bottom = projection * Vector4::new(0.0, 600.0, 0.0, 1.0);
        assert!((top.y - 1.0).abs() < 1.0e-5);
        assert!((bottom.y + 1.0).abs() < 1.0e-5);
        assert_eq!(driver.calls().len(), 1);
    }

    #[test]
    fn test_project_matches_project_ortho() {
        let driver = Rc::new(RecordingDriver::default());
        let shader = make_shader(&driver);

        shader.project(1024, 768);
        let from_size = driver.last_matrix4().unwrap();
        shader.project_ortho(0.0, 0.0, 1024.0, 768.0);
        let from_rect = driver.last_matrix4().unwrap();

        assert_eq!(from_size, from_rect);
    }

    #[test]
    fn test_degenerate_projection_uploads_nothing() {
        let driver = Rc::new(RecordingDriver::default());
        let shader = make_shader(&driver);
        driver.clear_calls();

        shader.project(0, 0);

        assert!(driver.calls().is_empty());
    }

    #[test]
    fn test_setters() {
        let driver = Rc::new(RecordingDriver::default());
        let shader = make_shader(&driver);
        driver.clear_calls();

        shader.set_pos_transform(&Vector4::new(10.0, 20.0, 32.0, 32.0));
        shader.set_tex_transform(&Vector4::new(0.0, 0.0, 0.5, 0.5));
        shader.set_rotation(0.25);
        shader.set_srgb_color(Color::WHITE);

        let program = shader.program();
        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::SetVector4(program, 1, Vector4::new(10.0, 20.0, 32.0, 32.0)),
                DriverCall::SetVector4(program, 2, Vector4::new(0.0, 0.0, 0.5, 0.5)),
                DriverCall::SetF32(program, 3, 0.25),
                DriverCall::SetVector4(program, 4, Vector4::new(1.0, 1.0, 1.0, 1.0)),
            ]
        );
    }

    #[test]
    fn test_missing_uniforms_are_noop() {
        let driver = Rc::new(RecordingDriver::with_active_uniforms(&["projectionMatrix"]));
        let shader = make_shader(&driver);
        driver.clear_calls();

        shader.set_pos_transform(&Vector4::repeat(1.0));
        shader.set_tex_transform(&Vector4::repeat(1.0));
        shader.set_rotation(1.0);
        shader.set_color(&Vector4::repeat(1.0));

        assert!(driver.calls().is_empty());
    }

    #[test]
    fn test_cleanup_releases_everything() {
        let driver = Rc::new(RecordingDriver::default());
        let shader = make_shader(&driver);
        let program = shader.program();
        let texture = shader.default_texture().id();
        let vertex = shader.program.vertex_shader().id();
        let fragment = shader.program.fragment_shaders()[0].id();
        driver.clear_calls();

        shader.cleanup();

        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::DeleteTexture(texture),
                DriverCall::DeleteProgram(program),
                DriverCall::DeleteShader(vertex),
                DriverCall::DeleteShader(fragment),
            ]
        );
    }

    #[test]
    fn test_failed_fragment_releases_vertex() {
        let driver = Rc::new(RecordingDriver::default());

        let result = SpriteShader::from_sources(
            &driver,
            &ShaderSource::new(VERTEX, ShaderStage::Vertex),
            &ShaderSource::new("#error broken\nvoid main() {}", ShaderStage::Fragment),
            &Default::default(),
        );
        assert!(matches!(result, Err(ShaderError::Compile { .. })));

        let calls = driver.calls();
        let created = calls
            .iter()
            .filter(|call| matches!(call, DriverCall::CreateShader(..)))
            .count();
        let deleted = calls
            .iter()
            .filter(|call| matches!(call, DriverCall::DeleteShader(_)))
            .count();
        assert_eq!(created, 2);
        assert_eq!(deleted, 2);
        assert!(!calls
            .iter()
            .any(|call| matches!(call, DriverCall::CreateProgram(_))));
    }

    #[test]
    fn test_failed_link_releases_everything() {
        let driver = Rc::new(RecordingDriver::with_link_error("error: varying mismatch"));

        let result = SpriteShader::from_sources(
            &driver,
            &ShaderSource::new(VERTEX, ShaderStage::Vertex),
            &ShaderSource::new(FRAGMENT, ShaderStage::Fragment),
            &Default::default(),
        );
        assert!(matches!(result, Err(ShaderError::Link { .. })));

        let calls = driver.calls();
        assert_eq!(
            calls
                .iter()
                .filter(|call| matches!(call, DriverCall::DeleteShader(_)))
                .count(),
            2
        );
        assert!(calls
            .iter()
            .any(|call| matches!(call, DriverCall::DeleteProgram(_))));
        assert!(!calls
            .iter()
            .any(|call| matches!(call, DriverCall::CreateTexture(_))));
    }

    #[test]
    fn test_swapped_sources() {
        let driver = Rc::new(RecordingDriver::default());

        let result = SpriteShader::from_sources(
            &driver,
            &ShaderSource::new(FRAGMENT, ShaderStage::Fragment),
            &ShaderSource::new(VERTEX, ShaderStage::Vertex),
            &Default::default(),
        );

        assert!(matches!(result, Err(ShaderError::PreconditionViolation(_))));
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn test_new_from_files() {
        let vertex = write_temp_file("sprite_vertex.glsl", VERTEX);
        let fragment = write_temp_file("sprite_fragment.glsl", FRAGMENT);
        let driver = Rc::new(RecordingDriver::default());

        let shader = SpriteShader::new(&driver, &vertex, &fragment).unwrap();
        let fragment_id = shader.program.fragment_shaders()[0].id();
        let submitted = driver.submitted_source(fragment_id).unwrap();
        assert!(submitted.contains("outFragColor = texture(tex, texCoord) * color;"));

        std::fs::remove_file(vertex).unwrap();
        std::fs::remove_file(fragment).unwrap();
    }

    #[test]
    fn test_new_with_missing_files() {
        let driver = Rc::new(RecordingDriver::default());

        let result = SpriteShader::new(&driver, "missing/vertex.glsl", "missing/fragment.glsl");

        match result {
            Err(ShaderError::Resource { locator, .. }) => {
                assert_eq!(locator, "missing/vertex.glsl")
            }
            _ => panic!("expected resource error"),
        }
        assert!(driver.calls().is_empty());
    }
}
