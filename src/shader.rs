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

//! Shader sources and compilation of a single shader stage.

use crate::{
    core::log::Log,
    driver::GraphicsDriver,
    error::ShaderError,
    modernizer::{ShaderDialect, DEFAULT_CORE_VERSION},
};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    marker::PhantomData,
    path::PathBuf,
    rc::Rc,
};
use strum_macros::AsRefStr;

/// Role of a shader within a program.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, AsRefStr)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Shader source text together with its stage.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ShaderSource {
    text: String,
    stage: ShaderStage,
}

impl ShaderSource {
    pub fn new<S: Into<String>>(text: S, stage: ShaderStage) -> Self {
        Self {
            text: text.into(),
            stage,
        }
    }

    /// Reads the source from a file path or a `file://` URL. The file is read line by line and
    /// the lines are joined with `\n`, so line endings are normalized and a trailing newline is
    /// dropped. The file handle is released on every exit path.
    pub fn load(locator: &str, stage: ShaderStage) -> Result<Self, ShaderError> {
        let to_resource_error = |source: io::Error| ShaderError::Resource {
            locator: locator.to_owned(),
            source,
        };

        let path = locator_to_path(locator).map_err(to_resource_error)?;
        let reader = BufReader::new(File::open(path).map_err(to_resource_error)?);
        let lines = reader
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_resource_error)?;

        Ok(Self::new(lines.join("\n"), stage))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

fn locator_to_path(locator: &str) -> io::Result<PathBuf> {
    if let Some(url) = locator.strip_prefix("file://") {
        // `file:///path` has an empty host, `file://localhost/path` names the local one.
        let (host, path) = url.split_at(url.find('/').unwrap_or(url.len()));
        if !host.is_empty() && !host.eq_ignore_ascii_case("localhost") {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("file URLs with host \"{host}\" are not supported"),
            ));
        }
        if path.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "file URL has no path"));
        }
        Ok(PathBuf::from(path))
    } else if let Some((scheme, _)) = locator.split_once("://") {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("unsupported URL scheme \"{scheme}\""),
        ))
    } else {
        Ok(PathBuf::from(locator))
    }
}

/// Builds the text of a compilation failure: the compiler log followed by the submitted source
/// with right-aligned 1-based line numbers, so that positions in the log can be matched by eye.
pub fn format_compile_diagnostic(compiler_log: &str, source: &str) -> String {
    let mut buf = String::from("Shader did not compile\n");

    buf += "\nCOMPILER LOG:\n";
    buf += compiler_log;

    buf += "\nSOURCE:\n";
    for (i, line) in source.lines().enumerate() {
        buf += &format!("{:4}: {}\n", i + 1, line);
    }

    buf
}

/// A compiled shader stage living on GPU. The shader object is freed when the unit is dropped.
pub struct ShaderUnit<D: GraphicsDriver> {
    driver: Rc<D>,
    id: D::Shader,
    stage: ShaderStage,
    // Force compiler to not implement Send and Sync, because OpenGL is not thread-safe.
    thread_mark: PhantomData<*const u8>,
}

impl<D: GraphicsDriver> ShaderUnit<D> {
    pub fn id(&self) -> D::Shader {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<D: GraphicsDriver> Drop for ShaderUnit<D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.id);
    }
}

/// Compiles shader stages, bridging legacy sources according to the dialect.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ShaderCompiler {
    pub dialect: ShaderDialect,
    /// Version of the `#version` directive of modernized sources.
    pub core_version: u32,
}

impl Default for ShaderCompiler {
    fn default() -> Self {
        Self {
            dialect: ShaderDialect::Auto,
            core_version: DEFAULT_CORE_VERSION,
        }
    }
}

impl ShaderCompiler {
    /// Compiles a single stage. `name` is used for diagnostics only.
    pub fn compile<D: GraphicsDriver>(
        &self,
        driver: &Rc<D>,
        name: &str,
        source: &ShaderSource,
    ) -> Result<ShaderUnit<D>, ShaderError> {
        let stage = source.stage();
        let shader_name = format!("{}_{}Shader", name, stage.as_ref());
        let submitted = self.dialect.prepare(source.text(), stage, self.core_version);

        let unit = ShaderUnit {
            driver: driver.clone(),
            id: driver.create_shader(stage)?,
            stage,
            thread_mark: PhantomData,
        };

        driver.shader_source(unit.id, &submitted);
        driver.compile_shader(unit.id);

        let status = driver.shader_compile_status(unit.id);
        let compilation_message = driver.shader_info_log(unit.id);

        if !status {
            Log::err(format!(
                "Failed to compile {} shader: {}",
                shader_name, compilation_message
            ));
            Err(ShaderError::Compile {
                shader_name,
                stage,
                diagnostic: format_compile_diagnostic(&compilation_message, &submitted),
            })
        } else {
            let msg = if compilation_message.trim().is_empty() {
                format!("Shader {} compiled successfully!", shader_name)
            } else {
                format!(
                    "Shader {} compiled successfully!\nAdditional info: {}",
                    shader_name, compilation_message
                )
            };

            Log::info(msg);

            Ok(unit)
        }
    }

    /// Loads the source with [`ShaderSource::load`] and compiles it.
    pub fn compile_from_locator<D: GraphicsDriver>(
        &self,
        driver: &Rc<D>,
        name: &str,
        locator: &str,
        stage: ShaderStage,
    ) -> Result<ShaderUnit<D>, ShaderError> {
        let source = ShaderSource::load(locator, stage)?;
        self.compile(driver, name, &source)
    }
}
