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

//! Sprite shader settings, stored in RON.

use crate::{
    modernizer::{ShaderDialect, DEFAULT_CORE_VERSION},
    projection::DepthRange,
    shader::ShaderCompiler,
};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

/// Default location of the vertex shader source.
pub const DEFAULT_VERTEX_SHADER: &str = "assets/shader/vertex.glsl";
/// Default location of the fragment shader source.
pub const DEFAULT_FRAGMENT_SHADER: &str = "assets/shader/fragment.glsl";

#[derive(Deserialize, Serialize, PartialEq, Clone, Debug)]
#[serde(default)]
pub struct SpriteShaderSettings {
    /// Path or `file://` URL of the vertex shader source.
    pub vertex_shader: String,
    /// Path or `file://` URL of the fragment shader source.
    pub fragment_shader: String,
    pub dialect: ShaderDialect,
    /// `#version` of modernized legacy sources.
    pub core_version: u32,
    pub depth_range: DepthRange,
}

impl Default for SpriteShaderSettings {
    fn default() -> Self {
        Self {
            vertex_shader: DEFAULT_VERTEX_SHADER.to_owned(),
            fragment_shader: DEFAULT_FRAGMENT_SHADER.to_owned(),
            dialect: Default::default(),
            core_version: DEFAULT_CORE_VERSION,
            depth_range: Default::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings serialization error: {0}")]
    Ron(#[from] ron::Error),
    #[error("Malformed settings: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),
}

impl SpriteShaderSettings {
    pub const FILE_NAME: &'static str = "sprite_shader.ron";

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let file = File::open(path)?;
        Ok(ron::de::from_reader(file)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let file = File::create(path)?;
        ron::ser::to_writer_pretty(file, self, PrettyConfig::default())?;
        Ok(())
    }

    /// Compiler configured with the dialect settings.
    pub fn compiler(&self) -> ShaderCompiler {
        ShaderCompiler {
            dialect: self.dialect,
            core_version: self.core_version,
        }
    }
}
