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

//! Bridge from legacy GLSL ES (the dialect WebGL shaders are written in) to the desktop core
//! profile.
//!
//! The rewrite is a sequence of plain textual substitutions, it does not parse GLSL. It is not
//! idempotent: running it twice would prepend the version directive and the color output twice,
//! so it must be applied at most once per raw source.

use crate::shader::ShaderStage;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Exact prefix that marks a source as legacy GLSL ES.
pub const LEGACY_DIALECT_MARKER: &str = "#ifdef GL_ES\n";

/// Core profile version that modernized sources are compiled as.
pub const DEFAULT_CORE_VERSION: u32 = 150;

/// Explicit fragment output that replaces `gl_FragColor`.
pub const FRAGMENT_COLOR_OUTPUT: &str = "outFragColor";

/// Dialect of shader sources.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ShaderDialect {
    /// Sources starting with [`LEGACY_DIALECT_MARKER`] are legacy, everything else is passed to
    /// the driver as is.
    #[default]
    Auto,
    /// Every source is legacy GLSL ES and is always modernized.
    Legacy,
    /// Sources are already written for the core profile and are never touched.
    Core,
}

impl ShaderDialect {
    /// Returns `true` if the source has to be modernized before compilation.
    pub fn is_legacy(self, source: &str) -> bool {
        match self {
            Self::Auto => source.starts_with(LEGACY_DIALECT_MARKER),
            Self::Legacy => true,
            Self::Core => false,
        }
    }

    /// Returns the source that should be submitted to the driver. Non-legacy sources are
    /// borrowed back untouched, byte for byte.
    pub fn prepare<'a>(
        self,
        source: &'a str,
        stage: ShaderStage,
        core_version: u32,
    ) -> Cow<'a, str> {
        if self.is_legacy(source) {
            Cow::Owned(modernize(source, stage, core_version))
        } else {
            Cow::Borrowed(source)
        }
    }
}

/// Unconditionally rewrites legacy GLSL ES source to the core profile of the given version.
///
/// - `attribute` inputs become `in` in both stages.
/// - `varying` becomes `out` in the vertex stage and `in` in the fragment stage.
/// - `gl_FragColor` is renamed to [`FRAGMENT_COLOR_OUTPUT`], which gets declared at the top of
///   the fragment stage, and `texture2D` sampling becomes `texture`.
/// - `#version <core_version>` is prepended.
pub fn modernize(source: &str, stage: ShaderStage, core_version: u32) -> String {
    let mut source = source.replace("attribute ", "in ");

    match stage {
        ShaderStage::Vertex => {
            source = source.replace("varying ", "out ");
        }
        ShaderStage::Fragment => {
            source = source
                .replace("varying ", "in ")
                .replace("gl_FragColor", FRAGMENT_COLOR_OUTPUT)
                .replace("texture2D", "texture");
            source.insert_str(0, &format!("out vec4 {FRAGMENT_COLOR_OUTPUT};\n\n"));
        }
    }

    source.insert_str(0, &format!("#version {core_version}\n\n"));
    source
}
