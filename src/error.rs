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

//! Errors that can occur while building a sprite shader program.

use crate::shader::ShaderStage;

/// Every variant is fatal for the program being built: nothing is retried and no partially
/// constructed program is handed out.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// Shader source could not be located or read.
    #[error("Can't read shader source at \"{}\": {}", locator, source)]
    Resource {
        /// Path or URL of the shader source.
        locator: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The driver rejected shader source. `diagnostic` contains the compiler log and the source
    /// that was actually submitted, with line numbers.
    #[error("Compilation of \"{}\" shader has failed:\n{}", shader_name, diagnostic)]
    Compile {
        /// Name of shader.
        shader_name: String,
        /// Stage of the shader.
        stage: ShaderStage,
        /// Full compiler diagnostic.
        diagnostic: String,
    },
    /// Means that program link stage failed, exact reason is inside `error_message`
    #[error("Linking shader \"{}\" failed: {}", shader_name, error_message)]
    Link {
        /// Name of shader program.
        shader_name: String,
        /// Linking error message.
        error_message: String,
    },
    /// Caller passed inconsistent arguments, for example attribute names and indices of
    /// different length. This is a programming error.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
    /// Driver failed to create an object.
    #[error("Graphics driver error: {0}")]
    Driver(String),
}

impl From<String> for ShaderError {
    fn from(v: String) -> Self {
        Self::Driver(v)
    }
}
