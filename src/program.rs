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

//! Linking of compiled shader stages into a program with fixed vertex attribute slots.

use crate::{core::log::Log, driver::GraphicsDriver, error::ShaderError, shader::ShaderUnit};
use fxhash::FxHashSet;
use std::{marker::PhantomData, rc::Rc};

/// Name of the vertex position input.
pub const POSITION_ATTRIBUTE: &str = "inPos";
/// Slot of the vertex position input.
pub const POSITION_ATTRIBUTE_INDEX: u32 = 0;
/// Name of the texture coordinates input.
pub const TEX_COORD_ATTRIBUTE: &str = "inTexCoord";
/// Slot of the texture coordinates input.
pub const TEX_COORD_ATTRIBUTE_INDEX: u32 = 1;

/// Attribute names every sprite vertex shader has to declare, in slot order.
pub const SPRITE_ATTRIBUTE_NAMES: [&str; 2] = [POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE];
/// Slots of [`SPRITE_ATTRIBUTE_NAMES`].
pub const SPRITE_ATTRIBUTE_INDICES: [u32; 2] =
    [POSITION_ATTRIBUTE_INDEX, TEX_COORD_ATTRIBUTE_INDEX];

/// Vertex attribute name bound to a fixed input slot.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct AttributeBinding {
    pub name: String,
    pub index: u32,
}

/// Pairs names with indices. Lengths must match, names and indices must be unique.
pub fn make_attribute_bindings(
    names: &[&str],
    indices: &[u32],
) -> Result<Vec<AttributeBinding>, ShaderError> {
    if names.len() != indices.len() {
        return Err(ShaderError::PreconditionViolation(format!(
            "{} attribute names were given with {} indices",
            names.len(),
            indices.len()
        )));
    }

    let mut unique_names = FxHashSet::default();
    let mut unique_indices = FxHashSet::default();
    for (name, index) in names.iter().zip(indices) {
        if !unique_names.insert(*name) {
            return Err(ShaderError::PreconditionViolation(format!(
                "attribute {name} is bound more than once"
            )));
        }
        if !unique_indices.insert(*index) {
            return Err(ShaderError::PreconditionViolation(format!(
                "attribute slot {index} is bound more than once"
            )));
        }
    }

    Ok(names
        .iter()
        .zip(indices)
        .map(|(name, index)| AttributeBinding {
            name: name.to_string(),
            index: *index,
        })
        .collect())
}

/// A linked program. Owns its shader stages: dropping the program frees the program object and
/// every attached shader object.
pub struct Program<D: GraphicsDriver> {
    driver: Rc<D>,
    id: D::Program,
    attributes: Vec<AttributeBinding>,
    // Dropped after the program object is deleted.
    vertex: ShaderUnit<D>,
    fragments: Vec<ShaderUnit<D>>,
    // Force compiler to not implement Send and Sync, because OpenGL is not thread-safe.
    thread_mark: PhantomData<*const u8>,
}

impl<D: GraphicsDriver> Program<D> {
    /// Attaches the stages, binds attribute slots and links the program. Attribute slots are
    /// bound before linking, because they become immutable once the program is linked.
    ///
    /// Arguments are validated before any driver call is made.
    pub fn link(
        driver: &Rc<D>,
        name: &str,
        vertex: ShaderUnit<D>,
        fragments: Vec<ShaderUnit<D>>,
        attribute_names: &[&str],
        attribute_indices: &[u32],
    ) -> Result<Self, ShaderError> {
        let attributes = make_attribute_bindings(attribute_names, attribute_indices)?;
        if fragments.is_empty() {
            return Err(ShaderError::PreconditionViolation(format!(
                "program {name} must have at least one fragment shader"
            )));
        }

        let program = Self {
            driver: driver.clone(),
            id: driver.create_program()?,
            attributes,
            vertex,
            fragments,
            thread_mark: PhantomData,
        };

        driver.attach_shader(program.id, program.vertex.id());
        for fragment in program.fragments.iter() {
            driver.attach_shader(program.id, fragment.id());
        }

        for attribute in program.attributes.iter() {
            driver.bind_attribute_location(program.id, attribute.index, &attribute.name);
        }

        driver.link_program(program.id);
        let status = driver.program_link_status(program.id);
        let link_message = driver.program_info_log(program.id);

        if !status {
            Log::err(format!("Failed to link {} shader: {}", name, link_message));
            Err(ShaderError::Link {
                shader_name: name.to_owned(),
                error_message: format!("Shader program did not link:\n{link_message}"),
            })
        } else {
            let msg = if link_message.trim().is_empty() {
                format!("Shader {} linked successfully!", name)
            } else {
                format!(
                    "Shader {} linked successfully!\nAdditional info: {}",
                    name, link_message
                )
            };

            Log::info(msg);

            Ok(program)
        }
    }

    /// Makes the program current.
    pub fn bind(&self) {
        self.driver.use_program(Some(self.id));
    }

    pub fn id(&self) -> D::Program {
        self.id
    }

    pub fn attributes(&self) -> &[AttributeBinding] {
        &self.attributes
    }

    pub fn vertex_shader(&self) -> &ShaderUnit<D> {
        &self.vertex
    }

    pub fn fragment_shaders(&self) -> &[ShaderUnit<D>] {
        &self.fragments
    }
}

impl<D: GraphicsDriver> Drop for Program<D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.id);
    }
}
