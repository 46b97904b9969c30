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

//! Orthographic projection for screen-space sprites.

use crate::core::algebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Near and far clipping planes of the sprite projection. The default range is wide enough that
/// sprites ordered by plain depth values are never clipped.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

impl Default for DepthRange {
    fn default() -> Self {
        Self {
            near: -32000.0,
            far: 32000.0,
        }
    }
}

/// Builds a projection that maps `[x, x + w]` to `[-1, 1]` horizontally and `[y, y + h]` to
/// `[1, -1]` vertically, so `(x, y)` is the top-left corner of the screen.
///
/// Returns `None` for a degenerate rectangle or depth range, for which no projection exists.
pub fn make_ortho_projection(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    depth_range: DepthRange,
) -> Option<Matrix4<f32>> {
    let right = x + w;
    let bottom = y + h;

    let finite = [x, y, right, bottom, depth_range.near, depth_range.far]
        .iter()
        .all(|v| v.is_finite());

    if !finite || right == x || bottom == y || depth_range.near == depth_range.far {
        return None;
    }

    Some(Matrix4::new_orthographic(
        x,
        right,
        bottom,
        y,
        depth_range.near,
        depth_range.far,
    ))
}
