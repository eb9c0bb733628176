pub mod coordinate;
pub mod frame;
pub mod gather;
pub mod rasterize;
pub mod rasterize_backward;

pub use crate::error::Error;
pub use bytemuck::{Pod, Zeroable};
pub use coordinate::*;
pub use frame::{Frame, FrameMut};

/// Initial value of the depth map.
pub const DEPTH_FAR: f32 = 1.0;

/// Value of the face index map where no face is rasterized.
pub const FACE_INDEX_BACKGROUND: i32 = -1;

/// Value of the silhouette where a face is rasterized.
pub const SILHOUETTE_FOREGROUND: i32 = 255;

/// A projected vertex.
///
/// `x` and `y` are in NDC, `z` is the normalized depth in `[0, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A projected triangular face.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    /// Twice the signed area, positive for counter-clockwise winding.
    #[inline]
    pub fn signed_area(&self) -> f32 {
        let [v1, v2, v3] = &self.vertices;
        (v2.x - v1.x) * (v3.y - v1.y) - (v2.y - v1.y) * (v3.x - v1.x)
    }

    /// Clockwise and zero-area faces are culled.
    ///
    /// Zero-area faces are rejected here instead of producing `NaN` depths in
    /// the edge test, so both passes skip them the same way.
    #[inline]
    pub fn is_front_facing(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Whether any part of the face can lie on the horizontal line `y`.
    #[inline]
    pub fn spans_row(
        &self,
        y: f32,
    ) -> bool {
        let [v1, v2, v3] = &self.vertices;
        let is_above = v1.y > y && v2.y > y && v3.y > y;
        let is_below = v1.y < y && v2.y < y && v3.y < y;
        !is_above && !is_below
    }

    /// Edge function test. Points on an edge are inside.
    pub fn contains(
        &self,
        x: f32,
        y: f32,
    ) -> bool {
        let [v1, v2, v3] = &self.vertices;
        [(v1, v2), (v2, v3), (v3, v1)]
            .into_iter()
            .all(|(a, b)| (y - a.y) * (b.x - a.x) >= (x - a.x) * (b.y - a.y))
    }

    /// Returns `[λ_1, λ_2, λ_3]` of the point `(x, y)`.
    pub fn barycentric(
        &self,
        x: f32,
        y: f32,
    ) -> [f32; 3] {
        let [v1, v2, v3] = &self.vertices;
        let denominator =
            (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
        let lambda_1 =
            ((v2.y - v3.y) * (x - v3.x) + (v3.x - v2.x) * (y - v3.y)) / denominator;
        let lambda_2 =
            ((v3.y - v1.y) * (x - v3.x) + (v1.x - v3.x) * (y - v3.y)) / denominator;
        [lambda_1, lambda_2, 1.0 - lambda_1 - lambda_2]
    }

    /// Depth interpolated in inverse-depth space.
    pub fn depth_at(
        &self,
        x: f32,
        y: f32,
    ) -> f32 {
        let [l1, l2, l3] = self.barycentric(x, y);
        let [v1, v2, v3] = &self.vertices;
        1.0 / (l1 / v1.z + l2 / v2.z + l3 / v3.z)
    }
}

/// Reinterprets `[*, 3, 3]` face vertices as triangles.
pub fn triangles(face_vertices: &[f32]) -> Result<&[Triangle], Error> {
    bytemuck::try_cast_slice(face_vertices).map_err(|_| {
        Error::Validation(
            format!("The length of face vertices ({})", face_vertices.len()),
            "a multiple of 9".into(),
        )
    })
}
