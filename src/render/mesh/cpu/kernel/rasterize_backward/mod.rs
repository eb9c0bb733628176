pub mod scan;

pub use super::*;
pub use scan::{Axis, Direction};

use gather::check_faces;
use rayon::prelude::*;
use scan::{Accumulator, Edge, Maps};

/// The edges `A -> B` with the opposite vertex `C` of each face.
pub const EDGES: [[usize; 3]; 3] = [[0, 1, 2], [1, 2, 0], [2, 0, 1]];

#[derive(Clone, Copy, Debug)]
pub struct Arguments {
    /// `N`
    pub batch_size: u32,
    /// `F`
    pub face_count: u32,
    /// `V`
    pub vertex_count: u32,
    /// `I_x`
    pub image_size_x: u32,
    /// `I_y`
    pub image_size_y: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct Inputs<'a> {
    /// `[N, F, 3]`
    pub faces: &'a [i32],
    /// `[N, F, 3, 3]`
    pub face_vertices: &'a [f32],
    /// `[N, I_y, I_x]`
    pub face_index_maps: &'a [i32],
    /// `[N, I_y, I_x]`
    pub silhouettes: &'a [i32],
    /// `[N, I_y, I_x]`
    pub silhouettes_grad: &'a [f32],
}

#[derive(Clone, Debug)]
pub struct Outputs {
    /// `[N, V, 3]`
    pub vertices_grad: Vec<f32>,
    /// `[N, I_y, I_x]`
    pub debug_grad_maps: Vec<f32>,
}

impl Outputs {
    pub fn zeros(arguments: &Arguments) -> Self {
        let batch_size = arguments.batch_size as usize;
        let vertex_count = arguments.vertex_count as usize;
        let pixel_count =
            arguments.image_size_y as usize * arguments.image_size_x as usize;
        Self {
            vertices_grad: vec![0.0; batch_size * vertex_count * 3],
            debug_grad_maps: vec![0.0; batch_size * pixel_count],
        }
    }
}

/// Accumulating the vertex gradients of the silhouettes into `outputs`.
pub fn main(
    arguments: Arguments,
    inputs: Inputs<'_>,
    outputs: &mut Outputs,
) -> Result<(), Error> {
    // N
    let batch_size = arguments.batch_size as usize;
    // F
    let face_count = arguments.face_count as usize;
    // V
    let vertex_count = arguments.vertex_count as usize;
    // I_x
    let image_size_x = arguments.image_size_x as usize;
    // I_y
    let image_size_y = arguments.image_size_y as usize;
    // I_y * I_x
    let pixel_count = image_size_y * image_size_x;

    check_faces(inputs.faces, batch_size, face_count, vertex_count)?;
    let triangles = triangles(inputs.face_vertices)?;
    if triangles.len() != batch_size * face_count {
        return Err(Error::Validation(
            format!("The length of face vertices ({})", inputs.face_vertices.len()),
            format!("{batch_size} * {face_count} * 3 * 3"),
        ));
    }
    for (name, length) in [
        ("face index maps", inputs.face_index_maps.len()),
        ("silhouettes", inputs.silhouettes.len()),
        ("silhouettes grad", inputs.silhouettes_grad.len()),
        ("debug grad maps", outputs.debug_grad_maps.len()),
    ] {
        if length != batch_size * pixel_count {
            return Err(Error::Validation(
                format!("The length of {name} ({length})"),
                format!("{batch_size} * {image_size_y} * {image_size_x}"),
            ));
        }
    }
    if outputs.vertices_grad.len() != batch_size * vertex_count * 3 {
        return Err(Error::Validation(
            format!("The length of vertices grad ({})", outputs.vertices_grad.len()),
            format!("{batch_size} * {vertex_count} * 3"),
        ));
    }

    if face_count == 0 || vertex_count == 0 || pixel_count == 0 {
        return Ok(());
    }

    outputs
        .vertices_grad
        .par_chunks_mut(vertex_count * 3)
        .zip(outputs.debug_grad_maps.par_chunks_mut(pixel_count))
        .enumerate()
        .try_for_each(|(batch_index, (vertices_grad, debug_grad_map))| {
            let pixels = batch_index * pixel_count..(batch_index + 1) * pixel_count;
            let faces = batch_index * face_count..(batch_index + 1) * face_count;
            let maps = Maps {
                face_index_map: Frame::new(
                    &inputs.face_index_maps[pixels.to_owned()],
                    image_size_y,
                    image_size_x,
                )?,
                silhouette: Frame::new(
                    &inputs.silhouettes[pixels.to_owned()],
                    image_size_y,
                    image_size_x,
                )?,
                silhouette_grad: Frame::new(
                    &inputs.silhouettes_grad[pixels],
                    image_size_y,
                    image_size_x,
                )?,
            };

            // The batch item is summed up from zero, then added to the outputs.
            let mut vertices_grad_item = vec![0.0; vertex_count * 3];
            let mut debug_grad_map_item = vec![0.0; pixel_count];
            rasterize_backward(
                &triangles[faces.to_owned()],
                &inputs.faces[faces.start * 3..faces.end * 3],
                &maps,
                &mut Accumulator {
                    vertices_grad: &mut vertices_grad_item,
                    debug_grad_map: &mut FrameMut::new(
                        &mut debug_grad_map_item,
                        image_size_y,
                        image_size_x,
                    )?,
                },
            );

            vertices_grad
                .iter_mut()
                .zip(vertices_grad_item)
                .for_each(|(output, value)| *output += value);
            debug_grad_map
                .iter_mut()
                .zip(debug_grad_map_item)
                .for_each(|(output, value)| *output += value);

            Ok::<_, Error>(())
        })
}

fn rasterize_backward(
    triangles: &[Triangle],
    faces: &[i32],
    maps: &Maps<'_>,
    accumulator: &mut Accumulator<'_, '_>,
) {
    for (face_index, (triangle, face)) in
        triangles.iter().zip(faces.chunks_exact(3)).enumerate()
    {
        if !triangle.is_front_facing() {
            continue;
        }

        for [a, b, c] in EDGES {
            let edge = Edge {
                face_index: face_index as i32,
                vertex_indices: [face[a] as usize, face[b] as usize],
                vertices: [
                    triangle.vertices[a],
                    triangle.vertices[b],
                    triangle.vertices[c],
                ],
            };
            scan::scan(Axis::X, &edge, maps, accumulator);
            scan::scan(Axis::Y, &edge, maps, accumulator);
        }
    }
}
