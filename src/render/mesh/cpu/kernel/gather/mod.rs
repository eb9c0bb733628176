pub use super::*;

use rayon::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct Arguments {
    /// `N`
    pub batch_size: u32,
    /// `F`
    pub face_count: u32,
    /// `V`
    pub vertex_count: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct Inputs<'a> {
    /// `[N, F, 3]`
    pub faces: &'a [i32],
    /// `[N, V, 3]`
    pub vertices: &'a [f32],
}

#[derive(Clone, Debug)]
pub struct Outputs {
    /// `[N, F, 3, 3]`
    pub face_vertices: Vec<f32>,
}

/// Looking up the vertices of each face.
pub fn main(
    arguments: Arguments,
    inputs: Inputs<'_>,
) -> Result<Outputs, Error> {
    // N
    let batch_size = arguments.batch_size as usize;
    // F
    let face_count = arguments.face_count as usize;
    // V
    let vertex_count = arguments.vertex_count as usize;

    check_faces(inputs.faces, batch_size, face_count, vertex_count)?;
    if inputs.vertices.len() != batch_size * vertex_count * 3 {
        return Err(Error::Validation(
            format!("The length of vertices ({})", inputs.vertices.len()),
            format!("{batch_size} * {vertex_count} * 3"),
        ));
    }

    let mut face_vertices = vec![0.0; batch_size * face_count * 9];
    if face_count == 0 {
        return Ok(Outputs { face_vertices });
    }

    face_vertices
        .par_chunks_mut(face_count * 9)
        .zip(inputs.faces.par_chunks(face_count * 3))
        .enumerate()
        .for_each(|(batch_index, (face_vertices, faces))| {
            let vertices = &inputs.vertices
                [batch_index * vertex_count * 3..(batch_index + 1) * vertex_count * 3];
            for (target, &vertex_index) in
                face_vertices.chunks_exact_mut(3).zip(faces)
            {
                let offset = vertex_index as usize * 3;
                target.copy_from_slice(&vertices[offset..offset + 3]);
            }
        });

    Ok(Outputs { face_vertices })
}

/// Every vertex index should lie in `[0, V)`.
pub fn check_faces(
    faces: &[i32],
    batch_size: usize,
    face_count: usize,
    vertex_count: usize,
) -> Result<(), Error> {
    if faces.len() != batch_size * face_count * 3 {
        return Err(Error::Validation(
            format!("The length of faces ({})", faces.len()),
            format!("{batch_size} * {face_count} * 3"),
        ));
    }
    if let Some(&vertex_index) = faces
        .iter()
        .find(|&&index| index < 0 || index as usize >= vertex_count)
    {
        return Err(Error::Validation(
            format!("The vertex index ({vertex_index})"),
            format!("in [0, {vertex_count})"),
        ));
    }
    Ok(())
}
