pub use super::*;

use rayon::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct Arguments {
    /// `N`
    pub batch_size: u32,
    /// `F`
    pub face_count: u32,
    /// `I_x`
    pub image_size_x: u32,
    /// `I_y`
    pub image_size_y: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct Inputs<'a> {
    /// `[N, F, 3, 3]`
    pub face_vertices: &'a [f32],
}

#[derive(Clone, Debug)]
pub struct Outputs {
    /// `[N, I_y, I_x]`
    pub depth_maps: Vec<f32>,
    /// `[N, I_y, I_x]`
    pub face_index_maps: Vec<i32>,
    /// `[N, I_y, I_x]`
    pub silhouettes: Vec<i32>,
}

/// Rasterizing the faces to the images.
pub fn main(
    arguments: Arguments,
    inputs: Inputs<'_>,
) -> Result<Outputs, Error> {
    // N
    let batch_size = arguments.batch_size as usize;
    // F
    let face_count = arguments.face_count as usize;
    // I_x
    let image_size_x = arguments.image_size_x as usize;
    // I_y
    let image_size_y = arguments.image_size_y as usize;
    // I_y * I_x
    let pixel_count = image_size_y * image_size_x;

    let triangles = triangles(inputs.face_vertices)?;
    if triangles.len() != batch_size * face_count {
        return Err(Error::Validation(
            format!("The length of face vertices ({})", inputs.face_vertices.len()),
            format!("{batch_size} * {face_count} * 3 * 3"),
        ));
    }

    let mut depth_maps = vec![DEPTH_FAR; batch_size * pixel_count];
    let mut face_index_maps = vec![FACE_INDEX_BACKGROUND; batch_size * pixel_count];
    let mut silhouettes = vec![0; batch_size * pixel_count];

    if pixel_count != 0 {
        depth_maps
            .par_chunks_mut(pixel_count)
            .zip(face_index_maps.par_chunks_mut(pixel_count))
            .zip(silhouettes.par_chunks_mut(pixel_count))
            .enumerate()
            .try_for_each(|(batch_index, ((depth_map, face_index_map), silhouette))| {
                rasterize(
                    &triangles[batch_index * face_count..(batch_index + 1) * face_count],
                    FrameMut::new(depth_map, image_size_y, image_size_x)?,
                    FrameMut::new(face_index_map, image_size_y, image_size_x)?,
                    FrameMut::new(silhouette, image_size_y, image_size_x)?,
                );
                Ok::<_, Error>(())
            })?;
    }

    Ok(Outputs {
        depth_maps,
        face_index_maps,
        silhouettes,
    })
}

/// Faces are drawn in index order and the strictly nearer one wins.
fn rasterize(
    triangles: &[Triangle],
    mut depth_map: FrameMut<'_, f32>,
    mut face_index_map: FrameMut<'_, i32>,
    mut silhouette: FrameMut<'_, i32>,
) {
    let image_size_y = depth_map.height() as u32;
    let image_size_x = depth_map.width() as u32;

    for (face_index, triangle) in triangles.iter().enumerate() {
        if !triangle.is_front_facing() {
            continue;
        }

        for row in 0..image_size_y {
            let y = row_to_ndc(row, image_size_y);
            if !triangle.spans_row(y) {
                continue;
            }

            for col in 0..image_size_x {
                let x = to_ndc(col, image_size_x);
                if !triangle.contains(x, y) {
                    continue;
                }

                let depth = triangle.depth_at(x, y);
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                let (row, col) = (row as usize, col as usize);
                if depth < depth_map.get(row, col) {
                    depth_map.set(row, col, depth);
                    face_index_map.set(row, col, face_index as i32);
                    silhouette.set(row, col, SILHOUETTE_FOREGROUND);
                }
            }
        }
    }
}
